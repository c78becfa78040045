//! Entity ↔ record conversion.
//!
//! A record is the flat JSON object stored for one entity. Entities describe
//! their storage shape with serde attributes; this module adds the required
//! field check so a missing key is reported by name.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RecordError;

pub type RecordMap = Map<String, Value>;

/// How `Repository::delete` treats a matching record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Drop the record from the file.
    Remove,
    /// Keep the record and flip it inactive via `Record::deactivate`.
    Deactivate,
}

/// An entity stored as one record in a JSON collection file.
pub trait Record: Serialize + DeserializeOwned + Clone {
    type Id: Clone + PartialEq + fmt::Display + fmt::Debug;

    /// Collection name used in logs and errors.
    const COLLECTION: &'static str;

    /// Storage keys every record must carry.
    const FIELDS: &'static [&'static str];

    const DELETE_MODE: DeleteMode = DeleteMode::Remove;

    fn id(&self) -> Self::Id;

    /// Called by `Repository::delete` when `DELETE_MODE` is `Deactivate`.
    fn deactivate(&mut self) {}
}

pub fn to_record<E: Record>(entity: &E) -> Result<RecordMap, RecordError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RecordError::NotAnObject),
        Err(e) => Err(RecordError::InvalidValue(e.to_string())),
    }
}

pub fn from_record<E: Record>(record: RecordMap) -> Result<E, RecordError> {
    if let Some(missing) = E::FIELDS.iter().find(|field| !record.contains_key(**field)) {
        return Err(RecordError::MissingField(*missing));
    }
    serde_json::from_value(Value::Object(record)).map_err(|e| RecordError::InvalidValue(e.to_string()))
}

/// Decode one array element as read from disk.
pub(crate) fn from_value<E: Record>(value: Value) -> Result<E, RecordError> {
    match value {
        Value::Object(map) => from_record(map),
        _ => Err(RecordError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u64,
        #[serde(rename = "bodyText")]
        body: String,
    }

    impl Record for Note {
        type Id = u64;
        const COLLECTION: &'static str = "notes";
        const FIELDS: &'static [&'static str] = &["id", "bodyText"];

        fn id(&self) -> u64 {
            self.id
        }
    }

    fn map(value: Value) -> RecordMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_to_record_applies_renames() {
        let note = Note { id: 1, body: "hi".to_string() };
        let record = to_record(&note).unwrap();
        assert_eq!(record.get("bodyText"), Some(&json!("hi")));
        assert!(record.get("body").is_none());
    }

    #[test]
    fn test_from_record_reports_missing_field() {
        let err = from_record::<Note>(map(json!({ "id": 1 }))).unwrap_err();
        assert_eq!(err, RecordError::MissingField("bodyText"));
    }

    #[test]
    fn test_from_record_reports_invalid_value() {
        let err = from_record::<Note>(map(json!({ "id": "one", "bodyText": "x" }))).unwrap_err();
        assert!(matches!(err, RecordError::InvalidValue(_)));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert_eq!(from_value::<Note>(json!([1, 2])).unwrap_err(), RecordError::NotAnObject);
    }

    #[test]
    fn test_default_delete_mode_is_remove() {
        assert_eq!(Note::DELETE_MODE, DeleteMode::Remove);
    }
}
