use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn one stored record into an entity (or back).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("record is not a JSON object")]
    NotAnObject,
}

/// Storage-level failures. Business-rule outcomes never show up here.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record #{index} in {}: {source}", .path.display())]
    Record {
        path: PathBuf,
        index: usize,
        #[source]
        source: RecordError,
    },

    #[error("No {collection} record with id {id}")]
    NotFound { collection: &'static str, id: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the update-miss case, which callers may want to treat softly.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_messages() {
        assert_eq!(
            RecordError::MissingField("inStock").to_string(),
            "missing field `inStock`"
        );
        assert_eq!(
            RecordError::InvalidValue("bad price".to_string()).to_string(),
            "invalid value: bad price"
        );
    }

    #[test]
    fn test_store_error_includes_path_and_index() {
        let err = StoreError::Record {
            path: PathBuf::from("data/products.json"),
            index: 3,
            source: RecordError::MissingField("price"),
        };
        let msg = err.to_string();
        assert!(msg.contains("#3"));
        assert!(msg.contains("data/products.json"));
        assert!(msg.contains("missing field `price`"));
    }

    #[test]
    fn test_is_not_found() {
        let err = StoreError::NotFound {
            collection: "books",
            id: "7".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No books record with id 7");
    }
}
