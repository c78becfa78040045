//! Serde helpers for record timestamps.
//!
//! Timestamps are written as RFC 3339 in UTC. Older data files carry naive
//! ISO-8601 datetimes with no offset; those are read back as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, NAIVE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_parse_rfc3339_keeps_instant() {
        let dt = parse("2024-03-01T10:15:30.250+02:00").unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 30).unwrap() + Duration::milliseconds(250);
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse("2024-03-01T10:15:30.123456").unwrap();
        assert_eq!(dt.timestamp(), Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap().timestamp());
        assert_eq!(dt.timestamp_subsec_micros(), 123_456);

        assert!(parse("2024-03-01T10:15:30").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("yesterday").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn test_rfc3339_round_trip_is_exact() {
        let now = Utc::now();
        assert_eq!(parse(&now.to_rfc3339()), Some(now));
    }
}
