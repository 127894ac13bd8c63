//! Column codecs shared by the row mappers. Timestamps travel as
//! RFC 3339 text, enums as their serde string form, and analysis
//! results and event bodies as JSON text.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("column {column} holds an unreadable value: {message}")]
    Corrupt {
        column: &'static str,
        message: String,
    },
    #[error("value cannot be stored: {message}")]
    Unstorable { message: String },
}

pub fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| DbError::Corrupt {
            column,
            message: err.to_string(),
        })
}

pub fn json_text<T: Serialize>(value: &T) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|err| DbError::Unstorable {
        message: err.to_string(),
    })
}

pub fn parse_json<T: DeserializeOwned>(column: &'static str, value: &str) -> Result<T, DbError> {
    serde_json::from_str(value).map_err(|err| DbError::Corrupt {
        column,
        message: err.to_string(),
    })
}

/// Enums are stored as the bare string serde would emit, so the stored
/// form matches the wire form (`InProgress`, `AzureDevOps`, ...).
pub fn enum_text<T: Serialize>(value: &T) -> Result<String, DbError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(text)) => Ok(text),
        Ok(other) => Err(DbError::Unstorable {
            message: format!("not a string-encoded enum: {other}"),
        }),
        Err(err) => Err(DbError::Unstorable {
            message: err.to_string(),
        }),
    }
}

pub fn parse_enum<T: DeserializeOwned>(column: &'static str, value: &str) -> Result<T, DbError> {
    serde_json::from_value(serde_json::Value::String(value.to_owned())).map_err(|err| {
        DbError::Corrupt {
            column,
            message: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use revu_core::types::enums::ReviewStatus;

    #[test]
    fn enum_round_trip_uses_the_wire_form() {
        let text = enum_text(&ReviewStatus::InProgress).unwrap();
        assert_eq!(text, "InProgress");
        let parsed: ReviewStatus = parse_enum("status", &text).unwrap();
        assert_eq!(parsed, ReviewStatus::InProgress);
    }

    #[test]
    fn corrupt_values_name_their_column() {
        let err = parse_enum::<ReviewStatus>("status", "Bogus").unwrap_err();
        assert!(err.to_string().contains("status"));

        let err = parse_timestamp("created_at", "not-a-date").unwrap_err();
        assert!(err.to_string().contains("created_at"));
    }
}
