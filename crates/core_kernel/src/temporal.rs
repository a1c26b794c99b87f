//! Timestamp parsing for service dates
//!
//! Claim lines carry an ISO-8601 service date. Callers send it in one of
//! three shapes, all normalised to UTC:
//! - offset-aware RFC 3339 (`2024-03-01T09:30:00-05:00`)
//! - naive date-time, interpreted as UTC (`2024-03-01T09:30:00`)
//! - date only, interpreted as midnight UTC (`2024-03-01`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors related to temporal operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid timestamp '{0}': expected an ISO-8601 date or date-time")]
    InvalidTimestamp(String),
}

/// Parses an ISO-8601 timestamp into UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TemporalError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TemporalError::InvalidTimestamp(raw.to_string()))
}

/// Serde adapter for `DateTime<Utc>` fields that accept any shape
/// [`parse_timestamp`] understands and serialise as RFC 3339
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Line {
///     #[serde(with = "core_kernel::temporal::iso8601")]
///     service_date: DateTime<Utc>,
/// }
/// ```
pub mod iso8601 {
    use super::parse_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}
