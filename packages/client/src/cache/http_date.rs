//! HTTP date parsing and formatting utilities
//!
//! Parses the three RFC 7231 date formats used by `Expires` and
//! `Last-Modified`, and formats `If-Modified-Since` values.

/// HTTP date parsing error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpDateParseError {
    /// Date format was not recognized by any of the supported parsers
    #[error("Unrecognized HTTP date format: {0}")]
    UnrecognizedFormat(String),
    /// Date was parsed but represents a time before Unix epoch
    #[error("Invalid timestamp in HTTP date: {0}")]
    InvalidTimestamp(String),
}

/// HTTP date parsing utilities
pub mod httpdate {
    use std::time::{Duration, SystemTime};

    use chrono::{DateTime, NaiveDateTime, Utc};

    use super::HttpDateParseError;

    fn from_timestamp(timestamp: i64, date_str: &str) -> Result<SystemTime, HttpDateParseError> {
        u64::try_from(timestamp)
            .map(|secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .map_err(|_| HttpDateParseError::InvalidTimestamp(date_str.to_string()))
    }

    /// Parse HTTP date string into `SystemTime`
    pub fn parse_http_date(date_str: &str) -> Result<SystemTime, HttpDateParseError> {
        let date_str = date_str.trim();

        // IMF-fixdate: "Sun, 06 Nov 1994 08:49:37 GMT"
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%a, %d %b %Y %H:%M:%S GMT") {
            return from_timestamp(dt.and_utc().timestamp(), date_str);
        }

        // RFC 850: "Sunday, 06-Nov-94 08:49:37 GMT"
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%A, %d-%b-%y %H:%M:%S GMT") {
            return from_timestamp(dt.and_utc().timestamp(), date_str);
        }

        // ANSI C asctime(): "Sun Nov  6 08:49:37 1994"
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%a %b %e %H:%M:%S %Y") {
            return from_timestamp(dt.and_utc().timestamp(), date_str);
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
            return from_timestamp(dt.timestamp(), date_str);
        }

        Err(HttpDateParseError::UnrecognizedFormat(date_str.to_string()))
    }

    /// Format `SystemTime` as an IMF-fixdate HTTP date string
    pub fn fmt_http_date(time: SystemTime) -> String {
        let duration = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();

        let secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        let dt = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();

        dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }
}
