// src/config/time.rs
use crate::error::ConfigError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a window bound into Unix seconds.
///
/// Accepted forms:
///   - epoch seconds, integer or float (`1722575400`, `1722575400.5`)
///   - `2025-08-01` (UTC midnight)
///   - `2025-08-01T14:30:00` (UTC)
///   - RFC 3339 with an explicit offset
pub fn parse_time_bound(raw: &str) -> Result<i64, ConfigError> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return Ok(f.trunc() as i64);
        }
    }
    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.timestamp());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(ndt.and_utc().timestamp());
            }
        }
        return Err(ConfigError::InvalidTimeBound(raw.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc().timestamp())
        .ok_or_else(|| ConfigError::InvalidTimeBound(raw.to_string()))
}

pub fn parse_optional_bound(raw: Option<&str>) -> Result<Option<i64>, ConfigError> {
    raw.map(parse_time_bound).transpose()
}
