//! Timestamp normalization for heterogeneous directory encodings.
//!
//! Directory services return timestamps in at least two incompatible forms:
//! 64-bit file-time tick counts (logon and password attributes) and
//! generalized-time strings (creation attributes), with further textual
//! variation across deployments. Both converters here are total: any value
//! that cannot be interpreted collapses to `None` rather than failing the
//! run on one bad field.

use chrono::{DateTime, NaiveDateTime, Utc};

/// 100-nanosecond intervals between 1601-01-01 and the Unix epoch.
const FILETIME_UNIX_DIFF: i64 = 116_444_736_000_000_000;

/// File-time ticks per second.
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ordered list of explicit date/time patterns attempted after the
/// culture-invariant parse. Passed into [`parse_general_date`] as data so the
/// accepted formats are visible and testable rather than ambient state.
#[derive(Debug, Clone)]
pub struct GeneralTimeFormats {
    pub patterns: Vec<&'static str>,
}

impl Default for GeneralTimeFormats {
    fn default() -> Self {
        Self {
            patterns: vec![
                // Directory generalized time: 20240115120000.0Z
                "%Y%m%d%H%M%S%.fZ",
                "%Y%m%d%H%M%SZ",
                // ISO-8601, with and without fractional seconds
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S",
                // Space-separated SQL style
                "%Y-%m-%d %H:%M:%S",
                // Day-first European
                "%d.%m.%Y %H:%M:%S",
                // US month/day with AM/PM marker
                "%m/%d/%Y %I:%M:%S %p",
            ],
        }
    }
}

/// Convert a file-time tick count (100-ns intervals since 1601-01-01T00:00:00Z)
/// into a UTC instant.
///
/// Zero and negative values are the directory's "never logged on" / "not set"
/// sentinel and map to `None`, never to an epoch date. Unparseable or
/// out-of-range input also maps to `None`; this function never fails.
pub fn from_file_time(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let ticks = raw?.trim().parse::<i64>().ok()?;
    if ticks <= 0 {
        return None;
    }

    let unix_100ns = ticks - FILETIME_UNIX_DIFF;
    let secs = unix_100ns.div_euclid(TICKS_PER_SECOND);
    let nanos = (unix_100ns.rem_euclid(TICKS_PER_SECOND) * 100) as u32;

    DateTime::from_timestamp(secs, nanos)
}

/// Parse a textual date/time of unknown encoding into a UTC instant.
///
/// A culture-invariant RFC 3339 parse is attempted first (it carries its own
/// offset); then each pattern in `formats` in order, with unspecified zones
/// assumed UTC. The first successful parse wins. Anything unparseable maps to
/// `None`; this function never fails.
pub fn parse_general_date(
    raw: Option<&str>,
    formats: &GeneralTimeFormats,
) -> Option<DateTime<Utc>> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for pattern in &formats.patterns {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(naive.and_utc());
        }
    }

    None
}
