//! Canonical date formatting for the remote store's write path
//!
//! The remote store accepts a single fixed shape:
//! `YYYY-MM-DD HH:MM:SS.000000 +0300` - zero-padded fields, six zero
//! fractional digits, and a fixed offset literal. No timezone conversion is
//! performed; only the wall-clock fields of the input are read. The offset
//! literal encodes the remote store's operating timezone and is a
//! configuration parameter of the formatter, not a hard-coded constant.

use crate::error::DateError;
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Offset literal used when none is configured.
pub const DEFAULT_OFFSET: &str = "+0300";

/// A date/time in the canonical wire representation.
///
/// Ordered by its wall-clock fields; the fractional-second field is always
/// zero. `Display` renders the exact wire shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDate {
    // Field order matters for the derived ordering: the stamp dominates.
    stamp: NaiveDateTime,
    offset: String,
}

impl CanonicalDate {
    /// Wall-clock fields of this date
    #[inline]
    #[must_use]
    pub fn naive(&self) -> NaiveDateTime {
        self.stamp
    }

    /// The configured offset literal, e.g. `+0300`
    #[inline]
    #[must_use]
    pub fn offset(&self) -> &str {
        &self.offset
    }

    /// Parse a wire-format string coming back from the remote store.
    ///
    /// # Errors
    /// - `DateError::MalformedWire` when the string does not match the
    ///   canonical shape
    pub fn from_wire(raw: &str) -> Result<Self, DateError> {
        let malformed = || DateError::MalformedWire(raw.to_string());

        let mut parts = raw.split_whitespace();
        let date = parts.next().ok_or_else(malformed)?;
        let time = parts.next().ok_or_else(malformed)?;
        let offset = parts.next().ok_or_else(malformed)?;
        if parts.next().is_some() || !is_offset_literal(offset) {
            return Err(malformed());
        }

        let stamp = NaiveDateTime::parse_from_str(
            &format!("{date} {time}"),
            "%Y-%m-%d %H:%M:%S%.f",
        )
        .map_err(|_| malformed())?;

        Ok(Self {
            stamp: truncate_to_seconds(stamp),
            offset: offset.to_string(),
        })
    }
}

impl std::fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.000000 {}",
            self.stamp.format("%Y-%m-%d %H:%M:%S"),
            self.offset
        )
    }
}

/// Normalizes user-supplied date/time input into [`CanonicalDate`].
///
/// Accepts date-only and date+time shapes; anything that does not resolve to
/// valid calendar fields fails with [`DateError::InvalidDate`] rather than
/// producing a malformed string silently.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    offset: String,
}

impl DateFormatter {
    /// Formatter with the given offset literal (e.g. `+0300`)
    #[inline]
    #[must_use]
    pub fn new(offset: impl Into<String>) -> Self {
        Self {
            offset: offset.into(),
        }
    }

    /// Replace the offset literal
    #[inline]
    #[must_use]
    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = offset.into();
        self
    }

    /// Normalize a user-supplied date/time value.
    ///
    /// Accepted shapes, tried in order:
    /// - `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DDTHH:MM` (datetime-local inputs)
    /// - `YYYY-MM-DD HH:MM:SS`
    /// - `YYYY-MM-DD` (midnight)
    ///
    /// # Errors
    /// - `DateError::InvalidDate` when no shape matches
    pub fn format(&self, input: &str) -> Result<CanonicalDate, DateError> {
        let raw = input.trim();
        let stamp = parse_wall_clock(raw)
            .ok_or_else(|| DateError::InvalidDate(input.to_string()))?;
        Ok(CanonicalDate {
            stamp: truncate_to_seconds(stamp),
            offset: self.offset.clone(),
        })
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET)
    }
}

fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    const SHAPES: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
    for shape in SHAPES {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, shape) {
            return Some(stamp);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn truncate_to_seconds(stamp: NaiveDateTime) -> NaiveDateTime {
    stamp.with_nanosecond(0).unwrap_or(stamp)
}

fn is_offset_literal(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 5
        && (bytes[0] == b'+' || bytes[0] == b'-')
        && bytes[1..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_datetime_local_input() {
        let formatter = DateFormatter::default();
        let date = formatter.format("2025-12-31T10:30").unwrap();
        assert_eq!(date.to_string(), "2025-12-31 10:30:00.000000 +0300");
    }

    #[test]
    fn formats_date_only_input_at_midnight() {
        let formatter = DateFormatter::default();
        let date = formatter.format("2025-01-05").unwrap();
        assert_eq!(date.to_string(), "2025-01-05 00:00:00.000000 +0300");
    }

    #[test]
    fn offset_is_configurable() {
        let formatter = DateFormatter::default().with_offset("+0000");
        let date = formatter.format("2025-06-01T08:00:00").unwrap();
        assert_eq!(date.to_string(), "2025-06-01 08:00:00.000000 +0000");
    }

    #[test]
    fn rejects_unparseable_input() {
        let formatter = DateFormatter::default();
        for raw in ["", "not-a-date", "2020-13-40", "31/12/2025", "2020-02-30"] {
            assert!(formatter.format(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn distinct_inputs_stay_distinct_to_second_precision() {
        let formatter = DateFormatter::default();
        let a = formatter.format("2025-12-31T10:30:00").unwrap();
        let b = formatter.format("2025-12-31T10:30:01").unwrap();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn wire_round_trip() {
        let date = CanonicalDate::from_wire("2025-12-31 10:30:00.000000 +0300").unwrap();
        assert_eq!(date.to_string(), "2025-12-31 10:30:00.000000 +0300");
    }

    #[test]
    fn wire_subseconds_are_truncated() {
        let date = CanonicalDate::from_wire("2025-12-31 10:30:00.123456 +0300").unwrap();
        assert_eq!(date.to_string(), "2025-12-31 10:30:00.000000 +0300");
    }

    #[test]
    fn rejects_malformed_wire_strings() {
        for raw in [
            "2025-12-31",
            "2025-12-31 10:30:00",
            "2025-12-31 10:30:00.000000 UTC",
            "2025-12-31 10:30:00.000000 +03",
            "garbage +0300",
        ] {
            assert!(CanonicalDate::from_wire(raw).is_err(), "accepted {raw:?}");
        }
    }
}
