//! Creation-time-ordered identifier generation and timestamp recovery.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::base36::{decode_int, encode_int, encode_int_padded};
use crate::IdError;

/// Width of each fixed timestamp field.
const FIELD_WIDTH: usize = 4;

/// Width of the full timestamp segment.
const STAMP_WIDTH: usize = FIELD_WIDTH * 2;

/// Separator between the timestamp segment and the tie-breaker segment.
const SEPARATOR: char = '-';

/// Process-wide tie-breaker, seeded from sub-second nanoseconds at first
/// use. One atomic read-modify-write per generated identifier.
fn tie_counter() -> &'static AtomicU64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    COUNTER.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::from(d.subsec_nanos()))
            .unwrap_or(0);
        AtomicU64::new(seed)
    })
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The timestamp halves recovered from an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeComponents {
    /// High 16 bits of the Unix timestamp in seconds.
    pub high: u16,
    /// Low 16 bits of the Unix timestamp in seconds.
    pub low: u16,
}

impl TimeComponents {
    /// Recombines the halves into whole seconds since the Unix epoch.
    #[must_use]
    pub fn as_secs(&self) -> u64 {
        (u64::from(self.high) << 16) | u64::from(self.low)
    }

    /// Seconds since the Unix epoch as a float, for ordering and display.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.as_secs() as f64
    }

    /// Calendar time of the identifier's creation second.
    #[must_use]
    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.as_secs() as i64, 0).unwrap_or_default()
    }
}

/// A creation-time-ordered identifier.
///
/// Identifiers are opaque strings to every other crate; only this module
/// knows the layout. They are created once at entity-creation time,
/// immutable thereafter, and never reused.
///
/// Identifiers generated at strictly increasing wall-clock seconds sort
/// lexicographically in non-decreasing order. Within the same second the
/// tie-breaker segment distinguishes identifiers but carries no ordering
/// guarantee of its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(String);

impl Uid {
    /// Generates a fresh identifier with no prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::generate("", now_secs())
    }

    /// Generates a fresh identifier with `prefix` prepended verbatim.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self::generate(prefix, now_secs())
    }

    fn generate(prefix: &str, secs: u64) -> Self {
        let high = (secs >> 16) & 0xFFFF;
        let low = secs & 0xFFFF;
        let tie = tie_counter().fetch_add(1, Ordering::Relaxed);

        let mut s = String::from(prefix);
        s.push_str(&encode_int_padded(high, FIELD_WIDTH));
        s.push_str(&encode_int_padded(low, FIELD_WIDTH));
        s.push(SEPARATOR);
        s.push_str(&encode_int(tie));
        Self(s)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the timestamp halves from a bare identifier.
    pub fn time_components(&self) -> Result<TimeComponents, IdError> {
        self.time_components_after("")
    }

    /// Recovers the timestamp halves from an identifier generated with
    /// `prefix`.
    ///
    /// The tie-breaker segment is ignored; only the two fixed-width
    /// timestamp fields are decoded.
    pub fn time_components_after(&self, prefix: &str) -> Result<TimeComponents, IdError> {
        let body = self.0.strip_prefix(prefix).ok_or(IdError::Malformed {
            reason: "prefix mismatch",
        })?;

        let high_s = body.get(..FIELD_WIDTH).ok_or(IdError::Malformed {
            reason: "timestamp segment truncated",
        })?;
        let low_s = body.get(FIELD_WIDTH..STAMP_WIDTH).ok_or(IdError::Malformed {
            reason: "timestamp segment truncated",
        })?;

        let high = decode_int(high_s)?;
        let low = decode_int(low_s)?;
        if high > u64::from(u16::MAX) || low > u64::from(u16::MAX) {
            return Err(IdError::Malformed {
                reason: "timestamp field overflow",
            });
        }

        Ok(TimeComponents {
            high: high as u16,
            low: low as u16,
        })
    }

    /// Calendar time of a bare identifier's creation second.
    pub fn created_at(&self) -> Result<DateTime<Utc>, IdError> {
        Ok(self.time_components()?.to_datetime())
    }

    /// Parses a bare identifier, validating the full layout: eight
    /// base36 timestamp digits, the separator, and a base36 tie-breaker.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let uid = Self(s.to_string());
        uid.time_components()?;

        let rest = &s[STAMP_WIDTH..];
        let tie = rest.strip_prefix(SEPARATOR).ok_or(IdError::Malformed {
            reason: "missing separator",
        })?;
        decode_int(tie)?;

        Ok(uid)
    }
}

impl Default for Uid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Uid {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Uid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Uid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let uid = Uid::new();
        let s = uid.as_str();
        assert!(s.len() > STAMP_WIDTH);
        assert_eq!(s.chars().nth(STAMP_WIDTH), Some(SEPARATOR));
    }

    #[test]
    fn test_roundtrip() {
        let uid = Uid::new();
        let parsed = Uid::parse(uid.as_str()).unwrap();
        assert_eq!(uid, parsed);
    }

    #[test]
    fn test_timestamp_recovery() {
        let secs = 1_754_000_000u64;
        let uid = Uid::generate("", secs);
        let tc = uid.time_components().unwrap();
        assert_eq!(tc.as_secs(), secs);
        assert_eq!(tc.high, (secs >> 16) as u16);
        assert_eq!(tc.low, (secs & 0xFFFF) as u16);
    }

    #[test]
    fn test_prefix_stripped_before_parsing() {
        let secs = 1_754_000_000u64;
        let uid = Uid::generate("win-", secs);
        assert!(uid.as_str().starts_with("win-"));

        let tc = uid.time_components_after("win-").unwrap();
        assert_eq!(tc.as_secs(), secs);

        let err = uid.time_components_after("other-").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_sorts_by_generation_time() {
        // Strictly increasing wall-clock seconds must yield identifiers
        // that compare non-decreasing as strings, regardless of the
        // tie-breaker values.
        let mut prev = Uid::generate("", 1_754_000_000);
        for delta in 1..200u64 {
            let next = Uid::generate("", 1_754_000_000 + delta);
            assert!(prev.as_str() < next.as_str(), "{prev} !< {next}");
            prev = next;
        }
    }

    #[test]
    fn test_same_second_ids_are_distinct() {
        let a = Uid::generate("", 1_754_000_000);
        let b = Uid::generate("", 1_754_000_000);
        assert_ne!(a, b);
    }

    #[test]
    fn test_too_short_is_malformed() {
        let err = Uid::parse("0L102K").unwrap_err();
        assert_eq!(
            err,
            IdError::Malformed {
                reason: "timestamp segment truncated"
            }
        );
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let err = Uid::parse("0L101A9Z2F").unwrap_err();
        assert_eq!(
            err,
            IdError::Malformed {
                reason: "missing separator"
            }
        );
    }

    #[test]
    fn test_invalid_digit_propagates() {
        let err = Uid::parse("0l101A9Z-2F").unwrap_err();
        assert_eq!(err, IdError::InvalidDigit('l'));
    }

    #[test]
    fn test_empty_tie_segment_parses() {
        // decode_int treats the empty string as zero, so a bare separator
        // tail is tolerated on input.
        let uid = Uid::parse("0L101A9Z-").unwrap();
        assert!(uid.time_components().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let uid = Uid::new();
        let json = serde_json::to_string(&uid).unwrap();
        let parsed: Uid = serde_json::from_str(&json).unwrap();
        assert_eq!(uid, parsed);
    }

    #[test]
    fn test_datetime_conversion() {
        let secs = 1_754_000_000u64;
        let uid = Uid::generate("", secs);
        let dt = uid.created_at().unwrap();
        assert_eq!(dt.timestamp(), secs as i64);
    }
}
