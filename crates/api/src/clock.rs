//! Time source abstraction.
//!
//! Document timestamps (`createdAt`, `updatedAt`, `lastLoginAt`) are stamped
//! by the server, so stores take their time from a [`Clock`] rather than
//! calling `Utc::now()` directly. Tests swap in a fixed clock to assert on
//! exact timestamp values.

use chrono::{DateTime, SecondsFormat, Utc};

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current moment in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Format a timestamp the way it is stored on documents.
///
/// Millisecond precision with a `Z` suffix, e.g. `2026-01-15T12:00:00.000Z`.
#[must_use]
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_timestamp_millis_utc() {
        let t = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(t), "2026-01-15T12:00:00.000Z");
    }

    #[test]
    fn test_format_timestamp_truncates_to_millis() {
        let t = Utc
            .with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        assert_eq!(format_timestamp(t), "2026-01-15T12:00:00.123Z");
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
