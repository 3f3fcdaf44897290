//! Time Utilities

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 without an offset. Naive values are
/// local wall-clock time, as older tools wrote them; a local time skipped by a
/// DST jump falls back to UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| {
            Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc())
        })
}

/// Format a timestamp as RFC 3339 string
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Whole days elapsed between `then` and `now`, floored.
pub fn days_since(then: &DateTime<Utc>, now: &DateTime<Utc>) -> i64 {
    (*now - *then).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Base learning id for a creation time: `YYYYMMDD_HHMMSS`
pub fn learning_id(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);

        let offset = parse_timestamp("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(offset, dt);
    }

    #[test]
    fn test_parse_naive_iso_as_local_time() {
        let dt = parse_timestamp("2024-01-15T10:30:00.123456").unwrap();
        let local = dt.with_timezone(&Local);
        assert_eq!(local.hour(), 10);
        assert_eq!(local.minute(), 30);

        let naive = NaiveDateTime::parse_from_str("2024-01-15 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_timestamp("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15 10:30:00"), Some(expected));

    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
    }

    #[test]
    fn test_format_roundtrip() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&format_timestamp(&now)), Some(now));
    }

    #[test]
    fn test_days_since_floors() {
        let then = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(days_since(&then, &then), 0);
        assert_eq!(days_since(&then, &(then + Duration::hours(23))), 0);
        assert_eq!(days_since(&then, &(then + Duration::hours(49))), 2);
        assert_eq!(days_since(&then, &(then - Duration::hours(1))), -1);
    }

    #[test]
    fn test_learning_id_format() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 5).unwrap();
        assert_eq!(learning_id(&dt), "20240115_103005");
    }
}
