use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp shapes seen from the log service and from `datetime-local`
/// inputs. Values carrying an offset keep it; values without one are wall-clock time
/// in `zone` (the browser's local zone in the dashboard).
pub fn parse_instant<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    let wall_clock = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())?;
    // Skipped by a DST jump: no such local time.
    zone.from_local_datetime(&wall_clock)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}

/// Cuts fractional seconds down to milliseconds: `12:00:00.123456Z` -> `12:00:00.123Z`.
pub fn truncate_to_millis(raw: &str) -> String {
    static EXTRA_DIGITS: OnceLock<Regex> = OnceLock::new();
    let pattern =
        EXTRA_DIGITS.get_or_init(|| Regex::new(r"(\.\d{3})\d+").expect("valid fraction pattern"));
    pattern.replace(raw, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn kolkata() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    #[test]
    fn datetime_local_input_without_seconds() {
        assert_eq!(parse_instant("2024-01-01T10:30", &Utc), Some(at(10, 30, 0)));
    }

    #[test]
    fn wall_clock_values_follow_the_given_zone() {
        assert_eq!(parse_instant("2024-01-01T10:00", &kolkata()), Some(at(4, 30, 0)));
        let fractional = parse_instant("2024-01-01 10:00:00.5", &kolkata());
        assert_eq!(fractional.map(|t| t.timestamp_subsec_millis()), Some(500));
    }

    #[test]
    fn explicit_offsets_ignore_the_zone() {
        assert_eq!(
            parse_instant("2024-01-01T12:00:00+02:00", &kolkata()),
            Some(at(10, 0, 0))
        );
        assert_eq!(parse_instant("2024-01-01T10:00:00Z", &kolkata()), Some(at(10, 0, 0)));
    }

    #[test]
    fn python_isoformat_with_microseconds() {
        let parsed = parse_instant("2024-01-01T10:00:00.123456+00:00", &Utc).unwrap();
        assert_eq!(parsed.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(parse_instant("yesterday", &Utc), None);
        assert_eq!(parse_instant("", &Utc), None);
    }

    #[test]
    fn only_digits_past_the_millisecond_are_dropped() {
        assert_eq!(
            truncate_to_millis("2024-01-01T10:00:00.123456789Z"),
            "2024-01-01T10:00:00.123Z"
        );
        assert_eq!(truncate_to_millis("2024-01-01T10:00:00.12Z"), "2024-01-01T10:00:00.12Z");
        assert_eq!(truncate_to_millis("2024-01-01T10:00:00Z"), "2024-01-01T10:00:00Z");
    }
}
