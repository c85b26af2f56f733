//! Time-of-day parsing and UTC timestamp arithmetic.
//!
//! Start times are typed as `HH:MM:SS` with an optional `,mmm` millisecond
//! suffix. The suffix is an integer count of milliseconds, so `,5` means 5 ms.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeParseError {
    #[error("invalid time of day '{0}' (expected HH:MM:SS[,mmm])")]
    InvalidTimeOfDay(String),
    #[error("invalid timestamp '{0}' (expected ISO-8601, e.g. 2024-07-29T03:45:12)")]
    InvalidTimestamp(String),
    #[error("shift of {0} s is not a finite number")]
    InvalidShift(f64),
    #[error("timestamp out of range")]
    OutOfRange,
}

fn parse_field(raw: &str, max: u32) -> Option<u32> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let v: u32 = raw.parse().ok()?;
    (v <= max).then_some(v)
}

fn parse_millis(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let v: u32 = raw.parse().ok()?;
    (v < 1000).then_some(v)
}

/// Parse `HH:MM:SS` or `HH:MM:SS,mmm`.
pub fn parse_time_with_ms(input: &str) -> Result<NaiveTime, TimeParseError> {
    let invalid = || TimeParseError::InvalidTimeOfDay(input.to_string());
    let text = input.trim();
    let (main, ms) = match text.split_once(',') {
        Some((main, ms)) => (main, Some(ms)),
        None => (text, None),
    };
    let mut fields = main.split(':');
    let (Some(h), Some(m), Some(s), None) = (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid());
    };
    let hour = parse_field(h, 23).ok_or_else(invalid)?;
    let minute = parse_field(m, 59).ok_or_else(invalid)?;
    let second = parse_field(s, 59).ok_or_else(invalid)?;
    let millis = match ms {
        Some(raw) => parse_millis(raw).ok_or_else(invalid)?,
        None => 0,
    };
    NaiveTime::from_hms_milli_opt(hour, minute, second, millis).ok_or_else(invalid)
}

/// `HH:MM:SS,mmm`, milliseconds truncated.
pub fn format_time_with_ms(t: NaiveTime) -> String {
    let millis = (t.nanosecond() / 1_000_000).min(999);
    format!("{},{:03}", t.format("%H:%M:%S"), millis)
}

pub fn format_hms(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

/// `date + time + shift_seconds`, with the shift rounded to the microsecond.
pub fn combine(
    date: NaiveDate,
    time: NaiveTime,
    shift_seconds: f64,
) -> Result<DateTime<Utc>, TimeParseError> {
    if !shift_seconds.is_finite() {
        return Err(TimeParseError::InvalidShift(shift_seconds));
    }
    let micros = (shift_seconds * 1e6).round();
    if micros.abs() >= i64::MAX as f64 {
        return Err(TimeParseError::OutOfRange);
    }
    date.and_time(time)
        .checked_add_signed(Duration::microseconds(micros as i64))
        .map(|dt| dt.and_utc())
        .ok_or(TimeParseError::OutOfRange)
}

/// `t + secs` at nanosecond resolution. `None` on overflow or non-finite input.
pub fn add_seconds(t: DateTime<Utc>, secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let nanos = (secs * 1e9).round();
    if nanos.abs() >= i64::MAX as f64 {
        return None;
    }
    t.checked_add_signed(Duration::nanoseconds(nanos as i64))
}

/// `b - a` in seconds.
pub fn seconds_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    let d = b - a;
    match d.num_nanoseconds() {
        Some(n) => n as f64 * 1e-9,
        None => d.num_milliseconds() as f64 * 1e-3,
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Absolute ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let text = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = text.strip_suffix('Z').unwrap_or(text);
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(TimeParseError::InvalidTimestamp(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms_milli(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    #[test]
    fn parses_plain_and_millisecond_forms() {
        assert_eq!(parse_time_with_ms("03:45:12").unwrap(), hms_milli(3, 45, 12, 0));
        assert_eq!(parse_time_with_ms("03:45:12,250").unwrap(), hms_milli(3, 45, 12, 250));
        assert_eq!(parse_time_with_ms("3:5:1").unwrap(), hms_milli(3, 5, 1, 0));
        assert_eq!(parse_time_with_ms("  23:59:59,999 ").unwrap(), hms_milli(23, 59, 59, 999));
    }

    #[test]
    fn millisecond_suffix_is_an_integer_count() {
        assert_eq!(parse_time_with_ms("12:00:00,5").unwrap(), hms_milli(12, 0, 0, 5));
        assert_eq!(parse_time_with_ms("12:00:00,050").unwrap(), hms_milli(12, 0, 0, 50));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in [
            "", "12:00", "12:00:00:00", "24:00:00", "12:60:00", "12:00:60", "ab:cd:ef",
            "12:00:00,", "12:00:00,1000", "12:00:00,1,2", "12:00:00,-5", "123:00:00",
        ] {
            let err = parse_time_with_ms(bad).unwrap_err();
            assert!(err.to_string().contains(bad.trim()), "{bad:?} -> {err}");
        }
    }

    #[test]
    fn format_pads_milliseconds_to_three_digits() {
        assert_eq!(format_time_with_ms(hms_milli(1, 2, 3, 5)), "01:02:03,005");
        assert_eq!(format_time_with_ms(hms_milli(1, 2, 3, 0)), "01:02:03,000");
        let t = NaiveTime::from_hms_micro_opt(1, 2, 3, 999_999).unwrap();
        assert_eq!(format_time_with_ms(t), "01:02:03,999");
    }

    #[test]
    fn format_then_parse_keeps_milliseconds() {
        let t = NaiveTime::from_hms_micro_opt(17, 8, 9, 123_456).unwrap();
        let back = parse_time_with_ms(&format_time_with_ms(t)).unwrap();
        assert_eq!(back, hms_milli(17, 8, 9, 123));
    }

    #[test]
    fn combine_applies_fractional_and_negative_shift() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 29).unwrap();
        let t = hms_milli(3, 45, 12, 0);
        let fwd = combine(date, t, 1.5).unwrap();
        assert_eq!(format_time_with_ms(fwd.time()), "03:45:13,500");
        let back = combine(date, t, -0.25).unwrap();
        assert_eq!(format_time_with_ms(back.time()), "03:45:11,750");
    }

    #[test]
    fn combine_crosses_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let dt = combine(date, hms_milli(23, 59, 59, 0), 2.0).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(format_hms(dt.time()), "00:00:01");
    }

    #[test]
    fn combine_rejects_non_finite_shift() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            combine(date, NaiveTime::MIN, f64::NAN),
            Err(TimeParseError::InvalidShift(_))
        ));
        assert_eq!(combine(date, NaiveTime::MIN, 1e300), Err(TimeParseError::OutOfRange));
    }

    #[test]
    fn seconds_arithmetic_is_symmetric() {
        let a = parse_timestamp("2024-07-29T03:45:12").unwrap();
        let b = add_seconds(a, 60.125).unwrap();
        assert!((seconds_between(a, b) - 60.125).abs() < 1e-9);
        assert!((seconds_between(b, a) + 60.125).abs() < 1e-9);
        assert!(add_seconds(a, f64::INFINITY).is_none());
    }

    #[test]
    fn parses_iso_timestamps() {
        let expect = NaiveDate::from_ymd_opt(2024, 7, 29)
            .unwrap()
            .and_hms_opt(3, 45, 12)
            .unwrap()
            .and_utc();
        assert_eq!(parse_timestamp("2024-07-29T03:45:12").unwrap(), expect);
        assert_eq!(parse_timestamp("2024-07-29T03:45:12Z").unwrap(), expect);
        assert_eq!(parse_timestamp("2024-07-29 03:45:12").unwrap(), expect);
        assert_eq!(parse_timestamp("2024-07-29T05:45:12+02:00").unwrap(), expect);
        let frac = parse_timestamp("2024-07-29T03:45:12.5").unwrap();
        assert_eq!(format_time_with_ms(frac.time()), "03:45:12,500");
        assert_eq!(format_hms(parse_timestamp("2024-07-29").unwrap().time()), "00:00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
