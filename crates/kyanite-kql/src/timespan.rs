//! Text codec for the KQL timespan format `[-][d.]hh:mm:ss[.fffffff]`.
//!
//! The fractional segment counts 100-nanosecond ticks and is always
//! exactly seven digits when present. The `d.` days prefix is only
//! emitted when the duration spans at least one full day.

use chrono::TimeDelta;

use crate::error::{KqlError, Result};

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_TICK: i64 = 100;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Formats a duration as `[-][d.]hh:mm:ss[.fffffff]`.
pub fn format_timespan(d: TimeDelta) -> String {
    let neg = d < TimeDelta::zero();
    let d = if neg { -d } else { d };

    let total_seconds = d.num_seconds();
    let days = total_seconds / SECONDS_PER_DAY;
    let hours = (total_seconds % SECONDS_PER_DAY) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    let ticks = i64::from(d.subsec_nanos()) / NANOS_PER_TICK;

    let mut out = String::new();
    if neg {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&days.to_string());
        out.push('.');
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}

/// Parses a `[-][d.]hh:mm:ss[.fffffff]` string back into a duration.
///
/// The days segment and the fractional segment are both optional; a
/// fraction shorter than seven digits is right-padded with zeros, a
/// longer one is truncated to tick precision.
pub fn parse_timespan(s: &str) -> Result<TimeDelta> {
    let fail = |reason: &str| KqlError::InvalidTimespan {
        input: s.to_string(),
        reason: reason.to_string(),
    };

    let (neg, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    // A '.' before the first ':' separates the days segment.
    let (days, rest) = match (rest.find('.'), rest.find(':')) {
        (Some(dot), colon) if colon.is_none_or(|c| dot < c) => {
            let days: i64 = rest[..dot].parse().map_err(|_| fail("invalid days segment"))?;
            (days, &rest[dot + 1..])
        }
        _ => (0_i64, rest),
    };

    let mut fields = rest.splitn(3, ':');
    let hours: i64 = fields
        .next()
        .ok_or_else(|| fail("expected hh:mm:ss"))?
        .parse()
        .map_err(|_| fail("invalid hours segment"))?;
    let minutes: i64 = fields
        .next()
        .ok_or_else(|| fail("expected hh:mm:ss"))?
        .parse()
        .map_err(|_| fail("invalid minutes segment"))?;
    let sec_field = fields.next().ok_or_else(|| fail("expected hh:mm:ss"))?;

    let (sec_str, frac_str) = match sec_field.split_once('.') {
        Some((sec, frac)) => (sec, Some(frac)),
        None => (sec_field, None),
    };
    let seconds: i64 = sec_str.parse().map_err(|_| fail("invalid seconds segment"))?;

    let ticks: i64 = match frac_str {
        Some(frac) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(fail("invalid fractional segment"));
            }
            let mut digits = frac.to_string();
            digits.truncate(7);
            while digits.len() < 7 {
                digits.push('0');
            }
            digits.parse().map_err(|_| fail("invalid fractional segment"))?
        }
        None => 0,
    };

    let total_ticks = days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|v| v.checked_add(hours * 3_600 + minutes * 60 + seconds))
        .and_then(|secs| secs.checked_mul(TICKS_PER_SECOND))
        .and_then(|v| v.checked_add(ticks))
        .ok_or_else(|| fail("duration out of range"))?;
    let total_nanos = total_ticks
        .checked_mul(NANOS_PER_TICK)
        .ok_or_else(|| fail("duration out of range"))?;

    let d = TimeDelta::nanoseconds(total_nanos);
    Ok(if neg { -d } else { d })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TimeDelta::zero(), "00:00:00"; "zero")]
    #[test_case(TimeDelta::seconds(5), "00:00:05"; "five seconds")]
    #[test_case(TimeDelta::seconds(90_000), "1.01:00:00"; "one day one hour")]
    #[test_case(-TimeDelta::seconds(5), "-00:00:05"; "negative")]
    #[test_case(
        TimeDelta::seconds(93_784) + TimeDelta::nanoseconds(123_456_700),
        "1.02:03:04.1234567";
        "full form"
    )]
    #[test_case(TimeDelta::milliseconds(500), "00:00:00.5000000"; "fraction only")]
    fn formats(d: TimeDelta, expected: &str) {
        assert_eq!(format_timespan(d), expected);
    }

    #[test_case("00:00:00", 0; "zero")]
    #[test_case("00:00:05", 5_000_000_000; "five seconds")]
    #[test_case("1.01:00:00", 90_000_000_000_000; "one day one hour")]
    #[test_case("-00:00:05", -5_000_000_000; "negative")]
    #[test_case("00:00:00.5", 500_000_000; "short fraction pads")]
    #[test_case("00:00:00.12345678", 12_345_670; "long fraction truncates to ticks")]
    fn parses(s: &str, nanos: i64) {
        assert_eq!(parse_timespan(s).unwrap(), TimeDelta::nanoseconds(nanos));
    }

    #[test]
    fn round_trips() {
        for d in [
            TimeDelta::zero(),
            TimeDelta::seconds(5),
            TimeDelta::seconds(90_000),
            -TimeDelta::seconds(90_061) - TimeDelta::nanoseconds(7_600),
            TimeDelta::nanoseconds(100),
        ] {
            assert_eq!(parse_timespan(&format_timespan(d)).unwrap(), d);
        }
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "5", "00:00", "aa:bb:cc", "00:00:00.", "00:00:00.12x"] {
            assert!(parse_timespan(bad).is_err(), "accepted {bad:?}");
        }
    }
}
