//! Value type parsers for iCalendar (RFC 5545 §3.3).
//!
//! Values parse directly into `chrono` types; zoned DATE-TIME values are
//! resolved to UTC through `chrono-tz`.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::{ParseError, ParseErrorKind, ParseResult};

/// Parses a DATE value (RFC 5545 §3.3.4), format `YYYYMMDD`.
///
/// ## Errors
/// Returns an error if the string is not a valid 8-digit date.
pub fn parse_date(s: &str) -> ParseResult<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::value(ParseErrorKind::InvalidDate).with_context(s.to_string()));
    }

    NaiveDate::parse_from_str(s, "%Y%m%d")
        .map_err(|_e| ParseError::value(ParseErrorKind::InvalidDate).with_context(s.to_string()))
}

/// Parses a TIME value (RFC 5545 §3.3.12), format `HHMMSS[Z]`.
///
/// Returns the time and whether it was marked UTC.
///
/// ## Errors
/// Returns an error if the string is not a valid 6-digit time.
pub fn parse_time(s: &str) -> ParseResult<(NaiveTime, bool)> {
    let (time_str, is_utc) = match s.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };

    if time_str.len() != 6 || !time_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::value(ParseErrorKind::InvalidTime).with_context(s.to_string()));
    }

    let time = NaiveTime::parse_from_str(time_str, "%H%M%S")
        .map_err(|_e| ParseError::value(ParseErrorKind::InvalidTime).with_context(s.to_string()))?;

    Ok((time, is_utc))
}

/// Parses a DATE-TIME value (RFC 5545 §3.3.5) and resolves it to UTC.
///
/// Format: `YYYYMMDD"T"HHMMSS[Z]`. A trailing `Z` wins over any `TZID`;
/// a `TZID` parameter resolves the local time through the named zone;
/// floating times (neither) are treated as UTC.
///
/// ## Errors
/// Returns an error for malformed values, unknown timezone names, or
/// local times that fall into a DST gap.
pub fn parse_datetime(s: &str, tzid: Option<&str>) -> ParseResult<DateTime<Utc>> {
    let (date_str, time_str) = s
        .split_once('T')
        .ok_or_else(|| ParseError::value(ParseErrorKind::InvalidDateTime).with_context(s.to_string()))?;

    let date = parse_date(date_str)?;
    let (time, is_utc) = parse_time(time_str)?;
    let naive = date.and_time(time);

    if is_utc {
        return Ok(naive.and_utc());
    }

    let Some(tzid) = tzid else {
        // Floating time: interpreted as UTC.
        return Ok(naive.and_utc());
    };

    let tz: Tz = tzid.parse().map_err(|_e| {
        ParseError::value(ParseErrorKind::UnknownTimezone).with_context(tzid.to_string())
    })?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(resolved) => Ok(resolved.with_timezone(&Utc)),
        // Fall-back transition: pick the earlier occurrence.
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(ParseError::value(ParseErrorKind::InvalidDateTime)
            .with_context(format!("{s} does not exist in {tzid}"))),
    }
}

/// Parses a DURATION value (RFC 5545 §3.3.6).
///
/// Format: `[+|-]P[nW]` or `[+|-]P[nD][T[nH][nM][nS]]`.
///
/// ## Errors
/// Returns an error if the string is not a valid duration.
pub fn parse_duration(s: &str) -> ParseResult<Duration> {
    let invalid = || ParseError::value(ParseErrorKind::InvalidDuration).with_context(s.to_string());

    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let body = rest.strip_prefix('P').ok_or_else(invalid)?;
    if body.is_empty() {
        return Err(invalid());
    }

    let (date_part, time_part) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let mut total = Duration::zero();
    accumulate_units(date_part, false, &mut total).map_err(|()| invalid())?;
    if let Some(time_part) = time_part {
        if time_part.is_empty() {
            return Err(invalid());
        }
        accumulate_units(time_part, true, &mut total).map_err(|()| invalid())?;
    }

    Ok(if negative { -total } else { total })
}

/// Accumulates `<digits><unit>` pairs from one duration section.
fn accumulate_units(section: &str, is_time: bool, total: &mut Duration) -> Result<(), ()> {
    let mut digits = String::new();

    for c in section.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let n: i64 = digits.parse().map_err(|_e| ())?;
        digits.clear();

        let unit = match (is_time, c) {
            (false, 'W') => Duration::try_weeks(n),
            (false, 'D') => Duration::try_days(n),
            (true, 'H') => Duration::try_hours(n),
            (true, 'M') => Duration::try_minutes(n),
            (true, 'S') => Duration::try_seconds(n),
            _ => None,
        };
        *total += unit.ok_or(())?;
    }

    // Trailing digits without a unit letter are malformed.
    if digits.is_empty() { Ok(()) } else { Err(()) }
}

/// Resolves TEXT escapes (RFC 5545 §3.3.11): `\\`, `\;`, `\,`, `\n`/`\N`.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => result.push('\n'),
            Some(escaped) => result.push(escaped),
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_valid() {
        assert_eq!(
            parse_date("20260805").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
        );
    }

    #[test]
    fn date_rejects_bad_input() {
        assert!(parse_date("2026085").is_err());
        assert!(parse_date("20261305").is_err());
        assert!(parse_date("2026-8-5").is_err());
    }

    #[test]
    fn datetime_utc_form() {
        let dt = parse_datetime("20260805T100000Z", None).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap());
    }

    #[test]
    fn datetime_zoned_form() {
        // Berlin is UTC+2 in August.
        let dt = parse_datetime("20260805T100000", Some("Europe/Berlin")).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 8, 5, 8, 0, 0).unwrap());
    }

    #[test]
    fn datetime_floating_is_utc() {
        let dt = parse_datetime("20260805T100000", None).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap());
    }

    #[test]
    fn datetime_unknown_timezone() {
        let err = parse_datetime("20260805T100000", Some("Mars/Olympus")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownTimezone);
    }

    #[test]
    fn duration_day_time_form() {
        assert_eq!(
            parse_duration("P1DT2H30M").unwrap(),
            Duration::days(1) + Duration::hours(2) + Duration::minutes(30)
        );
    }

    #[test]
    fn duration_week_form() {
        assert_eq!(parse_duration("P2W").unwrap(), Duration::weeks(2));
    }

    #[test]
    fn duration_negative() {
        assert_eq!(parse_duration("-PT15M").unwrap(), -Duration::minutes(15));
    }

    #[test]
    fn duration_rejects_bad_input() {
        assert!(parse_duration("P").is_err());
        assert!(parse_duration("1DT2H").is_err());
        assert!(parse_duration("P1X").is_err());
        assert!(parse_duration("P1DT").is_err());
        assert!(parse_duration("PT5").is_err());
    }

    #[test]
    fn unescape_resolves_sequences() {
        assert_eq!(unescape_text("a\\,b\\;c\\\\d\\ne"), "a,b;c\\d\ne");
    }
}
