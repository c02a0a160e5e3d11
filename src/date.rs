//! Date text in the `Date.prototype.toJSON` format.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, Duration, Month,
    OffsetDateTime, PrimitiveDateTime, Time,
};

/// Largest magnitude of a valid time value, in milliseconds.
const MAX_TIME: f64 = 8.64e15;

/// `YYYY-MM-DDTHH:mm:ss.sssZ`, or `None` for an invalid date.
pub fn to_json_text(time: f64) -> Option<String> {
    if !time.is_finite() || time.abs() > MAX_TIME {
        return None;
    }
    let instant = OffsetDateTime::UNIX_EPOCH.checked_add(Duration::milliseconds(time.trunc() as i64))?;
    let year = instant.year();
    let year = if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else {
        format!("{year:+07}")
    };
    Some(format!(
        "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        u8::from(instant.month()),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.second(),
        instant.millisecond(),
    ))
}

/// Parses an RFC 3339 timestamp, or the six-digit signed year form, into
/// milliseconds since the epoch. Times outside the valid range yield `None`.
pub fn parse_json_text(text: &str) -> Option<f64> {
    let instant = match OffsetDateTime::parse(text, &Rfc3339) {
        Ok(instant) => instant,
        Err(_) => parse_extended_year(text)?,
    };
    let millis = (instant.unix_timestamp_nanos() / 1_000_000) as f64;
    (millis.abs() <= MAX_TIME).then_some(millis)
}

/// `±YYYYYY-MM-DDTHH:mm:ss.sssZ`.
fn parse_extended_year(text: &str) -> Option<OffsetDateTime> {
    let sign = match text.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits = text.get(1..7)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = sign * digits.parse::<i32>().ok()?;
    let (date, clock) = text.get(7..)?.strip_prefix('-')?.split_once('T')?;
    let (month, day) = date.split_once('-')?;
    if month.len() != 2 || day.len() != 2 {
        return None;
    }
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let date = Date::from_calendar_date(year, month, day.parse().ok()?).ok()?;
    let clock = Time::parse(
        clock,
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]Z"),
    )
    .ok()?;
    Some(PrimitiveDateTime::new(date, clock).assume_utc())
}
