//! Timezone offset strings
//!
//! Wire grammar: `"Z"` for UTC, otherwise `[+-]?HH:MM`. A missing sign means
//! a positive offset. The canonical encoding of a zero offset is `"Z"`.

use chrono::FixedOffset;

use super::errors::{TemporalError, TemporalResult};

/// Largest representable offset magnitude, 23:59
pub const MAX_OFFSET_MINUTES: i32 = 23 * 60 + 59;

/// Parse a wire timezone string into an offset in minutes east of UTC
pub fn parse_offset_minutes(tz: &str) -> TemporalResult<i32> {
    if tz == "Z" {
        return Ok(0);
    }

    let invalid = || TemporalError::InvalidTimezone(tz.to_string());

    let (sign, rest) = match tz.as_bytes().first() {
        Some(b'+') => (1, &tz[1..]),
        Some(b'-') => (-1, &tz[1..]),
        Some(_) => (1, tz),
        None => return Err(invalid()),
    };

    let bytes = rest.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    let hours = two_digits(&bytes[0..2]).ok_or_else(invalid)?;
    let minutes = two_digits(&bytes[3..5]).ok_or_else(invalid)?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Parse a wire timezone string into a chrono offset
pub fn parse_offset(tz: &str) -> TemporalResult<FixedOffset> {
    let minutes = parse_offset_minutes(tz)?;
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| TemporalError::InvalidTimezone(tz.to_string()))
}

/// Format an offset in minutes as `Z` or `±HH:MM`
pub fn format_offset_minutes(minutes: i32) -> String {
    if minutes == 0 {
        return "Z".to_string();
    }
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// Format a chrono offset in wire form
pub fn format_offset(offset: &FixedOffset) -> String {
    // Sub-minute offsets do not exist on the wire
    format_offset_minutes(offset.local_minus_utc() / 60)
}

fn two_digits(bytes: &[u8]) -> Option<i32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(i32::from(a - b'0') * 10 + i32::from(b - b'0'))
        }
        _ => None,
    }
}
