//! Time values on the wire
//!
//! A wire time is an object carrying `epoch_time` (fractional seconds since
//! 1970-01-01T00:00:00Z) and `timezone`. Seconds are moved between `f64` and
//! nanosecond instants through exact decimal arithmetic, so a value like
//! `1147162826.5` keeps exactly half a second.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::errors::{TemporalError, TemporalResult};
use super::timezone::{format_offset, parse_offset};

/// Field holding fractional epoch seconds
pub const EPOCH_TIME_FIELD: &str = "epoch_time";
/// Field holding the `Z` / `±HH:MM` offset
pub const TIMEZONE_FIELD: &str = "timezone";
/// Pseudo-type tag written on outgoing time literals
pub const PSEUDO_TYPE_FIELD: &str = "$reql_type$";
/// Pseudo-type value for times
pub const TIME_PSEUDO_TYPE: &str = "TIME";

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// A decoded wire time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalValue {
    /// Absolute instant, timezone discarded
    Unzoned(DateTime<Utc>),
    /// Absolute instant shown as wall-clock time at a fixed offset
    Zoned(DateTime<FixedOffset>),
}

impl TemporalValue {
    /// Decode a wire time. Zoned when a `timezone` field is present.
    pub fn decode(datum: &Value) -> TemporalResult<Self> {
        let object = as_object(datum)?;
        if object.contains_key(TIMEZONE_FIELD) {
            decode_zoned(datum).map(TemporalValue::Zoned)
        } else {
            decode_unzoned(datum).map(TemporalValue::Unzoned)
        }
    }

    /// Encode as a wire time literal
    pub fn encode(&self) -> Value {
        match self {
            TemporalValue::Unzoned(instant) => encode_unzoned(instant),
            TemporalValue::Zoned(instant) => encode_zoned(instant),
        }
    }

    /// The instant in UTC, whichever variant
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            TemporalValue::Unzoned(instant) => *instant,
            TemporalValue::Zoned(instant) => instant.with_timezone(&Utc),
        }
    }
}

impl From<DateTime<Utc>> for TemporalValue {
    fn from(instant: DateTime<Utc>) -> Self {
        TemporalValue::Unzoned(instant)
    }
}

impl From<DateTime<FixedOffset>> for TemporalValue {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        TemporalValue::Zoned(instant)
    }
}

/// Decode a wire time as a timezone-less instant. Any `timezone` is ignored.
pub fn decode_unzoned(datum: &Value) -> TemporalResult<DateTime<Utc>> {
    let object = as_object(datum)?;
    epoch_to_instant(epoch_field(object)?)
}

/// Decode a wire time as a zoned instant
pub fn decode_zoned(datum: &Value) -> TemporalResult<DateTime<FixedOffset>> {
    let object = as_object(datum)?;
    let instant = epoch_to_instant(epoch_field(object)?)?;
    let tz = match object.get(TIMEZONE_FIELD) {
        None => return Err(TemporalError::MissingField(TIMEZONE_FIELD)),
        Some(Value::String(tz)) => tz,
        Some(_) => {
            return Err(TemporalError::WrongFieldType {
                field: TIMEZONE_FIELD,
                expected: "string",
            })
        }
    };
    let offset = parse_offset(tz)?;
    Ok(instant.with_timezone(&offset))
}

/// Encode a timezone-less instant; its timezone is written as `Z`
pub fn encode_unzoned(instant: &DateTime<Utc>) -> Value {
    time_object(instant_to_epoch(instant), "Z".to_string())
}

/// Encode a zoned instant with its offset
pub fn encode_zoned(instant: &DateTime<FixedOffset>) -> Value {
    time_object(instant_to_epoch(instant), format_offset(instant.offset()))
}

/// Convert fractional epoch seconds into a nanosecond-precision instant
pub fn epoch_to_instant(epoch: f64) -> TemporalResult<DateTime<Utc>> {
    let out_of_range = || TemporalError::EpochOutOfRange(epoch);
    if !epoch.is_finite() {
        return Err(out_of_range());
    }

    // Display yields the shortest decimal that round-trips to the same f64
    let exact = Decimal::from_str(&epoch.to_string()).map_err(|_| out_of_range())?;
    let total_nanos = exact
        .checked_mul(Decimal::from(NANOS_PER_SECOND as i64))
        .ok_or_else(out_of_range)?
        .round()
        .to_i128()
        .ok_or_else(out_of_range)?;

    let secs = i64::try_from(total_nanos.div_euclid(NANOS_PER_SECOND)).map_err(|_| out_of_range())?;
    let nanos = total_nanos.rem_euclid(NANOS_PER_SECOND) as u32;

    DateTime::from_timestamp(secs, nanos).ok_or_else(out_of_range)
}

/// Convert an instant into fractional epoch seconds
pub fn instant_to_epoch<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let exact = Decimal::from(instant.timestamp())
        + Decimal::new(i64::from(instant.timestamp_subsec_nanos()), 9);
    exact
        .normalize()
        .to_string()
        .parse()
        .unwrap_or(instant.timestamp() as f64)
}

fn time_object(epoch: f64, timezone: String) -> Value {
    let mut object = Map::new();
    object.insert(
        PSEUDO_TYPE_FIELD.to_string(),
        Value::String(TIME_PSEUDO_TYPE.to_string()),
    );
    object.insert(EPOCH_TIME_FIELD.to_string(), Value::from(epoch));
    object.insert(TIMEZONE_FIELD.to_string(), Value::String(timezone));
    Value::Object(object)
}

fn as_object(datum: &Value) -> TemporalResult<&Map<String, Value>> {
    datum
        .as_object()
        .ok_or_else(|| TemporalError::NotAnObject(crate::protocol::datum_kind(datum)))
}

fn epoch_field(object: &Map<String, Value>) -> TemporalResult<f64> {
    match object.get(EPOCH_TIME_FIELD) {
        None => Err(TemporalError::MissingField(EPOCH_TIME_FIELD)),
        Some(value) => value.as_f64().ok_or(TemporalError::WrongFieldType {
            field: EPOCH_TIME_FIELD,
            expected: "number",
        }),
    }
}
