//! Datums and typed decoding
//!
//! A datum is the structural wire value: null, boolean, number, string,
//! array or object. `FromDatum` turns one datum into a caller-chosen type.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DriverError, DriverResult};
use crate::temporal::{self, TemporalValue};

/// Structural wire value
pub type Datum = Value;

/// Short name of a datum's shape, for error messages
pub fn datum_kind(datum: &Datum) -> &'static str {
    match datum {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A type that can be decoded from one datum
pub trait FromDatum: Sized {
    fn from_datum(datum: Datum) -> DriverResult<Self>;
}

fn mismatch<T>(expected: &'static str, datum: &Datum) -> DriverResult<T> {
    Err(DriverError::decode(expected, datum_kind(datum)))
}

impl FromDatum for Datum {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        Ok(datum)
    }
}

impl FromDatum for bool {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        match datum {
            Value::Bool(b) => Ok(b),
            other => mismatch("bool", &other),
        }
    }
}

impl FromDatum for f64 {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        match datum.as_f64() {
            Some(n) => Ok(n),
            None => mismatch("number", &datum),
        }
    }
}

// Wire numbers are doubles, so integral floats are accepted as integers.
impl FromDatum for i64 {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        if let Some(n) = datum.as_i64() {
            return Ok(n);
        }
        match datum.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Ok(f as i64)
            }
            Some(f) => Err(DriverError::decode("integer", format!("number {}", f))),
            None => mismatch("integer", &datum),
        }
    }
}

impl FromDatum for u64 {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        if let Some(n) = datum.as_u64() {
            return Ok(n);
        }
        match datum.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => Ok(f as u64),
            Some(f) => Err(DriverError::decode("unsigned integer", format!("number {}", f))),
            None => mismatch("unsigned integer", &datum),
        }
    }
}

impl FromDatum for String {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        match datum {
            Value::String(s) => Ok(s),
            other => mismatch("string", &other),
        }
    }
}

impl<T: FromDatum> FromDatum for Vec<T> {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        match datum {
            Value::Array(items) => items.into_iter().map(T::from_datum).collect(),
            other => mismatch("array", &other),
        }
    }
}

impl<T: FromDatum> FromDatum for Option<T> {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        match datum {
            Value::Null => Ok(None),
            other => T::from_datum(other).map(Some),
        }
    }
}

impl<T: FromDatum> FromDatum for BTreeMap<String, T> {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        match datum {
            Value::Object(fields) => fields
                .into_iter()
                .map(|(k, v)| T::from_datum(v).map(|v| (k, v)))
                .collect(),
            other => mismatch("object", &other),
        }
    }
}

impl FromDatum for DateTime<Utc> {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        Ok(temporal::decode_unzoned(&datum)?)
    }
}

impl FromDatum for DateTime<FixedOffset> {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        Ok(temporal::decode_zoned(&datum)?)
    }
}

impl FromDatum for TemporalValue {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        Ok(TemporalValue::decode(&datum)?)
    }
}

/// Decodes any serde type from a datum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> FromDatum for Json<T> {
    fn from_datum(datum: Datum) -> DriverResult<Self> {
        serde_json::from_value(datum)
            .map(Json)
            .map_err(|e| DriverError::decode(std::any::type_name::<T>(), e.to_string()))
    }
}
