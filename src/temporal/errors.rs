//! Temporal codec errors
//!
//! Every failure here surfaces to callers as a malformed temporal value.

use thiserror::Error;

/// Result type for temporal decoding
pub type TemporalResult<T> = Result<T, TemporalError>;

/// Why a wire time object could not be decoded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemporalError {
    /// The datum is not an object at all
    #[error("time value must be an object, found {0}")]
    NotAnObject(&'static str),

    /// A required field is absent
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A field is present with the wrong datum type
    #[error("field `{field}` must be a {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },

    /// Timezone string outside the `Z` / `[+-]HH:MM` grammar
    #[error("invalid timezone {0:?}")]
    InvalidTimezone(String),

    /// Epoch seconds not representable as an instant
    #[error("epoch time {0} is out of range")]
    EpochOutOfRange(f64),
}
