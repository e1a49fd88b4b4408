//! Driver error types
//!
//! Error codes:
//! - AERO_DRIVER_MALFORMED_TEMPORAL
//! - AERO_DRIVER_DECODE
//! - AERO_DRIVER_TRANSPORT
//! - AERO_DRIVER_SERVER
//!
//! Nothing at this layer retries. Every error reaches the caller of the
//! operation that discovered it.

use thiserror::Error;

use crate::protocol::{ServerError, TransportError};
use crate::temporal::TemporalError;

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors surfaced by query execution and result conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    /// Wire time object missing fields or carrying a bad timezone
    #[error("malformed temporal value: {0}")]
    MalformedTemporal(#[from] TemporalError),

    /// Wire item could not be read as the requested type
    #[error("cannot decode {found} as {expected}")]
    Decode {
        expected: &'static str,
        found: String,
    },

    /// Opaque failure reported by the transport
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Server answered with an error frame
    #[error("{0}")]
    Server(#[from] ServerError),
}

impl DriverError {
    /// Create a decode error
    pub fn decode(expected: &'static str, found: impl Into<String>) -> Self {
        DriverError::Decode {
            expected,
            found: found.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DriverError::MalformedTemporal(_) => "AERO_DRIVER_MALFORMED_TEMPORAL",
            DriverError::Decode { .. } => "AERO_DRIVER_DECODE",
            DriverError::Transport(_) => "AERO_DRIVER_TRANSPORT",
            DriverError::Server(_) => "AERO_DRIVER_SERVER",
        }
    }

    /// True for errors raised while interpreting a wire item
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            DriverError::Decode { .. } | DriverError::MalformedTemporal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ServerErrorKind;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DriverError::from(TemporalError::MissingField("epoch_time")).code(),
            "AERO_DRIVER_MALFORMED_TEMPORAL"
        );
        assert_eq!(
            DriverError::decode("string", "number").code(),
            "AERO_DRIVER_DECODE"
        );
        assert_eq!(
            DriverError::from(TransportError::closed()).code(),
            "AERO_DRIVER_TRANSPORT"
        );
        assert_eq!(
            DriverError::from(ServerError::new(ServerErrorKind::Runtime, "boom")).code(),
            "AERO_DRIVER_SERVER"
        );
    }

    #[test]
    fn test_decode_failure_classification() {
        assert!(DriverError::decode("bool", "null").is_decode_failure());
        assert!(DriverError::from(TemporalError::MissingField("timezone")).is_decode_failure());
        assert!(!DriverError::from(TransportError::closed()).is_decode_failure());
    }

    #[test]
    fn test_error_display() {
        let err = DriverError::decode("integer", "number 1.5");
        assert_eq!(err.to_string(), "cannot decode number 1.5 as integer");

        let err = DriverError::from(TemporalError::InvalidTimezone("+9".to_string()));
        assert!(err.to_string().contains("malformed temporal value"));
    }
}
