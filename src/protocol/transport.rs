//! Transport seam
//!
//! The transport owns the connection: framing, token correlation, retries
//! and timeouts all live behind this trait.

use thiserror::Error;

use super::handle::ResponseHandle;
use crate::query::Query;

/// Opaque transport failure, passed through unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The connection went away before a response arrived
    pub fn closed() -> Self {
        Self::new("connection closed before response")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Sends frames and correlates their responses
pub trait Transport: Send + Sync {
    /// Send a finalized query. The handle resolves with its first frame.
    fn send(&self, query: Query) -> Result<ResponseHandle, TransportError>;

    /// Ask for the next batch of the stream identified by `token`
    fn continue_stream(&self, token: u64) -> Result<ResponseHandle, TransportError>;
}
