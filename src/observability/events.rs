//! Observable driver events
//!
//! Events are explicit and typed. Each carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in the query/result path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Dispatch
    /// Query handed to the transport
    QueryDispatched,
    /// Transport refused the query
    QueryRejected,
    /// First response frame for a query resolved
    ResponseReceived,

    // Streams
    /// Cursor asked the transport for another batch
    BatchRequested,
    /// Continuation batch arrived
    BatchReceived,
    /// Cursor drained buffer and stream
    CursorExhausted,

    // Failures
    /// Wire item did not decode to the requested type
    DecodeFailed,
    /// Server answered with an error frame
    ServerError,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::QueryDispatched => "QUERY_DISPATCHED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::ResponseReceived => "RESPONSE_RECEIVED",
            Event::BatchRequested => "BATCH_REQUESTED",
            Event::BatchReceived => "BATCH_RECEIVED",
            Event::CursorExhausted => "CURSOR_EXHAUSTED",
            Event::DecodeFailed => "DECODE_FAILED",
            Event::ServerError => "SERVER_ERROR",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryDispatched | Event::ResponseReceived => Severity::Info,
            Event::BatchRequested | Event::BatchReceived | Event::CursorExhausted => {
                Severity::Trace
            }
            Event::DecodeFailed | Event::ServerError => Severity::Warn,
            Event::QueryRejected => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
