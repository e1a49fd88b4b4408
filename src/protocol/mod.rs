//! Wire-facing types
//!
//! - `Datum` and typed decoding via `FromDatum`
//! - `Response` frames and server errors
//! - `ResponseHandle`, the one-shot future for a frame's response
//! - the `Transport` seam and an in-memory `ScriptedTransport`

mod datum;
mod handle;
mod response;
mod scripted;
mod transport;

pub use datum::{datum_kind, Datum, FromDatum, Json};
pub use handle::{ResponseHandle, ResponseSender};
pub use response::{Batch, Response, ResponseType, ServerError, ServerErrorKind};
pub use scripted::ScriptedTransport;
pub use transport::{Transport, TransportError};
