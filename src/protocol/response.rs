//! Raw responses
//!
//! A response is one decoded frame for a query token:
//!
//! - an atom (single datum)
//! - a stream batch (items plus whether the server holds more)
//! - a server error
//!
//! Frame JSON: `{"t": <type>, "r": [...], "b": [...]}`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::datum::{datum_kind, Datum};
use crate::error::{DriverError, DriverResult};

/// Response type codes carried in the `t` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    SuccessAtom = 1,
    SuccessSequence = 2,
    SuccessPartial = 3,
    WaitComplete = 4,
    ClientError = 16,
    CompileError = 17,
    RuntimeError = 18,
}

impl ResponseType {
    /// Map a wire code to a response type
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(ResponseType::SuccessAtom),
            2 => Some(ResponseType::SuccessSequence),
            3 => Some(ResponseType::SuccessPartial),
            4 => Some(ResponseType::WaitComplete),
            16 => Some(ResponseType::ClientError),
            17 => Some(ResponseType::CompileError),
            18 => Some(ResponseType::RuntimeError),
            _ => None,
        }
    }
}

/// Which stage of the server rejected the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    Client,
    Compile,
    Runtime,
}

impl fmt::Display for ServerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErrorKind::Client => write!(f, "client"),
            ServerErrorKind::Compile => write!(f, "compile"),
            ServerErrorKind::Runtime => write!(f, "runtime"),
        }
    }
}

/// Error payload of an error frame
#[derive(Debug, Clone, PartialEq, Error)]
#[error("server {kind} error: {message}")]
pub struct ServerError {
    pub kind: ServerErrorKind,
    pub message: String,
    /// Term path to the failing sub-expression, when the server sends one
    pub backtrace: Vec<Datum>,
}

impl ServerError {
    pub fn new(kind: ServerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            backtrace: Vec::new(),
        }
    }
}

/// One batch of a streamed result
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Query token the stream belongs to
    pub token: u64,
    pub items: Vec<Datum>,
    /// Server holds further batches for this token
    pub has_more: bool,
}

/// A raw response frame
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Atom(Datum),
    Stream(Batch),
    Error(ServerError),
}

impl Response {
    /// Single-datum response
    pub fn atom(datum: Datum) -> Self {
        Response::Atom(datum)
    }

    /// Stream batch; the token is assigned by whoever correlates frames
    pub fn batch(items: Vec<Datum>, has_more: bool) -> Self {
        Response::Stream(Batch {
            token: 0,
            items,
            has_more,
        })
    }

    /// Error frame
    pub fn error(kind: ServerErrorKind, message: impl Into<String>) -> Self {
        Response::Error(ServerError::new(kind, message))
    }

    /// Rebind a stream batch to `token`. Other frames are unchanged.
    pub fn with_token(self, token: u64) -> Self {
        match self {
            Response::Stream(batch) => Response::Stream(Batch { token, ..batch }),
            other => other,
        }
    }

    /// Stream token, if this is a batch
    pub fn token(&self) -> Option<u64> {
        match self {
            Response::Stream(batch) => Some(batch.token),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// Short name of the frame shape, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Atom(_) => "atom",
            Response::Stream(batch) if batch.has_more => "partial",
            Response::Stream(_) => "sequence",
            Response::Error(_) => "error",
        }
    }

    /// Decode a response frame received for `token`
    pub fn from_wire(token: u64, frame: Datum) -> DriverResult<Self> {
        let mut fields = match frame {
            Value::Object(fields) => fields,
            other => return Err(DriverError::decode("response frame", datum_kind(&other))),
        };

        let code = fields
            .get("t")
            .and_then(Value::as_u64)
            .ok_or_else(|| DriverError::decode("response type", "missing or non-integer `t`"))?;
        let response_type = ResponseType::from_code(code)
            .ok_or_else(|| DriverError::decode("response type", format!("code {}", code)))?;

        let mut results = match fields.remove("r") {
            Some(Value::Array(items)) => items,
            Some(other) => return Err(DriverError::decode("result array", datum_kind(&other))),
            None if response_type == ResponseType::WaitComplete => Vec::new(),
            None => return Err(DriverError::decode("result array", "missing `r`")),
        };

        match response_type {
            ResponseType::SuccessAtom => {
                if results.len() != 1 {
                    return Err(DriverError::decode(
                        "single atom",
                        format!("{} results", results.len()),
                    ));
                }
                Ok(Response::Atom(results.remove(0)))
            }
            ResponseType::SuccessSequence => Ok(Response::Stream(Batch {
                token,
                items: results,
                has_more: false,
            })),
            ResponseType::SuccessPartial => Ok(Response::Stream(Batch {
                token,
                items: results,
                has_more: true,
            })),
            ResponseType::WaitComplete => Ok(Response::Atom(Value::Null)),
            ResponseType::ClientError | ResponseType::CompileError | ResponseType::RuntimeError => {
                let kind = match response_type {
                    ResponseType::ClientError => ServerErrorKind::Client,
                    ResponseType::CompileError => ServerErrorKind::Compile,
                    _ => ServerErrorKind::Runtime,
                };
                let message = match results.into_iter().next() {
                    Some(Value::String(message)) => message,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                let backtrace = match fields.remove("b") {
                    Some(Value::Array(frames)) => frames,
                    _ => Vec::new(),
                };
                Ok(Response::Error(ServerError {
                    kind,
                    message,
                    backtrace,
                }))
            }
        }
    }
}
