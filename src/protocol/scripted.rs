//! In-memory transport
//!
//! Answers queries from scripted frame lists instead of a socket. Each
//! scripted reply is consumed by one `send`: its first frame resolves the
//! send, the rest are handed out one per `continue_stream` on the token the
//! send was given. Every outgoing frame is recorded in wire form.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use super::datum::Datum;
use super::handle::ResponseHandle;
use super::response::Response;
use super::transport::{Transport, TransportError};
use crate::query::Query;

#[derive(Debug, Default)]
struct ScriptState {
    /// Replies for upcoming sends, in order
    replies: VecDeque<Vec<Response>>,
    /// Remaining frames of open streams by token
    streams: HashMap<u64, VecDeque<Response>>,
    next_token: u64,
    sent: Vec<Datum>,
    closed: bool,
}

/// Transport that replays scripted responses
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    state: Mutex<ScriptState>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the frames answering the next query
    pub fn script(&self, frames: Vec<Response>) {
        if let Ok(mut state) = self.state.lock() {
            state.replies.push_back(frames);
        }
    }

    /// Queue a single-frame reply
    pub fn script_one(&self, frame: Response) {
        self.script(vec![frame]);
    }

    /// Every frame sent so far, in wire form
    pub fn sent_frames(&self) -> Vec<Datum> {
        self.state
            .lock()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }

    /// Replies not yet consumed by a send
    pub fn pending_replies(&self) -> usize {
        self.state.lock().map(|s| s.replies.len()).unwrap_or(0)
    }

    /// Streams that still hold unrequested frames
    pub fn open_streams(&self) -> usize {
        self.state.lock().map(|s| s.streams.len()).unwrap_or(0)
    }

    /// Refuse all further frames
    pub fn close(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ScriptState>, TransportError> {
        let state = self
            .state
            .lock()
            .map_err(|_| TransportError::new("transport state poisoned"))?;
        if state.closed {
            return Err(TransportError::new("connection closed"));
        }
        Ok(state)
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, query: Query) -> Result<ResponseHandle, TransportError> {
        let mut state = self.lock()?;
        state.sent.push(query.to_wire());

        let token = state.next_token;
        state.next_token += 1;

        // The server never answers noreply queries
        if query.is_noreply() {
            return Ok(ResponseHandle::ready(Response::atom(Value::Null)));
        }

        let mut frames: VecDeque<Response> = match state.replies.pop_front() {
            Some(frames) => frames.into(),
            None => return Ok(ResponseHandle::failed(TransportError::closed())),
        };

        let first = match frames.pop_front() {
            Some(frame) => frame.with_token(token),
            None => return Ok(ResponseHandle::failed(TransportError::closed())),
        };
        if !frames.is_empty() {
            state.streams.insert(token, frames);
        }

        Ok(ResponseHandle::ready(first))
    }

    fn continue_stream(&self, token: u64) -> Result<ResponseHandle, TransportError> {
        let mut state = self.lock()?;
        state.sent.push(Query::continue_frame());

        let frames = state
            .streams
            .get_mut(&token)
            .ok_or_else(|| TransportError::new(format!("no open stream for token {}", token)))?;
        let next = frames.pop_front();
        if frames.is_empty() {
            state.streams.remove(&token);
        }

        match next {
            Some(frame) => Ok(ResponseHandle::ready(frame.with_token(token))),
            None => Err(TransportError::new(format!(
                "no open stream for token {}",
                token
            ))),
        }
    }
}
