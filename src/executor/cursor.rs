//! Pull-based cursor over a streamed result
//!
//! States: `Open(buffer, has_more)` and `Exhausted`.
//!
//! - a non-empty buffer yields its head (server order)
//! - an empty buffer with more on the server suspends until the next batch
//! - an empty buffer with nothing more exhausts the cursor
//!
//! Items are decoded when yielded, so a bad item fails only the pull that
//! reaches it. `next` takes `&mut self`: one consumer at a time.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use serde_json::Value;

use super::result::ResultContext;
use crate::error::{DriverError, DriverResult};
use crate::observability::{log_event_with_fields, DriverMetrics, Event};
use crate::protocol::{Datum, FromDatum, Response, Transport};

#[derive(Debug)]
enum CursorState {
    Open {
        token: u64,
        buffer: VecDeque<Datum>,
        has_more: bool,
    },
    Exhausted,
}

enum Step {
    Yield(Datum),
    Fetch(u64),
    Finish,
}

/// Lazily decoded results of one query
pub struct Cursor<T> {
    state: CursorState,
    transport: Arc<dyn Transport>,
    metrics: Arc<DriverMetrics>,
    _item: PhantomData<fn() -> T>,
}

impl<T: FromDatum> Cursor<T> {
    /// Wrap the first response of a query
    ///
    /// An array atom iterates its elements; any other atom is a single item.
    /// An error frame cannot be iterated and is returned as a server error.
    pub fn from_response(response: Response, context: &ResultContext) -> DriverResult<Self> {
        let state = match response {
            Response::Atom(Value::Array(items)) => CursorState::Open {
                token: 0,
                buffer: items.into(),
                has_more: false,
            },
            Response::Atom(item) => CursorState::Open {
                token: 0,
                buffer: VecDeque::from([item]),
                has_more: false,
            },
            Response::Stream(batch) => CursorState::Open {
                token: batch.token,
                buffer: batch.items.into(),
                has_more: batch.has_more,
            },
            Response::Error(error) => return Err(DriverError::Server(error)),
        };

        Ok(Self {
            state,
            transport: Arc::clone(&context.transport),
            metrics: Arc::clone(&context.metrics),
            _item: PhantomData,
        })
    }

    /// Pull the next item, fetching a batch if the buffer ran dry
    pub async fn next(&mut self) -> DriverResult<Option<T>> {
        match self.next_raw().await? {
            Some(item) => self.decode(item).map(Some),
            None => Ok(None),
        }
    }

    /// Drain every remaining item in order. Fails on the first bad item.
    pub async fn collect(mut self) -> DriverResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Adapt into a `Stream` that ends after the first error
    pub fn into_stream(self) -> impl Stream<Item = DriverResult<T>> {
        stream::try_unfold(self, |mut cursor| async move {
            let item = cursor.next().await?;
            Ok::<_, DriverError>(item.map(|item| (item, cursor)))
        })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, CursorState::Exhausted)
    }

    /// Items received but not yet pulled
    pub fn buffered(&self) -> usize {
        match &self.state {
            CursorState::Open { buffer, .. } => buffer.len(),
            CursorState::Exhausted => 0,
        }
    }

    async fn next_raw(&mut self) -> DriverResult<Option<Datum>> {
        loop {
            let step = match &mut self.state {
                CursorState::Exhausted => return Ok(None),
                CursorState::Open {
                    token,
                    buffer,
                    has_more,
                } => match buffer.pop_front() {
                    Some(item) => Step::Yield(item),
                    None if *has_more => Step::Fetch(*token),
                    None => Step::Finish,
                },
            };

            match step {
                Step::Yield(item) => return Ok(Some(item)),
                Step::Finish => {
                    self.state = CursorState::Exhausted;
                    log_event_with_fields(Event::CursorExhausted, &[]);
                    return Ok(None);
                }
                Step::Fetch(token) => self.refill(token).await?,
            }
        }
    }

    async fn refill(&mut self, token: u64) -> DriverResult<()> {
        let token_str = token.to_string();
        log_event_with_fields(Event::BatchRequested, &[("token", &token_str)]);

        let response = self.transport.continue_stream(token)?.resolve().await?;
        match response {
            Response::Stream(batch) => {
                self.metrics.increment_batches_fetched();
                log_event_with_fields(
                    Event::BatchReceived,
                    &[
                        ("token", &token_str),
                        ("items", &batch.items.len().to_string()),
                        ("has_more", if batch.has_more { "true" } else { "false" }),
                    ],
                );
                self.state = CursorState::Open {
                    token,
                    buffer: batch.items.into(),
                    has_more: batch.has_more,
                };
                Ok(())
            }
            Response::Error(error) => {
                // The server ends the stream when it reports an error
                self.state = CursorState::Exhausted;
                self.metrics.increment_server_errors();
                log_event_with_fields(Event::ServerError, &[("message", &error.message)]);
                Err(DriverError::Server(error))
            }
            Response::Atom(other) => Err(DriverError::decode(
                "stream batch",
                format!("atom {}", other),
            )),
        }
    }

    fn decode(&self, item: Datum) -> DriverResult<T> {
        match T::from_datum(item) {
            Ok(value) => {
                self.metrics.increment_items_decoded();
                Ok(value)
            }
            Err(error) => {
                self.metrics.increment_decode_failures();
                log_event_with_fields(Event::DecodeFailed, &[("reason", &error.to_string())]);
                Err(error)
            }
        }
    }
}
