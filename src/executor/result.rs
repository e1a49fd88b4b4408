//! Result shapes
//!
//! The caller picks how a response is materialized by choosing a converter:
//!
//! - `Raw`: the response frame unchanged
//! - `CursorOf<T>`: a lazy cursor decoding items as `T`
//! - `SequenceOf<T>`: every item, in server order, or the first failure
//! - `OptionalOf<T>`: the item if there is exactly one, otherwise nothing

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use super::cursor::Cursor;
use crate::error::DriverResult;
use crate::observability::{log_event_with_fields, DriverMetrics, Event};
use crate::protocol::{FromDatum, Response, ResponseHandle, Transport};

/// What a converter may use besides the handle itself
#[derive(Clone)]
pub struct ResultContext {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) metrics: Arc<DriverMetrics>,
}

impl ResultContext {
    pub fn new(transport: Arc<dyn Transport>, metrics: Arc<DriverMetrics>) -> Self {
        Self { transport, metrics }
    }

    /// Wait for the first frame of a query
    pub async fn resolve(&self, handle: ResponseHandle) -> DriverResult<Response> {
        let response = handle.resolve().await?;
        log_event_with_fields(Event::ResponseReceived, &[("kind", response.kind())]);
        if let Response::Error(error) = &response {
            self.metrics.increment_server_errors();
            log_event_with_fields(Event::ServerError, &[("message", &error.message)]);
        }
        Ok(response)
    }
}

/// Turns a response handle into a caller-chosen result shape
pub trait ResultConverter {
    type Output;

    /// Consume the handle and produce the result
    fn convert(
        self,
        handle: ResponseHandle,
        context: ResultContext,
    ) -> impl Future<Output = DriverResult<Self::Output>> + Send;
}

/// The response frame, untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

impl ResultConverter for Raw {
    type Output = Response;

    fn convert(
        self,
        handle: ResponseHandle,
        context: ResultContext,
    ) -> impl Future<Output = DriverResult<Response>> + Send {
        async move { context.resolve(handle).await }
    }
}

macro_rules! shape {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name<T>(PhantomData<fn() -> T>);

        impl<T> $name<T> {
            pub fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

shape!(
    /// A lazy cursor of `T`
    CursorOf
);
shape!(
    /// All items as `Vec<T>`
    SequenceOf
);
shape!(
    /// `Some(item)` for exactly one item, `None` for zero or several
    OptionalOf
);

impl<T: FromDatum + Send> ResultConverter for CursorOf<T> {
    type Output = Cursor<T>;

    fn convert(
        self,
        handle: ResponseHandle,
        context: ResultContext,
    ) -> impl Future<Output = DriverResult<Cursor<T>>> + Send {
        async move {
            let response = context.resolve(handle).await?;
            Cursor::from_response(response, &context)
        }
    }
}

impl<T: FromDatum + Send> ResultConverter for SequenceOf<T> {
    type Output = Vec<T>;

    fn convert(
        self,
        handle: ResponseHandle,
        context: ResultContext,
    ) -> impl Future<Output = DriverResult<Vec<T>>> + Send {
        async move {
            let cursor = CursorOf::<T>::new().convert(handle, context).await?;
            cursor.collect().await
        }
    }
}

impl<T: FromDatum + Send> ResultConverter for OptionalOf<T> {
    type Output = Option<T>;

    fn convert(
        self,
        handle: ResponseHandle,
        context: ResultContext,
    ) -> impl Future<Output = DriverResult<Option<T>>> + Send {
        async move {
            let mut cursor = CursorOf::<T>::new().convert(handle, context).await?;
            let Some(first) = cursor.next().await? else {
                return Ok(None);
            };
            // A second row makes the singleton ambiguous: absent, not an error
            match cursor.next().await? {
                Some(_) => Ok(None),
                None => Ok(Some(first)),
            }
        }
    }
}
