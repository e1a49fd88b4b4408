//! Query dispatcher
//!
//! Finalizes a query with run options, hands it to the transport and converts
//! the response into the shape the caller asked for.
//!
//! Flow (strict order):
//! 1. Apply configured default options
//! 2. Apply per-call options
//! 3. Send through the transport, obtaining a response handle
//! 4. Convert the handle with the chosen `ResultConverter`
//!
//! No retries, timeouts or cancellation live here.

use std::sync::Arc;

use super::cursor::Cursor;
use super::result::{CursorOf, OptionalOf, Raw, ResultContext, ResultConverter, SequenceOf};
use crate::config::DriverConfig;
use crate::error::DriverResult;
use crate::observability::{log_event_with_fields, DriverMetrics, Event, Logger, MetricsSnapshot};
use crate::protocol::{FromDatum, Response, ResponseHandle, Transport};
use crate::query::{apply_options, Query, RunOption};

/// Executes queries over a transport
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    config: DriverConfig,
    metrics: Arc<DriverMetrics>,
}

impl Dispatcher {
    /// Create a dispatcher. Applies the configured log level process-wide.
    pub fn new(transport: Arc<dyn Transport>, config: DriverConfig) -> Self {
        Logger::set_min_severity(config.log_level);
        Self {
            transport,
            config,
            metrics: Arc::new(DriverMetrics::new()),
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Current counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Decorate a query with default options, then `options`
    pub fn prepare(&self, query: Query, options: &[RunOption]) -> Query {
        apply_options(apply_options(query, &self.config.default_options), options)
    }

    /// Send a finalized query. Returns as soon as the transport accepts it.
    pub fn execute(&self, query: Query) -> DriverResult<ResponseHandle> {
        let noreply = if query.is_noreply() { "true" } else { "false" };
        let option_count = query.options().len().to_string();

        match self.transport.send(query) {
            Ok(handle) => {
                self.metrics.increment_queries_dispatched();
                log_event_with_fields(
                    Event::QueryDispatched,
                    &[("noreply", noreply), ("options", &option_count)],
                );
                Ok(handle)
            }
            Err(error) => {
                self.metrics.increment_queries_rejected();
                log_event_with_fields(Event::QueryRejected, &[("reason", error.message())]);
                Err(error.into())
            }
        }
    }

    /// Prepare, execute and convert with an explicit converter
    pub async fn run<C: ResultConverter>(
        &self,
        query: Query,
        options: &[RunOption],
        converter: C,
    ) -> DriverResult<C::Output> {
        let handle = self.execute(self.prepare(query, options))?;
        converter.convert(handle, self.context()).await
    }

    /// Run and return the raw response frame
    pub async fn run_raw(&self, query: Query, options: &[RunOption]) -> DriverResult<Response> {
        self.run(query, options, Raw).await
    }

    /// Run and return a lazy cursor
    pub async fn run_cursor<T: FromDatum + Send>(
        &self,
        query: Query,
        options: &[RunOption],
    ) -> DriverResult<Cursor<T>> {
        self.run(query, options, CursorOf::<T>::new()).await
    }

    /// Run and collect every item
    pub async fn run_sequence<T: FromDatum + Send>(
        &self,
        query: Query,
        options: &[RunOption],
    ) -> DriverResult<Vec<T>> {
        self.run(query, options, SequenceOf::<T>::new()).await
    }

    /// Run expecting exactly one item; zero or several yield `None`
    pub async fn run_optional<T: FromDatum + Send>(
        &self,
        query: Query,
        options: &[RunOption],
    ) -> DriverResult<Option<T>> {
        self.run(query, options, OptionalOf::<T>::new()).await
    }

    fn context(&self) -> ResultContext {
        ResultContext::new(Arc::clone(&self.transport), Arc::clone(&self.metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use crate::protocol::ScriptedTransport;
    use serde_json::json;

    fn dispatcher(config: DriverConfig) -> (Dispatcher, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());
        (Dispatcher::new(transport.clone(), config), transport)
    }

    #[test]
    fn test_prepare_applies_defaults_then_call_options() {
        let config = DriverConfig::default()
            .with_default_options(vec![RunOption::SoftDurability(true), RunOption::UseOutdated]);
        let (dispatcher, _t) = dispatcher(config);

        let query = dispatcher.prepare(Query::new(json!(1)), &[RunOption::SoftDurability(false)]);
        assert_eq!(
            query.options().to_datum(),
            json!({"soft_durability": false, "user_outdated": true})
        );
    }

    #[tokio::test]
    async fn test_execute_sends_wire_frame() {
        let (dispatcher, transport) = dispatcher(DriverConfig::default());
        transport.script_one(Response::atom(json!(42)));

        let query = dispatcher.prepare(Query::new(json!([1, 2])), &[RunOption::UseOutdated]);
        let response = dispatcher.execute(query).unwrap().resolve().await.unwrap();

        assert_eq!(response, Response::atom(json!(42)));
        assert_eq!(
            transport.sent_frames(),
            vec![json!([1, [1, 2], {"user_outdated": true}])]
        );
        assert_eq!(dispatcher.metrics().queries_dispatched, 1);
    }

    #[tokio::test]
    async fn test_rejected_send() {
        let (dispatcher, transport) = dispatcher(DriverConfig::default());
        transport.close();

        let err = dispatcher.execute(Query::new(json!(1))).unwrap_err();
        assert!(matches!(err, DriverError::Transport(_)));
        assert_eq!(dispatcher.metrics().queries_rejected, 1);
        assert_eq!(dispatcher.metrics().queries_dispatched, 0);
    }

    #[tokio::test]
    async fn test_noreply_still_yields_handle() {
        let (dispatcher, _t) = dispatcher(DriverConfig::default());
        let response = dispatcher
            .run_raw(Query::new(json!(1)), &[RunOption::NoReply])
            .await
            .unwrap();
        assert_eq!(response, Response::atom(json!(null)));
    }

    #[tokio::test]
    async fn test_run_shapes() {
        let (dispatcher, transport) = dispatcher(DriverConfig::default());
        transport.script_one(Response::batch(vec![json!("a"), json!("b")], false));
        transport.script_one(Response::batch(vec![json!("a")], false));
        transport.script(vec![
            Response::batch(vec![json!(1)], true),
            Response::batch(vec![json!(2)], false),
        ]);

        let all: Vec<String> = dispatcher.run_sequence(Query::new(json!(1)), &[]).await.unwrap();
        assert_eq!(all, vec!["a", "b"]);

        let one: Option<String> = dispatcher.run_optional(Query::new(json!(2)), &[]).await.unwrap();
        assert_eq!(one.as_deref(), Some("a"));

        let mut cursor = dispatcher
            .run_cursor::<i64>(Query::new(json!(3)), &[])
            .await
            .unwrap();
        assert_eq!(cursor.next().await.unwrap(), Some(1));
        assert_eq!(cursor.next().await.unwrap(), Some(2));
        assert_eq!(cursor.next().await.unwrap(), None);

        let snapshot = dispatcher.metrics();
        assert_eq!(snapshot.queries_dispatched, 3);
        assert_eq!(snapshot.batches_fetched, 1);
        assert_eq!(snapshot.items_decoded, 5);
    }
}
