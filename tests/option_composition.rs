//! Option Composition Tests
//!
//! Tests for run options:
//! - Each option writes its fixed key
//! - Composition is pure and deterministic
//! - Duplicate keys resolve last-write-wins
//! - The outgoing frame carries the composed options

use std::sync::Arc;

use aerodb_driver::protocol::ScriptedTransport;
use aerodb_driver::query::QueryOptions;
use aerodb_driver::{apply_options, Dispatcher, DriverConfig, Query, Response, RunOption};
use serde_json::json;

// =============================================================================
// Composition Tests
// =============================================================================

/// `[UseOutdated, SoftDurability(true)]` yields exactly those two entries.
#[test]
fn test_composition_exact_entries() {
    let query = apply_options(
        Query::new(json!("term")),
        &[RunOption::UseOutdated, RunOption::SoftDurability(true)],
    );

    let mut expected = QueryOptions::new();
    expected.insert("user_outdated", json!(true));
    expected.insert("soft_durability", json!(true));
    assert_eq!(query.options(), &expected);
}

/// Equal inputs give equal outputs, independent of which value is passed.
#[test]
fn test_composition_is_pure() {
    let options = [RunOption::NoReply, RunOption::SoftDurability(false)];
    let a = apply_options(Query::new(json!([1])), &options);
    let b = apply_options(Query::new(json!([1])), &options);
    assert_eq!(a, b);
    assert_eq!(a.to_wire(), b.to_wire());
}

/// Application order does not change the encoded frame.
#[test]
fn test_order_independent_encoding() {
    let forward = apply_options(
        Query::new(json!(0)),
        &[RunOption::UseOutdated, RunOption::NoReply, RunOption::SoftDurability(true)],
    );
    let backward = apply_options(
        Query::new(json!(0)),
        &[RunOption::SoftDurability(true), RunOption::NoReply, RunOption::UseOutdated],
    );
    assert_eq!(forward.to_wire(), backward.to_wire());
}

/// Repeating an option keeps only the last value.
#[test]
fn test_duplicate_option_last_write_wins() {
    let query = apply_options(
        Query::new(json!(0)),
        &[
            RunOption::SoftDurability(false),
            RunOption::UseOutdated,
            RunOption::SoftDurability(true),
        ],
    );
    assert_eq!(query.options().len(), 2);
    assert_eq!(query.options().get("soft_durability"), Some(&json!(true)));
}

// =============================================================================
// Dispatch Tests
// =============================================================================

/// Defaults from config and per-call options both reach the wire.
#[tokio::test]
async fn test_options_reach_the_wire() {
    let transport = Arc::new(ScriptedTransport::new());
    let config = DriverConfig::default().with_default_options(vec![RunOption::UseOutdated]);
    let dispatcher = Dispatcher::new(transport.clone(), config);
    transport.script_one(Response::atom(json!(true)));

    let ok: Option<bool> = dispatcher
        .run_optional(Query::new(json!([39, []])), &[RunOption::SoftDurability(true)])
        .await
        .unwrap();
    assert_eq!(ok, Some(true));
    assert_eq!(
        transport.sent_frames(),
        vec![json!([1, [39, []], {"soft_durability": true, "user_outdated": true}])]
    );
}

/// Noreply queries still produce a handle; the transport decides what it holds.
#[tokio::test]
async fn test_noreply_dispatch() {
    let transport = Arc::new(ScriptedTransport::new());
    let dispatcher = Dispatcher::new(transport.clone(), DriverConfig::default());

    let response = dispatcher
        .run_raw(Query::new(json!("write")), &[RunOption::NoReply])
        .await
        .unwrap();
    assert_eq!(response, Response::atom(json!(null)));
    assert_eq!(transport.sent_frames()[0][2]["noreply"], json!(true));
}
