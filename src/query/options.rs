//! Run options
//!
//! Each `RunOption` writes one fixed boolean key into a query's options.
//! Composition is pure: the input query is consumed and a new one returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::query::Query;
use crate::protocol::Datum;

/// Option key for outdated reads, exactly as the server accepts it
pub const USE_OUTDATED_KEY: &str = "user_outdated";
/// Option key for reply suppression
pub const NOREPLY_KEY: &str = "noreply";
/// Option key for durability level
pub const SOFT_DURABILITY_KEY: &str = "soft_durability";

/// Per-execution toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOption {
    /// Allow reads from out-of-date replicas
    UseOutdated,
    /// Ask the server not to answer
    #[serde(rename = "noreply")]
    NoReply,
    /// Acknowledge writes before they reach disk
    SoftDurability(bool),
}

impl RunOption {
    /// Wire key this option writes
    pub fn key(&self) -> &'static str {
        match self {
            RunOption::UseOutdated => USE_OUTDATED_KEY,
            RunOption::NoReply => NOREPLY_KEY,
            RunOption::SoftDurability(_) => SOFT_DURABILITY_KEY,
        }
    }

    /// Wire value this option writes
    pub fn value(&self) -> Datum {
        match self {
            RunOption::UseOutdated | RunOption::NoReply => Value::Bool(true),
            RunOption::SoftDurability(soft) => Value::Bool(*soft),
        }
    }
}

/// Fold `options` into `query` in order
pub fn apply_options(query: Query, options: &[RunOption]) -> Query {
    options
        .iter()
        .fold(query, |query, option| query.with_option(option.key(), option.value()))
}
