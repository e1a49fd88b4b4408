//! Query finalization
//!
//! Takes a term built elsewhere, decorates it with run options and encodes
//! the outgoing frame.
//!
//! Option policy: one entry per key, last write wins.

mod options;
mod query;

pub use options::{apply_options, RunOption, NOREPLY_KEY, SOFT_DURABILITY_KEY, USE_OUTDATED_KEY};
pub use query::{Query, QueryOptions, QueryType};
