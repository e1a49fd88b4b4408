//! aerodb-driver - query execution and result materialization for AeroDB clients
//!
//! A built term is finalized with run options, dispatched through a
//! transport, and its response materialized as the caller asks:
//!
//! ```ignore
//! use aerodb_driver::{Dispatcher, DriverConfig, Query, RunOption};
//!
//! let dispatcher = Dispatcher::new(transport, DriverConfig::default());
//! let names: Vec<String> = dispatcher
//!     .run_sequence(Query::new(term), &[RunOption::UseOutdated])
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod observability;
pub mod protocol;
pub mod query;
pub mod temporal;

pub use config::{ConfigError, DriverConfig};
pub use error::{DriverError, DriverResult};
pub use executor::{Cursor, CursorOf, Dispatcher, OptionalOf, Raw, ResultConverter, SequenceOf};
pub use protocol::{Datum, FromDatum, Json, Response, ResponseHandle, Transport};
pub use query::{apply_options, Query, RunOption};
pub use temporal::TemporalValue;
