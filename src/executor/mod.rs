//! Query execution and result materialization
//!
//! # Execution Flow
//!
//! 1. `Dispatcher` folds run options into the query
//! 2. The transport accepts it and returns a one-shot `ResponseHandle`
//! 3. A `ResultConverter` chosen by the caller consumes the handle
//! 4. Streamed results are pulled through a `Cursor`, decoding on demand
//!
//! # Invariants
//!
//! - Server order is preserved by every shape
//! - Decode failures surface at the pull that reaches the bad item
//! - Zero or several rows for an optional result yield `None`, never an error

mod cursor;
mod dispatcher;
mod result;

pub use cursor::Cursor;
pub use dispatcher::Dispatcher;
pub use result::{CursorOf, OptionalOf, Raw, ResultContext, ResultConverter, SequenceOf};
