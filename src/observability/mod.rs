//! Observability for the driver
//!
//! - Structured logging (JSON lines)
//! - Typed driver events
//! - Monotonic counters
//!
//! Observability is read-only: nothing here changes what a query returns.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{DriverMetrics, MetricsSnapshot};

/// Log a driver event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event, &[]);
}

/// Log a driver event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event, fields);
}
