//! JSON-lines logger for driver events
//!
//! Each event becomes one line on stderr. Keys are sorted so equal events
//! render identically. Events below the process-wide threshold are dropped
//! before any formatting happens.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::events::Event;

/// Log severity levels
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Per-batch detail
    Trace = 0,
    Info = 1,
    #[default]
    Warn = 2,
    Error = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn from_u8(value: u8) -> Severity {
        match value {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(Severity::Warn as u8);

/// Process-wide event logger
pub struct Logger;

impl Logger {
    /// Drop every event below `severity` from now on
    pub fn set_min_severity(severity: Severity) {
        THRESHOLD.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        Severity::from_u8(THRESHOLD.load(Ordering::Relaxed))
    }

    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Write `event` at its own severity if the threshold allows it
    pub fn log(event: Event, fields: &[(&str, &str)]) {
        if !Self::enabled(event.severity()) {
            return;
        }
        let line = render(event, fields);
        let mut stderr = io::stderr().lock();
        // A failed log write never fails the query
        let _ = stderr.write_all(line.as_bytes());
    }
}

/// Render one newline-terminated JSON object for `event`
///
/// `event` and `severity` are reserved; a field with either name is ignored.
fn render(event: Event, fields: &[(&str, &str)]) -> String {
    let mut line: BTreeMap<&str, Value> = fields
        .iter()
        .map(|(key, value)| (*key, Value::from(*value)))
        .collect();
    line.insert("event", Value::from(event.as_str()));
    line.insert("severity", Value::from(event.severity().as_str()));

    let mut rendered = serde_json::to_string(&line).unwrap_or_default();
    rendered.push('\n');
    rendered
}
