//! Diagnostics for a discovery pass.
//!
//! Every loader reports what it did through a [`PackageLog`] instead of return
//! codes, so a pass that finds nothing still explains itself.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LogLevel::Trace => write!(f, "{}", self.message),
            LogLevel::Failure => write!(f, "FAILURE: {}", self.message),
        }
    }
}

/// Append-only, ordered trace of a discovery pass.
///
/// Appending takes `&self` and is safe from several threads at once. Appends
/// never fail: a poisoned lock is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct PackageLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl PackageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational trace.
    ///
    /// Takes anything `Display`, so positional substitution is done with
    /// `format_args!`:
    ///
    /// ```
    /// # use bottles::diagnostics::PackageLog;
    /// let log = PackageLog::new();
    /// log.trace(format_args!("No package manifest found at {}", "/app/.links"));
    /// assert_eq!(log.entries()[0].message, "No package manifest found at /app/.links");
    /// ```
    pub fn trace(&self, message: impl fmt::Display) {
        let message = message.to_string();
        log::debug!("{}", message);
        self.push(LogEntry {
            level: LogLevel::Trace,
            message,
        });
    }

    /// Record an abnormal termination, keeping the whole error chain.
    pub fn mark_failure(&self, error: &anyhow::Error) {
        let message = format!("{:#}", error);
        log::warn!("{}", message);
        self.push(LogEntry {
            level: LogLevel::Failure,
            message,
        });
    }

    /// Move every entry of `other` to the end of this log, keeping their order.
    pub fn append(&self, other: PackageLog) {
        let mut moved = other
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        self.lock().append(&mut moved);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// True while no failure has been recorded.
    pub fn success(&self) -> bool {
        self.lock()
            .iter()
            .all(|entry| entry.level != LogLevel::Failure)
    }

    pub fn full_trace_text(&self) -> String {
        self.lock()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Short human-readable label a loader gives itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    pub title: String,
    pub short_description: String,
}

impl Description {
    pub fn new(title: impl Into<String>, short_description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            short_description: short_description.into(),
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.short_description)
    }
}
