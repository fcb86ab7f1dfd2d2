//! # Logging Port
//!
//! The framework's only observable output is its log stream, so logging is
//! an injected port rather than a hard-wired global: production code wires
//! in [`TracingLog`] (the `tracing` macros), tests wire in a capturing
//! implementation and assert on emitted events.

use tracing::{error, info, warn};

/// Structured log sink for lifecycle transitions and caught failures.
pub trait EventLog: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default [`EventLog`] backend forwarding to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn info(&self, message: &str) {
        info!(target: "shred", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "shred", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "shred", "{}", message);
    }
}
