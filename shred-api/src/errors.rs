//! # Failure Taxonomy
//!
//! Error types for queue-processing work. Every variant is treated as
//! transient by the polling engine: logged, followed by an idle-length
//! backoff, never fatal to the worker. Nothing derived from [`WorkError`]
//! ever crosses a shred's `start`/`stop` boundary.

use thiserror::Error;

/// Failure raised by a queue handler's extension points.
#[derive(Error, Debug)]
pub enum WorkError {
    /// The backing queue could not be polled.
    #[error("queue source unavailable: {0}")]
    SourceUnavailable(String),

    /// An item could not be claimed for processing.
    #[error("failed to claim item: {0}")]
    ClaimFailed(String),

    /// Processing of a claimed item failed.
    #[error("item processing failed: {0}")]
    ProcessingFailed(String),

    /// Any other handler-level failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
