//! # Queue Processing Module
//!
//! This module provides a reusable poll → claim → process → backoff engine
//! over an abstract, externally-supplied queue of work items.
//!
//! ## Key Concepts
//! - Batch polling: up to `batch_size` items pulled per cycle, processed
//!   strictly in the order the handler returned them
//! - Cooperative stop: the stop flag is checked every loop iteration and
//!   every snooze tick, bounding shutdown latency independent of the
//!   configured sleep time
//! - Suspend: a handler-requested, longer-than-usual backoff that abandons
//!   the rest of the current batch back to the queue source
//!
//! ## Design Principles
//! - Self-healing: handler failures are logged and retried at the idle
//!   backoff rate, never fatal to the worker
//! - Fixed loop shape: only the [`QueueHandler`] extension points vary

mod processor;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use shred_api::{StopFlag, WorkResult};

pub use processor::QueueProcessor;

/// Granularity of interruptible sleeps. Idle and suspend backoffs are taken
/// in increments of this interval, re-checking the stop flag each tick.
pub const SNOOZE_INTERVAL: Duration = Duration::from_millis(100);

/// Extension points implemented by a concrete queue backend.
///
/// The actual queue-backing technology (database, message broker, in-memory
/// structure) is entirely up to the implementor; the engine only sees these
/// three operations.
pub trait QueueHandler: Send {
    type Item: Send;

    /// Return up to `batch_size` items currently eligible for processing.
    /// Returning an empty batch is the idle signal.
    fn next_batch(&mut self, batch_size: usize) -> WorkResult<Vec<Self::Item>>;

    /// Perform the unit of work for one item. A returned error aborts the
    /// rest of the batch and is retried-by-repoll after an idle backoff.
    fn process_item(&mut self, item: Self::Item, cx: &ProcessorContext) -> WorkResult<()>;

    /// Pessimistic-locking hook so cooperating consumers polling the same
    /// logical queue can avoid double-processing. `Ok(false)` silently
    /// skips the item for this cycle. Default is single-consumer.
    fn claim_item(&mut self, _item: &Self::Item) -> WorkResult<bool> {
        Ok(true)
    }
}

/// Configuration for a [`QueueProcessor`].
#[derive(Debug, Clone)]
pub struct QueueProcessorSettings {
    /// Name applied to the worker thread, if any.
    pub name: Option<String>,

    /// Maximum items pulled per poll. Constrains per-cycle throughput and,
    /// combined with per-item cost, bounds how long unclaimed items stay
    /// invisible.
    pub batch_size: usize,

    /// Base backoff unit applied when idle, after a handler failure, and
    /// (scaled by the requested factor) when suspended.
    pub sleep_time: Duration,
}

impl Default for QueueProcessorSettings {
    fn default() -> Self {
        Self {
            name: None,
            batch_size: 10,
            sleep_time: Duration::from_secs(1),
        }
    }
}

impl QueueProcessorSettings {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// State shared between the polling loop and the handler it drives.
///
/// The stop flag is written by the host thread and polled here; the suspend
/// request is set and consumed on the processor's own thread, so it is
/// effectively thread-local despite being a field.
#[derive(Debug, Default)]
pub struct ProcessorContext {
    stop: StopFlag,
    // Pending suspend factor; zero means none requested.
    suspend: AtomicU32,
}

impl ProcessorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the host has requested this processor to stop. Handlers with
    /// long-running `process_item` bodies should poll this.
    pub fn stop_requested(&self) -> bool {
        self.stop.is_set()
    }

    /// Request a longer-than-usual backoff without stopping the loop: the
    /// engine sleeps `sleep_time × factor` after the current item and
    /// abandons the rest of the batch back to the queue source.
    ///
    /// A factor of zero is treated as one, so suspend always sleeps at
    /// least the base unit.
    pub fn request_suspend(&self, sleep_time_factor: u32) {
        self.suspend
            .store(sleep_time_factor.max(1), Ordering::SeqCst);
    }

    pub(crate) fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub(crate) fn take_suspend(&self) -> Option<u32> {
        match self.suspend.swap(0, Ordering::SeqCst) {
            0 => None,
            factor => Some(factor),
        }
    }
}
