//! # Processor Contract
//!
//! A processor is a long-running worker owned by a shred. The shred runs
//! each processor on a dedicated OS thread and signals shutdown through the
//! processor's stop signal; the processor is responsible for polling that
//! signal often enough that shutdown completes within the host's timeout
//! window.
//!
//! ## Design Principles
//!
//! - **One thread per processor**: `run` monopolizes its thread for the
//!   processor's entire lifetime between shred start and stop.
//! - **Cooperative stop**: the stop signal is a flag written by the host
//!   thread and read by the worker thread — no lock, no preemption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle used by the host to request that a running processor stop.
///
/// # Contract
///
/// `request_stop` is called from a different thread than the one running
/// [`Processor::run`]. It must return immediately and must not panic — the
/// host calls it for every processor during shutdown regardless of prior
/// failures (and defends against implementations that break this rule).
pub trait StopSignal: Send {
    /// Flag the processor to stop. Non-blocking.
    fn request_stop(&self);
}

/// A unit of continuous background work.
pub trait Processor: Send {
    /// Name used for thread naming and diagnostics. `None` leaves the
    /// worker thread unnamed.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Entry point, invoked once per shred start on a dedicated thread.
    ///
    /// Must not return until the processor has finished all work it intends
    /// to do — in practice, only after its stop signal fires and the
    /// current unit of work completes.
    fn run(&mut self);

    /// Signal handle handed to the host before `run` begins.
    fn stop_signal(&self) -> Box<dyn StopSignal>;
}

/// Shared stop flag: the single cross-thread synchronization primitive of
/// the framework. One side (the host) writes it, the other (the worker
/// thread) polls it; atomic visibility is all that is required, so no lock
/// is involved.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Idempotent.
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl StopSignal for StopFlag {
    fn request_stop(&self) {
        self.request();
    }
}
