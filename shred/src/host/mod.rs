//! # Queue Processor Host Module
//!
//! Turns a declarative list of processors into a running set of dedicated
//! worker threads and manages their coordinated start/stop as a unit.
//!
//! ## Key Concepts
//! - Transactional start-up: if launching any processor fails, whatever
//!   already started is unwound via a full shutdown — a shred is never left
//!   partially started
//! - Best-effort shutdown: every worker is signalled and joined with a
//!   timeout; a worker that fails to cooperate is abandoned, not killed
//! - Host safety: no failure path in start-up or shutdown ever reaches the
//!   caller — everything ends in a log entry
//!
//! ## Design Principles
//! - The host never crashes because a shred failed to start or stop cleanly
//! - One failing processor cannot block the rest from being signalled

mod worker;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use shred_api::{BoxedProcessor, EventLog, Shred, TracingLog};

pub use worker::LaunchError;

use self::worker::{panic_message, WorkerHandle};

/// Supplies the host with the processors to run and the shred's identity.
///
/// `processors` is invoked once per start-up and may return fresh instances
/// each time — a stopped shred restarts with a new processor set.
pub trait ProcessorFactory: Send {
    fn display_name(&self) -> String;
    fn description(&self) -> String;
    fn processors(&mut self) -> Vec<BoxedProcessor>;
}

/// Host-level configuration.
#[derive(Debug, Clone)]
pub struct ShredSettings {
    /// Per-worker join deadline during shutdown. Workers that miss it are
    /// abandoned; joins are sequential, so worst-case shutdown time is
    /// roughly N × timeout for N never-cooperating workers.
    pub shutdown_timeout: Duration,
}

impl Default for ShredSettings {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(60),
        }
    }
}

/// Thread-per-processor shred: owns a set of processors and runs each on
/// its own dedicated thread.
///
/// Two states, stopped and started, guarded by a single flag set eagerly on
/// entry to start-up. The flag is a non-reentrancy device for the calling
/// thread; invoking `start`/`stop` concurrently from multiple threads is
/// out of contract.
pub struct QueueProcessorShred<F: ProcessorFactory> {
    factory: F,
    settings: ShredSettings,
    workers: Vec<WorkerHandle>,
    started: bool,
    log: Arc<dyn EventLog>,
}

impl<F: ProcessorFactory> QueueProcessorShred<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            settings: ShredSettings::default(),
            workers: Vec::new(),
            started: false,
            log: Arc::new(TracingLog),
        }
    }

    pub fn with_settings(mut self, settings: ShredSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the default `tracing` log backend.
    pub fn with_log(mut self, log: Arc<dyn EventLog>) -> Self {
        self.log = log;
        self
    }

    /// Whether the shred currently considers itself started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of workers currently tracked.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn start_up(&mut self) {
        // Set eagerly so a re-entrant start is a no-op even while workers
        // are still being launched.
        self.started = true;
        self.workers.clear();

        let factory_call = panic::catch_unwind(AssertUnwindSafe(|| self.factory.processors()));
        let processors = match factory_call {
            Ok(processors) => processors,
            Err(payload) => {
                self.log.error(&format!(
                    "{}: failed to obtain processors: {}",
                    self.factory.display_name(),
                    panic_message(payload.as_ref())
                ));
                self.shut_down();
                return;
            }
        };

        for processor in processors {
            match WorkerHandle::spawn(processor, self.log.clone()) {
                Ok(worker) => self.workers.push(worker),
                Err(e) => {
                    self.log.error(&format!(
                        "{}: failed to launch worker: {}",
                        self.factory.display_name(),
                        e
                    ));
                    // Unwind whatever already started rather than leaving a
                    // partially-started shred running.
                    self.shut_down();
                    return;
                }
            }
        }

        self.log.info(&format!(
            "{}: started {} worker(s)",
            self.factory.display_name(),
            self.workers.len()
        ));
    }

    fn shut_down(&mut self) {
        if !self.started {
            return;
        }

        for worker in &self.workers {
            worker.signal_stop(self.log.as_ref());
        }
        for worker in self.workers.drain(..) {
            worker.join(self.settings.shutdown_timeout, self.log.as_ref());
        }

        // Cleared only after all join attempts, so a racing start is not
        // re-entered while workers may still be winding down.
        self.started = false;
        self.log
            .info(&format!("{}: stopped", self.factory.display_name()));
    }
}

impl<F: ProcessorFactory> Shred for QueueProcessorShred<F> {
    fn start(&mut self) {
        if !self.started {
            self.start_up();
        }
    }

    fn stop(&mut self) {
        if self.started {
            self.shut_down();
        }
    }

    fn display_name(&self) -> String {
        self.factory.display_name()
    }

    fn description(&self) -> String {
        self.factory.description()
    }
}
