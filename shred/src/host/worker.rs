//! # Worker Thread Module
//!
//! One tracked worker per processor: a named OS thread running the
//! processor's loop, the stop signal the host uses to end it, and a done
//! channel that makes join-with-timeout possible without an async runtime.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use flume::RecvTimeoutError;
use thiserror::Error;

use shred_api::{BoxedProcessor, EventLog, StopSignal};

/// Failure launching a processor onto its thread.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("processor stop signal unavailable: {0}")]
    StopSignal(String),
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// A processor bound to its running thread, tracked by the shred between
/// start-up and shutdown.
pub(crate) struct WorkerHandle {
    label: String,
    stop: Box<dyn StopSignal>,
    thread: JoinHandle<()>,
    done_rx: flume::Receiver<()>,
}

impl WorkerHandle {
    /// Spawn a dedicated thread running `processor.run()`.
    ///
    /// The thread body catches panics escaping `run` so an unhandled worker
    /// failure is always logged and never crashes the process. The done
    /// channel is signalled as the thread's last act.
    pub fn spawn(mut processor: BoxedProcessor, log: Arc<dyn EventLog>) -> Result<Self, LaunchError> {
        let name = processor.name().map(str::to_string);
        let stop = panic::catch_unwind(AssertUnwindSafe(|| processor.stop_signal()))
            .map_err(|payload| LaunchError::StopSignal(panic_message(payload.as_ref())))?;

        let label = name.clone().unwrap_or_else(|| "queue processor".to_string());
        let (done_tx, done_rx) = flume::bounded(1);

        let mut builder = std::thread::Builder::new();
        if let Some(n) = &name {
            builder = builder.name(n.clone());
        }

        let thread_label = label.clone();
        let thread = builder.spawn(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| processor.run())) {
                log.error(&format!(
                    "worker '{}' terminated by panic: {}",
                    thread_label,
                    panic_message(payload.as_ref())
                ));
            }
            let _ = done_tx.send(());
        })?;

        Ok(Self {
            label,
            stop,
            thread,
            done_rx,
        })
    }

    /// Forward the stop request, shielding the host from a misbehaving
    /// `StopSignal` implementation.
    pub fn signal_stop(&self, log: &dyn EventLog) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.stop.request_stop())) {
            log.error(&format!(
                "stop request for worker '{}' panicked: {}",
                self.label,
                panic_message(payload.as_ref())
            ));
        }
    }

    /// Wait up to `timeout` for the worker thread to finish. A thread that
    /// misses the deadline is abandoned (left running detached), never
    /// forcibly killed.
    pub fn join(self, timeout: Duration, log: &dyn EventLog) {
        match self.done_rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                // The done signal is the thread's final act, so this join
                // completes promptly. Run-loop panics were already caught
                // and logged on the worker thread.
                if self.thread.join().is_err() {
                    log.error(&format!(
                        "worker '{}' thread could not be joined cleanly",
                        self.label
                    ));
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                log.warn(&format!(
                    "worker '{}' did not stop within {:?}; abandoning its thread",
                    self.label, timeout
                ));
            }
        }
    }
}
