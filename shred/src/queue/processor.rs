use std::sync::Arc;
use std::time::Instant;

use shred_api::{EventLog, Processor, StopSignal, TracingLog, WorkResult};

use super::{ProcessorContext, QueueHandler, QueueProcessorSettings, SNOOZE_INTERVAL};

/// Generic polling engine: repeatedly pulls a bounded batch of work items
/// from a [`QueueHandler`], attempts to claim and process each one, and
/// self-throttles when idle or suspended.
///
/// The engine has no knowledge of threads or hosting — it runs synchronously
/// inside whatever thread invokes [`Processor::run`]. The loop shape is
/// fixed; behavior varies only through the handler's extension points.
pub struct QueueProcessor<H: QueueHandler> {
    handler: H,
    settings: QueueProcessorSettings,
    context: ProcessorContext,
    log: Arc<dyn EventLog>,
}

impl<H: QueueHandler> QueueProcessor<H> {
    pub fn new(handler: H, settings: QueueProcessorSettings) -> Self {
        Self {
            handler,
            settings,
            context: ProcessorContext::new(),
            log: Arc::new(TracingLog),
        }
    }

    /// Replace the default `tracing` log backend.
    pub fn with_log(mut self, log: Arc<dyn EventLog>) -> Self {
        self.log = log;
        self
    }

    fn display_name(&self) -> &str {
        self.settings.name.as_deref().unwrap_or("queue processor")
    }

    fn run_loop(&mut self) {
        while !self.context.stop_requested() {
            if let Err(e) = self.run_cycle() {
                self.log
                    .error(&format!("{}: work cycle failed: {}", self.display_name(), e));
                // Same backoff unit as an empty batch, so a misbehaving
                // queue source degrades to retries instead of a hot spin.
                if !self.context.stop_requested() {
                    self.snooze(1);
                }
            }
        }
    }

    fn run_cycle(&mut self) -> WorkResult<()> {
        let items = self.handler.next_batch(self.settings.batch_size)?;
        if items.is_empty() {
            if !self.context.stop_requested() {
                self.snooze(1);
            }
            return Ok(());
        }

        for item in items {
            // Leftover items stay with the queue source.
            if self.context.stop_requested() {
                break;
            }
            if self.handler.claim_item(&item)? {
                self.handler.process_item(item, &self.context)?;
            }
            if let Some(factor) = self.context.take_suspend() {
                self.snooze(factor);
                break;
            }
        }
        Ok(())
    }

    /// Sleep `sleep_time × factor`, in [`SNOOZE_INTERVAL`] increments so a
    /// stop request takes effect within one tick rather than the full
    /// backoff duration.
    fn snooze(&self, factor: u32) {
        let total = self.settings.sleep_time.saturating_mul(factor);
        let start = Instant::now();
        loop {
            let elapsed = start.elapsed();
            if elapsed >= total || self.context.stop_requested() {
                return;
            }
            std::thread::sleep((total - elapsed).min(SNOOZE_INTERVAL));
        }
    }
}

impl<H: QueueHandler> Processor for QueueProcessor<H> {
    fn name(&self) -> Option<&str> {
        self.settings.name.as_deref()
    }

    fn run(&mut self) {
        self.run_loop();
    }

    fn stop_signal(&self) -> Box<dyn StopSignal> {
        Box::new(self.context.stop_flag())
    }
}
