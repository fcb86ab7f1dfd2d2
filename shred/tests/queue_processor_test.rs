// Integration tests for the generic queue-polling engine.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use shred::queue::{ProcessorContext, QueueHandler, QueueProcessor, QueueProcessorSettings};
use shred_api::{EventLog, Processor, WorkError, WorkResult};

/// Capturing log sink so tests can assert on emitted events.
#[derive(Default)]
struct CapturingLog {
    events: Mutex<Vec<(&'static str, String)>>,
}

impl CapturingLog {
    fn contains(&self, level: &'static str, needle: &str) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl EventLog for CapturingLog {
    fn info(&self, message: &str) {
        self.events.lock().unwrap().push(("info", message.to_string()));
    }
    fn warn(&self, message: &str) {
        self.events.lock().unwrap().push(("warn", message.to_string()));
    }
    fn error(&self, message: &str) {
        self.events.lock().unwrap().push(("error", message.to_string()));
    }
}

/// Scripted queue backend: serves a fixed sequence of batches, then idles.
#[derive(Default)]
struct ScriptedHandler {
    batches: VecDeque<Vec<String>>,
    processed: Arc<Mutex<Vec<String>>>,
    polls: Arc<AtomicUsize>,
    poll_times: Arc<Mutex<Vec<Instant>>>,
    fail_on: Option<String>,
    unclaimable: Option<String>,
    suspend_on: Option<(String, u32)>,
    seen_thread_name: Arc<Mutex<Option<String>>>,
}

impl QueueHandler for ScriptedHandler {
    type Item = String;

    fn next_batch(&mut self, _batch_size: usize) -> WorkResult<Vec<String>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.poll_times.lock().unwrap().push(Instant::now());
        Ok(self.batches.pop_front().unwrap_or_default())
    }

    fn process_item(&mut self, item: String, cx: &ProcessorContext) -> WorkResult<()> {
        *self.seen_thread_name.lock().unwrap() =
            std::thread::current().name().map(str::to_string);
        if self.fail_on.as_deref() == Some(item.as_str()) {
            return Err(WorkError::ProcessingFailed(format!("bad item {item}")));
        }
        self.processed.lock().unwrap().push(item.clone());
        if let Some((trigger, factor)) = &self.suspend_on {
            if *trigger == item {
                cx.request_suspend(*factor);
            }
        }
        Ok(())
    }

    fn claim_item(&mut self, item: &String) -> WorkResult<bool> {
        Ok(self.unclaimable.as_deref() != Some(item.as_str()))
    }
}

fn batch(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

fn fast_settings() -> QueueProcessorSettings {
    QueueProcessorSettings {
        name: None,
        batch_size: 10,
        sleep_time: Duration::from_millis(10),
    }
}

#[test]
fn stop_interrupts_long_idle_backoff() {
    // Empty queue, long base sleep: the loop parks in its idle backoff.
    let handler = ScriptedHandler::default();
    let polls = handler.polls.clone();
    let mut processor = QueueProcessor::new(
        handler,
        QueueProcessorSettings {
            sleep_time: Duration::from_secs(30),
            ..Default::default()
        },
    );
    let stop = processor.stop_signal();

    let worker = std::thread::spawn(move || processor.run());
    assert!(wait_until(Duration::from_secs(2), || {
        polls.load(Ordering::SeqCst) >= 1
    }));

    let stop_issued = Instant::now();
    stop.request_stop();
    worker.join().unwrap();

    // Must return within roughly one snooze tick, not the 30 s backoff.
    assert!(
        stop_issued.elapsed() < Duration::from_secs(1),
        "stop took {:?}",
        stop_issued.elapsed()
    );
}

#[test]
fn batch_items_processed_in_order() {
    let mut handler = ScriptedHandler::default();
    handler.batches.push_back(batch(&["a", "b", "c"]));
    let processed = handler.processed.clone();

    let mut processor = QueueProcessor::new(handler, fast_settings());
    let stop = processor.stop_signal();
    let worker = std::thread::spawn(move || processor.run());

    assert!(wait_until(Duration::from_secs(2), || {
        processed.lock().unwrap().len() == 3
    }));
    stop.request_stop();
    worker.join().unwrap();

    assert_eq!(*processed.lock().unwrap(), batch(&["a", "b", "c"]));
}

#[test]
fn unclaimable_item_is_skipped() {
    let mut handler = ScriptedHandler::default();
    handler.batches.push_back(batch(&["a", "b", "c"]));
    handler.unclaimable = Some("b".to_string());
    let processed = handler.processed.clone();

    let mut processor = QueueProcessor::new(handler, fast_settings());
    let stop = processor.stop_signal();
    let worker = std::thread::spawn(move || processor.run());

    assert!(wait_until(Duration::from_secs(2), || {
        processed.lock().unwrap().len() == 2
    }));
    stop.request_stop();
    worker.join().unwrap();

    assert_eq!(*processed.lock().unwrap(), batch(&["a", "c"]));
}

#[test]
fn suspend_truncates_batch_and_scales_backoff() {
    let mut handler = ScriptedHandler::default();
    handler.batches.push_back(batch(&["a", "b", "c"]));
    handler.suspend_on = Some(("b".to_string(), 4));
    let processed = handler.processed.clone();
    let polls = handler.polls.clone();
    let poll_times = handler.poll_times.clone();

    let mut processor = QueueProcessor::new(
        handler,
        QueueProcessorSettings {
            sleep_time: Duration::from_millis(50),
            ..Default::default()
        },
    );
    let stop = processor.stop_signal();
    let worker = std::thread::spawn(move || processor.run());

    // Suspend during "b" abandons "c"; the loop polls again afterwards.
    assert!(wait_until(Duration::from_secs(3), || {
        polls.load(Ordering::SeqCst) >= 2
    }));
    stop.request_stop();
    worker.join().unwrap();

    assert_eq!(*processed.lock().unwrap(), batch(&["a", "b"]));

    // The second poll comes only after the scaled backoff (4 × 50 ms).
    let times = poll_times.lock().unwrap();
    let gap = times[1].duration_since(times[0]);
    assert!(gap >= Duration::from_millis(180), "poll gap was {:?}", gap);
}

#[test]
fn processing_error_is_logged_and_loop_continues() {
    let mut handler = ScriptedHandler::default();
    handler.batches.push_back(batch(&["a", "b", "c"]));
    handler.batches.push_back(batch(&["d"]));
    handler.fail_on = Some("b".to_string());
    let processed = handler.processed.clone();

    let log = Arc::new(CapturingLog::default());
    let mut processor = QueueProcessor::new(handler, fast_settings()).with_log(log.clone());
    let stop = processor.stop_signal();
    let worker = std::thread::spawn(move || processor.run());

    // "b" fails and aborts its batch ("c" abandoned); the next cycle still
    // polls and processes "d".
    assert!(wait_until(Duration::from_secs(2), || {
        processed.lock().unwrap().contains(&"d".to_string())
    }));
    stop.request_stop();
    worker.join().unwrap();

    assert_eq!(*processed.lock().unwrap(), batch(&["a", "d"]));
    assert!(log.contains("error", "work cycle failed"));
    assert!(log.contains("error", "bad item b"));
}

#[test]
fn worker_thread_carries_processor_name() {
    let mut handler = ScriptedHandler::default();
    handler.batches.push_back(batch(&["a"]));
    let seen_name = handler.seen_thread_name.clone();
    let processed = handler.processed.clone();

    let mut processor = QueueProcessor::new(
        handler,
        QueueProcessorSettings {
            name: Some("billing-worker".to_string()),
            ..fast_settings()
        },
    );
    assert_eq!(processor.name(), Some("billing-worker"));
    let stop = processor.stop_signal();

    // Host behavior: the thread is named after the processor.
    let worker = std::thread::Builder::new()
        .name(processor.name().unwrap().to_string())
        .spawn(move || processor.run())
        .unwrap();

    assert!(wait_until(Duration::from_secs(2), || {
        processed.lock().unwrap().len() == 1
    }));
    stop.request_stop();
    worker.join().unwrap();

    assert_eq!(
        seen_name.lock().unwrap().as_deref(),
        Some("billing-worker")
    );
}
