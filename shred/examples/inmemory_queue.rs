// Minimal shred wiring: a queue processor draining an in-memory queue.
//
// Run with: cargo run --example inmemory_queue

use std::sync::Arc;
use std::time::Duration;

use crossbeam_queue::SegQueue;
use shred::host::{ProcessorFactory, QueueProcessorShred};
use shred::logging;
use shred::queue::{ProcessorContext, QueueHandler, QueueProcessor, QueueProcessorSettings};
use shred_api::{BoxedProcessor, Shred, WorkResult};
use tracing::info;

/// Handler backed by a lock-free in-memory queue.
struct InMemoryHandler {
    queue: Arc<SegQueue<u64>>,
}

impl QueueHandler for InMemoryHandler {
    type Item = u64;

    fn next_batch(&mut self, batch_size: usize) -> WorkResult<Vec<u64>> {
        let mut items = Vec::new();
        while items.len() < batch_size {
            match self.queue.pop() {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }

    fn process_item(&mut self, item: u64, _cx: &ProcessorContext) -> WorkResult<()> {
        info!("processed item {}", item);
        Ok(())
    }
}

struct DemoFactory {
    queue: Arc<SegQueue<u64>>,
}

impl ProcessorFactory for DemoFactory {
    fn display_name(&self) -> String {
        "demo queue shred".to_string()
    }

    fn description(&self) -> String {
        "drains an in-memory queue of numbered work items".to_string()
    }

    fn processors(&mut self) -> Vec<BoxedProcessor> {
        let handler = InMemoryHandler {
            queue: self.queue.clone(),
        };
        let settings = QueueProcessorSettings {
            name: Some("demo-worker".to_string()),
            batch_size: 8,
            sleep_time: Duration::from_millis(200),
        };
        vec![Box::new(QueueProcessor::new(handler, settings))]
    }
}

fn main() {
    logging::init_default();

    let queue = Arc::new(SegQueue::new());
    for item in 0..32u64 {
        queue.push(item);
    }

    let mut shred = QueueProcessorShred::new(DemoFactory {
        queue: queue.clone(),
    });
    shred.start();

    // Let the worker drain the queue, then feed it a little more.
    std::thread::sleep(Duration::from_millis(500));
    for item in 32..40u64 {
        queue.push(item);
    }
    std::thread::sleep(Duration::from_millis(500));

    shred.stop();
    info!("remaining items: {}", queue.len());
}
