// Shred Framework Implementation
//
// This crate provides the queue-processing implementation of the shred API:
// a generic batch-polling engine and a thread-per-processor host with
// transactional startup and best-effort, timeout-bounded shutdown.

pub mod host;
pub mod logging;
pub mod queue;

// Re-export commonly used types
pub use host::{ProcessorFactory, QueueProcessorShred, ShredSettings};
pub use queue::{ProcessorContext, QueueHandler, QueueProcessor, QueueProcessorSettings};
pub use shred_api::{
    BoxedProcessor, EventLog, IsolationLevel, Processor, Shred, StopFlag, StopSignal, TracingLog,
    WorkError, WorkResult,
};
