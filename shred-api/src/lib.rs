//! # Shred API
//!
//! Contract layer for shred background workers: the minimal capability set a
//! host process needs to manage units of background functionality uniformly,
//! regardless of what they do.
//!
//! ## Design Principles
//!
//! - **Host safety**: no failure inside a shred may propagate to the host
//!   through `start`/`stop` — the lifecycle signatures encode this.
//! - **Cooperative cancellation**: stop is a polled flag, never preemption.
//! - **Minimal surface**: four lifecycle operations plus deployment metadata;
//!   everything else belongs to concrete implementations.
//!
//! ## Core Components
//!
//! - [`shred`]: the `Shred` lifecycle trait and isolation metadata
//! - [`processor`]: the `Processor` worker contract and stop signaling
//! - [`errors`]: failure taxonomy for queue-processing work
//! - [`log`]: injectable logging port with a `tracing` default backend
//! - [`types`]: common type aliases

pub mod errors;
pub mod log;
pub mod processor;
pub mod shred;
pub mod types;

pub use errors::WorkError;
pub use log::{EventLog, TracingLog};
pub use processor::{Processor, StopFlag, StopSignal};
pub use shred::{IsolationLevel, Shred};
pub use types::{BoxedProcessor, WorkResult};
