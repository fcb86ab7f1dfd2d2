use crate::errors::WorkError;
use crate::processor::Processor;

// Type aliases for common types
pub type WorkResult<T> = Result<T, WorkError>;
pub type BoxedProcessor = Box<dyn Processor>;
