//! Public API for the keyed queue processor
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Processor and its consumer capability
pub use crate::processor::consumer::Consumer;
pub use crate::processor::manager::MultiQueueProcessor;

// Error handling
pub use crate::processor::error::{ErrorKind, ProcessorError, ProcessorResult};

// Statistics
pub use crate::processor::types::ProcessorStats;

// Configuration
pub use crate::core::config::{ProcessorConfig, DEFAULT_CAPACITY};
