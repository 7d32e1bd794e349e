//! Sink implementations

pub mod context;
pub mod memory;
pub mod stream;

pub use context::{with_context, ContextSink};
pub use memory::MemorySink;
pub use stream::{StreamSink, StreamSinkBuilder};

// Re-export the trait next to its implementations
pub use crate::core::Sink;
