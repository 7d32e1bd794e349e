//! # Rust Field Sink
//!
//! Structured name/value logging built around pluggable sinks.
//!
//! ## Features
//!
//! - **Typed Fields**: bool, integer, string and time values with validated names
//! - **Pluggable Sinks**: stream, in-memory and context sinks behind one trait
//! - **Nested Contexts**: fixed fields prepended to every write, outer to inner
//! - **Per-Thread Defaults**: scoped activation of the sink writes resolve to
//!
//! ## Example
//!
//! ```
//! use rust_field_sink::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemorySink::new());
//! activate(memory.clone(), || {
//!     with_context(&[string_field("service", "api")?], || {
//!         write_fields(&[int_field("status", 200)?])
//!     })
//! })?;
//!
//! assert_eq!(memory.lines(), vec!["service=\"api\", status=200".to_string()]);
//! # Ok::<(), SinkError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        activate, activate_guard, bool_field, current_sink, int_field, string_field, time_field,
        write_fields, ActivationGuard, Field, FieldKind, FieldValue, LineFormat, Result, Sink,
        SinkError,
    };
    pub use crate::sinks::{with_context, ContextSink, MemorySink, StreamSink};
}

pub use crate::core::{
    activate, activate_guard, activation_depth, bool_field, current_sink, default_sink,
    int_field, string_field, time_field, write_fields, ActivationGuard, Field, FieldKind,
    FieldValue, LineFormat, Result, Sink, SinkError, FIELD_SEPARATOR, TIME_FORMAT,
};
pub use sinks::{with_context, ContextSink, MemorySink, StreamSink, StreamSinkBuilder};
