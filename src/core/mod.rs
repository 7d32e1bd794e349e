//! Core field types, the sink trait and the per-thread registry

pub mod error;
pub mod field;
pub mod line_format;
pub mod registry;
pub mod sink;

pub use error::{Result, SinkError};
pub use field::{
    bool_field, int_field, string_field, time_field, Field, FieldKind, FieldValue, TIME_FORMAT,
};
pub use line_format::{LineFormat, FIELD_SEPARATOR};
pub use registry::{
    activate, activate_guard, activation_depth, current_sink, default_sink, write_fields,
    ActivationGuard,
};
pub use sink::Sink;
