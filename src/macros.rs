//! Macros for building and writing field lists inline.
//!
//! Field construction can fail (an empty name is rejected), so these macros
//! evaluate to a `Result` instead of panicking.
//!
//! # Examples
//!
//! ```
//! use rust_field_sink::{activate, emit, fields, MemorySink};
//! use std::sync::Arc;
//!
//! let list = fields!["user" => "alice", "attempt" => 3, "ok" => true].unwrap();
//! assert_eq!(list.len(), 3);
//!
//! let memory = Arc::new(MemorySink::new());
//! activate(memory.clone(), || emit!("event" => "login", "attempt" => 3)).unwrap();
//! assert_eq!(memory.lines(), vec!["event=\"login\", attempt=3".to_string()]);
//! ```

/// Build a `Vec<Field>` from `name => value` pairs.
///
/// Evaluates to `Result<Vec<Field>>`; the first invalid name aborts the list.
///
/// # Examples
///
/// ```
/// use rust_field_sink::{fields, SinkError};
///
/// let list = fields!["a" => 1, "b" => "two"].unwrap();
/// assert_eq!(list[1].to_string(), "b=\"two\"");
///
/// assert!(matches!(fields!["" => 1], Err(SinkError::InvalidField { .. })));
/// assert!(fields![].unwrap().is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::result::Result::<::std::vec::Vec<$crate::Field>, $crate::SinkError>::Ok(
            ::std::vec::Vec::new(),
        )
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        (|| -> $crate::Result<::std::vec::Vec<$crate::Field>> {
            ::std::result::Result::Ok(::std::vec![$($crate::Field::new($name, $value)?),+])
        })()
    };
}

/// Write `name => value` pairs to the current sink of this thread.
///
/// # Examples
///
/// ```
/// use rust_field_sink::{activate, emit, MemorySink};
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemorySink::new());
/// activate(memory.clone(), || {
///     emit!("step" => 1).unwrap();
///     emit!().unwrap();
/// });
/// assert_eq!(memory.lines(), vec!["step=1".to_string(), String::new()]);
/// ```
#[macro_export]
macro_rules! emit {
    ($($name:expr => $value:expr),* $(,)?) => {
        $crate::fields!($($name => $value),*)
            .and_then(|fields| $crate::write_fields(&fields))
    };
}

/// Write `name => value` pairs to an explicit sink.
///
/// # Examples
///
/// ```
/// use rust_field_sink::{emit_to, MemorySink};
///
/// let memory = MemorySink::new();
/// emit_to!(memory; "cache" => "hit", "ms" => 4).unwrap();
/// assert_eq!(memory.lines(), vec!["cache=\"hit\", ms=4".to_string()]);
/// ```
#[macro_export]
macro_rules! emit_to {
    ($sink:expr; $($name:expr => $value:expr),* $(,)?) => {
        $crate::fields!($($name => $value),*).and_then(|fields| {
            use $crate::Sink as _;
            ($sink).write(&fields)
        })
    };
}
