//! Context sink: fixed fields prepended to every write
//!
//! A [`ContextSink`] binds its parent when it is created. With
//! [`ContextSink::new`] that parent is whatever sink is active on the current
//! thread at that moment; activating a different sink later does not
//! redirect the context. Chained contexts therefore render outer fields
//! first, then inner fields, then the fields of the write itself.
//!
//! # Example
//!
//! ```
//! use rust_field_sink::{activate, int_field, ContextSink, MemorySink, Sink};
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemorySink::new());
//! activate(memory.clone(), || {
//!     let outer = Arc::new(ContextSink::new(&[int_field("a", 1).unwrap()]));
//!     activate(outer, || {
//!         let inner = ContextSink::new(&[int_field("b", 2).unwrap()]);
//!         inner.write(&[int_field("c", 3).unwrap()]).unwrap();
//!     });
//! });
//!
//! assert_eq!(memory.lines(), vec!["a=1, b=2, c=3".to_string()]);
//! ```

use crate::core::{activate, current_sink, Field, Result, Sink, SinkError};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct ContextSink {
    parent: Arc<dyn Sink>,
    fields: RwLock<Option<Vec<Field>>>,
}

impl ContextSink {
    /// Create a context over the thread's current sink, copying `fields`
    pub fn new(fields: &[Field]) -> Self {
        Self::with_parent(current_sink(), fields)
    }

    /// Create a context forwarding to `parent`, copying `fields`
    pub fn with_parent(parent: Arc<dyn Sink>, fields: &[Field]) -> Self {
        Self {
            parent,
            fields: RwLock::new(Some(fields.to_vec())),
        }
    }

    pub fn parent(&self) -> &Arc<dyn Sink> {
        &self.parent
    }

    /// Copy of the fixed fields; empty once released
    pub fn fields(&self) -> Vec<Field> {
        self.fields.read().clone().unwrap_or_default()
    }

    pub fn is_released(&self) -> bool {
        self.fields.read().is_none()
    }
}

impl Sink for ContextSink {
    fn write(&self, fields: &[Field]) -> Result<()> {
        let combined = {
            let fixed = self.fields.read();
            let fixed = fixed
                .as_ref()
                .ok_or_else(|| SinkError::released(self.name()))?;

            let mut combined = Vec::with_capacity(fixed.len() + fields.len());
            combined.extend_from_slice(fixed);
            combined.extend_from_slice(fields);
            combined
        };

        self.parent.write(&combined)
    }

    fn release(&self) -> Result<()> {
        // The parent is shared, not owned; it stays untouched.
        self.fields.write().take();
        Ok(())
    }

    fn name(&self) -> &str {
        "context"
    }
}

impl Drop for ContextSink {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Run `f` with a context over the current sink installed as the active sink
///
/// Every write performed through the thread's active sink inside `f` gets
/// `fields` prepended.
///
/// ```
/// use rust_field_sink::{activate, string_field, int_field, with_context, write_fields, MemorySink};
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemorySink::new());
/// activate(memory.clone(), || {
///     with_context(&[string_field("request", "r-1").unwrap()], || {
///         write_fields(&[int_field("status", 200).unwrap()])
///     })
/// })
/// .unwrap();
///
/// assert_eq!(memory.lines(), vec!["request=\"r-1\", status=200".to_string()]);
/// ```
pub fn with_context<R>(fields: &[Field], f: impl FnOnce() -> R) -> R {
    let context = Arc::new(ContextSink::new(fields));
    activate(context, f)
}
