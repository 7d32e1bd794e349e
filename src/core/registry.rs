//! Per-thread active sink registry
//!
//! Every thread has its own active-sink slot. Until something is activated the
//! slot resolves to a thread-owned [`StreamSink`] over stdout, created on first
//! use and reused afterwards.
//!
//! Activation is strictly scoped: [`activate`] runs a closure with a sink
//! installed and [`activate_guard`] returns an RAII guard. Either way the
//! previously active sink comes back when the scope ends, whether it ends
//! normally, through an early `Err` return, or by unwinding.
//!
//! # Example
//!
//! ```
//! use rust_field_sink::{activate, current_sink, int_field, write_fields, MemorySink, Sink};
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemorySink::new());
//! activate(memory.clone(), || write_fields(&[int_field("answer", 42).unwrap()])).unwrap();
//!
//! assert_eq!(memory.lines(), vec!["answer=42".to_string()]);
//! assert_eq!(current_sink().name(), "stream");
//! ```

use super::{error::Result, field::Field, sink::Sink};
use crate::sinks::StreamSink;
use std::cell::{Cell, OnceCell, RefCell};
use std::marker::PhantomData;
use std::sync::Arc;

/// One installed activation; `id` ties it to the guard that removes it
struct Activation {
    id: u64,
    sink: Arc<dyn Sink>,
}

thread_local! {
    static DEFAULT_SINK: OnceCell<Arc<dyn Sink>> = const { OnceCell::new() };
    static ACTIVATIONS: RefCell<Vec<Activation>> = const { RefCell::new(Vec::new()) };
    static NEXT_ACTIVATION_ID: Cell<u64> = const { Cell::new(0) };
}

/// The thread's stdout sink, created on first access
pub fn default_sink() -> Arc<dyn Sink> {
    DEFAULT_SINK.with(|once| {
        Arc::clone(once.get_or_init(|| Arc::new(StreamSink::stdout()) as Arc<dyn Sink>))
    })
}

/// The sink writes on this thread currently resolve to
pub fn current_sink() -> Arc<dyn Sink> {
    let active = ACTIVATIONS.with(|stack| stack.borrow().last().map(|a| Arc::clone(&a.sink)));
    match active {
        Some(sink) => sink,
        None => default_sink(),
    }
}

/// Number of activations currently in effect on this thread
pub fn activation_depth() -> usize {
    ACTIVATIONS.with(|stack| stack.borrow().len())
}

/// Write fields to the current sink of this thread
pub fn write_fields(fields: &[Field]) -> Result<()> {
    current_sink().write(fields)
}

/// Run `f` with `sink` installed as this thread's active sink
pub fn activate<R>(sink: Arc<dyn Sink>, f: impl FnOnce() -> R) -> R {
    let _guard = activate_guard(sink);
    f()
}

/// Install `sink` as this thread's active sink until the guard is dropped
///
/// Guards are meant to be dropped in reverse order of creation, which
/// [`activate`] guarantees. Dropping a guard early removes only its own
/// activation; the most recent activation still in place stays current.
pub fn activate_guard(sink: Arc<dyn Sink>) -> ActivationGuard {
    let id = NEXT_ACTIVATION_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });
    let depth = ACTIVATIONS.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(Activation { id, sink });
        stack.len()
    });

    ActivationGuard {
        id,
        depth,
        _not_send: PhantomData,
    }
}

/// RAII guard removing its activation on drop
///
/// Bound to the thread that created it.
#[must_use = "the sink is deactivated as soon as the guard is dropped"]
pub struct ActivationGuard {
    id: u64,
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl ActivationGuard {
    /// Depth of this activation when it was installed, starting at 1
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        // The slot may already be gone if the guard outlives thread-local teardown.
        let outgoing = ACTIVATIONS
            .try_with(|stack| {
                let mut stack = stack.borrow_mut();
                stack
                    .iter()
                    .rposition(|a| a.id == self.id)
                    .map(|index| stack.remove(index))
            })
            .ok()
            .flatten();
        // Released outside the borrow: the sink's own Drop may use the registry.
        drop(outgoing);
    }
}
