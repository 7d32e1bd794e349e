//! In-memory sink for capturing rendered lines

use crate::core::{Field, LineFormat, Result, Sink, SinkError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Terminal sink that keeps every rendered line in memory
///
/// Lines are stored without their trailing newline. Captured lines stay
/// readable after release; only further writes are refused.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
    format: LineFormat,
    released: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    /// Snapshot of the captured lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Remove and return the captured lines
    pub fn take_lines(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Captured lines joined with newlines, as a stream sink would have written them
    pub fn contents(&self) -> String {
        self.lines
            .lock()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }
}

impl Sink for MemorySink {
    fn write(&self, fields: &[Field]) -> Result<()> {
        if self.released.load(Ordering::Acquire) {
            return Err(SinkError::released(self.name()));
        }

        let mut line = self.format.render(fields)?;
        line.pop();
        self.lines.lock().push(line);
        Ok(())
    }

    fn release(&self) -> Result<()> {
        self.released.store(true, Ordering::Release);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl Drop for MemorySink {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
