//! Multi-threaded tests for sinks and the per-thread registry
//!
//! These tests verify:
//! - Active sinks are tracked per thread with no cross-thread interference
//! - Each thread lazily builds its own default sink
//! - A stream sink shared by several threads never interleaves inside a line

use parking_lot::Mutex;
use rust_field_sink::default_sink;
use rust_field_sink::prelude::*;
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const WRITES_PER_THREAD: i64 = 200;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_activation_is_per_thread() {
    let barrier = Arc::new(Barrier::new(THREADS));
    let sinks: Vec<Arc<MemorySink>> = (0..THREADS).map(|_| Arc::new(MemorySink::new())).collect();

    let handles: Vec<_> = sinks
        .iter()
        .enumerate()
        .map(|(id, sink)| {
            let sink = Arc::clone(sink);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                activate(sink, || {
                    // Every thread has its sink installed before anyone writes
                    barrier.wait();
                    for n in 0..WRITES_PER_THREAD {
                        write_fields(&[
                            int_field("thread", id as i64).unwrap(),
                            int_field("n", n).unwrap(),
                        ])
                        .unwrap();
                    }
                });
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    for (id, sink) in sinks.iter().enumerate() {
        let lines = sink.lines();
        assert_eq!(lines.len(), WRITES_PER_THREAD as usize);
        let prefix = format!("thread={}, ", id);
        assert!(lines.iter().all(|line| line.starts_with(&prefix)));
    }
}

#[test]
fn test_default_sink_per_thread() {
    let here = default_sink();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let first = default_sink();
                let again = current_sink();
                assert!(Arc::ptr_eq(&first, &again));
                Arc::as_ptr(&first) as *const () as usize
            })
        })
        .collect();

    let mut seen = HashSet::new();
    seen.insert(Arc::as_ptr(&here) as *const () as usize);
    for handle in handles {
        seen.insert(handle.join().expect("thread panicked"));
    }
    // Exited threads may share an address, but none can share this thread's.
    assert!(seen.len() >= 2);
}

#[test]
fn test_shared_stream_sink_lines_stay_whole() {
    let buffer = SharedBuffer::default();
    let stream: Arc<dyn Sink> = Arc::new(StreamSink::new(buffer.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|id| {
            let context = ContextSink::with_parent(
                Arc::clone(&stream),
                &[string_field("worker", format!("w{}", id)).unwrap()],
            );
            thread::spawn(move || {
                for n in 0..WRITES_PER_THREAD {
                    context
                        .write(&[int_field("n", n).unwrap(), bool_field("ok", true).unwrap()])
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let content = String::from_utf8(buffer.0.lock().clone()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * WRITES_PER_THREAD as usize);
    for line in lines {
        assert!(line.starts_with("worker=\"w"), "malformed line: {}", line);
        assert!(line.ends_with(", ok=true"), "malformed line: {}", line);
    }
}
