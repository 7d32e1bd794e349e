//! Stream sink implementation

use crate::core::{Field, LineFormat, Result, Sink, SinkError};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Where a stream sink writes, and whether it is responsible for closing it
enum Destination<'a> {
    Owned(Box<dyn Write + Send + 'a>),
    Borrowed(&'a mut (dyn Write + Send + 'a)),
}

impl Write for Destination<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Destination::Owned(w) => w.write(buf),
            Destination::Borrowed(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Destination::Owned(w) => w.write_all(buf),
            Destination::Borrowed(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Destination::Owned(w) => w.flush(),
            Destination::Borrowed(w) => w.flush(),
        }
    }
}

/// Terminal sink rendering every write as one line on a byte stream
///
/// The whole line is rendered in memory first and handed to the stream with a
/// single `write_all` while the writer lock is held, so lines from concurrent
/// writers never interleave. If the stream fails halfway it may still have
/// accepted a prefix of the line; the error is returned either way.
///
/// An owned stream is flushed and dropped on release. A borrowed stream is left
/// alone and can be used again once the sink is gone.
///
/// # Example
///
/// ```
/// use rust_field_sink::{int_field, string_field, Sink, StreamSink};
///
/// let mut buffer = Vec::new();
/// {
///     let sink = StreamSink::borrowed(&mut buffer);
///     sink.write(&[string_field("foo", "bar").unwrap(), int_field("n", 2).unwrap()])
///         .unwrap();
/// }
/// assert_eq!(String::from_utf8(buffer).unwrap(), "foo=\"bar\", n=2\n");
/// ```
pub struct StreamSink<'a> {
    output: Mutex<Option<Destination<'a>>>,
    owns_output: bool,
    format: LineFormat,
    flush_each_write: bool,
}

impl<'a> StreamSink<'a> {
    /// Create a sink that owns `writer` and closes it on release
    pub fn new(writer: impl Write + Send + 'a) -> Self {
        Self::from_destination(Destination::Owned(Box::new(writer)))
    }

    /// Create a sink over a caller-owned writer; release leaves it open
    pub fn borrowed<W: Write + Send>(writer: &'a mut W) -> Self {
        Self::from_destination(Destination::Borrowed(writer))
    }

    pub fn builder() -> StreamSinkBuilder<'a> {
        StreamSinkBuilder::new()
    }

    fn from_destination(destination: Destination<'a>) -> Self {
        let owns_output = matches!(destination, Destination::Owned(_));
        Self {
            output: Mutex::new(Some(destination)),
            owns_output,
            format: LineFormat::default(),
            flush_each_write: true,
        }
    }

    /// Set the line format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_field_sink::{LineFormat, StreamSink};
    ///
    /// let sink = StreamSink::stdout().with_format(LineFormat::Json);
    /// assert_eq!(sink.format(), LineFormat::Json);
    /// ```
    #[must_use]
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    /// Flush the stream after every line (default: true)
    #[must_use]
    pub fn with_flush_each_write(mut self, flush: bool) -> Self {
        self.flush_each_write = flush;
        self
    }

    pub fn owns_output(&self) -> bool {
        self.owns_output
    }

    pub fn format(&self) -> LineFormat {
        self.format
    }

    /// Whether the destination has been given up
    pub fn is_released(&self) -> bool {
        self.output.lock().is_none()
    }
}

impl StreamSink<'static> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Create a sink appending to the file at `path`, creating it if missing
    ///
    /// ```no_run
    /// use rust_field_sink::StreamSink;
    ///
    /// let sink = StreamSink::file("/var/log/app.fields").unwrap();
    /// assert!(sink.owns_output());
    /// ```
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SinkError::io(format!("opening '{}'", path.display()), e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl Sink for StreamSink<'_> {
    fn write(&self, fields: &[Field]) -> Result<()> {
        let line = self.format.render(fields)?;

        let mut output = self.output.lock();
        let destination = output
            .as_mut()
            .ok_or_else(|| SinkError::released(self.name()))?;

        destination
            .write_all(line.as_bytes())
            .map_err(|e| SinkError::io("writing field line", e))?;
        if self.flush_each_write {
            destination
                .flush()
                .map_err(|e| SinkError::io("flushing field line", e))?;
        }
        Ok(())
    }

    fn release(&self) -> Result<()> {
        let Some(destination) = self.output.lock().take() else {
            return Ok(());
        };

        match destination {
            Destination::Owned(mut writer) => writer
                .flush()
                .map_err(|e| SinkError::io("flushing output on release", e)),
            Destination::Borrowed(_) => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "stream"
    }
}

impl Drop for StreamSink<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            eprintln!("[rust_field_sink] failed to release stream sink: {}", e);
        }
    }
}

/// Builder for [`StreamSink`]
///
/// Without an explicit destination the sink writes to stdout.
///
/// # Example
///
/// ```
/// use rust_field_sink::{LineFormat, StreamSink};
///
/// let mut buffer = Vec::new();
/// let sink = StreamSink::builder()
///     .borrowed_output(&mut buffer)
///     .format(LineFormat::Json)
///     .flush_each_write(false)
///     .build();
/// assert!(!sink.owns_output());
/// ```
pub struct StreamSinkBuilder<'a> {
    destination: Option<Destination<'a>>,
    format: LineFormat,
    flush_each_write: bool,
}

impl<'a> StreamSinkBuilder<'a> {
    pub fn new() -> Self {
        Self {
            destination: None,
            format: LineFormat::default(),
            flush_each_write: true,
        }
    }

    /// Write to `writer`, which the sink will own
    #[must_use]
    pub fn output(mut self, writer: impl Write + Send + 'a) -> Self {
        self.destination = Some(Destination::Owned(Box::new(writer)));
        self
    }

    /// Write to a caller-owned writer
    #[must_use]
    pub fn borrowed_output<W: Write + Send>(mut self, writer: &'a mut W) -> Self {
        self.destination = Some(Destination::Borrowed(writer));
        self
    }

    #[must_use]
    pub fn format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn flush_each_write(mut self, flush: bool) -> Self {
        self.flush_each_write = flush;
        self
    }

    pub fn build(self) -> StreamSink<'a> {
        let destination = self
            .destination
            .unwrap_or_else(|| Destination::Owned(Box::new(io::stdout())));
        StreamSink::from_destination(destination)
            .with_format(self.format)
            .with_flush_each_write(self.flush_each_write)
    }
}

impl Default for StreamSinkBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{bool_field, int_field, string_field, time_field};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Writer sharing its buffer with the test and recording when it is dropped
    struct TrackingWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
        closed: Arc<AtomicBool>,
    }

    impl Write for TrackingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for TrackingWriter {
        fn drop(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Writer counting flushes into a shared buffer
    struct FlushCounter {
        buffer: Arc<Mutex<Vec<u8>>>,
        flushes: Arc<AtomicUsize>,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn tracking() -> (TrackingWriter, Arc<Mutex<Vec<u8>>>, Arc<AtomicBool>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let writer = TrackingWriter {
            buffer: Arc::clone(&buffer),
            closed: Arc::clone(&closed),
        };
        (writer, buffer, closed)
    }

    #[test]
    fn test_renders_wire_format() {
        let at = NaiveDate::from_ymd_opt(2025, 4, 13)
            .and_then(|d| d.and_hms_opt(1, 40, 0))
            .expect("valid datetime");
        let mut buffer = Vec::new();
        {
            let sink = StreamSink::borrowed(&mut buffer);
            sink.write(&[
                string_field("foo", "bar").unwrap(),
                time_field("baz", at).unwrap(),
            ])
            .unwrap();
            sink.write(&[bool_field("ok", false).unwrap(), int_field("n", 7).unwrap()])
                .unwrap();
        }

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "foo=\"bar\", baz=2025-04-13T01:40:00\nok=false, n=7\n"
        );
    }

    #[test]
    fn test_empty_write_is_bare_newline() {
        let mut buffer = Vec::new();
        {
            let sink = StreamSink::borrowed(&mut buffer);
            sink.write(&[]).unwrap();
        }
        assert_eq!(buffer, b"\n");
    }

    #[test]
    fn test_owned_output_released() {
        let (writer, buffer, closed) = tracking();
        let sink = StreamSink::new(writer);
        assert!(sink.owns_output());

        sink.write(&[int_field("n", 1).unwrap()]).unwrap();
        sink.release().unwrap();

        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(buffer.lock().as_slice(), b"n=1\n");
    }

    #[test]
    fn test_owned_output_released_on_drop() {
        let (writer, _buffer, closed) = tracking();
        {
            let _sink = StreamSink::new(writer);
        }
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_borrowed_output_survives_release() {
        let (mut writer, buffer, closed) = tracking();
        {
            let sink = StreamSink::borrowed(&mut writer);
            assert!(!sink.owns_output());
            sink.write(&[int_field("first", 1).unwrap()]).unwrap();
            sink.release().unwrap();
        }
        assert!(!closed.load(Ordering::SeqCst));

        writer.write_all(b"reused\n").unwrap();
        assert_eq!(buffer.lock().as_slice(), b"first=1\nreused\n");
    }

    #[test]
    fn test_release_is_idempotent() {
        let sink = StreamSink::new(Vec::new());
        sink.release().unwrap();
        sink.release().unwrap();
        assert!(sink.is_released());
    }

    #[test]
    fn test_write_after_release_fails() {
        let sink = StreamSink::new(Vec::new());
        sink.release().unwrap();

        let err = sink.write(&[int_field("n", 1).unwrap()]).unwrap_err();
        assert!(matches!(err, SinkError::Released { .. }));
    }

    #[test]
    fn test_io_failure_propagates() {
        let sink = StreamSink::new(FailingWriter);
        let err = sink.write(&[int_field("n", 1).unwrap()]).unwrap_err();

        assert!(err.is_io());
        sink.release().unwrap();
        assert!(sink.is_released());
    }

    #[test]
    fn test_builder_json_format() {
        let mut buffer = Vec::new();
        {
            let sink = StreamSink::builder()
                .borrowed_output(&mut buffer)
                .format(LineFormat::Json)
                .build();
            sink.write(&[string_field("user", "ann").unwrap(), int_field("id", 9).unwrap()])
                .unwrap();
        }
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\"user\":\"ann\",\"id\":9}\n"
        );
    }

    #[test]
    fn test_flush_each_write_disabled() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let flushes = Arc::new(AtomicUsize::new(0));
        let sink = StreamSink::builder()
            .output(FlushCounter {
                buffer: Arc::clone(&buffer),
                flushes: Arc::clone(&flushes),
            })
            .flush_each_write(false)
            .build();

        sink.write(&[int_field("n", 1).unwrap()]).unwrap();
        sink.write(&[int_field("n", 2).unwrap()]).unwrap();
        assert_eq!(flushes.load(Ordering::SeqCst), 0);
        assert_eq!(buffer.lock().as_slice(), b"n=1\nn=2\n");

        sink.release().unwrap();
        assert_eq!(flushes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_flush_each_write_enabled() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let flushes = Arc::new(AtomicUsize::new(0));
        let sink = StreamSink::new(FlushCounter {
            buffer: Arc::clone(&buffer),
            flushes: Arc::clone(&flushes),
        });

        sink.write(&[int_field("n", 1).unwrap()]).unwrap();
        sink.write(&[]).unwrap();
        assert_eq!(flushes.load(Ordering::SeqCst), 2);
        assert_eq!(buffer.lock().as_slice(), b"n=1\n\n");
    }

    #[test]
    fn test_builder_defaults_to_stdout() {
        let sink = StreamSink::builder().build();
        assert!(sink.owns_output());
        assert_eq!(sink.format(), LineFormat::Text);
    }
}
