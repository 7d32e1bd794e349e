//! Error types for the field sink system

pub type Result<T> = std::result::Result<T, SinkError>;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Field construction rejected its arguments
    #[error("Invalid field: {reason}")]
    InvalidField { reason: String },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Write attempted after the sink was released
    #[error("Sink '{sink}' has already been released")]
    Released { sink: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SinkError {
    /// Create an invalid field error
    pub fn invalid_field(reason: impl Into<String>) -> Self {
        SinkError::InvalidField {
            reason: reason.into(),
        }
    }

    /// Create an IO error with the operation that failed
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        SinkError::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a released-sink error
    pub fn released(sink: impl Into<String>) -> Self {
        SinkError::Released { sink: sink.into() }
    }

    /// Whether the failure came from the underlying stream
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, SinkError::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SinkError::invalid_field("field name must not be empty");
        assert!(matches!(err, SinkError::InvalidField { .. }));

        let err = SinkError::released("stream");
        assert!(matches!(err, SinkError::Released { .. }));
        assert!(!err.is_io());
    }

    #[test]
    fn test_error_display() {
        let err = SinkError::invalid_field("field name must not be empty");
        assert_eq!(err.to_string(), "Invalid field: field name must not be empty");

        let err = SinkError::released("context");
        assert_eq!(err.to_string(), "Sink 'context' has already been released");
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SinkError::io("writing field line", io_err);

        assert!(err.is_io());
        assert!(err.to_string().contains("writing field line"));
        assert!(err.to_string().contains("pipe closed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
