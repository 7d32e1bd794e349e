//! Sink trait for field destinations

use super::{error::Result, field::Field};

/// Destination that consumes one set of fields per `write`
///
/// Implementations either render the fields (terminal sinks) or forward them to
/// another sink. A `write` either handles the whole slice or returns an error.
///
/// `release` gives up whatever the sink holds. It must be idempotent; every
/// sink in this crate also calls it from `Drop`, so an explicit call is only
/// needed to observe release errors. Writes after release fail with
/// [`SinkError::Released`](super::SinkError::Released).
pub trait Sink: Send + Sync {
    fn write(&self, fields: &[Field]) -> Result<()>;
    fn release(&self) -> Result<()>;
    fn name(&self) -> &str;
}
