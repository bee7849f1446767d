//! Event sink adapters.
//!
//! Implementations of the `EventSink` port:
//! - `InMemoryEventSink`: tests and local development
//! - `PostgresEventSink`: appends to the `billing_events` table
//! - `QueuedEventSink` + `SinkWorker`: bounded queue with background delivery
//! - `TimeoutSink`: deadline wrapper for any sink

mod in_memory_sink;
mod postgres_sink;
mod queued_sink;
mod timeout;

pub use in_memory_sink::{InMemoryEventSink, RecordedEvent};
pub use postgres_sink::PostgresEventSink;
pub use queued_sink::{QueuedEventSink, SinkWorker};
pub use timeout::TimeoutSink;
