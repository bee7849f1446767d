//! In-memory event sink for testing and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::ports::{EventSink, SinkError};

/// A single event recorded by the in-memory sink.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub event_id: String,
    pub event_type: String,
    pub customer_ref: Option<String>,
    pub payload: serde_json::Value,
}

/// In-memory `EventSink` keyed by event ID.
///
/// Recording the same event ID twice overwrites the previous entry, so
/// `recorded_count` doubles as a duplicate detector in tests.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: RwLock<HashMap<String, RecordedEvent>>,
    fail_next: AtomicBool,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `record_subscription_event` call fail with
    /// `SinkError::Unavailable`.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of distinct events recorded.
    pub fn recorded_count(&self) -> usize {
        self.events.read().unwrap().len()
    }

    /// Whether an event with the given ID was recorded.
    pub fn contains(&self, event_id: &str) -> bool {
        self.events.read().unwrap().contains_key(event_id)
    }

    /// Fetch a recorded event by ID.
    pub fn get(&self, event_id: &str) -> Option<RecordedEvent> {
        self.events.read().unwrap().get(event_id).cloned()
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn record_subscription_event(
        &self,
        event_id: &str,
        event_type: &str,
        customer_ref: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SinkError::Unavailable("injected failure".to_string()));
        }

        self.events.write().unwrap().insert(
            event_id.to_string(),
            RecordedEvent {
                event_id: event_id.to_string(),
                event_type: event_type.to_string(),
                customer_ref: customer_ref.map(String::from),
                payload: payload.clone(),
            },
        );

        Ok(())
    }
}
