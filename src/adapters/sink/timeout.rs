//! Timeout wrapper for event sinks.
//!
//! Bounds how long a single delivery may take so a stalled downstream
//! cannot hold the webhook handler (or the queue worker) indefinitely.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{EventSink, SinkError};

/// Wraps another sink and fails deliveries that exceed the deadline.
pub struct TimeoutSink {
    inner: Arc<dyn EventSink>,
    timeout: Duration,
}

impl TimeoutSink {
    pub fn new(inner: Arc<dyn EventSink>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl EventSink for TimeoutSink {
    async fn record_subscription_event(
        &self,
        event_id: &str,
        event_type: &str,
        customer_ref: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError> {
        let delivery =
            self.inner
                .record_subscription_event(event_id, event_type, customer_ref, payload);

        match tokio::time::timeout(self.timeout, delivery).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::Timeout(self.timeout.as_secs())),
        }
    }
}
