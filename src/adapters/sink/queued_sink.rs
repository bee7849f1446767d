//! Queued event sink with a background delivery worker.
//!
//! `QueuedEventSink` enqueues events on a bounded channel and returns
//! immediately, keeping webhook acknowledgement latency independent of
//! the downstream sink. `SinkWorker` drains the channel and delivers
//! each event to the wrapped sink.
//!
//! ## Overflow
//!
//! When the queue is full, `record_subscription_event` fails with
//! `SinkError::QueueFull`. The caller logs and drops the event; the
//! webhook is still acknowledged and the event can be replayed from the
//! stored record.
//!
//! ## Graceful Shutdown
//!
//! The worker listens on a watch channel and drains any queued events
//! before exiting.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::ports::{EventSink, SinkError};

/// An event waiting for delivery.
#[derive(Debug, Clone)]
struct QueuedEvent {
    event_id: String,
    event_type: String,
    customer_ref: Option<String>,
    payload: serde_json::Value,
}

/// `EventSink` that hands events to a background [`SinkWorker`].
pub struct QueuedEventSink {
    sender: mpsc::Sender<QueuedEvent>,
}

impl QueuedEventSink {
    /// Create a queued sink and its worker.
    ///
    /// The worker must be driven by calling [`SinkWorker::run`] on a
    /// spawned task; until then, events accumulate in the queue.
    pub fn new(inner: Arc<dyn EventSink>, queue_capacity: usize) -> (Self, SinkWorker) {
        let (sender, receiver) = mpsc::channel(queue_capacity);
        (Self { sender }, SinkWorker { inner, receiver })
    }
}

#[async_trait]
impl EventSink for QueuedEventSink {
    async fn record_subscription_event(
        &self,
        event_id: &str,
        event_type: &str,
        customer_ref: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError> {
        let event = QueuedEvent {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            customer_ref: customer_ref.map(String::from),
            payload: payload.clone(),
        };

        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => {
                SinkError::Unavailable("sink worker stopped".to_string())
            }
        })
    }
}

/// Background task that delivers queued events to the wrapped sink.
pub struct SinkWorker {
    inner: Arc<dyn EventSink>,
    receiver: mpsc::Receiver<QueuedEvent>,
}

impl SinkWorker {
    /// Run the delivery loop until shutdown signal is received.
    ///
    /// On shutdown, remaining queued events are drained before exit.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        self.drain().await;
                        return;
                    }
                }

                event = self.receiver.recv() => {
                    match event {
                        Some(event) => self.deliver(event).await,
                        // All senders dropped
                        None => return,
                    }
                }
            }
        }
    }

    /// Deliver everything still sitting in the queue.
    async fn drain(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            self.deliver(event).await;
        }
    }

    async fn deliver(&self, event: QueuedEvent) {
        let result = self
            .inner
            .record_subscription_event(
                &event.event_id,
                &event.event_type,
                event.customer_ref.as_deref(),
                &event.payload,
            )
            .await;

        if let Err(e) = result {
            tracing::error!(
                event_id = %event.event_id,
                event_type = %event.event_type,
                error = %e,
                "Queued sink delivery failed; event must be replayed from the stored record"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sink::InMemoryEventSink;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn enqueued_event_reaches_inner_sink() {
        let inner = Arc::new(InMemoryEventSink::new());
        let (sink, worker) = QueuedEventSink::new(inner.clone(), 16);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(worker.run(shutdown_rx));

        sink.record_subscription_event("evt_1", "invoice.paid", Some("cus_1"), &json!({}))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(inner.contains("evt_1"));

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn full_queue_rejects_with_queue_full() {
        let inner = Arc::new(InMemoryEventSink::new());
        // Capacity 1, no worker running to drain it.
        let (sink, _worker) = QueuedEventSink::new(inner, 1);

        sink.record_subscription_event("evt_1", "invoice.paid", None, &json!({}))
            .await
            .unwrap();

        let overflow = sink
            .record_subscription_event("evt_2", "invoice.paid", None, &json!({}))
            .await;
        assert!(matches!(overflow, Err(SinkError::QueueFull)));
    }

    #[tokio::test]
    async fn shutdown_drains_queued_events() {
        let inner = Arc::new(InMemoryEventSink::new());
        let (sink, worker) = QueuedEventSink::new(inner.clone(), 16);

        for i in 0..5 {
            sink.record_subscription_event(
                &format!("evt_{}", i),
                "invoice.paid",
                None,
                &json!({}),
            )
            .await
            .unwrap();
        }

        // Start the worker after the queue is populated, then stop it
        // immediately. The drain pass must still deliver everything.
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(worker.run(shutdown_rx));
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(inner.recorded_count(), 5);
    }

    #[tokio::test]
    async fn stopped_worker_makes_sink_unavailable() {
        let inner = Arc::new(InMemoryEventSink::new());
        let (sink, worker) = QueuedEventSink::new(inner, 16);
        drop(worker);

        let result = sink
            .record_subscription_event("evt_1", "invoice.paid", None, &json!({}))
            .await;
        assert!(matches!(result, Err(SinkError::Unavailable(_))));
    }
}
