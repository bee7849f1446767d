//! PostgreSQL event sink.
//!
//! Appends verified webhook events to the `billing_events` table for
//! downstream consumers (reporting, reconciliation, replay).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::ports::{EventSink, SinkError};

/// `EventSink` backed by the `billing_events` table.
pub struct PostgresEventSink {
    pool: PgPool,
}

impl PostgresEventSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventSink for PostgresEventSink {
    async fn record_subscription_event(
        &self,
        event_id: &str,
        event_type: &str,
        customer_ref: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError> {
        sqlx::query(
            r#"
            INSERT INTO billing_events (id, event_id, event_type, customer_ref, payload, recorded_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(event_type)
        .bind(customer_ref)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
