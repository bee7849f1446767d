//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresWebhookEventRepository` - idempotency records for webhook deliveries

mod webhook_event_repository;

pub use webhook_event_repository::PostgresWebhookEventRepository;
