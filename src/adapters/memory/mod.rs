//! In-memory adapters for tests and database-less operation.

mod webhook_event_repository;

pub use webhook_event_repository::InMemoryWebhookEventRepository;
