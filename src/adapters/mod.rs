//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum handlers and routes
//! - `memory` - In-memory stores for tests and database-less operation
//! - `postgres` - Database-backed repositories
//! - `sink` - Event sink implementations (in-memory, Postgres, queued, timeout)
//! - `stripe` - Stripe REST API client

pub mod http;
pub mod memory;
pub mod postgres;
pub mod sink;
pub mod stripe;
