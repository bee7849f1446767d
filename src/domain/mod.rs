//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, validation vocabulary)
//! - `billing` - Webhook verification, event classification, idempotent
//!   processing, and proxy-request validation

pub mod billing;
pub mod foundation;
