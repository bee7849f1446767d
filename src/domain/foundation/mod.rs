//! Foundation module - Shared domain primitives.
//!
//! Contains the error vocabulary shared by every layer of the service.

mod errors;

pub use errors::{DomainError, ErrorCode, ValidationError};
