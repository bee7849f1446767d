//! Tollgate - Payment Edge Service
//!
//! This crate proxies payment requests to Stripe and ingests Stripe webhook
//! notifications with signature verification and exactly-once side effects.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
