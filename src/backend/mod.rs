//! # Backend Integrations
//!
//! Outbound REST calls: the community backend and the bot-listing stats
//! endpoint. Callers see only boolean/optional results.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod client;
pub mod stats;

pub use client::{conversation_key, Ad, BackendClient};
pub use stats::{StatsBody, StatsPoster};
