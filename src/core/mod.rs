//! # Core Module
//!
//! Configuration, boot-time errors and Discord message helpers.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add error module for boot-time failures
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod error;
pub mod response;

pub use config::Config;
pub use error::{ConfigError, LoadError};
pub use response::{truncate_for_message, MESSAGE_LIMIT};
