//! Boot-time error types
//!
//! Everything after boot uses `anyhow`; these cover the failures that abort
//! startup before the gateway connection is opened.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no commands declared in the manifest")]
    NoCommands,
    #[error("command '{name}' is flagged for upload but is not a valid slash command name")]
    InvalidSlashName { name: String },
    #[error("command '{name}' has upper-case letters; typed commands are matched lower-cased")]
    UppercaseName { name: String },
}
