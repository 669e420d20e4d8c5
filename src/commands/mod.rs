//! # Command System
//!
//! Commands answer both the slash (/) form and, when they opt in, the legacy
//! prefix form typed into a channel.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Commands declare their own metadata; prefix form restored with aliases
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use context::BotContext;
pub use handler::{BotCommand, CommandData, OptionKind, OptionSpec};
pub use registry::{CommandEntry, CommandRegistry};
pub use slash::{
    create_application_command, create_slash_commands, register_global_commands,
    register_guild_commands,
};
