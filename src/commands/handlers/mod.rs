//! Built-in command implementations
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Add ReplyCommand for answering relayed DMs
//! - 1.1.0: Add AdCommand and ThemeCommand
//! - 1.0.0: Utility, moderation and guild settings commands

pub mod ad;
pub mod guild;
pub mod moderation;
pub mod relay;
pub mod theme;
pub mod utility;

use std::sync::Arc;

use super::handler::BotCommand;

/// Every built-in command, in registration order
pub fn all() -> Vec<Arc<dyn BotCommand>> {
    vec![
        Arc::new(utility::PingCommand),
        Arc::new(utility::HelpCommand),
        Arc::new(moderation::SlowmodeCommand),
        Arc::new(guild::ObserverCommand),
        Arc::new(guild::ForgetCommand),
        Arc::new(theme::ThemeCommand),
        Arc::new(ad::AdCommand),
        Arc::new(relay::ReplyCommand),
    ]
}

/// Parse a raw id or a user, role or channel mention
pub(crate) fn parse_snowflake(arg: &str) -> Option<u64> {
    let trimmed = arg
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_start_matches(['@', '#', '&', '!']);
    trimmed.parse().ok()
}
