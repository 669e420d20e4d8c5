//! Command handler trait and declared command metadata
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Commands carry their own metadata (aliases, permission, upload flag)
//!   and an optional prefix executor
//! - 1.0.0: Initial implementation for slash-only handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::permissions::Permissions;
use std::sync::Arc;

use super::context::BotContext;
use crate::gateway::{IncomingInteraction, IncomingMessage};

/// Kinds of slash command options the bot declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
    Role,
    Channel,
}

/// One declared slash command option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
    pub autocomplete: bool,
}

impl OptionSpec {
    pub fn new(name: &'static str, description: &'static str, kind: OptionKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: false,
            autocomplete: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }
}

/// Everything the registry and the deploy step need to know about a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandData {
    pub name: &'static str,
    pub description: &'static str,
    /// Alternate prefix triggers
    pub aliases: &'static [&'static str],
    /// Required member permission, checked before prefix execution
    pub permission: Option<Permissions>,
    /// Pushed to the platform by the deploy step
    pub upload: bool,
    pub options: Vec<OptionSpec>,
}

impl CommandData {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            aliases: &[],
            permission: None,
            upload: true,
            options: Vec::new(),
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn permission(mut self, permission: Permissions) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn local_only(mut self) -> Self {
        self.upload = false;
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }
}

/// A bot command
///
/// `execute` handles the slash form. Commands that also accept the legacy
/// text form return `true` from `supports_prefix` and override
/// `execute_prefix`.
///
/// # Example
///
/// ```ignore
/// pub struct PingCommand;
///
/// #[async_trait]
/// impl BotCommand for PingCommand {
///     fn data(&self) -> CommandData {
///         CommandData::new("ping", "Check that the bot is alive")
///     }
///
///     async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
///         ctx.gateway.respond(interaction, Reply::text("Pong!")).await
///     }
/// }
/// ```
#[async_trait]
pub trait BotCommand: Send + Sync {
    fn data(&self) -> CommandData;

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()>;

    fn supports_prefix(&self) -> bool {
        false
    }

    /// Handle the prefix form with whitespace-split arguments
    async fn execute_prefix(
        &self,
        _ctx: Arc<BotContext>,
        _msg: &IncomingMessage,
        _args: &[String],
    ) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn BotCommand) {}

    #[test]
    fn test_command_data_builder() {
        let data = CommandData::new("observer", "Set the observer role")
            .aliases(&["obs"])
            .permission(Permissions::ADMINISTRATOR)
            .option(OptionSpec::new("role", "Observer role", OptionKind::Role).required());

        assert_eq!(data.name, "observer");
        assert_eq!(data.aliases, &["obs"]);
        assert_eq!(data.permission, Some(Permissions::ADMINISTRATOR));
        assert!(data.upload);
        assert_eq!(data.options.len(), 1);
        assert!(data.options[0].required);
        assert!(!data.options[0].autocomplete);
    }

    #[test]
    fn test_local_only_skips_upload() {
        let data = CommandData::new("reply", "Answer the last DM").local_only();
        assert!(!data.upload);
    }
}
