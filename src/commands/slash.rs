//! # Slash Command Definitions (/)
//!
//! Turns declared command metadata into platform definitions and pushes them.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Definitions are derived from the loaded registry
//! - 1.0.0: Reorganized from monolithic slash_commands.rs

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::http::Http;
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::id::GuildId;

use super::handler::{CommandData, OptionKind};
use super::registry::CommandRegistry;

fn option_type(kind: OptionKind) -> CommandOptionType {
    match kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Role => CommandOptionType::Role,
        OptionKind::Channel => CommandOptionType::Channel,
    }
}

/// Build the platform definition for one command
pub fn create_application_command(data: &CommandData) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name(data.name).description(data.description);
    if let Some(permission) = data.permission {
        command.default_member_permissions(permission);
    }
    for spec in &data.options {
        command.create_option(|option| {
            option
                .name(spec.name)
                .description(spec.description)
                .kind(option_type(spec.kind))
                .required(spec.required)
                .set_autocomplete(spec.autocomplete)
        });
    }
    command
}

/// Definitions for every command flagged for upload
pub fn create_slash_commands(registry: &CommandRegistry) -> Vec<CreateApplicationCommand> {
    registry
        .uploadable()
        .iter()
        .map(create_application_command)
        .collect()
}

/// Replace the global command set
pub async fn register_global_commands(
    http: &Http,
    commands: Vec<CreateApplicationCommand>,
) -> Result<usize> {
    let count = commands.len();
    Command::set_global_application_commands(http, |set| {
        for command in commands {
            set.add_application_command(command);
        }
        set
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(count)
}

/// Replace one guild's command set (propagates immediately, used for testing)
pub async fn register_guild_commands(
    http: &Http,
    guild_id: GuildId,
    commands: Vec<CreateApplicationCommand>,
) -> Result<usize> {
    let count = commands.len();
    guild_id
        .set_application_commands(http, |set| {
            for command in commands {
                set.add_application_command(command);
            }
            set
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(count)
}
