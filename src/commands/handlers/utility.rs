//! Utility commands
//!
//! Handles: ping, help
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Prefix forms and alias listing in help
//! - 1.0.0: Initial slash implementations

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::{BotCommand, CommandData};
use crate::core::response::{chunk_for_message, truncate_for_message};
use crate::gateway::{IncomingInteraction, IncomingMessage, Reply};

pub struct PingCommand;

#[async_trait]
impl BotCommand for PingCommand {
    fn data(&self) -> CommandData {
        CommandData::new("ping", "봇이 응답하는지 확인합니다").aliases(&["핑"])
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        ctx.gateway
            .respond(interaction, Reply::text(pong(&ctx)))
            .await?;
        info!("Ping command completed for user {}", interaction.user_id);
        Ok(())
    }

    fn supports_prefix(&self) -> bool {
        true
    }

    async fn execute_prefix(
        &self,
        ctx: Arc<BotContext>,
        msg: &IncomingMessage,
        _args: &[String],
    ) -> Result<()> {
        ctx.gateway.send_message(msg.channel_id, &pong(&ctx)).await
    }
}

fn pong(ctx: &BotContext) -> String {
    let uptime = ctx.start_time.elapsed().as_secs();
    format!(
        "🏓 Pong! (uptime {}h {}m {}s)",
        uptime / 3600,
        (uptime % 3600) / 60,
        uptime % 60
    )
}

pub struct HelpCommand;

#[async_trait]
impl BotCommand for HelpCommand {
    fn data(&self) -> CommandData {
        CommandData::new("help", "사용 가능한 명령어를 보여줍니다").aliases(&["도움말", "명령어"])
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let text = help_text(&ctx, "/");
        ctx.gateway
            .respond(interaction, Reply::ephemeral(truncate_for_message(&text)))
            .await
    }

    fn supports_prefix(&self) -> bool {
        true
    }

    async fn execute_prefix(
        &self,
        ctx: Arc<BotContext>,
        msg: &IncomingMessage,
        _args: &[String],
    ) -> Result<()> {
        let text = help_text(&ctx, &ctx.config.command_prefix);
        for chunk in chunk_for_message(&text) {
            ctx.gateway.send_message(msg.channel_id, &chunk).await?;
        }
        Ok(())
    }
}

/// One line per command; prefix-only commands are hidden from the slash listing
fn help_text(ctx: &BotContext, prefix: &str) -> String {
    let slash = prefix == "/";
    let mut lines = vec!["**명령어 목록**".to_string()];

    for entry in ctx.commands.entries() {
        let data = &entry.data;
        if slash && !data.upload {
            continue;
        }
        if !slash && !entry.handler.supports_prefix() {
            continue;
        }
        let mut line = format!("`{prefix}{}` - {}", data.name, data.description);
        if !slash && !data.aliases.is_empty() {
            line.push_str(&format!(" (별칭: {})", data.aliases.join(", ")));
        }
        lines.push(line);
    }
    lines.join("\n")
}
