//! Guild settings stored in the backend
//!
//! Handles: observer, forget

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::permissions::Permissions;
use std::sync::Arc;

use super::parse_snowflake;
use crate::commands::context::BotContext;
use crate::commands::handler::{BotCommand, CommandData, OptionKind, OptionSpec};
use crate::gateway::{IncomingInteraction, IncomingMessage, Reply};

const GUILD_ONLY: &str = "이 명령어는 서버에서만 사용할 수 있습니다.";
const NO_BACKEND: &str = "백엔드가 설정되지 않아 사용할 수 없습니다.";

pub struct ObserverCommand;

impl ObserverCommand {
    async fn apply(&self, ctx: &BotContext, guild_id: Option<u64>, role: Option<&str>) -> String {
        let Some(guild_id) = guild_id else {
            return GUILD_ONLY.to_string();
        };
        let Some(role_id) = role.and_then(parse_snowflake) else {
            return format!("사용법: `{}observer <@역할>`", ctx.config.command_prefix);
        };
        let Some(backend) = &ctx.backend else {
            return NO_BACKEND.to_string();
        };

        if backend.set_observer_role(guild_id, role_id).await {
            info!("Observer role for guild {guild_id} set to {role_id}");
            format!("👀 관전자 역할을 <@&{role_id}>(으)로 설정했습니다.")
        } else {
            "관전자 역할을 저장하지 못했습니다. 잠시 후 다시 시도해 주세요.".to_string()
        }
    }
}

#[async_trait]
impl BotCommand for ObserverCommand {
    fn data(&self) -> CommandData {
        CommandData::new("observer", "관전자 역할을 설정합니다")
            .aliases(&["관전"])
            .permission(Permissions::ADMINISTRATOR)
            .option(OptionSpec::new("role", "관전자 역할", OptionKind::Role).required())
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let text = self
            .apply(&ctx, interaction.guild_id, interaction.option_str("role"))
            .await;
        ctx.gateway.respond(interaction, Reply::ephemeral(text)).await
    }

    fn supports_prefix(&self) -> bool {
        true
    }

    async fn execute_prefix(
        &self,
        ctx: Arc<BotContext>,
        msg: &IncomingMessage,
        args: &[String],
    ) -> Result<()> {
        let text = self
            .apply(&ctx, msg.guild_id, args.first().map(String::as_str))
            .await;
        ctx.gateway.send_message(msg.channel_id, &text).await
    }
}

/// Deletes the stored conversation history of a character in this guild
pub struct ForgetCommand;

impl ForgetCommand {
    async fn apply(&self, ctx: &BotContext, guild_id: Option<u64>, subject: &str) -> String {
        let Some(guild_id) = guild_id else {
            return GUILD_ONLY.to_string();
        };
        if subject.is_empty() {
            return format!("사용법: `{}forget <이름>`", ctx.config.command_prefix);
        }
        let Some(backend) = &ctx.backend else {
            return NO_BACKEND.to_string();
        };

        if backend.delete_conversation(subject, guild_id).await {
            info!("Conversation history '{subject}' cleared in guild {guild_id}");
            format!("🧹 **{subject}**의 대화 기록을 삭제했습니다.")
        } else {
            format!("**{subject}**의 대화 기록을 삭제하지 못했습니다.")
        }
    }
}

#[async_trait]
impl BotCommand for ForgetCommand {
    fn data(&self) -> CommandData {
        CommandData::new("forget", "캐릭터와의 대화 기록을 삭제합니다")
            .aliases(&["기억삭제"])
            .permission(Permissions::MANAGE_MESSAGES)
            .option(OptionSpec::new("name", "캐릭터 이름", OptionKind::String).required())
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let subject = interaction.option_str("name").unwrap_or_default().trim();
        let text = self.apply(&ctx, interaction.guild_id, subject).await;
        ctx.gateway.respond(interaction, Reply::ephemeral(text)).await
    }

    fn supports_prefix(&self) -> bool {
        true
    }

    async fn execute_prefix(
        &self,
        ctx: Arc<BotContext>,
        msg: &IncomingMessage,
        args: &[String],
    ) -> Result<()> {
        let subject = args.join(" ");
        let text = self.apply(&ctx, msg.guild_id, subject.trim()).await;
        ctx.gateway.send_message(msg.channel_id, &text).await
    }
}
