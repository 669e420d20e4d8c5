//! Moderation commands
//!
//! Handles: slowmode

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::permissions::Permissions;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::{BotCommand, CommandData, OptionKind, OptionSpec};
use crate::gateway::{IncomingInteraction, IncomingMessage, Reply};

/// Discord's upper bound for per-user slowmode
pub const MAX_SLOWMODE_SECS: u64 = 21_600;

pub struct SlowmodeCommand;

impl SlowmodeCommand {
    async fn apply(&self, ctx: &BotContext, channel_id: u64, raw: Option<&str>) -> Result<String> {
        let Some(seconds) = raw.and_then(|s| s.trim().parse::<u64>().ok()) else {
            return Ok(format!(
                "사용법: `{}slowmode <초>` (0 ~ {MAX_SLOWMODE_SECS})",
                ctx.config.command_prefix
            ));
        };
        if seconds > MAX_SLOWMODE_SECS {
            return Ok(format!("슬로우 모드는 최대 {MAX_SLOWMODE_SECS}초까지 설정할 수 있습니다."));
        }

        ctx.gateway.set_slowmode(channel_id, seconds).await?;
        info!("Slowmode set to {seconds}s in channel {channel_id}");

        Ok(if seconds == 0 {
            "🐇 슬로우 모드를 해제했습니다.".to_string()
        } else {
            format!("🐢 슬로우 모드를 {seconds}초로 설정했습니다.")
        })
    }
}

#[async_trait]
impl BotCommand for SlowmodeCommand {
    fn data(&self) -> CommandData {
        CommandData::new("slowmode", "채널의 슬로우 모드를 설정합니다")
            .aliases(&["슬로우"])
            .permission(Permissions::MANAGE_CHANNELS)
            .option(
                OptionSpec::new("seconds", "메시지 간격 (초, 0이면 해제)", OptionKind::Integer)
                    .required(),
            )
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let text = self
            .apply(&ctx, interaction.channel_id, interaction.option_str("seconds"))
            .await?;
        ctx.gateway.respond(interaction, Reply::text(text)).await
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
            .apply(&ctx, msg.channel_id, args.first().map(String::as_str))
            .await?;
        ctx.gateway.send_message(msg.channel_id, &text).await
    }
}
