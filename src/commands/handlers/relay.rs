//! Operator reply to relayed direct messages
//!
//! Pairs with the `dmMessage` event, which posts incoming DMs to the relay
//! channel and remembers the sender.

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::permissions::Permissions;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::{BotCommand, CommandData};
use crate::gateway::{IncomingInteraction, IncomingMessage, Reply};

pub struct ReplyCommand;

#[async_trait]
impl BotCommand for ReplyCommand {
    fn data(&self) -> CommandData {
        CommandData::new("reply", "마지막으로 DM을 보낸 사용자에게 답장합니다")
            .aliases(&["답장"])
            .permission(Permissions::ADMINISTRATOR)
            .local_only()
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let hint = format!(
            "`{}reply <내용>` 형식으로 릴레이 채널에서 사용해 주세요.",
            ctx.config.command_prefix
        );
        ctx.gateway.respond(interaction, Reply::ephemeral(hint)).await
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
        if ctx.config.dm_relay_channel_id != Some(msg.channel_id) {
            return ctx
                .gateway
                .send_message(msg.channel_id, "릴레이 채널에서만 사용할 수 있습니다.")
                .await;
        }
        let Some(target) = ctx.dm_target(msg.channel_id) else {
            return ctx
                .gateway
                .send_message(msg.channel_id, "답장할 DM이 없습니다.")
                .await;
        };
        if args.is_empty() {
            return ctx
                .gateway
                .send_message(
                    msg.channel_id,
                    &format!("사용법: `{}reply <내용>`", ctx.config.command_prefix),
                )
                .await;
        }

        ctx.gateway.send_dm(target, &args.join(" ")).await?;
        info!("Relayed operator reply from {} to {target}", msg.author_id);
        ctx.gateway
            .send_message(msg.channel_id, &format!("✉️ <@{target}>에게 답장을 보냈습니다."))
            .await
    }
}
