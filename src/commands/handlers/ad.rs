//! Advertisement command
//!
//! Shows the backend's current ad for the guild and records the exposure.
//! Clicks come back through the `ad` button handler.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::backend::Ad;
use crate::commands::context::BotContext;
use crate::commands::handler::{BotCommand, CommandData};
use crate::core::response::truncate_for_message;
use crate::gateway::{IncomingInteraction, IncomingMessage, Reply};
use crate::responses::buttons::AD_BUTTON;

const NO_AD: &str = "지금은 진행 중인 광고가 없습니다.";

pub struct AdCommand;

impl AdCommand {
    /// Fetch the current ad and record that it is about to be shown
    async fn current_ad(&self, ctx: &BotContext, guild_id: Option<u64>) -> Option<Ad> {
        let backend = ctx.backend.as_ref()?;
        let ad = backend.fetch_ad(guild_id).await?;
        let recorded = backend.record_ad_exposure(&ad.id, guild_id).await;
        debug!("Ad {} exposure recorded: {recorded}", ad.id);
        Some(ad)
    }
}

fn render(ad: &Ad) -> String {
    let mut text = format!("📢 **{}**", ad.title);
    if !ad.description.is_empty() {
        text.push('\n');
        text.push_str(&ad.description);
    }
    if let Some(url) = &ad.url {
        text.push('\n');
        text.push_str(url);
    }
    truncate_for_message(&text)
}

#[async_trait]
impl BotCommand for AdCommand {
    fn data(&self) -> CommandData {
        CommandData::new("ad", "진행 중인 광고를 확인합니다").aliases(&["광고"])
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let reply = match self.current_ad(&ctx, interaction.guild_id).await {
            Some(ad) => Reply::text(render(&ad))
                .with_button(format!("{AD_BUTTON}:{}", ad.id), "관심 있어요"),
            None => Reply::ephemeral(NO_AD),
        };
        ctx.gateway.respond(interaction, reply).await
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
        let text = match self.current_ad(&ctx, msg.guild_id).await {
            Some(ad) => render(&ad),
            None => NO_AD.to_string(),
        };
        ctx.gateway.send_message(msg.channel_id, &text).await
    }
}
