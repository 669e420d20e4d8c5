//! Button handlers

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::{ResponseGroup, ResponseHandler};
use crate::commands::BotContext;
use crate::gateway::{IncomingInteraction, InteractionKind, Reply};

/// Routing key of advertisement buttons; the full custom id is `ad:{ad_id}`
pub const AD_BUTTON: &str = "ad";

/// Records a click on the advertisement shown by `/ad`
pub struct AdClickButton;

#[async_trait]
impl ResponseHandler for AdClickButton {
    fn name(&self) -> &'static str {
        AD_BUTTON
    }

    fn group(&self) -> ResponseGroup {
        ResponseGroup::Buttons
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let ad_id = match &interaction.kind {
            InteractionKind::MessageComponent { custom_id, .. } => {
                custom_id.split_once(':').map(|(_, id)| id.to_string())
            }
            _ => None,
        };
        let Some(ad_id) = ad_id.filter(|id| !id.is_empty()) else {
            return ctx
                .gateway
                .respond(interaction, Reply::ephemeral("만료된 광고입니다."))
                .await;
        };

        let recorded = match &ctx.backend {
            Some(backend) => backend.record_ad_click(&ad_id, interaction.user_id).await,
            None => false,
        };
        info!(
            "Ad {ad_id} clicked by {} (recorded: {recorded})",
            interaction.user_id
        );

        ctx.gateway
            .respond(interaction, Reply::ephemeral("관심 가져 주셔서 감사합니다!"))
            .await
    }
}
