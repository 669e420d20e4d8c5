//! Built-in event listeners
//!
//! - `client`: ready
//! - `message`: dmMessage
//! - `interaction`: buttonClick, selectMenu, modalSubmit

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;

use super::{BotEvent, EventPayload, BUTTON_CLICK, DM_MESSAGE, MODAL_SUBMIT, READY, SELECT_MENU};
use crate::commands::BotContext;
use crate::core::response::truncate_for_message;
use crate::dispatch::EXECUTION_FAILED;
use crate::gateway::Reply;
use crate::loader::EventCategory;
use crate::responses::ResponseGroup;

pub const UNKNOWN_INTERACTION: &str = "알 수 없는 상호작용입니다.";

/// Every built-in event, grouped by category
pub fn all() -> Vec<EventCategory> {
    vec![
        EventCategory::new("client", vec![Arc::new(ReadyEvent)]),
        EventCategory::new("message", vec![Arc::new(DmMessageEvent)]),
        EventCategory::new(
            "interaction",
            vec![
                Arc::new(ResponseRoute::new(BUTTON_CLICK, ResponseGroup::Buttons)),
                Arc::new(ResponseRoute::new(SELECT_MENU, ResponseGroup::Selects)),
                Arc::new(ResponseRoute::new(MODAL_SUBMIT, ResponseGroup::Modals)),
            ],
        ),
    ]
}

/// Gateway handshake finished
pub struct ReadyEvent;

#[async_trait]
impl BotEvent for ReadyEvent {
    fn name(&self) -> &'static str {
        READY
    }

    fn once(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: Arc<BotContext>, payload: &EventPayload) -> Result<()> {
        let EventPayload::Ready(ready) = payload else {
            return Ok(());
        };
        ctx.record_ready(ready);
        info!(
            "✅ {} is connected! ({} guilds, {} shards, {} commands)",
            ready.bot_name,
            ctx.guild_count(),
            ctx.shard_count(),
            ctx.commands.len()
        );
        Ok(())
    }
}

/// Forwards direct messages to the operator relay channel
pub struct DmMessageEvent;

#[async_trait]
impl BotEvent for DmMessageEvent {
    fn name(&self) -> &'static str {
        DM_MESSAGE
    }

    async fn execute(&self, ctx: Arc<BotContext>, payload: &EventPayload) -> Result<()> {
        let EventPayload::Message(msg) = payload else {
            return Ok(());
        };
        let Some(relay) = ctx.config.dm_relay_channel_id else {
            debug!("DM from {} not relayed, no relay channel configured", msg.author_id);
            return Ok(());
        };

        let text = format!(
            "📩 **{}** (`{}`)\n{}",
            msg.author_name, msg.author_id, msg.content
        );
        ctx.gateway
            .send_message(relay, &truncate_for_message(&text))
            .await?;
        ctx.set_dm_target(relay, msg.author_id);
        info!("📩 Relayed DM from {} to channel {relay}", msg.author_id);
        Ok(())
    }
}

/// Hands a component or modal interaction to the response handler named by
/// its custom id
pub struct ResponseRoute {
    event: &'static str,
    group: ResponseGroup,
}

impl ResponseRoute {
    pub fn new(event: &'static str, group: ResponseGroup) -> Self {
        Self { event, group }
    }
}

#[async_trait]
impl BotEvent for ResponseRoute {
    fn name(&self) -> &'static str {
        self.event
    }

    async fn execute(&self, ctx: Arc<BotContext>, payload: &EventPayload) -> Result<()> {
        let EventPayload::Interaction(interaction) = payload else {
            return Ok(());
        };
        let key = interaction.handler_key().unwrap_or_default();

        match ctx.responses.get(self.group, key) {
            Some(handler) => {
                if let Err(e) = handler.execute(Arc::clone(&ctx), interaction).await {
                    error!(
                        "❌ {} handler '{key}' failed: {e:#}",
                        self.group.as_str()
                    );
                    ctx.gateway
                        .respond(interaction, Reply::ephemeral(EXECUTION_FAILED))
                        .await?;
                }
                Ok(())
            }
            None => {
                warn!(
                    "No {} handler for '{key}' (interaction {})",
                    self.group.as_str(),
                    interaction.id
                );
                ctx.gateway
                    .respond(interaction, Reply::ephemeral(UNKNOWN_INTERACTION))
                    .await
            }
        }
    }
}
