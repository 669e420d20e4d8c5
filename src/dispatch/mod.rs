//! # Dispatcher
//!
//! Receives gateway events from the serenity handler through a queue and
//! runs each one on its own task.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod interaction;
pub mod prefix;

use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

pub use interaction::{route_interaction, InteractionOutcome};
pub use prefix::{route_message, PrefixOutcome};

use crate::commands::BotContext;
use crate::events::{self, EventPayload};
use crate::gateway::GatewayEvent;

/// Generic reply when a command or response handler fails
pub const EXECUTION_FAILED: &str = "명령어를 실행하는 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.";

/// Sending side of the dispatch queue, held by the gateway event handler
#[derive(Clone)]
pub struct DispatcherHandle {
    sender: UnboundedSender<GatewayEvent>,
}

impl DispatcherHandle {
    /// Queue an event; returns `false` once the dispatcher has stopped
    pub fn submit(&self, event: GatewayEvent) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("⚠️ Dispatcher is gone, dropping gateway event");
                false
            }
        }
    }
}

pub fn queue() -> (DispatcherHandle, UnboundedReceiver<GatewayEvent>) {
    let (sender, receiver) = unbounded_channel();
    (DispatcherHandle { sender }, receiver)
}

pub struct Dispatcher {
    ctx: Arc<BotContext>,
    receiver: UnboundedReceiver<GatewayEvent>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<BotContext>, receiver: UnboundedReceiver<GatewayEvent>) -> Self {
        Self { ctx, receiver }
    }

    /// Run until every handle is dropped
    ///
    /// Each event gets its own task, so a slow or panicking handler never
    /// holds up the next event.
    pub async fn run(mut self) {
        info!("🚦 Dispatcher started");
        while let Some(event) = self.receiver.recv().await {
            let ctx = Arc::clone(&self.ctx);
            tokio::spawn(dispatch(ctx, event));
        }
        info!("🚦 Dispatch queue closed, dispatcher stopping");
    }
}

/// Handle one gateway event to completion
pub async fn dispatch(ctx: Arc<BotContext>, event: GatewayEvent) {
    let request_id = Uuid::new_v4();
    match event {
        GatewayEvent::Ready(ready) => {
            let payload = EventPayload::Ready(ready);
            ctx.emitter.emit(events::READY, ctx.clone(), &payload).await;
        }
        GatewayEvent::MessageCreate(msg) => {
            match prefix::route_message(Arc::clone(&ctx), &msg, request_id).await {
                Ok(outcome) => debug!("[{request_id}] Message {} -> {outcome:?}", msg.id),
                Err(e) => error!("[{request_id}] ❌ Error handling message {}: {e:#}", msg.id),
            }
        }
        GatewayEvent::InteractionCreate(interaction) => {
            let outcome = interaction::route_interaction(ctx, &interaction, request_id).await;
            debug!("[{request_id}] Interaction {} -> {outcome:?}", interaction.id);
        }
        GatewayEvent::GuildJoined(guild_id) => {
            if ctx.record_guild_join(guild_id) {
                info!("🆕 Joined guild {guild_id} ({} total)", ctx.guild_count());
            }
        }
        GatewayEvent::GuildLeft(guild_id) => {
            if ctx.record_guild_leave(guild_id) {
                info!("👋 Left guild {guild_id} ({} total)", ctx.guild_count());
            }
        }
    }
}
