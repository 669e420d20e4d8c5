//! Interaction router
//!
//! One branch per interaction kind. Every branch catches its own handler
//! errors so a failing command never reaches the dispatch loop.

use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::EXECUTION_FAILED;
use crate::commands::BotContext;
use crate::events::{self, EventPayload};
use crate::gateway::{ComponentKind, IncomingInteraction, InteractionKind, Reply};
use crate::responses::ResponseGroup;

/// Which branch an interaction took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    Command { name: String, succeeded: bool },
    UnknownCommand(String),
    /// Handed to a fixed event; `listeners` is how many ran
    Emitted { event: &'static str, listeners: usize },
    Autocomplete { option: String, handled: bool },
    Dropped(String),
}

pub async fn route_interaction(
    ctx: Arc<BotContext>,
    interaction: &IncomingInteraction,
    request_id: Uuid,
) -> InteractionOutcome {
    match &interaction.kind {
        InteractionKind::ApplicationCommand { name, .. } => {
            let Some(entry) = ctx.commands.get(name) else {
                warn!("[{request_id}] ❓ Unknown slash command: /{name}");
                return InteractionOutcome::UnknownCommand(name.clone());
            };

            info!(
                "[{request_id}] ⚡ /{name} | User: {} | Channel: {}",
                interaction.user_id, interaction.channel_id
            );
            let succeeded = match entry.handler.execute(Arc::clone(&ctx), interaction).await {
                Ok(()) => true,
                Err(e) => {
                    error!("[{request_id}] ❌ /{name} failed: {e:#}");
                    if let Err(e) = ctx
                        .gateway
                        .respond(interaction, Reply::ephemeral(EXECUTION_FAILED))
                        .await
                    {
                        warn!("[{request_id}] ⚠️ Could not send failure reply: {e}");
                    }
                    false
                }
            };
            InteractionOutcome::Command {
                name: name.clone(),
                succeeded,
            }
        }

        InteractionKind::MessageComponent {
            component,
            custom_id,
            ..
        } => {
            let event = match component {
                ComponentKind::Button => events::BUTTON_CLICK,
                ComponentKind::StringSelect => events::SELECT_MENU,
                ComponentKind::Other => {
                    debug!("[{request_id}] Dropping unsupported component '{custom_id}'");
                    return InteractionOutcome::Dropped(format!("component:{custom_id}"));
                }
            };
            emit(&ctx, event, interaction, request_id).await
        }

        InteractionKind::Autocomplete { focused, .. } => {
            let Some(option) = focused else {
                debug!("[{request_id}] Autocomplete without a focused option");
                return InteractionOutcome::Dropped("autocomplete:unfocused".to_string());
            };
            let Some(handler) = ctx.responses.get(ResponseGroup::Autocomplete, &option.name) else {
                debug!("[{request_id}] No autocomplete handler for '{}'", option.name);
                return InteractionOutcome::Autocomplete {
                    option: option.name.clone(),
                    handled: false,
                };
            };

            if let Err(e) = handler.execute(Arc::clone(&ctx), interaction).await {
                error!("[{request_id}] ❌ Autocomplete '{}' failed: {e:#}", option.name);
            }
            InteractionOutcome::Autocomplete {
                option: option.name.clone(),
                handled: true,
            }
        }

        InteractionKind::ModalSubmit { .. } => {
            emit(&ctx, events::MODAL_SUBMIT, interaction, request_id).await
        }

        InteractionKind::Unknown(kind) => {
            warn!("[{request_id}] ❓ Unhandled interaction kind: {kind}");
            InteractionOutcome::Dropped(kind.clone())
        }
    }
}

async fn emit(
    ctx: &Arc<BotContext>,
    event: &'static str,
    interaction: &IncomingInteraction,
    request_id: Uuid,
) -> InteractionOutcome {
    debug!("[{request_id}] 🔀 {} -> {event}", interaction.id);
    let payload = EventPayload::Interaction(interaction.clone());
    let listeners = ctx.emitter.emit(event, Arc::clone(ctx), &payload).await;
    InteractionOutcome::Emitted { event, listeners }
}
