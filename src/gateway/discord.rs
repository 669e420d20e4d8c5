//! Serenity-backed gateway and model conversions
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use serenity::http::Http;
use serenity::model::application::component::ComponentType;
use serenity::model::application::component::ActionRowComponent;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::{Message, MessageType};
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::model::permissions::Permissions;
use serenity::prelude::Context;
use std::sync::Arc;

use super::types::{
    CommandOption, ComponentKind, IncomingInteraction, IncomingMessage, InteractionKind,
    ReadyInfo,
};
use super::{AutocompleteChoice, Gateway, Reply};

/// Interaction callback type: reply with a message
const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
/// Interaction callback type: autocomplete result
const AUTOCOMPLETE_RESULT: u8 = 8;
const EPHEMERAL_FLAG: u64 = 1 << 6;
const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
const BUTTON_PRIMARY: u8 = 1;
const BUTTONS_PER_ROW: usize = 5;

/// Gateway implementation over serenity's HTTP client
#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn http(&self) -> &Http {
        &self.http
    }
}

#[async_trait]
impl Gateway for SerenityGateway {
    async fn send_message(&self, channel_id: u64, content: &str) -> Result<()> {
        ChannelId(channel_id).say(self.http(), content).await?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        ChannelId(channel_id)
            .delete_message(self.http(), MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn send_dm(&self, user_id: u64, content: &str) -> Result<()> {
        let dm = UserId(user_id).create_dm_channel(self.http()).await?;
        dm.say(self.http(), content).await?;
        Ok(())
    }

    async fn respond(&self, interaction: &IncomingInteraction, reply: Reply) -> Result<()> {
        let body = json!({
            "type": CHANNEL_MESSAGE_WITH_SOURCE,
            "data": reply_data(&reply),
        });
        self.http
            .create_interaction_response(interaction.id, &interaction.token, &body)
            .await?;
        Ok(())
    }

    async fn autocomplete(
        &self,
        interaction: &IncomingInteraction,
        choices: Vec<AutocompleteChoice>,
    ) -> Result<()> {
        let choices: Vec<Value> = choices
            .into_iter()
            .map(|choice| json!({ "name": choice.name, "value": choice.value }))
            .collect();
        let body = json!({
            "type": AUTOCOMPLETE_RESULT,
            "data": { "choices": choices },
        });
        self.http
            .create_interaction_response(interaction.id, &interaction.token, &body)
            .await?;
        Ok(())
    }

    async fn set_slowmode(&self, channel_id: u64, seconds: u64) -> Result<()> {
        ChannelId(channel_id)
            .edit(self.http(), |channel| channel.rate_limit_per_user(seconds))
            .await?;
        Ok(())
    }
}

fn reply_data(reply: &Reply) -> Value {
    let mut data = json!({ "content": reply.content });
    if reply.ephemeral {
        data["flags"] = json!(EPHEMERAL_FLAG);
    }
    if !reply.buttons.is_empty() {
        let rows: Vec<Value> = reply
            .buttons
            .chunks(BUTTONS_PER_ROW)
            .map(|row| {
                let buttons: Vec<Value> = row
                    .iter()
                    .map(|button| {
                        json!({
                            "type": BUTTON,
                            "style": BUTTON_PRIMARY,
                            "label": button.label,
                            "custom_id": button.custom_id,
                        })
                    })
                    .collect();
                json!({ "type": ACTION_ROW, "components": buttons })
            })
            .collect();
        data["components"] = Value::Array(rows);
    }
    data
}

/// Convert a serenity message, resolving the author's guild permissions
pub async fn incoming_message(ctx: &Context, msg: &Message) -> IncomingMessage {
    let is_dm = msg.guild_id.is_none();
    let member_permissions = if is_dm {
        None
    } else {
        author_permissions(ctx, msg).await
    };

    IncomingMessage {
        id: msg.id.0,
        channel_id: msg.channel_id.0,
        guild_id: msg.guild_id.map(|g| g.0),
        author_id: msg.author.id.0,
        author_name: msg.author.name.clone(),
        author_is_bot: msg.author.bot,
        content: msg.content.clone(),
        is_dm,
        is_system: !matches!(msg.kind, MessageType::Regular | MessageType::InlineReply),
        // In guild channels the bot holds MANAGE_MESSAGES; a failed delete is logged
        deletable: !is_dm,
        member_permissions,
    }
}

async fn author_permissions(ctx: &Context, msg: &Message) -> Option<Permissions> {
    let member = msg.member(ctx).await.ok()?;
    member.permissions(&ctx.cache).ok()
}

/// Convert a serenity interaction
///
/// Pings carry no user or channel and come through as `Unknown` so the router
/// drops them with a log line.
pub fn incoming_interaction(interaction: &Interaction) -> IncomingInteraction {
    match interaction {
        Interaction::Ping(ping) => IncomingInteraction {
            id: ping.id.0,
            token: ping.token.clone(),
            channel_id: 0,
            guild_id: None,
            user_id: 0,
            user_name: String::new(),
            member_permissions: None,
            kind: InteractionKind::Unknown("Ping".to_string()),
        },
        Interaction::ApplicationCommand(command) => IncomingInteraction {
            id: command.id.0,
            token: command.token.clone(),
            channel_id: command.channel_id.0,
            guild_id: command.guild_id.map(|g| g.0),
            user_id: command.user.id.0,
            user_name: command.user.name.clone(),
            member_permissions: command.member.as_ref().and_then(|m| m.permissions),
            kind: InteractionKind::ApplicationCommand {
                name: command.data.name.clone(),
                options: flatten_options(&command.data.options),
            },
        },
        Interaction::MessageComponent(component) => IncomingInteraction {
            id: component.id.0,
            token: component.token.clone(),
            channel_id: component.channel_id.0,
            guild_id: component.guild_id.map(|g| g.0),
            user_id: component.user.id.0,
            user_name: component.user.name.clone(),
            member_permissions: component.member.as_ref().and_then(|m| m.permissions),
            kind: InteractionKind::MessageComponent {
                component: match component.data.component_type {
                    ComponentType::Button => ComponentKind::Button,
                    ComponentType::SelectMenu => ComponentKind::StringSelect,
                    _ => ComponentKind::Other,
                },
                custom_id: component.data.custom_id.clone(),
                values: component.data.values.clone(),
            },
        },
        Interaction::Autocomplete(autocomplete) => IncomingInteraction {
            id: autocomplete.id.0,
            token: autocomplete.token.clone(),
            channel_id: autocomplete.channel_id.0,
            guild_id: autocomplete.guild_id.map(|g| g.0),
            user_id: autocomplete.user.id.0,
            user_name: autocomplete.user.name.clone(),
            member_permissions: autocomplete.member.as_ref().and_then(|m| m.permissions),
            kind: InteractionKind::Autocomplete {
                command_name: autocomplete.data.name.clone(),
                focused: find_focused(&autocomplete.data.options),
            },
        },
        Interaction::ModalSubmit(modal) => {
            let fields = modal
                .data
                .components
                .iter()
                .flat_map(|row| row.components.iter())
                .filter_map(|component| match component {
                    ActionRowComponent::InputText(input) => {
                        Some((input.custom_id.clone(), input.value.clone()))
                    }
                    _ => None,
                })
                .collect();
            IncomingInteraction {
                id: modal.id.0,
                token: modal.token.clone(),
                channel_id: modal.channel_id.0,
                guild_id: modal.guild_id.map(|g| g.0),
                user_id: modal.user.id.0,
                user_name: modal.user.name.clone(),
                member_permissions: modal.member.as_ref().and_then(|m| m.permissions),
                kind: InteractionKind::ModalSubmit {
                    custom_id: modal.data.custom_id.clone(),
                    fields,
                },
            }
        }
    }
}

pub fn ready_info(ready: &Ready) -> ReadyInfo {
    ReadyInfo {
        bot_user_id: ready.user.id.0,
        bot_name: ready.user.name.clone(),
        guild_ids: ready.guilds.iter().map(|guild| guild.id.0).collect(),
        shard_count: ready.shard.map(|shard| shard[1]).unwrap_or(1),
    }
}

/// Subcommand groups are flattened depth-first into one list
fn flatten_options(options: &[CommandDataOption]) -> Vec<CommandOption> {
    let mut flat = Vec::new();
    for option in options {
        flat.push(CommandOption {
            name: option.name.clone(),
            value: option.value.as_ref().map(value_to_string),
        });
        flat.extend(flatten_options(&option.options));
    }
    flat
}

fn find_focused(options: &[CommandDataOption]) -> Option<CommandOption> {
    options.iter().find_map(|option| {
        if option.focused {
            Some(CommandOption {
                name: option.name.clone(),
                value: option.value.as_ref().map(value_to_string),
            })
        } else {
            find_focused(&option.options)
        }
    })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_data_plain() {
        let data = reply_data(&Reply::text("hi"));
        assert_eq!(data["content"], "hi");
        assert!(data.get("flags").is_none());
        assert!(data.get("components").is_none());
    }

    #[test]
    fn test_reply_data_ephemeral_with_button() {
        let data = reply_data(&Reply::ephemeral("ad").with_button("ad:7", "Visit"));
        assert_eq!(data["flags"], json!(64));
        assert_eq!(data["components"][0]["type"], json!(1));
        assert_eq!(data["components"][0]["components"][0]["custom_id"], "ad:7");
    }

    #[test]
    fn test_ping_converts_to_unknown() {
        let ping: Interaction = serde_json::from_value(json!({
            "id": "11",
            "application_id": "22",
            "type": 1,
            "token": "ping-token",
            "version": 1,
        }))
        .unwrap();

        let incoming = incoming_interaction(&ping);
        assert_eq!(incoming.id, 11);
        assert_eq!(incoming.token, "ping-token");
        assert!(matches!(&incoming.kind, InteractionKind::Unknown(kind) if kind == "Ping"));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("text")), "text");
        assert_eq!(value_to_string(&json!(15)), "15");
    }
}
