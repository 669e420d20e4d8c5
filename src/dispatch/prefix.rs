//! Prefix-message router
//!
//! Handles `!command args...` style messages typed into guild channels and
//! hands direct messages to the `dmMessage` event.

use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::EXECUTION_FAILED;
use crate::commands::BotContext;
use crate::events::{self, EventPayload};
use crate::gateway::IncomingMessage;

/// Which step a message stopped at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixOutcome {
    IgnoredBot,
    /// Handed to `dmMessage`; `listeners` is how many ran
    DirectMessage { listeners: usize },
    NoPrefix,
    UnknownCommand(String),
    Unauthorized(&'static str),
    Executed {
        command: &'static str,
        succeeded: bool,
        deleted: bool,
    },
}

/// Split the text after the prefix into a lower-cased command token and arguments
pub fn parse_invocation(content: &str, prefix: &str) -> Option<(String, Vec<String>)> {
    let rest = content.strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let token = parts.next().unwrap_or_default().to_lowercase();
    let args = parts.map(str::to_string).collect();
    Some((token, args))
}

/// Route one inbound message
///
/// Handler errors are reported to the channel and do not fail the call.
/// An error from deleting the trigger message is returned to the caller.
pub async fn route_message(
    ctx: Arc<BotContext>,
    msg: &IncomingMessage,
    request_id: Uuid,
) -> Result<PrefixOutcome> {
    if msg.author_is_bot {
        return Ok(PrefixOutcome::IgnoredBot);
    }

    if msg.is_dm {
        debug!("[{request_id}] 💬 DM from {} -> {}", msg.author_id, events::DM_MESSAGE);
        let payload = EventPayload::Message(msg.clone());
        let listeners = ctx
            .emitter
            .emit(events::DM_MESSAGE, Arc::clone(&ctx), &payload)
            .await;
        return Ok(PrefixOutcome::DirectMessage { listeners });
    }

    let Some((token, args)) = parse_invocation(&msg.content, &ctx.config.command_prefix) else {
        return Ok(PrefixOutcome::NoPrefix);
    };

    let entry = match ctx.commands.resolve(&token) {
        Some(entry) if entry.handler.supports_prefix() => entry,
        _ => {
            debug!("[{request_id}] Ignoring unknown prefix command '{token}'");
            return Ok(PrefixOutcome::UnknownCommand(token));
        }
    };
    let name = entry.data.name;

    if let Some(required) = entry.data.permission {
        if !msg.has_permission(required) {
            debug!(
                "[{request_id}] 🚫 {} lacks {required:?} for {name}",
                msg.author_id
            );
            return Ok(PrefixOutcome::Unauthorized(name));
        }
    }

    info!(
        "[{request_id}] 🎯 {}{name} | User: {} | Channel: {} | Args: {}",
        ctx.config.command_prefix,
        msg.author_id,
        msg.channel_id,
        args.len()
    );
    let succeeded = match entry
        .handler
        .execute_prefix(Arc::clone(&ctx), msg, &args)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            error!("[{request_id}] ❌ {name} failed: {e:#}");
            if let Err(e) = ctx.gateway.send_message(msg.channel_id, EXECUTION_FAILED).await {
                warn!("[{request_id}] ⚠️ Could not send failure message: {e}");
            }
            false
        }
    };

    let deleted = msg.deletable && !msg.is_system;
    if deleted {
        ctx.gateway.delete_message(msg.channel_id, msg.id).await?;
    }

    Ok(PrefixOutcome::Executed {
        command: name,
        succeeded,
        deleted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{builtin_context, config, context_with};
    use crate::commands::{BotCommand, CommandData};
    use crate::gateway::testing::{Call, RecordingGateway};
    use crate::gateway::IncomingInteraction;
    use crate::loader::{self, Manifest};
    use anyhow::Result;
    use async_trait::async_trait;
    use serenity::model::permissions::Permissions;

    fn guild_msg(content: &str) -> IncomingMessage {
        IncomingMessage {
            id: 500,
            channel_id: 20,
            guild_id: Some(1),
            author_id: 9,
            author_name: "member".into(),
            content: content.into(),
            deletable: true,
            member_permissions: Some(Permissions::SEND_MESSAGES),
            ..IncomingMessage::default()
        }
    }

    struct Broken;

    #[async_trait]
    impl BotCommand for Broken {
        fn data(&self) -> CommandData {
            CommandData::new("broken", "always fails").aliases(&["고장"])
        }

        async fn execute(&self, _ctx: Arc<BotContext>, _interaction: &IncomingInteraction) -> Result<()> {
            Ok(())
        }

        fn supports_prefix(&self) -> bool {
            true
        }

        async fn execute_prefix(
            &self,
            _ctx: Arc<BotContext>,
            _msg: &IncomingMessage,
            _args: &[String],
        ) -> Result<()> {
            anyhow::bail!("handler blew up")
        }
    }

    #[test]
    fn test_parse_invocation() {
        assert_eq!(
            parse_invocation("!Theme  ocean.mp3 loud", "!"),
            Some(("theme".to_string(), vec!["ocean.mp3".to_string(), "loud".to_string()]))
        );
        assert_eq!(parse_invocation("!", "!"), Some((String::new(), vec![])));
        assert_eq!(parse_invocation("theme", "!"), None);
    }

    #[tokio::test]
    async fn test_bot_author_ignored() {
        let (ctx, gateway) = builtin_context();
        let msg = IncomingMessage {
            author_is_bot: true,
            ..guild_msg("!ping")
        };
        let outcome = route_message(ctx, &msg, Uuid::new_v4()).await.unwrap();

        assert_eq!(outcome, PrefixOutcome::IgnoredBot);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_prefix_no_reply() {
        let (ctx, gateway) = builtin_context();
        let outcome = route_message(ctx, &guild_msg("ping please"), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(outcome, PrefixOutcome::NoPrefix);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_left_in_channel() {
        let (ctx, gateway) = builtin_context();
        let outcome = route_message(ctx, &guild_msg("!doesnotexist now"), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(outcome, PrefixOutcome::UnknownCommand("doesnotexist".into()));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dm_goes_to_dm_event_only() {
        let (ctx, gateway) = builtin_context();
        let msg = IncomingMessage {
            is_dm: true,
            guild_id: None,
            member_permissions: None,
            ..guild_msg("hello")
        };
        let outcome = route_message(ctx.clone(), &msg, Uuid::new_v4()).await.unwrap();

        assert_eq!(outcome, PrefixOutcome::DirectMessage { listeners: 1 });
        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Call::Send { channel_id: 900, content } if content.contains("hello")));
        assert_eq!(ctx.dm_target(900), Some(9));
    }

    #[tokio::test]
    async fn test_dm_with_prefix_still_not_a_command() {
        let (ctx, gateway) = builtin_context();
        let msg = IncomingMessage {
            is_dm: true,
            guild_id: None,
            ..guild_msg("!ping")
        };
        let outcome = route_message(ctx, &msg, Uuid::new_v4()).await.unwrap();

        assert_eq!(outcome, PrefixOutcome::DirectMessage { listeners: 1 });
        assert!(gateway
            .calls()
            .iter()
            .all(|call| matches!(call, Call::Send { channel_id: 900, .. })));
    }

    #[tokio::test]
    async fn test_alias_runs_and_deletes_trigger() {
        let (ctx, gateway) = builtin_context();
        let outcome = route_message(ctx, &guild_msg("!핑"), Uuid::new_v4()).await.unwrap();

        assert_eq!(
            outcome,
            PrefixOutcome::Executed {
                command: "ping",
                succeeded: true,
                deleted: true
            }
        );
        let calls = gateway.calls();
        assert!(matches!(&calls[0], Call::Send { channel_id: 20, .. }));
        assert_eq!(
            calls[1],
            Call::Delete {
                channel_id: 20,
                message_id: 500
            }
        );
    }

    #[tokio::test]
    async fn test_mixed_case_token_reaches_local_only_command() {
        let (ctx, gateway) = builtin_context();
        ctx.set_dm_target(900, 77);
        let msg = IncomingMessage {
            channel_id: 900,
            member_permissions: Some(Permissions::ADMINISTRATOR),
            ..guild_msg("!REPLY 확인했습니다")
        };
        let outcome = route_message(ctx, &msg, Uuid::new_v4()).await.unwrap();

        assert_eq!(
            outcome,
            PrefixOutcome::Executed {
                command: "reply",
                succeeded: true,
                deleted: true
            }
        );
        assert!(matches!(&gateway.calls()[0], Call::Dm { user_id: 77, .. }));
    }

    #[tokio::test]
    async fn test_missing_permission_is_silent() {
        let (ctx, gateway) = builtin_context();
        let outcome = route_message(ctx, &guild_msg("!slowmode 5"), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(outcome, PrefixOutcome::Unauthorized("slowmode"));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_administrator_passes_permission_gate() {
        let (ctx, gateway) = builtin_context();
        let msg = IncomingMessage {
            member_permissions: Some(Permissions::ADMINISTRATOR),
            ..guild_msg("!slowmode 5")
        };
        let outcome = route_message(ctx, &msg, Uuid::new_v4()).await.unwrap();

        assert!(matches!(outcome, PrefixOutcome::Executed { command: "slowmode", succeeded: true, .. }));
        assert_eq!(gateway.calls()[0], Call::Slowmode { channel_id: 20, seconds: 5 });
    }

    #[tokio::test]
    async fn test_slash_only_command_ignored_as_prefix() {
        let mut manifest = Manifest::builtin();
        manifest.commands.push(Arc::new(SlashOnly));
        let (ctx, gateway) = context_with(manifest, config());

        let outcome = route_message(ctx, &guild_msg("!slashonly"), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(outcome, PrefixOutcome::UnknownCommand("slashonly".into()));
        assert!(gateway.calls().is_empty());
    }

    struct SlashOnly;

    #[async_trait]
    impl BotCommand for SlashOnly {
        fn data(&self) -> CommandData {
            CommandData::new("slashonly", "no prefix form")
        }

        async fn execute(&self, _ctx: Arc<BotContext>, _interaction: &IncomingInteraction) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failure_apologises_then_deletes() {
        let mut manifest = Manifest::builtin();
        manifest.commands.push(Arc::new(Broken));
        let (ctx, gateway) = context_with(manifest, config());

        let outcome = route_message(ctx, &guild_msg("!고장"), Uuid::new_v4()).await.unwrap();

        assert_eq!(
            outcome,
            PrefixOutcome::Executed {
                command: "broken",
                succeeded: false,
                deleted: true
            }
        );
        assert_eq!(
            gateway.calls(),
            vec![
                Call::Send {
                    channel_id: 20,
                    content: EXECUTION_FAILED.to_string()
                },
                Call::Delete {
                    channel_id: 20,
                    message_id: 500
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_system_message_not_deleted() {
        let (ctx, gateway) = builtin_context();
        let msg = IncomingMessage {
            is_system: true,
            ..guild_msg("!ping")
        };
        let outcome = route_message(ctx, &msg, Uuid::new_v4()).await.unwrap();

        assert!(matches!(outcome, PrefixOutcome::Executed { deleted: false, .. }));
        assert!(!gateway.calls().iter().any(|c| matches!(c, Call::Delete { .. })));
    }

    #[tokio::test]
    async fn test_delete_failure_propagates() {
        let gateway = Arc::new(RecordingGateway::failing_deletes());
        let modules = loader::load(Manifest::builtin()).unwrap();
        let ctx = Arc::new(BotContext::new(config(), gateway.clone(), modules, None));

        let result = route_message(ctx, &guild_msg("!ping"), Uuid::new_v4()).await;

        assert!(result.is_err());
        assert_eq!(gateway.calls().len(), 1);
    }
}
