//! # Gateway Boundary
//!
//! Inbound event views and the outbound side-effect surface used by every
//! command, event and response handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod discord;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;

pub use discord::SerenityGateway;
pub use types::{
    CommandOption, ComponentKind, GatewayEvent, IncomingInteraction, IncomingMessage,
    InteractionKind, ReadyInfo,
};

/// A button attached to an interaction reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyButton {
    pub custom_id: String,
    pub label: String,
}

/// Content of an interaction reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
    pub buttons: Vec<ReplyButton>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
            ..Self::default()
        }
    }

    pub fn with_button(mut self, custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.buttons.push(ReplyButton {
            custom_id: custom_id.into(),
            label: label.into(),
        });
        self
    }
}

/// One autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

/// Outbound calls to the chat platform
///
/// Handlers never talk to serenity directly; they go through this trait so
/// routing can be exercised against a recording implementation.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_message(&self, channel_id: u64, content: &str) -> Result<()>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()>;

    async fn send_dm(&self, user_id: u64, content: &str) -> Result<()>;

    async fn respond(&self, interaction: &IncomingInteraction, reply: Reply) -> Result<()>;

    async fn autocomplete(
        &self,
        interaction: &IncomingInteraction,
        choices: Vec<AutocompleteChoice>,
    ) -> Result<()>;

    /// Set per-user message rate limit on a channel, in seconds (0 disables)
    async fn set_slowmode(&self, channel_id: u64, seconds: u64) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording gateway used by router and handler tests

    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Send { channel_id: u64, content: String },
        Delete { channel_id: u64, message_id: u64 },
        Dm { user_id: u64, content: String },
        Respond { interaction_id: u64, reply: Reply },
        Autocomplete { interaction_id: u64, choices: Vec<AutocompleteChoice> },
        Slowmode { channel_id: u64, seconds: u64 },
    }

    #[derive(Default)]
    pub struct RecordingGateway {
        calls: Mutex<Vec<Call>>,
        fail_deletes: bool,
    }

    impl RecordingGateway {
        /// Every delete fails the way a missing Manage Messages permission does
        pub fn failing_deletes() -> Self {
            Self {
                fail_deletes: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl Gateway for RecordingGateway {
        async fn send_message(&self, channel_id: u64, content: &str) -> Result<()> {
            self.record(Call::Send {
                channel_id,
                content: content.to_string(),
            });
            Ok(())
        }

        async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
            if self.fail_deletes {
                anyhow::bail!("Missing Permissions");
            }
            self.record(Call::Delete {
                channel_id,
                message_id,
            });
            Ok(())
        }

        async fn send_dm(&self, user_id: u64, content: &str) -> Result<()> {
            self.record(Call::Dm {
                user_id,
                content: content.to_string(),
            });
            Ok(())
        }

        async fn respond(&self, interaction: &IncomingInteraction, reply: Reply) -> Result<()> {
            self.record(Call::Respond {
                interaction_id: interaction.id,
                reply,
            });
            Ok(())
        }

        async fn autocomplete(
            &self,
            interaction: &IncomingInteraction,
            choices: Vec<AutocompleteChoice>,
        ) -> Result<()> {
            self.record(Call::Autocomplete {
                interaction_id: interaction.id,
                choices,
            });
            Ok(())
        }

        async fn set_slowmode(&self, channel_id: u64, seconds: u64) -> Result<()> {
            self.record(Call::Slowmode {
                channel_id,
                seconds,
            });
            Ok(())
        }
    }
}
