//! Platform-neutral views of inbound gateway events
//!
//! The serenity adapter converts its models into these so the routers can be
//! driven (and tested) without a live connection.

use serenity::model::permissions::Permissions;

/// An inbound message as seen by the prefix router
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author_id: u64,
    pub author_name: String,
    pub author_is_bot: bool,
    pub content: String,
    /// Sent in a direct-message channel
    pub is_dm: bool,
    /// Join notices, pins and other non-user messages
    pub is_system: bool,
    /// The bot is allowed to delete this message
    pub deletable: bool,
    /// Resolved permissions of the author, when known
    pub member_permissions: Option<Permissions>,
}

impl IncomingMessage {
    pub fn has_permission(&self, required: Permissions) -> bool {
        has_permission(self.member_permissions, required)
    }
}

/// An inbound interaction as seen by the interaction router
#[derive(Debug, Clone)]
pub struct IncomingInteraction {
    pub id: u64,
    pub token: String,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub user_id: u64,
    pub user_name: String,
    pub member_permissions: Option<Permissions>,
    pub kind: InteractionKind,
}

impl IncomingInteraction {
    pub fn has_permission(&self, required: Permissions) -> bool {
        has_permission(self.member_permissions, required)
    }

    /// Routing key of a component or modal custom id: the part before the first `:`
    pub fn handler_key(&self) -> Option<&str> {
        let custom_id = match &self.kind {
            InteractionKind::MessageComponent { custom_id, .. } => custom_id,
            InteractionKind::ModalSubmit { custom_id, .. } => custom_id,
            _ => return None,
        };
        custom_id.split(':').next()
    }

    /// String value of a top-level command option
    pub fn option_str(&self, name: &str) -> Option<&str> {
        match &self.kind {
            InteractionKind::ApplicationCommand { options, .. } => options
                .iter()
                .find(|opt| opt.name == name)
                .and_then(|opt| opt.value.as_deref()),
            _ => None,
        }
    }
}

/// Administrators pass every permission check
fn has_permission(granted: Option<Permissions>, required: Permissions) -> bool {
    match granted {
        Some(perms) => perms.contains(Permissions::ADMINISTRATOR) || perms.contains(required),
        None => false,
    }
}

/// The enumerated interaction kinds the router branches on
#[derive(Debug, Clone)]
pub enum InteractionKind {
    ApplicationCommand {
        name: String,
        options: Vec<CommandOption>,
    },
    MessageComponent {
        component: ComponentKind,
        custom_id: String,
        values: Vec<String>,
    },
    Autocomplete {
        command_name: String,
        focused: Option<CommandOption>,
    },
    ModalSubmit {
        custom_id: String,
        fields: Vec<(String, String)>,
    },
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Button,
    StringSelect,
    Other,
}

/// A command option flattened to its name and string form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    pub name: String,
    pub value: Option<String>,
}

impl CommandOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// Summary of the ready handshake
#[derive(Debug, Clone)]
pub struct ReadyInfo {
    pub bot_user_id: u64,
    pub bot_name: String,
    /// Guilds the session starts in; more arrive as join events
    pub guild_ids: Vec<u64>,
    pub shard_count: u64,
}

/// Everything the dispatcher accepts from the gateway
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Ready(ReadyInfo),
    MessageCreate(IncomingMessage),
    InteractionCreate(IncomingInteraction),
    GuildJoined(u64),
    /// The bot was removed; outages are not reported as leaves
    GuildLeft(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(custom_id: &str) -> IncomingInteraction {
        IncomingInteraction {
            id: 1,
            token: "t".into(),
            channel_id: 2,
            guild_id: Some(3),
            user_id: 4,
            user_name: "user".into(),
            member_permissions: None,
            kind: InteractionKind::MessageComponent {
                component: ComponentKind::Button,
                custom_id: custom_id.into(),
                values: vec![],
            },
        }
    }

    #[test]
    fn test_handler_key_splits_on_colon() {
        assert_eq!(component("ad:42").handler_key(), Some("ad"));
        assert_eq!(component("plain").handler_key(), Some("plain"));
    }

    #[test]
    fn test_permission_check() {
        let mut msg = IncomingMessage::default();
        assert!(!msg.has_permission(Permissions::MANAGE_CHANNELS));

        msg.member_permissions = Some(Permissions::MANAGE_CHANNELS);
        assert!(msg.has_permission(Permissions::MANAGE_CHANNELS));
        assert!(!msg.has_permission(Permissions::BAN_MEMBERS));

        msg.member_permissions = Some(Permissions::ADMINISTRATOR);
        assert!(msg.has_permission(Permissions::BAN_MEMBERS));
    }
}
