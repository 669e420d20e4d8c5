//! Command registry and alias resolution
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Ordered alias list with substring resolution for prefix commands
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::{BotCommand, CommandData};

/// A registered command with its metadata captured at load time
pub struct CommandEntry {
    pub data: CommandData,
    pub handler: Arc<dyn BotCommand>,
}

/// Registry mapping command names to handlers
///
/// Names are unique; registering a second command under an existing name
/// replaces the first. Aliases are kept in registration order so that
/// resolution is deterministic.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<CommandEntry>>,
    aliases: Vec<(String, String)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its declared name and aliases
    ///
    /// Returns `true` when an earlier command with the same name was replaced.
    pub fn register(&mut self, handler: Arc<dyn BotCommand>) -> bool {
        let data = handler.data();
        let name = data.name.to_string();
        for alias in data.aliases {
            self.aliases.push((alias.to_lowercase(), name.clone()));
        }
        let entry = Arc::new(CommandEntry { data, handler });
        self.commands.insert(name, entry).is_some()
    }

    /// Exact lookup by canonical name
    pub fn get(&self, name: &str) -> Option<Arc<CommandEntry>> {
        self.commands.get(name).cloned()
    }

    /// Resolve a typed token to a command
    ///
    /// Exact canonical names win. Otherwise the first alias, in registration
    /// order, that contains the token is used. The substring match means a
    /// short token can hit a longer alias.
    pub fn resolve(&self, token: &str) -> Option<Arc<CommandEntry>> {
        if token.is_empty() {
            return None;
        }
        if let Some(entry) = self.get(token) {
            return Some(entry);
        }
        self.aliases
            .iter()
            .find(|(alias, _)| alias.contains(token))
            .and_then(|(_, canonical)| self.get(canonical))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// All commands, sorted by name
    pub fn entries(&self) -> Vec<Arc<CommandEntry>> {
        let mut entries: Vec<_> = self.commands.values().cloned().collect();
        entries.sort_by(|a, b| a.data.name.cmp(b.data.name));
        entries
    }

    /// Commands flagged for upload to the platform, sorted by name
    pub fn uploadable(&self) -> Vec<CommandData> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.data.upload)
            .map(|entry| entry.data.clone())
            .collect()
    }
}
