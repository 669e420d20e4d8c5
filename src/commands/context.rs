//! Shared context for commands, events and response handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Context owns the loaded registries instead of handlers reaching
//!   into a global client object
//! - 1.0.0: Initial implementation with core shared state

use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::registry::CommandRegistry;
use crate::backend::BackendClient;
use crate::core::Config;
use crate::events::{EventEmitter, EventRegistry};
use crate::gateway::{Gateway, ReadyInfo};
use crate::loader::LoadedModules;
use crate::responses::ResponseRegistry;

/// Process-wide services, constructed once at startup and passed to every handler
///
/// The registries are read-only after construction. The only mutable state
/// is the per-channel relay targets, the per-guild theme selection and the
/// gateway counters.
pub struct BotContext {
    pub config: Config,
    pub gateway: Arc<dyn Gateway>,
    pub commands: CommandRegistry,
    pub events: EventRegistry,
    pub emitter: EventEmitter,
    pub responses: ResponseRegistry,
    pub backend: Option<BackendClient>,
    /// Relay channel id -> user who most recently sent the bot a DM
    pub dm_targets: DashMap<u64, u64>,
    /// Guild id -> selected theme file
    pub selected_themes: DashMap<u64, String>,
    /// Guilds the bot is currently in
    guilds: DashSet<u64>,
    shard_count: AtomicU64,
    pub start_time: Instant,
}

impl BotContext {
    pub fn new(
        config: Config,
        gateway: Arc<dyn Gateway>,
        modules: LoadedModules,
        backend: Option<BackendClient>,
    ) -> Self {
        Self {
            config,
            gateway,
            commands: modules.commands,
            events: modules.events,
            emitter: modules.emitter,
            responses: modules.responses,
            backend,
            dm_targets: DashMap::new(),
            selected_themes: DashMap::new(),
            guilds: DashSet::new(),
            shard_count: AtomicU64::new(1),
            start_time: Instant::now(),
        }
    }

    /// Record the counters reported by the ready handshake
    pub fn record_ready(&self, ready: &ReadyInfo) {
        self.guilds.clear();
        for guild_id in &ready.guild_ids {
            self.guilds.insert(*guild_id);
        }
        self.shard_count.store(ready.shard_count.max(1), Ordering::Relaxed);
    }

    /// `true` when the guild was not already counted
    pub fn record_guild_join(&self, guild_id: u64) -> bool {
        self.guilds.insert(guild_id)
    }

    /// `true` when the guild was counted
    pub fn record_guild_leave(&self, guild_id: u64) -> bool {
        self.guilds.remove(&guild_id).is_some()
    }

    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    pub fn shard_count(&self) -> u64 {
        self.shard_count.load(Ordering::Relaxed)
    }

    /// Remember who to answer from the relay channel
    pub fn set_dm_target(&self, relay_channel_id: u64, user_id: u64) {
        self.dm_targets.insert(relay_channel_id, user_id);
    }

    pub fn dm_target(&self, relay_channel_id: u64) -> Option<u64> {
        self.dm_targets.get(&relay_channel_id).map(|entry| *entry)
    }
}
