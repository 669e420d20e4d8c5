//! # Event System
//!
//! Named events bound to a process-wide emitter. The interaction and prefix
//! routers hand off to fixed event names; the ready handshake fires `ready`.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Select menu and modal events route through response groups
//! - 1.0.0: Initial emitter with once and persistent listeners

pub mod builtin;
pub mod emitter;
pub mod registry;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::BotContext;
use crate::gateway::{IncomingInteraction, IncomingMessage, ReadyInfo};

pub use emitter::EventEmitter;
pub use registry::EventRegistry;

pub const READY: &str = "ready";
pub const DM_MESSAGE: &str = "dmMessage";
pub const BUTTON_CLICK: &str = "buttonClick";
pub const SELECT_MENU: &str = "selectMenu";
pub const MODAL_SUBMIT: &str = "modalSubmit";

/// Data delivered to event listeners
#[derive(Debug, Clone)]
pub enum EventPayload {
    Ready(ReadyInfo),
    Message(IncomingMessage),
    Interaction(IncomingInteraction),
}

/// A named event listener
#[async_trait]
pub trait BotEvent: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fire at most once per process
    fn once(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: Arc<BotContext>, payload: &EventPayload) -> Result<()>;
}
