// Core layer - shared types and configuration
pub mod core;

// Gateway boundary - inbound event views and outbound calls
pub mod gateway;

// Application layer - commands, events and follow-up responses
pub mod commands;
pub mod events;
pub mod responses;

// Boot and routing
pub mod dispatch;
pub mod loader;

// External REST services
pub mod backend;

pub use crate::core::{Config, ConfigError, LoadError};

pub use backend::{BackendClient, StatsPoster};
pub use commands::{BotCommand, BotContext, CommandData, CommandRegistry};
pub use dispatch::{Dispatcher, DispatcherHandle};
pub use events::{BotEvent, EventEmitter, EventRegistry};
pub use gateway::{Gateway, GatewayEvent, SerenityGateway};
pub use loader::{LoadedModules, Manifest};
pub use responses::{ResponseGroup, ResponseHandler, ResponseRegistry};
