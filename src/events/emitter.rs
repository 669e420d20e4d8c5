//! Long-lived event emitter
//!
//! Listeners are attached once at boot and never detached. Single-shot
//! listeners are dropped the first time their event fires.

use dashmap::DashMap;
use log::{debug, error};
use std::sync::Arc;

use super::{BotEvent, EventPayload};
use crate::commands::BotContext;

#[derive(Clone)]
struct Listener {
    handler: Arc<dyn BotEvent>,
    once: bool,
}

#[derive(Default)]
pub struct EventEmitter {
    listeners: DashMap<String, Vec<Listener>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a persistent listener
    pub fn on(&self, handler: Arc<dyn BotEvent>) {
        self.attach(handler, false);
    }

    /// Attach a listener that fires only the first time
    pub fn once(&self, handler: Arc<dyn BotEvent>) {
        self.attach(handler, true);
    }

    fn attach(&self, handler: Arc<dyn BotEvent>, once: bool) {
        self.listeners
            .entry(handler.name().to_string())
            .or_default()
            .push(Listener { handler, once });
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map(|l| l.len()).unwrap_or(0)
    }

    /// Invoke every live listener for `name`
    ///
    /// Listener errors are logged and do not stop the remaining listeners.
    /// Returns how many listeners ran.
    pub async fn emit(&self, name: &str, ctx: Arc<BotContext>, payload: &EventPayload) -> usize {
        // Take the snapshot and drop single-shot listeners before awaiting,
        // so the map is never locked across a handler call.
        let snapshot: Vec<Listener> = match self.listeners.get_mut(name) {
            Some(mut listeners) => {
                let snapshot = listeners.to_vec();
                listeners.retain(|listener| !listener.once);
                snapshot
            }
            None => {
                debug!("No listeners for event '{name}'");
                return 0;
            }
        };

        for listener in &snapshot {
            if let Err(e) = listener.handler.execute(Arc::clone(&ctx), payload).await {
                error!("Event listener '{name}' failed: {e:#}");
            }
        }
        snapshot.len()
    }
}
