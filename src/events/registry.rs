//! Event registry
//!
//! Keyed by event name; the first registration wins and is the only one
//! bound to the emitter.

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::{BotEvent, EventEmitter};

#[derive(Default)]
pub struct EventRegistry {
    events: HashMap<&'static str, (&'static str, Arc<dyn BotEvent>)>,
    shadowed: Vec<(&'static str, &'static str)>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event from `category` and bind it to `emitter`
    ///
    /// Returns `false`, without binding, when the name is already taken.
    pub fn register(
        &mut self,
        category: &'static str,
        event: Arc<dyn BotEvent>,
        emitter: &EventEmitter,
    ) -> bool {
        let name = event.name();
        if let Some((first_category, _)) = self.events.get(name) {
            debug!("Event '{name}' from '{category}' ignored, already bound from '{first_category}'");
            self.shadowed.push((category, name));
            return false;
        }

        if event.once() {
            emitter.once(Arc::clone(&event));
        } else {
            emitter.on(Arc::clone(&event));
        }
        self.events.insert(name, (category, event));
        true
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<Arc<dyn BotEvent>> {
        self.events.get(name).map(|(_, event)| Arc::clone(event))
    }

    /// Category the bound listener for `name` came from
    #[cfg(test)]
    pub fn category_of(&self, name: &str) -> Option<&'static str> {
        self.events.get(name).map(|(category, _)| *category)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// `(category, name)` of registrations skipped as duplicates
    pub fn shadowed(&self) -> &[(&'static str, &'static str)] {
        &self.shadowed
    }
}
