//! # Response Handlers
//!
//! Handlers for follow-up interactions (autocomplete, buttons, select menus,
//! modals), grouped by kind and keyed by name within each group.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod autocomplete;
pub mod buttons;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::BotContext;
use crate::gateway::IncomingInteraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseGroup {
    Autocomplete,
    Buttons,
    Selects,
    Modals,
}

impl ResponseGroup {
    pub const ALL: [ResponseGroup; 4] = [
        ResponseGroup::Autocomplete,
        ResponseGroup::Buttons,
        ResponseGroup::Selects,
        ResponseGroup::Modals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseGroup::Autocomplete => "autocomplete",
            ResponseGroup::Buttons => "buttons",
            ResponseGroup::Selects => "selects",
            ResponseGroup::Modals => "modals",
        }
    }
}

/// A handler for one follow-up interaction
///
/// Autocomplete handlers are named after the option they complete; component
/// and modal handlers after the routing key of their custom id.
#[async_trait]
pub trait ResponseHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn group(&self) -> ResponseGroup;

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()>;
}

#[derive(Default)]
pub struct ResponseRegistry {
    groups: HashMap<ResponseGroup, HashMap<&'static str, Arc<dyn ResponseHandler>>>,
}

impl ResponseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the handler's own group; a later handler with the same name replaces the earlier one
    pub fn register(&mut self, handler: Arc<dyn ResponseHandler>) {
        self.groups
            .entry(handler.group())
            .or_default()
            .insert(handler.name(), handler);
    }

    pub fn get(&self, group: ResponseGroup, name: &str) -> Option<Arc<dyn ResponseHandler>> {
        self.groups.get(&group)?.get(name).cloned()
    }

    pub fn group_len(&self, group: ResponseGroup) -> usize {
        self.groups.get(&group).map(|g| g.len()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub(&'static str, ResponseGroup);

    #[async_trait]
    impl ResponseHandler for Stub {
        fn name(&self) -> &'static str {
            self.0
        }

        fn group(&self) -> ResponseGroup {
            self.1
        }

        async fn execute(&self, _ctx: Arc<BotContext>, _interaction: &IncomingInteraction) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_groups_are_separate_namespaces() {
        let mut registry = ResponseRegistry::new();
        registry.register(Arc::new(Stub("ad", ResponseGroup::Buttons)));
        registry.register(Arc::new(Stub("ad", ResponseGroup::Modals)));

        assert_eq!(registry.len(), 2);
        assert!(registry.get(ResponseGroup::Buttons, "ad").is_some());
        assert!(registry.get(ResponseGroup::Modals, "ad").is_some());
        assert!(registry.get(ResponseGroup::Selects, "ad").is_none());
    }

    #[test]
    fn test_group_len() {
        let mut registry = ResponseRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(Stub("파일명", ResponseGroup::Autocomplete)));
        assert_eq!(registry.group_len(ResponseGroup::Autocomplete), 1);
        assert_eq!(registry.group_len(ResponseGroup::Buttons), 0);
    }
}
