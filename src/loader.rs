//! # Module Loader
//!
//! Builds the command, event and response registries from the manifest of
//! modules compiled into the binary.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use log::{debug, info, warn};
use std::sync::Arc;

use crate::commands::{handlers, BotCommand, CommandRegistry};
use crate::core::LoadError;
use crate::events::{self, BotEvent, EventEmitter, EventRegistry};
use crate::responses::{autocomplete, buttons, ResponseGroup, ResponseHandler, ResponseRegistry};

/// Longest name the platform accepts for a slash command
const MAX_SLASH_NAME: usize = 32;

/// Events sharing a category, loaded in declaration order
pub struct EventCategory {
    pub name: &'static str,
    pub events: Vec<Arc<dyn BotEvent>>,
}

impl EventCategory {
    pub fn new(name: &'static str, events: Vec<Arc<dyn BotEvent>>) -> Self {
        Self { name, events }
    }
}

/// Every module the bot is built with
pub struct Manifest {
    pub commands: Vec<Arc<dyn BotCommand>>,
    pub events: Vec<EventCategory>,
    pub responses: Vec<Arc<dyn ResponseHandler>>,
}

impl Manifest {
    pub fn builtin() -> Self {
        Self {
            commands: handlers::all(),
            events: events::builtin::all(),
            responses: vec![
                Arc::new(autocomplete::ThemeFileAutocomplete),
                Arc::new(buttons::AdClickButton),
            ],
        }
    }
}

/// What happened while loading
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub commands: usize,
    pub aliases: usize,
    pub events: usize,
    pub responses: usize,
    /// Modules dropped for missing name or description
    pub skipped: Vec<String>,
    /// Command names declared more than once; the last declaration is kept
    pub replaced: Vec<&'static str>,
    /// `(category, name)` of events not bound because the name was taken
    pub shadowed: Vec<(&'static str, &'static str)>,
}

/// Registries ready to be moved into the bot context
pub struct LoadedModules {
    pub commands: CommandRegistry,
    pub events: EventRegistry,
    pub emitter: EventEmitter,
    pub responses: ResponseRegistry,
    pub report: LoadReport,
}

fn is_valid_slash_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=MAX_SLASH_NAME).contains(&len)
        && name
            .chars()
            .all(|c| (c.is_alphanumeric() && !c.is_uppercase()) || c == '-' || c == '_')
}

/// Load every module in `manifest`
///
/// Commands are loaded first, then events category by category, then
/// response handlers. Incomplete modules are skipped with a warning.
pub fn load(manifest: Manifest) -> Result<LoadedModules, LoadError> {
    let mut report = LoadReport::default();

    let mut commands = CommandRegistry::new();
    for command in manifest.commands {
        let data = command.data();
        if data.name.is_empty() || data.description.is_empty() {
            warn!("⚠️ Skipping command '{}': missing name or description", data.name);
            report.skipped.push(format!("command:{}", data.name));
            continue;
        }
        if data.name.chars().any(char::is_uppercase) {
            return Err(LoadError::UppercaseName {
                name: data.name.to_string(),
            });
        }
        if data.upload && !is_valid_slash_name(data.name) {
            return Err(LoadError::InvalidSlashName {
                name: data.name.to_string(),
            });
        }
        if commands.register(command) {
            warn!("⚠️ Command '{}' declared twice, keeping the later one", data.name);
            report.replaced.push(data.name);
        }
    }
    if commands.is_empty() {
        return Err(LoadError::NoCommands);
    }

    let emitter = EventEmitter::new();
    let mut event_registry = EventRegistry::new();
    for category in manifest.events {
        for event in category.events {
            if event.name().is_empty() {
                warn!("⚠️ Skipping unnamed event in category '{}'", category.name);
                report.skipped.push(format!("event:{}", category.name));
                continue;
            }
            event_registry.register(category.name, event, &emitter);
        }
    }

    let mut responses = ResponseRegistry::new();
    for handler in manifest.responses {
        if handler.name().is_empty() {
            warn!(
                "⚠️ Skipping unnamed {} response handler",
                handler.group().as_str()
            );
            report.skipped.push(format!("response:{}", handler.group().as_str()));
            continue;
        }
        responses.register(handler);
    }

    report.commands = commands.len();
    report.aliases = commands.alias_count();
    report.events = event_registry.len();
    report.responses = responses.len();
    report.shadowed = event_registry.shadowed().to_vec();

    info!(
        "📦 Loaded {} commands ({} aliases), {} events, {} response handlers",
        report.commands, report.aliases, report.events, report.responses
    );
    for group in ResponseGroup::ALL {
        debug!("   {}: {}", group.as_str(), responses.group_len(group));
    }

    Ok(LoadedModules {
        commands,
        events: event_registry,
        emitter,
        responses,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{BotContext, CommandData};
    use crate::events::EventPayload;
    use crate::gateway::IncomingInteraction;
    use anyhow::Result;
    use async_trait::async_trait;

    struct Stub(CommandData);

    #[async_trait]
    impl BotCommand for Stub {
        fn data(&self) -> CommandData {
            self.0.clone()
        }

        async fn execute(&self, _ctx: Arc<BotContext>, _interaction: &IncomingInteraction) -> Result<()> {
            Ok(())
        }
    }

    struct NamedEvent(&'static str);

    #[async_trait]
    impl BotEvent for NamedEvent {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn execute(&self, _ctx: Arc<BotContext>, _payload: &EventPayload) -> Result<()> {
            Ok(())
        }
    }

    fn manifest(commands: Vec<CommandData>) -> Manifest {
        Manifest {
            commands: commands
                .into_iter()
                .map(|data| Arc::new(Stub(data)) as Arc<dyn BotCommand>)
                .collect(),
            events: Vec::new(),
            responses: Vec::new(),
        }
    }

    #[test]
    fn test_builtin_manifest_loads() {
        let loaded = load(Manifest::builtin()).unwrap();

        assert_eq!(loaded.report.commands, handlers::all().len());
        assert!(loaded.report.skipped.is_empty());
        assert!(loaded.report.shadowed.is_empty());
        for entry in loaded.commands.entries() {
            let key = entry.data.name;
            assert_eq!(loaded.commands.get(key).unwrap().handler.data().name, key);
        }
        assert_eq!(loaded.emitter.listener_count(events::READY), 1);
        assert_eq!(loaded.emitter.listener_count(events::DM_MESSAGE), 1);
        assert_eq!(loaded.responses.len(), 2);
        let per_group: usize = ResponseGroup::ALL
            .iter()
            .map(|group| loaded.responses.group_len(*group))
            .sum();
        assert_eq!(per_group, loaded.responses.len());
        assert_eq!(loaded.responses.group_len(ResponseGroup::Autocomplete), 1);
        assert_eq!(loaded.responses.group_len(ResponseGroup::Buttons), 1);
    }

    #[test]
    fn test_incomplete_command_skipped() {
        let loaded = load(manifest(vec![
            CommandData::new("ping", "Pong"),
            CommandData::new("broken", ""),
        ]))
        .unwrap();

        assert_eq!(loaded.report.commands, 1);
        assert_eq!(loaded.report.skipped, vec!["command:broken".to_string()]);
        assert!(!loaded.commands.contains("broken"));
    }

    #[test]
    fn test_empty_manifest_is_fatal() {
        assert!(matches!(load(manifest(Vec::new())), Err(LoadError::NoCommands)));
        assert!(matches!(
            load(manifest(vec![CommandData::new("", "nameless")])),
            Err(LoadError::NoCommands)
        ));
    }

    #[test]
    fn test_invalid_slash_name_is_fatal() {
        let result = load(manifest(vec![CommandData::new("bad name", "x")]));
        assert!(matches!(result, Err(LoadError::InvalidSlashName { name }) if name == "bad name"));
    }

    #[test]
    fn test_local_only_name_skips_slash_rules() {
        let loaded = load(manifest(vec![CommandData::new("relay.dm", "x").local_only()])).unwrap();
        assert!(loaded.commands.contains("relay.dm"));
    }

    #[test]
    fn test_uppercase_name_is_fatal() {
        let result = load(manifest(vec![CommandData::new("Relay", "x").local_only()]));
        assert!(matches!(result, Err(LoadError::UppercaseName { name }) if name == "Relay"));
    }

    #[test]
    fn test_duplicate_command_last_wins() {
        let loaded = load(manifest(vec![
            CommandData::new("ping", "first"),
            CommandData::new("ping", "second"),
        ]))
        .unwrap();

        assert_eq!(loaded.report.replaced, vec!["ping"]);
        assert_eq!(loaded.commands.get("ping").unwrap().data.description, "second");
    }

    #[test]
    fn test_duplicate_event_across_categories_binds_first() {
        let mut m = manifest(vec![CommandData::new("ping", "Pong")]);
        m.events = vec![
            EventCategory::new("client", vec![Arc::new(NamedEvent("ready"))]),
            EventCategory::new("legacy", vec![Arc::new(NamedEvent("ready"))]),
        ];
        let loaded = load(m).unwrap();

        assert_eq!(loaded.emitter.listener_count("ready"), 1);
        assert_eq!(loaded.events.category_of("ready"), Some("client"));
        assert_eq!(loaded.report.shadowed, vec![("legacy", "ready")]);
    }

    #[test]
    fn test_slash_name_rules() {
        assert!(is_valid_slash_name("slowmode"));
        assert!(is_valid_slash_name("set-role_2"));
        assert!(!is_valid_slash_name(""));
        assert!(!is_valid_slash_name("Ping"));
        assert!(!is_valid_slash_name("two words"));
        assert!(!is_valid_slash_name(&"a".repeat(33)));
    }
}
