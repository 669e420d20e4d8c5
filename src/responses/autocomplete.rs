//! Autocomplete handlers

use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;

use super::{ResponseGroup, ResponseHandler};
use crate::commands::handlers::theme::{list_theme_files, matching_themes, THEME_OPTION};
use crate::commands::BotContext;
use crate::core::response::{truncate_chars, AUTOCOMPLETE_LIMIT, CHOICE_LIMIT};
use crate::gateway::{AutocompleteChoice, IncomingInteraction, InteractionKind};

/// Suggests theme files for the `파일명` option
pub struct ThemeFileAutocomplete;

#[async_trait]
impl ResponseHandler for ThemeFileAutocomplete {
    fn name(&self) -> &'static str {
        THEME_OPTION
    }

    fn group(&self) -> ResponseGroup {
        ResponseGroup::Autocomplete
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let query = match &interaction.kind {
            InteractionKind::Autocomplete {
                focused: Some(option),
                ..
            } => option.value.clone().unwrap_or_default(),
            _ => String::new(),
        };

        let files = match list_theme_files(&ctx.config.theme_dir).await {
            Ok(files) => files,
            Err(e) => {
                warn!(
                    "Cannot list theme directory {}: {e}",
                    ctx.config.theme_dir.display()
                );
                Vec::new()
            }
        };

        let choices = matching_themes(&files, &query)
            .into_iter()
            .take(AUTOCOMPLETE_LIMIT)
            .map(|file| {
                let file = truncate_chars(file, CHOICE_LIMIT);
                AutocompleteChoice {
                    name: file.clone(),
                    value: file,
                }
            })
            .collect();

        ctx.gateway.autocomplete(interaction, choices).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{config, context_with};
    use crate::gateway::testing::Call;
    use crate::gateway::CommandOption;
    use crate::loader::Manifest;
    use std::fs;

    fn autocomplete(value: &str) -> IncomingInteraction {
        IncomingInteraction {
            id: 77,
            token: "token".into(),
            channel_id: 1,
            guild_id: Some(2),
            user_id: 3,
            user_name: "user".into(),
            member_permissions: None,
            kind: InteractionKind::Autocomplete {
                command_name: "theme".into(),
                focused: Some(CommandOption::new(THEME_OPTION, value)),
            },
        }
    }

    fn themed_context(dir: &std::path::Path) -> (Arc<BotContext>, Arc<crate::gateway::testing::RecordingGateway>) {
        let mut config = config();
        config.theme_dir = dir.to_path_buf();
        context_with(Manifest::builtin(), config)
    }

    #[tokio::test]
    async fn test_filters_by_query() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["rain.mp3", "Rainbow.ogg", "night.mp3"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let (ctx, gateway) = themed_context(dir.path());

        ThemeFileAutocomplete
            .execute(ctx, &autocomplete("rain"))
            .await
            .unwrap();

        let calls = gateway.calls();
        let Call::Autocomplete { choices, .. } = &calls[0] else {
            panic!("expected autocomplete call, got {calls:?}");
        };
        let names: Vec<_> = choices.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Rainbow.ogg", "rain.mp3"]);
    }

    #[tokio::test]
    async fn test_missing_directory_answers_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, gateway) = themed_context(&dir.path().join("absent"));

        ThemeFileAutocomplete.execute(ctx, &autocomplete("")).await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![Call::Autocomplete {
                interaction_id: 77,
                choices: vec![]
            }]
        );
    }
}
