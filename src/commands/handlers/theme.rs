//! # Feature: Themes
//!
//! Picks a background theme from the files in `THEME_DIR`. The file option
//! is completed by the `파일명` autocomplete handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::{BotCommand, CommandData, OptionKind, OptionSpec};
use crate::core::response::{truncate_for_message, AUTOCOMPLETE_LIMIT};
use crate::gateway::{IncomingInteraction, IncomingMessage, Reply};

/// Name of the theme file option, also the autocomplete handler key
pub const THEME_OPTION: &str = "파일명";

/// Regular files in `dir`, sorted by name
pub async fn list_theme_files(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.push(name.to_string());
        }
    }
    files.sort();
    Ok(files)
}

/// Files whose name contains `query`, ignoring case, in listing order
pub fn matching_themes<'a>(files: &'a [String], query: &str) -> Vec<&'a str> {
    let query = query.trim().to_lowercase();
    files
        .iter()
        .filter(|file| file.to_lowercase().contains(&query))
        .map(String::as_str)
        .collect()
}

pub struct ThemeCommand;

impl ThemeCommand {
    async fn select(&self, ctx: &BotContext, guild_id: Option<u64>, file: &str) -> Result<String> {
        let Some(guild_id) = guild_id else {
            return Ok("이 명령어는 서버에서만 사용할 수 있습니다.".to_string());
        };
        let files = match list_theme_files(&ctx.config.theme_dir).await {
            Ok(files) => files,
            Err(e) => {
                warn!("Cannot list theme directory {}: {e}", ctx.config.theme_dir.display());
                return Ok("테마 목록을 불러올 수 없습니다.".to_string());
            }
        };
        if !files.iter().any(|f| f == file) {
            return Ok(format!("`{file}` 테마를 찾을 수 없습니다."));
        }

        ctx.selected_themes.insert(guild_id, file.to_string());
        info!("Guild {guild_id} switched theme to {file}");
        Ok(format!("🎵 테마를 `{file}`(으)로 변경했습니다."))
    }

    async fn overview(&self, ctx: &BotContext, guild_id: Option<u64>) -> String {
        let current = guild_id
            .and_then(|id| ctx.selected_themes.get(&id).map(|t| t.value().clone()))
            .unwrap_or_else(|| "없음".to_string());
        let files = list_theme_files(&ctx.config.theme_dir).await.unwrap_or_default();

        let mut text = format!("현재 테마: `{current}`\n");
        if files.is_empty() {
            text.push_str("사용 가능한 테마가 없습니다.");
        } else {
            let listed: Vec<_> = files
                .iter()
                .take(AUTOCOMPLETE_LIMIT)
                .map(|f| format!("`{f}`"))
                .collect();
            text.push_str(&format!("테마 목록: {}", listed.join(", ")));
            if files.len() > AUTOCOMPLETE_LIMIT {
                text.push_str(&format!(" 외 {}개", files.len() - AUTOCOMPLETE_LIMIT));
            }
        }
        truncate_for_message(&text)
    }
}

#[async_trait]
impl BotCommand for ThemeCommand {
    fn data(&self) -> CommandData {
        CommandData::new("theme", "서버 테마를 변경합니다")
            .aliases(&["테마", "bgm"])
            .option(
                OptionSpec::new(THEME_OPTION, "테마 파일", OptionKind::String)
                    .required()
                    .autocomplete(),
            )
    }

    async fn execute(&self, ctx: Arc<BotContext>, interaction: &IncomingInteraction) -> Result<()> {
        let file = interaction.option_str(THEME_OPTION).unwrap_or_default();
        let text = self.select(&ctx, interaction.guild_id, file).await?;
        ctx.gateway.respond(interaction, Reply::text(text)).await
    }

    fn supports_prefix(&self) -> bool {
        true
    }

    async fn execute_prefix(
        &self,
        ctx: Arc<BotContext>,
        msg: &IncomingMessage,
        args: &[String],
    ) -> Result<()> {
        let text = if args.is_empty() {
            self.overview(&ctx, msg.guild_id).await
        } else {
            self.select(&ctx, msg.guild_id, &args.join(" ")).await?
        };
        ctx.gateway.send_message(msg.channel_id, &text).await
    }
}
