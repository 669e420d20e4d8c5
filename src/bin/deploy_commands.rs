//! One-shot slash command deployment
//!
//! Pushes every command flagged for upload, globally or to `DISCORD_GUILD_ID`
//! when set. Guild commands show up immediately; global ones can take up to
//! an hour to propagate.

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::http::Http;
use serenity::model::id::GuildId;

use guildbot::commands::{create_slash_commands, register_global_commands, register_guild_commands};
use guildbot::core::Config;
use guildbot::loader::{self, Manifest};

fn bot_token(token: &str) -> String {
    if token.starts_with("Bot ") {
        token.to_string()
    } else {
        format!("Bot {token}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let modules = loader::load(Manifest::builtin())?;
    let commands = create_slash_commands(&modules.commands);
    info!(
        "📦 {} of {} commands flagged for upload",
        commands.len(),
        modules.report.commands
    );

    let token = bot_token(&config.discord_token);
    let application_id = match config.application_id {
        Some(id) => id,
        None => {
            info!("DISCORD_APPLICATION_ID not set, asking Discord for it");
            Http::new(&token).get_current_application_info().await?.id.0
        }
    };
    let http = Http::new_with_application_id(&token, application_id);

    let result = match config.discord_guild_id {
        Some(guild_id) => register_guild_commands(&http, GuildId(guild_id), commands).await,
        None => register_global_commands(&http, commands).await,
    };

    match result {
        Ok(count) => {
            info!("✅ Deployed {count} slash commands");
            Ok(())
        }
        Err(e) => {
            error!("❌ Slash command deployment failed: {e:#}");
            Err(e)
        }
    }
}
