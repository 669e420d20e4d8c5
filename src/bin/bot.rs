use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::guild::{Guild, UnavailableGuild};
use serenity::prelude::*;
use std::sync::Arc;

use guildbot::backend::{BackendClient, StatsPoster};
use guildbot::commands::BotContext;
use guildbot::core::Config;
use guildbot::dispatch::{self, Dispatcher, DispatcherHandle};
use guildbot::gateway::{discord, GatewayEvent, SerenityGateway};
use guildbot::loader::{self, Manifest};

/// Converts serenity events and queues them for the dispatcher
struct Handler {
    dispatcher: DispatcherHandle,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let incoming = discord::incoming_message(&ctx, &msg).await;
        self.dispatcher.submit(GatewayEvent::MessageCreate(incoming));
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🔗 Gateway session ID: {:?}", ready.session_id);
        info!("🤖 Bot ID: {}", ready.user.id);
        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }
        self.dispatcher
            .submit(GatewayEvent::Ready(discord::ready_info(&ready)));
    }

    async fn interaction_create(&self, _ctx: Context, interaction: Interaction) {
        let incoming = discord::incoming_interaction(&interaction);
        self.dispatcher
            .submit(GatewayEvent::InteractionCreate(incoming));
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, is_new: bool) {
        if is_new {
            info!("🆕 Joined new guild: {} ({})", guild.name, guild.id);
        }
        self.dispatcher.submit(GatewayEvent::GuildJoined(guild.id.0));
    }

    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        if incomplete.unavailable {
            warn!("📴 Guild {} became unavailable", incomplete.id);
            return;
        }
        self.dispatcher.submit(GatewayEvent::GuildLeft(incomplete.id.0));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting community bot...");

    let modules = loader::load(Manifest::builtin())?;
    for (category, name) in &modules.report.shadowed {
        warn!("⚠️ Event '{name}' from '{category}' was not bound (name already taken)");
    }

    let backend = config.backend_base_url.clone().map(BackendClient::new);
    if backend.is_none() {
        info!("🔌 BACKEND_BASE_URL not set - ads, observer and forget are disabled");
    }

    let (handle, receiver) = dispatch::queue();
    let handler = Handler { dispatcher: handle };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let http = client.cache_and_http.http.clone();
    let stats = match (&config.bot_list_base_url, &config.bot_list_token) {
        (Some(base_url), Some(token)) => Some(StatsPoster::new(base_url.clone(), token.clone())),
        _ => None,
    };
    let bot_id = match (config.application_id, &stats) {
        (Some(id), _) => Some(id),
        (None, Some(_)) => Some(http.get_current_application_info().await?.id.0),
        (None, None) => None,
    };
    let stats_interval = config.stats_interval;

    let gateway = Arc::new(SerenityGateway::new(http));
    let ctx = Arc::new(BotContext::new(config, gateway, modules, backend));

    tokio::spawn(Dispatcher::new(Arc::clone(&ctx), receiver).run());

    if let (Some(poster), Some(bot_id)) = (stats, bot_id) {
        info!(
            "📊 Posting bot-list stats every {}s",
            stats_interval.as_secs()
        );
        tokio::spawn(poster.run(Arc::clone(&ctx), bot_id, stats_interval));
    }

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        error!("This could be due to:");
        error!("  - Invalid bot token");
        error!("  - Network connectivity issues");
        error!("  - Missing MESSAGE_CONTENT intent in the developer portal");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
