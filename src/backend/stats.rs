//! # Feature: Bot-Listing Stats
//!
//! Periodically reports the server and shard counts to the bot-listing site.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true (needs `BOT_LIST_BASE_URL` and `BOT_LIST_TOKEN`)

use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval};

use crate::commands::BotContext;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatsBody {
    pub servers: usize,
    pub shards: u64,
}

#[derive(Clone)]
pub struct StatsPoster {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl StatsPoster {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn stats_url(&self, bot_id: u64) -> String {
        format!("{}/bots/{bot_id}/stats", self.base_url)
    }

    /// POST the counts; `false` on any failure
    pub async fn post(&self, bot_id: u64, body: &StatsBody) -> bool {
        let url = self.stats_url(bot_id);
        let result = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, &self.token)
            .json(body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(
                    "📊 Posted stats: {} servers, {} shards",
                    body.servers, body.shards
                );
                true
            }
            Ok(response) => {
                let status = response.status();
                let payload = response.text().await.unwrap_or_default();
                warn!("Stats post to {url} failed with {status}: {payload}");
                false
            }
            Err(e) => {
                warn!("Stats post to {url} failed: {e}");
                false
            }
        }
    }

    /// Post on every tick once the ready handshake has reported guilds
    ///
    /// `every` must be non-zero; `Config` rejects a zero interval.
    pub async fn run(self, ctx: Arc<BotContext>, bot_id: u64, every: Duration) {
        let mut interval = schedule(every);
        loop {
            interval.tick().await;
            let servers = ctx.guild_count();
            if servers == 0 {
                continue;
            }
            let body = StatsBody {
                servers,
                shards: ctx.shard_count(),
            };
            self.post(bot_id, &body).await;
        }
    }
}

/// First tick one full period from now, so the gateway has reported guilds by then
fn schedule(every: Duration) -> Interval {
    interval_at(Instant::now() + every, every)
}
