//! Environment-backed configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Bot-listing stats settings and theme directory
//! - 1.0.0: Initial release with token, prefix and backend URL

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ConfigError;

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_THEME_DIR: &str = "themes";
pub const DEFAULT_STATS_INTERVAL_SECS: u64 = 1800;

/// Process configuration, loaded once at boot
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub application_id: Option<u64>,
    /// Development guild; slash commands are registered there instead of globally
    pub discord_guild_id: Option<u64>,
    pub command_prefix: String,
    pub backend_base_url: Option<String>,
    /// Channel that receives relayed direct messages
    pub dm_relay_channel_id: Option<u64>,
    pub theme_dir: PathBuf,
    pub bot_list_base_url: Option<String>,
    pub bot_list_token: Option<String>,
    pub stats_interval: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        Ok(Self {
            discord_token,
            application_id: parse_id(&get, "DISCORD_APPLICATION_ID")?,
            discord_guild_id: parse_id(&get, "DISCORD_GUILD_ID")?,
            command_prefix: get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            backend_base_url: get("BACKEND_BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            dm_relay_channel_id: parse_id(&get, "DM_RELAY_CHANNEL_ID")?,
            theme_dir: get("THEME_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_THEME_DIR)),
            bot_list_base_url: get("BOT_LIST_BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            bot_list_token: get("BOT_LIST_TOKEN"),
            stats_interval: parse_interval(&get, "STATS_INTERVAL_SECS")?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_id<F>(get: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(None),
    }
}

/// Interval in whole seconds; zero is rejected since timers need a non-zero period
fn parse_interval<F>(get: &F, key: &'static str) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_id(get, key)? {
        Some(0) => Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
        }),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(Duration::from_secs(DEFAULT_STATS_INTERVAL_SECS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.theme_dir, PathBuf::from("themes"));
        assert_eq!(config.stats_interval, Duration::from_secs(1800));
        assert_eq!(config.log_level, "info");
        assert!(config.backend_base_url.is_none());
    }

    #[test]
    fn test_missing_token() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DISCORD_TOKEN")));
    }

    #[test]
    fn test_invalid_id() {
        let err = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_GUILD_ID", "not-a-number"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DISCORD_GUILD_ID", .. }));
    }

    #[test]
    fn test_zero_stats_interval_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("STATS_INTERVAL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STATS_INTERVAL_SECS", .. }));

        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("STATS_INTERVAL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.stats_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("BACKEND_BASE_URL", "https://api.example.com/"),
            ("COMMAND_PREFIX", "?"),
        ]))
        .unwrap();
        assert_eq!(config.backend_base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.command_prefix, "?");
    }
}
