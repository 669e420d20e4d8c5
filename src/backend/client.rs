//! Backend REST client
//!
//! JSON over HTTPS to the community backend. Every call swallows its own
//! failure: errors are logged and reported as `false` or `None`.

use log::{debug, warn};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// An advertisement served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExposureBody {
    guild_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClickBody {
    user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ObserverRoleBody {
    role_id: String,
}

/// Key under which the backend stores a conversation history
pub fn conversation_key(subject: &str, guild_id: u64) -> String {
    format!("{subject}_{guild_id}")
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request with an optional JSON body; `true` on a 2xx response
    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: Option<&B>) -> bool {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!("{method} {url} -> {}", response.status());
                true
            }
            Ok(response) => {
                let status = response.status();
                let payload = response.text().await.unwrap_or_default();
                warn!("{method} {url} failed with {status}: {payload}");
                false
            }
            Err(e) => {
                warn!("{method} {url} failed: {e}");
                false
            }
        }
    }

    pub async fn record_ad_exposure(&self, ad_id: &str, guild_id: Option<u64>) -> bool {
        let body = ExposureBody {
            guild_id: guild_id.map(|id| id.to_string()),
        };
        self.send(Method::POST, &format!("ads/{ad_id}/exposures"), Some(&body))
            .await
    }

    pub async fn record_ad_click(&self, ad_id: &str, user_id: u64) -> bool {
        let body = ClickBody {
            user_id: user_id.to_string(),
        };
        self.send(Method::POST, &format!("ads/{ad_id}/clicks"), Some(&body))
            .await
    }

    pub async fn set_observer_role(&self, guild_id: u64, role_id: u64) -> bool {
        let body = ObserverRoleBody {
            role_id: role_id.to_string(),
        };
        self.send(
            Method::PUT,
            &format!("guilds/{guild_id}/observer-role"),
            Some(&body),
        )
        .await
    }

    pub async fn delete_conversation(&self, subject: &str, guild_id: u64) -> bool {
        let key = conversation_key(subject, guild_id);
        self.send::<()>(Method::DELETE, &format!("conversations/{key}"), None)
            .await
    }

    /// The advertisement to show in a guild, if any
    pub async fn fetch_ad(&self, guild_id: Option<u64>) -> Option<Ad> {
        let url = self.url("ads/current");
        let mut request = self.http.get(&url);
        if let Some(guild_id) = guild_id {
            request = request.query(&[("guildId", guild_id.to_string())]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("GET {url} failed: {e}");
                return None;
            }
        };
        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => None,
            status if status.is_success() => match response.json::<Ad>().await {
                Ok(ad) => Some(ad),
                Err(e) => {
                    warn!("GET {url} returned an unreadable ad: {e}");
                    None
                }
            },
            status => {
                warn!("GET {url} failed with {status}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_key() {
        assert_eq!(conversation_key("루나", 1234), "루나_1234");
    }

    #[test]
    fn test_url_joining() {
        let client = BackendClient::new("https://api.example.com/");
        assert_eq!(client.url("/ads/current"), "https://api.example.com/ads/current");
        assert_eq!(client.url("guilds/1"), "https://api.example.com/guilds/1");
    }

    #[test]
    fn test_ad_deserialize_defaults() {
        let ad: Ad = serde_json::from_str(r#"{"id":"7","title":"Spring event"}"#).unwrap();
        assert_eq!(ad.id, "7");
        assert_eq!(ad.description, "");
        assert!(ad.url.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_reports_false() {
        // Nothing listens on the discard port
        let client = BackendClient::new("http://127.0.0.1:9");
        assert!(!client.record_ad_click("7", 1).await);
        assert!(!client.delete_conversation("luna", 1).await);
        assert!(client.fetch_ad(Some(1)).await.is_none());
    }
}
