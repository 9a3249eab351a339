//! Client configuration: credentials, caching and transport settings.

use eyre::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Settings for [`crate::YouTubeClient::from_config`].
///
/// Can be loaded from a JSON file with [`Config::load`] or from `YOUTUBE_*` environment
/// variables with [`Config::from_env`]. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key, sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// OAuth access token, sent as a bearer token. Required for the `get_my_*` accessors.
    pub access_token: Option<String>,
    /// Whether fetched resources and resolved IDs are memoized.
    pub cache: bool,
    /// How long memoized values stay fresh. `None` keeps them for the life of the client.
    pub cache_ttl_secs: Option<u64>,
    pub base_url: String,
    /// Per-request timeout enforced by the HTTP transport.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            cache: true,
            cache_ttl_secs: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reads a JSON configuration file.
    pub async fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parse config file {}", path.display()))
    }

    /// Builds a configuration from `YOUTUBE_API_KEY`, `YOUTUBE_ACCESS_TOKEN`, `YOUTUBE_CACHE`,
    /// `YOUTUBE_CACHE_TTL` (seconds) and `YOUTUBE_API_BASE_URL`.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let mut config = Self::default();
        config.apply(lookup)?;
        Ok(config)
    }

    /// Overrides fields with any `YOUTUBE_*` variables that are set.
    pub fn merge_env(mut self) -> eyre::Result<Self> {
        self.apply(|name| std::env::var(name).ok())?;
        Ok(self)
    }

    fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<()> {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("YOUTUBE_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(token) = lookup("YOUTUBE_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(cache) = lookup("YOUTUBE_CACHE") {
            self.cache = match cache.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => eyre::bail!("YOUTUBE_CACHE must be a boolean, got {other:?}"),
            };
        }
        if let Some(ttl) = lookup("YOUTUBE_CACHE_TTL") {
            let ttl = ttl
                .trim()
                .parse()
                .with_context(|| format!("parse YOUTUBE_CACHE_TTL {ttl:?} as seconds"))?;
            self.cache_ttl_secs = Some(ttl);
        }
        if let Some(base_url) = lookup("YOUTUBE_API_BASE_URL") {
            self.base_url = base_url;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "key"),
            ("YOUTUBE_CACHE", "false"),
            ("YOUTUBE_CACHE_TTL", "300"),
            ("YOUTUBE_ACCESS_TOKEN", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.access_token, None);
        assert!(!config.cache);
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn malformed_ttl_is_rejected() {
        let err = Config::from_lookup(lookup(&[("YOUTUBE_CACHE_TTL", "soon")])).unwrap_err();
        assert!(err.to_string().contains("YOUTUBE_CACHE_TTL"), "{err:?}");
    }

    #[tokio::test]
    async fn load_fills_missing_fields_with_defaults() {
        let path = std::env::temp_dir().join(format!("youtube-data-config-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{ "api_key": "abc", "cache_ttl_secs": 60 }"#)
            .await
            .unwrap();
        let config = Config::load(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert!(config.cache);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(60)));
    }
}
