//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (KOMIK_*)
//! 2. TOML config file (if KOMIK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Browser user agent sent to every mirror; some of them reject unknown clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// One upstream API mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub name: String,
    pub base_url: String,
}

impl MirrorConfig {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self { name: name.into(), base_url: base_url.into() }
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (KOMIK_*)
/// 2. TOML config file (if KOMIK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream API mirrors, raced against each other on every request.
    ///
    /// Usually set in the TOML file as `[[mirrors]]` tables.
    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<MirrorConfig>,

    /// Deadline for a whole mirror race in milliseconds.
    ///
    /// Set via KOMIK_RACE_TIMEOUT_MS environment variable.
    #[serde(default = "default_race_timeout_ms")]
    pub race_timeout_ms: u64,

    /// User-Agent string for upstream requests.
    ///
    /// Set via KOMIK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How long the aggregated homepage is served from memory, in seconds.
    ///
    /// Set via KOMIK_HOME_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_home_cache_ttl_secs")]
    pub home_cache_ttl_secs: u64,

    /// Origin of the primary regional site; detail and chapter lookups pass full URLs on it.
    ///
    /// Set via KOMIK_KOMIKU_SITE environment variable.
    #[serde(default = "default_komiku_site")]
    pub komiku_site: String,

    /// Origin of the doujin site.
    ///
    /// Set via KOMIK_DOUJIN_SITE environment variable.
    #[serde(default = "default_doujin_site")]
    pub doujin_site: String,

    /// Number of genres shown on the homepage.
    ///
    /// Set via KOMIK_HOME_GENRE_LIMIT environment variable.
    #[serde(default = "default_home_genre_limit")]
    pub home_genre_limit: usize,

    /// Known page count of the doujin listing; the upstream does not report it.
    ///
    /// Set via KOMIK_DOUJIN_TOTAL_PAGES environment variable.
    #[serde(default = "default_doujin_total_pages")]
    pub doujin_total_pages: u32,
}

fn default_mirrors() -> Vec<MirrorConfig> {
    vec![
        MirrorConfig::new("Primary", "https://international.komikkuya.my.id"),
        MirrorConfig::new("Secondary", "https://internationalbackup.komikkuya.my.id"),
        MirrorConfig::new("Vercel", "https://komiku-api-self.vercel.app"),
        MirrorConfig::new("Netlify", "https://komikkuyaapi.netlify.app"),
    ]
}

fn default_race_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_home_cache_ttl_secs() -> u64 {
    300
}

fn default_komiku_site() -> String {
    "https://komiku.id".into()
}

fn default_doujin_site() -> String {
    "https://komikdewasa.id".into()
}

fn default_home_genre_limit() -> usize {
    5
}

fn default_doujin_total_pages() -> u32 {
    88
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mirrors: default_mirrors(),
            race_timeout_ms: default_race_timeout_ms(),
            user_agent: default_user_agent(),
            home_cache_ttl_secs: default_home_cache_ttl_secs(),
            komiku_site: default_komiku_site(),
            doujin_site: default_doujin_site(),
            home_genre_limit: default_home_genre_limit(),
            doujin_total_pages: default_doujin_total_pages(),
        }
    }
}

impl AppConfig {
    /// Race deadline as Duration for use with tokio.
    pub fn race_timeout(&self) -> Duration {
        Duration::from_millis(self.race_timeout_ms)
    }

    /// Homepage cache TTL as Duration.
    pub fn home_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.home_cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `KOMIK_`
    /// 2. TOML file from `KOMIK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("KOMIK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("KOMIK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
