//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::collections::HashSet;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn validate_origin(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| invalid(field, format!("invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, format!("unsupported scheme: {scheme}"))),
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `mirrors` is empty, has duplicate names, or a non-http(s) base URL
    /// - `race_timeout_ms` is less than 100ms or exceeds 2 minutes
    /// - `home_cache_ttl_secs` is 0 or exceeds one day
    /// - `user_agent` is empty
    /// - `komiku_site` or `doujin_site` is not an http(s) URL
    /// - `home_genre_limit` or `doujin_total_pages` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mirrors.is_empty() {
            return Err(invalid("mirrors", "at least one mirror is required"));
        }

        let mut names = HashSet::new();
        for mirror in &self.mirrors {
            if mirror.name.trim().is_empty() {
                return Err(invalid("mirrors", "mirror name must not be empty"));
            }
            if !names.insert(mirror.name.as_str()) {
                return Err(invalid("mirrors", format!("duplicate mirror name: {}", mirror.name)));
            }
            validate_origin("mirrors", &mirror.base_url)?;
        }

        if self.race_timeout_ms < 100 {
            return Err(invalid("race_timeout_ms", "must be at least 100ms"));
        }
        if self.race_timeout_ms > 120_000 {
            return Err(invalid("race_timeout_ms", "must not exceed 2 minutes (120000ms)"));
        }

        if self.home_cache_ttl_secs == 0 {
            return Err(invalid("home_cache_ttl_secs", "must be greater than 0"));
        }
        if self.home_cache_ttl_secs > 86_400 {
            return Err(invalid("home_cache_ttl_secs", "must not exceed one day (86400s)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        validate_origin("komiku_site", &self.komiku_site)?;
        validate_origin("doujin_site", &self.doujin_site)?;

        if self.home_genre_limit == 0 {
            return Err(invalid("home_genre_limit", "must be greater than 0"));
        }
        if self.doujin_total_pages == 0 {
            return Err(invalid("doujin_total_pages", "must be greater than 0"));
        }

        if self.mirrors.len() == 1 {
            tracing::warn!(mirror = %self.mirrors[0].name, "only one mirror configured; races have no fallback");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MirrorConfig;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_no_mirrors() {
        let config = AppConfig { mirrors: vec![], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "mirrors"));
    }

    #[test]
    fn test_validate_duplicate_mirror_names() {
        let config = AppConfig {
            mirrors: vec![MirrorConfig::new("A", "https://a.example"), MirrorConfig::new("A", "https://b.example")],
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "mirrors"));
    }

    #[test]
    fn test_validate_mirror_scheme() {
        let config = AppConfig { mirrors: vec![MirrorConfig::new("A", "ftp://a.example")], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "mirrors"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { race_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "race_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { race_timeout_ms: 120_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "race_timeout_ms"));
    }

    #[test]
    fn test_validate_ttl_zero() {
        let config = AppConfig { home_cache_ttl_secs: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "home_cache_ttl_secs"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_bad_site() {
        let config = AppConfig { komiku_site: "komiku".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "komiku_site"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { race_timeout_ms: 100, home_cache_ttl_secs: 1, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { race_timeout_ms: 120_000, home_cache_ttl_secs: 86_400, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
