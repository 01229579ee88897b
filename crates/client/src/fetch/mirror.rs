//! The fixed set of upstream mirrors.

use komik_core::{AppConfig, MirrorConfig};

/// An independently reachable upstream API host serving equivalent content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    pub name: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
}

impl Mirror {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { name: name.into(), base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Absolute URL for a relative path (query not included).
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') { format!("{}{}", self.base_url, path) } else { format!("{}/{}", self.base_url, path) }
    }
}

impl From<&MirrorConfig> for Mirror {
    fn from(config: &MirrorConfig) -> Self {
        Mirror::new(config.name.clone(), config.base_url.clone())
    }
}

/// Immutable list of mirrors, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRegistry {
    mirrors: Vec<Mirror>,
}

impl MirrorRegistry {
    pub fn new(mirrors: Vec<Mirror>) -> Self {
        Self { mirrors }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.mirrors.iter().map(Mirror::from).collect())
    }

    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirrors
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }
}
