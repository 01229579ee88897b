//! Homepage and listing records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceTag;

/// A manga tile as shown on listings (home, popular, latest, search).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MangaCard {
    pub source: SourceTag,
    pub title: String,
    /// Local manga detail path.
    pub url: String,
    pub image_url: String,
    pub latest_chapter: String,
    /// Upstream update label, verbatim (e.g. `2 jam lalu`).
    pub updated: String,
    /// Best-effort absolute time derived from `updated`, used only for ordering.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Genre {
    pub name: String,
    pub slug: String,
}

/// Aggregated homepage document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HomeFeed {
    pub recommendations: Vec<MangaCard>,
    pub genres: Vec<Genre>,
    /// Latest updates from every source, newest first.
    pub latest: Vec<MangaCard>,
    pub generated_at: DateTime<Utc>,
}
