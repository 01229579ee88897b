//! Manga detail and chapter records.

use serde::{Deserialize, Serialize};

use super::SourceTag;

/// Normalized manga detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MangaDetail {
    pub source: SourceTag,
    /// Identifier usable to request this record again (local scheme, e.g. `asia/<slug>`).
    pub slug: String,
    pub title: String,
    pub alternative_title: String,
    pub description: String,
    pub cover_image: String,
    pub author: String,
    pub status: String,
    pub manga_type: String,
    pub genres: Vec<String>,
    pub chapters: Vec<ChapterLink>,
}

impl MangaDetail {
    /// A detail record is only worth rendering when it has a title.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// A chapter entry on a manga detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChapterLink {
    pub title: String,
    /// Local chapter path, e.g. `/chapter/asia/<slug>`.
    pub url: String,
    /// Chapter number parsed from the upstream URL, empty when absent.
    pub number: String,
    /// Upstream release label, verbatim.
    pub released: String,
}

/// Normalized chapter reader page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChapterContent {
    pub source: SourceTag,
    pub title: String,
    pub manga_title: String,
    pub images: Vec<String>,
    pub navigation: ChapterNavigation,
}

impl ChapterContent {
    /// A chapter without pages cannot be read.
    pub fn is_usable(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Prev/next links and chapter numbers for the reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChapterNavigation {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
    pub current_chapter: String,
    pub prev_chapter: String,
    pub next_chapter: String,
    /// Local manga detail path, empty when the upstream gave no back link.
    pub manga_detail_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NavLink {
    pub url: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detail_is_not_usable() {
        let detail = MangaDetail::default();
        assert!(!detail.is_usable());

        let detail = MangaDetail { title: "   ".into(), ..Default::default() };
        assert!(!detail.is_usable());

        let detail = MangaDetail { title: "One Piece".into(), ..Default::default() };
        assert!(detail.is_usable());
    }

    #[test]
    fn test_chapter_usable_needs_images() {
        let chapter = ChapterContent { title: "Chapter 1".into(), ..Default::default() };
        assert!(!chapter.is_usable());

        let chapter = ChapterContent { images: vec!["https://img/1.jpg".into()], ..Default::default() };
        assert!(chapter.is_usable());
    }

    #[test]
    fn test_default_serializes_every_field() {
        let json = serde_json::to_value(ChapterContent::default()).unwrap();
        let nav = &json["navigation"];
        assert_eq!(json["images"], serde_json::json!([]));
        assert_eq!(json["source"], "komiku");
        assert!(nav["prev"].is_null());
        assert_eq!(nav["current_chapter"], "");
        assert_eq!(nav["manga_detail_url"], "");
    }
}
