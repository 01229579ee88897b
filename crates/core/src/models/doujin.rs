//! Doujin catalogue records.
//!
//! Defaults mirror what the site shows when the upstream leaves a field out.

use serde::{Deserialize, Serialize};

use super::PLACEHOLDER_IMAGE;

/// One entry of the doujin "last update" listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DoujinEntry {
    pub title: String,
    pub slug: String,
    pub image_url: String,
    pub genres: Vec<String>,
    pub chapters: Vec<DoujinChapterLink>,
    pub latest_chapter: String,
}

impl Default for DoujinEntry {
    fn default() -> Self {
        Self {
            title: "Untitled".into(),
            slug: String::new(),
            image_url: PLACEHOLDER_IMAGE.into(),
            genres: Vec::new(),
            chapters: Vec::new(),
            latest_chapter: "-".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl Pagination {
    /// Build pagination for `page` out of a fixed page count.
    pub fn new(page: u32, total_pages: u32, total_items: u32) -> Self {
        Self {
            page,
            total_pages,
            total_items,
            prev: (page > 1).then(|| page - 1),
            next: (page < total_pages).then(|| page + 1),
        }
    }
}

/// A page of the doujin listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DoujinPage {
    pub items: Vec<DoujinEntry>,
    pub pagination: Pagination,
}

/// Normalized doujin detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DoujinDetail {
    pub title: String,
    pub slug: String,
    pub cover: String,
    pub doujin_type: String,
    pub status: String,
    pub author: String,
    pub last_update: String,
    pub genres: Vec<String>,
    pub description: String,
    pub url: String,
    pub total_chapters: u32,
    pub chapters: Vec<DoujinChapterLink>,
}

impl Default for DoujinDetail {
    fn default() -> Self {
        Self {
            title: "Untitled".into(),
            slug: String::new(),
            cover: PLACEHOLDER_IMAGE.into(),
            doujin_type: "Unknown".into(),
            status: "Unknown".into(),
            author: "Unknown".into(),
            last_update: "-".into(),
            genres: Vec::new(),
            description: "No description available.".into(),
            url: String::new(),
            total_chapters: 0,
            chapters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DoujinChapterLink {
    pub number: String,
    pub title: String,
    pub slug: String,
    pub url: String,
}

/// A single page image in the doujin reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageImage {
    pub page: u32,
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DoujinChapterNavigation {
    pub prev: Option<String>,
    pub next: Option<String>,
    pub manga_url: Option<String>,
}

/// Normalized doujin chapter reader page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DoujinChapter {
    pub manga_title: String,
    pub manga_slug: String,
    pub chapter_number: String,
    pub chapter_slug: String,
    pub total_images: u32,
    pub images: Vec<PageImage>,
    pub navigation: DoujinChapterNavigation,
}

impl Default for DoujinChapter {
    fn default() -> Self {
        Self {
            manga_title: "Doujin".into(),
            manga_slug: String::new(),
            chapter_number: "Chapter".into(),
            chapter_slug: String::new(),
            total_images: 0,
            images: Vec::new(),
            navigation: DoujinChapterNavigation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_first_page() {
        let p = Pagination::new(1, 88, 20);
        assert_eq!(p.prev, None);
        assert_eq!(p.next, Some(2));
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::new(88, 88, 20);
        assert_eq!(p.prev, Some(87));
        assert_eq!(p.next, None);
    }

    #[test]
    fn test_doujin_detail_defaults() {
        let d = DoujinDetail::default();
        assert_eq!(d.title, "Untitled");
        assert_eq!(d.cover, PLACEHOLDER_IMAGE);
        assert_eq!(d.author, "Unknown");
        assert_eq!(d.last_update, "-");
        assert!(d.chapters.is_empty());
    }
}
