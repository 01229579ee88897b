//! Canonical content records.
//!
//! Every upstream source is normalized into these shapes before anything
//! downstream sees it. All fields carry a defined default: strings default to
//! empty, lists to empty, and optional navigation links to `None`.

mod doujin;
mod home;
mod manga;
mod source;

pub use doujin::{
    DoujinChapter, DoujinChapterLink, DoujinChapterNavigation, DoujinDetail, DoujinEntry, DoujinPage, PageImage,
    Pagination,
};
pub use home::{Genre, HomeFeed, MangaCard};
pub use manga::{ChapterContent, ChapterLink, ChapterNavigation, MangaDetail, NavLink};
pub use source::SourceTag;

/// Placeholder image served when an upstream cover is missing or broken.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";
