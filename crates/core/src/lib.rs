//! Core types and shared functionality for komik.
//!
//! This crate provides:
//! - Canonical content records and source tags
//! - Unified error types
//! - Configuration structures
//! - The injected clock and the single-slot page cache

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{CacheEntry, SlotCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError, MirrorConfig};
pub use error::Error;
pub use models::{
    ChapterContent, ChapterLink, ChapterNavigation, DoujinChapter, DoujinChapterLink, DoujinChapterNavigation,
    DoujinDetail, DoujinEntry, DoujinPage, Genre, HomeFeed, MangaCard, MangaDetail, NavLink, PageImage, Pagination,
    SourceTag,
};
