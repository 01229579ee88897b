//! Asia: Korean and Chinese titles in Indonesian translation (westmanga).
//!
//! Everything is addressed by slug and wrapped in the standard envelope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use komik_core::{ChapterContent, ChapterLink, ChapterNavigation, MangaCard, MangaDetail, NavLink, SourceTag};

use super::{Lookup, RawRecord, SourceAdapter, de, decode, list_items, lookup};
use crate::fetch::{ApiClient, ApiRequest};
use crate::links::{chapter_path, manga_path};
use crate::relative_time::parse_relative;
use crate::repair::{chapter_number, collapse_duplicate_origin, collapse_repeated_title, fix_image_url};

pub fn detail_request(slug: &str) -> ApiRequest {
    ApiRequest::get(format!("/api/asia/detail/{slug}"))
}

pub fn chapter_request(slug: &str) -> ApiRequest {
    ApiRequest::get(format!("/api/asia/chapter/{slug}"))
}

pub fn latest_request(page: u32) -> ApiRequest {
    ApiRequest::get("/api/asia/latest").query("page", page)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    alternative_title: String,
    #[serde(default, deserialize_with = "de::text")]
    description: String,
    #[serde(default, deserialize_with = "de::text")]
    cover: String,
    #[serde(default, deserialize_with = "de::text")]
    author: String,
    #[serde(default, deserialize_with = "de::text")]
    status: String,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    manga_type: String,
    #[serde(default, deserialize_with = "de::names")]
    genres: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    chapters: Vec<RawChapterLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChapterLink {
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
    #[serde(default, deserialize_with = "de::text")]
    number: String,
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChapter {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    manga_title: String,
    #[serde(default, deserialize_with = "de::text")]
    manga_slug: String,
    #[serde(default, deserialize_with = "de::urls")]
    images: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    prev_slug: String,
    #[serde(default, deserialize_with = "de::text")]
    next_slug: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
    #[serde(default, deserialize_with = "de::text")]
    cover: String,
    #[serde(default, deserialize_with = "de::text")]
    latest_chapter: String,
    #[serde(default, deserialize_with = "de::text")]
    updated_at: String,
}

impl RawRecord for RawDetail {
    const ALIASES: &'static [&'static [&'static str]] = &[
        &["alternativeTitle", "alternativeName", "alternative_name"],
        &["description", "synopsis"],
        &["cover", "coverImage", "thumbnail"],
        &["type", "country"],
    ];
}

impl RawRecord for RawChapterLink {
    const ALIASES: &'static [&'static [&'static str]] = &[&["updatedAt", "updated_at", "date"]];
}

impl RawRecord for RawChapter {
    const ALIASES: &'static [&'static [&'static str]] = &[
        &["mangaTitle", "manga_title"],
        &["mangaSlug", "manga_slug"],
        &["prevSlug", "prev_slug"],
        &["nextSlug", "next_slug"],
    ];
}

impl RawRecord for RawCard {
    const ALIASES: &'static [&'static [&'static str]] = &[
        &["cover", "coverImage", "thumbnail"],
        &["latestChapter", "latest_chapter", "chapter"],
        &["updatedAt", "updated_at", "time"],
    ];
}

fn chapter_title(slug: &str, fallback: &str) -> String {
    chapter_number(slug).map(|n| format!("Chapter {n}")).unwrap_or_else(|| fallback.to_string())
}

pub fn normalize_detail(data: Value, slug: &str) -> MangaDetail {
    let raw: RawDetail = decode(data);
    MangaDetail {
        source: SourceTag::Asia,
        slug: format!("asia/{slug}"),
        title: collapse_repeated_title(&raw.title),
        alternative_title: raw.alternative_title,
        description: raw.description,
        cover_image: fix_image_url(&raw.cover),
        author: raw.author,
        status: raw.status,
        manga_type: raw.manga_type,
        genres: raw.genres,
        chapters: raw
            .chapters
            .into_iter()
            .filter(|ch| !ch.slug.is_empty())
            .map(|ch| {
                let number = if ch.number.is_empty() { chapter_number(&ch.slug).unwrap_or_default() } else { ch.number };
                let title = if ch.title.is_empty() { format!("Chapter {number}") } else { ch.title };
                ChapterLink { url: chapter_path(SourceTag::Asia, &ch.slug), title, number, released: ch.updated_at }
            })
            .collect(),
    }
}

pub fn normalize_chapter(data: Value, slug: &str) -> ChapterContent {
    let raw: RawChapter = decode(data);

    let link = |target: &str, fallback: &str| {
        (!target.is_empty())
            .then(|| NavLink { url: chapter_path(SourceTag::Asia, target), title: chapter_title(target, fallback) })
    };

    let navigation = ChapterNavigation {
        prev: link(&raw.prev_slug, "Previous"),
        next: link(&raw.next_slug, "Next"),
        current_chapter: chapter_number(slug).unwrap_or_default(),
        prev_chapter: chapter_number(&raw.prev_slug).unwrap_or_default(),
        next_chapter: chapter_number(&raw.next_slug).unwrap_or_default(),
        manga_detail_url: if raw.manga_slug.is_empty() { String::new() } else { manga_path(SourceTag::Asia, &raw.manga_slug) },
    };

    ChapterContent {
        source: SourceTag::Asia,
        title: if raw.title.is_empty() { chapter_title(slug, "") } else { raw.title },
        manga_title: collapse_repeated_title(&raw.manga_title),
        images: raw.images.iter().map(|url| collapse_duplicate_origin(url)).filter(|url| !url.is_empty()).collect(),
        navigation,
    }
}

pub fn normalize_cards(data: &Value, now: DateTime<Utc>) -> Vec<MangaCard> {
    list_items(data)
        .iter()
        .map(|item| decode::<RawCard>(item.clone()))
        .filter(|raw| !raw.title.is_empty() && !raw.slug.is_empty())
        .map(|raw| MangaCard {
            source: SourceTag::Asia,
            title: collapse_repeated_title(&raw.title),
            url: manga_path(SourceTag::Asia, &raw.slug),
            image_url: fix_image_url(&raw.cover),
            latest_chapter: raw.latest_chapter,
            updated_at: parse_relative(&raw.updated_at, now),
            updated: raw.updated_at,
        })
        .collect()
}

/// Adapter over the Asia endpoints.
pub struct AsiaAdapter {
    api: ApiClient,
}

impl AsiaAdapter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SourceAdapter for AsiaAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Asia
    }

    async fn manga_detail(&self, id: &str) -> Lookup<MangaDetail> {
        let doc = self.api.fetch_json(&detail_request(id)).await;
        lookup(doc, |data| normalize_detail(data, id), MangaDetail::is_usable)
    }

    async fn chapter(&self, id: &str) -> Lookup<ChapterContent> {
        let doc = self.api.fetch_json(&chapter_request(id)).await;
        lookup(doc, |data| normalize_chapter(data, id), ChapterContent::is_usable)
    }

    async fn latest(&self, now: DateTime<Utc>) -> Vec<MangaCard> {
        let doc = self.api.fetch_json(&latest_request(1)).await;
        if !doc.success {
            tracing::warn!("asia latest unavailable: {}", doc.message.unwrap_or_default());
            return Vec::new();
        }
        normalize_cards(&doc.data, now)
    }
}
