//! International: English scanlations (weebcentral), addressed by ULID.
//!
//! Lookups by a human slug go through search first, then detail by id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use komik_core::{ChapterContent, ChapterLink, ChapterNavigation, MangaCard, MangaDetail, NavLink, SourceTag};

use super::{Lookup, RawRecord, SourceAdapter, de, decode, list_items, lookup};
use crate::fetch::{ApiClient, ApiRequest};
use crate::links::{chapter_path, last_segment, manga_path};
use crate::relative_time::parse_relative;
use crate::repair::{chapter_number, collapse_duplicate_origin, collapse_repeated_title, fix_image_url};
use crate::select::heuristics::is_ulid;

pub fn search_request(query: &str) -> ApiRequest {
    ApiRequest::get("/api/international/search").query("q", query)
}

pub fn detail_request(id: &str) -> ApiRequest {
    ApiRequest::get(format!("/api/international/series/{id}"))
}

pub fn chapter_request(id: &str) -> ApiRequest {
    ApiRequest::get(format!("/api/international/chapter/{id}"))
}

pub fn latest_request() -> ApiRequest {
    ApiRequest::get("/api/international/latest")
}

#[derive(Debug, Default, Deserialize)]
struct RawSearchHit {
    #[serde(default, deserialize_with = "de::text")]
    id: String,
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    url: String,
}

impl RawSearchHit {
    fn series_id(&self) -> String {
        if !self.id.is_empty() { self.id.clone() } else { series_id_from_url(&self.url) }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    #[serde(default, deserialize_with = "de::text")]
    id: String,
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::names")]
    alternative_titles: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    description: String,
    #[serde(default, deserialize_with = "de::text")]
    cover: String,
    #[serde(default, deserialize_with = "de::names")]
    authors: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    status: String,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    series_type: String,
    #[serde(default, deserialize_with = "de::names")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    chapters: Vec<RawChapterLink>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChapterLink {
    #[serde(default, deserialize_with = "de::text")]
    id: String,
    #[serde(default, deserialize_with = "de::text")]
    name: String,
    #[serde(default, deserialize_with = "de::text")]
    url: String,
    #[serde(default, deserialize_with = "de::text")]
    date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChapter {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    series_title: String,
    #[serde(default, deserialize_with = "de::text")]
    series_id: String,
    #[serde(default, deserialize_with = "de::urls")]
    images: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    prev_id: String,
    #[serde(default, deserialize_with = "de::text")]
    next_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    #[serde(default, deserialize_with = "de::text")]
    id: String,
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    cover: String,
    #[serde(default, deserialize_with = "de::text")]
    chapter: String,
    #[serde(default, deserialize_with = "de::text")]
    updated: String,
}

impl RawRecord for RawSearchHit {}

impl RawRecord for RawDetail {
    const ALIASES: &'static [&'static [&'static str]] = &[
        &["alternativeTitles", "altTitles"],
        &["cover", "image", "coverImage"],
        &["authors", "author"],
        &["tags", "genres"],
    ];
}

impl RawRecord for RawChapterLink {
    const ALIASES: &'static [&'static [&'static str]] = &[&["name", "title"], &["date", "updated"]];
}

impl RawRecord for RawChapter {
    const ALIASES: &'static [&'static [&'static str]] = &[&["title", "name"], &["seriesTitle", "mangaTitle"]];
}

impl RawRecord for RawCard {
    const ALIASES: &'static [&'static [&'static str]] =
        &[&["cover", "image"], &["chapter", "latestChapter"], &["updated", "updatedAt"]];
}

/// `https://weebcentral.com/series/<id>/<name>` → `<id>`.
fn series_id_from_url(url: &str) -> String {
    url.split('/')
        .skip_while(|s| *s != "series")
        .nth(1)
        .map(str::to_string)
        .unwrap_or_else(|| last_segment(url))
}

/// Lowercase, alphanumerics kept, every other run collapsed to one `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Pick the search hit matching `slug`, falling back to the first hit.
fn resolve_series_id(data: &Value, slug: &str) -> Option<String> {
    let hits: Vec<RawSearchHit> =
        list_items(data).iter().filter(|item| item.is_object()).map(|item| decode(item.clone())).collect();
    let wanted = slugify(slug);
    hits.iter()
        .find(|hit| slugify(&hit.title) == wanted)
        .or_else(|| hits.first())
        .map(RawSearchHit::series_id)
        .filter(|id| !id.is_empty())
}

pub fn normalize_detail(data: Value, fallback_id: &str) -> MangaDetail {
    let raw: RawDetail = decode(data);
    let id = if raw.id.is_empty() { fallback_id.to_string() } else { raw.id };
    MangaDetail {
        source: SourceTag::International,
        slug: format!("series/{id}"),
        title: collapse_repeated_title(&raw.title),
        alternative_title: raw.alternative_titles.join(", "),
        description: raw.description,
        cover_image: fix_image_url(&raw.cover),
        author: raw.authors.join(", "),
        status: raw.status,
        manga_type: raw.series_type,
        genres: raw.tags,
        chapters: raw
            .chapters
            .into_iter()
            .filter_map(|ch| {
                let id = if ch.id.is_empty() { last_segment(&ch.url) } else { ch.id };
                (!id.is_empty()).then(|| ChapterLink {
                    url: chapter_path(SourceTag::International, &id),
                    number: chapter_number(&ch.name).unwrap_or_default(),
                    title: ch.name,
                    released: ch.date,
                })
            })
            .collect(),
    }
}

pub fn normalize_chapter(data: Value, id: &str) -> ChapterContent {
    let raw: RawChapter = decode(data);

    let link = |target: &str, title: &str| {
        (!target.is_empty()).then(|| NavLink { url: chapter_path(SourceTag::International, target), title: title.to_string() })
    };

    let navigation = ChapterNavigation {
        prev: link(&raw.prev_id, "Previous"),
        next: link(&raw.next_id, "Next"),
        current_chapter: chapter_number(&raw.title).unwrap_or_default(),
        prev_chapter: String::new(),
        next_chapter: String::new(),
        manga_detail_url: if raw.series_id.is_empty() {
            String::new()
        } else {
            manga_path(SourceTag::International, &raw.series_id)
        },
    };

    ChapterContent {
        source: SourceTag::International,
        title: if raw.title.is_empty() { format!("Chapter {id}") } else { raw.title },
        manga_title: collapse_repeated_title(&raw.series_title),
        images: raw.images.iter().map(|url| collapse_duplicate_origin(url)).filter(|url| !url.is_empty()).collect(),
        navigation,
    }
}

pub fn normalize_cards(data: &Value, now: DateTime<Utc>) -> Vec<MangaCard> {
    list_items(data)
        .iter()
        .map(|item| decode::<RawCard>(item.clone()))
        .filter(|raw| !raw.title.is_empty() && !raw.id.is_empty())
        .map(|raw| MangaCard {
            source: SourceTag::International,
            title: raw.title,
            url: manga_path(SourceTag::International, &raw.id),
            image_url: fix_image_url(&raw.cover),
            latest_chapter: raw.chapter,
            updated_at: parse_relative(&raw.updated, now),
            updated: raw.updated,
        })
        .collect()
}

/// Adapter over the International endpoints.
pub struct InternationalAdapter {
    api: ApiClient,
}

impl InternationalAdapter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Resolve a human slug to a series id through search.
    async fn search_id(&self, slug: &str) -> Lookup<String> {
        let query = slug.replace(['-', '_'], " ");
        let doc = self.api.fetch_json(&search_request(&query)).await;
        if doc.is_unreachable() {
            return Lookup::Unreachable;
        }
        match resolve_series_id(&doc.data, slug) {
            Some(id) if doc.success => Lookup::Found(id),
            _ => Lookup::Missing,
        }
    }
}

#[async_trait]
impl SourceAdapter for InternationalAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::International
    }

    async fn manga_detail(&self, id: &str) -> Lookup<MangaDetail> {
        let series_id = if is_ulid(id) {
            id.to_string()
        } else {
            match self.search_id(id).await {
                Lookup::Found(series_id) => series_id,
                Lookup::Missing => return Lookup::Missing,
                Lookup::Unreachable => return Lookup::Unreachable,
            }
        };
        let doc = self.api.fetch_json(&detail_request(&series_id)).await;
        lookup(doc, |data| normalize_detail(data, &series_id), MangaDetail::is_usable)
    }

    async fn chapter(&self, id: &str) -> Lookup<ChapterContent> {
        let doc = self.api.fetch_json(&chapter_request(id)).await;
        lookup(doc, |data| normalize_chapter(data, id), ChapterContent::is_usable)
    }

    async fn latest(&self, now: DateTime<Utc>) -> Vec<MangaCard> {
        let doc = self.api.fetch_json(&latest_request()).await;
        if !doc.success {
            tracing::warn!("international latest unavailable: {}", doc.message.unwrap_or_default());
            return Vec::new();
        }
        normalize_cards(&doc.data, now)
    }
}
