//! Komiku: the Indonesian source, scraped from komiku.id by the mirrors.
//!
//! Detail and chapter endpoints answer with a bare record; listings use the
//! `{success, data}` envelope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use komik_core::{ChapterContent, ChapterLink, ChapterNavigation, Genre, MangaCard, MangaDetail, NavLink, SourceTag};

use super::{Lookup, RawRecord, SourceAdapter, de, decode, list_items, lookup};
use crate::fetch::{ApiClient, ApiRequest};
use crate::links::{last_segment, local_chapter_path, local_manga_path};
use crate::relative_time::parse_relative;
use crate::repair::{chapter_number, collapse_duplicate_origin, collapse_repeated_title, fix_image_url};

pub fn detail_request(site: &str, slug: &str) -> ApiRequest {
    ApiRequest::get("/api/manga").query("url", format!("{}/manga/{}/", site.trim_end_matches('/'), slug))
}

pub fn chapter_request(site: &str, path: &str) -> ApiRequest {
    ApiRequest::get("/api/chapter").query("url", format!("{}/{}/", site.trim_end_matches('/'), path.trim_matches('/')))
}

pub fn recommendations_request() -> ApiRequest {
    ApiRequest::get("/api/recommendations")
}

pub fn genres_request() -> ApiRequest {
    ApiRequest::get("/api/genres")
}

pub fn latest_request(category: Option<&str>, page: u32) -> ApiRequest {
    let request = ApiRequest::get("/api/last-update");
    let request = match category {
        Some(category) => request.query("category", category),
        None => request,
    };
    request.query("page", page)
}

pub fn popular_request(category: &str, page: u32) -> ApiRequest {
    ApiRequest::get("/api/popular").query("category", category).query("page", page)
}

pub fn search_request(query: &str) -> ApiRequest {
    ApiRequest::get("/api/search").query("query", query)
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
    author: String,
    #[serde(default, deserialize_with = "de::text")]
    status: String,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    manga_type: String,
    #[serde(default, deserialize_with = "de::text")]
    cover_image: String,
    #[serde(default, deserialize_with = "de::names")]
    genres: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    chapters: Vec<RawChapterLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChapterLink {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
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
    manga_title: String,
    #[serde(default, deserialize_with = "de::urls")]
    images: Vec<String>,
    #[serde(default, deserialize_with = "de::record")]
    navigation: RawNavigation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNavigation {
    #[serde(default, deserialize_with = "de::optional")]
    prev: Option<RawNavLink>,
    #[serde(default, deserialize_with = "de::optional")]
    next: Option<RawNavLink>,
    #[serde(default, deserialize_with = "de::text")]
    chapter_list: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawNavLink {
    #[serde(default, deserialize_with = "de::text")]
    url: String,
    #[serde(default, deserialize_with = "de::text")]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    url: String,
    #[serde(default, deserialize_with = "de::text")]
    image_url: String,
    #[serde(default, deserialize_with = "de::text")]
    latest_chapter: String,
    #[serde(default, deserialize_with = "de::text")]
    update_time: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawGenre {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    url: String,
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
}

impl RawRecord for RawDetail {
    const ALIASES: &'static [&'static [&'static str]] =
        &[&["coverImage", "cover", "thumbnail"], &["chapters", "chapterList"]];
}

impl RawRecord for RawChapterLink {
    const ALIASES: &'static [&'static [&'static str]] = &[&["url", "link"], &["date", "releaseDate", "released"]];
}

impl RawRecord for RawChapter {}

impl RawRecord for RawNavigation {}

impl RawRecord for RawNavLink {}

impl RawRecord for RawCard {
    const ALIASES: &'static [&'static [&'static str]] = &[
        &["url", "link"],
        &["imageUrl", "image", "thumbnail", "cover"],
        &["latestChapter", "chapter", "lastChapter"],
        &["updateTime", "updated", "time", "lastUpdate"],
    ];
}

impl RawRecord for RawGenre {
    const ALIASES: &'static [&'static [&'static str]] = &[&["title", "name"], &["url", "link"]];
}

pub fn normalize_detail(data: Value, slug: &str) -> MangaDetail {
    let raw: RawDetail = decode(data);
    MangaDetail {
        source: SourceTag::Komiku,
        slug: slug.to_string(),
        title: collapse_repeated_title(&raw.title),
        alternative_title: raw.alternative_title,
        description: raw.description,
        cover_image: fix_image_url(&raw.cover_image),
        author: raw.author,
        status: raw.status,
        manga_type: raw.manga_type,
        genres: raw.genres,
        chapters: raw
            .chapters
            .into_iter()
            .filter(|ch| !ch.url.is_empty())
            .map(|ch| ChapterLink {
                number: chapter_number(&ch.url).or_else(|| chapter_number(&ch.title)).unwrap_or_default(),
                url: local_chapter_path(&ch.url, SourceTag::Komiku),
                title: ch.title,
                released: ch.date,
            })
            .collect(),
    }
}

/// Normalize a chapter; `path` is the Komiku chapter path it was requested under.
pub fn normalize_chapter(data: Value, path: &str) -> ChapterContent {
    let raw: RawChapter = decode(data);
    let nav = raw.navigation;

    let link = |raw: &RawNavLink| NavLink { url: local_chapter_path(&raw.url, SourceTag::Komiku), title: raw.title.clone() };
    let number = |raw: &Option<RawNavLink>| raw.as_ref().and_then(|l| chapter_number(&l.url)).unwrap_or_default();

    let navigation = ChapterNavigation {
        prev: nav.prev.as_ref().filter(|l| !l.url.is_empty()).map(link),
        next: nav.next.as_ref().filter(|l| !l.url.is_empty()).map(link),
        current_chapter: chapter_number(path).unwrap_or_default(),
        prev_chapter: number(&nav.prev),
        next_chapter: number(&nav.next),
        manga_detail_url: if nav.chapter_list.is_empty() {
            String::new()
        } else {
            local_manga_path(&nav.chapter_list, SourceTag::Komiku)
        },
    };

    ChapterContent {
        source: SourceTag::Komiku,
        title: raw.title,
        manga_title: collapse_repeated_title(&raw.manga_title),
        images: raw.images.iter().map(|url| collapse_duplicate_origin(url)).filter(|url| !url.is_empty()).collect(),
        navigation,
    }
}

/// Listing cards (recommendations, popular, latest, search).
pub fn normalize_cards(data: &Value, now: DateTime<Utc>) -> Vec<MangaCard> {
    list_items(data)
        .iter()
        .map(|item| decode::<RawCard>(item.clone()))
        .filter(|raw| !raw.title.is_empty())
        .map(|raw| MangaCard {
            source: SourceTag::Komiku,
            title: collapse_repeated_title(&raw.title),
            url: local_manga_path(&raw.url, SourceTag::Komiku),
            image_url: fix_image_url(&raw.image_url),
            latest_chapter: raw.latest_chapter,
            updated_at: parse_relative(&raw.update_time, now),
            updated: raw.update_time,
        })
        .collect()
}

pub fn normalize_genres(data: &Value) -> Vec<Genre> {
    list_items(data)
        .iter()
        .map(|item| decode::<RawGenre>(item.clone()))
        .filter(|raw| !raw.title.is_empty())
        .map(|raw| {
            let slug = if raw.slug.is_empty() { last_segment(&raw.url) } else { raw.slug };
            Genre { name: raw.title, slug }
        })
        .collect()
}

/// Adapter over the Komiku endpoints.
pub struct KomikuAdapter {
    api: ApiClient,
    site: String,
}

impl KomikuAdapter {
    pub fn new(api: ApiClient, site: impl Into<String>) -> Self {
        Self { api, site: site.into() }
    }
}

#[async_trait]
impl SourceAdapter for KomikuAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Komiku
    }

    async fn manga_detail(&self, id: &str) -> Lookup<MangaDetail> {
        let doc = self.api.fetch_json(&detail_request(&self.site, id)).await;
        lookup(doc, |data| normalize_detail(data, id), MangaDetail::is_usable)
    }

    async fn chapter(&self, id: &str) -> Lookup<ChapterContent> {
        let doc = self.api.fetch_json(&chapter_request(&self.site, id)).await;
        lookup(doc, |data| normalize_chapter(data, id), ChapterContent::is_usable)
    }

    async fn latest(&self, now: DateTime<Utc>) -> Vec<MangaCard> {
        let doc = self.api.fetch_json(&latest_request(None, 1)).await;
        if !doc.success {
            tracing::warn!("komiku latest unavailable: {}", doc.message.unwrap_or_default());
            return Vec::new();
        }
        normalize_cards(&doc.data, now)
    }
}
