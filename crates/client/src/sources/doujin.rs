//! Doujin: the adult catalogue (komikdewasa), outside the manga fallback chain.

use serde::Deserialize;
use serde_json::Value;

use komik_core::models::{
    DoujinChapter, DoujinChapterLink, DoujinChapterNavigation, DoujinDetail, DoujinEntry, DoujinPage, PageImage,
    Pagination,
};
use komik_core::SourceTag;

use super::{RawRecord, de, decode, list_items};
use crate::fetch::ApiRequest;
use crate::links::{chapter_path, manga_path};
use crate::repair::{fix_image_url, text_or};

pub fn latest_request(page: u32) -> ApiRequest {
    ApiRequest::get("/api/doujin/last-update").query("page", page)
}

pub fn detail_request(site: &str, slug: &str) -> ApiRequest {
    ApiRequest::get("/api/doujin/detail").query("url", format!("{}/komik/{}/", site.trim_end_matches('/'), slug))
}

pub fn chapter_request(site: &str, slug: &str) -> ApiRequest {
    ApiRequest::get("/api/doujin/chapter").query("url", format!("{}/baca/{}/", site.trim_end_matches('/'), slug))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
    #[serde(default, deserialize_with = "de::text")]
    image_url: String,
    #[serde(default, deserialize_with = "de::names")]
    genres: Vec<String>,
    #[serde(default, deserialize_with = "de::list")]
    chapters: Vec<RawChapterLink>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChapterLink {
    #[serde(default, deserialize_with = "de::text")]
    number: String,
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
    #[serde(default, deserialize_with = "de::text")]
    url: String,
}

impl From<RawChapterLink> for DoujinChapterLink {
    fn from(raw: RawChapterLink) -> Self {
        Self { number: raw.number, title: raw.title, slug: raw.slug, url: raw.url }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageMeta {
    #[serde(default, deserialize_with = "de::number")]
    page: u32,
    #[serde(default, deserialize_with = "de::number")]
    total_results: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
    #[serde(default, deserialize_with = "de::text")]
    cover: String,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    doujin_type: String,
    #[serde(default, deserialize_with = "de::text")]
    status: String,
    #[serde(default, deserialize_with = "de::text")]
    author: String,
    #[serde(default, deserialize_with = "de::text")]
    last_update: String,
    #[serde(default, deserialize_with = "de::names")]
    genres: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    description: String,
    #[serde(default, deserialize_with = "de::text")]
    url: String,
    #[serde(default, deserialize_with = "de::number")]
    total_chapters: u32,
    #[serde(default, deserialize_with = "de::list")]
    chapters: Vec<RawChapterLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChapter {
    #[serde(default, deserialize_with = "de::text")]
    manga_title: String,
    #[serde(default, deserialize_with = "de::text")]
    manga_slug: String,
    #[serde(default, deserialize_with = "de::text")]
    chapter_number: String,
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
    #[serde(default, deserialize_with = "de::number")]
    total_images: u32,
    #[serde(default, deserialize_with = "de::list")]
    images: Vec<RawImage>,
    #[serde(default, deserialize_with = "de::optional")]
    prev_chapter: Option<RawSlug>,
    #[serde(default, deserialize_with = "de::optional")]
    next_chapter: Option<RawSlug>,
}

#[derive(Debug, Default, Deserialize)]
struct RawImage {
    #[serde(default, deserialize_with = "de::number")]
    page: u32,
    #[serde(default, deserialize_with = "de::text")]
    url: String,
    #[serde(default, deserialize_with = "de::text")]
    alt: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawSlug {
    #[serde(default, deserialize_with = "de::text")]
    slug: String,
}

impl RawRecord for RawEntry {}

impl RawRecord for RawChapterLink {}

impl RawRecord for RawPageMeta {}

impl RawRecord for RawDetail {}

impl RawRecord for RawChapter {}

impl RawRecord for RawImage {}

impl RawRecord for RawSlug {}

/// Normalize a listing page. `total_pages` is fixed by configuration.
pub fn normalize_page(data: &Value, requested_page: u32, total_pages: u32) -> DoujinPage {
    let items: Vec<DoujinEntry> = list_items(data)
        .iter()
        .filter(|item| item.is_object())
        .map(|item| decode::<RawEntry>(item.clone()))
        .map(|raw| {
            let chapters: Vec<DoujinChapterLink> = raw.chapters.into_iter().map(DoujinChapterLink::from).collect();
            let defaults = DoujinEntry::default();
            DoujinEntry {
                title: text_or(&raw.title, &defaults.title),
                slug: raw.slug,
                image_url: if raw.image_url.trim().is_empty() { defaults.image_url } else { fix_image_url(&raw.image_url) },
                genres: raw.genres,
                latest_chapter: chapters.first().map(|ch| ch.title.clone()).unwrap_or(defaults.latest_chapter),
                chapters,
            }
        })
        .collect();

    let meta: RawPageMeta = decode(data.clone());
    let page = if meta.page > 0 { meta.page } else { requested_page };
    let total_items = if meta.total_results > 0 { meta.total_results } else { items.len() as u32 };

    // prev/next follow the requested page, not whatever page the upstream echoes.
    let mut pagination = Pagination::new(requested_page, total_pages, total_items);
    pagination.page = page;

    DoujinPage { items, pagination }
}

pub fn normalize_detail(data: Value, slug: &str) -> DoujinDetail {
    let raw: RawDetail = decode(data);
    let defaults = DoujinDetail::default();
    DoujinDetail {
        title: text_or(&raw.title, &defaults.title),
        slug: text_or(&raw.slug, slug),
        cover: if raw.cover.trim().is_empty() { defaults.cover } else { fix_image_url(&raw.cover) },
        doujin_type: text_or(&raw.doujin_type, &defaults.doujin_type),
        status: text_or(&raw.status, &defaults.status),
        author: text_or(&raw.author, &defaults.author),
        last_update: text_or(&raw.last_update, &defaults.last_update),
        genres: raw.genres,
        description: text_or(&raw.description, &defaults.description),
        url: raw.url,
        total_chapters: raw.total_chapters,
        chapters: raw.chapters.into_iter().map(DoujinChapterLink::from).collect(),
    }
}

pub fn normalize_chapter(data: Value, slug: &str) -> DoujinChapter {
    let raw: RawChapter = decode(data);
    let defaults = DoujinChapter::default();

    let images: Vec<PageImage> = raw
        .images
        .into_iter()
        .filter(|img| !img.url.is_empty())
        .enumerate()
        .map(|(i, img)| {
            let page = if img.page > 0 { img.page } else { i as u32 + 1 };
            PageImage { alt: if img.alt.is_empty() { format!("Page {page}") } else { img.alt }, page, url: img.url }
        })
        .collect();

    let neighbour = |link: Option<RawSlug>| {
        link.filter(|l| !l.slug.is_empty()).map(|l| chapter_path(SourceTag::Doujin, &l.slug))
    };

    DoujinChapter {
        manga_title: text_or(&raw.manga_title, &defaults.manga_title),
        chapter_number: text_or(&raw.chapter_number, &defaults.chapter_number),
        chapter_slug: text_or(&raw.slug, slug),
        total_images: if raw.total_images > 0 { raw.total_images } else { images.len() as u32 },
        images,
        navigation: DoujinChapterNavigation {
            prev: neighbour(raw.prev_chapter),
            next: neighbour(raw.next_chapter),
            manga_url: (!raw.manga_slug.is_empty()).then(|| manga_path(SourceTag::Doujin, &raw.manga_slug)),
        },
        manga_slug: raw.manga_slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use komik_core::models::PLACEHOLDER_IMAGE;
    use serde_json::json;

    #[test]
    fn test_requests() {
        assert_eq!(latest_request(3).path_and_query(), "/api/doujin/last-update?page=3");
        assert_eq!(
            detail_request("https://komikdewasa.id", "abc").path_and_query(),
            "/api/doujin/detail?url=https%3A%2F%2Fkomikdewasa.id%2Fkomik%2Fabc%2F"
        );
        assert_eq!(
            chapter_request("https://komikdewasa.id/", "abc-chapter-1").path_and_query(),
            "/api/doujin/chapter?url=https%3A%2F%2Fkomikdewasa.id%2Fbaca%2Fabc-chapter-1%2F"
        );
    }

    #[test]
    fn test_normalize_page_defaults_and_pagination() {
        let data = json!({
            "page": 2,
            "totalResults": 40,
            "results": [
                {"title": "Judul", "slug": "judul", "imageUrl": "https://img/x.jpg", "genres": ["Romance"],
                 "chapters": [{"title": "Chapter 5", "slug": "judul-chapter-5"}]},
                {"slug": "kosong"}
            ]
        });

        let page = normalize_page(&data, 2, 88);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].latest_chapter, "Chapter 5");
        assert_eq!(page.items[1].title, "Untitled");
        assert_eq!(page.items[1].image_url, PLACEHOLDER_IMAGE);
        assert_eq!(page.items[1].latest_chapter, "-");
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.total_items, 40);
        assert_eq!(page.pagination.total_pages, 88);
        assert_eq!(page.pagination.prev, Some(1));
        assert_eq!(page.pagination.next, Some(3));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = normalize_page(&json!({"results": []}), 88, 88);
        assert_eq!(page.pagination.next, None);
        assert_eq!(page.pagination.prev, Some(87));
        assert_eq!(page.pagination.total_items, 0);
    }

    #[test]
    fn test_normalize_detail_defaults() {
        let detail = normalize_detail(json!({"genres": ["Drama"], "chapters": [{"number": 1, "slug": "abc-chapter-1"}]}), "abc");
        assert_eq!(detail.title, "Untitled");
        assert_eq!(detail.slug, "abc");
        assert_eq!(detail.cover, PLACEHOLDER_IMAGE);
        assert_eq!(detail.author, "Unknown");
        assert_eq!(detail.last_update, "-");
        assert_eq!(detail.description, "No description available.");
        assert_eq!(detail.chapters[0].number, "1");
    }

    #[test]
    fn test_normalize_chapter() {
        let data = json!({
            "mangaTitle": "Judul",
            "mangaSlug": "judul",
            "chapterNumber": "Chapter 2",
            "images": [{"page": 1, "url": "https://img/1.jpg"}, {"page": 2, "url": "https://img/2.jpg", "alt": "Halaman 2"}],
            "prevChapter": {"slug": "judul-chapter-1"},
            "nextChapter": null
        });

        let chapter = normalize_chapter(data, "judul-chapter-2");

        assert_eq!(chapter.chapter_slug, "judul-chapter-2");
        assert_eq!(chapter.total_images, 2);
        assert_eq!(chapter.images[0].alt, "Page 1");
        assert_eq!(chapter.images[1].alt, "Halaman 2");
        assert_eq!(chapter.navigation.prev.as_deref(), Some("/doujin/chapter/judul-chapter-1"));
        assert_eq!(chapter.navigation.next, None);
        assert_eq!(chapter.navigation.manga_url.as_deref(), Some("/doujin/judul"));
    }

    #[test]
    fn test_normalize_page_tolerates_messy_items() {
        let data = json!({
            "page": "3",
            "totalResults": "not a number",
            "results": [
                null,
                "judul",
                {"title": 7, "slug": "tujuh", "genres": {"x": 1}, "chapters": [null, {"title": "Chapter 9", "slug": "tujuh-chapter-9"}]}
            ]
        });

        let page = normalize_page(&data, 3, 88);

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "7");
        assert!(page.items[0].genres.is_empty());
        assert_eq!(page.items[0].chapters.len(), 1);
        assert_eq!(page.items[0].latest_chapter, "Chapter 9");
        assert_eq!(page.pagination.page, 3);
        assert_eq!(page.pagination.total_items, 1);
    }

    #[test]
    fn test_normalize_detail_tolerates_messy_fields() {
        let data = json!({
            "title": "Judul",
            "totalChapters": "12",
            "author": {"name": "Anon"},
            "chapters": ["judul-chapter-1", null, {"number": 2, "slug": "judul-chapter-2"}]
        });

        let detail = normalize_detail(data, "judul");

        assert_eq!(detail.title, "Judul");
        assert_eq!(detail.total_chapters, 12);
        assert_eq!(detail.author, "Unknown");
        assert_eq!(detail.chapters.len(), 1);
        assert_eq!(detail.chapters[0].slug, "judul-chapter-2");
    }

    #[test]
    fn test_normalize_chapter_tolerates_messy_fields() {
        let data = json!({
            "mangaSlug": "judul",
            "totalImages": "x",
            "images": [null, {"url": "https://img/1.jpg"}, {"page": "2", "url": "https://img/2.jpg"}, {"page": 3}],
            "prevChapter": "judul-chapter-1",
            "nextChapter": {"slug": "judul-chapter-3"}
        });

        let chapter = normalize_chapter(data, "judul-chapter-2");

        assert_eq!(chapter.images.len(), 2);
        assert_eq!(chapter.images[0].page, 1);
        assert_eq!(chapter.images[0].alt, "Page 1");
        assert_eq!(chapter.images[1].page, 2);
        assert_eq!(chapter.total_images, 2);
        assert_eq!(chapter.navigation.prev, None);
        assert_eq!(chapter.navigation.next.as_deref(), Some("/doujin/chapter/judul-chapter-3"));
    }

    #[test]
    fn test_empty_chapter_defaults() {
        let chapter = normalize_chapter(json!({}), "x");
        assert_eq!(chapter.manga_title, "Doujin");
        assert_eq!(chapter.chapter_number, "Chapter");
        assert_eq!(chapter.navigation.manga_url, None);
    }
}
