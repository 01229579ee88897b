//! The facade the server talks to: one handle for every page type.

use std::sync::Arc;

use komik_core::{
    AppConfig, ChapterContent, Clock, DoujinChapter, DoujinDetail, DoujinPage, Error, HomeFeed, MangaCard,
    MangaDetail, SlotCache, SourceTag, SystemClock,
};

use crate::fetch::{ApiClient, ApiDocument, Transport};
use crate::home::HomeService;
use crate::select::SourceSelector;
use crate::select::heuristics::is_valid_identifier;
use crate::sources::{AsiaAdapter, InternationalAdapter, KomikuAdapter, SourceAdapter, doujin, komiku};

/// Categories the popular listing accepts.
pub const POPULAR_CATEGORIES: [&str; 3] = ["manga", "manhwa", "manhua"];

const MAX_QUERY_LEN: usize = 100;

pub struct Catalog {
    api: ApiClient,
    selector: SourceSelector,
    home: HomeService,
    clock: Arc<dyn Clock>,
    doujin_site: String,
    doujin_total_pages: u32,
}

impl Catalog {
    /// Build the catalog over the reqwest transport and the system clock.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let api = ApiClient::from_config(config)?;
        Ok(Self::assemble(config, api, Arc::new(SystemClock)))
    }

    /// Build the catalog over any transport and clock.
    pub fn with_transport(config: &AppConfig, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        Self::assemble(config, ApiClient::with_transport(config, transport), clock)
    }

    fn assemble(config: &AppConfig, api: ApiClient, clock: Arc<dyn Clock>) -> Self {
        let komiku: Arc<dyn SourceAdapter> = Arc::new(KomikuAdapter::new(api.clone(), config.komiku_site.clone()));
        let asia: Arc<dyn SourceAdapter> = Arc::new(AsiaAdapter::new(api.clone()));
        let international: Arc<dyn SourceAdapter> = Arc::new(InternationalAdapter::new(api.clone()));

        let selector = SourceSelector::new(komiku.clone(), asia.clone(), international.clone());
        let cache = SlotCache::new(config.home_cache_ttl(), clock.clone());
        let home = HomeService::new(api.clone(), komiku, asia, international, cache, config.home_genre_limit);

        Self {
            api,
            selector,
            home,
            clock,
            doujin_site: config.doujin_site.clone(),
            doujin_total_pages: config.doujin_total_pages,
        }
    }

    pub async fn home(&self, refresh: bool) -> HomeFeed {
        self.home.home(refresh).await
    }

    pub async fn manga_detail(&self, identifier: &str, source: Option<SourceTag>) -> Result<MangaDetail, Error> {
        Ok(self.selector.manga_detail(identifier, source).await?)
    }

    pub async fn chapter(&self, path: &str, source: Option<SourceTag>) -> Result<ChapterContent, Error> {
        Ok(self.selector.chapter(path, source).await?)
    }

    /// Komiku search. An empty result is not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<MangaCard>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".to_string()));
        }
        if query.chars().count() > MAX_QUERY_LEN {
            return Err(Error::InvalidInput(format!("query exceeds {MAX_QUERY_LEN} characters")));
        }

        let doc = self.api.fetch_json(&komiku::search_request(query)).await;
        self.cards(doc, "search")
    }

    /// Popular titles for one category and page.
    pub async fn popular(&self, category: &str, page: u32) -> Result<Vec<MangaCard>, Error> {
        let category = category.trim().to_lowercase();
        if !POPULAR_CATEGORIES.contains(&category.as_str()) {
            return Err(Error::InvalidInput(format!(
                "category must be one of {}, got {:?}",
                POPULAR_CATEGORIES.join(", "),
                category
            )));
        }
        if page == 0 {
            return Err(Error::InvalidInput("page must be at least 1".to_string()));
        }

        let doc = self.api.fetch_json(&komiku::popular_request(&category, page)).await;
        self.cards(doc, "popular")
    }

    pub async fn doujin_latest(&self, page: u32) -> Result<DoujinPage, Error> {
        if page == 0 || page > self.doujin_total_pages {
            return Err(Error::InvalidInput(format!("page must be between 1 and {}", self.doujin_total_pages)));
        }

        let doc = self.api.fetch_json(&doujin::latest_request(page)).await;
        if !doc.success {
            return Err(Error::Upstream(doc.message.unwrap_or_else(|| "doujin list unavailable".to_string())));
        }
        Ok(doujin::normalize_page(&doc.data, page, self.doujin_total_pages))
    }

    pub async fn doujin_detail(&self, slug: &str) -> Result<DoujinDetail, Error> {
        let slug = doujin_slug(slug)?;
        let doc = self.api.fetch_json(&doujin::detail_request(&self.doujin_site, slug)).await;
        let data = doujin_data(doc, slug)?;
        Ok(doujin::normalize_detail(data, slug))
    }

    pub async fn doujin_chapter(&self, slug: &str) -> Result<DoujinChapter, Error> {
        let slug = doujin_slug(slug)?;
        let doc = self.api.fetch_json(&doujin::chapter_request(&self.doujin_site, slug)).await;
        let data = doujin_data(doc, slug)?;
        Ok(doujin::normalize_chapter(data, slug))
    }

    fn cards(&self, doc: ApiDocument, what: &str) -> Result<Vec<MangaCard>, Error> {
        if doc.is_unreachable() {
            return Err(Error::Upstream(doc.message.unwrap_or_default()));
        }
        if !doc.success {
            tracing::warn!("{} returned no results: {}", what, doc.message.unwrap_or_default());
            return Ok(Vec::new());
        }
        Ok(komiku::normalize_cards(&doc.data, self.clock.now()))
    }
}

fn doujin_data(doc: ApiDocument, slug: &str) -> Result<serde_json::Value, Error> {
    if doc.is_unreachable() {
        return Err(Error::Upstream(doc.message.unwrap_or_default()));
    }
    if !doc.success || doc.data.is_null() || doc.data.as_array().is_some_and(Vec::is_empty) {
        return Err(Error::NotFound(slug.to_string()));
    }
    Ok(doc.data)
}

fn doujin_slug(slug: &str) -> Result<&str, Error> {
    let slug = slug.trim().trim_matches('/');
    if !is_valid_identifier(slug) || slug.contains('/') {
        return Err(Error::InvalidInput(format!("invalid doujin slug: {slug:?}")));
    }
    Ok(slug)
}
