//! Homepage aggregation.
//!
//! One homepage is five upstream calls (recommendations, genres and the three
//! latest feeds) issued together. The result lives in a single-slot cache;
//! a refresh bypasses the read but still overwrites the slot.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use komik_core::{Genre, HomeFeed, MangaCard, SlotCache};

use crate::fetch::ApiClient;
use crate::sources::{SourceAdapter, komiku};

pub struct HomeService {
    api: ApiClient,
    komiku: Arc<dyn SourceAdapter>,
    asia: Arc<dyn SourceAdapter>,
    international: Arc<dyn SourceAdapter>,
    cache: SlotCache<HomeFeed>,
    genre_limit: usize,
}

impl HomeService {
    pub fn new(
        api: ApiClient, komiku: Arc<dyn SourceAdapter>, asia: Arc<dyn SourceAdapter>, international: Arc<dyn SourceAdapter>,
        cache: SlotCache<HomeFeed>, genre_limit: usize,
    ) -> Self {
        Self { api, komiku, asia, international, cache, genre_limit }
    }

    /// The homepage, from cache unless `refresh` or the entry is stale.
    pub async fn home(&self, refresh: bool) -> HomeFeed {
        if !refresh && let Some(feed) = self.cache.get().await {
            return feed;
        }

        let (feed, complete) = self.aggregate().await;
        if complete {
            self.cache.put(feed.clone()).await;
        } else {
            tracing::warn!("homepage built without recommendations, not caching");
        }
        feed
    }

    async fn aggregate(&self) -> (HomeFeed, bool) {
        let now = self.cache.clock().now();
        let recommendations_request = komiku::recommendations_request();
        let genres_request = komiku::genres_request();

        let (recommendations, genres, komiku_latest, asia_latest, international_latest) = tokio::join!(
            self.api.fetch_json(&recommendations_request),
            self.api.fetch_json(&genres_request),
            self.komiku.latest(now),
            self.asia.latest(now),
            self.international.latest(now),
        );

        let complete = recommendations.success;
        let recommendations = if complete { komiku::normalize_cards(&recommendations.data, now) } else { Vec::new() };

        let mut genres: Vec<Genre> = if genres.success { komiku::normalize_genres(&genres.data) } else { Vec::new() };
        genres.truncate(self.genre_limit);

        let latest = merge_latest([komiku_latest, asia_latest, international_latest]);

        (HomeFeed { recommendations, genres, latest, generated_at: now }, complete)
    }
}

/// Merge per-source latest lists, newest first.
///
/// Entries without a parseable time go last; ties keep source order.
pub fn merge_latest<const N: usize>(lists: [Vec<MangaCard>; N]) -> Vec<MangaCard> {
    let mut merged: Vec<MangaCard> = lists.into_iter().flatten().collect();
    merged.sort_by_key(|card| std::cmp::Reverse(card.updated_at.unwrap_or(DateTime::<Utc>::MIN_UTC)));
    merged
}
