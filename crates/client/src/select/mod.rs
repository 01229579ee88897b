//! Source selection.
//!
//! Decides which adapter answers a manga or chapter lookup. Identifiers whose
//! shape names a source go straight to it; everything else tries the
//! fallback order (Komiku, Asia, International) until one returns a valid
//! record. An explicit source from the caller skips both.

pub mod heuristics;

use std::sync::Arc;

use komik_core::{ChapterContent, Error, MangaDetail, SourceTag};

use crate::sources::{Lookup, SourceAdapter};
use heuristics::{classify_chapter, classify_manga, is_valid_identifier};

/// Why selection produced no record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// At least one source answered, none had a valid record.
    #[error("no source has {identifier} (tried {})", list(.tried))]
    NotFound { identifier: String, tried: Vec<SourceTag> },

    /// Every source tried was unreachable.
    #[error("every source was unreachable for {identifier} (tried {})", list(.tried))]
    Upstream { identifier: String, tried: Vec<SourceTag> },

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

fn list(tags: &[SourceTag]) -> String {
    tags.iter().map(SourceTag::as_str).collect::<Vec<_>>().join(", ")
}

impl From<SelectError> for Error {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::NotFound { identifier, .. } => Error::NotFound(identifier),
            SelectError::Upstream { .. } => Error::Upstream(err.to_string()),
            SelectError::InvalidIdentifier(id) => Error::InvalidInput(format!("invalid identifier: {id:?}")),
        }
    }
}

/// Routes lookups across the manga sources.
#[derive(Clone)]
pub struct SourceSelector {
    komiku: Arc<dyn SourceAdapter>,
    asia: Arc<dyn SourceAdapter>,
    international: Arc<dyn SourceAdapter>,
}

impl SourceSelector {
    pub fn new(komiku: Arc<dyn SourceAdapter>, asia: Arc<dyn SourceAdapter>, international: Arc<dyn SourceAdapter>) -> Self {
        Self { komiku, asia, international }
    }

    pub fn adapter(&self, tag: SourceTag) -> Option<&Arc<dyn SourceAdapter>> {
        match tag {
            SourceTag::Komiku => Some(&self.komiku),
            SourceTag::Asia => Some(&self.asia),
            SourceTag::International => Some(&self.international),
            SourceTag::Doujin => None,
        }
    }

    /// Find a manga by identifier, optionally pinned to one source.
    pub async fn manga_detail(&self, identifier: &str, source: Option<SourceTag>) -> Result<MangaDetail, SelectError> {
        let route = classify_manga(identifier);
        let (order, id) = self.plan(identifier, route.source, route.id, source)?;

        let mut tried = Vec::with_capacity(order.len());
        let mut unreachable = 0;
        for tag in order {
            let Some(adapter) = self.adapter(tag) else { continue };
            tried.push(tag);
            match adapter.manga_detail(id).await {
                Lookup::Found(detail) => {
                    tracing::debug!("{} served manga {}", tag, id);
                    return Ok(detail);
                }
                Lookup::Missing => tracing::warn!("{} has no manga {}, falling back", tag, id),
                Lookup::Unreachable => {
                    unreachable += 1;
                    tracing::warn!("{} unreachable for manga {}, falling back", tag, id);
                }
            }
        }

        Err(exhausted(identifier, tried, unreachable))
    }

    /// Find a chapter by path, optionally pinned to one source.
    pub async fn chapter(&self, path: &str, source: Option<SourceTag>) -> Result<ChapterContent, SelectError> {
        let route = classify_chapter(path);
        let (order, id) = self.plan(path, route.source, route.id, source)?;

        let mut tried = Vec::with_capacity(order.len());
        let mut unreachable = 0;
        for tag in order {
            let Some(adapter) = self.adapter(tag) else { continue };
            tried.push(tag);
            match adapter.chapter(id).await {
                Lookup::Found(chapter) => {
                    tracing::debug!("{} served chapter {}", tag, id);
                    return Ok(chapter);
                }
                Lookup::Missing => tracing::warn!("{} has no chapter {}, falling back", tag, id),
                Lookup::Unreachable => {
                    unreachable += 1;
                    tracing::warn!("{} unreachable for chapter {}, falling back", tag, id);
                }
            }
        }

        Err(exhausted(path, tried, unreachable))
    }

    /// Sources to try, in order, and the id to pass them.
    fn plan<'a>(
        &self, raw: &str, routed: Option<SourceTag>, routed_id: &'a str, explicit: Option<SourceTag>,
    ) -> Result<(Vec<SourceTag>, &'a str), SelectError> {
        if !is_valid_identifier(raw) || !is_valid_identifier(routed_id) {
            return Err(SelectError::InvalidIdentifier(raw.to_string()));
        }
        let order = match explicit.or(routed) {
            Some(SourceTag::Doujin) => return Err(SelectError::InvalidIdentifier(raw.to_string())),
            Some(tag) => vec![tag],
            None => SourceTag::FALLBACK_ORDER.to_vec(),
        };
        Ok((order, routed_id))
    }
}

fn exhausted(identifier: &str, tried: Vec<SourceTag>, unreachable: usize) -> SelectError {
    let identifier = identifier.to_string();
    if !tried.is_empty() && unreachable == tried.len() {
        SelectError::Upstream { identifier, tried }
    } else {
        SelectError::NotFound { identifier, tried }
    }
}
