//! Pure predicates that route an identifier straight to a source.

use komik_core::SourceTag;

/// Crockford base32 ULID: 26 chars, no I, L, O or U.
pub fn is_ulid(s: &str) -> bool {
    s.len() == 26
        && s.chars().all(|c| c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'L' | 'O' | 'U')))
}

/// A routed identifier: the source it points at (if conclusive) and the id that source expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<'a> {
    pub source: Option<SourceTag>,
    pub id: &'a str,
}

/// Classify a manga identifier (`asia/<slug>`, `series/<id>`, `<ulid>`, `komiku/<slug>`, `<slug>`).
pub fn classify_manga(identifier: &str) -> Route<'_> {
    let id = identifier.trim().trim_matches('/');
    let id = id.strip_prefix("manga/").unwrap_or(id);

    if let Some(slug) = id.strip_prefix("asia/") {
        return Route { source: Some(SourceTag::Asia), id: slug };
    }
    if let Some(rest) = id.strip_prefix("series/") {
        let series = rest.split('/').next().unwrap_or(rest);
        return Route { source: Some(SourceTag::International), id: series };
    }
    if let Some(slug) = id.strip_prefix("komiku/") {
        return Route { source: Some(SourceTag::Komiku), id: slug };
    }
    if is_ulid(id) {
        return Route { source: Some(SourceTag::International), id };
    }
    Route { source: None, id }
}

/// Classify a chapter path (`asia/…`, `…bahasa-indonesia`, `view/…`, `intl/…`, `<ulid>`, `ch/…`).
pub fn classify_chapter(path: &str) -> Route<'_> {
    let id = path.trim().trim_matches('/');
    let id = id.strip_prefix("chapter/").unwrap_or(id);

    if let Some(slug) = id.strip_prefix("asia/") {
        return Route { source: Some(SourceTag::Asia), id: slug };
    }
    if let Some(slug) = id.strip_prefix("view/") {
        return Route { source: Some(SourceTag::Asia), id: slug };
    }
    if let Some(chapter) = id.strip_prefix("intl/") {
        return Route { source: Some(SourceTag::International), id: chapter };
    }
    if is_ulid(id) {
        return Route { source: Some(SourceTag::International), id };
    }
    if id.contains("bahasa-indonesia") {
        return Route { source: Some(SourceTag::Asia), id };
    }
    if id.starts_with("ch/") {
        return Route { source: Some(SourceTag::Komiku), id };
    }
    Route { source: None, id }
}

/// Whether an identifier is safe to put in an upstream path.
pub fn is_valid_identifier(id: &str) -> bool {
    let id = id.trim();
    !id.is_empty() && !id.split('/').any(|segment| segment == "..") && !id.contains(['?', '#', '\\'])
}
