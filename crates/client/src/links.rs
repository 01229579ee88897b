//! Rewriting upstream links into the local routing scheme.
//!
//! | Source        | Manga                | Chapter              |
//! |---------------|----------------------|----------------------|
//! | Komiku        | `/manga/<slug>`      | `/chapter/<path>`    |
//! | Asia          | `/manga/asia/<slug>` | `/chapter/asia/<slug>` |
//! | International | `/manga/series/<id>` | `/chapter/intl/<id>` |
//! | Doujin        | `/doujin/<slug>`     | `/doujin/chapter/<slug>` |

use url::Url;

use komik_core::SourceTag;

use crate::repair::collapse_duplicate_origin;

/// Guess the source of an absolute upstream URL from its host.
pub fn sniff_source(url: &str) -> Option<SourceTag> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.");

    if host == "komiku.id" || host.ends_with(".komiku.id") {
        Some(SourceTag::Komiku)
    } else if host.starts_with("westmanga.") {
        Some(SourceTag::Asia)
    } else if host == "weebcentral.com" || host.ends_with(".weebcentral.com") {
        Some(SourceTag::International)
    } else if host.starts_with("komikdewasa.") {
        Some(SourceTag::Doujin)
    } else {
        None
    }
}

pub fn manga_path(source: SourceTag, id: &str) -> String {
    let id = id.trim_matches('/');
    match source {
        SourceTag::Komiku => format!("/manga/{id}"),
        SourceTag::Asia => format!("/manga/asia/{id}"),
        SourceTag::International => format!("/manga/series/{id}"),
        SourceTag::Doujin => format!("/doujin/{id}"),
    }
}

pub fn chapter_path(source: SourceTag, id: &str) -> String {
    let id = id.trim_matches('/');
    match source {
        SourceTag::Komiku => format!("/chapter/{id}"),
        SourceTag::Asia => format!("/chapter/asia/{id}"),
        SourceTag::International => format!("/chapter/intl/{id}"),
        SourceTag::Doujin => format!("/doujin/chapter/{id}"),
    }
}

/// Local manga path for an upstream manga URL; `fallback` applies to relative links.
pub fn local_manga_path(upstream: &str, fallback: SourceTag) -> String {
    let (source, segments) = split(upstream, fallback);
    let marker = match source {
        SourceTag::Komiku | SourceTag::Asia => after(&segments, "manga").or_else(|| after(&segments, "comic")),
        SourceTag::International => after(&segments, "series"),
        SourceTag::Doujin => after(&segments, "komik"),
    };
    let id = marker.or_else(|| segments.last().map(String::as_str)).unwrap_or_default();
    manga_path(source, id)
}

/// Local chapter path for an upstream chapter URL; `fallback` applies to relative links.
pub fn local_chapter_path(upstream: &str, fallback: SourceTag) -> String {
    let (source, segments) = split(upstream, fallback);
    let id = match source {
        // Komiku chapter paths are kept whole.
        SourceTag::Komiku => segments.join("/"),
        SourceTag::International => after(&segments, "chapters")
            .or_else(|| segments.last().map(String::as_str))
            .unwrap_or_default()
            .to_string(),
        SourceTag::Asia | SourceTag::Doujin => segments.last().cloned().unwrap_or_default(),
    };
    chapter_path(source, &id)
}

/// Last path segment of a URL or path.
pub fn last_segment(url: &str) -> String {
    let (_, segments) = split(url, SourceTag::Komiku);
    segments.last().cloned().unwrap_or_default()
}

fn split(upstream: &str, fallback: SourceTag) -> (SourceTag, Vec<String>) {
    let repaired = collapse_duplicate_origin(upstream);
    let (source, path) = match Url::parse(&repaired) {
        Ok(url) => (sniff_source(&repaired).unwrap_or(fallback), url.path().to_string()),
        Err(_) => (fallback, repaired.split(['?', '#']).next().unwrap_or_default().to_string()),
    };
    let segments = path.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect();
    (source, segments)
}

fn after<'a>(segments: &'a [String], marker: &str) -> Option<&'a str> {
    let index = segments.iter().position(|s| s == marker)?;
    segments.get(index + 1).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_source() {
        assert_eq!(sniff_source("https://komiku.id/manga/one-piece/"), Some(SourceTag::Komiku));
        assert_eq!(sniff_source("https://westmanga.me/manga/one-piece"), Some(SourceTag::Asia));
        assert_eq!(sniff_source("https://www.weebcentral.com/series/01J76XY7E4JCPK2M2Y4E9Y9NWA"), Some(SourceTag::International));
        assert_eq!(sniff_source("https://komikdewasa.id/komik/x/"), Some(SourceTag::Doujin));
        assert_eq!(sniff_source("https://example.com/"), None);
        assert_eq!(sniff_source("/manga/one-piece"), None);
    }

    #[test]
    fn test_komiku_links() {
        assert_eq!(local_manga_path("https://komiku.id/manga/one-piece/", SourceTag::Komiku), "/manga/one-piece");
        assert_eq!(
            local_manga_path("https://komiku.idhttps://komiku.id/manga/one-piece/", SourceTag::Komiku),
            "/manga/one-piece"
        );
        assert_eq!(local_manga_path("/manga/blue-lock/", SourceTag::Komiku), "/manga/blue-lock");
        assert_eq!(
            local_chapter_path("https://komiku.id/one-piece-chapter-1100/", SourceTag::Komiku),
            "/chapter/one-piece-chapter-1100"
        );
        assert_eq!(
            local_chapter_path("https://komiku.id/ch/one-piece-chapter-1100/", SourceTag::Komiku),
            "/chapter/ch/one-piece-chapter-1100"
        );
    }

    #[test]
    fn test_host_decides_over_fallback() {
        assert_eq!(
            local_chapter_path("https://westmanga.me/view/one-piece-chapter-1100-bahasa-indonesia", SourceTag::Komiku),
            "/chapter/asia/one-piece-chapter-1100-bahasa-indonesia"
        );
        assert_eq!(
            local_manga_path("https://weebcentral.com/series/01J76XY7E4JCPK2M2Y4E9Y9NWA/One-Piece", SourceTag::Komiku),
            "/manga/series/01J76XY7E4JCPK2M2Y4E9Y9NWA"
        );
        assert_eq!(
            local_chapter_path("https://weebcentral.com/chapters/01J76XZ0000000000000000000", SourceTag::Komiku),
            "/chapter/intl/01J76XZ0000000000000000000"
        );
    }

    #[test]
    fn test_direct_paths() {
        assert_eq!(manga_path(SourceTag::Asia, "solo-leveling"), "/manga/asia/solo-leveling");
        assert_eq!(chapter_path(SourceTag::International, "01J76XZ"), "/chapter/intl/01J76XZ");
        assert_eq!(manga_path(SourceTag::Doujin, "/abc/"), "/doujin/abc");
        assert_eq!(chapter_path(SourceTag::Doujin, "abc-chapter-1"), "/doujin/chapter/abc-chapter-1");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("https://komiku.id/genre/action/"), "action");
        assert_eq!(last_segment("/genre/romance"), "romance");
        assert_eq!(last_segment(""), "");
    }
}
