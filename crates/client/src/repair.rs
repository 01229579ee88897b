//! Repairs for known upstream data defects.
//!
//! Every function here is idempotent: applying it to its own output changes nothing.

use regex::Regex;
use std::sync::LazyLock;

use komik_core::models::PLACEHOLDER_IMAGE;

static CHAPTER_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)chapter[-_\s]*(\d+(?:[.-]\d+)?)").unwrap());

/// Collapse a base URL that was concatenated with itself.
///
/// `https://komiku.idhttps://komiku.id/manga/x/` becomes `https://komiku.id/manga/x/`.
/// Repeats until no bare origin is immediately followed by itself.
pub fn collapse_duplicate_origin(url: &str) -> String {
    let mut repaired = url.trim().to_string();
    while let Some((start, end)) = find_duplicate_origin(&repaired) {
        repaired.replace_range(start..end, "");
    }
    repaired
}

fn find_duplicate_origin(s: &str) -> Option<(usize, usize)> {
    let starts: Vec<usize> = s
        .match_indices("http")
        .map(|(i, _)| i)
        .filter(|&i| s[i..].starts_with("http://") || s[i..].starts_with("https://"))
        .collect();

    starts.windows(2).find_map(|pair| {
        let (start, end) = (pair[0], pair[1]);
        let origin = &s[start..end];
        (is_bare_origin(origin) && s[end..].starts_with(origin)).then_some((start, end))
    })
}

/// `scheme://host` with nothing after the host.
fn is_bare_origin(candidate: &str) -> bool {
    candidate
        .split_once("://")
        .map(|(_, host)| !host.is_empty() && !host.contains(['/', '?', '#']))
        .unwrap_or(false)
}

const MIN_GLUED_HALF: usize = 3;

/// Collapse a title repeated back-to-back (`One PieceOne Piece`).
///
/// Halves joined by whitespace are only collapsed when each half has more than
/// one word, so titles like `Doki Doki` survive. Unseparated halves need at
/// least three characters, so `AA` or `Lala` stay whole.
pub fn collapse_repeated_title(title: &str) -> String {
    let title = title.trim();
    for (i, _) in title.char_indices().skip(1) {
        let (head, tail) = title.split_at(i);
        let separated = tail.starts_with(char::is_whitespace);
        let head = head.trim_end();
        if head.is_empty() || head != tail.trim_start() {
            continue;
        }
        let collapse = if separated {
            head.contains(char::is_whitespace)
        } else {
            head.chars().count() >= MIN_GLUED_HALF
        };
        if collapse {
            return head.to_string();
        }
    }
    title.to_string()
}

/// Clean an image URL: blanks and `undefined` become the placeholder.
pub fn fix_image_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.contains("undefined") {
        return PLACEHOLDER_IMAGE.to_string();
    }
    collapse_duplicate_origin(url)
}

/// Chapter number embedded in a URL, slug or label (`one-piece-chapter-1100` → `1100`).
pub fn chapter_number(text: &str) -> Option<String> {
    CHAPTER_NUMBER.captures(text).map(|caps| caps[1].to_string())
}

/// Trimmed text, or `fallback` when blank.
pub fn text_or(text: &str, fallback: &str) -> String {
    let text = text.trim();
    if text.is_empty() { fallback.to_string() } else { text.to_string() }
}
