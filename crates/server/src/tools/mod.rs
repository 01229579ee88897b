//! MCP tool implementations.
//!
//! This module contains all tools exposed by the komik server. Each tool
//! returns its canonical record as pretty-printed JSON text content.

pub mod doujin;
pub mod home;
pub mod listing;
pub mod manga;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use komik_core::{Error, SourceTag};

pub use doujin::{DoujinLatestParams, DoujinSlugParams};
pub use home::HomeParams;
pub use listing::{PopularParams, SearchParams};
pub use manga::{ChapterParams, MangaDetailParams};

/// Serialize `output` into a successful tool result.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Parse an optional `source` parameter.
pub(crate) fn parse_source(source: Option<&str>) -> Result<Option<SourceTag>, Error> {
    match source.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(Error::InvalidInput),
    }
}

fn default_page() -> u32 {
    1
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(parse_source(None).unwrap(), None);
        assert_eq!(parse_source(Some("  ")).unwrap(), None);
        assert_eq!(parse_source(Some("Asia")).unwrap(), Some(SourceTag::Asia));
        assert_eq!(parse_source(Some("intl")).unwrap(), Some(SourceTag::International));
        assert!(matches!(parse_source(Some("mangadex")), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_json_result_is_pretty_text() {
        let result = json_result(&serde_json::json!({"title": "One Piece"})).unwrap();
        let text = test_support::text(&result);
        assert!(text.contains("\"title\": \"One Piece\""));
        assert!(!result.is_error.unwrap_or(false));
    }
}
