//! doujin_latest, doujin_detail and doujin_chapter tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use komik_client::Catalog;

use super::{default_page, json_result};

/// Input parameters for doujin_latest tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoujinLatestParams {
    /// 1-based page number (default: 1).
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Input parameters for doujin_detail and doujin_chapter tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoujinSlugParams {
    /// The doujin (or doujin chapter) slug.
    pub slug: String,
}

pub async fn latest_impl(catalog: &Catalog, params: DoujinLatestParams) -> Result<CallToolResult, McpError> {
    let page = catalog.doujin_latest(params.page).await?;
    json_result(&page)
}

pub async fn detail_impl(catalog: &Catalog, params: DoujinSlugParams) -> Result<CallToolResult, McpError> {
    let detail = catalog.doujin_detail(&params.slug).await?;
    json_result(&detail)
}

pub async fn chapter_impl(catalog: &Catalog, params: DoujinSlugParams) -> Result<CallToolResult, McpError> {
    let chapter = catalog.doujin_chapter(&params.slug).await?;
    json_result(&chapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{DownTransport, FixedTransport, catalog, text};

    #[tokio::test]
    async fn test_latest_paginates() {
        let body = r#"{"success": true, "data": {"results": [{"title": "A", "slug": "a"}]}}"#;
        let result = latest_impl(&catalog(FixedTransport(body)), DoujinLatestParams { page: 88 }).await.unwrap();

        let page: serde_json::Value = serde_json::from_str(&text(&result)).unwrap();
        assert_eq!(page["pagination"]["prev"], 87);
        assert!(page["pagination"]["next"].is_null());
        assert_eq!(page["items"][0]["latest_chapter"], "-");
    }

    #[tokio::test]
    async fn test_detail_defaults() {
        let body = r#"{"success": true, "data": {"slug": "a"}}"#;
        let result = detail_impl(&catalog(FixedTransport(body)), DoujinSlugParams { slug: "a".into() }).await.unwrap();

        let detail: serde_json::Value = serde_json::from_str(&text(&result)).unwrap();
        assert_eq!(detail["title"], "Untitled");
        assert_eq!(detail["description"], "No description available.");
    }

    #[tokio::test]
    async fn test_chapter_unsuccessful_is_not_found() {
        let body = r#"{"success": false, "message": "not found"}"#;
        let err = chapter_impl(&catalog(FixedTransport(body)), DoujinSlugParams { slug: "a-1".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_latest_outage_is_upstream() {
        let err = latest_impl(&catalog(DownTransport), DoujinLatestParams { page: 1 }).await.unwrap_err();
        assert_eq!(err.code.0, -32008);
    }
}
