//! search and popular tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use komik_client::Catalog;

use super::{default_page, json_result};

/// Input parameters for search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Title to search for.
    pub query: String,
}

/// Input parameters for popular tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PopularParams {
    /// "manga" (default), "manhwa" or "manhua".
    #[serde(default = "default_category")]
    pub category: String,

    /// 1-based page number (default: 1).
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_category() -> String {
    "manga".into()
}

pub async fn search_impl(catalog: &Catalog, params: SearchParams) -> Result<CallToolResult, McpError> {
    let cards = catalog.search(&params.query).await?;
    json_result(&cards)
}

pub async fn popular_impl(catalog: &Catalog, params: PopularParams) -> Result<CallToolResult, McpError> {
    let cards = catalog.popular(&params.category, params.page).await?;
    json_result(&cards)
}
