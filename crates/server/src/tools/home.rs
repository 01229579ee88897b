//! home tool implementation.
//!
//! Returns the aggregated homepage: recommendations, top genres, and the
//! merged latest updates from every source.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use komik_client::Catalog;

use super::json_result;

/// Input parameters for home tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HomeParams {
    /// Bypass the homepage cache and fetch fresh data.
    #[serde(default)]
    pub refresh: bool,
}

/// Implementation of the home tool.
pub async fn home_impl(catalog: &Catalog, params: HomeParams) -> Result<CallToolResult, McpError> {
    let feed = catalog.home(params.refresh).await;
    json_result(&feed)
}
