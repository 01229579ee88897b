//! manga_detail and chapter tool implementations.
//!
//! Both resolve the source through selection unless the caller pins one.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use komik_client::Catalog;

use super::{json_result, parse_source};

/// Input parameters for manga_detail tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MangaDetailParams {
    /// Manga identifier: a slug (`one-piece`), `asia/<slug>`, `series/<id>` or a bare series id.
    pub identifier: String,

    /// Pin the lookup to one source: "komiku", "asia" or "international".
    #[serde(default)]
    pub source: Option<String>,
}

/// Input parameters for chapter tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChapterParams {
    /// Chapter path as found in a manga's chapter list (e.g. `/chapter/one-piece-chapter-1100`).
    pub path: String,

    /// Pin the lookup to one source: "komiku", "asia" or "international".
    #[serde(default)]
    pub source: Option<String>,
}

/// Implementation of the manga_detail tool.
pub async fn manga_detail_impl(catalog: &Catalog, params: MangaDetailParams) -> Result<CallToolResult, McpError> {
    let source = parse_source(params.source.as_deref())?;
    let detail = catalog.manga_detail(&params.identifier, source).await?;
    json_result(&detail)
}

/// Implementation of the chapter tool.
pub async fn chapter_impl(catalog: &Catalog, params: ChapterParams) -> Result<CallToolResult, McpError> {
    let source = parse_source(params.source.as_deref())?;
    let chapter = catalog.chapter(&params.path, source).await?;
    json_result(&chapter)
}
