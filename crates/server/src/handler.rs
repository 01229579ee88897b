//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the catalog-backed implementations.
use std::sync::Arc;

use crate::tools::{
    ChapterParams, DoujinLatestParams, DoujinSlugParams, HomeParams, MangaDetailParams, PopularParams, SearchParams,
    doujin, home::home_impl, listing, manga,
};
use komik_client::Catalog;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

const INSTRUCTIONS: &str = "Read-only manga catalog. Listings return cards whose `url` feeds manga_detail, \
and manga_detail chapter `url`s feed chapter. Pass `source` only to pin a lookup to one source.";

/// The main MCP server handler for komik.
#[derive(Clone)]
pub struct KomikServer {
    tool_router: ToolRouter<Self>,
    catalog: Arc<Catalog>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl KomikServer {
    /// Create a new server handler over a shared catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { tool_router: Self::tool_router(), catalog }
    }

    #[tool(
        description = "Homepage: Komiku recommendations, top genres, and the latest updates merged across sources (newest first). Cached for five minutes unless refresh is set."
    )]
    async fn home(&self, params: Parameters<HomeParams>) -> Result<CallToolResult, McpError> {
        home_impl(&self.catalog, params.0).await
    }

    /// Manga detail with source fallback.
    ///
    /// Tries Komiku, then Asia, then International unless the identifier's
    /// shape or an explicit source picks one.
    #[tool(
        description = "Get a manga's detail (title, synopsis, genres, chapter list) by slug or path. Falls back across sources until one has it."
    )]
    async fn manga_detail(&self, params: Parameters<MangaDetailParams>) -> Result<CallToolResult, McpError> {
        manga::manga_detail_impl(&self.catalog, params.0).await
    }

    #[tool(description = "Get a chapter's page images and prev/next navigation by chapter path.")]
    async fn chapter(&self, params: Parameters<ChapterParams>) -> Result<CallToolResult, McpError> {
        manga::chapter_impl(&self.catalog, params.0).await
    }

    #[tool(description = "Search Komiku by title. Returns manga cards; an empty list means no match.")]
    async fn search(&self, params: Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        listing::search_impl(&self.catalog, params.0).await
    }

    #[tool(description = "Popular titles by category (manga, manhwa, manhua) and page.")]
    async fn popular(&self, params: Parameters<PopularParams>) -> Result<CallToolResult, McpError> {
        listing::popular_impl(&self.catalog, params.0).await
    }

    #[tool(description = "Latest doujin updates with pagination.")]
    async fn doujin_latest(&self, params: Parameters<DoujinLatestParams>) -> Result<CallToolResult, McpError> {
        doujin::latest_impl(&self.catalog, params.0).await
    }

    #[tool(description = "Doujin detail and chapter list by slug.")]
    async fn doujin_detail(&self, params: Parameters<DoujinSlugParams>) -> Result<CallToolResult, McpError> {
        doujin::detail_impl(&self.catalog, params.0).await
    }

    #[tool(description = "Doujin chapter page images and navigation by chapter slug.")]
    async fn doujin_chapter(&self, params: Parameters<DoujinSlugParams>) -> Result<CallToolResult, McpError> {
        doujin::chapter_impl(&self.catalog, params.0).await
    }
}

impl ServerHandler for KomikServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "komik".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
