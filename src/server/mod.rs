//! Model Context Protocol hosting on `rmcp`.
//!
//! Submodules:
//! - `resources` — the readme resource and the briefing prompt text
//! - `stdio` — stdin/stdout transport (default)
//! - `http` — streamable HTTP transport (`--http-stream`)

pub mod http;
pub mod resources;
pub mod stdio;

use std::sync::Arc;

use rmcp::handler::server::router::prompt::PromptRouter;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{prompt, prompt_handler, prompt_router, tool, tool_handler, tool_router};
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nowcast::Nowcaster;

pub const SERVER_NAME: &str = "mcp-weather-forecast";

const INSTRUCTIONS: &str = "한국 기상청 초단기실황(getUltraSrtNcst) 조회 서버입니다. \
list_supported_cities로 지원 도시를 확인한 뒤 get_now_weather(city)로 현재 날씨를 조회하세요.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CityRequest {
    /// 도시명 (예: 서울, 부산광역시, 세종시)
    pub city: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BriefingArgs {
    /// 브리핑할 도시명
    pub city: String,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct NowcastMcpServer {
    nowcaster: Arc<Nowcaster>,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

impl NowcastMcpServer {
    pub fn new(nowcaster: Arc<Nowcaster>) -> Self {
        Self {
            nowcaster,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }
}

/// Pretty JSON text for clients that only read `content`, plus the same
/// value as `structuredContent`.
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let structured =
        serde_json::to_value(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    let text = serde_json::to_string_pretty(&structured).unwrap_or_default();
    let mut result = CallToolResult::success(vec![Content::text(text)]);
    result.structured_content = Some(structured);
    Ok(result)
}

#[tool_router]
impl NowcastMcpServer {
    #[tool(description = "지원하는 광역(특별)시 목록을 반환합니다.")]
    async fn list_supported_cities(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.nowcaster.list_supported_regions())
    }

    #[tool(
        description = "광역시명을 입력받아, 오늘 날짜 기준 가장 최근 정각(데이터 없으면 -1시간)의 초단기실황을 조회합니다."
    )]
    async fn get_now_weather(
        &self,
        Parameters(req): Parameters<CityRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(city = %req.city, "get_now_weather called");
        // Upstream client is blocking.
        let nowcaster = Arc::clone(&self.nowcaster);
        let result = tokio::task::spawn_blocking(move || nowcaster.get_now_weather(&req.city))
            .await
            .map_err(|e| McpError::internal_error(format!("nowcast task failed: {}", e), None))?;
        json_result(&result)
    }
}

#[prompt_router]
impl NowcastMcpServer {
    #[prompt(
        name = "nowcast_briefing",
        description = "초단기실황 결과를 3-5문장 브리핑으로 요약하는 프롬프트"
    )]
    async fn nowcast_briefing(
        &self,
        Parameters(args): Parameters<BriefingArgs>,
    ) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            resources::briefing_prompt(&args.city),
        )]
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for NowcastMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.into();
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info,
            instructions: Some(INSTRUCTIONS.into()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![resources::readme_resource()]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match resources::read(&request.uri) {
            Some(contents) => Ok(ReadResourceResult {
                contents: vec![contents],
            }),
            None => Err(McpError::resource_not_found(
                format!("Resource not found: {}", request.uri),
                None,
            )),
        }
    }
}
