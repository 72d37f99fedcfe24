//! MCP stdio adapter around [`WeatherTool`].

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, Meta, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolAnnotations,
    },
    service::RequestContext,
    transport::stdio,
};
use serde_json::Value;
use std::sync::Arc;
use weather_core::{
    ResponseMeta, TOOL_NAME, ToolResponse, WeatherTool,
    handler::{TOOL_DESCRIPTION, TOOL_TITLE},
};

const INSTRUCTIONS: &str = "\
This server provides one tool, 'openweather_get_weather', returning a single-day weather \
summary from OpenWeather for a latitude/longitude and a YYYY-MM-DD date. \
Optional 'units' (metric, imperial, kelvin) and 'response_format' (markdown, json).";

#[derive(Debug, Clone)]
pub struct WeatherServer {
    tool: Arc<WeatherTool>,
}

impl WeatherServer {
    pub fn new(tool: WeatherTool) -> Self {
        Self { tool: Arc::new(tool) }
    }

    fn tool_definition() -> Tool {
        let schema = match WeatherTool::input_schema() {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };

        let mut annotations = ToolAnnotations::default();
        annotations.title = Some(TOOL_TITLE.to_string());
        annotations.read_only_hint = Some(true);
        annotations.destructive_hint = Some(false);
        annotations.idempotent_hint = Some(true);
        annotations.open_world_hint = Some(true);

        let mut tool = Tool::new(TOOL_NAME, TOOL_DESCRIPTION, Arc::new(schema));
        tool.annotations = Some(annotations);
        tool
    }
}

/// Envelope to MCP result. Invocation metadata, when present, goes out as `_meta`.
fn into_call_result(res: ToolResponse) -> CallToolResult {
    let content = vec![Content::text(res.text)];
    let mut result = if res.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    };

    if let Some(meta) = &res.meta {
        tracing::info!(
            invocation = meta.invocation,
            latitude = meta.latitude,
            longitude = meta.longitude,
            date = %meta.date,
            units = %meta.units,
            "weather tool answered"
        );
        result.meta = to_meta(meta);
    }

    result
}

fn to_meta(meta: &ResponseMeta) -> Option<Meta> {
    match serde_json::to_value(meta) {
        Ok(Value::Object(map)) => Some(Meta(map)),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "could not encode invocation metadata");
            None
        }
    }
}

impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = env!("CARGO_PKG_NAME").to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = server_info;
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(vec![Self::tool_definition()]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = Value::Object(request.arguments.unwrap_or_default());

        match self.tool.call(&request.name, &arguments).await {
            Ok(res) => Ok(into_call_result(res)),
            Err(e) => {
                tracing::warn!(tool = %request.name, "call to unknown tool");
                Err(McpError::invalid_params(e.to_string(), None))
            }
        }
    }
}

/// Serve `tool` on stdin/stdout until the client disconnects.
pub async fn serve(tool: WeatherTool) -> anyhow::Result<()> {
    tracing::info!(
        profile = %tool.profile(),
        api_key_configured = tool.has_api_key(),
        "openweather MCP server running on stdio"
    );

    let service = WeatherServer::new(tool)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("serving error: {e:?}"))?;

    service.waiting().await?;

    tracing::info!("openweather MCP server stopped");
    Ok(())
}
