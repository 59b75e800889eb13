use anyhow::Result;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
        Implementation, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam,
        ReadResourceResult, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    transport::stdio,
};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::ActionCatalog;
use crate::dispatch::Dispatcher;
use crate::error::DispatchError;

/// MCP server exposing the action catalog over stdio.
///
/// Tool metadata is computed once from the catalog; calls go through the
/// [`Dispatcher`], which owns the browser session.
#[derive(Clone)]
pub struct BrowserMcpServer {
    dispatcher: Arc<Dispatcher>,

    /// Advertised tools, already filtered by `enabled_tools`
    tools: Arc<Vec<Tool>>,

    /// Enabled tool names (filtered by --tool/--tools/--toolset CLI args)
    enabled_tools: Option<HashSet<String>>,
}

impl BrowserMcpServer {
    pub fn new(dispatcher: Arc<Dispatcher>, enabled_tools: Option<HashSet<String>>) -> Self {
        let tools = build_tools(dispatcher.catalog(), enabled_tools.as_ref());
        log::info!("Advertising {} browser tools", tools.len());
        Self {
            dispatcher,
            tools: Arc::new(tools),
            enabled_tools,
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.enabled_tools
            .as_ref()
            .is_none_or(|enabled| enabled.contains(name))
    }

    /// Serve over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> Result<()> {
        log::info!("Starting stdio server");

        let service = self.serve(stdio()).await.inspect_err(|e| {
            log::error!("serving error: {e:?}");
        })?;
        service.waiting().await?;

        log::info!("Stdio server stopped");
        Ok(())
    }
}

/// MCP tool definitions for every catalog entry passing the filter.
pub fn build_tools(catalog: &ActionCatalog, enabled: Option<&HashSet<String>>) -> Vec<Tool> {
    catalog
        .descriptors()
        .filter(|d| enabled.is_none_or(|set| set.contains(&d.qualified_name)))
        .map(|d| {
            Tool::new(
                d.qualified_name.clone(),
                d.description.clone(),
                Arc::new(d.input_schema()),
            )
        })
        .collect()
}

/// Translate a dispatch outcome into the MCP response.
///
/// Caller mistakes (unknown action, bad arguments) are protocol errors. Failures
/// that happen while driving the page are tool results flagged `is_error`, so
/// the client can read them and adjust.
pub fn into_call_result(outcome: Result<Value, DispatchError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(Value::String(text)) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Ok(value) => Ok(CallToolResult::success(vec![Content::text(value.to_string())])),
        Err(err @ DispatchError::UnknownAction { .. }) => Err(McpError::invalid_params(
            err.to_string(),
            Some(json!({ "error": err.kind() })),
        )),
        Err(err @ DispatchError::Validation { .. }) => Err(McpError::invalid_params(
            err.to_string(),
            Some(json!({
                "error": err.kind(),
                "action": err.action(),
                "parameter": err.parameter(),
            })),
        )),
        Err(err) => {
            let body = json!({
                "error": err.kind(),
                "action": err.action(),
                "message": err.to_string(),
            });
            Ok(CallToolResult::error(vec![Content::text(body.to_string())]))
        }
    }
}

/// A filtered-out tool is reported like an unknown one.
fn not_enabled(tool_name: &str) -> McpError {
    let err = DispatchError::UnknownAction {
        name: tool_name.to_string(),
    };
    McpError::invalid_params(
        format!("Tool '{tool_name}' is not enabled"),
        Some(json!({ "error": err.kind() })),
    )
}

impl ServerHandler for BrowserMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Browser automation tools under the `{}` namespace. Elements are addressed by CSS selector.",
                self.dispatcher.catalog().namespace()
            )),
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_name = request.name;

        if !self.is_enabled(&tool_name) {
            return Err(not_enabled(&tool_name));
        }

        let arguments = request.arguments.unwrap_or_else(Map::new);
        into_call_result(self.dispatcher.dispatch(&tool_name, &arguments).await)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        log::debug!("Serving {} tools", self.tools.len());
        Ok(ListToolsResult::with_all_items(self.tools.to_vec()))
    }

    async fn get_prompt(
        &self,
        _request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Err(McpError::invalid_request("Prompts not supported", None))
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            prompts: vec![],
            next_cursor: None,
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        Err(McpError::invalid_request(
            "Resources not supported",
            Some(json!({ "uri": request.uri })),
        ))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            next_cursor: None,
            resource_templates: Vec::new(),
        })
    }
}
