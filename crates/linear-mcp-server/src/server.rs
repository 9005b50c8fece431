//! MCP server implementation.
//!
//! The server handles the MCP protocol lifecycle:
//! 1. Initialize - exchange capabilities
//! 2. Dispatch list/call/read/get requests to registered capabilities
//! 3. Shutdown on EOF

use linear_mcp_core::config::ServerConfig;
use serde_json::Value;

use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    PromptGetParams, PromptsListResult, RequestId, ResourceReadParams, ResourcesListResult,
    ServerInfo, ToolCallParams, ToolsListResult, MCP_VERSION,
};
use crate::registry::CapabilityRegistry;
use crate::transport::{IncomingMessage, StdioTransport};

/// MCP server over a capability registry.
pub struct McpServer {
    registry: CapabilityRegistry,
    info: ServerInfo,
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self {
            registry,
            info: ServerInfo {
                name: "linear".to_string(),
                version: "1.0.0".to_string(),
            },
            initialized: false,
        }
    }

    /// Set the name and version reported at `initialize`.
    pub fn with_server_config(mut self, config: &ServerConfig) -> Self {
        self.info = ServerInfo {
            name: config.name.clone(),
            version: config.version.clone(),
        };
        self
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Run the MCP server over stdin/stdout.
    pub async fn run(&mut self) -> linear_mcp_core::Result<()> {
        self.run_with(StdioTransport::stdio()).await
    }

    /// Run the MCP server main loop over the given transport until EOF.
    pub async fn run_with(&mut self, mut transport: StdioTransport) -> linear_mcp_core::Result<()> {
        tracing::info!(
            "Starting MCP server with {} resources, {} tools, {} prompts",
            self.registry.resource_definitions().len(),
            self.registry.tool_definitions().len(),
            self.registry.prompt_definitions().len()
        );

        loop {
            match transport.read_message() {
                Ok(Some(msg)) => {
                    if let Some(resp) = self.handle_message(msg).await {
                        if let Err(e) = transport.write_response(&resp) {
                            tracing::error!("Failed to write response: {}", e);
                            break;
                        }
                    }
                }
                Ok(None) => {
                    tracing::info!("EOF received, shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!("Transport error: {}", e);
                    let error_resp = JsonRpcResponse::error(
                        RequestId::Null,
                        JsonRpcError::parse_error(&e.to_string()),
                    );
                    if transport.write_response(&error_resp).is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("MCP server stopped");
        Ok(())
    }

    /// Handle an incoming message.
    async fn handle_message(&mut self, msg: IncomingMessage) -> Option<JsonRpcResponse> {
        match msg {
            IncomingMessage::Request(req) => Some(self.handle_request(req).await),
            IncomingMessage::Notification(notif) => {
                self.handle_notification(&notif.method);
                None
            }
        }
    }

    /// Handle a JSON-RPC request.
    async fn handle_request(&mut self, req: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!("Handling request: {} (id: {:?})", req.method, req.id);

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req.id, req.params),
            "ping" => JsonRpcResponse::success(req.id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::from_result(
                req.id,
                &ToolsListResult {
                    tools: self.registry.tool_definitions(),
                },
            ),
            "tools/call" => self.handle_tools_call(req.id, req.params).await,
            "resources/list" => JsonRpcResponse::from_result(
                req.id,
                &ResourcesListResult {
                    resources: self.registry.resource_definitions(),
                },
            ),
            "resources/read" => self.handle_resources_read(req.id, req.params).await,
            "prompts/list" => JsonRpcResponse::from_result(
                req.id,
                &PromptsListResult {
                    prompts: self.registry.prompt_definitions(),
                },
            ),
            "prompts/get" => self.handle_prompts_get(req.id, req.params).await,
            method => {
                tracing::warn!("Unknown method: {}", method);
                JsonRpcResponse::error(req.id, JsonRpcError::method_not_found(method))
            }
        }
    }

    /// Handle notifications (no response).
    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                tracing::info!("Client initialized");
            }
            "notifications/cancelled" => {
                tracing::debug!("Request cancelled by client");
            }
            _ => {
                tracing::debug!("Ignoring notification: {}", method);
            }
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&mut self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        if self.initialized {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("Server already initialized"),
            );
        }

        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(init_params) => {
                    tracing::info!(
                        "Client: {} v{} (protocol: {})",
                        init_params.client_info.name,
                        init_params.client_info.version,
                        init_params.protocol_version
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to parse initialize params: {}", e);
                }
            }
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: self.registry.capabilities(),
            server_info: self.info.clone(),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        let Some(tool) = self.registry.tool(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(&format!("Unknown tool: {}", params.name)),
            );
        };

        tracing::info!("Calling tool: {}", params.name);
        let result = tool.call(params.arguments).await;
        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle resources/read request.
    async fn handle_resources_read(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: ResourceReadParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        let Some(resource) = self.registry.resource(&params.uri) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(&format!("Unknown resource: {}", params.uri)),
            );
        };

        tracing::info!("Reading resource: {}", params.uri);
        let result = resource.read(&params.uri).await;
        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle prompts/get request.
    async fn handle_prompts_get(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: PromptGetParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        let Some(prompt) = self.registry.prompt(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(&format!("Unknown prompt: {}", params.name)),
            );
        };

        tracing::info!("Getting prompt: {}", params.name);
        match prompt.get(params.arguments).await {
            Ok(result) => JsonRpcResponse::from_result(id, &result),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::invalid_params(&e.message)),
        }
    }
}

/// Deserialize required request params.
fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(&e.to_string()))
}
