//! MCP server implementation using pmcp.
//!
//! Serves the paper tools over stdio (the default) or streamable HTTP.

use crate::config::Config;
use crate::mcp::tools::ToolRegistry;
use crate::mcp::transport::{ToolResultHttpMiddleware, ToolResultTransport};
use async_trait::async_trait;
use pmcp::{
    server::{
        http_middleware::ServerHttpMiddlewareChain,
        streamable_http_server::{StreamableHttpServer, StreamableHttpServerConfig},
    },
    shared::{StdioTransport, Transport},
    Error, RequestHandlerExtra, Server, ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Server name announced to clients
pub const SERVER_NAME: &str = "arxiv-paper-mcp";

/// The MCP server for arXiv papers
#[derive(Debug)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
}

impl McpServer {
    /// Create a new MCP server from configuration
    pub fn new(config: &Config) -> Result<Self, Error> {
        let tools = ToolRegistry::from_config(config).map_err(|e| Error::internal(e.to_string()))?;
        Self::with_tools(Arc::new(tools))
    }

    /// Create a server around an existing tool registry
    pub fn with_tools(tools: Arc<ToolRegistry>) -> Result<Self, Error> {
        let server = Self::build_server_impl(tools)?;
        Ok(Self {
            server: Arc::new(Mutex::new(server)),
        })
    }

    fn build_server_impl(tools: Arc<ToolRegistry>) -> Result<Server, Error> {
        let mut builder = Server::builder()
            .name(SERVER_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(ServerCapabilities::default());

        for tool in tools.all() {
            let wrapper = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                registry: tools.clone(),
            };
            builder = builder.tool(tool.name.clone(), wrapper);
        }

        builder.build()
    }

    /// Run the server in stdio mode
    pub async fn run(self) -> Result<(), Error> {
        tracing::info!("Starting MCP server in stdio mode");
        self.run_with_transport(StdioTransport::new()).await
    }

    /// Run the server over any pmcp transport
    pub async fn run_with_transport<T: Transport + 'static>(self, transport: T) -> Result<(), Error> {
        // Server::run takes ownership
        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("MCP server is still shared"))?
            .into_inner();

        server.run(ToolResultTransport::new(transport)).await
    }

    /// Run the server in streamable HTTP mode
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), Error> {
        tracing::info!("Starting MCP server in HTTP mode on {}", addr);

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address: {}", e)))?;

        let mut middleware = ServerHttpMiddlewareChain::new();
        middleware.add(Arc::new(ToolResultHttpMiddleware));
        let config = StreamableHttpServerConfig {
            http_middleware: Some(Arc::new(middleware)),
            ..Default::default()
        };

        StreamableHttpServer::with_config(socket_addr, self.server.clone(), config)
            .start()
            .await
    }
}

/// Adapts a registry tool to pmcp's ToolHandler
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    registry: Arc<ToolRegistry>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        // Failures are already folded into the response; the transport lifts it out
        let response = self.registry.call(&self.name, args).await;
        serde_json::to_value(response).map_err(|e| Error::internal(e.to_string()))
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}
