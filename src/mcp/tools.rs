//! Tool registry for MCP tools.
//!
//! [`ToolRegistry::call`] is the protocol boundary: whatever a handler does,
//! the caller gets a well-formed [`ToolResponse`]. Failures come back as an
//! error-flagged text payload, never as a protocol error.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::handlers::{
    ParsePaperContentHandler, PdfUrlHandler, RecentPapersHandler, SearchArxivHandler,
};
use crate::config::Config;
use crate::sources::{ArxivClient, ContentAssembler, PaperError};
use crate::utils::HttpClient;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "search_arxiv")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments, returning the text shown to the caller
    async fn execute(&self, args: Value) -> Result<String, PaperError>;
}

/// One content block of a tool response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Result of a tool call as sent over the protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,

    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Text of the first content block
    pub fn first_text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Build the four paper tools from configuration
    pub fn from_config(config: &Config) -> Result<Self, PaperError> {
        let client = HttpClient::new(&config.http)?;
        let arxiv = Arc::new(ArxivClient::new(client.clone(), &config.arxiv, &config.http));
        let assembler = Arc::new(ContentAssembler::from_config(config, client)?);

        let mut registry = Self::new();
        registry.register_paper_tools(arxiv, assembler, &config.arxiv.recent_category);
        Ok(registry)
    }

    fn register_paper_tools(
        &mut self,
        arxiv: Arc<ArxivClient>,
        assembler: Arc<ContentAssembler>,
        recent_category: &str,
    ) {
        // 1. search_arxiv - Atom API search
        self.register(Tool {
            name: "search_arxiv".to_string(),
            description: "Search arXiv papers".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search keywords"
                    },
                    "maxResults": {
                        "type": "number",
                        "description": "Maximum number of results",
                        "default": 5
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchArxivHandler {
                arxiv: arxiv.clone(),
            }),
        });

        // 2. get_recent_ai_papers - raw listing page
        self.register(Tool {
            name: "get_recent_ai_papers".to_string(),
            description: format!("Get the latest arXiv papers in {} ({}/recent)", recent_category, recent_category),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            handler: Arc::new(RecentPapersHandler { arxiv }),
        });

        // 3. get_arxiv_pdf_url - identifier resolution only
        self.register(Tool {
            name: "get_arxiv_pdf_url".to_string(),
            description: "Get the PDF download link for an arXiv paper".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "arXiv paper URL (e.g. http://arxiv.org/abs/2403.15137v1) or arXiv ID (e.g. 2403.15137v1)"
                    }
                },
                "required": ["input"]
            }),
            handler: Arc::new(PdfUrlHandler {
                resolver: assembler.resolver().clone(),
            }),
        });

        // 4. parse_paper_content - full extraction pipeline
        self.register(Tool {
            name: "parse_paper_content".to_string(),
            description: "Extract the full text of a paper (HTML rendering first, PDF fallback)".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "arXiv paper URL or arXiv ID"
                    },
                    "paperInfo": {
                        "type": "object",
                        "description": "Optional paper metadata, prepended to the content",
                        "properties": {
                            "title": { "type": "string" },
                            "summary": { "type": "string" },
                            "published": { "type": "string" },
                            "authors": { "type": "array" }
                        }
                    }
                },
                "required": ["input"]
            }),
            handler: Arc::new(ParsePaperContentHandler { assembler }),
        });
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools, sorted by name
    pub fn all(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name; errors are folded into the response
    pub async fn call(&self, name: &str, args: Value) -> ToolResponse {
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };

        let result = match self.get(name) {
            Some(tool) => tool.handler.execute(args).await,
            None => Err(PaperError::InvalidRequest(format!("Unknown tool: {}", name))),
        };

        match result {
            Ok(text) => ToolResponse::text(text),
            Err(e) => {
                tracing::warn!("Tool '{}' failed: {}", name, e);
                ToolResponse::error(format!("Tool execution failed: {}", e))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FailingHandler;

    #[async_trait::async_trait]
    impl ToolHandler for FailingHandler {
        async fn execute(&self, _args: Value) -> Result<String, PaperError> {
            Err(PaperError::Download("connection reset".to_string()))
        }
    }

    #[derive(Debug)]
    struct EchoHandler;

    #[async_trait::async_trait]
    impl ToolHandler for EchoHandler {
        async fn execute(&self, args: Value) -> Result<String, PaperError> {
            Ok(args.to_string())
        }
    }

    fn tool(name: &str, handler: Arc<dyn ToolHandler>) -> Tool {
        Tool {
            name: name.to_string(),
            description: String::new(),
            input_schema: serde_json::json!({"type": "object"}),
            handler,
        }
    }

    #[test]
    fn test_from_config_registers_four_tools() {
        let registry = ToolRegistry::from_config(&Config::default()).unwrap();
        let names: Vec<&str> = registry.all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "get_arxiv_pdf_url",
                "get_recent_ai_papers",
                "parse_paper_content",
                "search_arxiv"
            ]
        );
    }

    #[tokio::test]
    async fn test_handler_error_becomes_flagged_response() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("fail", Arc::new(FailingHandler)));

        let response = registry.call("fail", serde_json::json!({})).await;

        assert!(response.is_error);
        assert_eq!(
            response.first_text(),
            "Tool execution failed: PDF download failed: connection reset"
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let response = registry.call("nope", Value::Null).await;
        assert!(response.is_error);
        assert!(response.first_text().contains("Unknown tool: nope"));
    }

    #[tokio::test]
    async fn test_null_args_become_empty_object() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("echo", Arc::new(EchoHandler)));

        let response = registry.call("echo", Value::Null).await;
        assert!(!response.is_error);
        assert_eq!(response.first_text(), "{}");
    }

    #[test]
    fn test_response_wire_format() {
        let value = serde_json::to_value(ToolResponse::error("boom")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "content": [{"type": "text", "text": "boom"}],
                "isError": true
            })
        );
    }
}
