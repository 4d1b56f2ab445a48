//! MCP (Model Context Protocol) implementation.

mod handlers;
pub mod server;
mod tools;
pub mod transport;

pub use server::McpServer;
pub use tools::{Tool, ToolContent, ToolHandler, ToolRegistry, ToolResponse};
