//! Outgoing tool results.
//!
//! pmcp stringifies whatever a tool handler returns into a single text block
//! with `isError: false`. Our handlers return a serialized [`ToolResponse`],
//! so on the way out that envelope is lifted back into the JSON-RPC result:
//! the client sees the plain text and the real error flag.

use async_trait::async_trait;
use pmcp::server::http_middleware::{ServerHttpContext, ServerHttpMiddleware, ServerHttpResponse};
use pmcp::shared::{Transport, TransportMessage};
use pmcp::types::jsonrpc::ResponsePayload;
use serde_json::Value;

use super::tools::ToolResponse;

/// Replace a pmcp-wrapped tool result with the [`ToolResponse`] it carries.
///
/// Returns `false` (leaving `result` untouched) for anything else.
pub fn unwrap_tool_result(result: &mut Value) -> bool {
    let text = match result
        .get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
    {
        Some([block]) if block.get("type").and_then(Value::as_str) == Some("text") => {
            block.get("text").and_then(Value::as_str)
        }
        _ => None,
    };

    let Some(response) = text.and_then(|t| serde_json::from_str::<ToolResponse>(t).ok()) else {
        return false;
    };

    match serde_json::to_value(response) {
        Ok(value) => {
            *result = value;
            true
        }
        Err(e) => {
            tracing::warn!("Failed to re-encode tool response: {}", e);
            false
        }
    }
}

/// Transport wrapper that unwraps tool results before they are sent
#[derive(Debug)]
pub struct ToolResultTransport<T> {
    inner: T,
}

impl<T> ToolResultTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for ToolResultTransport<T> {
    async fn send(&mut self, mut message: TransportMessage) -> pmcp::Result<()> {
        if let TransportMessage::Response(response) = &mut message {
            if let ResponsePayload::Result(result) = &mut response.payload {
                unwrap_tool_result(result);
            }
        }
        self.inner.send(message).await
    }

    async fn receive(&mut self) -> pmcp::Result<TransportMessage> {
        self.inner.receive().await
    }

    async fn close(&mut self) -> pmcp::Result<()> {
        self.inner.close().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn transport_type(&self) -> &'static str {
        self.inner.transport_type()
    }
}

/// Same rewrite for JSON bodies served over streamable HTTP
#[derive(Debug, Default)]
pub struct ToolResultHttpMiddleware;

#[async_trait]
impl ServerHttpMiddleware for ToolResultHttpMiddleware {
    async fn on_response(
        &self,
        response: &mut ServerHttpResponse,
        _context: &ServerHttpContext,
    ) -> pmcp::Result<()> {
        let Ok(mut body) = serde_json::from_slice::<Value>(&response.body) else {
            return Ok(());
        };

        let changed = body
            .get_mut("result")
            .map(unwrap_tool_result)
            .unwrap_or(false);

        if changed {
            response.body = serde_json::to_vec(&body)
                .map_err(|e| pmcp::Error::internal(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrapped(response: &ToolResponse) -> Value {
        json!({
            "content": [{"type": "text", "text": serde_json::to_value(response).unwrap().to_string()}],
            "isError": false
        })
    }

    #[test]
    fn test_unwraps_error_response() {
        let mut result = wrapped(&ToolResponse::error("Tool execution failed: boom"));

        assert!(unwrap_tool_result(&mut result));
        assert_eq!(
            result,
            json!({
                "content": [{"type": "text", "text": "Tool execution failed: boom"}],
                "isError": true
            })
        );
    }

    #[test]
    fn test_unwraps_multiline_text() {
        let mut result = wrapped(&ToolResponse::text("line one\nline two"));

        assert!(unwrap_tool_result(&mut result));
        assert_eq!(result["content"][0]["text"], "line one\nline two");
        assert_eq!(result["isError"], false);
    }

    #[test]
    fn test_leaves_other_results_alone() {
        let mut plain = json!({"content": [{"type": "text", "text": "just text"}]});
        assert!(!unwrap_tool_result(&mut plain));
        assert_eq!(plain["content"][0]["text"], "just text");

        let mut tools = json!({"tools": []});
        assert!(!unwrap_tool_result(&mut tools));
    }
}
