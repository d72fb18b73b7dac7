//! 通过 MCP stdio 把工具集暴露给代理运行时
//!
//! 运行时按 `mcp__<server>__<tool>` 的名称调用工具，本进程以 `serve-tools`
//! 子命令启动，stdout 只承载协议消息，日志全部写到 stderr。

use anyhow::Result;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler, ServiceExt};

use crate::llm::tools::{ToolKit, ToolOutput};

/// 运行时看到的完整工具名
pub fn qualified_name(server: &str, tool: &str) -> String {
    format!("mcp__{}__{}", server, tool)
}

/// 去掉 `mcp__<server>__` 前缀；不是本服务器的工具原样返回
pub fn local_name<'a>(server: &str, qualified: &'a str) -> &'a str {
    qualified
        .strip_prefix("mcp__")
        .and_then(|rest| rest.strip_prefix(server))
        .and_then(|rest| rest.strip_prefix("__"))
        .unwrap_or(qualified)
}

#[derive(Clone)]
pub struct ToolServer {
    toolkit: ToolKit,
    name: String,
}

impl ToolServer {
    pub fn new(toolkit: ToolKit, name: impl Into<String>) -> Self {
        Self {
            toolkit,
            name: name.into(),
        }
    }

    pub async fn tools(&self) -> Vec<McpTool> {
        self.toolkit
            .definitions()
            .await
            .into_iter()
            .map(|definition| {
                let schema = match definition.parameters {
                    serde_json::Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                McpTool::new(definition.name, definition.description, schema)
            })
            .collect()
    }

    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let args = serde_json::Value::Object(arguments.unwrap_or_default());
        let ToolOutput { text, is_error } = self.toolkit.call(name, args).await;

        if is_error {
            CallToolResult::error(vec![Content::text(text)])
        } else {
            CallToolResult::success(vec![Content::text(text)])
        }
    }

    /// 在 stdin/stdout 上提供服务，直到对端断开
    pub async fn serve_stdio(self) -> Result<()> {
        tracing::info!(server = %self.name, "🔌 tool server listening on stdio");
        let service = self.serve(rmcp::transport::io::stdio()).await?;
        service.waiting().await?;
        tracing::info!("tool server stopped");
        Ok(())
    }
}

impl ServerHandler for ToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some(
                "MPA deal-intelligence datastore. Save companies, signals, people, sources, \
                 acquirers, connections, investors and pipeline state. Every fact-bearing \
                 record requires a sourceUrl."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tools().await,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.invoke(&request.name, request.arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn server() -> ToolServer {
        ToolServer::new(ToolKit::new(Arc::new(MemoryStore::new())), "mpa-supabase")
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.as_str()))
            .collect()
    }

    #[test]
    fn test_tool_names_round_trip() {
        let qualified = qualified_name("mpa-supabase", "save_company");
        assert_eq!(qualified, "mcp__mpa-supabase__save_company");
        assert_eq!(local_name("mpa-supabase", &qualified), "save_company");
        assert_eq!(local_name("mpa-supabase", "WebSearch"), "WebSearch");
        assert_eq!(
            local_name("mpa-supabase", "mcp__other__save_company"),
            "mcp__other__save_company"
        );
    }

    #[tokio::test]
    async fn test_lists_every_tool_with_object_schema() {
        let tools = server().tools().await;
        assert_eq!(tools.len(), 16);
        for tool in &tools {
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&serde_json::json!("object"))
            );
        }
    }

    #[tokio::test]
    async fn test_missing_arguments_are_treated_as_empty() {
        let result = server().invoke("list_companies", None).await;
        assert_ne!(result.is_error, Some(true));
        assert_eq!(text(&result), "[]");
    }

    #[tokio::test]
    async fn test_validation_failure_is_flagged() {
        let mut args = JsonObject::new();
        args.insert("name".to_string(), serde_json::json!("Acme"));
        let result = server().invoke("save_investor", Some(args)).await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).starts_with("Invalid arguments"));
    }
}
