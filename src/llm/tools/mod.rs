//! 数据存储工具集
//!
//! 代理发起的所有写入都经过这里：参数先反序列化、再校验，最后执行一次存储操作。
//! 校验或存储失败时返回带错误标记的文本结果，而不是让会话失败。

use std::sync::Arc;

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::Serialize;

use crate::store::{Store, StoreError};

/// 声明持有存储句柄的工具结构体
macro_rules! store_tool {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            store: std::sync::Arc<dyn crate::store::Store>,
        }

        impl $name {
            pub fn new(store: std::sync::Arc<dyn crate::store::Store>) -> Self {
                Self { store }
            }
        }
    };
}

pub mod company;
pub mod network;
pub mod pipeline;
pub mod research;
pub mod signal;
pub mod validate;

pub use company::{GetCompany, ListCompanies, SaveCompany};
pub use network::{GetConnections, GetSharedInvestors, LinkCompanyInvestor, SaveConnection, SaveInvestor};
pub use pipeline::{GetPipeline, UpdatePipeline};
pub use research::{SavePotentialAcquirer, SaveKeyPerson, SaveResearchSource};
pub use signal::{GetRecentSignals, GetSignals, SaveSignal};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Error: {0}")]
    Store(#[from] StoreError),

    #[error("Error encoding result: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// 返回给代理的工具结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// 由参数结构体生成工具定义
pub(crate) fn definition_for<A: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let parameters = serde_json::to_value(schemars::schema_for!(A))
        .unwrap_or_else(|_| serde_json::json!({ "type": "object", "properties": {} }));

    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters,
    }
}

/// 查询结果以缩进 JSON 返回
pub(crate) fn pretty<T: Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(ToolError::Encode)
}

async fn invoke<T>(tool: &T, args: serde_json::Value) -> Result<String, ToolError>
where
    T: Tool<Error = ToolError, Output = String>,
{
    let args: T::Args = serde_json::from_value(args).map_err(ToolError::InvalidArguments)?;
    tool.call(args).await
}

macro_rules! toolkit {
    ($($tool:ident),+ $(,)?) => {
        /// 全部工具名称，即对外的调用契约
        pub const TOOL_NAMES: &[&str] = &[$(<$tool as Tool>::NAME),+];

        impl ToolKit {
            /// 全部工具的定义（名称、描述、参数 JSON Schema）
            pub async fn definitions(&self) -> Vec<ToolDefinition> {
                let mut definitions = Vec::with_capacity(TOOL_NAMES.len());
                $(
                    definitions.push($tool::new(self.store.clone()).definition(String::new()).await);
                )+
                definitions
            }

            async fn dispatch(
                &self,
                name: &str,
                args: serde_json::Value,
            ) -> Result<String, ToolError> {
                $(
                    if name == <$tool as Tool>::NAME {
                        return invoke(&$tool::new(self.store.clone()), args).await;
                    }
                )+
                Err(ToolError::UnknownTool(name.to_string()))
            }
        }
    };
}

/// 工具集，持有显式构造的存储实例
#[derive(Clone)]
pub struct ToolKit {
    store: Arc<dyn Store>,
}

toolkit!(
    SaveCompany,
    GetCompany,
    ListCompanies,
    SaveSignal,
    GetSignals,
    GetRecentSignals,
    SaveConnection,
    GetConnections,
    SaveInvestor,
    LinkCompanyInvestor,
    GetSharedInvestors,
    UpdatePipeline,
    GetPipeline,
    SaveKeyPerson,
    SaveResearchSource,
    SavePotentialAcquirer,
);

impl ToolKit {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// 按名称调用工具；任何失败都转成带错误标记的结果
    pub async fn call(&self, name: &str, args: serde_json::Value) -> ToolOutput {
        tracing::info!(tool = name, "🔧 tool called");
        tracing::debug!(tool = name, %args, "tool arguments");

        match self.dispatch(name, args).await {
            Ok(text) => ToolOutput::ok(text),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call rejected");
                ToolOutput::error(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn toolkit() -> (Arc<MemoryStore>, ToolKit) {
        let store = Arc::new(MemoryStore::new());
        let kit = ToolKit::new(store.clone());
        (store, kit)
    }

    #[test]
    fn test_tool_names_are_unique() {
        let mut names = TOOL_NAMES.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 16);
        assert!(TOOL_NAMES.contains(&"get_shared_investors"));
    }

    #[tokio::test]
    async fn test_definitions_expose_camel_case_schema() {
        let (_, kit) = toolkit();
        let definitions = kit.definitions().await;
        assert_eq!(definitions.len(), TOOL_NAMES.len());

        let save_signal = definitions
            .iter()
            .find(|d| d.name == "save_signal")
            .unwrap();
        let properties = &save_signal.parameters["properties"];
        assert!(properties.get("companyId").is_some());
        assert!(properties.get("sourceUrl").is_some());
        let required = save_signal.parameters["required"].as_array().unwrap();
        assert!(required.contains(&json!("sourceUrl")));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error_result() {
        let (_, kit) = toolkit();
        let output = kit.call("drop_tables", json!({})).await;
        assert!(output.is_error);
        assert_eq!(output.text, "Unknown tool: drop_tables");
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_rejected_before_store() {
        let (store, kit) = toolkit();
        let output = kit
            .call(
                "save_signal",
                json!({
                    "companyId": "not-a-uuid",
                    "signalType": "sell_side",
                    "signalCategory": "owner_age",
                    "description": "Owner is 68",
                    "sourceUrl": "https://example.com",
                    "confidence": "high"
                }),
            )
            .await;
        assert!(output.is_error);
        assert!(output.text.starts_with("Invalid arguments"));
        assert_eq!(store.signal_count().await, 0);
    }
}
