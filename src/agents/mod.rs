//! 并购情报代理
//!
//! 三个专职代理（prospector / researcher / connector）和一个协调者。
//! 每个角色由一份静态档案描述：系统提示词、作为子代理时的模型档位、可用工具。

pub mod connector;
pub mod orchestrator;
pub mod prospector;
pub mod researcher;
pub mod router;
pub mod runner;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::llm::mcp::qualified_name;

/// 运行时内置的只读文件与网页工具
pub const BUILTIN_TOOLS: &[&str] = &["Read", "Grep", "Glob", "WebSearch", "WebFetch"];

/// 模型档位，运行时按别名识别子代理模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    #[default]
    Sonnet,
    Haiku,
    Opus,
}

impl ModelTier {
    pub fn alias(&self) -> &'static str {
        match self {
            ModelTier::Sonnet => "sonnet",
            ModelTier::Haiku => "haiku",
            ModelTier::Opus => "opus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentRole {
    Prospector,
    Researcher,
    Connector,
    Orchestrator,
}

impl AgentRole {
    pub const WORKERS: [AgentRole; 3] = [
        AgentRole::Prospector,
        AgentRole::Researcher,
        AgentRole::Connector,
    ];

    /// 子代理映射中使用的键
    pub fn key(&self) -> &'static str {
        match self {
            AgentRole::Prospector => "prospector",
            AgentRole::Researcher => "researcher",
            AgentRole::Connector => "connector",
            AgentRole::Orchestrator => "orchestrator",
        }
    }

    pub fn profile(&self) -> &'static AgentProfile {
        match self {
            AgentRole::Prospector => &prospector::PROFILE,
            AgentRole::Researcher => &researcher::PROFILE,
            AgentRole::Connector => &connector::PROFILE,
            AgentRole::Orchestrator => &orchestrator::PROFILE,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentRole::Prospector => "Prospector",
            AgentRole::Researcher => "Researcher",
            AgentRole::Connector => "Connector",
            AgentRole::Orchestrator => "Orchestrator",
        };
        f.write_str(label)
    }
}

/// 角色档案
#[derive(Debug)]
pub struct AgentProfile {
    pub role: AgentRole,
    pub description: &'static str,
    pub system_prompt: &'static str,
    /// 被协调者委派时使用的模型档位
    pub subagent_model: ModelTier,
    pub builtin_tools: &'static [&'static str],
    /// 数据存储工具的本地名称
    pub datastore_tools: &'static [&'static str],
}

impl AgentProfile {
    /// 运行时允许列表：内置工具原样保留，存储工具加上 MCP 服务前缀
    pub fn allowed_tools(&self, server: &str) -> Vec<String> {
        self.builtin_tools
            .iter()
            .map(|tool| tool.to_string())
            .chain(
                self.datastore_tools
                    .iter()
                    .map(|tool| qualified_name(server, tool)),
            )
            .collect()
    }
}

/// 任务模板中的地域后缀：指定省份时为 " in <省份>"，否则为整个大西洋加拿大
pub(crate) fn province_scope(province: Option<&str>) -> String {
    province.map_or_else(
        || " in Atlantic Canada".to_string(),
        |province| format!(" in {province}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tools::TOOL_NAMES;

    #[test]
    fn test_profiles_reference_registered_tools() {
        for role in AgentRole::WORKERS
            .iter()
            .chain(std::iter::once(&AgentRole::Orchestrator))
        {
            let profile = role.profile();
            assert_eq!(profile.role, *role);
            for tool in profile.datastore_tools {
                assert!(TOOL_NAMES.contains(tool), "{} lists unknown tool {}", role, tool);
            }
        }
    }

    #[test]
    fn test_allowed_tools_are_qualified() {
        let tools = AgentRole::Connector.profile().allowed_tools("mpa-supabase");
        assert_eq!(tools[..BUILTIN_TOOLS.len()], BUILTIN_TOOLS[..]);
        assert!(tools.contains(&"mcp__mpa-supabase__get_shared_investors".to_string()));
        assert!(!tools.contains(&"get_shared_investors".to_string()));
    }

    #[test]
    fn test_worker_tool_scopes() {
        let prospector = AgentRole::Prospector.profile().datastore_tools;
        assert!(prospector.contains(&"save_signal"));
        assert!(!prospector.contains(&"save_connection"));

        let connector = AgentRole::Connector.profile().datastore_tools;
        assert!(connector.contains(&"save_connection"));
        assert!(!connector.contains(&"update_pipeline"));

        let orchestrator = AgentRole::Orchestrator.profile();
        assert!(orchestrator.builtin_tools.contains(&"Task"));
        assert!(!orchestrator.builtin_tools.contains(&"Read"));
    }

    #[test]
    fn test_tier_aliases() {
        assert_eq!(ModelTier::default(), ModelTier::Sonnet);
        assert_eq!(ModelTier::Haiku.alias(), "haiku");
        assert_eq!(AgentRole::Researcher.key(), "researcher");
        assert_eq!(AgentRole::Researcher.to_string(), "Researcher");
    }
}
