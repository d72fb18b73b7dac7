use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::agents::{AgentRole, ModelTier};

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "mpa.toml";

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// 数据存储配置
    pub datastore: DatastoreConfig,

    /// 代理运行时配置
    pub agent: AgentConfig,

    /// 各角色的花费上限（美元）
    pub budgets: BudgetConfig,

    /// 是否启用详细日志
    pub verbose: bool,

    /// 实际加载的配置文件，工具服务子进程沿用同一份
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// PostgREST 数据存储配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DatastoreConfig {
    /// 服务基地址，未配置时取 SUPABASE_URL
    pub url: Option<String>,

    /// 匿名访问密钥，未配置时取 SUPABASE_ANON_KEY
    pub api_key: Option<String>,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 托管代理运行时配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// `claude` CLI 可执行文件
    pub runtime_binary: String,

    /// MCP 工具服务名，决定 `mcp__<server>__<tool>` 前缀
    pub tool_server_name: String,

    pub permission_mode: String,

    pub models: ModelConfig,
}

/// 模型档位对应的模型 ID
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    pub sonnet: String,
    pub haiku: String,
    pub opus: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BudgetConfig {
    pub prospector: f64,
    pub researcher: f64,
    pub connector: f64,
    pub orchestrator: f64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let mut config: Config =
            toml::from_str(&content).context("Failed to parse config file")?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// 显式路径优先，其次当前目录下的 mpa.toml，都没有时使用默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn model_id(&self, tier: ModelTier) -> &str {
        self.agent.models.id(tier)
    }

    pub fn budget(&self, role: AgentRole) -> f64 {
        self.budgets.for_role(role)
    }
}

impl ModelConfig {
    pub fn id(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Sonnet => &self.sonnet,
            ModelTier::Haiku => &self.haiku,
            ModelTier::Opus => &self.opus,
        }
    }
}

impl BudgetConfig {
    pub fn for_role(&self, role: AgentRole) -> f64 {
        match role {
            AgentRole::Prospector => self.prospector,
            AgentRole::Researcher => self.researcher,
            AgentRole::Connector => self.connector,
            AgentRole::Orchestrator => self.orchestrator,
        }
    }

    /// 用同一个上限覆盖所有角色
    pub fn set_all(&mut self, budget: f64) {
        self.prospector = budget;
        self.researcher = budget;
        self.connector = budget;
        self.orchestrator = budget;
    }
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("SUPABASE_URL").ok(),
            api_key: std::env::var("SUPABASE_ANON_KEY").ok(),
            timeout_seconds: 30,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            runtime_binary: String::from("claude"),
            tool_server_name: String::from("mpa-supabase"),
            permission_mode: String::from("default"),
            models: ModelConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sonnet: String::from("claude-sonnet-4-5"),
            haiku: String::from("claude-haiku-4-5"),
            opus: String::from("claude-opus-4-1"),
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            prospector: 1.0,
            researcher: 2.0,
            connector: 1.5,
            orchestrator: 5.0,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
