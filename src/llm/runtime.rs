//! 托管代理运行时
//!
//! 推理本身不在本地完成：请求交给 `claude` CLI 的流式 JSON 打印模式执行，
//! 本地只负责组装请求并逐行读取事件流。测试中用 [`ScriptedRuntime`] 回放事件。

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to start agent runtime `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("agent runtime I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("agent runtime exited with {0}")]
    Exited(String),

    #[error("failed to encode runtime request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 嵌套子代理的定义，由协调者按需委派
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubagentDefinition {
    pub description: String,
    pub prompt: String,
    pub tools: Vec<String>,
    /// 模型档位别名（sonnet / haiku / opus）
    pub model: String,
}

/// 一次代理调用
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRequest {
    pub prompt: String,
    pub system_prompt: String,
    pub model: String,
    pub allowed_tools: Vec<String>,
    pub agents: BTreeMap<String, SubagentDefinition>,
    /// 花费上限（美元），原样交给运行时
    pub max_budget_usd: f64,
    pub permission_mode: String,
}

pub type EventStream = BoxStream<'static, Result<Value, RuntimeError>>;

#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn launch(&self, request: AgentRequest) -> Result<EventStream, RuntimeError>;
}

/// 运行时如何回连本进程的工具服务
#[derive(Debug, Clone, PartialEq)]
pub struct ToolServerLaunch {
    pub name: String,
    pub command: PathBuf,
    pub args: Vec<String>,
}

impl ToolServerLaunch {
    pub fn mcp_config(&self) -> Value {
        let mut servers = serde_json::Map::new();
        servers.insert(
            self.name.clone(),
            json!({
                "type": "stdio",
                "command": self.command.to_string_lossy(),
                "args": self.args,
            }),
        );
        json!({ "mcpServers": servers })
    }
}

/// 以子进程方式驱动 `claude` CLI
pub struct ClaudeCodeRuntime {
    binary: String,
    tool_server: ToolServerLaunch,
}

impl ClaudeCodeRuntime {
    pub fn new(binary: impl Into<String>, tool_server: ToolServerLaunch) -> Self {
        Self {
            binary: binary.into(),
            tool_server,
        }
    }

    pub fn command_args(&self, request: &AgentRequest) -> Result<Vec<String>, RuntimeError> {
        let mut args = vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
            "--model".to_string(),
            request.model.clone(),
            "--system-prompt".to_string(),
            request.system_prompt.clone(),
            "--permission-mode".to_string(),
            request.permission_mode.clone(),
            "--max-budget-usd".to_string(),
            request.max_budget_usd.to_string(),
            "--mcp-config".to_string(),
            serde_json::to_string(&self.tool_server.mcp_config())?,
        ];

        if !request.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(request.allowed_tools.join(","));
        }

        if !request.agents.is_empty() {
            args.push("--agents".to_string());
            args.push(serde_json::to_string(&request.agents)?);
        }

        Ok(args)
    }
}

struct StreamState {
    lines: Lines<BufReader<ChildStdout>>,
    child: Child,
}

/// 非 JSON 行保留为 raw 事件，交给分类器处理
fn parse_line(line: &str) -> Value {
    serde_json::from_str(line).unwrap_or_else(|_| json!({ "type": "raw", "text": line }))
}

#[async_trait]
impl AgentRuntime for ClaudeCodeRuntime {
    async fn launch(&self, request: AgentRequest) -> Result<EventStream, RuntimeError> {
        let args = self.command_args(&request)?;
        tracing::debug!(binary = %self.binary, model = %request.model, "launching agent runtime");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RuntimeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let prompt = request.prompt.clone();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    tracing::warn!(error = %e, "failed to write prompt to agent runtime");
                }
                let _ = stdin.shutdown().await;
            });
        }

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(target: "runtime_stderr", "{}", line);
                }
            });
        }

        let stdout = child.stdout.take().ok_or_else(|| {
            RuntimeError::Io(std::io::Error::other("agent runtime stdout unavailable"))
        })?;

        let state = StreamState {
            lines: BufReader::new(stdout).lines(),
            child,
        };

        let events = stream::unfold(Some(state), |state| async move {
            let mut state = state?;
            loop {
                match state.lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        return Some((Ok(parse_line(line)), Some(state)));
                    }
                    Ok(None) => {
                        return match state.child.wait().await {
                            Ok(status) if status.success() => None,
                            Ok(status) => Some((Err(RuntimeError::Exited(status.to_string())), None)),
                            Err(e) => Some((Err(RuntimeError::Io(e)), None)),
                        };
                    }
                    Err(e) => return Some((Err(RuntimeError::Io(e)), None)),
                }
            }
        });

        Ok(events.boxed())
    }
}

/// 回放预先录制的事件流
#[derive(Default)]
pub struct ScriptedRuntime {
    events: Vec<Value>,
    failure: Option<String>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedRuntime {
    pub fn new(events: Vec<Value>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    /// 回放结束后以传输错误终止
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// 从 stream-json 文本构造，每行一个事件
    pub fn from_transcript(transcript: &str) -> Self {
        Self::new(
            transcript
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(parse_line)
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn launch(&self, request: AgentRequest) -> Result<EventStream, RuntimeError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let mut items: Vec<Result<Value, RuntimeError>> =
            self.events.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.failure {
            items.push(Err(RuntimeError::Exited(message.clone())));
        }
        Ok(stream::iter(items).boxed())
    }
}
