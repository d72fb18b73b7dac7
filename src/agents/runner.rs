//! 消费运行时事件流，汇总一次代理调用
//!
//! 工具结果按 id 与对应的调用关联，只统计成功的写入；
//! 传输层错误只记录一次，是否继续上抛由调用方决定。

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use futures::StreamExt;
use rig::tool::Tool;

use super::AgentRole;
use crate::llm::events::{AgentEvent, TASK_TOOL, classify, subagent_name};
use crate::llm::mcp::local_name;
use crate::llm::runtime::{AgentRequest, AgentRuntime};
use crate::llm::tools::{
    LinkCompanyInvestor, SaveCompany, SaveConnection, SaveInvestor, SaveResearchSource,
    SaveSignal, UpdatePipeline,
};

/// 一次调用的汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub session_id: Option<String>,
    /// 非空的助手文本，按出现顺序
    pub transcript: Vec<String>,
    /// 被委派过的子代理，去重后按首次出现顺序
    pub subagents: Vec<String>,
    /// 已返回结果的子代理，按返回顺序
    pub completed_subagents: Vec<String>,
    pub tool_calls: usize,
    pub failed_tool_calls: usize,
    /// 每个写入工具成功的次数
    pub saves: BTreeMap<String, usize>,
    pub result: Option<String>,
    pub cost_usd: Option<f64>,
    pub errors: Vec<String>,
    pub fatal: Option<String>,
}

impl RunReport {
    pub fn saved(&self, tool: &str) -> usize {
        self.saves.get(tool).copied().unwrap_or(0)
    }

    pub fn total_saved(&self) -> usize {
        self.saves.values().sum()
    }

    /// 有致命错误时转为错误返回
    pub fn into_result(self, role: AgentRole) -> anyhow::Result<Self> {
        match &self.fatal {
            Some(fatal) => Err(anyhow::anyhow!("{} run failed: {}", role, fatal)),
            None => Ok(self),
        }
    }

    /// 各角色关心的计数
    pub fn highlights(&self, role: AgentRole) -> Vec<(&'static str, usize)> {
        match role {
            AgentRole::Prospector => vec![
                ("Signals found", self.saved(SaveSignal::NAME)),
                ("Companies found", self.saved(SaveCompany::NAME)),
            ],
            AgentRole::Researcher => vec![("Sources saved", self.saved(SaveResearchSource::NAME))],
            AgentRole::Connector => vec![
                ("Connections found", self.saved(SaveConnection::NAME)),
                ("Investors mapped", self.saved(SaveInvestor::NAME)),
            ],
            AgentRole::Orchestrator => vec![("Records saved", self.total_saved())],
        }
    }

    pub fn print_summary(&self, role: AgentRole) {
        println!("\n📊 {} Results", role);
        println!(
            "   Session: {}",
            self.session_id.as_deref().unwrap_or("unknown")
        );
        for (label, count) in self.highlights(role) {
            println!("   {}: {}", label, count);
        }
        if role == AgentRole::Orchestrator {
            println!("   Subagents used: {}", self.subagents.join(", "));
        }
        if let Some(cost) = self.cost_usd {
            println!("   Cost: ${:.4}", cost);
        }
        if !self.errors.is_empty() {
            println!("   ⚠️ Errors: {}", self.errors.join("; "));
        }
        if let Some(fatal) = &self.fatal {
            println!("   ❌ Fatal: {}", fatal);
        }
    }
}

/// 写入类工具：成功的结果计入 saves
pub fn is_write_tool(name: &str) -> bool {
    name.starts_with("save_") || name == LinkCompanyInvestor::NAME || name == UpdatePipeline::NAME
}

pub struct EventCollector {
    role: AgentRole,
    server: String,
    report: RunReport,
    /// 尚未收到结果的调用：id -> 本地工具名
    pending: HashMap<String, String>,
    /// 尚未返回的委派：Task 调用 id -> 子代理名
    delegations: HashMap<String, String>,
}

impl EventCollector {
    pub fn new(role: AgentRole, server: impl Into<String>) -> Self {
        Self {
            role,
            server: server.into(),
            report: RunReport::default(),
            pending: HashMap::new(),
            delegations: HashMap::new(),
        }
    }

    pub fn observe(&mut self, event: AgentEvent) {
        let role = self.role;
        match event {
            AgentEvent::SessionStarted { session_id, model } => {
                println!(
                    "🚀 [{}] Session started: {}",
                    role,
                    session_id.as_deref().unwrap_or("unknown")
                );
                tracing::debug!(?model, "session started");
                self.report.session_id = session_id;
            }
            AgentEvent::SubagentStarted { name } => {
                println!("\n🤝 [{}] Delegating to: {}", role, name);
                if !self.report.subagents.contains(&name) {
                    self.report.subagents.push(name);
                }
            }
            AgentEvent::SubagentEnded { name } => {
                println!("✅ [{}] {} completed", role, name);
                self.report.completed_subagents.push(name);
            }
            AgentEvent::AssistantText { text } => {
                if !text.trim().is_empty() {
                    println!("\n[{}] {}", role, text);
                    self.report.transcript.push(text);
                }
            }
            AgentEvent::ToolCall { id, name, input } => {
                let local = local_name(&self.server, &name).to_string();
                println!("   🔧 [{}] Tool: {}", role, local);
                self.report.tool_calls += 1;
                if let Some(id) = id {
                    if name == TASK_TOOL {
                        self.delegations.insert(id.clone(), subagent_name(&input));
                    }
                    self.pending.insert(id, local);
                }
            }
            AgentEvent::ToolResult {
                id,
                is_error,
                content,
            } => {
                // Task 的结果即子代理的返回
                let delegation = id.as_ref().and_then(|id| self.delegations.remove(id));
                let tool = id.and_then(|id| self.pending.remove(&id));
                if let Some(name) = delegation {
                    self.observe(AgentEvent::SubagentEnded { name });
                }
                if is_error {
                    self.report.failed_tool_calls += 1;
                    tracing::warn!(tool = ?tool, "tool call failed: {}", content);
                } else if let Some(tool) = tool.filter(|tool| is_write_tool(tool)) {
                    *self.report.saves.entry(tool).or_insert(0) += 1;
                }
            }
            AgentEvent::Completed => {
                println!("\n✅ [{}] All tasks completed", role);
            }
            AgentEvent::Result {
                subtype,
                result,
                cost_usd,
                is_error,
                session_id,
            } => {
                if let Some(result) = &result {
                    println!("\n🏁 [{}] Final Result: {}", role, result);
                }
                if is_error {
                    self.report.errors.push(
                        result
                            .clone()
                            .or(subtype)
                            .unwrap_or_else(|| "run ended with an error".to_string()),
                    );
                }
                self.report.result = result;
                self.report.cost_usd = cost_usd;
                if self.report.session_id.is_none() {
                    self.report.session_id = session_id;
                }
            }
            AgentEvent::Error { message } => {
                eprintln!("❌ [{}] Error: {}", role, message);
                self.report.errors.push(message);
            }
            AgentEvent::Unrecognized { kind } => {
                tracing::debug!(kind = %kind, "ignoring unrecognized runtime event");
            }
        }
    }

    /// 记录致命错误，只保留第一次
    pub fn fail(&mut self, error: impl Display) {
        if self.report.fatal.is_none() {
            eprintln!("❌ [{}] Fatal error: {}", self.role, error);
            self.report.fatal = Some(error.to_string());
        }
    }

    pub fn finish(self) -> RunReport {
        self.report
    }
}

/// 启动一次代理调用并消费完整个事件流
pub async fn run_agent(
    runtime: &dyn AgentRuntime,
    request: AgentRequest,
    role: AgentRole,
    server: &str,
) -> RunReport {
    let mut collector = EventCollector::new(role, server);

    match runtime.launch(request).await {
        Ok(mut events) => {
            while let Some(item) = events.next().await {
                match item {
                    Ok(value) => {
                        for event in classify(&value) {
                            collector.observe(event);
                        }
                    }
                    Err(e) => {
                        collector.fail(e);
                        break;
                    }
                }
            }
        }
        Err(e) => collector.fail(e),
    }

    collector.finish()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::llm::runtime::ScriptedRuntime;

    const SERVER: &str = "mpa-supabase";

    fn request() -> AgentRequest {
        AgentRequest {
            prompt: "Scan seafood".to_string(),
            system_prompt: "You are a prospector".to_string(),
            model: "claude-sonnet-4-5".to_string(),
            allowed_tools: vec![],
            agents: BTreeMap::new(),
            max_budget_usd: 1.0,
            permission_mode: "default".to_string(),
        }
    }

    fn tool_use(id: &str, name: &str) -> serde_json::Value {
        json!({"type": "assistant", "message": {"content": [
            {"type": "tool_use", "id": id, "name": format!("mcp__{}__{}", SERVER, name), "input": {}}
        ]}})
    }

    fn tool_result(id: &str, is_error: bool) -> serde_json::Value {
        json!({"type": "user", "message": {"content": [
            {"type": "tool_result", "tool_use_id": id, "is_error": is_error, "content": "ok"}
        ]}})
    }

    #[tokio::test]
    async fn test_saves_are_correlated_by_id() {
        let runtime = ScriptedRuntime::new(vec![
            json!({"type": "system", "subtype": "init", "session_id": "s-1"}),
            tool_use("a", "save_signal"),
            tool_use("b", "save_signal"),
            tool_use("c", "get_company"),
            tool_result("b", false),
            tool_result("a", true),
            tool_result("c", false),
            tool_result("unknown", false),
            json!({"type": "result", "subtype": "success", "result": "done", "total_cost_usd": 0.12}),
        ]);

        let report = run_agent(&runtime, request(), AgentRole::Prospector, SERVER).await;

        assert_eq!(report.session_id.as_deref(), Some("s-1"));
        assert_eq!(report.tool_calls, 3);
        assert_eq!(report.failed_tool_calls, 1);
        assert_eq!(report.saved("save_signal"), 1);
        assert_eq!(report.saved("get_company"), 0);
        assert_eq!(report.result.as_deref(), Some("done"));
        assert_eq!(report.cost_usd, Some(0.12));
        assert!(report.fatal.is_none());
    }

    #[tokio::test]
    async fn test_fatal_error_recorded_once() {
        let runtime = ScriptedRuntime::new(vec![
            json!({"type": "error", "error": "rate limited"}),
            json!({"type": "assistant", "message": {"content": "still working"}}),
        ])
        .failing_with("exit status: 1");

        let report = run_agent(&runtime, request(), AgentRole::Researcher, SERVER).await;

        assert_eq!(report.errors, vec!["rate limited".to_string()]);
        assert_eq!(report.transcript, vec!["still working".to_string()]);
        assert_eq!(
            report.fatal.as_deref(),
            Some("agent runtime exited with exit status: 1")
        );
        assert!(report.clone().into_result(AgentRole::Researcher).is_err());
    }

    #[test]
    fn test_subagents_deduplicated() {
        let mut collector = EventCollector::new(AgentRole::Orchestrator, SERVER);
        for name in ["prospector", "researcher", "prospector"] {
            collector.observe(AgentEvent::SubagentStarted {
                name: name.to_string(),
            });
        }
        collector.fail("first");
        collector.fail("second");

        let report = collector.finish();
        assert_eq!(report.subagents, vec!["prospector", "researcher"]);
        assert_eq!(report.fatal.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_task_result_ends_subagent() {
        let runtime = ScriptedRuntime::new(vec![
            json!({"type": "assistant", "message": {"content": [
                {"type": "tool_use", "id": "t1", "name": "Task",
                 "input": {"subagent_type": "researcher", "prompt": "Profile Acme"}}
            ]}}),
            tool_use("s1", "save_research_source"),
            tool_result("s1", false),
            tool_result("t1", false),
        ]);

        let report = run_agent(&runtime, request(), AgentRole::Orchestrator, SERVER).await;

        assert_eq!(report.subagents, vec!["researcher"]);
        assert_eq!(report.completed_subagents, vec!["researcher"]);
        assert_eq!(report.tool_calls, 2);
        assert_eq!(report.saved("save_research_source"), 1);
    }

    #[test]
    fn test_pending_delegation_tracked_until_result() {
        let mut collector = EventCollector::new(AgentRole::Orchestrator, SERVER);
        collector.observe(AgentEvent::ToolCall {
            id: Some("t1".to_string()),
            name: TASK_TOOL.to_string(),
            input: json!({"subagent_type": "connector"}),
        });
        assert_eq!(
            collector.delegations.get("t1").map(String::as_str),
            Some("connector")
        );

        collector.observe(AgentEvent::ToolResult {
            id: Some("t1".to_string()),
            is_error: false,
            content: "mapped".to_string(),
        });
        assert!(collector.delegations.is_empty());
        assert!(collector.pending.is_empty());
        assert_eq!(collector.finish().total_saved(), 0);
    }

    #[test]
    fn test_write_tools() {
        assert!(is_write_tool("save_company"));
        assert!(is_write_tool("link_company_investor"));
        assert!(is_write_tool("update_pipeline"));
        assert!(!is_write_tool("get_pipeline"));
        assert!(!is_write_tool("WebSearch"));
    }

    #[test]
    fn test_error_result_is_recorded() {
        let mut collector = EventCollector::new(AgentRole::Connector, SERVER);
        collector.observe(AgentEvent::Result {
            subtype: Some("error_max_budget_usd".to_string()),
            result: None,
            cost_usd: Some(1.5),
            is_error: true,
            session_id: Some("s-9".to_string()),
        });

        let report = collector.finish();
        assert_eq!(report.errors, vec!["error_max_budget_usd".to_string()]);
        assert_eq!(report.session_id.as_deref(), Some("s-9"));
        assert_eq!(
            report.highlights(AgentRole::Connector),
            vec![("Connections found", 0), ("Investors mapped", 0)]
        );
    }
}
