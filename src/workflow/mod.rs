use crate::agents::orchestrator::{self, USAGE};
use crate::agents::runner::{RunReport, run_agent};
use crate::agents::{AgentRole, ModelTier, connector, prospector, researcher, router};
use crate::cli::Command;
use crate::config::Config;
use crate::llm::mcp::ToolServer;
use crate::llm::runtime::{AgentRequest, AgentRuntime, ClaudeCodeRuntime, ToolServerLaunch};
use crate::llm::tools::ToolKit;
use crate::store::PostgrestStore;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// 专职代理的调用请求
pub fn worker_request(
    config: &Config,
    role: AgentRole,
    task: String,
    model: ModelTier,
) -> AgentRequest {
    let profile = role.profile();
    AgentRequest {
        prompt: task,
        system_prompt: profile.system_prompt.to_string(),
        model: config.model_id(model).to_string(),
        allowed_tools: profile.allowed_tools(&config.agent.tool_server_name),
        agents: BTreeMap::new(),
        max_budget_usd: config.budget(role),
        permission_mode: config.agent.permission_mode.clone(),
    }
}

/// 协调者的调用请求，附带三个子代理
pub fn orchestrator_request(config: &Config, task: String) -> AgentRequest {
    let profile = AgentRole::Orchestrator.profile();
    AgentRequest {
        prompt: task,
        system_prompt: profile.system_prompt.to_string(),
        model: config.model_id(ModelTier::Sonnet).to_string(),
        allowed_tools: profile.allowed_tools(&config.agent.tool_server_name),
        agents: orchestrator::subagents(config),
        max_budget_usd: config.budget(AgentRole::Orchestrator),
        permission_mode: config.agent.permission_mode.clone(),
    }
}

/// 运行一个专职代理；致命错误记入汇总，不向上抛出
pub async fn run_worker(
    runtime: &dyn AgentRuntime,
    config: &Config,
    role: AgentRole,
    task: String,
    model: ModelTier,
) -> RunReport {
    println!("🤖 Starting {}...", role);
    let request = worker_request(config, role, task, model);
    let report = run_agent(runtime, request, role, &config.agent.tool_server_name).await;
    report.print_summary(role);
    report
}

/// 运行协调者；致命错误向上抛出
pub async fn run_orchestrator(
    runtime: &dyn AgentRuntime,
    config: &Config,
    task: String,
) -> Result<RunReport> {
    let role = AgentRole::Orchestrator;
    println!("🤖 Starting {}...", role);
    let request = orchestrator_request(config, task);
    let report = run_agent(runtime, request, role, &config.agent.tool_server_name).await;
    report.print_summary(role);
    report.into_result(role)
}

/// 解析 orchestrate 参数并运行；参数为空时打印用法并返回 `None`
///
/// `direct` 为真且任务为自定义文本时先查本地路由表，命中则跳过协调者直接运行对应代理。
/// 固定模板需要多个子代理协作，始终交给协调者。
pub async fn orchestrate(
    runtime: &dyn AgentRuntime,
    config: &Config,
    args: &[String],
    direct: bool,
) -> Result<Option<RunReport>> {
    let Some(task) = orchestrator::resolve_task(args) else {
        println!("{}", USAGE);
        return Ok(None);
    };

    if direct && !orchestrator::is_template(args) {
        if let Some(role) = router::route(&task) {
            tracing::info!(role = %role, "routing task directly to worker");
            let report = run_worker(runtime, config, role, task, ModelTier::Sonnet).await;
            return Ok(Some(report));
        }
        tracing::info!("no routing rule matched, falling back to orchestrator");
    }

    run_orchestrator(runtime, config, task).await.map(Some)
}

/// 运行时回连本进程工具服务的方式：同一可执行文件的 serve-tools 子命令
pub fn tool_server_launch(config: &Config) -> Result<ToolServerLaunch> {
    let command = std::env::current_exe().context("Failed to locate current executable")?;

    let mut args = Vec::new();
    if let Some(path) = &config.config_path {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
        args.push("--config".to_string());
        args.push(path.to_string_lossy().to_string());
    }
    args.push("serve-tools".to_string());

    Ok(ToolServerLaunch {
        name: config.agent.tool_server_name.clone(),
        command,
        args,
    })
}

async fn serve_tools(config: &Config) -> Result<()> {
    let store =
        PostgrestStore::new(&config.datastore).context("Failed to build datastore client")?;
    let toolkit = ToolKit::new(Arc::new(store));
    ToolServer::new(toolkit, config.agent.tool_server_name.clone())
        .serve_stdio()
        .await
}

fn claude_runtime(config: &Config) -> Result<ClaudeCodeRuntime> {
    Ok(ClaudeCodeRuntime::new(
        config.agent.runtime_binary.clone(),
        tool_server_launch(config)?,
    ))
}

/// 启动命令对应的工作流
pub async fn launch(config: &Config, command: Command) -> Result<()> {
    let started = Instant::now();

    match command {
        Command::ServeTools => return serve_tools(config).await,
        Command::Orchestrate { direct, args } => {
            let runtime = claude_runtime(config)?;
            if orchestrate(&runtime, config, &args, direct).await?.is_none() {
                return Ok(());
            }
        }
        Command::Prospect { model, task } => {
            let runtime = claude_runtime(config)?;
            let task = task.unwrap_or_else(prospector::default_task);
            run_worker(&runtime, config, AgentRole::Prospector, task, model).await;
        }
        Command::Research { company } => {
            let runtime = claude_runtime(config)?;
            let task = researcher::full_company_profile(&company);
            run_worker(&runtime, config, AgentRole::Researcher, task, ModelTier::Sonnet).await;
        }
        Command::Connect { company } => {
            let runtime = claude_runtime(config)?;
            let task = connector::find_connections_to_company(&company);
            run_worker(&runtime, config, AgentRole::Connector, task, ModelTier::Sonnet).await;
        }
    }

    println!("\n⏱️ Total time: {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}

// Include tests
#[cfg(test)]
mod tests;
