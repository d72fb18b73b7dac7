//! 协调者：接收任务，按需委派给三个专职子代理，并直接读写数据存储
//!
//! 命令行参数先解析为任务文本（固定模板或自定义任务），
//! 再连同子代理映射一起交给运行时。

use std::collections::BTreeMap;

use rig::tool::Tool;

use super::{AgentProfile, AgentRole, ModelTier, province_scope};
use crate::config::Config;
use crate::llm::events::TASK_TOOL;
use crate::llm::runtime::SubagentDefinition;
use crate::llm::tools::{
    GetCompany, GetPipeline, GetRecentSignals, LinkCompanyInvestor, ListCompanies, SaveCompany,
    SaveInvestor, SaveKeyPerson, SavePotentialAcquirer, SaveResearchSource, SaveSignal,
    UpdatePipeline,
};

pub const SYSTEM_PROMPT: &str = r#"You are the lead M&A deal intelligence coordinator for Morrison Park Advisors, managing a team of specialized AI agents focused on Atlantic Canada.

AGENCY MANDATE - MAXIMUM AUTONOMY:
You operate with FULL AUTONOMY. Execute ALL tasks proactively without asking for permission.

CRITICAL EXECUTION RULES:
1. LAUNCH SUBAGENTS IMMEDIATELY using the Task tool - do not describe what you would do
2. USE WebSearch and WebFetch DIRECTLY if you need information - never say you can't
3. SAVE ALL FINDINGS TO DATABASE IMMEDIATELY using save_company, save_signal, etc.
4. NEVER ask "Would you like me to...", "Should I...", "Do you want me to..."
5. NEVER say "I need permission", "I would need access", "I'm blocked"
6. NEVER present options or wait for user choice - just execute the best approach
7. If delegating to PROSPECTOR/RESEARCHER/CONNECTOR, USE the Task tool NOW
8. Complete the ENTIRE mission autonomously and report results at the end

DATABASE WORKFLOW:
- When you find a new company: IMMEDIATELY call save_company with all available data
- When you detect a signal: IMMEDIATELY call save_signal with source URL
- When you find key people: IMMEDIATELY call save_key_person
- When you identify acquirers: IMMEDIATELY call save_potential_acquirer
- After saving: call update_pipeline to track the opportunity
- DO NOT wait for permission to save - you have full database access

SUBAGENT DELEGATION:
When you need to scan for signals, research companies, or map connections:
- Call the Task tool with the appropriate agent (prospector, researcher, connector)
- Provide a detailed task description in the prompt
- The subagent will execute and return results
- DO NOT describe what the subagent would do - LAUNCH IT

YOUR ROLE:
- Understand Ken Skinner's current priorities
- Route research tasks to appropriate specialized agents
- Synthesize findings into actionable recommendations
- Maintain the deal pipeline

YOUR AGENT TEAM:

1. PROSPECTOR AGENT (use for broad scanning)
- Scans news for transaction signals
- Builds market maps
- Identifies new prospects
- Model: Haiku (for speed) or Sonnet (for depth)

2. RESEARCHER AGENT (use for deep dives)
- Comprehensive company profiles
- Validates claims and conducts diligence
- Competitive analysis
- Comparable transactions
- Model: Sonnet (always)

3. CONNECTOR AGENT (use for relationship mapping)
- Maps investor networks
- Finds board connections
- Identifies warm intro paths
- Model: Sonnet (always)

TASK ROUTING GUIDELINES:

Route to PROSPECTOR when:
- "Find companies with signals in [industry]"
- "Scan for sell-side/buy-side/growth signals"
- "Build a market map for [sector]"
- "Who's looking to sell in [province]?"

Route to RESEARCHER when:
- "Deep dive on [company]"
- "Research [company] comprehensively"
- "Validate claims about [company]"
- "Find comparable transactions for [company]"
- "Update our research on [company]"

Route to CONNECTOR when:
- "Find connections to [company]"
- "Who can introduce us to [company]?"
- "Map the investor network for [company]"
- "Find board connections in [industry]"

PIPELINE MANAGEMENT:
- Prospect: Just identified, needs research
- Researching: Deep dive in progress
- Outreach: Ready for Ken to reach out
- Engaged: In discussions
- Active Deal: Mandate in progress
- Closed: Deal completed
- Passed: Not pursuing

OUTPUT FORMAT:
- Summarize findings clearly
- Highlight actionable items
- Note confidence levels
- List next steps
- Update pipeline appropriately

ATLANTIC CANADA CONTEXT:
- Nova Scotia (NS), New Brunswick (NB), PEI, Newfoundland & Labrador (NL)
- Mid-market focus: $10M-$500M revenue
- Family businesses are common
- Relationships matter more than in larger markets
- Regional pride is important"#;

pub static PROFILE: AgentProfile = AgentProfile {
    role: AgentRole::Orchestrator,
    description: "Main coordinator for M&A deal intelligence system",
    system_prompt: SYSTEM_PROMPT,
    subagent_model: ModelTier::Sonnet,
    builtin_tools: &["WebSearch", "WebFetch", TASK_TOOL],
    datastore_tools: &[
        ListCompanies::NAME,
        GetCompany::NAME,
        GetPipeline::NAME,
        GetRecentSignals::NAME,
        SaveCompany::NAME,
        SaveSignal::NAME,
        SaveKeyPerson::NAME,
        SaveResearchSource::NAME,
        SavePotentialAcquirer::NAME,
        SaveInvestor::NAME,
        LinkCompanyInvestor::NAME,
        UpdatePipeline::NAME,
    ],
};

pub const USAGE: &str = r#"
MPA Deal Intelligence - Multi-Agent System

Usage:
  mpa-deal-intel orchestrate --prospect                    Daily prospecting run
  mpa-deal-intel orchestrate --research "Company Name"    Research a company
  mpa-deal-intel orchestrate --market-map "Industry" [Province]   Build market map
  mpa-deal-intel orchestrate --intro "Company Name"       Find introduction path
  mpa-deal-intel orchestrate --pipeline                   Pipeline review
  mpa-deal-intel orchestrate "Custom task description"    Custom task

Examples:
  mpa-deal-intel orchestrate --research "Imperial Manufacturing Group"
  mpa-deal-intel orchestrate --market-map "Manufacturing" "NS"
  mpa-deal-intel orchestrate "Find companies with succession signals in the seafood industry"
"#;

/// 每日扫描：搜索、保存公司与信号、更新管线
pub fn daily_prospecting() -> String {
    r#"
Run DAILY PROSPECTING for Atlantic Canada M&A opportunities.

EXECUTE IMMEDIATELY - DO NOT ASK PERMISSION:

Step 1: Use WebSearch to scan for recent Atlantic Canada business news:
- Search: "Atlantic Canada business acquisition 2024 2025"
- Search: "Nova Scotia company sold retirement succession"
- Search: "New Brunswick business expansion growth"

Step 2: For each promising result, use WebFetch to extract details.

Step 3: SAVE EACH COMPANY TO DATABASE using save_company tool:
- Include name, location, industry, revenue estimate, employee count
- Calculate succession scores (owner_age_score, tenure_score, next_gen_score, legacy_score, activity_score)
- Set ownership_type and deal_readiness

Step 4: SAVE EACH SIGNAL using save_signal tool:
- Include signal_type (sell_side, buy_side, growth, leadership, financial, strategic)
- Include source_url (REQUIRED), confidence level, and details

Step 5: UPDATE PIPELINE using update_pipeline tool:
- Stage: "prospect"
- Priority: 1-5 based on succession score
- Add notes about the opportunity

Step 6: Report summary of what was found and saved.

Focus: Mid-market companies ($10M-$500M revenue) in Nova Scotia and New Brunswick.

DO NOT ask for permission. DO NOT present options. Execute searches AND save to database NOW.
"#.to_string()
}

pub fn research_company(company_name: &str) -> String {
    format!(
        r#"
Conduct COMPREHENSIVE RESEARCH on {company_name}.

Tasks:
1. Use the RESEARCHER to do a full deep dive on the company
2. Use the CONNECTOR to map all relationship/introduction paths
3. Synthesize findings into deal thesis
4. Update pipeline appropriately

Deliver:
- Executive summary
- Succession assessment
- Deal hypothesis
- Best introduction path
- Recommended next steps
"#
    )
}

pub fn build_market_map(industry: &str, province: Option<&str>) -> String {
    let scope = province_scope(province);
    format!(
        r#"
Build a COMPREHENSIVE MARKET MAP for {industry}{scope}.

Tasks:
1. Use PROSPECTOR to identify all major players
2. Use RESEARCHER to profile top 10 by size
3. Use CONNECTOR to map shared investors and board connections
4. Identify consolidation opportunities

Deliver:
- Market structure overview
- Key players ranked by size
- Ownership patterns
- Shared investor network
- Board connections
- Top 3 M&A opportunities
- Recommended next steps
"#
    )
}

/// 由 connector 与 researcher 协作，给出最佳引荐路径
pub fn find_intro_path(company_name: &str) -> String {
    format!(
        r#"
Find the BEST INTRODUCTION PATH to {company_name}.

Tasks:
1. Use CONNECTOR to map all possible connection types
2. Use RESEARCHER to profile key decision makers
3. Rank introduction options by quality
4. Recommend approach strategy

Deliver:
- Decision maker profiles
- All connection paths found
- Recommended introduction approach
- Conversation starters
- What Ken should know before reaching out
"#
    )
}

pub fn pipeline_review() -> String {
    r#"
Conduct a PIPELINE REVIEW.

Tasks:
1. Get current pipeline status
2. For each company in "researching" stage:
   - Check for any new signals or developments
   - Update status if needed
3. Identify stale prospects (no activity 30+ days)
4. Recommend priority actions

Deliver:
- Pipeline summary by stage
- Top priorities for this week
- Companies needing attention
- Recommended next actions
"#.to_string()
}

/// 选择固定任务模板的选项；这些任务总是交给协调者
pub const TEMPLATE_FLAGS: [&str; 5] = [
    "--prospect",
    "--research",
    "--market-map",
    "--intro",
    "--pipeline",
];

/// 参数是否选择了固定模板，而不是自定义任务
pub fn is_template(args: &[String]) -> bool {
    args.first().is_some_and(|first| TEMPLATE_FLAGS.contains(&first.as_str()))
}

/// 把 `orchestrate` 的参数解析为任务文本
///
/// 没有参数，或固定选项缺少必需的值时返回 `None`，调用方打印用法。
/// 其余参数整体视为自定义任务，以空格拼接。
pub fn resolve_task(args: &[String]) -> Option<String> {
    let (first, rest) = args.split_first()?;
    let value = |index: usize| rest.get(index).map(String::as_str).filter(|v| !v.is_empty());

    match first.as_str() {
        "--prospect" => Some(daily_prospecting()),
        "--research" => value(0).map(research_company),
        "--market-map" => value(0).map(|industry| build_market_map(industry, value(1))),
        "--intro" => value(0).map(find_intro_path),
        "--pipeline" => Some(pipeline_review()),
        _ => {
            let task = args.join(" ");
            (!task.trim().is_empty()).then_some(task)
        }
    }
}

/// 协调者可委派的子代理：描述、系统提示词、带前缀的工具列表、模型档位
pub fn subagents(config: &Config) -> BTreeMap<String, SubagentDefinition> {
    AgentRole::WORKERS
        .iter()
        .map(|role| {
            let profile = role.profile();
            (
                role.key().to_string(),
                SubagentDefinition {
                    description: profile.description.to_string(),
                    prompt: profile.system_prompt.to_string(),
                    tools: profile.allowed_tools(&config.agent.tool_server_name),
                    model: profile.subagent_model.alias().to_string(),
                },
            )
        })
        .collect()
}
