//! 信号扫描代理：在新闻与公开来源中发现出现并购信号的大西洋加拿大公司

use rig::tool::Tool;

use super::{AgentProfile, AgentRole, BUILTIN_TOOLS, ModelTier, province_scope};
use crate::llm::tools::{
    GetCompany, GetRecentSignals, LinkCompanyInvestor, ListCompanies, SaveCompany, SaveInvestor,
    SaveResearchSource, SaveSignal, UpdatePipeline,
};

pub const SYSTEM_PROMPT: &str = r#"You are a specialized M&A prospecting agent for Morrison Park Advisors, focused on Atlantic Canada (Nova Scotia, New Brunswick, PEI, Newfoundland & Labrador).

AGENCY MANDATE - HIGH AUTONOMY:
You have FULL AUTHORITY to use all your tools. Execute immediately without asking for permission.
- USE WebSearch NOW to scan news sources - do not ask if you should
- USE WebFetch NOW to extract details from URLs - do not ask permission
- NEVER say "I would need access to..." - you HAVE access, use it
- NEVER ask "Should I search for..." - just search
- NEVER request permission or clarification mid-task
- If a search returns no results, try different queries automatically
- Complete the full mission autonomously and report findings

Your primary jobs:
1. FIND COMPANIES with transaction signals
2. BUILD MARKET MAPS showing industry patterns
3. IDENTIFY warm introduction paths

SIGNAL TYPES TO DETECT:

SELL-SIDE SIGNALS (company may want to sell):
- Owner age indicators: 60+ years old (check bios, LinkedIn, awards)
- Long tenure: Founded 20+ years ago, same leadership
- No successor: No family members in executive roles, no "next generation" mentions
- Legacy signals: Philanthropy, foundations, community awards, "lifetime achievement"
- Activity trajectory: Divesting divisions, slowing new initiatives, "winding down" language

BUY-SIDE SIGNALS (company looking to acquire):
- M&A announcements: "strategic acquisition", "platform for growth"
- BD/Corp Dev hires: New VP of Business Development, Corporate Development roles
- CEO strategic vision: "roll-up strategy", "consolidation opportunity"
- PE backing: New PE investment with "buy and build" thesis

GROWTH SIGNALS (company may need capital):
- New contracts: Major customer wins, offtake agreements (like BASF/Sustane)
- Expansion announcements: New facilities, geographic expansion, hiring sprees
- "Fastest growing" lists: Atlantic Business Magazine, etc.
- Capital-intensive projects: Technology investments, equipment purchases

ATLANTIC CANADA CONTEXT:
- Smaller market where relationships matter significantly
- Many family-held businesses spanning generations
- Strong regional identity ("Maritimer" vs. "come from away")
- Seasonal industries (fishing, tourism) have different cycles
- Government/university connections often relevant (ACOA, Dalhousie, etc.)

CRITICAL REQUIREMENTS:
1. EVERY data point MUST have a source URL
2. Rate confidence honestly (high/medium/low)
3. Note information gaps explicitly
4. Focus on mid-market companies ($10M-$500M revenue)

When you detect signals, save them to the database with all required fields."#;

pub static PROFILE: AgentProfile = AgentProfile {
    role: AgentRole::Prospector,
    description: "Scans news and sources for Atlantic Canada companies showing M&A transaction signals",
    system_prompt: SYSTEM_PROMPT,
    subagent_model: ModelTier::Haiku,
    builtin_tools: BUILTIN_TOOLS,
    datastore_tools: &[
        SaveCompany::NAME,
        GetCompany::NAME,
        ListCompanies::NAME,
        SaveSignal::NAME,
        GetRecentSignals::NAME,
        SaveInvestor::NAME,
        LinkCompanyInvestor::NAME,
        UpdatePipeline::NAME,
        SaveResearchSource::NAME,
    ],
};

/// 按行业（可选省份）扫描卖方信号
pub fn scan_industry_for_sell_side(industry: &str, province: Option<&str>) -> String {
    let scope = province.map_or_else(
        || " across Atlantic Canada".to_string(),
        |p| format!(" in {p}"),
    );
    format!(
        r#"
Scan for SELL-SIDE signals in the {industry} industry{scope}.

Look for companies showing signs they may want to sell:
1. Owners approaching retirement (60+)
2. Founding families with no clear successor
3. Recent philanthropy or legacy activities
4. Slowing business activity or divestitures

For each company found:
- Save the company profile with succession scores
- Save each signal with source URL
- Add to pipeline as "prospect" with appropriate priority

Search sources:
- Atlantic Business Magazine
- Local business news (Chronicle Herald, Telegraph-Journal, etc.)
- Press releases mentioning "founder", "retirement", "succession"
- Award announcements (lifetime achievement, community service)
"#
    )
}

/// 扫描正在收购或准备收购的买方
pub fn scan_for_buy_side(region: Option<&str>) -> String {
    let region = region.unwrap_or("Atlantic Canada");
    format!(
        r#"
Scan for BUY-SIDE signals in {region}.

Look for companies actively acquiring or positioning for acquisition:
1. Recent M&A announcements
2. New VP of Business Development or Corp Dev hires
3. PE-backed companies with platform thesis
4. CEOs discussing "consolidation" or "roll-up" strategy

For each company found:
- Save company profile
- Save buy-side signals with source URL
- Note recent acquisition activity
- Add to pipeline as "prospect" (buy-side client type)

Search sources:
- Press releases with "acquisition", "strategic investment"
- LinkedIn job postings for BD/Corp Dev roles
- Private equity announcements
- Industry consolidation news
"#
    )
}

pub fn scan_for_growth_signals(industry: Option<&str>) -> String {
    let focus = industry.map_or_else(
        || "Atlantic Canada".to_string(),
        |i| format!("the {i} sector"),
    );
    format!(
        r#"
Scan for GROWTH signals in {focus}.

Look for fast-growing companies that may need capital:
1. Major new contracts or partnerships
2. Expansion announcements (new facilities, geographic)
3. "Fastest growing" list appearances
4. Capital-intensive projects underway

For each company found:
- Save company profile with revenue/employee estimates
- Save growth signals with source URL
- Note capital needs indicators
- Add to pipeline as "prospect" (growth_capital client type)

Search sources:
- Fastest growing company lists
- Contract/partnership announcements
- Expansion and hiring news
- Technology/equipment investments
"#
    )
}

pub fn build_market_map(industry: &str, province: Option<&str>) -> String {
    let scope = province_scope(province);
    format!(
        r#"
Build a MARKET MAP for the {industry} industry{scope}.

Create a comprehensive view of:
1. All major players (companies over $10M revenue)
2. Ownership structure of each (family, PE-backed, strategic)
3. Recent M&A activity in the sector
4. Shared investors across companies
5. Board connections between companies

For each company:
- Save company profile
- Save investors and link to companies
- Note any shared investor patterns (like Sustane/Oberland/Sustainable Blue)
- Identify consolidation trends

Output a summary showing:
- Market structure
- Key players by size
- Ownership patterns
- Consolidation opportunities
- Potential acquirers interested in the space
"#
    )
}

pub fn research_company_signals(company_name: &str) -> String {
    format!(
        r#"
Research {company_name} for M&A transaction signals.

Conduct deep research to find:
1. Ownership structure and key people
2. Recent news and announcements
3. Any sell-side signals (owner age, succession issues)
4. Any buy-side signals (M&A activity)
5. Any growth signals (expansion, capital needs)
6. Investor relationships

Save all findings:
- Company profile with succession scores
- All detected signals with source URLs
- Key people with ownership %
- Research sources with confidence levels

Provide analysis:
- Transaction readiness assessment
- Most likely deal type (sell-side, buy-side, growth)
- Recommended next steps
"#
    )
}

/// 独立运行时的默认任务
pub fn default_task() -> String {
    scan_industry_for_sell_side("manufacturing", Some("NS"))
}
