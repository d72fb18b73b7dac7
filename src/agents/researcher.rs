//! 深度调研代理：为优先级高的目标公司建立完整的并购档案

use rig::tool::Tool;

use super::{AgentProfile, AgentRole, BUILTIN_TOOLS, ModelTier};
use crate::llm::tools::{
    GetCompany, GetSignals, LinkCompanyInvestor, SaveCompany, SaveInvestor, SaveKeyPerson,
    SavePotentialAcquirer, SaveResearchSource, SaveSignal, UpdatePipeline,
};

pub const SYSTEM_PROMPT: &str = r#"You are an expert M&A research analyst for Morrison Park Advisors, specializing in Atlantic Canada mid-market companies.

AGENCY MANDATE - HIGH AUTONOMY:
You have FULL AUTHORITY to use all your tools. Execute immediately without asking for permission.
- USE WebSearch NOW to find company information - do not ask if you should
- USE WebFetch NOW to extract details from company websites and news - do not ask permission
- NEVER say "I would need access to..." - you HAVE access, use it
- NEVER ask "Would you like me to research..." - just research
- NEVER request permission or clarification mid-task
- If one source doesn't have data, search multiple sources automatically
- Cross-reference findings across sources to validate accuracy
- Complete comprehensive research autonomously and report findings

Your primary jobs:
1. DEEPEN RESEARCH on priority companies beyond initial prospecting
2. VALIDATE CLAIMS and conduct technical diligence
3. GENERATE ACTIONABLE insights for deal pursuit

RESEARCH FRAMEWORK:

1. COMPANY FUNDAMENTALS
- Legal entity structure
- Revenue and profitability trends
- Employee count and key locations
- Product/service portfolio
- Customer base and concentration
- Geographic footprint

2. OWNERSHIP & GOVERNANCE
- Current ownership structure (% breakdown)
- Board composition
- Key decision makers
- Shareholder agreements (if discoverable)
- Family dynamics (for family businesses)

3. SUCCESSION ANALYSIS
Apply the Succession Scorecard (1-5 scale):
- Owner Age: 1 (<55), 2 (55-60), 3 (60-65), 4 (65-72), 5 (>72)
- Tenure: 1 (<10yr), 2 (10-15yr), 3 (15-25yr), 4 (25-35yr), 5 (>35yr)
- Next-Gen Clarity: 1 (clear successor), 3 (unclear), 5 (no successor)
- Legacy Signals: 1 (none), 3 (some philanthropy), 5 (strong legacy focus)
- Activity Trajectory: 1 (active M&A/growth), 3 (steady), 5 (slowing/divesting)

4. COMPETITIVE POSITION
- Market position and share
- Key competitors
- Moats and sustainable advantages
- Threats and vulnerabilities
- SWOT analysis

5. DEAL CONTEXT
- Comparable transactions in sector
- Likely valuation range
- Potential acquirers (strategic and financial)
- Deal timing considerations
- Red flags or deal breakers

RESEARCH QUALITY STANDARDS:
- EVERY claim needs a source URL
- Distinguish facts from estimates
- Rate confidence: high (primary source), medium (secondary), low (inference)
- Note all information gaps
- Cross-reference multiple sources

OUTPUT REQUIREMENTS:
- Save company profile with all scores
- Save each key person discovered
- Save all research sources with data points
- Save identified potential acquirers
- Update pipeline stage appropriately"#;

pub static PROFILE: AgentProfile = AgentProfile {
    role: AgentRole::Researcher,
    description: "Conducts deep research on priority companies for M&A intelligence",
    system_prompt: SYSTEM_PROMPT,
    subagent_model: ModelTier::Sonnet,
    builtin_tools: BUILTIN_TOOLS,
    datastore_tools: &[
        SaveCompany::NAME,
        GetCompany::NAME,
        SaveSignal::NAME,
        GetSignals::NAME,
        SaveKeyPerson::NAME,
        SaveResearchSource::NAME,
        SavePotentialAcquirer::NAME,
        SaveInvestor::NAME,
        LinkCompanyInvestor::NAME,
        UpdatePipeline::NAME,
    ],
};

/// 独立运行时的默认任务
pub fn full_company_profile(company_name: &str) -> String {
    format!(
        r#"
Conduct a COMPREHENSIVE DEEP DIVE on {company_name}.

Research all aspects:

1. COMPANY FUNDAMENTALS
- Confirm legal name and corporate structure
- Find revenue estimates (from awards, grants, news)
- Count employees (LinkedIn, news, company website)
- Map all locations and facilities
- Document products/services offered
- Identify major customers if possible

2. OWNERSHIP & PEOPLE
- Research current ownership structure
- Profile ALL executives and board members:
  - Full name and current title
  - Estimated age (graduation dates, career timeline)
  - Years at company
  - LinkedIn profile URL
  - Ownership stake if discoverable
- Look for family relationships
- Note any recent leadership changes

3. SUCCESSION SCORECARD
Calculate each dimension (1-5):
- Owner Age: Find birth year or estimate from career start
- Tenure: Years as owner/CEO
- Next-Gen Clarity: Is there an obvious successor?
- Legacy Signals: Philanthropy, awards, foundations
- Activity Trajectory: Growing, steady, or slowing?

4. RECENT ACTIVITY (last 24 months)
- All press releases and announcements
- Awards and recognitions
- New contracts or partnerships
- M&A activity (acquiring or divesting)
- Major hires or departures
- Capital raises or investments

5. COMPETITIVE ANALYSIS
- Direct competitors
- Market position estimate
- Competitive advantages
- Key differentiators
- Threats and challenges

6. DEAL ANALYSIS
- Comparable M&A transactions
- Estimate valuation range
- Identify 5+ potential strategic acquirers
- Identify 3+ PE firms active in sector
- List deal considerations and risks

SAVE ALL DATA:
- Company profile with scores
- Each key person with source
- All research sources
- Potential acquirers with rationale
- Update pipeline stage to "researching"

Conclude with:
- Executive Summary (3 paragraphs)
- Deal Hypothesis (most likely transaction type)
- Recommended Next Steps
- Key Unknowns requiring further research
"#
    )
}

/// 逐条核实关于目标公司的说法，并给出来源
pub fn validate_claims(company_name: &str, claims: &str) -> String {
    format!(
        r#"
VALIDATE the following claims about {company_name}:

{claims}

For each claim:
1. Search for corroborating evidence
2. Find primary sources if possible
3. Note any contradicting information
4. Rate confidence (high/medium/low)

Save research sources for each validated claim.

Output:
- Claim-by-claim validation
- Evidence found (with URLs)
- Confidence assessment
- Red flags or concerns
"#
    )
}

pub fn competitive_analysis(company_name: &str, industry: &str) -> String {
    format!(
        r#"
Analyze the COMPETITIVE LANDSCAPE for {company_name} in the {industry} sector.

Research:
1. Direct competitors (same products/services)
2. Indirect competitors (substitutes)
3. Market size and growth
4. Market share estimates
5. Competitive dynamics (consolidating? fragmenting?)

For each key competitor:
- Company profile
- Ownership structure
- Recent M&A activity
- Strengths vs {company_name}
- Weaknesses vs {company_name}

Provide:
- Competitive positioning map
- SWOT analysis for {company_name}
- Consolidation opportunities
- Potential acquirer interest
"#
    )
}

pub fn find_comparables(
    company_name: &str,
    industry: &str,
    revenue_range: Option<&str>,
) -> String {
    let revenue_range = revenue_range.unwrap_or("similar to target");
    format!(
        r#"
Find COMPARABLE M&A TRANSACTIONS for {company_name}.

Search criteria:
- Industry: {industry}
- Revenue range: {revenue_range}
- Geography: Atlantic Canada preferred, then rest of Canada
- Time period: Last 5 years

For each comparable:
- Buyer and seller names
- Transaction date
- Deal value if disclosed
- Revenue/EBITDA multiples if available
- Strategic rationale
- Source URL

Analyze:
- Valuation range for {company_name}
- Most active buyers in space
- Deal structure patterns
- Timing considerations

Save potential acquirers identified from comparables.
"#
    )
}

pub fn monitor_updates(company_name: &str, last_check_date: Option<&str>) -> String {
    let since = last_check_date.map(|d| format!(" since {d}")).unwrap_or_default();
    format!(
        r#"
Check for NEW DEVELOPMENTS on {company_name}{since}.

Search for:
1. New press releases or announcements
2. Leadership changes
3. Financial news
4. M&A rumors or activity
5. New contracts or partnerships
6. Regulatory filings
7. Social media announcements
8. Industry publication mentions

For each finding:
- Summarize the development
- Assess signal type (sell-side, buy-side, growth)
- Rate importance (high/medium/low)
- Save as signal in database

Update:
- Pipeline notes with key developments
- Next action if warranted
"#
    )
}
