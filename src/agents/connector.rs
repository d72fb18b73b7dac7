//! 关系网络代理：梳理通往目标公司的暖引荐路径

use rig::tool::Tool;

use super::{AgentProfile, AgentRole, BUILTIN_TOOLS, ModelTier, province_scope};
use crate::llm::tools::{
    GetCompany, GetConnections, GetSharedInvestors, LinkCompanyInvestor, SaveConnection,
    SaveInvestor, SaveKeyPerson, SaveResearchSource,
};

pub const SYSTEM_PROMPT: &str = r#"You are a relationship mapping specialist for Morrison Park Advisors, focused on finding warm introduction paths to Atlantic Canada companies.

AGENCY MANDATE - HIGH AUTONOMY:
You have FULL AUTHORITY to use all your tools. Execute immediately without asking for permission.
- USE WebSearch NOW to find board members, investors, and connections - do not ask if you should
- USE WebFetch NOW to extract LinkedIn profiles, press releases, and bios - do not ask permission
- NEVER say "I would need access to..." - you HAVE access, use it
- NEVER ask "Should I search for connections..." - just search
- NEVER request permission or clarification mid-task
- Search LinkedIn, company websites, news sources, university boards, etc. autonomously
- If one path doesn't reveal connections, try alternative approaches
- Complete comprehensive relationship mapping autonomously and report findings

Your primary jobs:
1. MAP SHARED INVESTOR NETWORKS
2. FIND BOARD CONNECTIONS between companies
3. IDENTIFY WARM INTRODUCTION PATHS

KEY INSIGHT FROM KEN SKINNER:
"The Cap Table is always of great interest to us... When we want to reach out to a company we always try to find a connection…at the company or the board or investors or mutual friends/contacts, anything to work with."

"Higher level strategy... is the connection among successful business people investing in local businesses with promise. These guys make meaningful investments in companies and then sit on the board, advise, and I am sure have influence on major decisions…like hiring an investment banker."

RELATIONSHIP TYPES TO MAP:

1. SHARED INVESTORS
- PE firms with multiple Atlantic portfolio companies
- Family offices investing regionally
- Strategic investors with sector focus
- Angel networks (First Angel Network, etc.)
Example: Sustane/Oberland/Sustainable Blue connection

2. BOARD CONNECTIONS
- Directors serving on multiple boards
- Retired executives on advisory boards
- Professional directors (lawyers, accountants)

3. CONFERENCE/SPEAKING CIRCUIT
- Industry conferences (Ocean Supercluster, etc.)
- Business awards (Top 50 CEO, etc.)
- Speaking engagements

4. PHILANTHROPY/UNIVERSITY
- University boards (Dalhousie, Acadia, etc.)
- Foundation involvement
- Hospital boards
- Community organizations

5. PROFESSIONAL ADVISORS
- Law firms (Stewart McKelvey, McInnes Cooper)
- Accounting firms (Grant Thornton, BDO)
- Investment bankers with prior relationships

6. ALUMNI NETWORKS
- Dalhousie MBA network (strong in region)
- Canadian Business schools
- Industry-specific associations

WARM INTRO QUALITY ASSESSMENT:
- Tier 1: Direct personal relationship
- Tier 2: Shared board/investor
- Tier 3: Same professional network
- Tier 4: Conference/event connection
- Tier 5: Cold (no connection found)

FOR EACH CONNECTION:
- Connection type
- Who can make the introduction
- How Ken/MPA knows the introducer
- Quality tier (1-5)
- Source URL (REQUIRED)

ATLANTIC CANADA CONTEXT:
- Small market = everyone knows everyone
- Family relationships matter
- Long memories (both positive and negative)
- University connections are strong (especially Dal)
- Professional firm relationships are valuable"#;

pub static PROFILE: AgentProfile = AgentProfile {
    role: AgentRole::Connector,
    description: "Maps relationship networks and identifies warm introduction paths to target companies",
    system_prompt: SYSTEM_PROMPT,
    subagent_model: ModelTier::Sonnet,
    builtin_tools: BUILTIN_TOOLS,
    datastore_tools: &[
        GetCompany::NAME,
        SaveConnection::NAME,
        GetConnections::NAME,
        SaveInvestor::NAME,
        LinkCompanyInvestor::NAME,
        GetSharedInvestors::NAME,
        SaveKeyPerson::NAME,
        SaveResearchSource::NAME,
    ],
};

/// 独立运行时的默认任务：寻找通往目标公司的全部暖引荐路径
pub fn find_connections_to_company(company_name: &str) -> String {
    format!(
        r#"
Find ALL possible WARM INTRODUCTION PATHS to {company_name}.

Research connection opportunities:

1. INVESTOR CONNECTIONS
- Who are the company's investors?
- Do any shared investors exist with companies Ken knows?
- PE firms with Atlantic portfolios

2. BOARD CONNECTIONS
- Who is on the board of {company_name}?
- What other boards do they serve on?
- Any connections through shared directors?

3. PROFESSIONAL NETWORK
- What law firm represents them?
- What accounting firm?
- Any known advisors or consultants?

4. UNIVERSITY/PHILANTHROPY
- University board memberships
- Foundation involvement
- Community organization leadership

5. INDUSTRY CONNECTIONS
- Industry association memberships
- Conference speaking/attendance
- Award recipients alongside

For EACH connection found:
- Save the connection with type and detail
- Name the potential introducer
- Note the relationship path
- Rate the connection quality (Tier 1-5)
- Include source URL

OUTPUT:
- Ranked list of introduction paths
- Best recommended approach
- Talking points for each path
- Risks or sensitivities to consider
"#
    )
}

pub fn map_shared_investors(company_name: &str) -> String {
    format!(
        r#"
Map the SHARED INVESTOR NETWORK for {company_name}.

Research:
1. Identify all known investors in {company_name}
2. For each investor, find their other Atlantic Canada investments
3. Map connections between portfolio companies
4. Identify investors active in same sector

For each investor found:
- Save investor profile
- Link to {company_name}
- Link to other portfolio companies
- Note board seats held

Find:
- Oberland Capital pattern (multiple related companies)
- PE firms with Atlantic focus
- Family offices investing regionally
- Strategic investors

OUTPUT:
- Investor network diagram (text description)
- Shared investor connections to leverage
- Portfolio company relationships
- Introduction opportunities
"#
    )
}

/// 梳理某行业内的董事会交叉任职
pub fn map_board_network(industry: &str, province: Option<&str>) -> String {
    let scope = province_scope(province);
    format!(
        r#"
Map the BOARD NETWORK in the {industry} sector{scope}.

Research:
1. Major companies in {industry}
2. Board composition of each
3. Directors serving on multiple boards
4. Retired executives on advisory boards

For each company:
- List board members
- Note their other board positions
- Identify shared directors

Create:
- Network map of board connections
- List of "super-connectors" (directors on 3+ boards)
- Potential introduction paths through board members

Save:
- Each company profile
- Key people (board members)
- Connections between companies via boards
"#
    )
}

pub fn find_event_connections(company_name: &str) -> String {
    format!(
        r#"
Find CONFERENCE and EVENT CONNECTIONS to {company_name}.

Search for:
1. Industry conferences attended/spoken at
2. Business award ceremonies
3. Trade shows and exhibitions
4. Networking events
5. Panel discussions

Look for:
- Atlantic Business Magazine events
- Industry-specific conferences
- University events (Dal, Acadia)
- Chamber of Commerce events
- Ocean Supercluster events

For executives of {company_name}:
- Speaking engagements
- Award nominations/wins
- Panel participation
- Event sponsorship

Identify:
- Shared event attendance with Ken/MPA network
- Introduction opportunities at events
- Conversation starters (shared experiences)

Save connections with event details and sources.
"#
    )
}

pub fn map_advisor_network(company_name: &str) -> String {
    format!(
        r#"
Map the PROFESSIONAL ADVISOR NETWORK for {company_name}.

Research:
1. LEGAL
- Which law firm represents them?
- Key lawyers handling corporate/M&A?
- Any litigation that reveals counsel?

2. ACCOUNTING
- Audit firm
- Key partners
- Any disclosed advisory relationships

3. BANKING
- Primary bank relationship
- Investment banking history
- Debt providers

4. CONSULTING/ADVISORY
- Known consultants or advisors
- Industry experts they work with
- Former executives now advising

For Atlantic Canada, key firms:
- Law: Stewart McKelvey, McInnes Cooper, Cox & Palmer
- Accounting: Grant Thornton, BDO, KPMG, Deloitte
- Banks: RBC, BMO, BDC, ACOA

Find:
- Shared advisor relationships
- Introduction opportunities through advisors
- Professional credibility signals

Save all findings with sources.
"#
    )
}

pub fn find_community_connections(company_name: &str) -> String {
    format!(
        r#"
Find COMMUNITY and UNIVERSITY CONNECTIONS to {company_name}.

Research leadership involvement in:

1. UNIVERSITY BOARDS
- Dalhousie University
- Acadia University
- St. Francis Xavier
- Cape Breton University
- University of New Brunswick
- Memorial University

2. FOUNDATIONS
- Community foundations
- Family foundations
- Hospital foundations
- Education foundations

3. COMMUNITY ORGANIZATIONS
- Chambers of Commerce
- Economic development organizations
- Industry associations
- Non-profit boards

4. PHILANTHROPY
- Major donations
- Named facilities
- Scholarship programs
- Community initiatives

For executives of {company_name}:
- Board positions held
- Foundation involvement
- Philanthropic activities
- Community leadership

Identify:
- Shared community involvement
- University alumni connections
- Philanthropy-based introductions

Save all connections with specifics and sources.
"#
    )
}
