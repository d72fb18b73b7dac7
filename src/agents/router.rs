//! 本地路由表：按关键词把任务文本分派给专职代理
//!
//! 规则按顺序匹配，先到先得；都不匹配时交给协调者。

use super::AgentRole;

pub struct RoutingRule {
    pub role: AgentRole,
    pub keywords: &'static [&'static str],
}

/// connector 的关键词最具体，排在最前；prospector 覆盖面最广，排在最后
pub const RULES: &[RoutingRule] = &[
    RoutingRule {
        role: AgentRole::Connector,
        keywords: &[
            "introduction",
            "introduce",
            "intro path",
            "warm intro",
            "connection",
            "connected to",
            "relationship",
            "shared investor",
            "board network",
            "advisor network",
        ],
    },
    RoutingRule {
        role: AgentRole::Researcher,
        keywords: &[
            "deep dive",
            "research",
            "profile",
            "validate",
            "verify",
            "comparable",
            "competitive",
            "due diligence",
            "new developments",
        ],
    },
    RoutingRule {
        role: AgentRole::Prospector,
        keywords: &[
            "find companies",
            "scan",
            "signal",
            "market map",
            "prospect",
            "looking to sell",
            "succession",
            "acquisition targets",
        ],
    },
];

/// 返回第一个命中规则的角色，匹配不区分大小写
pub fn route(task: &str) -> Option<AgentRole> {
    let task = task.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| task.contains(keyword)))
        .map(|rule| rule.role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_by_keyword() {
        assert_eq!(
            route("Find companies with succession signals in the seafood industry"),
            Some(AgentRole::Prospector)
        );
        assert_eq!(
            route("Deep dive on Imperial Manufacturing Group"),
            Some(AgentRole::Researcher)
        );
        assert_eq!(
            route("Who can make a WARM INTRO to Sustane?"),
            Some(AgentRole::Connector)
        );
    }

    #[test]
    fn test_rule_order_breaks_ties() {
        // research + connection: connector wins
        assert_eq!(
            route("Research board connections at Oberland"),
            Some(AgentRole::Connector)
        );
        // profile + signal: researcher wins
        assert_eq!(
            route("Profile Acme and check for new signals"),
            Some(AgentRole::Researcher)
        );
    }

    #[test]
    fn test_unmatched_task_falls_back() {
        assert_eq!(route("Summarize this week"), None);
        assert_eq!(route(""), None);
    }

    #[test]
    fn test_worker_roles_only() {
        assert!(RULES.iter().all(|rule| rule.role != AgentRole::Orchestrator));
    }
}
