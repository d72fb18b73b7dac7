//! 关系网络工具：关系路径、投资方及其投资组合

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use super::signal::CompanyIdArgs;
use super::{ToolError, definition_for, pretty, validate};
use crate::store::shared_investors;
use crate::types::{ConnectionType, InvestorType, NewCompanyInvestor, NewConnection, NewInvestor};

store_tool! {
    /// 记录一条通往目标公司的关系路径
    SaveConnection
}

store_tool! {
    GetConnections
}

store_tool! {
    /// 新建或更新投资方（按名称 upsert）
    SaveInvestor
}

store_tool! {
    /// 关联公司与投资方（按二者 upsert）
    LinkCompanyInvestor
}

store_tool! {
    /// 查找共享投资方的其他公司
    GetSharedInvestors
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveConnectionArgs {
    /// Company UUID
    pub company_id: Uuid,
    pub connection_type: ConnectionType,
    /// Details about the connection
    pub connection_detail: String,
    /// Name of person who could make introduction
    pub potential_introducer: Option<String>,
    /// How Ken/MPA knows the introducer
    pub introducer_relationship: Option<String>,
    /// URL source for this connection - REQUIRED
    pub source_url: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveInvestorArgs {
    /// Investor name
    pub name: String,
    pub investor_type: InvestorType,
    pub website: Option<String>,
    /// Industry sectors they invest in
    pub sectors: Option<Vec<String>>,
    /// Geographic regions they focus on
    pub geographic_focus: Option<Vec<String>>,
    /// URL source - REQUIRED
    pub source_url: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkCompanyInvestorArgs {
    /// Company UUID
    pub company_id: Uuid,
    /// Investor UUID
    pub investor_id: Uuid,
    /// Date of investment (ISO format)
    pub investment_date: Option<String>,
    /// Investment amount in millions CAD
    pub investment_amount: Option<f64>,
    /// Whether investor has a board seat
    #[serde(default)]
    pub board_seat: bool,
    /// URL source - REQUIRED
    pub source_url: String,
}

fn non_empty_list(values: Option<Vec<String>>) -> Option<Vec<String>> {
    values
        .map(|list| {
            list.into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|list| !list.is_empty())
}

impl Tool for SaveConnection {
    const NAME: &'static str = "save_connection";

    type Error = ToolError;
    type Args = SaveConnectionArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<SaveConnectionArgs>(
            Self::NAME,
            "Save a relationship/connection path to a company. Use for warm intro mapping.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let connection = NewConnection {
            company_id: args.company_id,
            connection_type: args.connection_type,
            connection_detail: validate::required("connectionDetail", &args.connection_detail)?,
            potential_introducer: validate::optional_text(args.potential_introducer),
            introducer_relationship: validate::optional_text(args.introducer_relationship),
            source_url: validate::source_url(&args.source_url)?,
        };

        let saved = self.store.insert_connection(&connection).await?;
        Ok(format!(
            "Connection saved: {} (ID: {})",
            connection.connection_type, saved.id
        ))
    }
}

impl Tool for GetConnections {
    const NAME: &'static str = "get_connections";

    type Error = ToolError;
    type Args = CompanyIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<CompanyIdArgs>(Self::NAME, "Get all connection paths for a company")
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let connections = self.store.connections_by_company(args.company_id).await?;
        pretty(&connections)
    }
}

impl Tool for SaveInvestor {
    const NAME: &'static str = "save_investor";

    type Error = ToolError;
    type Args = SaveInvestorArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<SaveInvestorArgs>(
            Self::NAME,
            "Save or update an investor profile (PE firm, family office, etc.)",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let investor = NewInvestor {
            name: validate::required("name", &args.name)?,
            investor_type: args.investor_type,
            website: validate::optional_url("website", args.website)?,
            sectors: non_empty_list(args.sectors),
            geographic_focus: non_empty_list(args.geographic_focus),
            source_url: validate::source_url(&args.source_url)?,
        };

        let saved = self.store.upsert_investor(&investor).await?;
        Ok(format!("Investor saved: {} (ID: {})", saved.name, saved.id))
    }
}

impl Tool for LinkCompanyInvestor {
    const NAME: &'static str = "link_company_investor";

    type Error = ToolError;
    type Args = LinkCompanyInvestorArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<LinkCompanyInvestorArgs>(
            Self::NAME,
            "Link a company to an investor (shows shared investor relationships)",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let link = NewCompanyInvestor {
            company_id: args.company_id,
            investor_id: args.investor_id,
            investment_date: validate::optional_text(args.investment_date),
            investment_amount: args.investment_amount,
            board_seat: args.board_seat,
            source_url: validate::source_url(&args.source_url)?,
        };

        let saved = self.store.link_company_investor(&link).await?;
        Ok(format!("Company-investor link created (ID: {})", saved.id))
    }
}

impl Tool for GetSharedInvestors {
    const NAME: &'static str = "get_shared_investors";

    type Error = ToolError;
    type Args = CompanyIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<CompanyIdArgs>(
            Self::NAME,
            "Find companies that share investors with a given company",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let shared = shared_investors(self.store.as_ref(), args.company_id).await?;
        pretty(&shared)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{MemoryStore, Store};
    use crate::types::{NewCompany, Province, SuccessionScores};

    async fn company(store: &MemoryStore, name: &str) -> Uuid {
        store
            .upsert_company(&NewCompany {
                name: name.to_string(),
                legal_name: None,
                location: "St. John's".to_string(),
                province: Province::NewfoundlandLabrador,
                industry: Some("ocean technology".to_string()),
                founded_year: None,
                website: None,
                ownership_type: None,
                revenue_estimate: None,
                employee_count: None,
                scores: SuccessionScores::default(),
                confidence: None,
                markdown_content: None,
            })
            .await
            .unwrap()
            .id
    }

    #[test]
    fn test_board_seat_defaults_to_false() {
        let args: LinkCompanyInvestorArgs = serde_json::from_value(serde_json::json!({
            "companyId": Uuid::new_v4(),
            "investorId": Uuid::new_v4(),
            "sourceUrl": "https://example.com/deal"
        }))
        .unwrap();
        assert!(!args.board_seat);
    }

    #[test]
    fn test_unknown_connection_type_is_rejected() {
        let parsed: Result<SaveConnectionArgs, _> = serde_json::from_value(serde_json::json!({
            "companyId": Uuid::new_v4(),
            "connectionType": "golf",
            "connectionDetail": "Plays golf with the owner",
            "sourceUrl": "https://example.com"
        }));
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_investor_upsert_and_link_flow() {
        let store = Arc::new(MemoryStore::new());
        let alpha = company(&store, "Alpha Marine").await;
        let bravo = company(&store, "Bravo Subsea").await;

        let text = SaveInvestor::new(store.clone())
            .call(SaveInvestorArgs {
                name: "Killick Capital".to_string(),
                investor_type: InvestorType::FamilyOffice,
                website: None,
                sectors: Some(vec!["marine".to_string(), " ".to_string()]),
                geographic_focus: None,
                source_url: "https://killick.example/portfolio".to_string(),
            })
            .await
            .unwrap();
        assert!(text.starts_with("Investor saved: Killick Capital (ID: "));

        let investor = store.investors_by_company(alpha).await.unwrap();
        assert!(investor.is_empty());

        let fund_id: Uuid = text
            .trim_end_matches(')')
            .rsplit("ID: ")
            .next()
            .unwrap()
            .parse()
            .unwrap();
        for company_id in [alpha, bravo] {
            LinkCompanyInvestor::new(store.clone())
                .call(LinkCompanyInvestorArgs {
                    company_id,
                    investor_id: fund_id,
                    investment_date: None,
                    investment_amount: Some(2.5),
                    board_seat: false,
                    source_url: "https://killick.example/portfolio".to_string(),
                })
                .await
                .unwrap();
        }

        let shared = GetSharedInvestors::new(store.clone())
            .call(CompanyIdArgs { company_id: alpha })
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&shared).unwrap();
        let others = value["Killick Capital"].as_array().unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0]["companies"]["name"], "Bravo Subsea");
    }
}
