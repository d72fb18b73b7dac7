//! 公司档案工具

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{ToolError, definition_for, pretty, validate};
use crate::types::{Confidence, NewCompany, OwnershipType, Province, SuccessionScores};

store_tool! {
    /// 新建或更新公司档案（按名称 upsert）
    SaveCompany
}

store_tool! {
    /// 按名称查找公司
    GetCompany
}

store_tool! {
    ListCompanies
}

/// Company profile fields. Only submitted fields overwrite stored values.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCompanyArgs {
    /// Company name
    pub name: String,
    /// Legal/registered company name
    pub legal_name: Option<String>,
    /// City or town location
    pub location: String,
    /// Atlantic Canada province
    pub province: Province,
    /// Primary industry
    pub industry: Option<String>,
    /// Year the company was founded
    pub founded_year: Option<i32>,
    /// Company website URL
    pub website: Option<String>,
    pub ownership_type: Option<OwnershipType>,
    /// Estimated annual revenue in millions CAD
    pub revenue_estimate: Option<f64>,
    /// Number of employees
    pub employee_count: Option<i64>,
    /// Succession score: owner age (1-5)
    pub score_owner_age: Option<u8>,
    /// Succession score: tenure (1-5)
    pub score_tenure: Option<u8>,
    /// Succession score: next-gen clarity (1-5)
    pub score_nextgen_clarity: Option<u8>,
    /// Succession score: legacy signals (1-5)
    pub score_legacy_signals: Option<u8>,
    /// Succession score: activity trajectory (1-5)
    pub score_activity_trajectory: Option<u8>,
    /// Overall research confidence
    pub confidence: Option<Confidence>,
    /// Full markdown profile content
    pub markdown_content: Option<String>,
}

impl SaveCompanyArgs {
    fn validate(self) -> Result<NewCompany, ToolError> {
        let scores = SuccessionScores {
            score_owner_age: validate::score("scoreOwnerAge", self.score_owner_age)?,
            score_tenure: validate::score("scoreTenure", self.score_tenure)?,
            score_nextgen_clarity: validate::score(
                "scoreNextgenClarity",
                self.score_nextgen_clarity,
            )?,
            score_legacy_signals: validate::score("scoreLegacySignals", self.score_legacy_signals)?,
            score_activity_trajectory: validate::score(
                "scoreActivityTrajectory",
                self.score_activity_trajectory,
            )?,
        };

        Ok(NewCompany {
            name: validate::required("name", &self.name)?,
            legal_name: validate::optional_text(self.legal_name),
            location: validate::required("location", &self.location)?,
            province: self.province,
            industry: validate::optional_text(self.industry),
            founded_year: self.founded_year,
            website: validate::optional_url("website", self.website)?,
            ownership_type: self.ownership_type,
            revenue_estimate: self.revenue_estimate,
            employee_count: self.employee_count,
            scores,
            confidence: self.confidence,
            markdown_content: validate::optional_text(self.markdown_content),
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCompanyArgs {
    /// Company name to search for
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListCompaniesArgs {}

impl Tool for SaveCompany {
    const NAME: &'static str = "save_company";

    type Error = ToolError;
    type Args = SaveCompanyArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<SaveCompanyArgs>(
            Self::NAME,
            "Save or update a company profile in the database. Use this after researching a company.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let company = args.validate()?;
        let saved = self.store.upsert_company(&company).await?;
        Ok(format!("Company saved: {} (ID: {})", saved.name, saved.id))
    }
}

impl Tool for GetCompany {
    const NAME: &'static str = "get_company";

    type Error = ToolError;
    type Args = GetCompanyArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<GetCompanyArgs>(Self::NAME, "Look up a company by name in the database")
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let name = validate::required("name", &args.name)?;
        match self.store.find_company_by_name(&name).await? {
            Some(company) => pretty(&company),
            None => Ok(format!("No company found matching \"{}\"", name)),
        }
    }
}

impl Tool for ListCompanies {
    const NAME: &'static str = "list_companies";

    type Error = ToolError;
    type Args = ListCompaniesArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<ListCompaniesArgs>(
            Self::NAME,
            "Get all companies from the database, sorted by succession score",
        )
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let companies = self.store.list_companies().await?;
        pretty(&companies)
    }
}
