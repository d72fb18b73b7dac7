//! 深度调研工具：关键人物、调研来源、潜在收购方

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use super::{ToolError, definition_for, validate};
use crate::types::{
    AcquirerType, NewKeyPerson, NewPotentialAcquirer, NewResearchSource, PersonRole,
    SourceConfidence, SourceType,
};

store_tool! {
    SaveKeyPerson
}

store_tool! {
    /// 调研来源是并购材料可信度的依据
    SaveResearchSource
}

store_tool! {
    SavePotentialAcquirer
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveKeyPersonArgs {
    /// Company UUID
    pub company_id: Uuid,
    /// Person name
    pub name: String,
    /// Job title
    pub title: Option<String>,
    pub role: PersonRole,
    /// Ownership percentage (0-100)
    pub ownership_percentage: Option<f64>,
    /// Estimated age
    pub age_estimate: Option<i32>,
    /// Years at company
    pub tenure_years: Option<i32>,
    pub linkedin_url: Option<String>,
    pub notes: Option<String>,
    /// URL source - REQUIRED
    pub source_url: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveResearchSourceArgs {
    /// Company UUID
    pub company_id: Uuid,
    /// Name/description of the source
    pub source_name: String,
    /// URL - REQUIRED
    pub source_url: String,
    pub source_type: SourceType,
    /// What data points came from this source
    pub data_points: Option<Vec<String>>,
    pub confidence: SourceConfidence,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePotentialAcquirerArgs {
    /// Target company UUID
    pub company_id: Uuid,
    /// Name of potential acquirer
    pub acquirer_name: String,
    pub acquirer_type: AcquirerType,
    /// Why they would be interested
    pub rationale: Option<String>,
    /// Their recent M&A activity
    pub recent_deals: Option<String>,
    /// URL source - REQUIRED
    pub source_url: String,
}

impl Tool for SaveKeyPerson {
    const NAME: &'static str = "save_key_person";

    type Error = ToolError;
    type Args = SaveKeyPersonArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<SaveKeyPersonArgs>(
            Self::NAME,
            "Save a key person (owner, executive, board member) for a company",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let person = NewKeyPerson {
            company_id: args.company_id,
            name: validate::required("name", &args.name)?,
            title: validate::optional_text(args.title),
            role: args.role,
            ownership_percentage: validate::percentage(
                "ownershipPercentage",
                args.ownership_percentage,
            )?,
            age_estimate: args.age_estimate,
            tenure_years: args.tenure_years,
            linkedin_url: validate::optional_url("linkedinUrl", args.linkedin_url)?,
            notes: validate::optional_text(args.notes),
            source_url: validate::source_url(&args.source_url)?,
        };

        let saved = self.store.insert_key_person(&person).await?;
        Ok(format!("Key person saved: {} (ID: {})", saved.name, saved.id))
    }
}

impl Tool for SaveResearchSource {
    const NAME: &'static str = "save_research_source";

    type Error = ToolError;
    type Args = SaveResearchSourceArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<SaveResearchSourceArgs>(
            Self::NAME,
            "Save a research source with URL. CRITICAL for M&A credibility.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let source = NewResearchSource {
            company_id: args.company_id,
            source_name: validate::required("sourceName", &args.source_name)?,
            source_url: validate::source_url(&args.source_url)?,
            source_type: args.source_type,
            data_points: args.data_points.filter(|points| !points.is_empty()),
            confidence: args.confidence,
        };

        let saved = self.store.insert_research_source(&source).await?;
        Ok(format!("Source saved: {} (ID: {})", saved.source_name, saved.id))
    }
}

impl Tool for SavePotentialAcquirer {
    const NAME: &'static str = "save_potential_acquirer";

    type Error = ToolError;
    type Args = SavePotentialAcquirerArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<SavePotentialAcquirerArgs>(
            Self::NAME,
            "Save a potential acquirer for a target company",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let acquirer = NewPotentialAcquirer {
            company_id: args.company_id,
            acquirer_name: validate::required("acquirerName", &args.acquirer_name)?,
            acquirer_type: args.acquirer_type,
            rationale: validate::optional_text(args.rationale),
            recent_deals: validate::optional_text(args.recent_deals),
            source_url: validate::source_url(&args.source_url)?,
        };

        let saved = self.store.insert_potential_acquirer(&acquirer).await?;
        Ok(format!(
            "Potential acquirer saved: {} (ID: {})",
            saved.acquirer_name, saved.id
        ))
    }
}
