//! 交易管线工具

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use super::{ToolError, definition_for, pretty, validate};
use crate::types::{ClientType, PipelineStage, PipelineUpdate};

store_tool! {
    /// 更新公司在管线中的阶段与优先级，每家公司只保留一行
    UpdatePipeline
}

store_tool! {
    GetPipeline
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePipelineArgs {
    /// Company UUID
    pub company_id: Uuid,
    pub stage: PipelineStage,
    /// Priority 1-5 (5 is highest)
    pub priority: u8,
    pub client_type: ClientType,
    /// Next action to take
    pub next_action: Option<String>,
    /// Date for next action (ISO format)
    pub next_action_date: Option<String>,
    /// Pipeline notes
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetPipelineArgs {
    /// Only return this stage; omit for the active pipeline
    pub stage: Option<PipelineStage>,
}

impl Tool for UpdatePipeline {
    const NAME: &'static str = "update_pipeline";

    type Error = ToolError;
    type Args = UpdatePipelineArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<UpdatePipelineArgs>(
            Self::NAME,
            "Update the pipeline stage/priority for a company",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let update = PipelineUpdate {
            company_id: args.company_id,
            stage: args.stage,
            priority: validate::priority(args.priority)?,
            client_type: args.client_type,
            next_action: validate::optional_text(args.next_action),
            next_action_date: validate::optional_text(args.next_action_date),
            notes: validate::optional_text(args.notes),
        };

        self.store.upsert_pipeline(&update).await?;
        Ok(format!(
            "Pipeline updated: {} (priority: {}) for company {}",
            update.stage, update.priority, update.company_id
        ))
    }
}

impl Tool for GetPipeline {
    const NAME: &'static str = "get_pipeline";

    type Error = ToolError;
    type Args = GetPipelineArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<GetPipelineArgs>(
            Self::NAME,
            "Get active pipeline (all companies not closed/passed), or one stage when `stage` is given",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let entries = match args.stage {
            Some(stage) => self.store.pipeline_by_stage(stage).await?,
            None => self.store.active_pipeline().await?,
        };
        pretty(&entries)
    }
}
