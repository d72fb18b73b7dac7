//! 交易信号工具

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use super::{ToolError, definition_for, pretty, validate};
use crate::types::{Confidence, NewSignal, SignalType};

store_tool! {
    /// 记录一条带来源的交易信号
    SaveSignal
}

store_tool! {
    GetSignals
}

store_tool! {
    /// 跨公司的最新信号
    GetRecentSignals
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSignalArgs {
    /// Company UUID
    pub company_id: Uuid,
    /// Type of signal
    pub signal_type: SignalType,
    /// Specific category (e.g., "owner_age", "new_contract", "ceo_hire")
    pub signal_category: String,
    /// Detailed description of the signal
    pub description: String,
    /// URL source for this signal - REQUIRED
    pub source_url: String,
    /// Confidence level
    pub confidence: Confidence,
    /// Date of the signal (ISO format)
    pub signal_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyIdArgs {
    /// Company UUID
    pub company_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct RecentSignalsArgs {
    /// Number of signals to return (1-100, default 20)
    pub limit: Option<u32>,
}

impl Tool for SaveSignal {
    const NAME: &'static str = "save_signal";

    type Error = ToolError;
    type Args = SaveSignalArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<SaveSignalArgs>(
            Self::NAME,
            "Record a transaction signal detected for a company. CRITICAL: Always include source_url.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let signal = NewSignal {
            company_id: args.company_id,
            signal_type: args.signal_type,
            signal_category: validate::required("signalCategory", &args.signal_category)?,
            description: validate::required("description", &args.description)?,
            source_url: validate::source_url(&args.source_url)?,
            confidence: args.confidence,
            signal_date: validate::optional_text(args.signal_date),
        };

        let saved = self.store.insert_signal(&signal).await?;
        Ok(format!(
            "Signal saved: {} - {} (ID: {})",
            signal.signal_type, signal.signal_category, saved.id
        ))
    }
}

impl Tool for GetSignals {
    const NAME: &'static str = "get_signals";

    type Error = ToolError;
    type Args = CompanyIdArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<CompanyIdArgs>(Self::NAME, "Get all signals for a company")
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let signals = self.store.signals_by_company(args.company_id).await?;
        pretty(&signals)
    }
}

impl Tool for GetRecentSignals {
    const NAME: &'static str = "get_recent_signals";

    type Error = ToolError;
    type Args = RecentSignalsArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition_for::<RecentSignalsArgs>(
            Self::NAME,
            "Get the most recent signals across all companies",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let limit = validate::limit(args.limit)?;
        let signals = self.store.recent_signals(limit).await?;
        pretty(&signals)
    }
}
