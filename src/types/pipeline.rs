use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClientType, CompanySummary, PipelineStage};

/// pipeline 表的一行，每家公司最多一行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pipeline {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub stage: Option<String>,
    /// 1-5，5 最高
    pub priority: Option<u8>,
    pub client_type: Option<String>,
    pub next_action: Option<String>,
    pub next_action_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 以 company_id 为冲突键的管线写入，后写覆盖
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PipelineUpdate {
    pub company_id: Uuid,
    pub stage: PipelineStage,
    pub priority: u8,
    pub client_type: ClientType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PipelineEntry {
    #[serde(flatten)]
    pub pipeline: Pipeline,
    pub companies: Option<CompanySummary>,
}
