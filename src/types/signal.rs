use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CompanySummary, Confidence, SignalType};

/// signals 表的一行，只追加不更新
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Signal {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub signal_type: Option<String>,
    pub signal_category: Option<String>,
    pub description: String,
    pub source_url: String,
    pub confidence: Option<String>,
    pub signal_date: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewSignal {
    pub company_id: Uuid,
    pub signal_type: SignalType,
    pub signal_category: String,
    pub description: String,
    pub source_url: String,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_date: Option<String>,
}

/// 最近信号查询结果，附带所属公司摘要
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SignalWithCompany {
    #[serde(flatten)]
    pub signal: Signal,
    pub companies: Option<CompanySummary>,
}
