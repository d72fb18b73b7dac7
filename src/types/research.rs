use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AcquirerType, PersonRole, SourceConfidence, SourceType};

/// key_people 表的一行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyPerson {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub title: Option<String>,
    pub role: Option<String>,
    pub ownership_percentage: Option<f64>,
    pub age_estimate: Option<i32>,
    pub tenure_years: Option<i32>,
    pub linkedin_url: Option<String>,
    pub notes: Option<String>,
    pub source_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewKeyPerson {
    pub company_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub role: PersonRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_estimate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_years: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub source_url: String,
}

/// research_sources 表的一行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResearchSource {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub source_name: String,
    pub source_url: String,
    pub source_type: Option<String>,
    pub data_points: Option<Vec<String>>,
    pub confidence: Option<String>,
    pub access_date: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewResearchSource {
    pub company_id: Uuid,
    pub source_name: String,
    pub source_url: String,
    pub source_type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_points: Option<Vec<String>>,
    pub confidence: SourceConfidence,
}

/// potential_acquirers 表的一行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PotentialAcquirer {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub acquirer_name: String,
    pub acquirer_type: Option<String>,
    pub rationale: Option<String>,
    pub recent_deals: Option<String>,
    pub source_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewPotentialAcquirer {
    pub company_id: Uuid,
    pub acquirer_name: String,
    pub acquirer_type: AcquirerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_deals: Option<String>,
    pub source_url: String,
}
