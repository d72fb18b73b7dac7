use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Company, ConnectionType, InvestorType};

/// connections 表的一行：通往目标公司的一条关系路径
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Connection {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub connection_type: Option<String>,
    pub connection_detail: String,
    pub potential_introducer: Option<String>,
    pub introducer_relationship: Option<String>,
    pub source_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewConnection {
    pub company_id: Uuid,
    pub connection_type: ConnectionType,
    pub connection_detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_introducer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introducer_relationship: Option<String>,
    pub source_url: String,
}

/// investors 表的一行，name 唯一
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Investor {
    pub id: Uuid,
    pub name: String,
    pub investor_type: Option<String>,
    pub website: Option<String>,
    pub sectors: Option<Vec<String>>,
    pub geographic_focus: Option<Vec<String>>,
    pub source_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewInvestor {
    pub name: String,
    pub investor_type: InvestorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic_focus: Option<Vec<String>>,
    pub source_url: String,
}

/// company_investors 表的一行，(company_id, investor_id) 唯一
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompanyInvestor {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub investor_id: Option<Uuid>,
    pub investment_date: Option<String>,
    /// 百万加元
    pub investment_amount: Option<f64>,
    pub board_seat: Option<bool>,
    pub source_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewCompanyInvestor {
    pub company_id: Uuid,
    pub investor_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_amount: Option<f64>,
    pub board_seat: bool,
    pub source_url: String,
}

/// 按公司查询投资关系时，附带投资方整行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvestorLink {
    #[serde(flatten)]
    pub link: CompanyInvestor,
    #[serde(rename = "investors")]
    pub investor: Option<Investor>,
}

impl InvestorLink {
    /// 共同投资方结果的键：投资方名称，缺失时退回投资方 ID
    pub fn investor_key(&self) -> Option<String> {
        match (&self.investor, self.link.investor_id) {
            (Some(investor), _) => Some(investor.name.clone()),
            (None, Some(id)) => Some(id.to_string()),
            (None, None) => None,
        }
    }
}

/// 按投资方查询投资关系时，附带被投公司整行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PortfolioLink {
    #[serde(flatten)]
    pub link: CompanyInvestor,
    #[serde(rename = "companies")]
    pub company: Option<Company>,
}
