use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Confidence, OwnershipType, Province};

/// 传承评分的五个维度（每项 1-5）
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuccessionScores {
    /// 业主年龄
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_owner_age: Option<u8>,

    /// 任期长度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_tenure: Option<u8>,

    /// 接班人清晰度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_nextgen_clarity: Option<u8>,

    /// 传承/慈善信号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_legacy_signals: Option<u8>,

    /// 经营活跃度走势
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_activity_trajectory: Option<u8>,
}

impl SuccessionScores {
    fn values(&self) -> [Option<u8>; 5] {
        [
            self.score_owner_age,
            self.score_tenure,
            self.score_nextgen_clarity,
            self.score_legacy_signals,
            self.score_activity_trajectory,
        ]
    }

    /// 已提交维度的平均分，保留两位小数；一项都没有时为 None
    pub fn composite(&self) -> Option<f64> {
        let present: Vec<f64> = self.values().iter().flatten().map(|v| *v as f64).collect();
        if present.is_empty() {
            return None;
        }
        let mean = present.iter().sum::<f64>() / present.len() as f64;
        Some((mean * 100.0).round() / 100.0)
    }

    /// 综合分对应的就绪度档位
    pub fn readiness(&self) -> Option<&'static str> {
        self.composite().map(|score| {
            if score >= 4.0 {
                "high"
            } else if score >= 3.0 {
                "medium"
            } else {
                "low"
            }
        })
    }

    /// 用新提交的非空维度覆盖当前值
    pub fn merge(&mut self, newer: &SuccessionScores) {
        if newer.score_owner_age.is_some() {
            self.score_owner_age = newer.score_owner_age;
        }
        if newer.score_tenure.is_some() {
            self.score_tenure = newer.score_tenure;
        }
        if newer.score_nextgen_clarity.is_some() {
            self.score_nextgen_clarity = newer.score_nextgen_clarity;
        }
        if newer.score_legacy_signals.is_some() {
            self.score_legacy_signals = newer.score_legacy_signals;
        }
        if newer.score_activity_trajectory.is_some() {
            self.score_activity_trajectory = newer.score_activity_trajectory;
        }
    }
}

/// companies 表的一行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub legal_name: Option<String>,
    pub location: String,
    pub province: String,
    pub industry: Option<String>,
    pub founded_year: Option<i32>,
    pub website: Option<String>,
    pub ownership_type: Option<String>,
    /// 年收入估算（百万加元）
    pub revenue_estimate: Option<f64>,
    pub employee_count: Option<i64>,
    #[serde(flatten)]
    pub scores: SuccessionScores,
    /// 由数据库计算，应用层只读
    pub succession_composite: Option<f64>,
    /// 由数据库计算，应用层只读
    pub succession_readiness: Option<String>,
    pub confidence: Option<String>,
    pub markdown_content: Option<String>,
    pub research_date: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 写入 companies 的载荷，以 name 作为 upsert 冲突键
///
/// 未提交的字段不会被序列化，因此不会覆盖已有值。
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewCompany {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    pub location: String,
    pub province: Province,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_type: Option<OwnershipType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i64>,
    #[serde(flatten)]
    pub scores: SuccessionScores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
}

/// 关联查询时嵌入的公司摘要
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CompanySummary {
    pub name: Option<String>,
    pub province: Option<String>,
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succession_readiness: Option<String>,
}

impl From<&Company> for CompanySummary {
    fn from(company: &Company) -> Self {
        Self {
            name: Some(company.name.clone()),
            province: Some(company.province.clone()),
            industry: company.industry.clone(),
            succession_readiness: company.succession_readiness.clone(),
        }
    }
}

/// company_dashboard_view 的一行
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardCompany {
    #[serde(flatten)]
    pub company: Company,
    pub people_count: Option<i64>,
    pub source_count: Option<i64>,
    pub acquirer_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_is_mean_of_submitted_scores() {
        let scores = SuccessionScores {
            score_owner_age: Some(5),
            score_tenure: Some(4),
            score_nextgen_clarity: Some(5),
            score_legacy_signals: Some(3),
            score_activity_trajectory: Some(4),
        };
        assert_eq!(scores.composite(), Some(4.2));
        assert_eq!(scores.readiness(), Some("high"));
    }

    #[test]
    fn test_composite_ignores_missing_dimensions() {
        let scores = SuccessionScores {
            score_owner_age: Some(2),
            score_tenure: Some(3),
            ..Default::default()
        };
        assert_eq!(scores.composite(), Some(2.5));
        assert_eq!(scores.readiness(), Some("low"));
        assert_eq!(SuccessionScores::default().composite(), None);
    }

    #[test]
    fn test_merge_keeps_unsubmitted_dimensions() {
        let mut current = SuccessionScores {
            score_owner_age: Some(5),
            score_tenure: Some(4),
            ..Default::default()
        };
        current.merge(&SuccessionScores {
            score_tenure: Some(2),
            ..Default::default()
        });
        assert_eq!(current.score_owner_age, Some(5));
        assert_eq!(current.score_tenure, Some(2));
    }

    #[test]
    fn test_new_company_omits_unset_columns() {
        let company = NewCompany {
            name: "Acme Fisheries".to_string(),
            legal_name: None,
            location: "Lunenburg".to_string(),
            province: Province::NovaScotia,
            industry: None,
            founded_year: None,
            website: None,
            ownership_type: Some(OwnershipType::FamilyHeld),
            revenue_estimate: None,
            employee_count: None,
            scores: SuccessionScores {
                score_owner_age: Some(4),
                ..Default::default()
            },
            confidence: None,
            markdown_content: None,
        };
        let value = serde_json::to_value(&company).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["province"], "NS");
        assert_eq!(object["ownership_type"], "family-held");
        assert_eq!(object["score_owner_age"], 4);
        assert!(!object.contains_key("industry"));
        assert!(!object.contains_key("score_tenure"));
    }
}
