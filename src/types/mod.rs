//! 数据模型：与数据库表一一对应的行类型、写入载荷以及枚举取值

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod company;
pub mod network;
pub mod pipeline;
pub mod research;
pub mod signal;

pub use company::{Company, CompanySummary, DashboardCompany, NewCompany, SuccessionScores};
pub use network::{
    CompanyInvestor, Connection, Investor, InvestorLink, NewCompanyInvestor, NewConnection,
    NewInvestor, PortfolioLink,
};
pub use pipeline::{Pipeline, PipelineEntry, PipelineUpdate};
pub use research::{
    KeyPerson, NewKeyPerson, NewPotentialAcquirer, NewResearchSource, PotentialAcquirer,
    ResearchSource,
};
pub use signal::{NewSignal, Signal, SignalWithCompany};

/// 声明以固定字符串集合存储的枚举列
///
/// 数据库中这些列是普通文本，取值集合只在工具层约束，
/// 因此每个枚举都提供与列值一致的 `as_str` / `FromStr`。
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// 全部取值，按声明顺序
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Unknown {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

string_enum! {
    /// 大西洋四省
    Province {
        NovaScotia => "NS",
        NewBrunswick => "NB",
        PrinceEdwardIsland => "PEI",
        NewfoundlandLabrador => "NL",
    }
}

string_enum! {
    /// 所有权类型
    OwnershipType {
        FounderOwned => "founder-owned",
        FamilyHeld => "family-held",
        EmployeeOwned => "employee-owned",
        PeBacked => "pe-backed",
        Public => "public",
        Other => "other",
    }
}

string_enum! {
    /// 调研结论置信度
    Confidence {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

string_enum! {
    /// 信号类别
    SignalType {
        SellSide => "sell_side",
        BuySide => "buy_side",
        Growth => "growth",
        Leadership => "leadership",
        Financial => "financial",
        Strategic => "strategic",
    }
}

string_enum! {
    /// 关系路径类型
    ConnectionType {
        Board => "board",
        Conference => "conference",
        Philanthropy => "philanthropy",
        Advisor => "advisor",
        Alumni => "alumni",
        Investor => "investor",
        Personal => "personal",
        Other => "other",
    }
}

string_enum! {
    /// 投资方类型
    InvestorType {
        PrivateEquity => "pe",
        FamilyOffice => "family_office",
        Strategic => "strategic",
        Angel => "angel",
        Institutional => "institutional",
    }
}

string_enum! {
    /// 交易管线阶段，按生命周期先后声明
    PipelineStage {
        Prospect => "prospect",
        Researching => "researching",
        Outreach => "outreach",
        Engaged => "engaged",
        ActiveDeal => "active_deal",
        Closed => "closed",
        Passed => "passed",
    }
}

impl PipelineStage {
    /// closed / passed 之外的阶段都算活跃管线
    pub fn is_active(&self) -> bool {
        !matches!(self, PipelineStage::Closed | PipelineStage::Passed)
    }
}

string_enum! {
    /// 委托类型
    ClientType {
        SellSide => "sell_side",
        BuySide => "buy_side",
        GrowthCapital => "growth_capital",
    }
}

string_enum! {
    /// 关键人物角色
    PersonRole {
        Owner => "owner",
        Executive => "executive",
        Board => "board",
        Other => "other",
    }
}

string_enum! {
    /// 调研来源类型
    SourceType {
        CompanyWebsite => "company_website",
        PressRelease => "press_release",
        News => "news",
        Linkedin => "linkedin",
        IndustryReport => "industry_report",
        GovernmentFiling => "government_filing",
        Other => "other",
    }
}

string_enum! {
    /// 来源置信度，比 [`Confidence`] 多一个 medium-high 档
    SourceConfidence {
        High => "high",
        MediumHigh => "medium-high",
        Medium => "medium",
        Low => "low",
    }
}

string_enum! {
    /// 潜在收购方类型
    AcquirerType {
        Strategic => "strategic",
        PrivateEquity => "pe",
        FamilyOffice => "family_office",
    }
}
