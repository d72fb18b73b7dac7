//! 数据访问层
//!
//! 每个实体操作对应 [`Store`] 上的一个异步方法。生产环境走 PostgREST，
//! 测试和离线运行使用 [`MemoryStore`]，两者遵循相同的身份键/upsert/排序语义。

use std::collections::BTreeMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{
    Company, CompanyInvestor, Connection, DashboardCompany, Investor, InvestorLink, KeyPerson,
    NewCompany, NewCompanyInvestor, NewConnection, NewInvestor, NewKeyPerson,
    NewPotentialAcquirer, NewResearchSource, NewSignal, Pipeline, PipelineEntry, PipelineStage,
    PipelineUpdate, PortfolioLink, PotentialAcquirer, ResearchSource, Signal, SignalWithCompany,
};

mod memory;
mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

/// PostgREST 在单行查询没有结果时返回的错误码
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Postgres 外键约束冲突
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Missing SUPABASE_URL or SUPABASE_ANON_KEY environment variables")]
    MissingCredentials,

    #[error("invalid datastore url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (code: {code}, status: {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Api { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// 单行查询没有结果，不算错误
    pub fn is_no_rows(&self) -> bool {
        self.code() == Some(NO_ROWS_CODE)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 数据存储接口
///
/// upsert 以自然键（公司名、投资方名、(公司, 投资方)、管线的公司）去重，
/// 只覆盖本次提交的非空字段；其他写入只追加。
#[async_trait]
pub trait Store: Send + Sync {
    async fn upsert_company(&self, company: &NewCompany) -> StoreResult<Company>;

    /// 名称不区分大小写的子串匹配，返回第一条
    async fn find_company_by_name(&self, name: &str) -> StoreResult<Option<Company>>;

    /// 看板视图，按传承综合分降序
    async fn list_companies(&self) -> StoreResult<Vec<DashboardCompany>>;

    async fn insert_signal(&self, signal: &NewSignal) -> StoreResult<Signal>;

    /// 按信号日期降序
    async fn signals_by_company(&self, company_id: Uuid) -> StoreResult<Vec<Signal>>;

    /// 全部公司的最新信号，按创建时间降序
    async fn recent_signals(&self, limit: usize) -> StoreResult<Vec<SignalWithCompany>>;

    async fn insert_connection(&self, connection: &NewConnection) -> StoreResult<Connection>;

    async fn connections_by_company(&self, company_id: Uuid) -> StoreResult<Vec<Connection>>;

    async fn upsert_investor(&self, investor: &NewInvestor) -> StoreResult<Investor>;

    async fn link_company_investor(
        &self,
        link: &NewCompanyInvestor,
    ) -> StoreResult<CompanyInvestor>;

    async fn investors_by_company(&self, company_id: Uuid) -> StoreResult<Vec<InvestorLink>>;

    async fn companies_by_investor(&self, investor_id: Uuid) -> StoreResult<Vec<PortfolioLink>>;

    async fn upsert_pipeline(&self, update: &PipelineUpdate) -> StoreResult<Pipeline>;

    /// 某一阶段的管线，按优先级降序
    async fn pipeline_by_stage(&self, stage: PipelineStage) -> StoreResult<Vec<PipelineEntry>>;

    /// 除 closed / passed 之外的管线，按优先级降序
    async fn active_pipeline(&self) -> StoreResult<Vec<PipelineEntry>>;

    async fn insert_key_person(&self, person: &NewKeyPerson) -> StoreResult<KeyPerson>;

    async fn insert_research_source(
        &self,
        source: &NewResearchSource,
    ) -> StoreResult<ResearchSource>;

    async fn insert_potential_acquirer(
        &self,
        acquirer: &NewPotentialAcquirer,
    ) -> StoreResult<PotentialAcquirer>;
}

/// 查找与给定公司共享投资方的其他公司
///
/// 只展开两层：公司的投资方，以及这些投资方投资的其他公司。
/// 结果以投资方名称为键（缺失时用投资方 ID），没有其他公司的投资方不出现。
/// 同一家公司被多个投资方共同投资时，会在每个投资方下各出现一次。
pub async fn shared_investors(
    store: &dyn Store,
    company_id: Uuid,
) -> StoreResult<BTreeMap<String, Vec<PortfolioLink>>> {
    let mut shared = BTreeMap::new();

    for link in store.investors_by_company(company_id).await? {
        let (Some(investor_id), Some(key)) = (link.link.investor_id, link.investor_key()) else {
            continue;
        };

        let others: Vec<PortfolioLink> = store
            .companies_by_investor(investor_id)
            .await?
            .into_iter()
            .filter(|other| other.link.company_id != Some(company_id))
            .collect();

        if !others.is_empty() {
            tracing::debug!(investor = %key, count = others.len(), "shared investor found");
            shared.insert(key, others);
        }
    }

    Ok(shared)
}
