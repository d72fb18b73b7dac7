//! 进程内存储，用于测试与离线运行

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FOREIGN_KEY_VIOLATION, Store, StoreError, StoreResult};
use crate::types::{
    Company, CompanyInvestor, CompanySummary, Connection, DashboardCompany, Investor,
    InvestorLink, KeyPerson, NewCompany, NewCompanyInvestor, NewConnection, NewInvestor,
    NewKeyPerson, NewPotentialAcquirer, NewResearchSource, NewSignal, Pipeline, PipelineEntry,
    PipelineStage, PipelineUpdate, PortfolioLink, PotentialAcquirer, ResearchSource, Signal,
    SignalWithCompany,
};

#[derive(Default)]
struct Tables {
    companies: Vec<Company>,
    signals: Vec<Signal>,
    connections: Vec<Connection>,
    investors: Vec<Investor>,
    company_investors: Vec<CompanyInvestor>,
    pipeline: Vec<Pipeline>,
    key_people: Vec<KeyPerson>,
    research_sources: Vec<ResearchSource>,
    potential_acquirers: Vec<PotentialAcquirer>,
}

impl Tables {
    fn company(&self, id: Uuid) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    /// 与数据库外键约束一致：引用的公司必须存在
    fn require_company(&self, table: &str, id: Uuid) -> StoreResult<()> {
        if self.company(id).is_some() {
            return Ok(());
        }
        Err(foreign_key_error(table, "company_id", id))
    }

    fn require_investor(&self, table: &str, id: Uuid) -> StoreResult<()> {
        if self.investors.iter().any(|i| i.id == id) {
            return Ok(());
        }
        Err(foreign_key_error(table, "investor_id", id))
    }

    fn summary(&self, company_id: Option<Uuid>) -> Option<CompanySummary> {
        company_id
            .and_then(|id| self.company(id))
            .map(CompanySummary::from)
    }

    fn pipeline_entries<F>(&self, keep: F) -> Vec<PipelineEntry>
    where
        F: Fn(&Pipeline) -> bool,
    {
        let mut entries: Vec<PipelineEntry> = self
            .pipeline
            .iter()
            .filter(|p| keep(p))
            .map(|p| PipelineEntry {
                pipeline: p.clone(),
                companies: self.summary(p.company_id),
            })
            .collect();
        entries.sort_by(|a, b| desc_nulls_last(a.pipeline.priority, b.pipeline.priority));
        entries
    }
}

fn foreign_key_error(table: &str, column: &str, id: Uuid) -> StoreError {
    StoreError::Api {
        status: 409,
        code: FOREIGN_KEY_VIOLATION.to_string(),
        message: format!(
            "insert or update on table \"{}\" violates foreign key constraint: {} {} not present",
            table, column, id
        ),
    }
}

/// 降序排列，空值排在最后
fn desc_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 与 PostgREST 存储语义一致的内存实现
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn company_count(&self) -> usize {
        self.tables.read().await.companies.len()
    }

    pub async fn signal_count(&self) -> usize {
        self.tables.read().await.signals.len()
    }

    pub async fn pipeline_count(&self) -> usize {
        self.tables.read().await.pipeline.len()
    }

    pub async fn connection_count(&self) -> usize {
        self.tables.read().await.connections.len()
    }

    pub async fn investor_count(&self) -> usize {
        self.tables.read().await.investors.len()
    }

    pub async fn investor_link_count(&self) -> usize {
        self.tables.read().await.company_investors.len()
    }

    pub async fn key_person_count(&self) -> usize {
        self.tables.read().await.key_people.len()
    }

    pub async fn research_source_count(&self) -> usize {
        self.tables.read().await.research_sources.len()
    }

    pub async fn acquirer_count(&self) -> usize {
        self.tables.read().await.potential_acquirers.len()
    }
}

fn apply_company(company: &mut Company, new: &NewCompany) {
    company.location = new.location.clone();
    company.province = new.province.to_string();
    if new.legal_name.is_some() {
        company.legal_name = new.legal_name.clone();
    }
    if new.industry.is_some() {
        company.industry = new.industry.clone();
    }
    if new.founded_year.is_some() {
        company.founded_year = new.founded_year;
    }
    if new.website.is_some() {
        company.website = new.website.clone();
    }
    if let Some(ownership) = new.ownership_type {
        company.ownership_type = Some(ownership.to_string());
    }
    if new.revenue_estimate.is_some() {
        company.revenue_estimate = new.revenue_estimate;
    }
    if new.employee_count.is_some() {
        company.employee_count = new.employee_count;
    }
    if let Some(confidence) = new.confidence {
        company.confidence = Some(confidence.to_string());
    }
    if new.markdown_content.is_some() {
        company.markdown_content = new.markdown_content.clone();
    }

    company.scores.merge(&new.scores);
    // 数据库生成列
    company.succession_composite = company.scores.composite();
    company.succession_readiness = company.scores.readiness().map(str::to_string);
    company.updated_at = Some(Utc::now());
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_company(&self, new: &NewCompany) -> StoreResult<Company> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.companies.iter_mut().find(|c| c.name == new.name) {
            apply_company(existing, new);
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let mut company = Company {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            legal_name: None,
            location: new.location.clone(),
            province: new.province.to_string(),
            industry: None,
            founded_year: None,
            website: None,
            ownership_type: None,
            revenue_estimate: None,
            employee_count: None,
            scores: Default::default(),
            succession_composite: None,
            succession_readiness: None,
            confidence: None,
            markdown_content: None,
            research_date: Some(now.date_naive().to_string()),
            created_at: Some(now),
            updated_at: Some(now),
        };
        apply_company(&mut company, new);
        tables.companies.push(company.clone());
        Ok(company)
    }

    async fn find_company_by_name(&self, name: &str) -> StoreResult<Option<Company>> {
        let needle = name.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .companies
            .iter()
            .find(|c| c.name.to_lowercase().contains(&needle))
            .cloned())
    }

    async fn list_companies(&self) -> StoreResult<Vec<DashboardCompany>> {
        fn count(company_id: Uuid, ids: impl Iterator<Item = Option<Uuid>>) -> Option<i64> {
            Some(ids.filter(|id| *id == Some(company_id)).count() as i64)
        }

        let tables = self.tables.read().await;
        let mut rows: Vec<DashboardCompany> = tables
            .companies
            .iter()
            .map(|company| DashboardCompany {
                company: company.clone(),
                people_count: count(company.id, tables.key_people.iter().map(|p| p.company_id)),
                source_count: count(
                    company.id,
                    tables.research_sources.iter().map(|s| s.company_id),
                ),
                acquirer_count: count(
                    company.id,
                    tables.potential_acquirers.iter().map(|a| a.company_id),
                ),
            })
            .collect();

        rows.sort_by(|a, b| {
            desc_nulls_last(
                a.company.succession_composite,
                b.company.succession_composite,
            )
        });
        Ok(rows)
    }

    async fn insert_signal(&self, new: &NewSignal) -> StoreResult<Signal> {
        let mut tables = self.tables.write().await;
        tables.require_company("signals", new.company_id)?;

        let signal = Signal {
            id: Uuid::new_v4(),
            company_id: Some(new.company_id),
            signal_type: Some(new.signal_type.to_string()),
            signal_category: Some(new.signal_category.clone()),
            description: new.description.clone(),
            source_url: new.source_url.clone(),
            confidence: Some(new.confidence.to_string()),
            signal_date: new.signal_date.clone(),
            created_at: Some(Utc::now()),
        };
        tables.signals.push(signal.clone());
        Ok(signal)
    }

    async fn signals_by_company(&self, company_id: Uuid) -> StoreResult<Vec<Signal>> {
        let tables = self.tables.read().await;
        let mut signals: Vec<Signal> = tables
            .signals
            .iter()
            .filter(|s| s.company_id == Some(company_id))
            .cloned()
            .collect();
        signals.sort_by(|a, b| desc_nulls_last(a.signal_date.as_ref(), b.signal_date.as_ref()));
        Ok(signals)
    }

    async fn recent_signals(&self, limit: usize) -> StoreResult<Vec<SignalWithCompany>> {
        let tables = self.tables.read().await;
        // 同一时刻写入的信号，后写入的排在前面
        let mut signals: Vec<&Signal> = tables.signals.iter().rev().collect();
        signals.sort_by(|a, b| desc_nulls_last(a.created_at, b.created_at));

        Ok(signals
            .into_iter()
            .take(limit)
            .map(|signal| SignalWithCompany {
                signal: signal.clone(),
                companies: tables.summary(signal.company_id).map(|summary| CompanySummary {
                    succession_readiness: None,
                    ..summary
                }),
            })
            .collect())
    }

    async fn insert_connection(&self, new: &NewConnection) -> StoreResult<Connection> {
        let mut tables = self.tables.write().await;
        tables.require_company("connections", new.company_id)?;

        let connection = Connection {
            id: Uuid::new_v4(),
            company_id: Some(new.company_id),
            connection_type: Some(new.connection_type.to_string()),
            connection_detail: new.connection_detail.clone(),
            potential_introducer: new.potential_introducer.clone(),
            introducer_relationship: new.introducer_relationship.clone(),
            source_url: new.source_url.clone(),
            created_at: Some(Utc::now()),
        };
        tables.connections.push(connection.clone());
        Ok(connection)
    }

    async fn connections_by_company(&self, company_id: Uuid) -> StoreResult<Vec<Connection>> {
        let tables = self.tables.read().await;
        Ok(tables
            .connections
            .iter()
            .filter(|c| c.company_id == Some(company_id))
            .cloned()
            .collect())
    }

    async fn upsert_investor(&self, new: &NewInvestor) -> StoreResult<Investor> {
        let mut tables = self.tables.write().await;

        let index = match tables.investors.iter().position(|i| i.name == new.name) {
            Some(index) => index,
            None => {
                tables.investors.push(Investor {
                    id: Uuid::new_v4(),
                    name: new.name.clone(),
                    investor_type: None,
                    website: None,
                    sectors: None,
                    geographic_focus: None,
                    source_url: String::new(),
                    created_at: Some(Utc::now()),
                });
                tables.investors.len() - 1
            }
        };

        let investor = &mut tables.investors[index];
        investor.investor_type = Some(new.investor_type.to_string());
        investor.source_url = new.source_url.clone();
        if new.website.is_some() {
            investor.website = new.website.clone();
        }
        if new.sectors.is_some() {
            investor.sectors = new.sectors.clone();
        }
        if new.geographic_focus.is_some() {
            investor.geographic_focus = new.geographic_focus.clone();
        }
        Ok(investor.clone())
    }

    async fn link_company_investor(
        &self,
        new: &NewCompanyInvestor,
    ) -> StoreResult<CompanyInvestor> {
        let mut tables = self.tables.write().await;
        tables.require_company("company_investors", new.company_id)?;
        tables.require_investor("company_investors", new.investor_id)?;

        let existing = tables.company_investors.iter().position(|l| {
            l.company_id == Some(new.company_id) && l.investor_id == Some(new.investor_id)
        });
        let index = match existing {
            Some(index) => index,
            None => {
                tables.company_investors.push(CompanyInvestor {
                    id: Uuid::new_v4(),
                    company_id: Some(new.company_id),
                    investor_id: Some(new.investor_id),
                    investment_date: None,
                    investment_amount: None,
                    board_seat: None,
                    source_url: String::new(),
                    created_at: Some(Utc::now()),
                });
                tables.company_investors.len() - 1
            }
        };

        let link = &mut tables.company_investors[index];
        link.board_seat = Some(new.board_seat);
        link.source_url = new.source_url.clone();
        if new.investment_date.is_some() {
            link.investment_date = new.investment_date.clone();
        }
        if new.investment_amount.is_some() {
            link.investment_amount = new.investment_amount;
        }
        Ok(link.clone())
    }

    async fn investors_by_company(&self, company_id: Uuid) -> StoreResult<Vec<InvestorLink>> {
        let tables = self.tables.read().await;
        Ok(tables
            .company_investors
            .iter()
            .filter(|l| l.company_id == Some(company_id))
            .map(|l| InvestorLink {
                link: l.clone(),
                investor: l
                    .investor_id
                    .and_then(|id| tables.investors.iter().find(|i| i.id == id))
                    .cloned(),
            })
            .collect())
    }

    async fn companies_by_investor(&self, investor_id: Uuid) -> StoreResult<Vec<PortfolioLink>> {
        let tables = self.tables.read().await;
        Ok(tables
            .company_investors
            .iter()
            .filter(|l| l.investor_id == Some(investor_id))
            .map(|l| PortfolioLink {
                link: l.clone(),
                company: l.company_id.and_then(|id| tables.company(id)).cloned(),
            })
            .collect())
    }

    async fn upsert_pipeline(&self, update: &PipelineUpdate) -> StoreResult<Pipeline> {
        let mut tables = self.tables.write().await;
        tables.require_company("pipeline", update.company_id)?;

        let now = Utc::now();
        let existing = tables
            .pipeline
            .iter()
            .position(|p| p.company_id == Some(update.company_id));
        let index = match existing {
            Some(index) => index,
            None => {
                tables.pipeline.push(Pipeline {
                    id: Uuid::new_v4(),
                    company_id: Some(update.company_id),
                    stage: None,
                    priority: None,
                    client_type: None,
                    next_action: None,
                    next_action_date: None,
                    notes: None,
                    created_at: Some(now),
                    updated_at: None,
                });
                tables.pipeline.len() - 1
            }
        };

        let row = &mut tables.pipeline[index];
        row.stage = Some(update.stage.to_string());
        row.priority = Some(update.priority);
        row.client_type = Some(update.client_type.to_string());
        if update.next_action.is_some() {
            row.next_action = update.next_action.clone();
        }
        if update.next_action_date.is_some() {
            row.next_action_date = update.next_action_date.clone();
        }
        if update.notes.is_some() {
            row.notes = update.notes.clone();
        }
        row.updated_at = Some(now);
        Ok(row.clone())
    }

    async fn pipeline_by_stage(&self, stage: PipelineStage) -> StoreResult<Vec<PipelineEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.pipeline_entries(|p| p.stage.as_deref() == Some(stage.as_str())))
    }

    async fn active_pipeline(&self) -> StoreResult<Vec<PipelineEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.pipeline_entries(|p| {
            p.stage
                .as_deref()
                .and_then(|s| s.parse::<PipelineStage>().ok())
                .is_some_and(|stage| stage.is_active())
        }))
    }

    async fn insert_key_person(&self, new: &NewKeyPerson) -> StoreResult<KeyPerson> {
        let mut tables = self.tables.write().await;
        tables.require_company("key_people", new.company_id)?;

        let person = KeyPerson {
            id: Uuid::new_v4(),
            company_id: Some(new.company_id),
            name: new.name.clone(),
            title: new.title.clone(),
            role: Some(new.role.to_string()),
            ownership_percentage: new.ownership_percentage,
            age_estimate: new.age_estimate,
            tenure_years: new.tenure_years,
            linkedin_url: new.linkedin_url.clone(),
            notes: new.notes.clone(),
            source_url: new.source_url.clone(),
            created_at: Some(Utc::now()),
        };
        tables.key_people.push(person.clone());
        Ok(person)
    }

    async fn insert_research_source(
        &self,
        new: &NewResearchSource,
    ) -> StoreResult<ResearchSource> {
        let mut tables = self.tables.write().await;
        tables.require_company("research_sources", new.company_id)?;

        let now = Utc::now();
        let source = ResearchSource {
            id: Uuid::new_v4(),
            company_id: Some(new.company_id),
            source_name: new.source_name.clone(),
            source_url: new.source_url.clone(),
            source_type: Some(new.source_type.to_string()),
            data_points: new.data_points.clone(),
            confidence: Some(new.confidence.to_string()),
            access_date: Some(now.date_naive().to_string()),
            created_at: Some(now),
        };
        tables.research_sources.push(source.clone());
        Ok(source)
    }

    async fn insert_potential_acquirer(
        &self,
        new: &NewPotentialAcquirer,
    ) -> StoreResult<PotentialAcquirer> {
        let mut tables = self.tables.write().await;
        tables.require_company("potential_acquirers", new.company_id)?;

        let acquirer = PotentialAcquirer {
            id: Uuid::new_v4(),
            company_id: Some(new.company_id),
            acquirer_name: new.acquirer_name.clone(),
            acquirer_type: Some(new.acquirer_type.to_string()),
            rationale: new.rationale.clone(),
            recent_deals: new.recent_deals.clone(),
            source_url: new.source_url.clone(),
            created_at: Some(Utc::now()),
        };
        tables.potential_acquirers.push(acquirer.clone());
        Ok(acquirer)
    }
}
