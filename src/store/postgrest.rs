//! 基于 PostgREST 的存储实现

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::config::DatastoreConfig;
use crate::types::{
    Company, CompanyInvestor, Connection, DashboardCompany, Investor, InvestorLink, KeyPerson,
    NewCompany, NewCompanyInvestor, NewConnection, NewInvestor, NewKeyPerson,
    NewPotentialAcquirer, NewResearchSource, NewSignal, Pipeline, PipelineEntry, PipelineStage,
    PipelineUpdate, PortfolioLink, PotentialAcquirer, ResearchSource, Signal, SignalWithCompany,
};

/// 单行读写时使用的媒体类型，0 行时服务端返回 PGRST116
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

const PIPELINE_SELECT: &str = "*,companies(name,province,industry,succession_readiness)";

/// PostgREST 错误体
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

pub struct PostgrestStore {
    client: reqwest::Client,
    url: Option<String>,
    api_key: Option<String>,
}

impl PostgrestStore {
    /// 创建存储客户端；凭据在第一次访问时才检查
    pub fn new(config: &DatastoreConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone().filter(|v| !v.trim().is_empty()),
            api_key: config.api_key.clone().filter(|v| !v.trim().is_empty()),
        })
    }

    fn endpoint(base: &str, table: &str) -> StoreResult<Url> {
        let base = Url::parse(&format!("{}/", base.trim_end_matches('/')))?;
        Ok(base.join(&format!("rest/v1/{}", table))?)
    }

    fn request(&self, method: Method, table: &str) -> StoreResult<RequestBuilder> {
        let (Some(base), Some(key)) = (self.url.as_deref(), self.api_key.as_deref()) else {
            return Err(StoreError::MissingCredentials);
        };

        let url = Self::endpoint(base, table)?;
        tracing::debug!(%method, %url, "datastore request");

        Ok(self
            .client
            .request(method, url)
            .header("apikey", key)
            .bearer_auth(key))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> StoreResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let request = self.request(Method::GET, table)?.query(query);
        Self::send(request).await
    }

    async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> StoreResult<T> {
        let request = self
            .request(Method::POST, table)?
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(body);
        Self::send(request).await
    }

    async fn upsert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        on_conflict: &str,
        body: &B,
    ) -> StoreResult<T> {
        let request = self
            .request(Method::POST, table)?
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(body);
        Self::send(request).await
    }
}

fn api_error(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => StoreError::Api {
            status,
            code: parsed.code.unwrap_or_default(),
            message: parsed.message.unwrap_or_else(|| body.to_string()),
        },
        Err(_) => StoreError::Api {
            status,
            code: String::new(),
            message: body.to_string(),
        },
    }
}

fn eq(id: Uuid) -> String {
    format!("eq.{}", id)
}

#[async_trait]
impl Store for PostgrestStore {
    async fn upsert_company(&self, company: &NewCompany) -> StoreResult<Company> {
        self.upsert("companies", "name", company).await
    }

    async fn find_company_by_name(&self, name: &str) -> StoreResult<Option<Company>> {
        let request = self
            .request(Method::GET, "companies")?
            .query(&[
                ("select", "*".to_string()),
                ("name", format!("ilike.*{}*", name)),
                ("limit", "1".to_string()),
            ])
            .header(header::ACCEPT, SINGLE_OBJECT);

        match Self::send(request).await {
            Ok(company) => Ok(Some(company)),
            Err(err) if err.is_no_rows() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn list_companies(&self) -> StoreResult<Vec<DashboardCompany>> {
        self.select(
            "company_dashboard_view",
            &[
                ("select", "*".to_string()),
                ("order", "succession_composite.desc.nullslast".to_string()),
            ],
        )
        .await
    }

    async fn insert_signal(&self, signal: &NewSignal) -> StoreResult<Signal> {
        self.insert("signals", signal).await
    }

    async fn signals_by_company(&self, company_id: Uuid) -> StoreResult<Vec<Signal>> {
        self.select(
            "signals",
            &[
                ("select", "*".to_string()),
                ("company_id", eq(company_id)),
                ("order", "signal_date.desc.nullslast".to_string()),
            ],
        )
        .await
    }

    async fn recent_signals(&self, limit: usize) -> StoreResult<Vec<SignalWithCompany>> {
        self.select(
            "signals",
            &[
                ("select", "*,companies(name,province,industry)".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn insert_connection(&self, connection: &NewConnection) -> StoreResult<Connection> {
        self.insert("connections", connection).await
    }

    async fn connections_by_company(&self, company_id: Uuid) -> StoreResult<Vec<Connection>> {
        self.select(
            "connections",
            &[("select", "*".to_string()), ("company_id", eq(company_id))],
        )
        .await
    }

    async fn upsert_investor(&self, investor: &NewInvestor) -> StoreResult<Investor> {
        self.upsert("investors", "name", investor).await
    }

    async fn link_company_investor(
        &self,
        link: &NewCompanyInvestor,
    ) -> StoreResult<CompanyInvestor> {
        self.upsert("company_investors", "company_id,investor_id", link)
            .await
    }

    async fn investors_by_company(&self, company_id: Uuid) -> StoreResult<Vec<InvestorLink>> {
        self.select(
            "company_investors",
            &[
                ("select", "*,investors(*)".to_string()),
                ("company_id", eq(company_id)),
            ],
        )
        .await
    }

    async fn companies_by_investor(&self, investor_id: Uuid) -> StoreResult<Vec<PortfolioLink>> {
        self.select(
            "company_investors",
            &[
                ("select", "*,companies(*)".to_string()),
                ("investor_id", eq(investor_id)),
            ],
        )
        .await
    }

    async fn upsert_pipeline(&self, update: &PipelineUpdate) -> StoreResult<Pipeline> {
        self.upsert("pipeline", "company_id", update).await
    }

    async fn pipeline_by_stage(&self, stage: PipelineStage) -> StoreResult<Vec<PipelineEntry>> {
        self.select(
            "pipeline",
            &[
                ("select", PIPELINE_SELECT.to_string()),
                ("stage", format!("eq.{}", stage)),
                ("order", "priority.desc.nullslast".to_string()),
            ],
        )
        .await
    }

    async fn active_pipeline(&self) -> StoreResult<Vec<PipelineEntry>> {
        self.select(
            "pipeline",
            &[
                ("select", PIPELINE_SELECT.to_string()),
                ("stage", "not.in.(closed,passed)".to_string()),
                ("order", "priority.desc.nullslast".to_string()),
            ],
        )
        .await
    }

    async fn insert_key_person(&self, person: &NewKeyPerson) -> StoreResult<KeyPerson> {
        self.insert("key_people", person).await
    }

    async fn insert_research_source(
        &self,
        source: &NewResearchSource,
    ) -> StoreResult<ResearchSource> {
        self.insert("research_sources", source).await
    }

    async fn insert_potential_acquirer(
        &self,
        acquirer: &NewPotentialAcquirer,
    ) -> StoreResult<PotentialAcquirer> {
        self.insert("potential_acquirers", acquirer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>, api_key: Option<&str>) -> DatastoreConfig {
        DatastoreConfig {
            url: url.map(str::to_string),
            api_key: api_key.map(str::to_string),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_endpoint_joins_rest_path() {
        let url = PostgrestStore::endpoint("https://abc.supabase.co/", "companies").unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/companies");

        let url = PostgrestStore::endpoint("https://abc.supabase.co", "signals").unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/signals");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_on_first_access() {
        let store = PostgrestStore::new(&config(Some("https://abc.supabase.co"), None)).unwrap();
        let err = store.list_companies().await.unwrap_err();
        assert!(matches!(err, StoreError::MissingCredentials));
        assert_eq!(
            err.to_string(),
            "Missing SUPABASE_URL or SUPABASE_ANON_KEY environment variables"
        );

        let blank = PostgrestStore::new(&config(Some("  "), Some("key"))).unwrap();
        assert!(matches!(
            blank.find_company_by_name("Acme").await,
            Err(StoreError::MissingCredentials)
        ));
    }

    #[test]
    fn test_api_error_parses_postgrest_body() {
        let err = api_error(
            406,
            r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#,
        );
        assert!(err.is_no_rows());

        let err = api_error(502, "Bad Gateway");
        assert!(!err.is_no_rows());
        assert_eq!(err.code(), Some(""));
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
