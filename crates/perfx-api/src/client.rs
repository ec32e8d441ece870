//! Perf API client
//!
//! [`PerfApi`] is the seam between the state engine and the network. The
//! engine only ever sees this trait; [`HttpPerfApi`] is the `reqwest`
//! implementation used by the binary, and tests substitute a scripted fake.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use perfx_core::params::{encode_value, format_timestamp, join_pairs};
use perfx_core::prelude::*;
use perfx_core::{PerfQuery, Tab};

use crate::protocol::{JsonPerf, JsonProject, TabItems, TabPage};

/// Connect timeout for API calls
///
/// Responses themselves are never timed out: a slow perf aggregation is
/// still applied unless a newer key has superseded it.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Response header carrying the total item count of a paginated list
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Query for one page of a tab list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabRequest {
    pub tab: Tab,
    pub page: u32,
    pub per_page: u32,
    /// Free-text filter; never set for reports
    pub search: Option<String>,
    /// Report window; only used by the reports tab
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl TabRequest {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", encode_value(search)));
        }
        if let Some(start_time) = &self.start_time {
            pairs.push(("start_time", format_timestamp(start_time)));
        }
        if let Some(end_time) = &self.end_time {
            pairs.push(("end_time", format_timestamp(end_time)));
        }
        pairs
    }

    pub fn query_string(&self) -> String {
        join_pairs(self.query_pairs())
    }
}

/// Remote collaborator for project metadata, perf metrics and tab lists
///
/// All three calls accept an optional bearer token for private projects.
#[trait_variant::make(PerfApi: Send)]
pub trait LocalPerfApi {
    /// `GET /v0/projects/{project}`
    async fn get_project(&self, project: &str, token: Option<&str>) -> Result<JsonProject>;

    /// `GET /v0/projects/{project}/perf?{query}`
    async fn get_perf(
        &self,
        project: &str,
        query: &PerfQuery,
        token: Option<&str>,
    ) -> Result<JsonPerf>;

    /// `GET /v0/projects/{project}/{tab}?page&per_page&search&start_time&end_time`
    async fn get_tab_page(
        &self,
        project: &str,
        request: &TabRequest,
        token: Option<&str>,
    ) -> Result<TabPage>;
}

/// `reqwest`-backed [`PerfApi`]
#[derive(Debug, Clone)]
pub struct HttpPerfApi {
    client: reqwest::Client,
    host: Url,
}

impl HttpPerfApi {
    pub fn new(host: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("http client build failed: {e}")))?;
        Ok(Self { client, host })
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Build `{host}/v0/projects/{project}{suffix}?{query}`
    fn endpoint(&self, project: &str, suffix: &str, query: &str) -> Result<Url> {
        let path = format!("v0/projects/{}{}", encode_value(project), suffix);
        let mut url = self.host.join(&path)?;
        url.set_query((!query.is_empty()).then_some(query));
        Ok(url)
    }

    async fn get_text(&self, url: Url, token: Option<&str>) -> Result<(String, Option<u64>)> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        let total_count = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::http(status.as_u16(), error_message(status, &body)));
        }
        Ok((body, total_count))
    }
}

/// Pull a readable message out of an error body
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

impl PerfApi for HttpPerfApi {
    async fn get_project(&self, project: &str, token: Option<&str>) -> Result<JsonProject> {
        let url = self.endpoint(project, "", "")?;
        let (body, _) = self.get_text(url, token).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_perf(
        &self,
        project: &str,
        query: &PerfQuery,
        token: Option<&str>,
    ) -> Result<JsonPerf> {
        let url = self.endpoint(project, "/perf", &query.query_string())?;
        let (body, _) = self.get_text(url, token).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_tab_page(
        &self,
        project: &str,
        request: &TabRequest,
        token: Option<&str>,
    ) -> Result<TabPage> {
        let suffix = format!("/{}", request.tab.as_str());
        let url = self.endpoint(project, &suffix, &request.query_string())?;
        let (body, total_count) = self.get_text(url, token).await?;
        let items = TabItems::from_json(request.tab, &body)
            .map_err(|e| Error::protocol(format!("{} page: {e}", request.tab)))?;
        Ok(TabPage { items, total_count })
    }
}
