//! Wire types of the perf API
//!
//! Shapes of the JSON bodies returned by `GET /v0/projects/{project}`,
//! `GET /v0/projects/{project}/perf` and the five tab list endpoints.
//! Unknown fields are ignored so the client tolerates newer servers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use perfx_core::{DimensionSet, Identified, ResourceId, Tab};

/// Project visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Project metadata
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JsonProject {
    pub uuid: ResourceId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Head (branch version lineage) reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonHead {
    pub uuid: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonBranch {
    pub uuid: ResourceId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub head: Option<JsonHead>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonTestbed {
    pub uuid: ResourceId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonBenchmark {
    pub uuid: ResourceId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonMeasure {
    pub uuid: ResourceId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub units: String,
}

/// A saved (pinned) plot
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonPlot {
    pub uuid: ResourceId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lower_value: bool,
    #[serde(default)]
    pub upper_value: bool,
    #[serde(default)]
    pub lower_boundary: bool,
    #[serde(default)]
    pub upper_boundary: bool,
    #[serde(default)]
    pub branches: DimensionSet,
    #[serde(default)]
    pub testbeds: DimensionSet,
    #[serde(default)]
    pub benchmarks: DimensionSet,
    #[serde(default)]
    pub measures: DimensionSet,
}

/// One benchmark of a report with the measures it recorded
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonReportResult {
    pub benchmark: JsonBenchmark,
    #[serde(default)]
    pub measures: Vec<JsonMeasure>,
}

/// A submitted benchmark run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonReport {
    pub uuid: ResourceId,
    pub branch: JsonBranch,
    pub testbed: JsonTestbed,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub results: Vec<JsonReportResult>,
}

impl JsonReport {
    /// Distinct measures recorded by this report, in first-seen order
    pub fn measures(&self) -> DimensionSet {
        self.results
            .iter()
            .flat_map(|result| result.measures.iter().map(|m| m.uuid.clone()))
            .collect()
    }

    /// Benchmarks of this report that recorded `measure`
    pub fn benchmarks_for(&self, measure: &ResourceId) -> DimensionSet {
        self.results
            .iter()
            .filter(|result| result.measures.iter().any(|m| &m.uuid == measure))
            .map(|result| result.benchmark.uuid.clone())
            .collect()
    }
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &ResourceId {
                    &self.uuid
                }
            }
        )*
    };
}

impl_identified!(
    JsonProject,
    JsonBranch,
    JsonTestbed,
    JsonBenchmark,
    JsonMeasure,
    JsonPlot,
    JsonReport,
);

// ─────────────────────────────────────────────────────────────────
// Perf results
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JsonVersion {
    pub number: u32,
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JsonMetric {
    pub value: f64,
    #[serde(default)]
    pub lower_value: Option<f64>,
    #[serde(default)]
    pub upper_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JsonBoundary {
    #[serde(default)]
    pub lower_limit: Option<f64>,
    #[serde(default)]
    pub upper_limit: Option<f64>,
}

/// One point of a time series
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JsonPerfMetric {
    pub report: ResourceId,
    #[serde(default)]
    pub iteration: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub version: JsonVersion,
    pub metric: JsonMetric,
    #[serde(default)]
    pub boundary: Option<JsonBoundary>,
}

/// A time series grouped by branch, testbed, benchmark and measure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JsonPerfSeries {
    pub branch: JsonBranch,
    pub testbed: JsonTestbed,
    pub benchmark: JsonBenchmark,
    pub measure: JsonMeasure,
    #[serde(default)]
    pub metrics: Vec<JsonPerfMetric>,
}

/// Body of `GET /v0/projects/{project}/perf`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JsonPerf {
    pub project: JsonProject,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub results: Vec<JsonPerfSeries>,
}

impl JsonPerf {
    pub fn metric_count(&self) -> usize {
        self.results.iter().map(|series| series.metrics.len()).sum()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tab pages
// ─────────────────────────────────────────────────────────────────

/// Items of one fetched tab page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabItems {
    Reports(Vec<JsonReport>),
    Branches(Vec<JsonBranch>),
    Testbeds(Vec<JsonTestbed>),
    Benchmarks(Vec<JsonBenchmark>),
    Plots(Vec<JsonPlot>),
}

impl TabItems {
    /// Parse a JSON array body for `tab`
    pub fn from_json(tab: Tab, body: &str) -> serde_json::Result<Self> {
        Ok(match tab {
            Tab::Reports => TabItems::Reports(serde_json::from_str(body)?),
            Tab::Branches => TabItems::Branches(serde_json::from_str(body)?),
            Tab::Testbeds => TabItems::Testbeds(serde_json::from_str(body)?),
            Tab::Benchmarks => TabItems::Benchmarks(serde_json::from_str(body)?),
            Tab::Plots => TabItems::Plots(serde_json::from_str(body)?),
        })
    }

    pub fn empty(tab: Tab) -> Self {
        match tab {
            Tab::Reports => TabItems::Reports(Vec::new()),
            Tab::Branches => TabItems::Branches(Vec::new()),
            Tab::Testbeds => TabItems::Testbeds(Vec::new()),
            Tab::Benchmarks => TabItems::Benchmarks(Vec::new()),
            Tab::Plots => TabItems::Plots(Vec::new()),
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            TabItems::Reports(_) => Tab::Reports,
            TabItems::Branches(_) => Tab::Branches,
            TabItems::Testbeds(_) => Tab::Testbeds,
            TabItems::Benchmarks(_) => Tab::Benchmarks,
            TabItems::Plots(_) => Tab::Plots,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TabItems::Reports(items) => items.len(),
            TabItems::Branches(items) => items.len(),
            TabItems::Testbeds(items) => items.len(),
            TabItems::Benchmarks(items) => items.len(),
            TabItems::Plots(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fetched page of a tab list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPage {
    pub items: TabItems,
    /// Total across all pages, from the `X-Total-Count` header
    pub total_count: Option<u64>,
}
