//! Test helpers: a scripted in-memory [`PerfApi`]
//!
//! Available to other crates' tests through the `test-helpers` feature.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use perfx_core::prelude::*;
use perfx_core::{PerfQuery, ResourceId, Tab};

use crate::client::{PerfApi, TabRequest};
use crate::protocol::{
    JsonBenchmark, JsonBranch, JsonHead, JsonMeasure, JsonPerf, JsonProject, JsonReport,
    JsonReportResult, JsonTestbed, TabItems, TabPage, Visibility,
};

/// A call recorded by [`FakePerfApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Project {
        project: String,
        token: Option<String>,
    },
    Perf {
        project: String,
        query: PerfQuery,
        token: Option<String>,
    },
    TabPage {
        project: String,
        request: TabRequest,
    },
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<FakeCall>,
    /// HTTP status to fail perf requests with
    perf_failure: Option<u16>,
    project_failure: Option<u16>,
    perf: Option<JsonPerf>,
    reports: Vec<JsonReport>,
    branches: Vec<JsonBranch>,
}

/// Scripted [`PerfApi`] that records every call
#[derive(Debug, Clone, Default)]
pub struct FakePerfApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakePerfApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.state.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    pub fn perf_calls(&self) -> Vec<PerfQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FakeCall::Perf { query, .. } => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn tab_calls(&self, tab: Tab) -> Vec<TabRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FakeCall::TabPage { request, .. } if request.tab == tab => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn fail_perf_with(&self, status: Option<u16>) {
        if let Ok(mut state) = self.state.lock() {
            state.perf_failure = status;
        }
    }

    pub fn fail_project_with(&self, status: Option<u16>) {
        if let Ok(mut state) = self.state.lock() {
            state.project_failure = status;
        }
    }

    pub fn set_perf(&self, perf: JsonPerf) {
        if let Ok(mut state) = self.state.lock() {
            state.perf = Some(perf);
        }
    }

    pub fn set_reports(&self, reports: Vec<JsonReport>) {
        if let Ok(mut state) = self.state.lock() {
            state.reports = reports;
        }
    }

    pub fn set_branches(&self, branches: Vec<JsonBranch>) {
        if let Ok(mut state) = self.state.lock() {
            state.branches = branches;
        }
    }

    fn record(&self, call: FakeCall) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.push(call);
        }
    }
}

impl PerfApi for FakePerfApi {
    async fn get_project(&self, project: &str, token: Option<&str>) -> Result<JsonProject> {
        self.record(FakeCall::Project {
            project: project.to_string(),
            token: token.map(String::from),
        });
        let failure = self.state.lock().ok().and_then(|s| s.project_failure);
        match failure {
            Some(status) => Err(Error::http(status, "project unavailable")),
            None => Ok(test_project(project)),
        }
    }

    async fn get_perf(
        &self,
        project: &str,
        query: &PerfQuery,
        token: Option<&str>,
    ) -> Result<JsonPerf> {
        self.record(FakeCall::Perf {
            project: project.to_string(),
            query: query.clone(),
            token: token.map(String::from),
        });
        let (failure, perf) = match self.state.lock() {
            Ok(state) => (state.perf_failure, state.perf.clone()),
            Err(_) => (None, None),
        };
        match failure {
            Some(status) => Err(Error::http(status, "perf unavailable")),
            None => Ok(perf.unwrap_or_else(|| JsonPerf {
                project: test_project(project),
                start_time: query.start_time,
                end_time: query.end_time,
                results: Vec::new(),
            })),
        }
    }

    async fn get_tab_page(
        &self,
        project: &str,
        request: &TabRequest,
        _token: Option<&str>,
    ) -> Result<TabPage> {
        self.record(FakeCall::TabPage {
            project: project.to_string(),
            request: request.clone(),
        });
        let items = match self.state.lock() {
            Ok(state) => match request.tab {
                Tab::Reports => TabItems::Reports(page_of(&state.reports, request)),
                Tab::Branches => TabItems::Branches(page_of(&state.branches, request)),
                tab => TabItems::empty(tab),
            },
            Err(_) => TabItems::empty(request.tab),
        };
        Ok(TabPage {
            items,
            total_count: None,
        })
    }
}

fn page_of<T: Clone>(all: &[T], request: &TabRequest) -> Vec<T> {
    let per_page = request.per_page as usize;
    let skip = (request.page.saturating_sub(1) as usize) * per_page;
    all.iter().skip(skip).take(per_page).cloned().collect()
}

fn id(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap_or_else(|| panic!("blank test id"))
}

pub fn test_project(slug: &str) -> JsonProject {
    JsonProject {
        uuid: id(&format!("{slug}-uuid")),
        name: slug.to_string(),
        slug: slug.to_string(),
        url: None,
        visibility: Visibility::Public,
    }
}

pub fn test_branch(uuid: &str) -> JsonBranch {
    JsonBranch {
        uuid: id(uuid),
        name: uuid.to_string(),
        slug: uuid.to_string(),
        head: Some(JsonHead {
            uuid: id(&format!("{uuid}-head")),
        }),
    }
}

/// Report on `branch`/`testbed` where each `(benchmark, measures)` pair was recorded
pub fn test_report(
    uuid: &str,
    branch: &str,
    testbed: &str,
    results: &[(&str, &[&str])],
) -> JsonReport {
    let time = DateTime::<Utc>::from_timestamp_millis(1_705_320_000_000).unwrap_or_default();
    JsonReport {
        uuid: id(uuid),
        branch: test_branch(branch),
        testbed: JsonTestbed {
            uuid: id(testbed),
            name: testbed.to_string(),
            slug: testbed.to_string(),
        },
        start_time: time,
        end_time: time,
        results: results
            .iter()
            .map(|(benchmark, measures)| JsonReportResult {
                benchmark: JsonBenchmark {
                    uuid: id(benchmark),
                    name: benchmark.to_string(),
                    slug: benchmark.to_string(),
                },
                measures: measures
                    .iter()
                    .map(|measure| JsonMeasure {
                        uuid: id(measure),
                        name: measure.to_string(),
                        slug: measure.to_string(),
                        units: String::new(),
                    })
                    .collect(),
            })
            .collect(),
    }
}
