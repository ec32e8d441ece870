//! # perfx-api - Perf API Collaborator
//!
//! Outbound HTTP interface of Perf Explorer: wire types for projects, perf
//! time series and the five tab lists, plus the [`PerfApi`] trait and its
//! `reqwest` implementation.
//!
//! Depends on [`perfx_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Client
//! - [`PerfApi`] - Async trait for project, perf and tab-page fetches
//! - [`HttpPerfApi`] - `reqwest` implementation with bearer-token support
//! - [`TabRequest`] - Page/search/window query for a tab list
//!
//! ### Protocol
//! - [`JsonPerf`], [`JsonPerfSeries`] - Perf results grouped by branch/testbed/benchmark/measure
//! - [`JsonReport`], [`JsonBranch`], [`JsonTestbed`], [`JsonBenchmark`], [`JsonPlot`] - Tab resources
//! - [`TabItems`], [`TabPage`] - A fetched page of any tab

pub mod client;
pub mod protocol;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{HttpPerfApi, LocalPerfApi, PerfApi, TabRequest, CONNECT_TIMEOUT};
pub use protocol::{
    JsonBenchmark, JsonBoundary, JsonBranch, JsonHead, JsonMeasure, JsonMetric, JsonPerf,
    JsonPerfMetric, JsonPerfSeries, JsonPlot, JsonProject, JsonReport, JsonReportResult,
    JsonTestbed, JsonVersion, TabItems, TabPage, Visibility,
};
