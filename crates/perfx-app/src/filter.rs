//! Filter state and its pure mutation operations
//!
//! [`FilterState`] is what gets sent to the perf endpoint; [`DisplayState`]
//! is view configuration that only travels in the URL. Every [`FilterOp`]
//! is a pure `(params) -> params'` reducer; the caller is responsible for
//! writing the result back through the URL.

use chrono::{DateTime, Utc};
use serde::Serialize;

use perfx_api::{JsonPlot, JsonReport};
use perfx_core::{DimensionSet, ResourceId, Tab, XAxis};

use crate::params::ExplorerParams;

/// The remote-query subset of the exploration state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub branches: DimensionSet,
    pub heads: DimensionSet,
    pub testbeds: DimensionSet,
    pub benchmarks: DimensionSet,
    pub measures: DimensionSet,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl FilterState {
    /// The primary measure of the plot
    pub fn selected_measure(&self) -> Option<&ResourceId> {
        self.measures.first()
    }
}

/// View configuration that is never sent to the perf query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub tab: Tab,
    pub key_visible: bool,
    pub x_axis: XAxis,
    pub clear: bool,
    pub lower_value: bool,
    pub upper_value: bool,
    pub lower_boundary: bool,
    pub upper_boundary: bool,
    pub selected_report: Option<ResourceId>,
    pub selected_plot: Option<ResourceId>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            tab: Tab::Reports,
            key_visible: true,
            x_axis: XAxis::DateTime,
            clear: false,
            lower_value: false,
            upper_value: false,
            lower_boundary: false,
            upper_boundary: false,
            selected_report: None,
            selected_plot: None,
        }
    }
}

/// A discrete change to the filter or display state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOp {
    /// Single-select measure; `None` clears it
    SetMeasure(Option<ResourceId>),
    ToggleBranch(ResourceId),
    ToggleTestbed(ResourceId),
    ToggleBenchmark(ResourceId),
    /// Select a report row, optionally pinning the measure to chart
    SelectReport {
        report: Box<JsonReport>,
        measure: Option<ResourceId>,
    },
    /// Select (or deselect, when already selected) a saved plot
    SelectPlot(Box<JsonPlot>),
    SetStartTime(Option<DateTime<Utc>>),
    SetEndTime(Option<DateTime<Utc>>),
    SetTab(Tab),
    SetKeyVisible(bool),
    SetXAxis(XAxis),
    SetClear(bool),
    SetLowerValue(bool),
    SetUpperValue(bool),
    SetLowerBoundary(bool),
    SetUpperBoundary(bool),
}

impl FilterOp {
    /// Apply the operation, returning the new parameters
    pub fn apply(&self, params: &ExplorerParams) -> ExplorerParams {
        let mut next = params.clone();
        let filter = &mut next.filter;
        let display = &mut next.display;
        match self {
            FilterOp::SetMeasure(measure) => {
                filter.measures = DimensionSet::from_ids(measure.clone());
            }
            FilterOp::ToggleBranch(id) => filter.branches = filter.branches.toggled(id),
            FilterOp::ToggleTestbed(id) => filter.testbeds = filter.testbeds.toggled(id),
            FilterOp::ToggleBenchmark(id) => filter.benchmarks = filter.benchmarks.toggled(id),
            FilterOp::SelectReport { report, measure } => {
                return select_report(params, report, measure.as_ref());
            }
            FilterOp::SelectPlot(plot) => return select_plot(params, plot),
            FilterOp::SetStartTime(time) => filter.start_time = *time,
            FilterOp::SetEndTime(time) => filter.end_time = *time,
            FilterOp::SetTab(tab) => display.tab = *tab,
            FilterOp::SetKeyVisible(value) => display.key_visible = *value,
            FilterOp::SetXAxis(axis) => display.x_axis = *axis,
            FilterOp::SetClear(value) => display.clear = *value,
            FilterOp::SetLowerValue(value) => display.lower_value = *value,
            FilterOp::SetUpperValue(value) => display.upper_value = *value,
            FilterOp::SetLowerBoundary(value) => display.lower_boundary = *value,
            FilterOp::SetUpperBoundary(value) => display.upper_boundary = *value,
        }
        next
    }
}

/// Report rows are radio-style: re-selecting the highlighted row with the
/// same measure deselects it. Otherwise the plot is re-pointed at the
/// report's branch, head, testbed and the benchmarks that recorded the
/// chosen measure.
///
/// Measure policy: an explicit `measure` always wins; without one the
/// current measure is kept when the report recorded it, else the report's
/// first measure is used.
fn select_report(
    params: &ExplorerParams,
    report: &JsonReport,
    measure: Option<&ResourceId>,
) -> ExplorerParams {
    let mut next = params.clone();
    let report_measures = report.measures();
    let current = params.filter.selected_measure();

    let measure = measure
        .cloned()
        .or_else(|| current.filter(|m| report_measures.contains(m)).cloned())
        .or_else(|| report_measures.first().cloned());

    let already_selected = params.display.selected_report.as_ref() == Some(&report.uuid);
    if already_selected && measure.as_ref() == current {
        next.display.selected_report = None;
        return next;
    }

    next.display.selected_report = Some(report.uuid.clone());
    next.filter.branches = DimensionSet::from_ids([report.branch.uuid.clone()]);
    next.filter.heads =
        DimensionSet::from_ids(report.branch.head.as_ref().map(|head| head.uuid.clone()));
    next.filter.testbeds = DimensionSet::from_ids([report.testbed.uuid.clone()]);
    match measure {
        Some(measure) => {
            next.filter.benchmarks = report.benchmarks_for(&measure);
            next.filter.measures = DimensionSet::from_ids([measure]);
        }
        None => {
            next.filter.benchmarks = report
                .results
                .iter()
                .map(|result| result.benchmark.uuid.clone())
                .collect();
            next.filter.measures = DimensionSet::new();
        }
    }
    next
}

/// Selecting a saved plot loads its dimensions and value/boundary toggles
fn select_plot(params: &ExplorerParams, plot: &JsonPlot) -> ExplorerParams {
    let mut next = params.clone();
    if params.display.selected_plot.as_ref() == Some(&plot.uuid) {
        next.display.selected_plot = None;
        return next;
    }

    next.display.selected_plot = Some(plot.uuid.clone());
    next.filter.branches = plot.branches.clone();
    next.filter.testbeds = plot.testbeds.clone();
    next.filter.benchmarks = plot.benchmarks.clone();
    next.filter.measures = plot.measures.clone();
    next.display.lower_value = plot.lower_value;
    next.display.upper_value = plot.upper_value;
    next.display.lower_boundary = plot.lower_boundary;
    next.display.upper_boundary = plot.upper_boundary;
    next
}
