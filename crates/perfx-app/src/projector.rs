//! Projects a fetched tab page onto checkable rows

use serde::Serialize;

use perfx_api::{JsonBenchmark, JsonBranch, JsonPlot, JsonReport, JsonTestbed, TabItems};
use perfx_core::{DimensionSet, Identified, ResourceId};

use crate::params::ExplorerParams;

/// A list row with its derived selection flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabListEntry<T> {
    pub resource: T,
    pub checked: bool,
}

/// `checked` is set membership in `selected`
pub fn project<T: Identified + Clone>(items: &[T], selected: &DimensionSet) -> Vec<TabListEntry<T>> {
    items
        .iter()
        .map(|item| TabListEntry {
            checked: selected.contains(item.id()),
            resource: item.clone(),
        })
        .collect()
}

/// Radio-style: at most the one row matching `selected` is checked
pub fn project_single<T: Identified + Clone>(
    items: &[T],
    selected: Option<&ResourceId>,
) -> Vec<TabListEntry<T>> {
    items
        .iter()
        .map(|item| TabListEntry {
            checked: selected == Some(item.id()),
            resource: item.clone(),
        })
        .collect()
}

/// Projected rows of one tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tab", content = "entries", rename_all = "lowercase")]
pub enum TabEntries {
    Reports(Vec<TabListEntry<JsonReport>>),
    Branches(Vec<TabListEntry<JsonBranch>>),
    Testbeds(Vec<TabListEntry<JsonTestbed>>),
    Benchmarks(Vec<TabListEntry<JsonBenchmark>>),
    Plots(Vec<TabListEntry<JsonPlot>>),
}

impl TabEntries {
    /// Project `items` against the current selection
    ///
    /// The reports highlight is informational only; the plotted series is
    /// driven by the selected measure.
    pub fn project(items: &TabItems, params: &ExplorerParams) -> Self {
        let filter = &params.filter;
        let display = &params.display;
        match items {
            TabItems::Reports(reports) => {
                TabEntries::Reports(project_single(reports, display.selected_report.as_ref()))
            }
            TabItems::Branches(branches) => TabEntries::Branches(project(branches, &filter.branches)),
            TabItems::Testbeds(testbeds) => TabEntries::Testbeds(project(testbeds, &filter.testbeds)),
            TabItems::Benchmarks(benchmarks) => {
                TabEntries::Benchmarks(project(benchmarks, &filter.benchmarks))
            }
            TabItems::Plots(plots) => {
                TabEntries::Plots(project_single(plots, display.selected_plot.as_ref()))
            }
        }
    }

    /// Ids of the checked rows, in row order
    pub fn checked_ids(&self) -> Vec<&ResourceId> {
        fn checked<T: Identified>(entries: &[TabListEntry<T>]) -> Vec<&ResourceId> {
            entries
                .iter()
                .filter(|entry| entry.checked)
                .map(|entry| entry.resource.id())
                .collect()
        }
        match self {
            TabEntries::Reports(entries) => checked(entries),
            TabEntries::Branches(entries) => checked(entries),
            TabEntries::Testbeds(entries) => checked(entries),
            TabEntries::Benchmarks(entries) => checked(entries),
            TabEntries::Plots(entries) => checked(entries),
        }
    }
}
