//! Row-index selection handlers for the radio-style tabs

use tracing::debug;

use perfx_api::TabItems;
use perfx_core::{ResourceId, Tab};

use crate::filter::FilterOp;
use crate::state::AppState;

use super::UpdateResult;

/// Select (or deselect) the report shown at `index` of the reports page
pub fn handle_toggle_report(
    state: &AppState,
    index: usize,
    measure: Option<ResourceId>,
) -> UpdateResult {
    let report = match state.tab_page(Tab::Reports).map(|page| &page.items) {
        Some(TabItems::Reports(reports)) => reports.get(index),
        _ => None,
    };
    match report {
        Some(report) => UpdateResult::write(FilterOp::SelectReport {
            report: Box::new(report.clone()),
            measure,
        }),
        None => {
            debug!("No report at row {}", index);
            UpdateResult::none()
        }
    }
}

/// Load (or unload) the saved plot shown at `index` of the plots page
pub fn handle_toggle_plot(state: &AppState, index: usize) -> UpdateResult {
    let plot = match state.tab_page(Tab::Plots).map(|page| &page.items) {
        Some(TabItems::Plots(plots)) => plots.get(index),
        _ => None,
    };
    match plot {
        Some(plot) => UpdateResult::write(FilterOp::SelectPlot(Box::new(plot.clone()))),
        None => {
            debug!("No plot at row {}", index);
            UpdateResult::none()
        }
    }
}
