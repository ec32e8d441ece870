//! Message types for the application (TEA pattern)

use url::Url;

use perfx_api::{JsonPerf, JsonProject, TabPage};
use perfx_core::{ResourceId, Tab};

use crate::filter::FilterOp;
use crate::navigation::HistoryStep;
use crate::pagination::PaginationOp;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// The location changed; all state re-derives from `url`
    Navigated { url: Url },

    /// Browser back/forward
    Traverse(HistoryStep),

    // ─────────────────────────────────────────────────────────
    // Filter / Pagination Mutations
    // ─────────────────────────────────────────────────────────
    /// A user edit of the filter or display state
    Filter(FilterOp),

    /// A user edit of one tab's pagination
    Pagination(PaginationOp),

    /// Select the report at `index` of the current reports page
    ToggleReportChecked {
        index: usize,
        measure: Option<ResourceId>,
    },

    /// Select the saved plot at `index` of the current plots page
    TogglePlotChecked { index: usize },

    /// Raw keystrokes in a tab's search box (debounced)
    SearchInput { tab: Tab, text: String },

    /// A search that survived the debounce window
    SearchCommitted { tab: Tab, text: String },

    // ─────────────────────────────────────────────────────────
    // Fetch Results
    // ─────────────────────────────────────────────────────────
    ProjectLoaded {
        generation: u64,
        result: Result<JsonProject, String>,
    },

    PerfLoaded {
        generation: u64,
        result: Result<Box<JsonPerf>, String>,
    },

    TabPageLoaded {
        tab: Tab,
        generation: u64,
        result: Result<TabPage, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Refresh
    // ─────────────────────────────────────────────────────────
    /// Explicit refresh button
    Refresh,

    /// A record was changed elsewhere (e.g. archived); forces a re-fetch
    ResourceMutated,

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Periodic housekeeping (notification expiry)
    Tick,

    Quit,
}
