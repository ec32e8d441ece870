//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`, so subscribers see a consistent view of state
//! changes.

use url::Url;

use perfx_core::{Dimension, Tab};

use crate::notification::Notification;
use crate::projector::TabEntries;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Location
    // ─────────────────────────────────────────────────────────
    /// The location (and with it every derived parameter) changed
    LocationChanged { url: Url },

    /// The plot entered or left its incomplete-selection state
    PlotInitChanged {
        plot_init: bool,
        missing: Vec<Dimension>,
    },

    // ─────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────
    /// Fresh perf results were applied
    PerfUpdated { series: usize, metrics: usize },

    /// A fresh page of a tab list was applied
    TabPageUpdated {
        tab: Tab,
        entries: TabEntries,
        total_count: Option<u64>,
    },

    /// A page-level notification was raised
    Notification(Notification),

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    Shutdown,
}
