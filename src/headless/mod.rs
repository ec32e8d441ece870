//! Headless mode - NDJSON event output
//!
//! The explorer has no UI of its own; headless mode drives the engine
//! against a live API and writes structured JSON events to stdout, one per
//! line, so scripts and tests can follow what the view would show.
//!
//! # Event Format
//!
//! Each event has an "event" field indicating its type, along with
//! event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"started","project":"demo","url":"https://bencher.dev/perf/demo?measures=m1","timestamp":1704700001000}
//! {"event":"plot_init","plot_init":true,"missing":["branch","testbed","benchmark"],"timestamp":1704700001001}
//! {"event":"tab_page","tab":"branches","total_count":2,"entries":{"tab":"branches","entries":[...]},"timestamp":1704700001200}
//! ```

pub mod commands;
pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use perfx_app::{AppState, FilterState, NotificationKind, TabEntries};
use perfx_core::{Dimension, Tab};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Engine created for a project
    Started {
        project: String,
        url: String,
        timestamp: i64,
    },

    /// The location changed; carries the re-derived selection
    State {
        url: String,
        tab: Tab,
        filter: FilterState,
        plot_init: bool,
        timestamp: i64,
    },

    /// The plot entered or left its incomplete-selection state
    PlotInit {
        plot_init: bool,
        missing: Vec<Dimension>,
        timestamp: i64,
    },

    /// Fresh perf results were applied
    Perf {
        series: usize,
        metrics: usize,
        timestamp: i64,
    },

    /// A fresh page of a tab list was applied
    TabPage {
        tab: Tab,
        total_count: Option<u64>,
        entries: TabEntries,
        timestamp: i64,
    },

    /// Page-level notification
    Notification {
        kind: NotificationKind,
        text: String,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn started(project: &str, url: &str) -> Self {
        Self::Started {
            project: project.to_string(),
            url: url.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn state(state: &AppState) -> Self {
        Self::State {
            url: state.location.to_string(),
            tab: state.params.display.tab,
            filter: state.params.filter.clone(),
            plot_init: state.is_plot_init(),
            timestamp: Self::now(),
        }
    }

    pub fn plot_init(plot_init: bool, missing: Vec<Dimension>) -> Self {
        Self::PlotInit {
            plot_init,
            missing,
            timestamp: Self::now(),
        }
    }

    pub fn perf(series: usize, metrics: usize) -> Self {
        Self::Perf {
            series,
            metrics,
            timestamp: Self::now(),
        }
    }

    pub fn tab_page(tab: Tab, total_count: Option<u64>, entries: TabEntries) -> Self {
        Self::TabPage {
            tab,
            total_count,
            entries,
            timestamp: Self::now(),
        }
    }

    pub fn notification(kind: NotificationKind, text: String) -> Self {
        Self::Notification {
            kind,
            text,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfx_api::test_utils::test_branch;
    use perfx_api::TabItems;
    use perfx_app::{config::Settings, ExplorerParams};
    use url::Url;

    fn to_value(event: &HeadlessEvent) -> serde_json::Value {
        let json = serde_json::to_string(event).expect("serialization failed");
        serde_json::from_str(&json).expect("invalid JSON")
    }

    #[test]
    fn test_state_serialization() {
        let url = Url::parse("https://bencher.dev/perf/demo?branches=b1&tab=plots").unwrap();
        let state = AppState::new(url, "demo".to_string(), None, Settings::default());
        let value = to_value(&HeadlessEvent::state(&state));

        assert_eq!(value["event"], "state");
        assert_eq!(value["tab"], "plots");
        assert_eq!(value["filter"]["branches"][0], "b1");
        assert_eq!(value["plot_init"], true);
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_plot_init_serialization() {
        let event = HeadlessEvent::plot_init(true, vec![Dimension::Measure]);
        let value = to_value(&event);

        assert_eq!(value["event"], "plot_init");
        assert_eq!(value["missing"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_tab_page_serialization() {
        let items = TabItems::Branches(vec![test_branch("b1"), test_branch("b2")]);
        let mut params = ExplorerParams::default();
        params.filter.branches = perfx_core::params::parse_ids("b2");
        let entries = TabEntries::project(&items, &params);

        let value = to_value(&HeadlessEvent::tab_page(Tab::Branches, Some(2), entries));
        assert_eq!(value["event"], "tab_page");
        assert_eq!(value["tab"], "branches");
        assert_eq!(value["total_count"], 2);
        assert_eq!(value["entries"]["entries"][0]["checked"], false);
        assert_eq!(value["entries"]["entries"][1]["checked"], true);
    }

    #[test]
    fn test_notification_serialization() {
        let event = HeadlessEvent::notification(
            NotificationKind::TruncationWarning,
            "URL may be truncated".to_string(),
        );
        let value = to_value(&event);

        assert_eq!(value["event"], "notification");
        assert_eq!(value["kind"], "truncation_warning");
    }

    #[test]
    fn test_error_serialization() {
        let event = HeadlessEvent::error("No project slug found".to_string(), true);
        let value = to_value(&event);

        assert_eq!(value["event"], "error");
        assert_eq!(value["fatal"], true);
        assert!(value["timestamp"].is_number());
    }
}
