//! Application state (Model in TEA pattern)

use std::time::Duration;

use url::Url;

use perfx_api::{JsonPerf, JsonProject, TabPage, TabRequest};
use perfx_core::{Dimension, PerfQuery, ResourceId, Tab};

use crate::config::Settings;
use crate::executor::{self, FetchKey, FetchSlot};
use crate::navigation::query_map;
use crate::notification::Notifications;
use crate::params::{encode, ExplorerParams, ParameterSet};
use crate::projector::TabEntries;
use crate::refresh::RefreshCounter;

pub type ProjectSlot = FetchSlot<FetchKey<()>, JsonProject>;
pub type PerfSlot = FetchSlot<FetchKey<PerfQuery>, Box<JsonPerf>>;
pub type TabSlot = FetchSlot<FetchKey<TabRequest>, TabPage>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// One fetch slot per tab list
#[derive(Debug, Clone, Default)]
pub struct TabSlots {
    slots: [TabSlot; 5],
}

impl TabSlots {
    fn index(tab: Tab) -> usize {
        match tab {
            Tab::Reports => 0,
            Tab::Branches => 1,
            Tab::Testbeds => 2,
            Tab::Benchmarks => 3,
            Tab::Plots => 4,
        }
    }

    pub fn get(&self, tab: Tab) -> &TabSlot {
        &self.slots[Self::index(tab)]
    }

    pub fn get_mut(&mut self, tab: Tab) -> &mut TabSlot {
        &mut self.slots[Self::index(tab)]
    }
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,

    pub settings: Settings,

    /// Location the current parameters were derived from
    pub location: Url,

    /// Project slug taken from the location path
    pub project: String,

    /// Bearer token for private projects
    pub token: Option<String>,

    /// Typed view of `location`'s query
    pub params: ExplorerParams,

    pub refresh: RefreshCounter,

    pub project_slot: ProjectSlot,
    pub perf_slot: PerfSlot,
    pub tab_slots: TabSlots,

    pub notifications: Notifications,
}

impl AppState {
    pub fn new(location: Url, project: String, token: Option<String>, settings: Settings) -> Self {
        let params = ExplorerParams::from_query_map(&query_map(&location));
        Self {
            phase: AppPhase::Running,
            settings,
            location,
            project,
            token,
            params,
            refresh: RefreshCounter::default(),
            project_slot: ProjectSlot::default(),
            perf_slot: PerfSlot::default(),
            tab_slots: TabSlots::default(),
            notifications: Notifications::default(),
        }
    }

    /// Re-derive parameters from a new location
    pub fn set_location(&mut self, url: Url) {
        self.params = ExplorerParams::from_query_map(&query_map(&url));
        self.location = url;
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    // ─────────────────────────────────────────────────────────
    // Selectors
    // ─────────────────────────────────────────────────────────

    /// True while the plot still needs a selection in some dimension
    pub fn is_plot_init(&self) -> bool {
        executor::is_plot_init(&self.params.filter)
    }

    pub fn missing_dimensions(&self) -> Vec<Dimension> {
        executor::missing_dimensions(&self.params.filter)
    }

    pub fn perf_query(&self) -> PerfQuery {
        executor::build_query(&self.params.filter)
    }

    pub fn selected_measure(&self) -> Option<&ResourceId> {
        self.params.filter.selected_measure()
    }

    /// Last successfully fetched perf results (may be stale after a failure)
    pub fn perf(&self) -> Option<&JsonPerf> {
        self.perf_slot.data().map(|perf| perf.as_ref())
    }

    pub fn project_info(&self) -> Option<&JsonProject> {
        self.project_slot.data()
    }

    pub fn tab_page(&self, tab: Tab) -> Option<&TabPage> {
        self.tab_slots.get(tab).data()
    }

    /// Rows of `tab` with their checked flags against the current selection
    pub fn tab_entries(&self, tab: Tab) -> Option<TabEntries> {
        self.tab_page(tab)
            .map(|page| TabEntries::project(&page.items, &self.params))
    }

    /// Query string for sharing the current view with `set`
    pub fn share_query(&self, set: &ParameterSet) -> String {
        encode(&self.params, set)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.settings.ui.notification_ms)
    }

    pub fn truncation_warning_ttl(&self) -> Duration {
        Duration::from_millis(self.settings.ui.truncation_warning_ms)
    }

    /// True while any fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.project_slot.is_loading()
            || self.perf_slot.is_loading()
            || Tab::ALL.iter().any(|tab| self.tab_slots.get(*tab).is_loading())
    }

    /// Tabs whose lists are kept loaded
    pub fn active_tabs(&self) -> Vec<Tab> {
        if self.settings.behavior.fetch_all_tabs {
            Tab::ALL.to_vec()
        } else {
            vec![self.params.display.tab]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PerTabPagination;

    fn state(url: &str) -> AppState {
        AppState::new(
            Url::parse(url).unwrap(),
            "demo".to_string(),
            None,
            Settings::default(),
        )
    }

    #[test]
    fn test_new_state_derives_params_from_location() {
        let state = state("https://bencher.dev/perf/demo?tab=plots&measures=m1");
        assert_eq!(state.params.display.tab, Tab::Plots);
        assert_eq!(state.selected_measure().map(|m| m.as_str()), Some("m1"));
        assert!(state.is_plot_init());
        assert!(!state.should_quit());
    }

    #[test]
    fn test_set_location_rederives() {
        let mut state = state("https://bencher.dev/perf/demo");
        state.set_location(
            Url::parse("https://bencher.dev/perf/demo?branches=b1&testbeds=t1&benchmarks=k1&measures=m1")
                .unwrap(),
        );
        assert!(!state.is_plot_init());
        assert!(state.missing_dimensions().is_empty());
    }

    #[test]
    fn test_share_query_pinned_drops_browsing_position() {
        let state = state(
            "https://bencher.dev/perf/demo?branches=b1&measures=m1&tab=plots&plots_page=3&lower_value=true",
        );
        assert_eq!(
            state.share_query(&ParameterSet::PINNED),
            "branches=b1&measures=m1&lower_value=true"
        );
    }

    #[test]
    fn test_active_tabs_follow_setting() {
        let mut state = state("https://bencher.dev/perf/demo?tab=testbeds");
        assert_eq!(state.active_tabs().len(), 5);
        state.settings.behavior.fetch_all_tabs = false;
        assert_eq!(state.active_tabs(), vec![Tab::Testbeds]);
    }

    #[test]
    fn test_tab_slots_are_independent() {
        let mut slots = TabSlots::default();
        let key = FetchKey {
            project: "demo".to_string(),
            query: PerTabPagination::default().request(Tab::Branches),
            refresh: 0,
            token: None,
        };
        assert!(slots.get_mut(Tab::Branches).request(key).is_some());
        assert!(slots.get(Tab::Branches).is_loading());
        assert!(!slots.get(Tab::Testbeds).is_loading());
    }
}
