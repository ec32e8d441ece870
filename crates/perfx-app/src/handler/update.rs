//! Main update function - handles state transitions (TEA pattern)

use std::time::Instant;

use tracing::{debug, info};

use crate::message::Message;
use crate::pagination::PaginationOp;
use crate::state::{AppPhase, AppState};

use super::{fetch, selection, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::Navigated { url } => {
            debug!("Location is now {}", url);
            state.set_location(url);
            UpdateResult::none()
        }

        Message::Traverse(step) => UpdateResult::action(UpdateAction::Traverse(step)),

        // ─────────────────────────────────────────────────────────
        // Filter / Pagination Mutations
        // ─────────────────────────────────────────────────────────
        Message::Filter(op) => UpdateResult::write(op),
        Message::Pagination(op) => UpdateResult::write(op),

        Message::ToggleReportChecked { index, measure } => {
            selection::handle_toggle_report(state, index, measure)
        }
        Message::TogglePlotChecked { index } => selection::handle_toggle_plot(state, index),

        Message::SearchInput { tab, text } => {
            if !tab.has_search() {
                debug!("{} has no search box", tab);
                return UpdateResult::none();
            }
            UpdateResult::action(UpdateAction::DebounceSearch { tab, text })
        }

        Message::SearchCommitted { tab, text } => {
            UpdateResult::write(PaginationOp::SetSearch { tab, search: text })
        }

        // ─────────────────────────────────────────────────────────
        // Fetch Results
        // ─────────────────────────────────────────────────────────
        Message::ProjectLoaded { generation, result } => {
            fetch::handle_project_loaded(state, generation, result)
        }
        Message::PerfLoaded { generation, result } => {
            fetch::handle_perf_loaded(state, generation, result)
        }
        Message::TabPageLoaded {
            tab,
            generation,
            result,
        } => fetch::handle_tab_page_loaded(state, tab, generation, result),

        // ─────────────────────────────────────────────────────────
        // Refresh
        // ─────────────────────────────────────────────────────────
        Message::Refresh => {
            let value = state.refresh.bump();
            info!("Refreshing (counter {})", value);
            UpdateResult::none()
        }

        Message::ResourceMutated => {
            let value = state.refresh.bump();
            debug!("Resource changed elsewhere, re-fetching (counter {})", value);
            UpdateResult::none()
        }

        Message::Tick => {
            let expired = state.notifications.prune(Instant::now());
            if expired > 0 {
                debug!("Expired {} notification(s)", expired);
            }
            UpdateResult::none()
        }
    }
}
