//! Fetch reconciliation and response handling
//!
//! After every message the engine calls [`reconcile`], which derives the
//! desired key of each slot from state. Only slots whose key changed yield
//! a [`FetchRequest`]; responses come back as `*Loaded` messages and are
//! applied only if their generation is still current.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use perfx_api::{JsonPerf, JsonProject, TabPage};
use perfx_core::Tab;

use crate::executor::{is_possibly_truncated, FetchKey, Resolution, LEGACY_URL_LENGTH_LIMIT};
use crate::navigation::History;
use crate::notification::NotificationKind;
use crate::pagination::{resolve_window, PaginationOp};
use crate::state::AppState;

use super::{FetchRequest, UpdateAction, UpdateResult};

/// Arm every slot whose key changed and return the requests to issue
///
/// `now` resolves an open reports window; it is not part of the key, so
/// the trailing window does not re-fetch on its own.
pub fn reconcile(state: &mut AppState, now: DateTime<Utc>) -> Vec<FetchRequest> {
    let mut requests = Vec::new();
    let project = state.project.clone();
    let token = state.token.clone();
    let refresh = state.refresh.value();

    let key = FetchKey {
        project: project.clone(),
        query: (),
        refresh,
        token: token.clone(),
    };
    if let Some(generation) = state.project_slot.request(key) {
        requests.push(FetchRequest::Project {
            generation,
            project: project.clone(),
            token: token.clone(),
        });
    }

    if state.is_plot_init() {
        state.perf_slot.disarm();
    } else {
        let query = state.perf_query();
        let key = FetchKey {
            project: project.clone(),
            query: query.clone(),
            refresh,
            token: token.clone(),
        };
        if let Some(generation) = state.perf_slot.request(key) {
            requests.push(FetchRequest::Perf {
                generation,
                project: project.clone(),
                query,
                token: token.clone(),
            });
        }
    }

    for tab in state.active_tabs() {
        let request = state.params.pagination.request(tab);
        let key = FetchKey {
            project: project.clone(),
            query: request.clone(),
            refresh,
            token: token.clone(),
        };
        if let Some(generation) = state.tab_slots.get_mut(tab).request(key) {
            requests.push(FetchRequest::TabPage {
                generation,
                project: project.clone(),
                request: resolve_window(&request, now),
                token: token.clone(),
            });
        }
    }

    if !requests.is_empty() {
        debug!("Reconcile armed {} fetch(es)", requests.len());
    }
    requests
}

pub fn handle_project_loaded(
    state: &mut AppState,
    generation: u64,
    result: Result<JsonProject, String>,
) -> UpdateResult {
    match state.project_slot.resolve(generation, result) {
        Resolution::Applied => {}
        Resolution::Stale => debug!("Discarding stale project response"),
        Resolution::Failed => {
            let error = state.project_slot.error().unwrap_or_default().to_string();
            warn!("Project fetch failed: {}", error);
            let ttl = state.notification_ttl();
            state.notifications.push(
                NotificationKind::Error,
                format!("Failed to load project: {error}"),
                ttl,
                Instant::now(),
            );
        }
    }
    UpdateResult::none()
}

pub fn handle_perf_loaded(
    state: &mut AppState,
    generation: u64,
    result: Result<Box<JsonPerf>, String>,
) -> UpdateResult {
    match state.perf_slot.resolve(generation, result) {
        Resolution::Applied => {
            if let Some(perf) = state.perf() {
                debug!(
                    "Perf loaded: {} series, {} metrics",
                    perf.results.len(),
                    perf.metric_count()
                );
            }
        }
        Resolution::Stale => debug!("Discarding stale perf response"),
        Resolution::Failed => {
            let error = state.perf_slot.error().unwrap_or_default().to_string();
            warn!("Perf fetch failed: {}", error);
            if is_possibly_truncated(state.location.as_str()) {
                let ttl = state.truncation_warning_ttl();
                state.notifications.push(
                    NotificationKind::TruncationWarning,
                    format!(
                        "This URL is exactly {LEGACY_URL_LENGTH_LIMIT} characters long and may have been truncated. Share the pinned view for a shorter link."
                    ),
                    ttl,
                    Instant::now(),
                );
            } else {
                let ttl = state.notification_ttl();
                state.notifications.push(
                    NotificationKind::Error,
                    format!("Failed to load perf data: {error}"),
                    ttl,
                    Instant::now(),
                );
            }
        }
    }
    UpdateResult::none()
}

pub fn handle_tab_page_loaded(
    state: &mut AppState,
    tab: Tab,
    generation: u64,
    result: Result<TabPage, String>,
) -> UpdateResult {
    let slot = state.tab_slots.get_mut(tab);
    match slot.resolve(generation, result) {
        Resolution::Applied => {
            let page = slot.key().map(|key| key.query.page).unwrap_or(1);
            let empty = slot.data().is_some_and(|data| data.items.is_empty());
            if empty && page > 1 {
                // Past the last page (e.g. after archiving its only row)
                debug!("{} page {} is empty, stepping back", tab, page);
                let ttl = state.notification_ttl();
                state.notifications.push(
                    NotificationKind::Warning,
                    format!("{tab} page {page} is empty, showing page {}", page - 1),
                    ttl,
                    Instant::now(),
                );
                return UpdateResult::action(UpdateAction::WriteParams {
                    op: PaginationOp::PageBack { tab }.into(),
                    history: History::Replace,
                });
            }
        }
        Resolution::Stale => debug!("Discarding stale {} page", tab),
        Resolution::Failed => {
            let error = slot.error().unwrap_or_default().to_string();
            warn!("{} fetch failed: {}", tab, error);
            let ttl = state.notification_ttl();
            state.notifications.push(
                NotificationKind::Error,
                format!("Failed to load {tab}: {error}"),
                ttl,
                Instant::now(),
            );
        }
    }
    UpdateResult::none()
}
