//! Per-tab pagination state
//!
//! Each of the five tabs keeps its own page, page size and search text.
//! The reports tab has a time window instead of search; when the window is
//! unset it resolves to the trailing 30 days at request time.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use perfx_api::TabRequest;
use perfx_core::Tab;

use crate::params::ExplorerParams;

/// Upper bound accepted for `*_per_page`
pub const MAX_PER_PAGE: u32 = 255;

/// Trailing window used when the reports tab has no explicit bounds
pub const DEFAULT_REPORTS_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabPagination {
    /// 1-based
    pub page: u32,
    pub per_page: u32,
    /// Empty for the reports tab
    pub search: String,
    /// Reports window; unused by the other tabs
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl TabPagination {
    pub fn new(tab: Tab) -> Self {
        Self {
            page: 1,
            per_page: tab.default_per_page(),
            search: String::new(),
            start_time: None,
            end_time: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerTabPagination {
    pub reports: TabPagination,
    pub branches: TabPagination,
    pub testbeds: TabPagination,
    pub benchmarks: TabPagination,
    pub plots: TabPagination,
}

impl Default for PerTabPagination {
    fn default() -> Self {
        Self {
            reports: TabPagination::new(Tab::Reports),
            branches: TabPagination::new(Tab::Branches),
            testbeds: TabPagination::new(Tab::Testbeds),
            benchmarks: TabPagination::new(Tab::Benchmarks),
            plots: TabPagination::new(Tab::Plots),
        }
    }
}

impl PerTabPagination {
    pub fn get(&self, tab: Tab) -> &TabPagination {
        match tab {
            Tab::Reports => &self.reports,
            Tab::Branches => &self.branches,
            Tab::Testbeds => &self.testbeds,
            Tab::Benchmarks => &self.benchmarks,
            Tab::Plots => &self.plots,
        }
    }

    pub fn get_mut(&mut self, tab: Tab) -> &mut TabPagination {
        match tab {
            Tab::Reports => &mut self.reports,
            Tab::Branches => &mut self.branches,
            Tab::Testbeds => &mut self.testbeds,
            Tab::Benchmarks => &mut self.benchmarks,
            Tab::Plots => &mut self.plots,
        }
    }

    /// Request for `tab` as stored in the URL, with the reports window left
    /// unresolved so that the request stays stable between refreshes
    pub fn request(&self, tab: Tab) -> TabRequest {
        let pagination = self.get(tab);
        let (start_time, end_time) = match tab {
            Tab::Reports => (pagination.start_time, pagination.end_time),
            _ => (None, None),
        };
        TabRequest {
            tab,
            page: pagination.page,
            per_page: pagination.per_page,
            search: tab.has_search().then(|| pagination.search.clone()),
            start_time,
            end_time,
        }
    }
}

/// Fill in an unset reports window relative to `now`
///
/// A missing end is `now`; a missing start is 30 days before the end.
pub fn resolve_window(request: &TabRequest, now: DateTime<Utc>) -> TabRequest {
    let mut resolved = request.clone();
    if request.tab == Tab::Reports {
        let end_time = request.end_time.unwrap_or(now);
        let start_time = request
            .start_time
            .unwrap_or(end_time - Duration::days(DEFAULT_REPORTS_WINDOW_DAYS));
        resolved.start_time = Some(start_time);
        resolved.end_time = Some(end_time);
    }
    resolved
}

/// A discrete change to one tab's pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationOp {
    /// Out-of-range pages clamp to 1
    SetPage { tab: Tab, page: i64 },
    /// Clamped to `1..=255`
    SetPerPage { tab: Tab, per_page: i64 },
    /// Always returns to page 1; ignored for reports
    SetSearch { tab: Tab, search: String },
    /// Step back one page, stopping at 1
    PageBack { tab: Tab },
    SetReportsStartTime(Option<DateTime<Utc>>),
    SetReportsEndTime(Option<DateTime<Utc>>),
}

impl PaginationOp {
    pub fn tab(&self) -> Tab {
        match self {
            PaginationOp::SetPage { tab, .. }
            | PaginationOp::SetPerPage { tab, .. }
            | PaginationOp::SetSearch { tab, .. }
            | PaginationOp::PageBack { tab } => *tab,
            PaginationOp::SetReportsStartTime(_) | PaginationOp::SetReportsEndTime(_) => {
                Tab::Reports
            }
        }
    }

    pub fn apply(&self, params: &ExplorerParams) -> ExplorerParams {
        let mut next = params.clone();
        let pagination = next.pagination.get_mut(self.tab());
        match self {
            PaginationOp::SetPage { page, .. } => pagination.page = clamp(*page, u32::MAX),
            PaginationOp::SetPerPage { per_page, .. } => {
                pagination.per_page = clamp(*per_page, MAX_PER_PAGE)
            }
            PaginationOp::SetSearch { tab, search } => {
                if tab.has_search() {
                    pagination.search = search.clone();
                    pagination.page = 1;
                }
            }
            PaginationOp::PageBack { .. } => {
                pagination.page = pagination.page.saturating_sub(1).max(1)
            }
            PaginationOp::SetReportsStartTime(time) => {
                pagination.start_time = *time;
                pagination.page = 1;
            }
            PaginationOp::SetReportsEndTime(time) => {
                pagination.end_time = *time;
                pagination.page = 1;
            }
        }
        next
    }
}

fn clamp(value: i64, max: u32) -> u32 {
    // Always in 1..=max after the clamp
    u32::try_from(value.clamp(1, i64::from(max))).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn apply(op: PaginationOp) -> ExplorerParams {
        op.apply(&ExplorerParams::default())
    }

    #[test]
    fn test_defaults_per_tab() {
        let pagination = PerTabPagination::default();
        assert_eq!(pagination.reports.per_page, 4);
        for tab in [Tab::Branches, Tab::Testbeds, Tab::Benchmarks, Tab::Plots] {
            assert_eq!(pagination.get(tab).page, 1);
            assert_eq!(pagination.get(tab).per_page, 8);
            assert!(pagination.get(tab).search.is_empty());
        }
    }

    #[test]
    fn test_set_page_clamps_to_one() {
        for page in [0, -3, i64::MIN] {
            let next = apply(PaginationOp::SetPage {
                tab: Tab::Branches,
                page,
            });
            assert_eq!(next.pagination.branches.page, 1);
        }
        let next = apply(PaginationOp::SetPage {
            tab: Tab::Branches,
            page: 7,
        });
        assert_eq!(next.pagination.branches.page, 7);
    }

    #[test]
    fn test_set_per_page_clamps() {
        let high = apply(PaginationOp::SetPerPage {
            tab: Tab::Plots,
            per_page: 10_000,
        });
        assert_eq!(high.pagination.plots.per_page, MAX_PER_PAGE);

        let low = apply(PaginationOp::SetPerPage {
            tab: Tab::Plots,
            per_page: 0,
        });
        assert_eq!(low.pagination.plots.per_page, 1);
    }

    #[test]
    fn test_set_search_resets_page() {
        let mut params = ExplorerParams::default();
        params.pagination.benchmarks.page = 5;

        let next = PaginationOp::SetSearch {
            tab: Tab::Benchmarks,
            search: "foo".to_string(),
        }
        .apply(&params);
        assert_eq!(next.pagination.benchmarks.page, 1);
        assert_eq!(next.pagination.benchmarks.search, "foo");

        // Same text on a later page still returns to page 1
        let mut later = next.clone();
        later.pagination.benchmarks.page = 3;
        let again = PaginationOp::SetSearch {
            tab: Tab::Benchmarks,
            search: "foo".to_string(),
        }
        .apply(&later);
        assert_eq!(again.pagination.benchmarks.page, 1);
    }

    #[test]
    fn test_search_ignored_for_reports() {
        let next = apply(PaginationOp::SetSearch {
            tab: Tab::Reports,
            search: "foo".to_string(),
        });
        assert_eq!(next, ExplorerParams::default());
    }

    #[test]
    fn test_page_back_stops_at_one() {
        let mut params = ExplorerParams::default();
        params.pagination.testbeds.page = 2;
        let back = PaginationOp::PageBack { tab: Tab::Testbeds }.apply(&params);
        assert_eq!(back.pagination.testbeds.page, 1);
        let again = PaginationOp::PageBack { tab: Tab::Testbeds }.apply(&back);
        assert_eq!(again.pagination.testbeds.page, 1);
    }

    #[test]
    fn test_ops_only_touch_their_tab() {
        let next = apply(PaginationOp::SetPage {
            tab: Tab::Testbeds,
            page: 4,
        });
        for tab in [Tab::Reports, Tab::Branches, Tab::Benchmarks, Tab::Plots] {
            assert_eq!(next.pagination.get(tab), &TabPagination::new(tab));
        }
    }

    #[test]
    fn test_request_omits_search_for_reports() {
        let pagination = PerTabPagination::default();
        assert_eq!(pagination.request(Tab::Reports).search, None);
        assert_eq!(
            pagination.request(Tab::Branches).search,
            Some(String::new())
        );
    }

    #[test]
    fn test_resolve_window_defaults_to_trailing_thirty_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let request = PerTabPagination::default().request(Tab::Reports);
        let resolved = resolve_window(&request, now);
        assert_eq!(resolved.end_time, Some(now));
        assert_eq!(
            resolved.start_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_resolve_window_keeps_explicit_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let next = apply(PaginationOp::SetReportsEndTime(Some(end)));
        let resolved = resolve_window(&next.pagination.request(Tab::Reports), now);
        assert_eq!(resolved.end_time, Some(end));
        assert_eq!(resolved.start_time, Some(end - Duration::days(30)));

        // Non-report tabs never carry a window
        let branches = resolve_window(&next.pagination.request(Tab::Branches), now);
        assert_eq!(branches.start_time, None);
    }
}
