//! Navigation adapter
//!
//! The browser location is the one shared mutable resource. [`Navigator`]
//! abstracts it; [`MemoryNavigator`] is an in-memory history used by the
//! headless runner and tests. Writes always go through [`write_params`],
//! which re-reads the current URL, patches only the keys an operation
//! changed, and writes the full query back.

use tracing::debug;
use url::Url;

use perfx_core::prelude::*;

use crate::params::{changed_keys, patch, ExplorerParams, ParamKey, ParamOp, QueryMap};

/// How a URL write is recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum History {
    /// New history entry (user intent)
    Push,
    /// Overwrite the current entry (normalization, automatic corrections)
    Replace,
}

/// Direction of a history traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Back,
    Forward,
}

/// Browser location without page reloads
pub trait Navigator: Send {
    fn current_url(&self) -> &Url;

    /// Overwrite the current history entry
    fn replace_url(&mut self, url: Url);

    /// Append a history entry, discarding any forward entries
    fn push_url(&mut self, url: Url);

    /// Step back. Returns the restored URL, or `None` at the start.
    fn back(&mut self) -> Option<Url>;

    /// Step forward. Returns the restored URL, or `None` at the end.
    fn forward(&mut self) -> Option<Url>;
}

/// In-memory history stack
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    entries: Vec<Url>,
    index: usize,
}

impl MemoryNavigator {
    pub fn new(url: Url) -> Self {
        Self {
            entries: vec![url],
            index: 0,
        }
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> &Url {
        &self.entries[self.index]
    }

    fn replace_url(&mut self, url: Url) {
        self.entries[self.index] = url;
    }

    fn push_url(&mut self, url: Url) {
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index = self.entries.len() - 1;
    }

    fn back(&mut self) -> Option<Url> {
        self.index = self.index.checked_sub(1)?;
        Some(self.entries[self.index].clone())
    }

    fn forward(&mut self) -> Option<Url> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }
}

/// Raw query pairs of `url`
pub fn query_map(url: &Url) -> QueryMap {
    QueryMap::parse(url.query().unwrap_or_default())
}

/// `url` with its query replaced by `map`
pub fn with_query(url: &Url, map: &QueryMap) -> Url {
    let mut next = url.clone();
    let query = map.to_query_string();
    next.set_query((!query.is_empty()).then_some(query.as_str()));
    next
}

/// Read-patch-write: apply `op` to the parameters of the navigator's
/// current URL and write back only the keys it changed.
///
/// Returns the written URL, or `None` when the operation changed nothing
/// (no history entry is created for a no-op).
pub fn write_params(
    navigator: &mut dyn Navigator,
    op: &ParamOp,
    history: History,
) -> Option<Url> {
    let mut map = query_map(navigator.current_url());
    let before = ExplorerParams::from_query_map(&map);
    let after = op.apply(&before);
    let keys = changed_keys(&before, &after);
    if keys.is_empty() {
        debug!("{:?} left the URL unchanged", op);
        return None;
    }

    patch(&mut map, &after, &keys);
    let url = with_query(navigator.current_url(), &map);
    match history {
        History::Push => navigator.push_url(url.clone()),
        History::Replace => navigator.replace_url(url.clone()),
    }
    Some(url)
}

/// Rewrite malformed or redundant explorer keys of the current URL in
/// place. Unknown keys are kept.
pub fn normalize(navigator: &mut dyn Navigator) -> Option<Url> {
    let map = query_map(navigator.current_url());
    let params = ExplorerParams::from_query_map(&map);

    let mut normalized = map.clone();
    patch(&mut normalized, &params, ParamKey::ALL);
    if normalized == map {
        return None;
    }
    let url = with_query(navigator.current_url(), &normalized);
    debug!("Normalized URL to {}", url);
    navigator.replace_url(url.clone());
    Some(url)
}

/// Project slug from a console URL
///
/// Accepts `/perf/{project}`, `/console/projects/{project}/perf` and
/// `/v0/projects/{project}/perf` shapes.
pub fn project_slug(url: &Url) -> Result<String> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let slug = segments
        .iter()
        .position(|segment| *segment == "projects")
        .and_then(|i| segments.get(i + 1))
        .or_else(|| {
            segments
                .iter()
                .position(|segment| *segment == "perf")
                .and_then(|i| segments.get(i + 1))
        });

    match slug {
        Some(slug) => Ok(perfx_core::params::decode_value(slug)),
        None => Err(Error::no_project(url.as_str())),
    }
}

/// Resolve CLI input into a full location
///
/// Absolute URLs are used as given; anything else is read as
/// `{project}?{query}` relative to `{console_url}/perf/`.
pub fn resolve_location(input: &str, console_url: &str) -> Result<Url> {
    match Url::parse(input) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(&format!("{}/perf/", console_url.trim_end_matches('/')))?;
            Ok(base.join(input.trim_start_matches('/'))?)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOp;
    use crate::pagination::PaginationOp;
    use perfx_core::{ResourceId, Tab};

    fn navigator(url: &str) -> MemoryNavigator {
        MemoryNavigator::new(Url::parse(url).unwrap())
    }

    fn toggle_branch(id: &str) -> ParamOp {
        FilterOp::ToggleBranch(ResourceId::new(id).unwrap()).into()
    }

    #[test]
    fn test_toggle_writes_appended_branch() {
        let mut nav = navigator("https://bencher.dev/perf/demo?branches=b1,b2");
        let url = write_params(&mut nav, &toggle_branch("b3"), History::Push).unwrap();
        assert_eq!(url.query(), Some("branches=b1,b2,b3"));
        assert_eq!(nav.current_url(), &url);
        assert_eq!(nav.history_len(), 2);
    }

    #[test]
    fn test_write_preserves_concurrent_unrelated_edit() {
        let mut nav = navigator("https://bencher.dev/perf/demo?branches=b1");
        // Another writer changed the tab after our state was derived
        let edited = Url::parse("https://bencher.dev/perf/demo?branches=b1&tab=plots&ref=x").unwrap();
        nav.replace_url(edited);

        let url = write_params(&mut nav, &toggle_branch("b2"), History::Push).unwrap();
        assert_eq!(url.query(), Some("branches=b1,b2&tab=plots&ref=x"));
    }

    #[test]
    fn test_noop_write_creates_no_history() {
        let mut nav = navigator("https://bencher.dev/perf/demo?tab=plots");
        let op: ParamOp = FilterOp::SetTab(Tab::Plots).into();
        assert!(write_params(&mut nav, &op, History::Push).is_none());
        assert_eq!(nav.history_len(), 1);
    }

    #[test]
    fn test_removing_last_key_drops_query() {
        let mut nav = navigator("https://bencher.dev/perf/demo?branches=b1");
        let url = write_params(&mut nav, &toggle_branch("b1"), History::Replace).unwrap();
        assert_eq!(url.as_str(), "https://bencher.dev/perf/demo");
        assert_eq!(nav.history_len(), 1);
    }

    #[test]
    fn test_search_write_resets_page() {
        let mut nav = navigator("https://bencher.dev/perf/demo?benchmarks_page=4");
        let op: ParamOp = PaginationOp::SetSearch {
            tab: Tab::Benchmarks,
            search: "parse".to_string(),
        }
        .into();
        let url = write_params(&mut nav, &op, History::Push).unwrap();
        assert_eq!(url.query(), Some("benchmarks_search=parse"));
    }

    #[test]
    fn test_back_and_forward() {
        let mut nav = navigator("https://bencher.dev/perf/demo");
        write_params(&mut nav, &toggle_branch("b1"), History::Push);
        write_params(&mut nav, &toggle_branch("b2"), History::Push);

        assert_eq!(nav.back().unwrap().query(), Some("branches=b1"));
        assert_eq!(nav.back().unwrap().query(), None);
        assert!(nav.back().is_none());
        assert_eq!(nav.forward().unwrap().query(), Some("branches=b1"));

        // Writing after going back discards the forward entry
        write_params(&mut nav, &toggle_branch("b9"), History::Push);
        assert!(nav.forward().is_none());
        assert_eq!(nav.history_len(), 3);
    }

    #[test]
    fn test_normalize_rewrites_malformed_keys_only() {
        let mut nav =
            navigator("https://bencher.dev/perf/demo?utm=1&branches_page=0&key=true&measures=m1");
        let url = normalize(&mut nav).unwrap();
        assert_eq!(url.query(), Some("utm=1&measures=m1"));
        assert!(normalize(&mut nav).is_none());
    }

    #[test]
    fn test_project_slug_shapes() {
        for url in [
            "https://bencher.dev/perf/my-project?branches=b1",
            "https://bencher.dev/console/projects/my-project/perf",
            "https://api.bencher.dev/v0/projects/my-project/perf",
        ] {
            assert_eq!(project_slug(&Url::parse(url).unwrap()).unwrap(), "my-project");
        }

        let err = project_slug(&Url::parse("https://bencher.dev/").unwrap()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_resolve_location() {
        let url = resolve_location("demo?measures=m1", "https://bencher.dev/").unwrap();
        assert_eq!(url.as_str(), "https://bencher.dev/perf/demo?measures=m1");

        let absolute = resolve_location("http://localhost:3000/perf/x", "https://bencher.dev").unwrap();
        assert_eq!(absolute.host_str(), Some("localhost"));
    }
}
