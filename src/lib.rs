//! Perf Explorer Library
//!
//! Headless runner and share-link helpers on top of the `perfx-app`
//! state engine.

pub mod headless;

use url::Url;

use perfx_app::navigation::{query_map, with_query};
use perfx_app::{ExplorerParams, ParameterSet};

// Re-export main entry points
pub use headless::runner::run_headless;

/// `location` rewritten to the canonical encoding of `set`
///
/// Keys outside the set, including unknown ones, are dropped.
pub fn share_url(location: &Url, set: &ParameterSet) -> Url {
    let params = ExplorerParams::from_query_map(&query_map(location));
    with_query(location, &params.to_query_map(set))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_share_url_canonicalizes_full_view() {
        let location = url(
            "https://bencher.dev/perf/demo?utm=x&branches=b1,b1&measures=m1&key=true&branches_page=2",
        );
        let shared = share_url(&location, &ParameterSet::FULL);
        assert_eq!(shared.path(), "/perf/demo");
        assert_eq!(shared.query(), Some("branches=b1&measures=m1&branches_page=2"));
    }

    #[test]
    fn test_share_url_query_set_drops_display_state() {
        let location = url("https://bencher.dev/perf/demo?measures=m1&tab=plots&x_axis=version");
        let shared = share_url(&location, &ParameterSet::QUERY);
        assert_eq!(shared.query(), Some("measures=m1"));
    }

    #[test]
    fn test_share_url_of_defaults_has_no_query() {
        let location = url("https://bencher.dev/perf/demo?tab=reports");
        assert_eq!(
            share_url(&location, &ParameterSet::PINNED).as_str(),
            "https://bencher.dev/perf/demo"
        );
    }
}
