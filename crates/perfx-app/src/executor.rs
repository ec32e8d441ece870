//! Perf query readiness, fetch keys and last-key-wins slots
//!
//! Every remote resource (project metadata, perf metrics, each tab page)
//! lives in its own [`FetchSlot`]. A slot is keyed by a [`FetchKey`]:
//! re-requesting the current key is a no-op, a new key bumps the slot's
//! generation, and a response is only applied when its generation is
//! still current.

use perfx_core::{Dimension, PerfQuery};

use crate::filter::FilterState;

/// Length at which older browsers silently truncated URLs
pub const LEGACY_URL_LENGTH_LIMIT: usize = 2000;

/// True while the plot lacks a branch, testbed, benchmark or measure.
/// The perf endpoint must not be queried in this state.
pub fn is_plot_init(filter: &FilterState) -> bool {
    !missing_dimensions(filter).is_empty()
}

/// Dimensions still needing a selection, for the guidance checklist
pub fn missing_dimensions(filter: &FilterState) -> Vec<Dimension> {
    build_query(filter).missing_dimensions()
}

/// The canonical perf query; display state is never included
pub fn build_query(filter: &FilterState) -> PerfQuery {
    PerfQuery {
        branches: filter.branches.clone(),
        heads: filter.heads.clone(),
        testbeds: filter.testbeds.clone(),
        benchmarks: filter.benchmarks.clone(),
        measures: filter.measures.clone(),
        start_time: filter.start_time,
        end_time: filter.end_time,
    }
}

/// Heuristic for a URL the browser may have cut short
pub fn is_possibly_truncated(url: &str) -> bool {
    url.chars().count() == LEGACY_URL_LENGTH_LIMIT
}

/// Identity of a fetch: any change to any component means a new request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey<Q> {
    pub project: String,
    pub query: Q,
    pub refresh: u64,
    pub token: Option<String>,
}

/// Outcome of resolving a response against its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Fresh data stored
    Applied,
    /// Request failed; previous data retained
    Failed,
    /// Response belongs to a superseded key and was discarded
    Stale,
}

#[derive(Debug, Clone)]
pub struct FetchSlot<K, V> {
    key: Option<K>,
    generation: u64,
    loading: bool,
    data: Option<V>,
    /// Generation `data` was fetched under
    data_generation: Option<u64>,
    error: Option<String>,
}

impl<K, V> Default for FetchSlot<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            loading: false,
            data: None,
            data_generation: None,
            error: None,
        }
    }
}

impl<K: PartialEq, V> FetchSlot<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot for `key`. Returns the generation to fetch under, or
    /// `None` when `key` is already the current key.
    pub fn request(&mut self, key: K) -> Option<u64> {
        if self.key.as_ref() == Some(&key) {
            return None;
        }
        self.key = Some(key);
        self.generation += 1;
        self.loading = true;
        Some(self.generation)
    }

    /// Forget the current key so that any in-flight response goes stale.
    /// Data already shown is kept.
    pub fn disarm(&mut self) {
        if self.key.take().is_some() {
            self.generation += 1;
            self.loading = false;
        }
    }

    /// Apply a response fetched under `generation`
    pub fn resolve(&mut self, generation: u64, result: Result<V, String>) -> Resolution {
        if self.key.is_none() || generation != self.generation {
            return Resolution::Stale;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.data_generation = Some(generation);
                self.error = None;
                Resolution::Applied
            }
            Err(message) => {
                self.error = Some(message);
                Resolution::Failed
            }
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> Option<&V> {
        self.data.as_ref()
    }

    pub fn data_generation(&self) -> Option<u64> {
        self.data_generation
    }

    /// Message of the last failed fetch of the current key
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::decode;
    use perfx_core::params::parse_ids;

    fn key(query: &str, refresh: u64) -> FetchKey<String> {
        FetchKey {
            project: "demo".to_string(),
            query: query.to_string(),
            refresh,
            token: None,
        }
    }

    #[test]
    fn test_plot_init_until_all_four_dimensions() {
        let mut filter = FilterState::default();
        assert!(is_plot_init(&filter));
        assert_eq!(missing_dimensions(&filter).len(), 4);

        filter.branches = parse_ids("b1");
        filter.testbeds = parse_ids("t1");
        filter.benchmarks = parse_ids("k1");
        assert!(is_plot_init(&filter));
        assert_eq!(missing_dimensions(&filter), vec![Dimension::Measure]);

        filter.measures = parse_ids("m1");
        assert!(!is_plot_init(&filter));
    }

    #[test]
    fn test_heads_and_window_do_not_gate() {
        let params = decode("branches=b1&testbeds=t1&benchmarks=k1&measures=m1");
        assert!(params.filter.heads.is_empty());
        assert!(params.filter.start_time.is_none());
        assert!(!is_plot_init(&params.filter));
    }

    #[test]
    fn test_minimal_valid_query() {
        let params = decode("?branches=b1,b2&testbeds=t1&benchmarks=k1&measures=m1");
        let query = build_query(&params.filter);
        assert_eq!(
            query,
            PerfQuery {
                branches: parse_ids("b1,b2"),
                testbeds: parse_ids("t1"),
                benchmarks: parse_ids("k1"),
                measures: parse_ids("m1"),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_display_state_is_not_queried() {
        let plain = decode("branches=b1&testbeds=t1&benchmarks=k1&measures=m1");
        let styled = decode(
            "branches=b1&testbeds=t1&benchmarks=k1&measures=m1&tab=plots&x_axis=version&clear=true",
        );
        assert_eq!(build_query(&plain.filter), build_query(&styled.filter));
    }

    #[test]
    fn test_truncation_heuristic_is_exact() {
        assert!(is_possibly_truncated(&"a".repeat(2000)));
        assert!(!is_possibly_truncated(&"a".repeat(1999)));
        assert!(!is_possibly_truncated(&"a".repeat(2001)));
    }

    #[test]
    fn test_identical_key_is_memoized() {
        let mut slot: FetchSlot<FetchKey<String>, u32> = FetchSlot::new();
        assert_eq!(slot.request(key("q", 0)), Some(1));
        assert_eq!(slot.request(key("q", 0)), None);
        assert!(slot.is_loading());
    }

    #[test]
    fn test_refresh_bump_is_a_new_key() {
        let mut slot: FetchSlot<FetchKey<String>, u32> = FetchSlot::new();
        slot.request(key("q", 0));
        assert_eq!(slot.request(key("q", 1)), Some(2));
    }

    #[test]
    fn test_last_key_wins() {
        let mut slot: FetchSlot<FetchKey<String>, u32> = FetchSlot::new();
        let first = slot.request(key("a", 0)).unwrap();
        let second = slot.request(key("b", 0)).unwrap();

        // Slow response for the old key arrives after the new one was issued
        assert_eq!(slot.resolve(first, Ok(1)), Resolution::Stale);
        assert_eq!(slot.data(), None);

        assert_eq!(slot.resolve(second, Ok(2)), Resolution::Applied);
        assert_eq!(slot.data(), Some(&2));
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut slot: FetchSlot<FetchKey<String>, u32> = FetchSlot::new();
        let first = slot.request(key("a", 0)).unwrap();
        slot.resolve(first, Ok(7));

        let second = slot.request(key("b", 0)).unwrap();
        assert_eq!(
            slot.resolve(second, Err("502 Bad Gateway".to_string())),
            Resolution::Failed
        );
        assert_eq!(slot.data(), Some(&7));
        assert_eq!(slot.data_generation(), Some(first));
        assert_eq!(slot.error(), Some("502 Bad Gateway"));
        assert_eq!(slot.key(), Some(&key("b", 0)));
    }

    #[test]
    fn test_disarm_discards_in_flight() {
        let mut slot: FetchSlot<FetchKey<String>, u32> = FetchSlot::new();
        let generation = slot.request(key("a", 0)).unwrap();
        slot.disarm();
        assert_eq!(slot.resolve(generation, Ok(1)), Resolution::Stale);
        assert!(!slot.is_loading());

        // Re-arming with the same key fetches again
        assert!(slot.request(key("a", 0)).is_some());
    }
}
