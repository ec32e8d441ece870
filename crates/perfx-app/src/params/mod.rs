//! URL-backed exploration parameters
//!
//! The URL query string is the single source of truth. [`ExplorerParams`]
//! is its typed view: decoding never fails (malformed values fall back to
//! their defaults) and encoding omits a key only when its value equals the
//! default, so `decode(encode(p)) == p` for every in-range `p`.
//!
//! Mutations go through [`ParamOp`] and are written back as a minimal patch
//! of the changed keys via [`patch`].

pub mod keys;
pub mod query_map;


use serde::Serialize;
use tracing::debug;

use perfx_core::params::{
    decode_value, encode_value, format_bool, format_ids, format_timestamp, parse_bool, parse_id,
    parse_ids, parse_positive, parse_timestamp,
};
use perfx_core::{ResourceId, Tab};

use crate::filter::{DisplayState, FilterOp, FilterState};
use crate::pagination::{PaginationOp, PerTabPagination, MAX_PER_PAGE};

pub use keys::{ParamKey, ParameterSet};
pub use query_map::QueryMap;

/// Presentation options of the embeddable plot view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedOptions {
    pub logo_visible: bool,
    pub title: String,
    pub header_visible: bool,
    pub key_visible: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            logo_visible: true,
            title: String::new(),
            header_visible: true,
            key_visible: true,
        }
    }
}

/// Everything the explorer stores in the URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExplorerParams {
    pub filter: FilterState,
    pub display: DisplayState,
    pub pagination: PerTabPagination,
    pub embed: EmbedOptions,
}

impl ExplorerParams {
    pub fn from_query_map(map: &QueryMap) -> Self {
        let mut params = Self::default();
        for key in ParamKey::ALL {
            if let Some(raw) = map.get(&key.name()) {
                if !params.set_raw(*key, raw) {
                    debug!("Ignoring malformed {}={}", key.name(), raw);
                }
            }
        }
        params
    }

    /// Assign a raw value to `key`. Returns false when the value is
    /// malformed, leaving the field at its current value.
    fn set_raw(&mut self, key: ParamKey, raw: &str) -> bool {
        let filter = &mut self.filter;
        let display = &mut self.display;
        match key {
            ParamKey::Branches => filter.branches = parse_ids(raw),
            ParamKey::Heads => filter.heads = parse_ids(raw),
            ParamKey::Testbeds => filter.testbeds = parse_ids(raw),
            ParamKey::Benchmarks => filter.benchmarks = parse_ids(raw),
            ParamKey::Measures => filter.measures = parse_ids(raw),
            ParamKey::StartTime => return assign(&mut filter.start_time, parse_timestamp(raw)),
            ParamKey::EndTime => return assign(&mut filter.end_time, parse_timestamp(raw)),
            ParamKey::Report => return assign(&mut display.selected_report, parse_id(raw)),
            ParamKey::Plot => return assign(&mut display.selected_plot, parse_id(raw)),
            ParamKey::Tab => return set(&mut display.tab, decode_value(raw).parse().ok()),
            ParamKey::Key => return set(&mut display.key_visible, parse_bool(raw)),
            ParamKey::XAxis => return set(&mut display.x_axis, decode_value(raw).parse().ok()),
            ParamKey::Clear => return set(&mut display.clear, parse_bool(raw)),
            ParamKey::LowerValue => return set(&mut display.lower_value, parse_bool(raw)),
            ParamKey::UpperValue => return set(&mut display.upper_value, parse_bool(raw)),
            ParamKey::LowerBoundary => return set(&mut display.lower_boundary, parse_bool(raw)),
            ParamKey::UpperBoundary => return set(&mut display.upper_boundary, parse_bool(raw)),
            ParamKey::Page(tab) => {
                let page = &mut self.pagination.get_mut(tab).page;
                return set(page, parse_positive(raw, u32::MAX));
            }
            ParamKey::PerPage(tab) => {
                let per_page = &mut self.pagination.get_mut(tab).per_page;
                return set(per_page, parse_positive(raw, MAX_PER_PAGE));
            }
            ParamKey::Search(tab) => {
                if tab.has_search() {
                    self.pagination.get_mut(tab).search = decode_value(raw);
                }
            }
            ParamKey::ReportsStartTime => {
                return assign(
                    &mut self.pagination.reports.start_time,
                    parse_timestamp(raw),
                )
            }
            ParamKey::ReportsEndTime => {
                return assign(&mut self.pagination.reports.end_time, parse_timestamp(raw))
            }
            ParamKey::EmbedLogo => return set(&mut self.embed.logo_visible, parse_bool(raw)),
            ParamKey::EmbedTitle => self.embed.title = decode_value(raw),
            ParamKey::EmbedHeader => return set(&mut self.embed.header_visible, parse_bool(raw)),
            ParamKey::EmbedKey => return set(&mut self.embed.key_visible, parse_bool(raw)),
        }
        true
    }

    /// Encoded value of `key`, or `None` when it is at its default
    pub fn encode_key(&self, key: ParamKey) -> Option<String> {
        let filter = &self.filter;
        let display = &self.display;
        match key {
            ParamKey::Branches => ids(&filter.branches),
            ParamKey::Heads => ids(&filter.heads),
            ParamKey::Testbeds => ids(&filter.testbeds),
            ParamKey::Benchmarks => ids(&filter.benchmarks),
            ParamKey::Measures => ids(&filter.measures),
            ParamKey::StartTime => filter.start_time.as_ref().map(format_timestamp),
            ParamKey::EndTime => filter.end_time.as_ref().map(format_timestamp),
            ParamKey::Report => display.selected_report.as_ref().map(id),
            ParamKey::Plot => display.selected_plot.as_ref().map(id),
            ParamKey::Tab => non_default(display.tab, Tab::Reports).map(|tab| tab.to_string()),
            ParamKey::Key => flag(display.key_visible, true),
            ParamKey::XAxis => non_default(display.x_axis, Default::default())
                .map(|axis| axis.to_string()),
            ParamKey::Clear => flag(display.clear, false),
            ParamKey::LowerValue => flag(display.lower_value, false),
            ParamKey::UpperValue => flag(display.upper_value, false),
            ParamKey::LowerBoundary => flag(display.lower_boundary, false),
            ParamKey::UpperBoundary => flag(display.upper_boundary, false),
            ParamKey::Page(tab) => {
                non_default(self.pagination.get(tab).page, 1).map(|page| page.to_string())
            }
            ParamKey::PerPage(tab) => non_default(
                self.pagination.get(tab).per_page,
                tab.default_per_page(),
            )
            .map(|per_page| per_page.to_string()),
            ParamKey::Search(tab) => {
                let search = &self.pagination.get(tab).search;
                (tab.has_search() && !search.is_empty()).then(|| encode_value(search))
            }
            ParamKey::ReportsStartTime => {
                self.pagination.reports.start_time.as_ref().map(format_timestamp)
            }
            ParamKey::ReportsEndTime => {
                self.pagination.reports.end_time.as_ref().map(format_timestamp)
            }
            ParamKey::EmbedLogo => flag(self.embed.logo_visible, true),
            ParamKey::EmbedTitle => {
                (!self.embed.title.is_empty()).then(|| encode_value(&self.embed.title))
            }
            ParamKey::EmbedHeader => flag(self.embed.header_visible, true),
            ParamKey::EmbedKey => flag(self.embed.key_visible, true),
        }
    }

    /// Keys of `set` holding a non-default value, in set order
    pub fn to_query_map(&self, set: &ParameterSet) -> QueryMap {
        let mut map = QueryMap::default();
        for key in set.keys() {
            if let Some(value) = self.encode_key(*key) {
                map.set(&key.name(), value);
            }
        }
        map
    }
}

fn assign<T>(field: &mut Option<T>, value: Option<T>) -> bool {
    let valid = value.is_some();
    if valid {
        *field = value;
    }
    valid
}

fn set<T>(field: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *field = value;
            true
        }
        None => false,
    }
}

fn ids(set: &perfx_core::DimensionSet) -> Option<String> {
    (!set.is_empty()).then(|| format_ids(set))
}

fn id(id: &ResourceId) -> String {
    encode_value(id.as_str())
}

fn non_default<T: PartialEq>(value: T, default: T) -> Option<T> {
    (value != default).then_some(value)
}

fn flag(value: bool, default: bool) -> Option<String> {
    (value != default).then(|| format_bool(value).to_string())
}

/// Decode a query string (leading `?` optional)
pub fn decode(query: &str) -> ExplorerParams {
    ExplorerParams::from_query_map(&QueryMap::parse(query))
}

/// Encode the keys of `set` into a query string without the leading `?`
pub fn encode(params: &ExplorerParams, set: &ParameterSet) -> String {
    params.to_query_map(set).to_query_string()
}

/// Keys whose encoded value differs between `before` and `after`
pub fn changed_keys(before: &ExplorerParams, after: &ExplorerParams) -> Vec<ParamKey> {
    ParamKey::ALL
        .iter()
        .copied()
        .filter(|key| before.encode_key(*key) != after.encode_key(*key))
        .collect()
}

/// Write `keys` of `params` into `map`; default values remove the key
pub fn patch(map: &mut QueryMap, params: &ExplorerParams, keys: &[ParamKey]) {
    for key in keys {
        map.apply(&key.name(), params.encode_key(*key));
    }
}

/// A user intent expressed as a pure parameter transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamOp {
    Filter(FilterOp),
    Pagination(PaginationOp),
}

impl ParamOp {
    pub fn apply(&self, params: &ExplorerParams) -> ExplorerParams {
        match self {
            ParamOp::Filter(op) => op.apply(params),
            ParamOp::Pagination(op) => op.apply(params),
        }
    }
}

impl From<FilterOp> for ParamOp {
    fn from(op: FilterOp) -> Self {
        ParamOp::Filter(op)
    }
}

impl From<PaginationOp> for ParamOp {
    fn from(op: PaginationOp) -> Self {
        ParamOp::Pagination(op)
    }
}
