//! URL parameter names and the named subsets used for sharing

use std::borrow::Cow;

use perfx_core::Tab;

/// Every query-string key the explorer owns
///
/// Keys outside this set are left untouched in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Branches,
    Heads,
    Testbeds,
    Benchmarks,
    Measures,
    StartTime,
    EndTime,
    Report,
    Plot,
    Tab,
    Key,
    XAxis,
    Clear,
    LowerValue,
    UpperValue,
    LowerBoundary,
    UpperBoundary,
    /// `{tab}_page`
    Page(Tab),
    /// `{tab}_per_page`
    PerPage(Tab),
    /// `{tab}_search`; never exists for reports
    Search(Tab),
    ReportsStartTime,
    ReportsEndTime,
    EmbedLogo,
    EmbedTitle,
    EmbedHeader,
    EmbedKey,
}

const QUERY_KEYS: [ParamKey; 7] = [
    ParamKey::Branches,
    ParamKey::Heads,
    ParamKey::Testbeds,
    ParamKey::Benchmarks,
    ParamKey::Measures,
    ParamKey::StartTime,
    ParamKey::EndTime,
];

const FULL_KEYS: [ParamKey; 33] = [
    ParamKey::Branches,
    ParamKey::Heads,
    ParamKey::Testbeds,
    ParamKey::Benchmarks,
    ParamKey::Measures,
    ParamKey::StartTime,
    ParamKey::EndTime,
    ParamKey::Report,
    ParamKey::Plot,
    ParamKey::Tab,
    ParamKey::Key,
    ParamKey::XAxis,
    ParamKey::Clear,
    ParamKey::LowerValue,
    ParamKey::UpperValue,
    ParamKey::LowerBoundary,
    ParamKey::UpperBoundary,
    ParamKey::Page(Tab::Reports),
    ParamKey::PerPage(Tab::Reports),
    ParamKey::ReportsStartTime,
    ParamKey::ReportsEndTime,
    ParamKey::Page(Tab::Branches),
    ParamKey::PerPage(Tab::Branches),
    ParamKey::Search(Tab::Branches),
    ParamKey::Page(Tab::Testbeds),
    ParamKey::PerPage(Tab::Testbeds),
    ParamKey::Search(Tab::Testbeds),
    ParamKey::Page(Tab::Benchmarks),
    ParamKey::PerPage(Tab::Benchmarks),
    ParamKey::Search(Tab::Benchmarks),
    ParamKey::Page(Tab::Plots),
    ParamKey::PerPage(Tab::Plots),
    ParamKey::Search(Tab::Plots),
];

const EMBED_KEYS: [ParamKey; 17] = [
    ParamKey::Branches,
    ParamKey::Heads,
    ParamKey::Testbeds,
    ParamKey::Benchmarks,
    ParamKey::Measures,
    ParamKey::StartTime,
    ParamKey::EndTime,
    ParamKey::XAxis,
    ParamKey::Clear,
    ParamKey::LowerValue,
    ParamKey::UpperValue,
    ParamKey::LowerBoundary,
    ParamKey::UpperBoundary,
    ParamKey::EmbedLogo,
    ParamKey::EmbedTitle,
    ParamKey::EmbedHeader,
    ParamKey::EmbedKey,
];

const PINNED_KEYS: [ParamKey; 8] = [
    ParamKey::Branches,
    ParamKey::Testbeds,
    ParamKey::Benchmarks,
    ParamKey::Measures,
    ParamKey::LowerValue,
    ParamKey::UpperValue,
    ParamKey::LowerBoundary,
    ParamKey::UpperBoundary,
];

const ALL_KEYS: [ParamKey; 37] = [
    ParamKey::Branches,
    ParamKey::Heads,
    ParamKey::Testbeds,
    ParamKey::Benchmarks,
    ParamKey::Measures,
    ParamKey::StartTime,
    ParamKey::EndTime,
    ParamKey::Report,
    ParamKey::Plot,
    ParamKey::Tab,
    ParamKey::Key,
    ParamKey::XAxis,
    ParamKey::Clear,
    ParamKey::LowerValue,
    ParamKey::UpperValue,
    ParamKey::LowerBoundary,
    ParamKey::UpperBoundary,
    ParamKey::Page(Tab::Reports),
    ParamKey::PerPage(Tab::Reports),
    ParamKey::ReportsStartTime,
    ParamKey::ReportsEndTime,
    ParamKey::Page(Tab::Branches),
    ParamKey::PerPage(Tab::Branches),
    ParamKey::Search(Tab::Branches),
    ParamKey::Page(Tab::Testbeds),
    ParamKey::PerPage(Tab::Testbeds),
    ParamKey::Search(Tab::Testbeds),
    ParamKey::Page(Tab::Benchmarks),
    ParamKey::PerPage(Tab::Benchmarks),
    ParamKey::Search(Tab::Benchmarks),
    ParamKey::Page(Tab::Plots),
    ParamKey::PerPage(Tab::Plots),
    ParamKey::Search(Tab::Plots),
    ParamKey::EmbedLogo,
    ParamKey::EmbedTitle,
    ParamKey::EmbedHeader,
    ParamKey::EmbedKey,
];

impl ParamKey {
    pub const ALL: &'static [ParamKey] = &ALL_KEYS;

    /// The query-string spelling of this key
    pub fn name(&self) -> Cow<'static, str> {
        let name = match self {
            ParamKey::Branches => "branches",
            ParamKey::Heads => "heads",
            ParamKey::Testbeds => "testbeds",
            ParamKey::Benchmarks => "benchmarks",
            ParamKey::Measures => "measures",
            ParamKey::StartTime => "start_time",
            ParamKey::EndTime => "end_time",
            ParamKey::Report => "report",
            ParamKey::Plot => "plot",
            ParamKey::Tab => "tab",
            ParamKey::Key => "key",
            ParamKey::XAxis => "x_axis",
            ParamKey::Clear => "clear",
            ParamKey::LowerValue => "lower_value",
            ParamKey::UpperValue => "upper_value",
            ParamKey::LowerBoundary => "lower_boundary",
            ParamKey::UpperBoundary => "upper_boundary",
            ParamKey::Page(tab) => return Cow::Owned(format!("{tab}_page")),
            ParamKey::PerPage(tab) => return Cow::Owned(format!("{tab}_per_page")),
            ParamKey::Search(tab) => return Cow::Owned(format!("{tab}_search")),
            ParamKey::ReportsStartTime => "reports_start_time",
            ParamKey::ReportsEndTime => "reports_end_time",
            ParamKey::EmbedLogo => "embed_logo",
            ParamKey::EmbedTitle => "embed_title",
            ParamKey::EmbedHeader => "embed_header",
            ParamKey::EmbedKey => "embed_key",
        };
        Cow::Borrowed(name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }
}

/// A named subset of keys used when building share links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSet {
    name: &'static str,
    keys: &'static [ParamKey],
}

impl ParameterSet {
    /// The seven keys sent to the perf endpoint
    pub const QUERY: ParameterSet = ParameterSet {
        name: "query",
        keys: &QUERY_KEYS,
    };

    /// Everything needed to restore the full view
    pub const FULL: ParameterSet = ParameterSet {
        name: "full",
        keys: &FULL_KEYS,
    };

    /// Plot-only embed view
    pub const EMBED: ParameterSet = ParameterSet {
        name: "embed",
        keys: &EMBED_KEYS,
    };

    /// What a pinned plot persists
    pub const PINNED: ParameterSet = ParameterSet {
        name: "pinned",
        keys: &PINNED_KEYS,
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn keys(&self) -> &'static [ParamKey] {
        self.keys
    }

    pub fn contains(&self, key: ParamKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [Self::QUERY, Self::FULL, Self::EMBED, Self::PINNED]
            .into_iter()
            .find(|set| set.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique_and_resolve() {
        let names: HashSet<_> = ParamKey::ALL.iter().map(|key| key.name()).collect();
        assert_eq!(names.len(), ParamKey::ALL.len());
        for key in ParamKey::ALL {
            assert_eq!(ParamKey::from_name(&key.name()), Some(*key));
        }
    }

    #[test]
    fn test_tab_scoped_names() {
        assert_eq!(ParamKey::Page(Tab::Benchmarks).name(), "benchmarks_page");
        assert_eq!(ParamKey::PerPage(Tab::Reports).name(), "reports_per_page");
        assert_eq!(ParamKey::Search(Tab::Plots).name(), "plots_search");
        assert_eq!(ParamKey::from_name("reports_search"), None);
    }

    #[test]
    fn test_subsets_are_drawn_from_all() {
        for set in [
            ParameterSet::QUERY,
            ParameterSet::FULL,
            ParameterSet::EMBED,
            ParameterSet::PINNED,
        ] {
            for key in set.keys() {
                assert!(ParamKey::ALL.contains(key), "{key:?} in {}", set.name());
            }
        }
    }

    #[test]
    fn test_query_subset_is_in_full() {
        for key in ParameterSet::QUERY.keys() {
            assert!(ParameterSet::FULL.contains(*key));
        }
        assert!(!ParameterSet::FULL.contains(ParamKey::EmbedTitle));
        assert!(!ParameterSet::PINNED.contains(ParamKey::Heads));
    }
}
