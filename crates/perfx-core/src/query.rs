//! Canonical perf query sent to the aggregation endpoint

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::params::{format_ids, format_timestamp, join_pairs};
use crate::types::{Dimension, DimensionSet};

/// The minimal remote-query payload for `GET {project}/perf`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PerfQuery {
    pub branches: DimensionSet,
    pub heads: DimensionSet,
    pub testbeds: DimensionSet,
    pub benchmarks: DimensionSet,
    pub measures: DimensionSet,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl PerfQuery {
    /// Dimensions with no selected member, in display order
    pub fn missing_dimensions(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|dimension| self.dimension(*dimension).is_empty())
            .collect()
    }

    pub fn dimension(&self, dimension: Dimension) -> &DimensionSet {
        match dimension {
            Dimension::Branch => &self.branches,
            Dimension::Testbed => &self.testbeds,
            Dimension::Benchmark => &self.benchmarks,
            Dimension::Measure => &self.measures,
        }
    }

    /// Encoded `(key, value)` pairs; empty sets and unset times are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(7);
        for (key, ids) in [
            ("branches", &self.branches),
            ("heads", &self.heads),
            ("testbeds", &self.testbeds),
            ("benchmarks", &self.benchmarks),
            ("measures", &self.measures),
        ] {
            if !ids.is_empty() {
                pairs.push((key, format_ids(ids)));
            }
        }
        if let Some(start_time) = &self.start_time {
            pairs.push(("start_time", format_timestamp(start_time)));
        }
        if let Some(end_time) = &self.end_time {
            pairs.push(("end_time", format_timestamp(end_time)));
        }
        pairs
    }

    pub fn query_string(&self) -> String {
        join_pairs(self.query_pairs())
    }
}
