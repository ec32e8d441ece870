//! Core domain types for perf exploration
//!
//! Defines:
//! - `ResourceId` - opaque identifier of a branch, testbed, benchmark, measure, report or plot
//! - `DimensionSet` - ordered, duplicate-free set of resource ids
//! - `Dimension` - the four filter axes that gate the perf query
//! - `Tab` / `XAxis` - view enums with their URL spellings
//! - `Identified` - trait for resources exposing a stable unique id

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a remote resource (uuid or slug)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create an id, rejecting blank input
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == id.len() {
            Some(Self(id))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A resource with a stable unique id
pub trait Identified {
    fn id(&self) -> &ResourceId;
}

/// Ordered set of resource ids
///
/// Insertion order is kept for display. Duplicates are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSet(Vec<ResourceId>);

impl DimensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from ids, keeping the first occurrence of each
    pub fn from_ids(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Append `id` unless already present. Returns true if inserted.
    pub fn insert(&mut self, id: ResourceId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove `id`, preserving the order of the remaining members
    pub fn remove(&mut self, id: &ResourceId) -> bool {
        let before = self.0.len();
        self.0.retain(|member| member != id);
        before != self.0.len()
    }

    /// Set-toggle: remove when present, append at the end when absent
    pub fn toggled(&self, id: &ResourceId) -> Self {
        let mut next = self.clone();
        if !next.remove(id) {
            next.0.push(id.clone());
        }
        next
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.0.iter().any(|member| member == id)
    }

    pub fn first(&self) -> Option<&ResourceId> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ResourceId] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DimensionSet {
    type Item = &'a ResourceId;
    type IntoIter = std::slice::Iter<'a, ResourceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ResourceId> for DimensionSet {
    fn from_iter<I: IntoIterator<Item = ResourceId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

/// An axis along which results can be filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Branch,
    Testbed,
    Benchmark,
    Measure,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Branch,
        Dimension::Testbed,
        Dimension::Benchmark,
        Dimension::Measure,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Branch => "branch",
            Dimension::Testbed => "testbed",
            Dimension::Benchmark => "benchmark",
            Dimension::Measure => "measure",
        }
    }
}

/// Resource-selection tab of the perf view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Reports,
    Branches,
    Testbeds,
    Benchmarks,
    Plots,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Reports,
        Tab::Branches,
        Tab::Testbeds,
        Tab::Benchmarks,
        Tab::Plots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Reports => "reports",
            Tab::Branches => "branches",
            Tab::Testbeds => "testbeds",
            Tab::Benchmarks => "benchmarks",
            Tab::Plots => "plots",
        }
    }

    /// Default page size; reports rows are taller so fewer fit
    pub fn default_per_page(&self) -> u32 {
        match self {
            Tab::Reports => 4,
            _ => 8,
        }
    }

    /// Reports are browsed by time window instead of free-text search
    pub fn has_search(&self) -> bool {
        !matches!(self, Tab::Reports)
    }

    /// The filter dimension whose set membership drives the `checked` flag
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Tab::Branches => Some(Dimension::Branch),
            Tab::Testbeds => Some(Dimension::Testbed),
            Tab::Benchmarks => Some(Dimension::Benchmark),
            Tab::Reports | Tab::Plots => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reports" => Ok(Tab::Reports),
            "branches" => Ok(Tab::Branches),
            "testbeds" => Ok(Tab::Testbeds),
            "benchmarks" => Ok(Tab::Benchmarks),
            "plots" => Ok(Tab::Plots),
            _ => Err(()),
        }
    }
}

/// Horizontal axis of the perf plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxis {
    #[default]
    DateTime,
    Version,
}

impl XAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            XAxis::DateTime => "date_time",
            XAxis::Version => "version",
        }
    }
}

impl fmt::Display for XAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XAxis {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date_time" => Ok(XAxis::DateTime),
            "version" => Ok(XAxis::Version),
            _ => Err(()),
        }
    }
}
