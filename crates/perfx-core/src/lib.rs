//! # perfx-core - Core Domain Types
//!
//! Foundation crate for Perf Explorer. Provides domain types, query-value
//! codecs, the canonical perf query, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing, url, percent-encoding).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ResourceId`] - Opaque id of a branch, testbed, benchmark, measure, report or plot
//! - [`DimensionSet`] - Ordered, duplicate-free id set with set-toggle semantics
//! - [`Dimension`] - The four axes that gate the perf query
//! - [`Tab`], [`XAxis`] - View enums and their URL spellings
//! - [`Identified`] - Resources exposing a stable id
//!
//! ### Query Values (`params`)
//! - [`params::parse_ids()`], [`params::format_ids()`] - Comma-joined id lists
//! - [`params::parse_timestamp()`] - Millisecond epoch timestamps
//!
//! ### Perf Query (`query`)
//! - [`PerfQuery`] - Payload of `GET {project}/perf`
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use perfx_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod params;
pub mod prelude;
pub mod query;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use query::PerfQuery;
pub use types::{DimensionSet, Dimension, Identified, ResourceId, Tab, XAxis};
