//! perfx-app - Exploration state engine and orchestration for Perf Explorer
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! perf view: URL-backed filter, display and pagination parameters, the
//! readiness gate in front of the perf query, last-key-wins fetch slots,
//! and the Engine that ties them to a navigator and the perf API.

pub mod actions;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod engine_event;
pub mod executor;
pub mod filter;
pub mod handler;
pub mod message;
pub mod navigation;
pub mod notification;
pub mod pagination;
pub mod params;
pub mod process;
pub mod projector;
pub mod refresh;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use filter::{DisplayState, FilterOp, FilterState};
pub use handler::{FetchRequest, UpdateAction, UpdateResult};
pub use message::Message;
pub use navigation::{History, HistoryStep, MemoryNavigator, Navigator};
pub use notification::{Notification, NotificationKind};
pub use pagination::{PaginationOp, PerTabPagination, TabPagination};
pub use params::{ExplorerParams, ParamKey, ParamOp, ParameterSet, QueryMap};
pub use projector::{TabEntries, TabListEntry};
pub use state::AppState;
