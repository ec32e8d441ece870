//! Handler module - TEA update function and fetch reconciliation
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `selection`: Row-index selection of reports and saved plots
//! - `fetch`: Fetch slot reconciliation and response handling

pub(crate) mod fetch;
pub(crate) mod selection;
pub(crate) mod update;


use perfx_api::TabRequest;
use perfx_core::{PerfQuery, Tab};

use crate::message::Message;
use crate::navigation::{History, HistoryStep};
use crate::params::ParamOp;

// Re-export main entry points
pub use fetch::reconcile;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Read-patch-write a parameter change into the location
    WriteParams { op: ParamOp, history: History },

    /// Step through the navigator's history
    Traverse(HistoryStep),

    /// Issue these requests in the background
    Fetch(Vec<FetchRequest>),

    /// Restart the quiet period of a tab's search box
    DebounceSearch { tab: Tab, text: String },
}

/// A remote call, tagged with the slot generation it was armed under
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Project {
        generation: u64,
        project: String,
        token: Option<String>,
    },
    Perf {
        generation: u64,
        project: String,
        query: PerfQuery,
        token: Option<String>,
    },
    TabPage {
        generation: u64,
        project: String,
        /// Reports window already resolved
        request: TabRequest,
        token: Option<String>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// A user edit recorded as a new history entry
    pub fn write(op: impl Into<ParamOp>) -> Self {
        Self::action(UpdateAction::WriteParams {
            op: op.into(),
            history: History::Push,
        })
    }
}
