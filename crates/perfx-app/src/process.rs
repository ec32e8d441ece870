//! Message processing with fetch reconciliation
//!
//! Runs the TEA update loop for one message, then reconciles every fetch
//! slot against the resulting state and dispatches the requests that are
//! due.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use perfx_api::PerfApi;

use crate::actions::handle_action;
use crate::debounce::SearchDebouncer;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::navigation::Navigator;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<A>(
    state: &mut AppState,
    message: Message,
    navigator: &mut dyn Navigator,
    api: &Arc<A>,
    debouncer: &mut SearchDebouncer,
    msg_tx: &mpsc::Sender<Message>,
) where
    A: PerfApi + Send + Sync + 'static,
{
    let mut queue = VecDeque::from([message]);
    while let Some(msg) = queue.pop_front() {
        let result = handler::update(state, msg);

        if let Some(action) = result.action {
            // A URL write must be re-derived before any other follow-up
            if let Some(navigated) = handle_action(action, navigator, api, debouncer, msg_tx) {
                queue.push_front(navigated);
            }
        }

        if let Some(follow_up) = result.message {
            queue.push_back(follow_up);
        }
    }

    if state.should_quit() {
        debouncer.cancel_all();
        return;
    }

    let requests = handler::reconcile(state, Utc::now());
    if !requests.is_empty() {
        handle_action(
            UpdateAction::Fetch(requests),
            navigator,
            api,
            debouncer,
            msg_tx,
        );
    }
}
