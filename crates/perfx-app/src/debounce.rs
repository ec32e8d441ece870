//! Search input debouncing
//!
//! Each tab has at most one pending commit. New input aborts the pending
//! timer and starts a fresh one, so only the last input within the quiet
//! period reaches the URL.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use perfx_core::Tab;

use crate::message::Message;

#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: HashMap<Tab, JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Commit `text` for `tab` after the quiet period unless superseded
    pub fn schedule(&mut self, tab: Tab, text: String, msg_tx: mpsc::Sender<Message>) {
        if let Some(handle) = self.pending.remove(&tab) {
            trace!("Superseding pending {} search", tab);
            handle.abort();
        }

        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = msg_tx.send(Message::SearchCommitted { tab, text }).await;
        });
        self.pending.insert(tab, handle);
    }

    /// Abort every pending commit
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
