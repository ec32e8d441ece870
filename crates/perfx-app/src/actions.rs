//! Action handlers: UpdateAction dispatch and background fetch spawning

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use perfx_api::PerfApi;
use perfx_core::Error;

use crate::debounce::SearchDebouncer;
use crate::handler::{FetchRequest, UpdateAction};
use crate::message::Message;
use crate::navigation::{write_params, HistoryStep, Navigator};

/// Execute an action
///
/// URL writes and history traversal complete synchronously against the
/// navigator and return the resulting `Navigated` message so the caller
/// re-derives state before anything else runs. Fetches and debounced
/// searches are spawned and report back over `msg_tx`.
pub fn handle_action<A>(
    action: UpdateAction,
    navigator: &mut dyn Navigator,
    api: &Arc<A>,
    debouncer: &mut SearchDebouncer,
    msg_tx: &mpsc::Sender<Message>,
) -> Option<Message>
where
    A: PerfApi + Send + Sync + 'static,
{
    match action {
        UpdateAction::WriteParams { op, history } => {
            write_params(navigator, &op, history).map(|url| Message::Navigated { url })
        }

        UpdateAction::Traverse(step) => {
            let url = match step {
                HistoryStep::Back => navigator.back(),
                HistoryStep::Forward => navigator.forward(),
            };
            if url.is_none() {
                debug!("No history entry to step {:?} to", step);
            }
            url.map(|url| Message::Navigated { url })
        }

        UpdateAction::Fetch(requests) => {
            for request in requests {
                spawn_fetch(request, api.clone(), msg_tx.clone());
            }
            None
        }

        UpdateAction::DebounceSearch { tab, text } => {
            debouncer.schedule(tab, text, msg_tx.clone());
            None
        }
    }
}

/// Run one request in the background and post its `*Loaded` message
pub fn spawn_fetch<A>(request: FetchRequest, api: Arc<A>, msg_tx: mpsc::Sender<Message>)
where
    A: PerfApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let started = Instant::now();
        let msg = match request {
            FetchRequest::Project {
                generation,
                project,
                token,
            } => {
                let result = api
                    .get_project(&project, token.as_deref())
                    .await
                    .map_err(flatten_error);
                Message::ProjectLoaded { generation, result }
            }

            FetchRequest::Perf {
                generation,
                project,
                query,
                token,
            } => {
                info!("Fetching perf for {}", project);
                let result = api
                    .get_perf(&project, &query, token.as_deref())
                    .await
                    .map(Box::new)
                    .map_err(flatten_error);
                Message::PerfLoaded { generation, result }
            }

            FetchRequest::TabPage {
                generation,
                project,
                request,
                token,
            } => {
                let tab = request.tab;
                let result = api
                    .get_tab_page(&project, &request, token.as_deref())
                    .await
                    .map_err(flatten_error);
                Message::TabPageLoaded {
                    tab,
                    generation,
                    result,
                }
            }
        };

        debug!("Fetch finished in {:?}", started.elapsed());
        if msg_tx.send(msg).await.is_err() {
            debug!("Message channel closed, dropping fetch result");
        }
    });
}

/// Flatten a fetch error for its slot
///
/// Recoverable failures are reported by the `*Loaded` handler; anything
/// else points at a local fault and is logged here.
fn flatten_error(e: Error) -> String {
    if !e.is_recoverable() {
        error!("Fetch could not be issued: {:?}", e);
    }
    e.to_string()
}
