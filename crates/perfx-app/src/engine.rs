//! Engine - orchestration state shared by every runner
//!
//! The Engine owns the TEA state, the message channel, the navigator (the
//! location is the single source of truth for parameters), the perf API
//! handle and the search debouncer. Runners feed it messages and subscribe
//! to the [`EngineEvent`]s it broadcasts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::info;
use url::Url;

use perfx_api::PerfApi;
use perfx_core::prelude::*;
use perfx_core::{ResourceId, Tab};

use crate::config::Settings;
use crate::debounce::SearchDebouncer;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::navigation::{self, Navigator};
use crate::process;
use crate::state::AppState;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    location: Url,
    plot_init: bool,
    perf_generation: Option<u64>,
    tab_generations: [Option<u64>; 5],
    /// Checked rows per tab; a selection change re-projects without a fetch
    tab_checked: [Option<Vec<ResourceId>>; 5],
    last_notification: Option<u64>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            location: state.location.clone(),
            plot_init: state.is_plot_init(),
            perf_generation: state.perf_slot.data_generation(),
            tab_generations: Tab::ALL.map(|tab| state.tab_slots.get(tab).data_generation()),
            tab_checked: Tab::ALL.map(|tab| {
                state
                    .tab_entries(tab)
                    .map(|entries| entries.checked_ids().into_iter().cloned().collect())
            }),
            last_notification: state.notifications.latest().map(|n| n.id),
        }
    }
}

/// Orchestration engine for Perf Explorer.
pub struct Engine<A> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (stdin reader, tick timer).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The runner's event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Location and history
    navigator: Box<dyn Navigator>,

    api: Arc<A>,

    debouncer: SearchDebouncer,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<A> Engine<A>
where
    A: PerfApi + Send + Sync + 'static,
{
    /// Create an Engine for the navigator's current location.
    ///
    /// Fails when the location names no project.
    pub fn new(
        api: A,
        navigator: Box<dyn Navigator>,
        settings: Settings,
        token: Option<String>,
    ) -> Result<Self> {
        let location = navigator.current_url().clone();
        let project = navigation::project_slug(&location)?;
        info!("Exploring project {}", project);

        let debouncer =
            SearchDebouncer::new(Duration::from_millis(settings.behavior.search_debounce_ms));
        let state = AppState::new(location, project, token, settings);

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (event_tx, _) = broadcast::channel(256);

        Ok(Self {
            state,
            msg_tx,
            msg_rx,
            navigator,
            api: Arc::new(api),
            debouncer,
            event_tx,
        })
    }

    /// Normalize the location in place and issue the first fetches.
    pub fn start(&mut self) {
        if let Some(url) = navigation::normalize(self.navigator.as_mut()) {
            info!("Normalized location to {}", url);
        }
        let url = self.navigator.current_url().clone();
        self.process_message(Message::Navigated { url });
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Emits EngineEvents based on state changes detected by comparing
    /// before/after snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            self.navigator.as_mut(),
            &self.api,
            &mut self.debouncer,
            &self.msg_tx,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Cancel pending searches and tell subscribers we are done.
    pub fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);
        self.debouncer.cancel_all();
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.location != post.location {
            self.emit(EngineEvent::LocationChanged {
                url: post.location.clone(),
            });
        }

        if pre.plot_init != post.plot_init {
            self.emit(EngineEvent::PlotInitChanged {
                plot_init: post.plot_init,
                missing: self.state.missing_dimensions(),
            });
        }

        if pre.perf_generation != post.perf_generation {
            if let Some(perf) = self.state.perf() {
                self.emit(EngineEvent::PerfUpdated {
                    series: perf.results.len(),
                    metrics: perf.metric_count(),
                });
            }
        }

        for (i, tab) in Tab::ALL.into_iter().enumerate() {
            if pre.tab_generations[i] == post.tab_generations[i]
                && pre.tab_checked[i] == post.tab_checked[i]
            {
                continue;
            }
            if let (Some(entries), Some(page)) =
                (self.state.tab_entries(tab), self.state.tab_page(tab))
            {
                self.emit(EngineEvent::TabPageUpdated {
                    tab,
                    entries,
                    total_count: page.total_count,
                });
            }
        }

        for notification in self
            .state
            .notifications
            .iter()
            .filter(|n| Some(n.id) > pre.last_notification)
        {
            self.emit(EngineEvent::Notification(notification.clone()));
        }
    }

    /// Ignore send errors - no subscribers is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOp;
    use crate::navigation::{HistoryStep, MemoryNavigator};
    use crate::notification::NotificationKind;
    use perfx_api::test_utils::{test_branch, FakePerfApi};

    const READY: &str = "branches=b1&testbeds=t1&benchmarks=k1&measures=m1";

    fn engine(api: &FakePerfApi, query: &str) -> Engine<FakePerfApi> {
        let url = Url::parse(&format!("https://bencher.dev/perf/demo?{query}")).unwrap();
        Engine::new(
            api.clone(),
            Box::new(MemoryNavigator::new(url)),
            Settings::default(),
            None,
        )
        .unwrap()
    }

    /// Process fetch results until nothing is in flight
    async fn settle(engine: &mut Engine<FakePerfApi>) {
        while engine.state.is_loading() {
            let msg = tokio::time::timeout(Duration::from_secs(5), engine.msg_rx.recv())
                .await
                .expect("fetch result in time")
                .expect("channel open");
            engine.process_message(msg);
        }
    }

    fn current_query(engine: &Engine<FakePerfApi>) -> Option<String> {
        engine.navigator().current_url().query().map(String::from)
    }

    #[test]
    fn test_location_without_project_is_fatal() {
        let url = Url::parse("https://bencher.dev/").unwrap();
        let result = Engine::new(
            FakePerfApi::new(),
            Box::new(MemoryNavigator::new(url)),
            Settings::default(),
            None,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_plot_init_loads_lists_but_not_perf() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, "branches=b1");
        engine.start();
        settle(&mut engine).await;

        assert!(api.perf_calls().is_empty());
        for tab in Tab::ALL {
            assert_eq!(api.tab_calls(tab).len(), 1, "{tab} fetched once");
        }
        assert!(engine.state.project_info().is_some());
    }

    #[tokio::test]
    async fn test_complete_selection_queries_perf() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, READY);
        engine.start();
        settle(&mut engine).await;

        assert_eq!(api.perf_calls(), vec![engine.state.perf_query()]);
        assert!(engine.state.perf().is_some());
    }

    #[tokio::test]
    async fn test_toggle_updates_url_and_refetches() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, READY);
        engine.start();
        settle(&mut engine).await;

        engine.process_message(Message::Filter(FilterOp::ToggleBranch(
            ResourceId::new("b2").unwrap(),
        )));
        settle(&mut engine).await;

        assert_eq!(
            current_query(&engine).as_deref(),
            Some("branches=b1,b2&testbeds=t1&benchmarks=k1&measures=m1")
        );
        let calls = api.perf_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].branches.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_refetches_same_query() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, READY);
        engine.start();
        settle(&mut engine).await;

        engine.process_message(Message::Refresh);
        settle(&mut engine).await;

        let calls = api.perf_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn test_start_normalizes_malformed_keys() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, "utm=1&branches_page=0&key=true");
        engine.start();
        assert_eq!(current_query(&engine).as_deref(), Some("utm=1"));
        settle(&mut engine).await;
    }

    #[tokio::test]
    async fn test_back_restores_previous_selection() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, READY);
        engine.start();
        settle(&mut engine).await;

        engine.process_message(Message::Filter(FilterOp::ToggleTestbed(
            ResourceId::new("t1").unwrap(),
        )));
        assert!(engine.state.is_plot_init());

        engine.process_message(Message::Traverse(HistoryStep::Back));
        assert!(!engine.state.is_plot_init());
        assert_eq!(current_query(&engine).as_deref(), Some(READY));
        settle(&mut engine).await;
    }

    #[tokio::test]
    async fn test_empty_page_steps_back_in_place() {
        let api = FakePerfApi::new();
        api.set_branches(vec![test_branch("b1"), test_branch("b2")]);
        let mut engine = engine(&api, "branches_page=2");
        engine.start();
        settle(&mut engine).await;

        assert_eq!(current_query(&engine), None);
        let pages: Vec<u32> = api
            .tab_calls(Tab::Branches)
            .iter()
            .map(|request| request.page)
            .collect();
        assert_eq!(pages, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_events_for_perf_and_failures() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, READY);
        let mut events = engine.subscribe();
        engine.start();
        settle(&mut engine).await;

        let mut saw_perf = false;
        while let Ok(event) = events.try_recv() {
            saw_perf |= matches!(event, EngineEvent::PerfUpdated { .. });
        }
        assert!(saw_perf);

        api.fail_perf_with(Some(500));
        engine.process_message(Message::Refresh);
        settle(&mut engine).await;

        let mut notifications = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let EngineEvent::Notification(n) = event {
                notifications.push(n);
            }
        }
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Error);
        // Previous results stay visible
        assert!(engine.state.perf().is_some());
    }

    #[tokio::test]
    async fn test_toggle_reprojects_checked_rows() {
        let api = FakePerfApi::new();
        api.set_branches(vec![test_branch("b1"), test_branch("b2")]);
        let mut engine = engine(&api, "branches=b1");
        engine.start();
        settle(&mut engine).await;

        let mut events = engine.subscribe();
        engine.process_message(Message::Filter(FilterOp::ToggleBranch(
            ResourceId::new("b2").unwrap(),
        )));
        settle(&mut engine).await;

        let mut checked = None;
        while let Ok(event) = events.try_recv() {
            if let EngineEvent::TabPageUpdated {
                tab: Tab::Branches,
                entries,
                ..
            } = event
            {
                let ids: Vec<String> = entries
                    .checked_ids()
                    .into_iter()
                    .map(|id| id.as_str().to_string())
                    .collect();
                checked = Some(ids);
            }
        }
        assert_eq!(checked, Some(vec!["b1".to_string(), "b2".to_string()]));
        assert_eq!(api.tab_calls(Tab::Branches).len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_emits_event() {
        let api = FakePerfApi::new();
        let mut engine = engine(&api, "");
        let mut events = engine.subscribe();
        engine.shutdown();
        assert!(matches!(events.try_recv(), Ok(EngineEvent::Shutdown)));
    }
}
