//! Headless mode runner - main event loop
//!
//! Drives an [`Engine`] against the live perf API and forwards its events
//! to stdout as NDJSON.

use std::time::Duration;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use url::Url;

use perfx_api::HttpPerfApi;
use perfx_app::config::{api_host, resolve_token, Settings};
use perfx_app::{Engine, EngineEvent, MemoryNavigator, Message};
use perfx_core::prelude::*;

use super::commands::parse_command;
use super::HeadlessEvent;

/// Interval of the housekeeping tick (notification expiry)
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Run in headless mode
///
/// With `once` the runner exits as soon as every fetch has settled and
/// stdin is not read.
pub async fn run_headless(location: Url, settings: Settings, once: bool) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("Perf Explorer starting in HEADLESS mode");
    info!("Location: {}", location);
    info!("═══════════════════════════════════════════════════════");

    let host = api_host(&settings).context("Invalid perf API host")?;
    let api = HttpPerfApi::new(host.clone())
        .with_context(|| format!("Failed to create perf API client for {host}"))?;
    let token = resolve_token(&settings);
    let navigator = Box::new(MemoryNavigator::new(location));

    let mut engine = match Engine::new(api, navigator, settings, token) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to start: {}", e);
            HeadlessEvent::error(e.to_string(), true).emit();
            return Err(e);
        }
    };
    let mut events = engine.subscribe();

    if !once {
        let stdin_tx = engine.msg_sender();
        std::thread::spawn(move || {
            spawn_stdin_reader_blocking(stdin_tx);
        });
    }
    spawn_ticker(engine.msg_sender());

    engine.start();
    HeadlessEvent::started(&engine.state.project, engine.state.location.as_str()).emit();
    HeadlessEvent::state(&engine.state).emit();
    HeadlessEvent::plot_init(engine.state.is_plot_init(), engine.state.missing_dimensions())
        .emit();
    forward_events(&mut events, &engine);

    let result = headless_event_loop(&mut engine, &mut events, once).await;

    engine.shutdown();

    info!("Perf Explorer headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop(
    engine: &mut Engine<HttpPerfApi>,
    events: &mut broadcast::Receiver<EngineEvent>,
    once: bool,
) -> Result<()> {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }
        if once && !engine.state.is_loading() {
            info!("All fetches settled");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                engine.process_message(msg);
                forward_events(events, engine);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Translate pending engine events into NDJSON lines
fn forward_events(events: &mut broadcast::Receiver<EngineEvent>, engine: &Engine<HttpPerfApi>) {
    loop {
        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} event(s) dropped", skipped);
                continue;
            }
            Err(_) => break,
        };

        match event {
            EngineEvent::LocationChanged { .. } => HeadlessEvent::state(&engine.state).emit(),
            EngineEvent::PlotInitChanged { plot_init, missing } => {
                HeadlessEvent::plot_init(plot_init, missing).emit()
            }
            EngineEvent::PerfUpdated { series, metrics } => {
                HeadlessEvent::perf(series, metrics).emit()
            }
            EngineEvent::TabPageUpdated {
                tab,
                entries,
                total_count,
            } => HeadlessEvent::tab_page(tab, total_count, entries).emit(),
            EngineEvent::Notification(notification) => {
                HeadlessEvent::notification(notification.kind, notification.text).emit()
            }
            EngineEvent::Shutdown => {}
        }
    }
}

/// Periodic Tick until the engine drops its receiver
fn spawn_ticker(msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if msg_tx.send(Message::Tick).await.is_err() {
                break;
            }
        }
    });
}

/// Read commands from stdin and send them to the message channel (blocking)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(msg)) => {
                let quit = matches!(msg, Message::Quit);
                info!("Stdin: {:?}", msg);
                if msg_tx.blocking_send(msg).is_err() || quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Stdin: {}", e);
                HeadlessEvent::error(e, false).emit();
            }
        }
    }

    info!("Stdin reader exiting");
}
