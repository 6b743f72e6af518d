//! Async facade over the session machine.
//!
//! `TimerSession` is a cheap-to-clone handle; every clone drives the same
//! machine. Operations lock the state, apply the pure transition, and
//! broadcast the resulting events once the lock is released. The one-second
//! ticker and the delayed auto-start run as background tasks whose join
//! handles live in slots, so arming a new one (or any manual operation)
//! aborts the old.

use std::sync::Arc;

use pomo_ipc::{SessionKind, SessionSnapshot, SettingsPatch, StatsSnapshot};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::{SessionEvent, SessionState, TimerSettings, AUTO_START_DELAY, TICK_INTERVAL};

/// Events buffered per subscriber; a subscriber that falls further behind
/// sees `RecvError::Lagged` and can resync from a snapshot.
const EVENT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct TimerSession {
    state: Arc<Mutex<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    auto_start: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TimerSession {
    pub fn new(settings: TimerSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(SessionState::new(settings))),
            events,
            ticker: Arc::new(Mutex::new(None)),
            auto_start: Arc::new(Mutex::new(None)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn stats(&self) -> StatsSnapshot {
        self.state.lock().await.stats()
    }

    /// Start from idle or resume from a pause. A second start while running
    /// does nothing, so only one ticker ever runs.
    pub async fn start(&self) {
        self.cancel_auto_start().await;
        let event = self.state.lock().await.start();
        if let Some(event) = event {
            debug!("session started");
            self.spawn_ticker().await;
            self.broadcast(event);
        }
    }

    pub async fn pause(&self) {
        self.cancel_auto_start().await;
        let event = self.state.lock().await.pause();
        if let Some(event) = event {
            debug!("session paused");
            self.cancel_ticker().await;
            self.broadcast(event);
        }
    }

    pub async fn reset(&self) {
        self.cancel_auto_start().await;
        self.cancel_ticker().await;
        let event = self.state.lock().await.reset();
        self.broadcast(event);
    }

    pub async fn reset_cycle(&self) {
        self.cancel_auto_start().await;
        self.cancel_ticker().await;
        let event = self.state.lock().await.reset_cycle();
        info!("cycle reset");
        self.broadcast(event);
    }

    /// Advance to the next session without crediting time. The next session
    /// always waits for a manual start.
    pub async fn skip(&self) {
        self.cancel_auto_start().await;
        self.cancel_ticker().await;
        let event = self.state.lock().await.skip();
        if let SessionEvent::SessionSkipped { previous, next, .. } = &event {
            info!(from = previous.label(), to = next.label(), "session skipped");
        }
        self.broadcast(event);
    }

    pub async fn update_settings(&self, patch: SettingsPatch) {
        let events = self.state.lock().await.update_settings(&patch);
        info!("settings updated");
        for event in events {
            self.broadcast(event);
        }
    }

    pub async fn update_stats(&self, stats: StatsSnapshot) {
        let event = self.state.lock().await.update_stats(stats);
        self.broadcast(event);
    }

    pub async fn clear_stats(&self) {
        self.cancel_auto_start().await;
        self.cancel_ticker().await;
        let events = self.state.lock().await.clear_stats();
        info!("statistics cleared");
        for event in events {
            self.broadcast(event);
        }
    }

    /// Abort the background tasks. Called once when the app exits.
    pub async fn shutdown(&self) {
        self.cancel_auto_start().await;
        self.cancel_ticker().await;
    }

    async fn spawn_ticker(&self) {
        let session = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            // The first tick completes immediately; the countdown starts
            // one full interval later.
            interval.tick().await;
            loop {
                interval.tick().await;
                let (events, completed) = {
                    let mut st = session.state.lock().await;
                    let events = st.tick();
                    let completed = events.iter().find_map(|event| match event {
                        SessionEvent::SessionCompleted { next, .. } => {
                            Some((*next, st.settings().auto_start(*next)))
                        }
                        _ => None,
                    });
                    (events, completed)
                };
                if events.is_empty() {
                    // Paused or reset in between ticks; the abort just
                    // has not landed yet.
                    break;
                }
                for event in events {
                    session.broadcast(event);
                }
                if let Some((next, auto)) = completed {
                    if auto {
                        session.arm_auto_start(next).await;
                    }
                    break;
                }
            }
        });
        let mut slot = self.ticker.lock().await;
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    async fn arm_auto_start(&self, kind: SessionKind) {
        debug!(next = kind.label(), "auto-start armed");
        let session = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(AUTO_START_DELAY).await;
            // Take our own handle out of the slot first so the start path
            // does not abort the task that is running it.
            session.auto_start.lock().await.take();
            debug!(next = kind.label(), "auto-starting next session");
            boxed_start(session).await;
        });
        let mut slot = self.auto_start.lock().await;
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn cancel_auto_start(&self) {
        if let Some(handle) = self.auto_start.lock().await.take() {
            debug!("pending auto-start cancelled");
            handle.abort();
        }
    }

    fn broadcast(&self, event: SessionEvent) {
        // Send only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(event);
    }
}

/// Type-erased wrapper that breaks the async recursion
/// `start -> spawn_ticker -> arm_auto_start -> start`, which the compiler
/// cannot otherwise prove `Send`.
fn boxed_start(
    session: TimerSession,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
    Box::pin(async move { session.start().await })
}
