//! # Suggestion Fetcher
//!
//! Turns a rapidly-changing text value into a debounced, cancelable,
//! at-most-one-in-flight request stream.
//!
//! The decision logic lives in [`machine::FetchMachine`] and is pure. This
//! module owns the tokio side: one driver task per fetcher feeds text
//! changes, timer expiries and responses through the machine in arrival
//! order and executes the effects it returns.

pub mod machine;

use drafter_neural::{NetworkFailure, Suggestion, SuggestionBackend};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use machine::{Effect, Event, FetchMachine};

pub const DEFAULT_MIN_CHARS: usize = 50;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Texts shorter than this (in chars) never trigger a request.
    pub min_chars: usize,
    pub debounce: Duration,
    pub request_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// What the editing surface renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub suggestions: Vec<Suggestion>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetcherError {
    #[error("Suggestion fetcher has been shut down")]
    Closed,
}

/// Aborts the wrapped task when dropped.
struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Handle to a running fetch lifecycle. One per editing session.
pub struct SuggestionFetcher {
    events: mpsc::UnboundedSender<Event>,
    state_rx: watch::Receiver<FetchState>,
    driver: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for SuggestionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("state", &*self.state_rx.borrow())
            .finish()
    }
}

impl SuggestionFetcher {
    /// Start the driver task. Must be called inside a tokio runtime.
    pub fn spawn(backend: Arc<dyn SuggestionBackend>, config: FetcherConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(FetchState::default());

        let driver = Driver {
            machine: FetchMachine::new(config.clone()),
            backend,
            request_timeout: config.request_timeout,
            loopback: events_tx.downgrade(),
            state_tx,
            timer: None,
            request: None,
        };

        info!(
            min_chars = config.min_chars,
            debounce_ms = config.debounce.as_millis() as u64,
            "Suggestion fetcher started"
        );
        let handle = tokio::spawn(driver.run(events_rx));

        Self {
            events: events_tx,
            state_rx,
            driver: Some(handle),
        }
    }

    /// Feed the latest text snapshot.
    pub fn update(&self, text: impl Into<String>) -> Result<(), FetcherError> {
        self.events
            .send(Event::TextChanged(text.into()))
            .map_err(|_| FetcherError::Closed)
    }

    /// Current `(suggestions, loading, error)` snapshot.
    pub fn state(&self) -> FetchState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state_rx.clone()
    }

    /// Same as [`subscribe`](Self::subscribe), as a `Stream` that yields the
    /// current state first and then every change.
    pub fn stream(&self) -> WatchStream<FetchState> {
        WatchStream::new(self.state_rx.clone())
    }

    /// Cancel the timer and any in-flight request, then wait for the driver
    /// to exit. No state changes are published after this returns.
    ///
    /// This is the only teardown that guarantees that. See the `Drop` impl.
    pub async fn shutdown(mut self) {
        let _ = self.events.send(Event::Teardown);
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.await {
                if !e.is_cancelled() {
                    warn!("Suggestion fetcher driver failed: {}", e);
                }
            }
        }
    }
}

/// Best-effort teardown. `abort` does not wait: on a multi-thread runtime a
/// driver already applying an effect may publish once more after `drop`
/// returns. Call [`SuggestionFetcher::shutdown`] when that matters.
impl Drop for SuggestionFetcher {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

struct Driver {
    machine: FetchMachine,
    backend: Arc<dyn SuggestionBackend>,
    request_timeout: Duration,
    // Weak so the channel closes once the handle is gone.
    loopback: mpsc::WeakUnboundedSender<Event>,
    state_tx: watch::Sender<FetchState>,
    timer: Option<TaskGuard>,
    request: Option<TaskGuard>,
}

impl Driver {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            for effect in self.machine.handle(event) {
                self.apply(effect);
            }
            if self.machine.is_closed() {
                break;
            }
        }

        self.cancel_pending();
        debug!("Suggestion fetcher driver exited");
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CancelPending => self.cancel_pending(),
            Effect::ScheduleTimer { generation, delay } => {
                // Deadline is fixed here, not when the task first gets polled.
                let deadline = Instant::now() + delay;
                let loopback = self.loopback.clone();
                self.timer = Some(TaskGuard(tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    if let Some(tx) = loopback.upgrade() {
                        let _ = tx.send(Event::TimerFired { generation });
                    }
                })));
            }
            Effect::Dispatch { generation, text } => {
                debug!(generation, chars = text.chars().count(), "dispatching suggestion request");
                let backend = Arc::clone(&self.backend);
                let limit = self.request_timeout;
                let loopback = self.loopback.clone();
                self.request = Some(TaskGuard(tokio::spawn(async move {
                    let result = match tokio::time::timeout(limit, backend.suggest(&text)).await {
                        Ok(result) => result,
                        Err(_) => Err(NetworkFailure::Timeout(limit)),
                    };
                    if let Err(e) = &result {
                        warn!(generation, "suggestion request failed: {}", e);
                    }
                    if let Some(tx) = loopback.upgrade() {
                        let _ = tx.send(Event::ResponseReceived { generation, result });
                    }
                })));
            }
            Effect::Publish => {
                self.state_tx.send_replace(self.machine.state().clone());
            }
        }
    }

    fn cancel_pending(&mut self) {
        self.timer = None;
        self.request = None;
    }
}
