use drafter_neural::{NetworkFailure, Suggestion};
use std::time::Duration;
use tracing::debug;

use super::{FetchState, FetcherConfig};

/// Where the current fetch cycle is.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing scheduled. Either no text yet or the text is below threshold.
    Idle,
    /// Waiting out the quiet period for `text`.
    Debouncing { generation: u64, text: String },
    /// Request for `text` is outstanding.
    Fetching { generation: u64, text: String },
    /// Last request resolved (successfully or not).
    Settled,
    /// Torn down. Every further event is ignored.
    Closed,
}

#[derive(Debug)]
pub enum Event {
    TextChanged(String),
    TimerFired {
        generation: u64,
    },
    ResponseReceived {
        generation: u64,
        result: Result<Vec<Suggestion>, NetworkFailure>,
    },
    Teardown,
}

/// Side effects the driver must carry out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Abort the pending timer and any in-flight request.
    CancelPending,
    ScheduleTimer { generation: u64, delay: Duration },
    Dispatch { generation: u64, text: String },
    /// Push the current `FetchState` to subscribers.
    Publish,
}

/// The pure debounce/fetch/cancel state machine.
///
/// A response is current iff its generation equals `self.generation`; every
/// text change bumps the generation, so superseded timers and responses fall
/// through the comparison and are dropped.
#[derive(Debug)]
pub struct FetchMachine {
    config: FetcherConfig,
    phase: Phase,
    generation: u64,
    state: FetchState,
}

impl FetchMachine {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            generation: 0,
            state: FetchState::default(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        if self.is_closed() {
            return Vec::new();
        }

        match event {
            Event::TextChanged(text) => self.on_text_changed(text),
            Event::TimerFired { generation } => self.on_timer_fired(generation),
            Event::ResponseReceived { generation, result } => {
                self.on_response(generation, result)
            }
            Event::Teardown => {
                self.phase = Phase::Closed;
                vec![Effect::CancelPending]
            }
        }
    }

    fn on_text_changed(&mut self, text: String) -> Vec<Effect> {
        if let Phase::Fetching { generation, text: old } = &self.phase {
            debug!(
                generation,
                chars = old.chars().count(),
                "in-flight request superseded"
            );
        }
        self.generation += 1;
        let mut effects = vec![Effect::CancelPending];

        // The superseded request is gone, so nothing is loading any more.
        if self.state.loading {
            self.state.loading = false;
            effects.push(Effect::Publish);
        }

        if text.chars().count() < self.config.min_chars {
            // Below threshold: suggestions stay as they are.
            self.phase = Phase::Idle;
            return effects;
        }

        self.phase = Phase::Debouncing {
            generation: self.generation,
            text,
        };
        effects.push(Effect::ScheduleTimer {
            generation: self.generation,
            delay: self.config.debounce,
        });
        effects
    }

    fn on_timer_fired(&mut self, generation: u64) -> Vec<Effect> {
        let text = match &self.phase {
            Phase::Debouncing { generation: g, text } if *g == generation => text.clone(),
            _ => {
                debug!(generation, current = self.generation, "stale timer ignored");
                return Vec::new();
            }
        };

        self.phase = Phase::Fetching {
            generation,
            text: text.clone(),
        };
        self.state.loading = true;
        vec![Effect::Dispatch { generation, text }, Effect::Publish]
    }

    fn on_response(
        &mut self,
        generation: u64,
        result: Result<Vec<Suggestion>, NetworkFailure>,
    ) -> Vec<Effect> {
        match &self.phase {
            Phase::Fetching { generation: g, text } if *g == generation => {
                debug!(generation, chars = text.chars().count(), "response received");
            }
            _ => {
                debug!(generation, current = self.generation, "stale response dropped");
                return Vec::new();
            }
        }

        match result {
            Ok(suggestions) => {
                self.state.suggestions = suggestions;
                self.state.error = None;
            }
            Err(failure) => {
                self.state.error = Some(failure.to_string());
            }
        }
        self.state.loading = false;
        self.phase = Phase::Settled;
        vec![Effect::Publish]
    }
}
