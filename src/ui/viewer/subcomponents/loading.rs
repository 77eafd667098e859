// SPDX-License-Identifier: MPL-2.0
//! Loading state sub-component with animated spinner.

use std::time::{Duration, Instant};

/// Time after which the loading screen shows a "still working" hint.
const SLOW_LOAD_THRESHOLD: Duration = Duration::from_secs(10);

/// Spinner rotation speed in radians per tick.
const SPINNER_SPEED: f32 = 0.1;

/// Loading state for the sequence fetch.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub is_loading: bool,
    started_at: Option<Instant>,
    /// Current spinner rotation angle in radians.
    spinner_rotation: f32,
    /// Set once the load has run past [`SLOW_LOAD_THRESHOLD`].
    slow: bool,
}

/// Messages for the loading state sub-component.
#[derive(Debug, Clone)]
pub enum Message {
    StartLoading,
    /// Stop loading (success or failure).
    StopLoading,
    /// Animate the spinner.
    SpinnerTick,
}

/// Effects produced by the loading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The load just crossed the slow threshold.
    BecameSlow,
}

impl State {
    pub fn handle(&mut self, msg: Message) -> Effect {
        self.handle_at(msg, Instant::now())
    }

    /// Same as [`State::handle`] with an explicit clock reading.
    pub fn handle_at(&mut self, msg: Message, now: Instant) -> Effect {
        match msg {
            Message::StartLoading => {
                self.is_loading = true;
                self.started_at = Some(now);
                self.slow = false;
                Effect::None
            }
            Message::StopLoading => {
                *self = Self::default();
                Effect::None
            }
            Message::SpinnerTick => {
                if !self.is_loading {
                    return Effect::None;
                }
                self.spinner_rotation += SPINNER_SPEED;
                if self.spinner_rotation > std::f32::consts::TAU {
                    self.spinner_rotation -= std::f32::consts::TAU;
                }
                let elapsed = self
                    .started_at
                    .map(|started| now.saturating_duration_since(started));
                if !self.slow && elapsed.is_some_and(|elapsed| elapsed > SLOW_LOAD_THRESHOLD) {
                    self.slow = true;
                    return Effect::BecameSlow;
                }
                Effect::None
            }
        }
    }

    #[must_use]
    pub fn spinner_rotation(&self) -> f32 {
        self.spinner_rotation
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn is_slow(&self) -> bool {
        self.slow
    }

    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }
}
