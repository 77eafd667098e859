// SPDX-License-Identifier: MPL-2.0
//! Wheel debouncing sub-component.
//!
//! Wheel events accumulate into a net delta. Every event pushes the
//! deadline one window further out; once the wheel has been quiet for a
//! full window, the next tick turns the burst into at most one step in
//! the direction of the net delta.

use super::navigation::Direction;
use crate::domain::viewing::DebounceWindow;
use std::time::{Duration, Instant};

/// Interval at which the orchestrator should send [`Message::Tick`] while
/// a burst is pending.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Default)]
pub struct State {
    window: DebounceWindow,
    /// Net scroll amount of the current burst, positive toward next.
    accumulated: f32,
    deadline: Option<Instant>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Wheel moved by `delta` lines, positive toward the next image.
    Scrolled { delta: f32 },
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Step(Direction),
}

impl State {
    #[must_use]
    pub fn new(window: DebounceWindow) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        self.handle_at(msg, Instant::now())
    }

    /// Same as [`State::handle`] with an explicit clock reading.
    pub fn handle_at(&mut self, msg: Message, now: Instant) -> Effect {
        match msg {
            Message::Scrolled { delta } => {
                if delta.is_finite() {
                    self.accumulated += delta;
                    self.deadline = Some(now + self.window.as_duration());
                }
                Effect::None
            }
            Message::Tick => match self.deadline {
                Some(deadline) if now >= deadline => {
                    let net = std::mem::take(&mut self.accumulated);
                    self.deadline = None;
                    if net > 0.0 {
                        Effect::Step(Direction::Next)
                    } else if net < 0.0 {
                        Effect::Step(Direction::Previous)
                    } else {
                        Effect::None
                    }
                }
                _ => Effect::None,
            },
        }
    }

    /// True while a burst is waiting for its window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn window(&self) -> DebounceWindow {
        self.window
    }

    /// Drops any pending burst.
    pub fn cancel(&mut self) {
        self.accumulated = 0.0;
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn run_ticks(state: &mut State, start: Instant, until_ms: u64) -> Vec<Direction> {
        let mut steps = Vec::new();
        let mut t = 0;
        while t <= until_ms {
            if let Effect::Step(direction) = state.handle_at(Message::Tick, start + ms(t)) {
                steps.push(direction);
            }
            t += 16;
        }
        steps
    }

    #[test]
    fn burst_within_window_yields_at_most_one_step() {
        let start = Instant::now();
        let mut state = State::new(DebounceWindow::new(80));
        let mut steps = Vec::new();

        for i in 0..10u64 {
            let at = start + ms(i * 8);
            state.handle_at(Message::Scrolled { delta: 1.0 }, at);
            if let Effect::Step(direction) = state.handle_at(Message::Tick, at) {
                steps.push(direction);
            }
        }
        steps.extend(run_ticks(&mut state, start, 400));

        assert_eq!(steps, vec![Direction::Next]);
        assert!(!state.is_pending());
    }

    #[test]
    fn no_step_before_window_elapses() {
        let start = Instant::now();
        let mut state = State::new(DebounceWindow::new(80));
        state.handle_at(Message::Scrolled { delta: -1.0 }, start);

        assert_eq!(state.handle_at(Message::Tick, start + ms(79)), Effect::None);
        assert!(state.is_pending());
        assert_eq!(
            state.handle_at(Message::Tick, start + ms(80)),
            Effect::Step(Direction::Previous)
        );
    }

    #[test]
    fn separated_bursts_step_separately() {
        let start = Instant::now();
        let mut state = State::new(DebounceWindow::new(50));
        state.handle_at(Message::Scrolled { delta: 1.0 }, start);
        assert_eq!(
            state.handle_at(Message::Tick, start + ms(60)),
            Effect::Step(Direction::Next)
        );

        state.handle_at(Message::Scrolled { delta: 1.0 }, start + ms(200));
        assert_eq!(
            state.handle_at(Message::Tick, start + ms(260)),
            Effect::Step(Direction::Next)
        );
    }

    #[test]
    fn cancelling_deltas_produce_no_step() {
        let start = Instant::now();
        let mut state = State::new(DebounceWindow::new(80));
        state.handle_at(Message::Scrolled { delta: 1.0 }, start);
        state.handle_at(Message::Scrolled { delta: -1.0 }, start + ms(10));

        assert!(run_ticks(&mut state, start, 300).is_empty());
        assert!(!state.is_pending());
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut state = State::default();
        state.handle(Message::Scrolled { delta: f32::NAN });
        assert!(!state.is_pending());
    }

    #[test]
    fn cancel_drops_pending_burst() {
        let start = Instant::now();
        let mut state = State::new(DebounceWindow::new(80));
        state.handle_at(Message::Scrolled { delta: 3.0 }, start);
        state.cancel();
        assert!(run_ticks(&mut state, start, 300).is_empty());
    }
}
