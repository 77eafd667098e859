// SPDX-License-Identifier: MPL-2.0
//! Position within the image sequence.
//!
//! The index is always inside `[0, len - 1]` (or 0 for an empty sequence).
//! Moving past either end is a no-op; there is no wraparound.

/// Direction of a single navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Navigation sub-component state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    current_index: usize,
    len: usize,
}

/// Messages for the navigation sub-component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Next,
    Previous,
    /// Jump to an index; out-of-range values are clamped.
    JumpTo(usize),
    /// Slider value; rounded and clamped.
    SliderChanged(f32),
}

/// Effects produced by navigation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    IndexChanged { from: usize, to: usize },
}

impl State {
    /// State for a freshly loaded sequence, positioned on the first image.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            current_index: 0,
            len,
        }
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        let target = match msg {
            Message::Next => self.current_index.saturating_add(1),
            Message::Previous => self.current_index.saturating_sub(1),
            Message::JumpTo(index) => index,
            Message::SliderChanged(value) => slider_index(value),
        };
        self.move_to(target)
    }

    /// Moves one step in `direction`.
    pub fn step(&mut self, direction: Direction) -> Effect {
        match direction {
            Direction::Next => self.handle(Message::Next),
            Direction::Previous => self.handle(Message::Previous),
        }
    }

    fn move_to(&mut self, target: usize) -> Effect {
        let Some(last) = self.len.checked_sub(1) else {
            return Effect::None;
        };
        let to = target.min(last);
        if to == self.current_index {
            return Effect::None;
        }
        let from = std::mem::replace(&mut self.current_index, to);
        Effect::IndexChanged { from, to }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.len
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Negative and NaN map to 0
fn slider_index(value: f32) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_at_end_is_idempotent() {
        let mut state = State::new(3);
        assert_eq!(
            state.handle(Message::Next),
            Effect::IndexChanged { from: 0, to: 1 }
        );
        state.handle(Message::Next);
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.handle(Message::Next), Effect::None);
        assert_eq!(state.current_index(), 2);
        assert!(!state.has_next());
    }

    #[test]
    fn previous_at_start_is_noop() {
        let mut state = State::new(4);
        assert_eq!(state.handle(Message::Previous), Effect::None);
        assert_eq!(state.current_index(), 0);
        assert!(!state.has_previous());
    }

    #[test]
    fn index_stays_in_bounds_for_any_sequence_of_steps() {
        let mut state = State::new(5);
        let script = [
            Direction::Next,
            Direction::Next,
            Direction::Previous,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Previous,
        ];
        for direction in script {
            state.step(direction);
            assert!(state.current_index() < state.len());
        }
        assert_eq!(state.current_index(), 3);
    }

    #[test]
    fn jump_and_slider_are_clamped() {
        let mut state = State::new(10);
        state.handle(Message::JumpTo(99));
        assert_eq!(state.current_index(), 9);
        state.handle(Message::SliderChanged(3.6));
        assert_eq!(state.current_index(), 4);
        state.handle(Message::SliderChanged(-2.0));
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn empty_sequence_ignores_navigation() {
        let mut state = State::new(0);
        assert!(state.is_empty());
        assert_eq!(state.handle(Message::Next), Effect::None);
        assert_eq!(state.handle(Message::JumpTo(3)), Effect::None);
        assert_eq!(state.current_index(), 0);
    }
}
