//! Input intents

use std::collections::VecDeque;

use crate::sim::Direction;

/// A discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(Direction),
    Pause,
    Quit,
}

/// Non-blocking input source. `poll` must return immediately.
pub trait InputSource {
    fn poll(&mut self) -> Option<Intent>;
}

/// Plays back a fixed list of polls; `None` entries are idle polls
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<Option<Intent>>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Option<Intent>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Script that quits on the `n`th poll (0-based)
    pub fn quit_after(n: usize) -> Self {
        Self::new(std::iter::repeat_n(None, n).chain(std::iter::once(Some(Intent::Quit))))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<Intent> {
        self.script.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_polls_in_order() {
        let mut input = ScriptedInput::new([
            Some(Intent::Move(Direction::Up)),
            None,
            Some(Intent::Pause),
        ]);
        assert_eq!(input.poll(), Some(Intent::Move(Direction::Up)));
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), Some(Intent::Pause));
        assert_eq!(input.poll(), None);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_quit_after() {
        let mut input = ScriptedInput::quit_after(2);
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), Some(Intent::Quit));
    }
}
