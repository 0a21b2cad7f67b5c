//! Frame description handed to the renderer

use crate::sim::{FoodKind, GameSession, Point};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Head first
    pub snake: Vec<Point>,
    pub food: Point,
    pub food_kind: FoodKind,
    pub portals: Vec<Point>,
    pub score: u64,
    pub combo: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl Frame {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            snake: session.snake.body().iter().copied().collect(),
            food: session.food.position,
            food_kind: session.food.kind,
            portals: if session.snake.capabilities().portals {
                session.portals.positions().to_vec()
            } else {
                Vec::new()
            },
            score: session.score,
            combo: session.combo(),
            paused: session.is_paused(),
            game_over: session.is_over(),
        }
    }
}

/// Rendering surface
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

/// Collects frames, used by tests and tools
impl FrameSink for Vec<Frame> {
    fn present(&mut self, frame: &Frame) {
        self.push(frame.clone());
    }
}

/// Headless sink that logs a one-line summary per frame
#[derive(Debug, Default)]
pub struct LogSink {
    pub frames: u64,
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        let head = frame.snake.first().copied().unwrap_or_default();
        log::debug!(
            "frame {}: head ({}, {}) len {} food ({}, {}) score {} combo {}{}{}",
            self.frames,
            head.x,
            head.y,
            frame.snake.len(),
            frame.food.x,
            frame.food.y,
            frame.score,
            frame.combo,
            if frame.paused { " [paused]" } else { "" },
            if frame.game_over { " [game over]" } else { "" },
        );
    }
}
