//! Grid Snake - A grid-based snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, food, portals, scoring)
//! - `replay`: Per-tick snapshot recording and playback
//! - `platform`: Input/clock/frame boundary traits
//! - `persistence`: Save/load of replays and achievements
//! - `game`: Tick-driven session loop

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod replay;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::HighScore;
pub use settings::{Difficulty, GameConfig, Topology};

/// Game configuration constants
pub mod consts {
    /// Points awarded per food before the combo multiplier
    pub const BASE_POINTS: u64 = 10;
    /// Window (ms) within which consecutive food raises the combo
    pub const COMBO_WINDOW_MS: u64 = 2000;
    /// Combo multiplier cap
    pub const MAX_MULTIPLIER: u32 = 5;

    /// Effect duration for SPEED_BOOST and REVERSE_CONTROLS food
    pub const SPECIAL_EFFECT_MS: u64 = 5000;

    /// Tick interval floor (ms)
    pub const MIN_TICK_INTERVAL_MS: u64 = 50;
    /// Interval reduction applied every `FOODS_PER_SPEEDUP` foods
    pub const TICK_INTERVAL_STEP_MS: u64 = 10;
    pub const FOODS_PER_SPEEDUP: u32 = 5;

    /// Initial snake length
    pub const INITIAL_LENGTH: usize = 3;

    /// Random food placement attempts before falling back to a full scan
    pub const FOOD_PLACEMENT_ATTEMPTS: usize = 64;

    /// Longest the game loop sleeps between input polls
    pub const INPUT_POLL_MS: u64 = 10;

    /// Default replay playback cadence (ms per snapshot)
    pub const REPLAY_CADENCE_MS: u64 = 100;

    /// Grid size limits
    pub const MIN_GRID: i32 = 8;
    pub const MAX_GRID: i32 = 100;
}
