//! Game configuration
//!
//! Persisted as JSON next to the high score and achievement files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_GRID, MIN_GRID};
use crate::sim::{Arena, Capabilities};

/// Board edge behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Topology {
    /// Leaving the board is a wall collision
    Bounded,
    /// Crossing an edge re-enters on the opposite edge
    #[default]
    Wrap,
}

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Tick interval (ms) at the start of a session
    pub fn initial_tick_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Normal => 100,
            Difficulty::Hard => 70,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub topology: Topology,
    pub difficulty: Difficulty,
    /// Allow SPEED_BOOST and REVERSE_CONTROLS food
    pub special_food: bool,
    /// Renderer hint only; the simulation ignores it
    pub animations: bool,
    /// Portal capability
    pub portals: bool,
    /// Combo capability
    pub combo: bool,
    /// Name written into replays
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            topology: Topology::Wrap,
            difficulty: Difficulty::Normal,
            special_food: true,
            animations: true,
            portals: true,
            combo: true,
            player_name: "Player".to_string(),
        }
    }
}

impl GameConfig {
    /// Copy with the board size clamped to the supported range
    pub fn validated(&self) -> Self {
        let mut config = self.clone();
        config.width = config.width.clamp(MIN_GRID, MAX_GRID);
        config.height = config.height.clamp(MIN_GRID, MAX_GRID);
        config
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.width, self.height, self.topology == Topology::Wrap)
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            combo: self.combo,
            portals: self.portals,
        }
    }

    /// Load from a JSON file; missing or unreadable files yield defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read config {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<GameConfig>(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config.validated()
            }
            Err(e) => {
                log::warn!("Malformed config {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Could not save config {}: {}", path.display(), e);
                } else {
                    log::info!("Config saved");
                }
            }
            Err(e) => log::warn!("Could not encode config: {}", e),
        }
    }
}
