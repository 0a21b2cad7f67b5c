//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is passed in as milliseconds, never read from the OS
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod achievements;
pub mod food;
pub mod grid;
pub mod portal;
pub mod snake;
pub mod state;
pub mod tick;

pub use achievements::{Achievement, AchievementContext, AchievementSet, Condition};
pub use food::{Food, FoodKind};
pub use grid::{Arena, Direction, GridExt, Point};
pub use portal::{Portal, PortalPair};
pub use snake::{Capabilities, ComboState, DeathReason, MoveOutcome, Snake, SnakeState};
pub use state::{ActiveEffects, GamePhase, GameSession};
pub use tick::{TickInput, TickOutcome, tick};
