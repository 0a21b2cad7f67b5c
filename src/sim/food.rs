//! Food placement with weighted special types

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Arena, Point};
use crate::consts::{FOOD_PLACEMENT_ATTEMPTS, SPECIAL_EFFECT_MS};

/// Food types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FoodKind {
    #[default]
    Normal,
    /// Temporarily shortens the tick interval
    SpeedBoost,
    /// Temporarily inverts steering
    ReverseControls,
}

/// Draw weights out of 100: 80% normal, 10% each special
const KIND_WEIGHTS: [(FoodKind, u32); 3] = [
    (FoodKind::Normal, 80),
    (FoodKind::SpeedBoost, 10),
    (FoodKind::ReverseControls, 10),
];

impl FoodKind {
    /// How long the effect lasts once eaten (zero for normal food)
    pub fn effect_duration(self) -> Duration {
        match self {
            FoodKind::Normal => Duration::ZERO,
            FoodKind::SpeedBoost | FoodKind::ReverseControls => {
                Duration::from_millis(SPECIAL_EFFECT_MS)
            }
        }
    }

    /// Weighted draw; always `Normal` when special food is disabled
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, special_enabled: bool) -> FoodKind {
        if !special_enabled {
            return FoodKind::Normal;
        }
        let total: u32 = KIND_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.random_range(0..total);
        for (kind, weight) in KIND_WEIGHTS {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        FoodKind::Normal
    }
}

/// A single piece of food on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: Point,
    pub kind: FoodKind,
}

impl Food {
    /// Place food on a random free interior cell.
    ///
    /// `blocked` reports occupied cells (snake body, portals). Returns `None`
    /// only when every interior cell is blocked.
    pub fn place<R, F>(rng: &mut R, arena: &Arena, special_enabled: bool, blocked: F) -> Option<Food>
    where
        R: Rng + ?Sized,
        F: Fn(Point) -> bool,
    {
        let position = free_cell(rng, arena, &blocked)?;
        let kind = FoodKind::draw(rng, special_enabled);
        log::debug!("Food {:?} spawned at ({}, {})", kind, position.x, position.y);
        Some(Food { position, kind })
    }
}

/// Rejection-sample a free interior cell, then fall back to scanning every cell
fn free_cell<R, F>(rng: &mut R, arena: &Arena, blocked: &F) -> Option<Point>
where
    R: Rng + ?Sized,
    F: Fn(Point) -> bool,
{
    if arena.interior_cells() == 0 {
        return None;
    }

    for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
        let candidate = Point::new(
            rng.random_range(1..arena.width - 1),
            rng.random_range(1..arena.height - 1),
        );
        if !blocked(candidate) {
            return Some(candidate);
        }
    }

    // Board is nearly full: pick uniformly among the remaining cells
    let free: Vec<Point> = (1..arena.height - 1)
        .flat_map(|y| (1..arena.width - 1).map(move |x| Point::new(x, y)))
        .filter(|&p| !blocked(p))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}
