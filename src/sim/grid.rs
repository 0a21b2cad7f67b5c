//! Integer grid math and movement directions

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A grid cell. `x` grows to the right, `y` grows downward.
pub type Point = IVec2;

/// Grid helpers on top of `IVec2`
pub trait GridExt {
    /// Map out-of-range coordinates back into `[0, width) x [0, height)`
    fn wrap(self, width: i32, height: i32) -> Self;
    /// True if the point lies inside `[0, width) x [0, height)`
    fn in_bounds(self, width: i32, height: i32) -> bool;
    /// True if the point lies inside the grid, excluding the outer border ring
    fn is_interior(self, width: i32, height: i32) -> bool;
}

impl GridExt for Point {
    #[inline]
    fn wrap(self, width: i32, height: i32) -> Self {
        self.rem_euclid(IVec2::new(width, height))
    }

    #[inline]
    fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }

    #[inline]
    fn is_interior(self, width: i32, height: i32) -> bool {
        self.x >= 1 && self.x < width - 1 && self.y >= 1 && self.y < height - 1
    }
}

/// Board dimensions and edge behavior as seen by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    /// Crossing an edge re-enters on the opposite edge
    pub wrap: bool,
}

impl Arena {
    pub fn new(width: i32, height: i32, wrap: bool) -> Self {
        Self { width, height, wrap }
    }

    /// Number of interior (non-border) cells
    pub fn interior_cells(&self) -> usize {
        ((self.width - 2).max(0) * (self.height - 2).max(0)) as usize
    }
}

/// Movement intent. `None` keeps the current heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Unit step for this direction (zero for `None`)
    #[inline]
    pub fn vector(self) -> Point {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::None => IVec2::ZERO,
        }
    }

    #[inline]
    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// The opposite direction (`None` stays `None`)
    pub fn inverted(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Stable numeric code used by the replay file
    pub fn code(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
            Direction::None => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            4 => Some(Direction::None),
            _ => None,
        }
    }
}
