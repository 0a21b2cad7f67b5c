//! Snake state machine: movement, growth, collisions, combo and portal transit

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Arena, Direction, GridExt, Point};
use crate::consts::{BASE_POINTS, COMBO_WINDOW_MS, MAX_MULTIPLIER};

/// Optional rule sets a snake participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Consecutive food within the combo window raises the multiplier
    pub combo: bool,
    /// Head may be relocated by portals
    pub portals: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            combo: true,
            portals: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Externally visible state of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeState {
    Alive,
    /// Alive with inverted controls
    Reversed,
    /// Head was relocated by a portal; the next move is suppressed
    Teleporting,
    /// Terminal
    Dead(DeathReason),
}

/// Result of a single `move` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Head advanced one step (already wrapped if the arena wraps)
    Moved { head: Point },
    /// Move swallowed by portal transit; the transit flag is now clear
    Suppressed,
    /// The move killed the snake
    Died(DeathReason),
    /// Snake was already dead, nothing happened
    Ignored,
}

/// Time-windowed combo counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    /// Timestamp (ms) of the last food eaten, `None` before the first one
    pub last_food_ms: Option<u64>,
}

impl ComboState {
    /// Register a food-eaten event at `now_ms`, returning the new count
    pub fn register(&mut self, now_ms: u64) -> u32 {
        let within_window = self
            .last_food_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < COMBO_WINDOW_MS);
        self.count = if within_window { self.count + 1 } else { 1 };
        self.last_food_ms = Some(now_ms);
        self.count
    }

    pub fn multiplier(&self) -> u32 {
        self.count.min(MAX_MULTIPLIER)
    }
}

/// The player's snake. Head is `body[0]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Point>,
    direction: Direction,
    reversed_controls: bool,
    in_portal: bool,
    combo: ComboState,
    capabilities: Capabilities,
    death: Option<DeathReason>,
}

impl Snake {
    /// Create a straight snake of `length` segments with its head at `head`,
    /// trailing away from `direction`
    pub fn new(head: Point, length: usize, direction: Direction, capabilities: Capabilities) -> Self {
        let direction = match direction {
            Direction::None => Direction::Right,
            dir => dir,
        };
        let step = direction.vector();
        let body = (0..length.max(1) as i32).map(|i| head - step * i).collect();
        Self::from_body(body, direction, capabilities)
    }

    /// Create a snake from explicit segments (head first)
    pub fn from_body(body: VecDeque<Point>, direction: Direction, capabilities: Capabilities) -> Self {
        assert!(!body.is_empty(), "snake needs at least one segment");
        Self {
            body,
            direction,
            reversed_controls: false,
            in_portal: false,
            combo: ComboState::default(),
            capabilities,
            death: None,
        }
    }

    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn tail(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn combo(&self) -> &ComboState {
        &self.combo
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    pub fn in_portal(&self) -> bool {
        self.in_portal
    }

    pub fn reversed_controls(&self) -> bool {
        self.reversed_controls
    }

    pub fn set_reversed_controls(&mut self, reversed: bool) {
        self.reversed_controls = reversed;
    }

    pub fn state(&self) -> SnakeState {
        match self.death {
            Some(reason) => SnakeState::Dead(reason),
            None if self.in_portal => SnakeState::Teleporting,
            None if self.reversed_controls => SnakeState::Reversed,
            None => SnakeState::Alive,
        }
    }

    /// True if any segment occupies `point`
    pub fn occupies(&self, point: Point) -> bool {
        self.body.contains(&point)
    }

    /// Heading that a request for `requested` would produce
    fn resolve_heading(&self, requested: Direction) -> Direction {
        if requested == Direction::None {
            return self.direction;
        }
        if self.reversed_controls {
            requested.inverted()
        } else if requested.is_opposite(self.direction) {
            self.direction
        } else {
            requested
        }
    }

    /// Advance one step toward `requested` (or the current heading).
    ///
    /// Collisions are checked right after the body shifts; either kind is terminal.
    pub fn step(&mut self, requested: Direction, arena: &Arena) -> MoveOutcome {
        if !self.is_alive() {
            return MoveOutcome::Ignored;
        }

        self.direction = self.resolve_heading(requested);

        if self.in_portal {
            self.in_portal = false;
            return MoveOutcome::Suppressed;
        }

        let mut head = self.head() + self.direction.vector();
        if arena.wrap {
            head = head.wrap(arena.width, arena.height);
        }

        self.body.push_front(head);
        self.body.pop_back();

        if let Some(reason) = self.collision(arena) {
            log::debug!("Snake died at ({}, {}): {:?}", head.x, head.y, reason);
            self.death = Some(reason);
            return MoveOutcome::Died(reason);
        }

        MoveOutcome::Moved { head }
    }

    /// Collision state of the current head
    pub fn collision(&self, arena: &Arena) -> Option<DeathReason> {
        let head = self.head();
        if !arena.wrap && !head.in_bounds(arena.width, arena.height) {
            return Some(DeathReason::WallCollision);
        }
        if self.body.iter().skip(1).any(|&segment| segment == head) {
            return Some(DeathReason::SelfCollision);
        }
        None
    }

    /// Append a duplicate of the tail; it separates on the next move
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push_back(tail);
    }

    /// Register a food-eaten event and return the score delta
    pub fn update_combo(&mut self, now_ms: u64) -> u64 {
        if self.capabilities.combo {
            self.combo.register(now_ms);
        } else {
            self.combo.count = 1;
            self.combo.last_food_ms = Some(now_ms);
        }
        BASE_POINTS * self.combo.multiplier() as u64
    }

    pub fn combo_multiplier(&self) -> u32 {
        self.combo.multiplier()
    }

    /// Relocate the head to `destination` and suppress the next move.
    ///
    /// A destination already held by the body kills the snake.
    pub fn teleport_to(&mut self, destination: Point) -> Option<DeathReason> {
        if !self.is_alive() || !self.capabilities.portals {
            return None;
        }
        self.in_portal = true;
        self.body[0] = destination;
        if self.body.iter().skip(1).any(|&segment| segment == destination) {
            self.death = Some(DeathReason::SelfCollision);
            return self.death;
        }
        None
    }
}
