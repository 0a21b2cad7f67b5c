//! Single simulation tick
//!
//! Order per tick: quit/pause -> effect expiry -> move -> collision ->
//! portal -> food. Snapshots and achievements are left to the caller.

use super::food::FoodKind;
use super::grid::Direction;
use super::snake::{DeathReason, MoveOutcome};
use super::state::{GamePhase, GameSession};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Requested heading (`None` keeps the current one)
    pub direction: Direction,
    /// Pause toggle
    pub pause: bool,
    /// End the session before anything moves
    pub quit: bool,
}

impl TickInput {
    pub fn steer(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The simulation advanced (not paused, not over)
    pub advanced: bool,
    /// The head moved one cell
    pub moved: bool,
    pub teleported: bool,
    pub ate: Option<FoodKind>,
    /// Score gained this tick
    pub points: u64,
    pub died: Option<DeathReason>,
}

/// Advance the session by one tick at session time `now_ms`
pub fn tick(session: &mut GameSession, input: &TickInput, now_ms: u64) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    session.now_ms = now_ms;

    if session.phase == GamePhase::GameOver {
        return outcome;
    }

    if input.quit {
        log::info!("Quit requested after {} ticks", session.ticks);
        session.phase = GamePhase::GameOver;
        return outcome;
    }

    if input.pause {
        session.phase = match session.phase {
            GamePhase::Playing => GamePhase::Paused,
            _ => GamePhase::Playing,
        };
    }
    if session.phase == GamePhase::Paused {
        return outcome;
    }

    outcome.advanced = true;
    session.ticks += 1;
    session.expire_effects();

    match session.snake.step(input.direction, &session.arena) {
        MoveOutcome::Moved { head } => {
            outcome.moved = true;
            if session.snake.capabilities().portals
                && let Some(destination) = session.portals.resolve(head, session.snake.in_portal())
            {
                outcome.teleported = true;
                session.portal_uses += 1;
                log::debug!(
                    "Teleport ({}, {}) -> ({}, {})",
                    head.x,
                    head.y,
                    destination.x,
                    destination.y
                );
                if let Some(reason) = session.snake.teleport_to(destination) {
                    return game_over(session, outcome, reason);
                }
            }
        }
        // Transit tick: the head stays on the destination portal
        MoveOutcome::Suppressed => return outcome,
        MoveOutcome::Died(reason) => return game_over(session, outcome, reason),
        MoveOutcome::Ignored => {
            session.phase = GamePhase::GameOver;
            return outcome;
        }
    }

    if session.snake.head() == session.food.position {
        let kind = session.food.kind;
        let points = session.snake.update_combo(now_ms);
        session.snake.grow();
        session.score += points;
        session.foods_eaten += 1;
        session.max_combo = session.max_combo.max(session.combo());
        session.apply_effect(kind);
        outcome.ate = Some(kind);
        outcome.points = points;
        log::debug!(
            "Ate {:?} (+{}, combo {}), score {}",
            kind,
            points,
            session.combo(),
            session.score
        );

        if !session.respawn_food() {
            log::info!("Board full, ending session");
            session.phase = GamePhase::GameOver;
        }
    }

    outcome
}

fn game_over(session: &mut GameSession, mut outcome: TickOutcome, reason: DeathReason) -> TickOutcome {
    log::info!("Game over: {:?}, score {}", reason, session.score);
    session.phase = GamePhase::GameOver;
    outcome.died = Some(reason);
    outcome
}
