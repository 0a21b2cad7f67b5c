//! Game session state
//!
//! Everything a running session owns lives here: the snake, the food, the
//! portal pair, scoring counters and the seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::achievements::AchievementContext;
use super::food::{Food, FoodKind};
use super::grid::{Arena, Direction, Point};
use super::portal::PortalPair;
use super::snake::Snake;
use crate::consts::*;
use crate::settings::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Run ended (death, quit or full board)
    GameOver,
}

/// Timed effects from special food. Deadlines are session timestamps (ms).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    pub speed_boost_until_ms: Option<u64>,
    pub reverse_until_ms: Option<u64>,
}

impl ActiveEffects {
    pub fn speed_boost(&self) -> bool {
        self.speed_boost_until_ms.is_some()
    }

    pub fn reversed(&self) -> bool {
        self.reverse_until_ms.is_some()
    }
}

/// One game session
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    pub arena: Arena,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub snake: Snake,
    pub food: Food,
    pub portals: PortalPair,
    pub score: u64,
    /// Highest combo count reached this session
    pub max_combo: u32,
    pub foods_eaten: u32,
    pub portal_uses: u32,
    pub phase: GamePhase,
    pub effects: ActiveEffects,
    /// Simulation tick counter
    pub ticks: u64,
    pub start_ms: u64,
    pub now_ms: u64,
}

impl GameSession {
    /// Create a session with a deterministic RNG from `seed`
    pub fn new(config: &GameConfig, seed: u64, start_ms: u64) -> Self {
        Self::with_rng(config, seed, Pcg32::seed_from_u64(seed), start_ms)
    }

    /// Create a session around an explicit RNG
    pub fn with_rng(config: &GameConfig, seed: u64, rng: Pcg32, start_ms: u64) -> Self {
        let config = config.validated();
        let arena = config.arena();
        let snake = Snake::new(
            Point::new(arena.width / 2, arena.height / 2),
            INITIAL_LENGTH,
            Direction::Right,
            config.capabilities(),
        );
        let portals = PortalPair::corners(&arena);

        let mut session = Self {
            config,
            arena,
            seed,
            rng,
            snake,
            food: Food {
                position: Point::new(1, 1),
                kind: FoodKind::Normal,
            },
            portals,
            score: 0,
            max_combo: 0,
            foods_eaten: 0,
            portal_uses: 0,
            phase: GamePhase::Playing,
            effects: ActiveEffects::default(),
            ticks: 0,
            start_ms,
            now_ms: start_ms,
        };

        if !session.respawn_food() {
            log::warn!("No free cell for the first food");
            session.phase = GamePhase::GameOver;
        }
        session
    }

    /// Place new food away from the snake and the portals.
    ///
    /// Returns false when the board has no free interior cell left.
    pub fn respawn_food(&mut self) -> bool {
        let snake = &self.snake;
        let portals = &self.portals;
        let blocked = |p: Point| snake.occupies(p) || portals.contains(p);
        match Food::place(&mut self.rng, &self.arena, self.config.special_food, blocked) {
            Some(food) => {
                self.food = food;
                true
            }
            None => false,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.start_ms)
    }

    pub fn combo(&self) -> u32 {
        self.snake.combo().count
    }

    /// Delay between ticks: shrinks every few foods, halved during a speed boost
    pub fn tick_interval_ms(&self) -> u64 {
        let steps = (self.foods_eaten / FOODS_PER_SPEEDUP) as u64;
        let base = self
            .config
            .difficulty
            .initial_tick_ms()
            .saturating_sub(steps * TICK_INTERVAL_STEP_MS)
            .max(MIN_TICK_INTERVAL_MS);
        if self.effects.speed_boost() {
            (base / 2).max(MIN_TICK_INTERVAL_MS)
        } else {
            base
        }
    }

    /// Start the timed effect of a food that was just eaten
    pub fn apply_effect(&mut self, kind: FoodKind) {
        let until = self.now_ms + kind.effect_duration().as_millis() as u64;
        match kind {
            FoodKind::Normal => {}
            FoodKind::SpeedBoost => self.effects.speed_boost_until_ms = Some(until),
            FoodKind::ReverseControls => {
                self.effects.reverse_until_ms = Some(until);
                self.snake.set_reversed_controls(true);
            }
        }
    }

    /// Drop effects whose deadline has passed
    pub fn expire_effects(&mut self) {
        let now = self.now_ms;
        if self.effects.speed_boost_until_ms.is_some_and(|t| now >= t) {
            self.effects.speed_boost_until_ms = None;
            log::debug!("Speed boost ended");
        }
        if self.effects.reverse_until_ms.is_some_and(|t| now >= t) {
            self.effects.reverse_until_ms = None;
            self.snake.set_reversed_controls(false);
            log::debug!("Controls restored");
        }
    }

    pub fn achievement_context(&self) -> AchievementContext {
        AchievementContext {
            score: self.score,
            combo: self.snake.combo_multiplier(),
            length: self.snake.len(),
            elapsed_ms: self.elapsed_ms(),
            portal_uses: self.portal_uses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::GridExt;

    #[test]
    fn test_new_session_layout() {
        let session = GameSession::new(&GameConfig::default(), 12345, 0);
        let body: Vec<_> = session.snake.body().iter().copied().collect();
        assert_eq!(
            body,
            vec![Point::new(10, 10), Point::new(9, 10), Point::new(8, 10)]
        );
        assert_eq!(session.portals.positions(), [Point::new(1, 1), Point::new(18, 18)]);
        assert!(session.food.position.is_interior(20, 20));
        assert!(!session.snake.occupies(session.food.position));
        assert!(!session.portals.contains(session.food.position));
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameSession::new(&GameConfig::default(), 777, 0);
        let b = GameSession::new(&GameConfig::default(), 777, 0);
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_tick_interval_shrinks_to_floor() {
        let mut session = GameSession::new(&GameConfig::default(), 1, 0);
        assert_eq!(session.tick_interval_ms(), 100);
        session.foods_eaten = 5;
        assert_eq!(session.tick_interval_ms(), 90);
        session.foods_eaten = 500;
        assert_eq!(session.tick_interval_ms(), MIN_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_speed_boost_halves_interval() {
        let mut session = GameSession::new(&GameConfig::default(), 1, 0);
        session.apply_effect(FoodKind::SpeedBoost);
        assert_eq!(session.tick_interval_ms(), 50);

        session.now_ms = 4_999;
        session.expire_effects();
        assert!(session.effects.speed_boost());
        session.now_ms = 5_000;
        session.expire_effects();
        assert!(!session.effects.speed_boost());
        assert_eq!(session.tick_interval_ms(), 100);
    }

    #[test]
    fn test_reverse_effect_toggles_snake() {
        let mut session = GameSession::new(&GameConfig::default(), 1, 1_000);
        session.apply_effect(FoodKind::ReverseControls);
        assert!(session.snake.reversed_controls());
        session.now_ms = 6_000;
        session.expire_effects();
        assert!(!session.snake.reversed_controls());
    }
}
