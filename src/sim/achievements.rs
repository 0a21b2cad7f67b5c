//! Achievement rules and the one-way unlock evaluator

use serde::{Deserialize, Serialize};

/// Snapshot of the run an achievement is judged against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AchievementContext {
    pub score: u64,
    /// Current combo multiplier
    pub combo: u32,
    pub length: usize,
    /// Elapsed session time (ms)
    pub elapsed_ms: u64,
    /// Portal transits in this session
    pub portal_uses: u32,
}

/// Unlock condition for an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    ScoreAbove(u64),
    ScoreAtLeast(u64),
    ComboAtLeast(u32),
    LengthAtLeast(usize),
    SurvivedFor { ms: u64 },
    PortalUsesAtLeast(u32),
}

impl Condition {
    pub fn holds(&self, ctx: &AchievementContext) -> bool {
        match *self {
            Condition::ScoreAbove(n) => ctx.score > n,
            Condition::ScoreAtLeast(n) => ctx.score >= n,
            Condition::ComboAtLeast(n) => ctx.combo >= n,
            Condition::LengthAtLeast(n) => ctx.length >= n,
            Condition::SurvivedFor { ms } => ctx.elapsed_ms >= ms,
            Condition::PortalUsesAtLeast(n) => ctx.portal_uses >= n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: Condition,
    unlocked: bool,
    /// Unix timestamp (s) of the unlock
    unlock_date: Option<u64>,
}

impl Achievement {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        condition: Condition,
    ) -> Self {
        Self {
            id,
            name,
            description,
            condition,
            unlocked: false,
            unlock_date: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn unlock_date(&self) -> Option<u64> {
        self.unlock_date
    }

    /// Flip to unlocked. Returns false if it already was.
    pub fn unlock(&mut self, date: u64) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.unlock_date = Some(date);
        true
    }
}

/// Process-wide achievement list
#[derive(Debug, Clone)]
pub struct AchievementSet {
    achievements: Vec<Achievement>,
}

impl Default for AchievementSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AchievementSet {
    pub fn new(achievements: Vec<Achievement>) -> Self {
        Self { achievements }
    }

    /// The game's standard achievements, all locked
    pub fn builtin() -> Self {
        Self::new(vec![
            Achievement::new(
                "first_game",
                "First Steps",
                "Complete your first game",
                Condition::ScoreAbove(0),
            ),
            Achievement::new(
                "speed_demon",
                "Speed Demon",
                "Survive for 100 seconds",
                Condition::SurvivedFor { ms: 100_000 },
            ),
            Achievement::new(
                "combo_master",
                "Combo Master",
                "Achieve a 5x combo",
                Condition::ComboAtLeast(5),
            ),
            Achievement::new(
                "snake_king",
                "Snake King",
                "Reach a length of 20",
                Condition::LengthAtLeast(20),
            ),
            Achievement::new(
                "portal_master",
                "Portal Master",
                "Use portals 10 times in a single game",
                Condition::PortalUsesAtLeast(10),
            ),
            Achievement::new(
                "score_hunter",
                "Score Hunter",
                "Reach a score of 1000",
                Condition::ScoreAtLeast(1000),
            ),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Achievement> {
        self.achievements.iter_mut().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.get(id).is_some_and(Achievement::is_unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Unlock every locked achievement whose condition holds.
    ///
    /// Returns the ids unlocked by this call.
    pub fn evaluate(&mut self, ctx: &AchievementContext, now_unix: u64) -> Vec<&'static str> {
        let mut unlocked = Vec::new();
        for achievement in &mut self.achievements {
            if !achievement.unlocked && achievement.condition.holds(ctx) {
                achievement.unlock(now_unix);
                log::info!("Achievement unlocked: {}", achievement.name);
                unlocked.push(achievement.id);
            }
        }
        unlocked
    }
}
