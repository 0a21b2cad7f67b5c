//! Tick-driven session loop
//!
//! `Game` owns one session plus everything that outlives a tick: the replay
//! recorder, the achievement set and the high score. Time, input and output
//! all come through the `platform` traits.

use std::path::PathBuf;
use std::time::Duration;

use crate::consts::INPUT_POLL_MS;
use crate::highscores::{HIGH_SCORE_FILE, HighScore};
use crate::persistence::{
    PersistError, ReplayLibrary, load_achievements, save_achievements, save_replay,
};
use crate::platform::{Clock, Frame, FrameSink, InputSource, Intent, unix_now};
use crate::replay::{ReplayData, ReplayRecorder};
use crate::settings::GameConfig;
use crate::sim::{AchievementSet, GameSession, TickInput, TickOutcome, tick};

pub const ACHIEVEMENTS_FILE: &str = "achievements.json";
/// Replays are saved under this subdirectory of the save directory
pub const REPLAY_DIR: &str = "replays";

/// Result of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u64,
    pub best: u64,
    pub new_high_score: bool,
    pub ticks: u64,
    pub max_combo: u32,
    /// Achievements unlocked during this run
    pub unlocked: Vec<&'static str>,
    pub replay_path: Option<PathBuf>,
}

pub struct Game {
    session: GameSession,
    recorder: ReplayRecorder,
    achievements: AchievementSet,
    high_score: HighScore,
    save_dir: PathBuf,
    /// Input gathered since the last tick
    pending: TickInput,
    last_tick_ms: u64,
    unlocked: Vec<&'static str>,
    new_high_score: bool,
    replay_path: Option<PathBuf>,
    finished: bool,
}

impl Game {
    /// Start a session at clock time `now_ms`, loading saved progress from `save_dir`
    pub fn new(config: &GameConfig, seed: u64, save_dir: impl Into<PathBuf>, now_ms: u64) -> Self {
        let save_dir = save_dir.into();
        let session = GameSession::new(config, seed, now_ms);

        let mut achievements = AchievementSet::builtin();
        if let Err(e) = load_achievements(&save_dir.join(ACHIEVEMENTS_FILE), &mut achievements) {
            log::warn!("Failed to load achievements: {}", e);
        }
        let high_score = HighScore::load(save_dir.join(HIGH_SCORE_FILE));

        let mut recorder = ReplayRecorder::new();
        recorder.start(&session.config.player_name, unix_now(), now_ms);

        log::info!(
            "New game: seed {}, {}x{}, {}",
            seed,
            session.arena.width,
            session.arena.height,
            session.config.difficulty.as_str()
        );

        Self {
            session,
            recorder,
            achievements,
            high_score,
            save_dir,
            pending: TickInput::default(),
            last_tick_ms: now_ms,
            unlocked: Vec::new(),
            new_high_score: false,
            replay_path: None,
            finished: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn achievements(&self) -> &AchievementSet {
        &self.achievements
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn replay(&self) -> &ReplayData {
        self.recorder.replay()
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    /// Queue an intent for the next tick. The latest move wins.
    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Move(direction) => self.pending.direction = direction,
            Intent::Pause => self.pending.pause = !self.pending.pause,
            Intent::Quit => self.pending.quit = true,
        }
    }

    /// Run one tick if the tick interval has elapsed at `now_ms`
    pub fn update(&mut self, now_ms: u64, sink: &mut dyn FrameSink) -> Option<TickOutcome> {
        if self.session.is_over() {
            return None;
        }
        if now_ms.saturating_sub(self.last_tick_ms) < self.session.tick_interval_ms() {
            return None;
        }
        self.last_tick_ms = now_ms;

        let input = std::mem::take(&mut self.pending);
        let outcome = tick(&mut self.session, &input, now_ms);

        if outcome.advanced {
            self.recorder.record_move(input.direction);
            self.recorder.record_snapshot(&self.session, now_ms);

            let ctx = self.session.achievement_context();
            let unlocked = self.achievements.evaluate(&ctx, unix_now());
            self.unlocked.extend(unlocked);
        }

        sink.present(&Frame::from_session(&self.session));

        if self.session.is_over() {
            self.finish(now_ms);
        }
        Some(outcome)
    }

    /// Drive the session to game over
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        clock: &mut dyn Clock,
        sink: &mut dyn FrameSink,
    ) -> GameSummary {
        while !self.session.is_over() {
            if let Some(intent) = input.poll() {
                self.handle_intent(intent);
            }
            let now = clock.now_ms();
            if self.update(now, sink).is_none() {
                let due = self.last_tick_ms + self.session.tick_interval_ms();
                let wait = due.saturating_sub(now).clamp(1, INPUT_POLL_MS);
                clock.sleep(Duration::from_millis(wait));
            }
        }
        self.summary()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.session.score,
            best: self.high_score.best(),
            new_high_score: self.new_high_score,
            ticks: self.session.ticks,
            max_combo: self.session.max_combo,
            unlocked: self.unlocked.clone(),
            replay_path: self.replay_path.clone(),
        }
    }

    /// Stop recording and persist progress. Failures are logged only.
    fn finish(&mut self, now_ms: u64) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.recorder.stop(now_ms);

        if let Err(e) = std::fs::create_dir_all(&self.save_dir) {
            log::warn!("Failed to create save dir {}: {}", self.save_dir.display(), e);
        }

        self.new_high_score = self.high_score.submit(self.session.score);

        if let Err(e) = save_achievements(&self.save_dir.join(ACHIEVEMENTS_FILE), &self.achievements) {
            log::warn!("Failed to save achievements: {}", e);
        }

        let replay = self.recorder.replay();
        if replay.is_empty() {
            return;
        }
        let dir = self.save_dir.join(REPLAY_DIR);
        let saved = std::fs::create_dir_all(&dir)
            .map_err(PersistError::from)
            .and_then(|_| {
                let path = ReplayLibrary::new_path(&dir, &replay.player_name, replay.start_date);
                save_replay(&path, replay).map(|_| path)
            });
        match saved {
            Ok(path) => self.replay_path = Some(path),
            Err(e) => log::warn!("Failed to save replay: {}", e),
        }
    }
}
