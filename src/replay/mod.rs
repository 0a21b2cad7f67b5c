//! Replay recording
//!
//! A replay is the ordered list of per-tick snapshots of a session. Snapshots
//! are self-contained (full body, food, score, combo), so playback never
//! re-runs the simulation rules.

pub mod player;

pub use player::{PlaybackEnd, ReplayPlayer};

use crate::sim::{Direction, GameSession, Point};

/// Replay file format tag
pub const REPLAY_VERSION_TAG: &str = "SNAKE_REPLAY_v1";
pub const REPLAY_FILE_EXTENSION: &str = "replay";

/// One recorded tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Head first
    pub body: Vec<Point>,
    pub food: Point,
    pub score: u64,
    pub combo: u32,
    /// Milliseconds since recording started
    pub timestamp_ms: u64,
}

impl Snapshot {
    pub fn of(session: &GameSession, timestamp_ms: u64) -> Self {
        Self {
            body: session.snake.body().iter().copied().collect(),
            food: session.food.position,
            score: session.score,
            combo: session.combo(),
            timestamp_ms,
        }
    }
}

/// A recorded session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayData {
    pub player_name: String,
    /// Unix timestamp (s) when recording started
    pub start_date: u64,
    /// Direction requested each recorded tick
    pub moves: Vec<Direction>,
    pub snapshots: Vec<Snapshot>,
    pub final_score: u64,
    pub max_combo: u32,
    /// Wall-clock span of the recording. Informational only.
    pub duration_ms: u64,
}

impl ReplayData {
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}

/// Captures snapshots while a session runs
#[derive(Debug, Default)]
pub struct ReplayRecorder {
    replay: ReplayData,
    recording: bool,
    start_ms: u64,
}

impl ReplayRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh recording, discarding any previous one
    pub fn start(&mut self, player_name: &str, start_date: u64, now_ms: u64) {
        // The file format keeps the name on one line
        let player_name = player_name.replace(['\r', '\n'], " ");
        self.replay = ReplayData {
            player_name,
            start_date,
            ..Default::default()
        };
        self.recording = true;
        self.start_ms = now_ms;
        log::debug!("Recording replay for {}", self.replay.player_name);
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn record_move(&mut self, direction: Direction) {
        if self.recording {
            self.replay.moves.push(direction);
        }
    }

    pub fn record_snapshot(&mut self, session: &GameSession, now_ms: u64) {
        if !self.recording {
            return;
        }
        let snapshot = Snapshot::of(session, now_ms.saturating_sub(self.start_ms));
        self.replay.final_score = snapshot.score;
        self.replay.max_combo = self.replay.max_combo.max(snapshot.combo);
        self.replay.snapshots.push(snapshot);
    }

    /// Finish recording and fix the duration
    pub fn stop(&mut self, now_ms: u64) {
        if !self.recording {
            return;
        }
        self.replay.duration_ms = now_ms.saturating_sub(self.start_ms);
        self.recording = false;
        log::info!(
            "Replay stopped: {} snapshots, {} ms",
            self.replay.snapshots.len(),
            self.replay.duration_ms
        );
    }

    pub fn replay(&self) -> &ReplayData {
        &self.replay
    }

    pub fn into_replay(self) -> ReplayData {
        self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_records_only_while_recording() {
        let session = GameSession::new(&GameConfig::default(), 1, 0);
        let mut recorder = ReplayRecorder::new();
        recorder.record_snapshot(&session, 0);
        recorder.record_move(Direction::Up);
        assert!(recorder.replay().is_empty());

        recorder.start("ana", 1_700_000_000, 1_000);
        assert!(recorder.is_recording());
        recorder.record_move(Direction::Up);
        recorder.record_snapshot(&session, 1_100);
        recorder.stop(1_600);
        recorder.record_snapshot(&session, 1_700);

        let replay = recorder.replay();
        assert_eq!(replay.len(), 1);
        assert_eq!(replay.moves, vec![Direction::Up]);
        assert_eq!(replay.snapshots[0].timestamp_ms, 100);
        assert_eq!(replay.duration_ms, 600);
        assert_eq!(replay.start_date, 1_700_000_000);
    }

    #[test]
    fn test_tracks_final_score_and_max_combo() {
        let mut session = GameSession::new(&GameConfig::default(), 1, 0);
        let mut recorder = ReplayRecorder::new();
        recorder.start("ana", 0, 0);

        let mut now = 0;
        for x in 11..14 {
            session.food.position = Point::new(x, 10);
            now += 100;
            tick(&mut session, &TickInput::default(), now);
            recorder.record_snapshot(&session, now);
        }
        // Combo resets after the window
        session.food.position = Point::new(14, 10);
        now += 5_000;
        tick(&mut session, &TickInput::default(), now);
        recorder.record_snapshot(&session, now);
        recorder.stop(now);

        let replay = recorder.into_replay();
        assert_eq!(replay.max_combo, 3);
        assert_eq!(replay.final_score, 10 + 20 + 30 + 10);
        assert_eq!(replay.snapshots.last().map(|s| s.combo), Some(1));
    }

    #[test]
    fn test_player_name_kept_on_one_line() {
        let mut recorder = ReplayRecorder::new();
        recorder.start("bad\nname", 0, 0);
        assert_eq!(recorder.replay().player_name, "bad name");
    }
}
