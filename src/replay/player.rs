//! Replay playback
//!
//! Snapshots are shown in recorded order at a fixed cadence. The recorded
//! timestamps and duration are never used for pacing.

use std::time::Duration;

use super::{ReplayData, Snapshot};
use crate::consts::REPLAY_CADENCE_MS;
use crate::platform::{Clock, Frame, FrameSink, InputSource, Intent};
use crate::sim::{FoodKind, Point};

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// Every snapshot was shown
    Finished,
    /// Quit was requested before snapshot `at` was shown
    Interrupted { at: usize },
}

pub struct ReplayPlayer<'a> {
    replay: &'a ReplayData,
    cursor: usize,
    cadence: Duration,
    portals: Vec<Point>,
}

impl<'a> ReplayPlayer<'a> {
    pub fn new(replay: &'a ReplayData) -> Self {
        Self {
            replay,
            cursor: 0,
            cadence: Duration::from_millis(REPLAY_CADENCE_MS),
            portals: Vec::new(),
        }
    }

    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    /// Portal cells to draw on every frame
    pub fn with_portals(mut self, portals: Vec<Point>) -> Self {
        self.portals = portals;
        self
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Index of the next snapshot to show
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.replay.snapshots.len()
    }

    fn frame(&self, snapshot: &Snapshot, last: bool) -> Frame {
        Frame {
            snake: snapshot.body.clone(),
            food: snapshot.food,
            food_kind: FoodKind::Normal,
            portals: self.portals.clone(),
            score: snapshot.score,
            combo: snapshot.combo,
            paused: false,
            game_over: last,
        }
    }

    /// Present the remaining snapshots, one per cadence step.
    ///
    /// Input is polled once at each snapshot boundary; `Quit` stops playback
    /// there. Other intents are ignored.
    pub fn play(
        &mut self,
        sink: &mut dyn FrameSink,
        input: &mut dyn InputSource,
        clock: &mut dyn Clock,
    ) -> PlaybackEnd {
        let total = self.replay.snapshots.len();
        while self.cursor < total {
            if input.poll() == Some(Intent::Quit) {
                log::info!("Playback interrupted at {}/{}", self.cursor, total);
                return PlaybackEnd::Interrupted { at: self.cursor };
            }
            let snapshot = &self.replay.snapshots[self.cursor];
            let frame = self.frame(snapshot, self.cursor + 1 == total);
            sink.present(&frame);
            self.cursor += 1;
            clock.sleep(self.cadence);
        }
        PlaybackEnd::Finished
    }
}

impl<'a> Iterator for ReplayPlayer<'a> {
    type Item = &'a Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        let snapshot = self.replay.snapshots.get(self.cursor)?;
        self.cursor += 1;
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ManualClock, ScriptedInput};

    fn replay(n: usize) -> ReplayData {
        ReplayData {
            player_name: "ana".into(),
            // Irregular recorded timing must not affect pacing
            snapshots: (0..n)
                .map(|i| Snapshot {
                    body: vec![Point::new(i as i32, 0)],
                    food: Point::new(5, 5),
                    score: i as u64 * 10,
                    combo: 1,
                    timestamp_ms: (i * i * 37) as u64,
                })
                .collect(),
            duration_ms: 123_456,
            ..Default::default()
        }
    }

    #[test]
    fn test_iterates_in_order() {
        let data = replay(4);
        let scores: Vec<u64> = ReplayPlayer::new(&data).map(|s| s.score).collect();
        assert_eq!(scores, vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_fixed_cadence_playback() {
        let data = replay(5);
        let mut frames: Vec<Frame> = Vec::new();
        let mut input = ScriptedInput::default();
        let mut clock = ManualClock::new(0);

        let end = ReplayPlayer::new(&data).play(&mut frames, &mut input, &mut clock);
        assert_eq!(end, PlaybackEnd::Finished);
        assert_eq!(frames.len(), 5);
        assert_eq!(clock.now_ms(), 5 * REPLAY_CADENCE_MS);
        assert!(frames[4].game_over);
        assert!(!frames[3].game_over);
        assert_eq!(frames[2].snake, vec![Point::new(2, 0)]);
    }

    #[test]
    fn test_quit_interrupts_at_boundary() {
        let data = replay(10);
        let mut frames: Vec<Frame> = Vec::new();
        let mut input = ScriptedInput::quit_after(3);
        let mut clock = ManualClock::new(0);

        let mut player = ReplayPlayer::new(&data).with_cadence(Duration::from_millis(40));
        let end = player.play(&mut frames, &mut input, &mut clock);
        assert_eq!(end, PlaybackEnd::Interrupted { at: 3 });
        assert_eq!(frames.len(), 3);
        assert_eq!(player.position(), 3);
        assert_eq!(clock.now_ms(), 120);
    }

    #[test]
    fn test_empty_replay_finishes_immediately() {
        let data = ReplayData::default();
        let mut frames: Vec<Frame> = Vec::new();
        let mut player = ReplayPlayer::new(&data);
        let end = player.play(
            &mut frames,
            &mut ScriptedInput::default(),
            &mut ManualClock::default(),
        );
        assert_eq!(end, PlaybackEnd::Finished);
        assert!(player.is_finished());
        assert!(frames.is_empty());
    }
}
