//! Plain-text replay files
//!
//! Layout, one value per line unless noted:
//!
//! ```text
//! SNAKE_REPLAY_v1
//! <player name>
//! <start date, unix seconds>
//! <final score>
//! <max combo>
//! <duration ms>
//! <move count>
//! <move code>            (x move count, 0=up 1=down 2=left 3=right 4=none)
//! <snapshot count>
//! <body length>          \
//! <x> <y>                 | x body length
//! <food x> <food y>       | per snapshot
//! <score>                 |
//! <combo>                 |
//! <timestamp ms>         /
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::PersistError;
use crate::replay::{REPLAY_FILE_EXTENSION, REPLAY_VERSION_TAG, ReplayData, Snapshot};
use crate::sim::{Direction, Point};

/// Upper bound on preallocation from counts read off disk
const MAX_PREALLOC: usize = 4096;

pub fn write_replay<W: Write>(mut out: W, replay: &ReplayData) -> Result<(), PersistError> {
    writeln!(out, "{}", REPLAY_VERSION_TAG)?;
    writeln!(out, "{}", replay.player_name)?;
    writeln!(out, "{}", replay.start_date)?;
    writeln!(out, "{}", replay.final_score)?;
    writeln!(out, "{}", replay.max_combo)?;
    writeln!(out, "{}", replay.duration_ms)?;

    writeln!(out, "{}", replay.moves.len())?;
    for direction in &replay.moves {
        writeln!(out, "{}", direction.code())?;
    }

    writeln!(out, "{}", replay.snapshots.len())?;
    for snapshot in &replay.snapshots {
        writeln!(out, "{}", snapshot.body.len())?;
        for point in &snapshot.body {
            writeln!(out, "{} {}", point.x, point.y)?;
        }
        writeln!(out, "{} {}", snapshot.food.x, snapshot.food.y)?;
        writeln!(out, "{}", snapshot.score)?;
        writeln!(out, "{}", snapshot.combo)?;
        writeln!(out, "{}", snapshot.timestamp_ms)?;
    }
    out.flush()?;
    Ok(())
}

/// Write through a temporary file, then rename over `path`
pub fn save_replay(path: &Path, replay: &ReplayData) -> Result<(), PersistError> {
    let tmp = path.with_extension("tmp");
    {
        let file = File::create(&tmp)?;
        write_replay(BufWriter::new(file), replay)?;
    }
    std::fs::rename(&tmp, path)?;
    log::info!("Replay saved to {}", path.display());
    Ok(())
}

/// Whitespace token reader for everything after the header lines
struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next<T: FromStr>(&mut self, field: &'static str) -> Result<T, PersistError> {
        let token = self.inner.next().ok_or(PersistError::Truncated { field })?;
        token.parse().map_err(|_| PersistError::InvalidField {
            field,
            value: token.to_string(),
        })
    }

    fn point(&mut self, field: &'static str) -> Result<Point, PersistError> {
        let x = self.next(field)?;
        let y = self.next(field)?;
        Ok(Point::new(x, y))
    }
}

fn read_line<R: BufRead>(input: &mut R, field: &'static str) -> Result<String, PersistError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PersistError::Truncated { field });
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse a complete replay. Nothing is returned unless every field parsed.
pub fn read_replay<R: BufRead>(mut input: R) -> Result<ReplayData, PersistError> {
    let tag = read_line(&mut input, "version tag")?;
    if tag != REPLAY_VERSION_TAG {
        return Err(PersistError::BadVersionTag { found: tag });
    }
    let player_name = read_line(&mut input, "player name")?;

    let mut rest = String::new();
    input.read_to_string(&mut rest)?;
    let mut tokens = Tokens {
        inner: rest.split_whitespace(),
    };

    let start_date = tokens.next("start date")?;
    let final_score = tokens.next("final score")?;
    let max_combo = tokens.next("max combo")?;
    let duration_ms = tokens.next("duration")?;

    let move_count: usize = tokens.next("move count")?;
    let mut moves = Vec::with_capacity(move_count.min(MAX_PREALLOC));
    for _ in 0..move_count {
        let code: u8 = tokens.next("move")?;
        let direction = Direction::from_code(code).ok_or(PersistError::InvalidField {
            field: "move",
            value: code.to_string(),
        })?;
        moves.push(direction);
    }

    let snapshot_count: usize = tokens.next("snapshot count")?;
    let mut snapshots = Vec::with_capacity(snapshot_count.min(MAX_PREALLOC));
    for _ in 0..snapshot_count {
        let body_len: usize = tokens.next("body length")?;
        if body_len == 0 {
            return Err(PersistError::InvalidField {
                field: "body length",
                value: "0".to_string(),
            });
        }
        let mut body = Vec::with_capacity(body_len.min(MAX_PREALLOC));
        for _ in 0..body_len {
            body.push(tokens.point("body point")?);
        }
        snapshots.push(Snapshot {
            body,
            food: tokens.point("food")?,
            score: tokens.next("score")?,
            combo: tokens.next("combo")?,
            timestamp_ms: tokens.next("timestamp")?,
        });
    }

    Ok(ReplayData {
        player_name,
        start_date,
        moves,
        snapshots,
        final_score,
        max_combo,
        duration_ms,
    })
}

pub fn load_replay(path: &Path) -> Result<ReplayData, PersistError> {
    let file = File::open(path)?;
    let replay = read_replay(BufReader::new(file))?;
    log::info!(
        "Loaded replay {} ({} snapshots)",
        path.display(),
        replay.snapshots.len()
    );
    Ok(replay)
}

/// Replay files available in a directory, sorted by file name
#[derive(Debug, Clone, Default)]
pub struct ReplayLibrary {
    entries: Vec<PathBuf>,
}

impl ReplayLibrary {
    /// List `*.replay` files in `dir`. A missing directory is an empty library.
    pub fn scan(dir: &Path) -> Result<Self, PersistError> {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(REPLAY_FILE_EXTENSION)
            {
                entries.push(path);
            }
        }
        entries.sort();
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Selected replay, `None` when the index is out of range or the library is empty
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.entries.get(index).map(PathBuf::as_path)
    }

    /// File name for a new replay: `<player>_<unix date>.replay`
    pub fn file_name(player_name: &str, start_date: u64) -> String {
        format!("{}.{}", Self::stem(player_name, start_date), REPLAY_FILE_EXTENSION)
    }

    /// Path in `dir` for a new replay that does not replace an existing one.
    ///
    /// Clashing names get a `_1`, `_2`, ... suffix.
    pub fn new_path(dir: &Path, player_name: &str, start_date: u64) -> PathBuf {
        let stem = Self::stem(player_name, start_date);
        let mut path = dir.join(Self::file_name(player_name, start_date));
        let mut n = 1;
        while path.exists() {
            path = dir.join(format!("{}_{}.{}", stem, n, REPLAY_FILE_EXTENSION));
            n += 1;
        }
        path
    }

    fn stem(player_name: &str, start_date: u64) -> String {
        let player: String = player_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_{}", player, start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::ReplayRecorder;
    use crate::settings::GameConfig;
    use crate::sim::{GameSession, TickInput, tick};
    use std::io::Cursor;

    fn sample() -> ReplayData {
        ReplayData {
            player_name: "ana maria".into(),
            start_date: 1_700_000_000,
            moves: vec![Direction::Right, Direction::None, Direction::Up],
            snapshots: vec![
                Snapshot {
                    body: vec![Point::new(11, 10), Point::new(10, 10), Point::new(9, 10)],
                    food: Point::new(3, 4),
                    score: 0,
                    combo: 0,
                    timestamp_ms: 100,
                },
                Snapshot {
                    body: vec![Point::new(11, 9), Point::new(11, 10), Point::new(10, 10)],
                    food: Point::new(3, 4),
                    score: 10,
                    combo: 1,
                    timestamp_ms: 200,
                },
            ],
            final_score: 10,
            max_combo: 1,
            duration_ms: 250,
        }
    }

    fn encode(replay: &ReplayData) -> String {
        let mut buf = Vec::new();
        write_replay(&mut buf, replay).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let text = encode(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[..7],
            &["SNAKE_REPLAY_v1", "ana maria", "1700000000", "10", "1", "250", "3"]
        );
        // Moves right/none/up, then the snapshot count and first body length
        assert_eq!(&lines[7..12], &["3", "4", "0", "2", "3"]);
        assert_eq!(lines[12], "11 10");
    }

    #[test]
    fn test_recorded_session_survives_save_and_load() {
        let config = GameConfig::default();
        let mut session = GameSession::new(&config, 4242, 0);
        let mut recorder = ReplayRecorder::new();
        recorder.start(&config.player_name, 1_700_000_000, 0);

        let script = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for i in 0..120u64 {
            let dir = script[(i / 7) as usize % script.len()];
            let now = i * 100;
            tick(&mut session, &TickInput::steer(dir), now);
            recorder.record_move(dir);
            recorder.record_snapshot(&session, now);
            if session.is_over() {
                break;
            }
        }
        recorder.stop(session.now_ms);
        let original = recorder.into_replay();

        let loaded = read_replay(Cursor::new(encode(&original))).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_bad_tag_rejected() {
        let text = encode(&sample()).replacen("SNAKE_REPLAY_v1", "SNAKE_REPLAY_v2", 1);
        match read_replay(Cursor::new(text)) {
            Err(PersistError::BadVersionTag { found }) => assert_eq!(found, "SNAKE_REPLAY_v2"),
            other => panic!("expected bad tag, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_rejected() {
        let text = encode(&sample());
        for cut in [0, 10, text.len() / 2, text.len() - 5] {
            let err = read_replay(Cursor::new(&text[..cut])).unwrap_err();
            assert!(err.is_malformed(), "cut {}: {:?}", cut, err);
        }
    }

    #[test]
    fn test_invalid_move_code_rejected() {
        let text = encode(&sample()).replacen("\n4\n", "\n9\n", 1);
        assert!(matches!(
            read_replay(Cursor::new(text)),
            Err(PersistError::InvalidField { field: "move", .. })
        ));
    }

    #[test]
    fn test_crlf_header_accepted() {
        let text = encode(&sample()).replace('\n', "\r\n");
        assert_eq!(read_replay(Cursor::new(text)).unwrap(), sample());
    }

    #[test]
    fn test_file_roundtrip_and_library() {
        let dir = std::env::temp_dir().join(format!("grid_snake_replays_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let empty = ReplayLibrary::scan(&dir.join("nope")).unwrap();
        assert!(empty.is_empty());
        assert!(empty.get(0).is_none());

        let replay = sample();
        let b = dir.join(ReplayLibrary::file_name("ana maria", 2));
        let a = dir.join(ReplayLibrary::file_name("ana maria", 1));
        save_replay(&b, &replay).unwrap();
        save_replay(&a, &replay).unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();

        let library = ReplayLibrary::scan(&dir).unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.get(0), Some(a.as_path()));
        assert!(library.get(2).is_none());
        assert_eq!(load_replay(&b).unwrap(), replay);

        let next = ReplayLibrary::new_path(&dir, "ana maria", 1);
        assert_eq!(next, dir.join("ana_maria_1_1.replay"));
        save_replay(&next, &replay).unwrap();
        assert_eq!(
            ReplayLibrary::new_path(&dir, "ana maria", 1),
            dir.join("ana_maria_1_2.replay")
        );
        assert_eq!(ReplayLibrary::scan(&dir).unwrap().len(), 3);

        assert!(matches!(
            load_replay(&dir.join("missing.replay")),
            Err(PersistError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
