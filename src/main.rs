//! Grid Snake entry point
//!
//! Runs a headless session driven by scripted input, then plays back the
//! saved replay. Usage: `grid-snake [seed] [save dir]`

use std::path::PathBuf;

use grid_snake::Game;
use grid_snake::persistence::{ReplayLibrary, load_replay};
use grid_snake::platform::{Intent, LogSink, ManualClock, ScriptedInput};
use grid_snake::replay::ReplayPlayer;
use grid_snake::settings::GameConfig;
use grid_snake::sim::Direction;

const CONFIG_FILE: &str = "config.json";
/// Polls before the scripted run quits
const SCRIPT_POLLS: usize = 2_000;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);
    let save_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("grid-snake"));

    let config = GameConfig::load(&save_dir.join(CONFIG_FILE));
    log::info!("Grid Snake (headless) starting, seed {}", seed);

    let mut clock = ManualClock::default();
    let mut game = Game::new(&config, seed, &save_dir, 0);
    let mut input = square_walk(SCRIPT_POLLS);
    let mut sink = LogSink::default();
    let summary = game.run(&mut input, &mut clock, &mut sink);

    println!(
        "score {} (best {}{}), {} ticks, max combo {}",
        summary.score,
        summary.best,
        if summary.new_high_score { ", new!" } else { "" },
        summary.ticks,
        summary.max_combo
    );
    for id in &summary.unlocked {
        println!("achievement unlocked: {}", id);
    }

    let library = match ReplayLibrary::scan(&save_dir.join(grid_snake::game::REPLAY_DIR)) {
        Ok(library) => library,
        Err(e) => {
            log::warn!("Could not list replays: {}", e);
            return;
        }
    };
    println!("{} saved replays", library.len());

    let Some(path) = summary.replay_path.as_deref() else {
        return;
    };
    match load_replay(path) {
        Ok(replay) => {
            let mut player = ReplayPlayer::new(&replay)
                .with_portals(game.session().portals.positions().to_vec());
            let mut playback_sink = LogSink::default();
            let end = player.play(&mut playback_sink, &mut ScriptedInput::default(), &mut clock);
            println!(
                "replayed {} snapshots from {} ({:?})",
                playback_sink.frames,
                path.display(),
                end
            );
        }
        Err(e) => log::warn!("Could not load replay {}: {}", path.display(), e),
    }
}

/// Steer around a square, then quit
fn square_walk(polls: usize) -> ScriptedInput {
    let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
    let script = (0..polls).map(|i| {
        if i + 1 == polls {
            Some(Intent::Quit)
        } else if i % 40 == 0 {
            let leg = i / 40;
            Some(Intent::Move(turns[leg % turns.len()]))
        } else {
            None
        }
    });
    ScriptedInput::new(script)
}
