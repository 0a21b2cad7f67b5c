//! Save/load of replays and achievements
//!
//! Features:
//! - Versioned plain-text replay files
//! - JSON achievement records keyed by id
//! - Loaders build a fresh value and hand it back only on success, so a
//!   failed load never touches in-memory state

pub mod achievements;
pub mod replay_file;

pub use achievements::{AchievementRecord, load_achievements, save_achievements};
pub use replay_file::{ReplayLibrary, load_replay, read_replay, save_replay, write_replay};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported replay version tag: {found:?}")]
    BadVersionTag { found: String },
    #[error("replay truncated while reading {field}")]
    Truncated { field: &'static str },
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistError {
    /// True for a malformed save file (as opposed to an I/O failure)
    pub fn is_malformed(&self) -> bool {
        !matches!(self, PersistError::Io(_))
    }
}
