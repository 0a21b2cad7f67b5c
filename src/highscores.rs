//! Best score record
//!
//! Persisted as a single plain-text integer. A missing or unreadable file
//! counts as a best of zero.

use std::path::PathBuf;

use crate::persistence::PersistError;

/// Default file name for the record
pub const HIGH_SCORE_FILE: &str = "highscore.txt";

#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u64,
}

impl HighScore {
    /// Load the record at `path`, falling back to zero
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match std::fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {}", best);
                    best
                }
                Err(_) => {
                    log::warn!("Malformed high score file {}, using 0", path.display());
                    0
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Failed to read high score: {}", e);
                0
            }
        };
        Self { path, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record `score` if it beats the current best.
    ///
    /// Returns true when it did. A failed save is logged; the in-memory best
    /// still updates.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        log::info!("New high score {}", score);
        if let Err(e) = self.save() {
            log::warn!("Failed to save high score: {}", e);
        }
        true
    }

    /// Write through a temporary file, then rename over the record
    pub fn save(&self) -> Result<(), PersistError> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, format!("{}\n", self.best))?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("grid_snake_hs_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(HIGH_SCORE_FILE)
    }

    #[test]
    fn test_missing_file_is_zero() {
        let path = scratch("missing");
        std::fs::remove_file(&path).ok();
        assert_eq!(HighScore::load(&path).best(), 0);
    }

    #[test]
    fn test_malformed_file_is_zero() {
        let path = scratch("malformed");
        std::fs::write(&path, "lots").unwrap();
        assert_eq!(HighScore::load(&path).best(), 0);
    }

    #[test]
    fn test_submit_only_strictly_greater() {
        let path = scratch("submit");
        std::fs::write(&path, "120\n").unwrap();
        let mut hs = HighScore::load(&path);
        assert_eq!(hs.best(), 120);

        assert!(!hs.submit(120));
        assert!(!hs.submit(40));
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "120");

        assert!(hs.submit(130));
        assert_eq!(HighScore::load(&path).best(), 130);
        assert!(!path.with_extension("tmp").exists());
    }
}
