//! Achievement unlock records
//!
//! Stored as a JSON array of `{ "id", "unlocked", "unlockDate"? }` objects.
//! Ids missing from the file stay locked; unknown ids are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PersistError;
use crate::sim::AchievementSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    pub id: String,
    pub unlocked: bool,
    /// Unix timestamp (s), present only when unlocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_date: Option<u64>,
}

pub fn to_records(set: &AchievementSet) -> Vec<AchievementRecord> {
    set.iter()
        .map(|a| AchievementRecord {
            id: a.id.to_string(),
            unlocked: a.is_unlocked(),
            unlock_date: if a.is_unlocked() { a.unlock_date() } else { None },
        })
        .collect()
}

/// Apply parsed records. Only locked -> unlocked transitions happen.
///
/// Returns the number of achievements that changed.
pub fn apply_records(set: &mut AchievementSet, records: &[AchievementRecord]) -> usize {
    let mut changed = 0;
    for record in records.iter().filter(|r| r.unlocked) {
        match set.get_mut(&record.id) {
            Some(achievement) => {
                if achievement.unlock(record.unlock_date.unwrap_or(0)) {
                    changed += 1;
                }
            }
            None => log::debug!("Ignoring unknown achievement id {:?}", record.id),
        }
    }
    changed
}

pub fn save_achievements(path: &Path, set: &AchievementSet) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(&to_records(set))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    log::info!("Achievements saved ({} unlocked)", set.unlocked_count());
    Ok(())
}

/// Merge the file at `path` into `set`.
///
/// A missing file is first-run state and leaves `set` untouched. A malformed
/// file is an error and also leaves `set` untouched.
pub fn load_achievements(path: &Path, set: &mut AchievementSet) -> Result<usize, PersistError> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No achievements file, starting fresh");
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };
    let records: Vec<AchievementRecord> = serde_json::from_str(&json)?;
    let changed = apply_records(set, &records);
    log::info!("Loaded {} unlocked achievements", changed);
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::AchievementContext;

    #[test]
    fn test_record_shape() {
        let mut set = AchievementSet::builtin();
        set.evaluate(
            &AchievementContext {
                score: 10,
                ..Default::default()
            },
            1_700_000_000,
        );
        let json = serde_json::to_value(to_records(&set)).unwrap();
        assert_eq!(
            json[0],
            serde_json::json!({"id": "first_game", "unlocked": true, "unlockDate": 1_700_000_000u64})
        );
        assert_eq!(
            json[1],
            serde_json::json!({"id": "speed_demon", "unlocked": false})
        );
    }

    #[test]
    fn test_apply_ignores_unknown_and_absent() {
        let mut set = AchievementSet::builtin();
        let records: Vec<AchievementRecord> = serde_json::from_str(
            r#"[
                {"id": "combo_master", "unlocked": true, "unlockDate": 42},
                {"id": "from_the_future", "unlocked": true, "unlockDate": 7},
                {"id": "snake_king", "unlocked": false}
            ]"#,
        )
        .unwrap();
        assert_eq!(apply_records(&mut set, &records), 1);
        assert!(set.is_unlocked("combo_master"));
        assert_eq!(set.get("combo_master").unwrap().unlock_date(), Some(42));
        assert!(!set.is_unlocked("snake_king"));
        assert!(!set.is_unlocked("score_hunter"));
    }

    #[test]
    fn test_file_roundtrip_missing_and_malformed() {
        let dir = std::env::temp_dir().join(format!("grid_snake_ach_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("achievements.json");

        let mut fresh = AchievementSet::builtin();
        assert_eq!(load_achievements(&path, &mut fresh).unwrap(), 0);

        let mut set = AchievementSet::builtin();
        set.evaluate(
            &AchievementContext {
                length: 25,
                ..Default::default()
            },
            99,
        );
        save_achievements(&path, &set).unwrap();

        let mut loaded = AchievementSet::builtin();
        assert_eq!(load_achievements(&path, &mut loaded).unwrap(), 1);
        assert_eq!(loaded.get("snake_king").unwrap().unlock_date(), Some(99));

        std::fs::write(&path, "[{\"id\": \"snake_king\", \"unlocked\": tru").unwrap();
        let mut untouched = AchievementSet::builtin();
        let err = load_achievements(&path, &mut untouched).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(untouched.unlocked_count(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }
}
