use chrono::Local;
use directories::ProjectDirs;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Leaderboard keeps the best ten sessions.
pub const MAX_RECORDS: usize = 10;

/// Immutable summary of one finished session, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: i64,
    pub player_name: String,
    pub score: u32,
    pub objects_found: usize,
    // records written before this field existed read back as 0
    #[serde(default)]
    pub total_objects: usize,
    pub time_used: String,
    pub completed: bool,
    pub date: String,
}

/// Outcome of a finished session, before the store assigns identity.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub score: u32,
    pub objects_found: usize,
    pub total_objects: usize,
    pub time_used: String,
    pub completed: bool,
}

pub trait LeaderboardStore {
    fn load(&self) -> Vec<ScoreRecord>;
    fn append(&self, result: &SessionResult, player_name: &str);
    fn clear(&self);
}

/// Completed sessions always rank above incomplete ones, then by score.
fn rank(records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    records
        .into_iter()
        .sorted_by(|a, b| b.completed.cmp(&a.completed).then(b.score.cmp(&a.score)))
        .take(MAX_RECORDS)
        .collect()
}

/// JSON-file backed store. Every operation is fail-soft: a read, parse or
/// write failure degrades to an empty leaderboard or a dropped write and is
/// never surfaced to gameplay.
#[derive(Debug, Clone)]
pub struct FileLeaderboardStore {
    path: PathBuf,
}

impl FileLeaderboardStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "snaphunt") {
            pd.config_dir().join("leaderboard.json")
        } else {
            PathBuf::from("snaphunt_leaderboard.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    fn write(&self, records: &[ScoreRecord]) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_vec_pretty(records) {
            let _ = fs::write(&self.path, data);
        }
    }
}

impl Default for FileLeaderboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardStore for FileLeaderboardStore {
    fn load(&self) -> Vec<ScoreRecord> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(records) = serde_json::from_slice::<Vec<ScoreRecord>>(&bytes) {
                return records;
            }
        }
        Vec::new()
    }

    fn append(&self, result: &SessionResult, player_name: &str) {
        let mut records = self.load();
        records.push(ScoreRecord {
            id: Local::now().timestamp_millis(),
            player_name: player_name.to_string(),
            score: result.score,
            objects_found: result.objects_found,
            total_objects: result.total_objects,
            time_used: result.time_used.clone(),
            completed: result.completed,
            date: Local::now().format("%d/%m/%Y").to_string(),
        });
        self.write(&rank(records));
    }

    fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryLeaderboardStore {
    records: std::cell::RefCell<Vec<ScoreRecord>>,
}

impl MemoryLeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardStore for MemoryLeaderboardStore {
    fn load(&self) -> Vec<ScoreRecord> {
        self.records.borrow().clone()
    }

    fn append(&self, result: &SessionResult, player_name: &str) {
        let mut records = self.records.borrow().clone();
        records.push(ScoreRecord {
            id: Local::now().timestamp_millis(),
            player_name: player_name.to_string(),
            score: result.score,
            objects_found: result.objects_found,
            total_objects: result.total_objects,
            time_used: result.time_used.clone(),
            completed: result.completed,
            date: Local::now().format("%d/%m/%Y").to_string(),
        });
        *self.records.borrow_mut() = rank(records);
    }

    fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}
