use crate::catalog::TargetObject;
use crate::leaderboard::{LeaderboardStore, SessionResult};
use crate::util::format_time;
use chrono::prelude::*;
use directories::ProjectDirs;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// One timed play-through: owns the target list, score and clock, decides
/// win/loss and commits the finalized result to the leaderboard.
///
/// States run NotStarted -> Running -> Ended; Ended is terminal for this
/// instance, a new game replaces the whole Hunt via `start`.
pub struct Hunt {
    pub objects: Vec<TargetObject>,
    pub score: u32,
    pub time_left: u32,
    pub duration: u32,
    pub started: bool,
    pub ended: bool,
    pub result: Option<SessionResult>,
    player_name: String,
    store: Box<dyn LeaderboardStore>,
}

impl std::fmt::Debug for Hunt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hunt")
            .field("objects", &self.objects)
            .field("score", &self.score)
            .field("time_left", &self.time_left)
            .field("duration", &self.duration)
            .field("started", &self.started)
            .field("ended", &self.ended)
            .field("result", &self.result)
            .finish()
    }
}

impl Hunt {
    pub fn new(duration: u32, player_name: String, store: Box<dyn LeaderboardStore>) -> Self {
        Self {
            objects: Vec::new(),
            score: 0,
            time_left: duration,
            duration,
            started: false,
            ended: false,
            result: None,
            player_name,
            store,
        }
    }

    /// Begin a fresh session with a newly generated target list. Also serves
    /// as the idempotent screen-enter reset: any previous state is discarded.
    pub fn start(&mut self, objects: Vec<TargetObject>) {
        self.objects = objects;
        self.score = 0;
        self.time_left = self.duration;
        self.started = true;
        self.ended = false;
        self.result = None;
    }

    pub fn is_running(&self) -> bool {
        self.started && !self.ended
    }

    pub fn found_count(&self) -> usize {
        self.objects.iter().filter(|obj| obj.found).count()
    }

    pub fn all_found(&self) -> bool {
        !self.objects.is_empty() && self.objects.iter().all(|obj| obj.found)
    }

    /// Advance the session clock by one second. Hitting zero finalizes the
    /// session as a loss. No-op before start and after the end.
    pub fn on_tick(&mut self) {
        if !self.is_running() {
            return;
        }
        if self.time_left > 0 {
            self.time_left -= 1;
        }
        if self.time_left == 0 {
            self.finalize(false);
        }
    }

    /// Mark one target found and award its points. Unknown ids and targets
    /// already found award nothing. Finding the last target wins and ends
    /// the session immediately.
    pub fn mark_found(&mut self, object_id: u32, points: u32) {
        if !self.is_running() {
            return;
        }
        let Some(obj) = self
            .objects
            .iter_mut()
            .find(|obj| obj.id == object_id && !obj.found)
        else {
            return;
        };
        obj.found = true;
        self.score += points;

        if self.all_found() {
            self.finalize(true);
        }
    }

    /// Re-apply a full object list and score produced by an out-of-process
    /// capture round-trip (the camera hand-off path). The same all-found
    /// check and win finalization applies.
    pub fn apply_update(&mut self, objects: Vec<TargetObject>, score: u32) {
        if !self.is_running() {
            return;
        }
        self.objects = objects;
        self.score = score;

        if self.all_found() {
            self.finalize(true);
        }
    }

    /// Commit the session outcome. Idempotent: only the first call persists
    /// a record and computes the result.
    ///
    /// An uncompleted session is charged its whole allotted time; a completed
    /// one reports the time actually elapsed.
    pub fn finalize(&mut self, won: bool) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.started = false;

        let found = self.found_count();
        let total = self.objects.len();
        let completed = won || found == total;
        let result = SessionResult {
            score: self.score,
            objects_found: if completed { total } else { found },
            total_objects: total,
            time_used: if completed {
                format_time(self.duration - self.time_left)
            } else {
                format_time(self.duration)
            },
            completed,
        };

        self.store.append(&result, &self.player_name);
        let _ = log_result(&result);
        self.result = Some(result);
    }

    pub fn leaderboard(&self) -> Vec<crate::leaderboard::ScoreRecord> {
        self.store.load()
    }

    pub fn clear_leaderboard(&self) {
        self.store.clear();
    }
}

/// Append one CSV line per finished session to the config-dir log.
fn log_result(result: &SessionResult) -> io::Result<()> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "snaphunt") {
        let config_dir = proj_dirs.config_dir();
        let log_path = config_dir.join("log.csv");

        std::fs::create_dir_all(config_dir)?;

        let needs_header = !log_path.exists();

        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(log_path)?;

        if needs_header {
            writeln!(log_file, "date,score,objects_found,time_used,completed")?;
        }

        writeln!(
            log_file,
            "{},{},{},{},{}",
            Local::now().format("%c"),
            result.score,
            result.objects_found,
            result.time_used,
            result.completed,
        )?;
    }

    Ok(())
}
