// End-to-end persistence: sessions finalized by Hunt land in the JSON file
// behind FileLeaderboardStore and survive a reload through a fresh store.

use snaphunt::catalog::Catalog;
use snaphunt::hunt::Hunt;
use snaphunt::leaderboard::{FileLeaderboardStore, LeaderboardStore};

fn play_session(path: &std::path::Path, points: u32, win: bool) {
    let catalog = Catalog::new("catalog".to_string());
    let mut hunt = Hunt::new(
        30,
        "Jugador".to_string(),
        Box::new(FileLeaderboardStore::with_path(path)),
    );
    hunt.start(catalog.generate_targets(2));

    if win {
        hunt.mark_found(1, points);
        hunt.mark_found(2, points);
    } else {
        hunt.mark_found(1, points);
        for _ in 0..30 {
            hunt.on_tick();
        }
    }
    assert!(hunt.ended);
}

#[test]
fn finalized_sessions_accumulate_in_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");

    play_session(&path, 70, true);
    play_session(&path, 90, false);
    play_session(&path, 55, true);

    let store = FileLeaderboardStore::with_path(&path);
    let records = store.load();
    assert_eq!(records.len(), 3);

    // Completed sessions outrank incomplete ones regardless of score.
    assert!(records[0].completed);
    assert_eq!(records[0].score, 140);
    assert!(records[1].completed);
    assert_eq!(records[1].score, 110);
    assert!(!records[2].completed);
    assert_eq!(records[2].score, 90);
}

#[test]
fn clear_empties_the_persisted_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");

    play_session(&path, 80, true);
    let store = FileLeaderboardStore::with_path(&path);
    assert_eq!(store.load().len(), 1);

    store.clear();
    assert!(store.load().is_empty());

    // A fresh store sees the cleared state too.
    assert!(FileLeaderboardStore::with_path(&path).load().is_empty());
}
