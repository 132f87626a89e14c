use chrono::{Duration, Local, NaiveDateTime};
use keydrill::analysis::{self, WINDOW_SIZE};
use keydrill::store::{PlayerStore, TrialRecord};
use tempfile::tempdir;

// Library-level flow: persist two rounds to disk, load them back, and
// aggregate the full history.

const TARGET: &str = "one two three";

fn record(index: usize, typed: &str, recorded_at: NaiveDateTime) -> TrialRecord {
    TrialRecord {
        index,
        target: TARGET.to_string(),
        typed: typed.to_string(),
        elapsed_secs: 2.0,
        recorded_at,
    }
}

fn write_round(
    store: &PlayerStore,
    name: &str,
    missed_indices: &[usize],
    recorded_at: NaiveDateTime,
) {
    let mut log = store.append_log(name).unwrap();
    for idx in 0..WINDOW_SIZE {
        let typed = if missed_indices.contains(&idx) {
            "one two thre"
        } else {
            TARGET
        };
        log.append(&record(idx, typed, recorded_at)).unwrap();
    }
    log.close().unwrap();
}

#[test]
fn two_rounds_on_disk_become_two_windows() {
    let dir = tempdir().unwrap();
    let store = PlayerStore::new(dir.path());
    store.create("alice").unwrap();

    let day_one = Local::now().naive_local() - Duration::days(2);
    let day_two = day_one + Duration::days(1);

    write_round(&store, "alice", &[2, 3, 4, 5], day_one);
    write_round(&store, "alice", &[7], day_two);

    let records = store.load("alice").unwrap();
    assert_eq!(records.len(), 2 * WINDOW_SIZE);

    let report = analysis::aggregate(&records).unwrap();
    assert_eq!(report.windows.len(), 2);

    let (first, second) = (&report.windows[0], &report.windows[1]);

    assert!((first.miss_ratio - 0.4).abs() < 1e-9);
    assert!((second.miss_ratio - 0.1).abs() < 1e-9);

    // 6 exact matches of 13 chars in 12s, then 9 in 18s
    assert!((first.chars_per_sec - 78.0 / 12.0).abs() < 1e-9);
    assert!((second.chars_per_sec - 117.0 / 18.0).abs() < 1e-9);

    // words skip index 0: 5 * 3 words in 12s, then 8 * 3 in 18s
    assert!((first.words_per_min - 15.0 / 12.0 * 60.0).abs() < 1e-9);
    assert!((second.words_per_min - 24.0 / 18.0 * 60.0).abs() < 1e-9);

    // every miss typed the same near-hit: ratio 2*12/25
    assert!((first.accuracy - 0.96).abs() < 1e-6);
    assert!((second.accuracy - 0.96).abs() < 1e-6);

    // the second window lands one day later
    assert!((second.day - first.day - 1.0).abs() < 1e-6);
}

#[test]
fn perfect_history_reports_clean_windows() {
    let dir = tempdir().unwrap();
    let store = PlayerStore::new(dir.path());
    store.create("bob").unwrap();

    write_round(&store, "bob", &[], Local::now().naive_local());

    let records = store.load("bob").unwrap();
    let report = analysis::aggregate(&records).unwrap();

    assert_eq!(report.windows.len(), 1);
    assert_eq!(report.windows[0].miss_ratio, 0.0);
    assert_eq!(report.windows[0].accuracy, 1.0);
    assert!(report.windows[0].chars_per_sec > 0.0);
}

#[test]
fn unplayed_player_aggregates_to_nothing() {
    let dir = tempdir().unwrap();
    let store = PlayerStore::new(dir.path());
    store.create("carol").unwrap();

    let records = store.load("carol").unwrap();
    assert!(records.is_empty());
    assert_eq!(analysis::aggregate(&records), None);
}
