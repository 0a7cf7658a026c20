//! Integration tests for the `tweetrace-store` crate.
//!
//! The history-file tests run against temporary files. The cache tests
//! require a live Redis instance and are marked `#[ignore]`:
//!
//! ```bash
//! docker run -d -p 6379:6379 redis:7
//! cargo test -p tweetrace-store -- --ignored
//! ```

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;
use tweetrace_store::{CacheConfig, HistoryFile, StatsCache, StoreError};
use tweetrace_types::{CacheStats, StatsSnapshot};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).expect("valid date")
}

fn history_with(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("stats.json");
    std::fs::write(&path, contents).expect("seed history file");
    (dir, path)
}

// =============================================================================
// History file
// =============================================================================

#[test]
fn append_to_empty_history() {
    let (_dir, path) = history_with(r#"{"stats": []}"#);
    let history = HistoryFile::new(&path);

    let snapshot = StatsSnapshot::new(
        date(19),
        CacheStats {
            games_created: 5,
            accounts_created: 0,
        },
    );
    history.append(snapshot).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "{\n    \"stats\": [\n        {\n            \"date\": \"2026-10-19\",\n            \"gamesCreated\": 5,\n            \"accountsCreated\": 0\n        }\n    ]\n}"
    );
}

#[test]
fn append_preserves_prior_entries_in_order() {
    let (_dir, path) = history_with(
        r#"{"stats": [
            {"date": "2026-10-17", "gamesCreated": 10, "accountsCreated": 4},
            {"date": "2026-10-18", "gamesCreated": 12, "accountsCreated": 6}
        ]}"#,
    );
    let history = HistoryFile::new(&path);
    let before = history.load().unwrap();

    history
        .append(StatsSnapshot::new(
            date(19),
            CacheStats {
                games_created: 15,
                accounts_created: 7,
            },
        ))
        .unwrap();

    let after = history.load().unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after.stats[..before.len()], &before.stats[..]);
    assert_eq!(after.stats[2]["date"], "2026-10-19");
    assert_eq!(after.stats[2]["gamesCreated"], 15);
    assert_eq!(after.stats[2]["accountsCreated"], 7);
}

#[test]
fn append_keeps_unknown_fields_on_earlier_entries() {
    let (_dir, path) = history_with(
        r#"{"stats":[{"date":"2026-10-18","gamesCreated":3,"accountsCreated":1,"activePlayers":9}]}"#,
    );
    let history = HistoryFile::new(&path);

    history
        .append(StatsSnapshot::new(date(19), CacheStats::default()))
        .unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"activePlayers\": 9"), "{written}");

    let after = history.load().unwrap();
    assert_eq!(
        after.stats[0],
        serde_json::json!({
            "date": "2026-10-18",
            "gamesCreated": 3,
            "accountsCreated": 1,
            "activePlayers": 9
        })
    );
    assert_eq!(after.stats[1]["date"], "2026-10-19");
}

#[test]
fn repeated_runs_grow_by_one_each() {
    let (_dir, path) = history_with(r#"{"stats": []}"#);
    let history = HistoryFile::new(&path);

    for day in 1..=3 {
        let written = history
            .append(StatsSnapshot::new(date(day), CacheStats::default()))
            .unwrap();
        assert_eq!(written.len(), usize::try_from(day).unwrap());
    }
}

#[test]
fn rewrite_leaves_no_trailing_bytes() {
    // Compact input padded with whitespace is longer than some rewrites;
    // the file must still parse afterwards.
    let padding = " ".repeat(4096);
    let (_dir, path) = history_with(&format!(r#"{{"stats": []}}{padding}"#));
    let history = HistoryFile::new(&path);

    history
        .append(StatsSnapshot::new(date(19), CacheStats::default()))
        .unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.ends_with('}'));
    assert_eq!(history.load().unwrap().len(), 1);
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let history = HistoryFile::new(dir.path().join("stats.json"));

    let result = history.append(StatsSnapshot::new(date(19), CacheStats::default()));
    assert!(matches!(result, Err(StoreError::Io { .. })));
    assert!(!history.path().exists());
}

#[test]
fn empty_or_malformed_file_is_fatal_and_untouched() {
    for contents in ["", "not json", r#"{"other": []}"#, r#"{"stats": {}}"#] {
        let (_dir, path) = history_with(contents);
        let history = HistoryFile::new(&path);

        let result = history.append(StatsSnapshot::new(date(19), CacheStats::default()));
        assert!(
            matches!(result, Err(StoreError::MalformedHistory { .. })),
            "expected malformed history for {contents:?}"
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }
}

// =============================================================================
// Stats cache
// =============================================================================

fn local_cache() -> CacheConfig {
    CacheConfig {
        host: "localhost".to_owned(),
        port: 6379,
        password: None,
        database: 15,
    }
}

#[tokio::test]
#[ignore = "requires live Redis instance (docker run -p 6379:6379 redis:7)"]
async fn cache_round_trips_stats() {
    let cache = StatsCache::connect(&local_cache())
        .await
        .expect("Failed to connect to Redis");

    let stats = CacheStats {
        games_created: 21,
        accounts_created: 8,
    };
    cache.set_stats(&stats).await.expect("set stats");
    assert_eq!(cache.get_stats().await.expect("get stats"), stats);

    cache.delete_stats().await.expect("delete stats");
    assert_eq!(
        cache.get_stats().await.expect("get missing stats"),
        CacheStats::default()
    );

    cache.quit().await.expect("quit");
}
