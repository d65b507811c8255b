#![allow(dead_code)]

use capital_quiz::{
    config::AppConfig,
    models::country::Catalog,
    state::AppState,
    storage::{MemoryStore, SqliteStore},
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU32, Ordering},
};

pub fn test_app(seed: u64) -> AppState<MemoryStore, StdRng> {
    AppState::new(
        MemoryStore::new(),
        AppConfig::default(),
        Catalog::fallback(),
        StdRng::seed_from_u64(seed),
    )
}

static NEXT_DB: AtomicU32 = AtomicU32::new(0);

/// A database file unique to this test process and call, with any leftover copy removed.
pub fn temp_db_path() -> PathBuf {
    let name = format!(
        "quiz-{}-{}.sqlite",
        std::process::id(),
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );
    let path = std::env::temp_dir().join(name);
    if path.exists() {
        std::fs::remove_file(&path).expect("stale test database should be removable");
    }
    path
}

pub fn sqlite_app(path: &PathBuf, seed: u64) -> AppState<SqliteStore, StdRng> {
    let store = SqliteStore::open(path).expect("failed to open test database");
    AppState::new(
        store,
        AppConfig::default(),
        Catalog::fallback(),
        StdRng::seed_from_u64(seed),
    )
}
