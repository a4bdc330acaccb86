//! Helpers for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDateTime};
use codeflix_catalog::db::{DbPool, establish_connection_pool, run_pending_migrations};
use codeflix_catalog::domain::category::{Category, NewCategory};
use codeflix_catalog::domain::clock::FixedClock;
use tempfile::NamedTempFile;

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap(), 4)
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        run_pending_migrations(&mut conn).expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn epoch() -> NaiveDateTime {
    DateTime::from_timestamp(1_700_000_000, 0)
        .expect("valid timestamp")
        .naive_utc()
}

/// Active category created `offset_secs` after [`epoch`].
pub fn category_at(name: &str, offset_secs: i64) -> Category {
    Category::new(
        NewCategory::new(name, format!("{name} description")),
        &FixedClock(epoch() + Duration::seconds(offset_secs)),
    )
    .expect("valid category")
}

/// Categories named `Category 0..count`, one second apart.
pub fn numbered_categories(count: usize) -> Vec<Category> {
    (0..count)
        .map(|i| category_at(&format!("Category {i:02}"), i as i64))
        .collect()
}

/// Category names used by the text-search scenarios.
pub const SEARCH_FIXTURE: [&str; 9] = [
    "Action",
    "Horror - Robots",
    "Horror - Based on Real Facts",
    "Drama",
    "Sci-fi IA",
    "Sci-fi Space",
    "Sci-fi Robots",
    "Sci-fi Future",
    "Horror",
];

pub fn search_fixture() -> Vec<Category> {
    SEARCH_FIXTURE
        .iter()
        .enumerate()
        .map(|(i, name)| category_at(name, i as i64))
        .collect()
}
