//! Common test utilities for database-backed integration tests
//!
//! `TestDatabase` creates a fresh SQLite database in a temporary
//! directory and runs the embedded migrations on it, so every test gets
//! a fully isolated, fully migrated store. The directory (and with it
//! the database) is removed when the helper is dropped.

use anyhow::Result;
use tempfile::TempDir;

use trawl::db::{DbPool, create_pool, run_migrations};

pub struct TestDatabase {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDatabase {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("trawl-test.db");
        let pool = create_pool(
            path.to_str()
                .expect("temp paths are valid UTF-8 on test hosts"),
        )?;
        run_migrations(&pool)?;
        Ok(Self { _dir: dir, pool })
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
