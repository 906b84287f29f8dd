#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tempfile::TempDir;

/// A scratch directory holding a `Cookies` database; removed on drop.
pub struct CookieFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl CookieFixture {
    /// Create `Cookies` with a Chrome-like `cookies` table holding `rows` hosts.
    pub fn with_hosts(rows: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let fixture = Self::empty()?;
        let conn = Connection::open(&fixture.path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE cookies (
                creation_utc INTEGER NOT NULL,
                host_key TEXT NOT NULL,
                name TEXT NOT NULL,
                value TEXT NOT NULL
            );
            "#,
        )?;
        for i in 0..rows {
            conn.execute(
                "INSERT INTO cookies (creation_utc, host_key, name, value) VALUES (?1, ?2, ?3, ?4)",
                params![i as i64, host(i), format!("cookie{i}"), "v"],
            )?;
        }
        conn.close().map_err(|(_, e)| e)?;
        Ok(fixture)
    }

    /// A directory with a path for `Cookies` but no file yet.
    pub fn empty() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("Cookies");
        Ok(Self { dir, path })
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), Box<dyn std::error::Error>> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn dir_path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn host(i: usize) -> String {
    format!("host{i}.example.com")
}

/// True if a writer can take an exclusive lock on `path` right now.
pub fn exclusive_lock_available(path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(std::time::Duration::ZERO)?;
    match conn.execute_batch("BEGIN EXCLUSIVE; COMMIT;") {
        Ok(()) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::DatabaseBusy =>
        {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
