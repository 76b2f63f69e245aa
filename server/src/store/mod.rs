
use std::{fs, path::Path, sync::Mutex};

use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed highscore store.
///
/// One table, one integer column. Rows are append-only (no update, no
/// delete); the highscore and the leaderboard are both computed at read
/// time, so insertion order is the only implicit state.
pub struct ScoreStore {
    conn: Mutex<Connection>,
}

impl ScoreStore {
    /// Open (or create) the SQLite database under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(data_dir)
            .map_err(|e| format!("failed to create data dir {}: {e}", data_dir.display()))?;

        let db_path = data_dir.join("highscore.db");
        let conn = Connection::open(&db_path)
            .map_err(|e| format!("failed to open SQLite at {}: {e}", db_path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;",
        )
        .map_err(|e| format!("failed to set pragmas: {e}"))?;

        conn.execute_batch("CREATE TABLE IF NOT EXISTS highscore (score INTEGER NOT NULL);")
            .map_err(|e| format!("failed to create schema: {e}"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one score. No validation: the client decides what to send.
    pub fn insert(&self, score: i64) -> Result<(), String> {
        let conn = self.conn.lock().unwrap();
        conn.execute("INSERT INTO highscore (score) VALUES (?1)", params![score])
            .map_err(|e| format!("insert score failed: {e}"))?;
        Ok(())
    }

    /// Highest score ever recorded, or 0 for an empty table.
    pub fn highscore(&self) -> Result<i64, String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT score FROM highscore ORDER BY score DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map(|score| score.unwrap_or(0))
        .map_err(|e| format!("highscore query failed: {e}"))
    }

    /// Top scores, descending. Ties keep insertion order (rowid).
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<i64>, String> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT score FROM highscore ORDER BY score DESC, rowid ASC LIMIT ?1")
            .map_err(|e| format!("leaderboard prepare failed: {e}"))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| row.get(0))
            .map_err(|e| format!("leaderboard query failed: {e}"))?;

        let mut scores = Vec::new();
        for row in rows {
            scores.push(row.map_err(|e| format!("leaderboard row failed: {e}"))?);
        }
        Ok(scores)
    }

    /// Total number of recorded scores.
    pub fn count(&self) -> Result<usize, String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM highscore", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n as usize)
        .map_err(|e| format!("count failed: {e}"))
    }
}
