//! Level data access object

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use super::database::{lock, DatabaseError};
use super::models::LevelAttempt;
use crate::solution::CompletionStats;

/// Seconds between 0001-01-01 and the Unix epoch.
const TICKS_EPOCH_OFFSET_SECS: i64 = 62_135_596_800;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Hands out `custom-<ticks>` level ids, one tick apart.
///
/// Ticks are 100ns intervals since 0001-01-01 UTC, the form the game uses
/// for its own custom levels.
#[derive(Debug, Clone)]
pub struct LevelIds {
    next: i64,
}

impl LevelIds {
    pub fn starting_now() -> Self {
        Self::starting_at(ticks(Utc::now()))
    }

    pub fn starting_at(ticks: i64) -> Self {
        Self { next: ticks }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("custom-{}", self.next);
        self.next += 1;
        id
    }
}

pub fn ticks(at: DateTime<Utc>) -> i64 {
    (at.timestamp() + TICKS_EPOCH_OFFSET_SECS) * TICKS_PER_SECOND
        + i64::from(at.timestamp_subsec_nanos()) / 100
}

/// Data access object for ResearchNet levels and their stats
#[derive(Clone)]
pub struct LevelStore {
    conn: Arc<Mutex<Connection>>,
}

impl LevelStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Every custom level with recorded stats.
    pub fn attempts(&self) -> Result<Vec<LevelAttempt>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, passed, cycles, symbols, reactors, definition
             FROM Level INNER JOIN ResearchNet ON id = level_id",
        )?;

        let attempts = stmt
            .query_map([], Self::row_to_attempt)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(attempts)
    }

    /// Add a puzzle definition to the research network. The game creates
    /// the Level row when the puzzle is first opened.
    pub fn add_puzzle(&self, id: &str, definition: &str) -> Result<(), DatabaseError> {
        let conn = lock(&self.conn)?;
        insert_research_net(&conn, id, definition)?;
        Ok(())
    }

    pub fn count(&self) -> Result<i64, DatabaseError> {
        let conn = lock(&self.conn)?;
        let count = conn.query_row("SELECT COUNT(*) FROM ResearchNet", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_attempt(row: &Row) -> rusqlite::Result<LevelAttempt> {
        Ok(LevelAttempt {
            id: row.get(0)?,
            stats: CompletionStats {
                passed: row.get(1)?,
                cycles: row.get(2)?,
                symbols: row.get(3)?,
                reactors: row.get(4)?,
            },
            definition: row.get(5)?,
        })
    }
}

fn insert_research_net(
    conn: &Connection,
    id: &str,
    definition: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO ResearchNet VALUES (?1, datetime('now'), ?2)",
        params![id, definition],
    )?;
    Ok(())
}

/// Add a puzzle together with an unplayed Level row: not passed, no best
/// scores. Run inside the caller's transaction.
pub(crate) fn create_custom_level(
    conn: &Connection,
    id: &str,
    definition: &str,
) -> rusqlite::Result<()> {
    insert_research_net(conn, id, definition)?;
    conn.execute(
        "INSERT INTO Level VALUES (?1, 0, 0, 0, 0, 0, ?2, ?2, ?2)",
        params![id, i32::MAX],
    )?;
    Ok(())
}
