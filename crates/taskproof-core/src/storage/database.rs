//! SQLite-based task and profile storage.
//!
//! Provides persistent storage for:
//! - Local profiles and their gamification state
//! - Tasks with their proof-of-completion records
//! - Key-value store for application state (e.g. active profile)
//!
//! The gamification columns are only ever written through
//! [`Database::save_game_state`] with a state produced by the streak
//! ledger; queries never recompute streaks on their own.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::gamification::UserGameState;
use crate::proof::ProofDecision;
use crate::task::{Priority, ProofKind, ProofStatus, Task, TaskStatus};

use super::data_dir;

const DATE_FMT: &str = "%Y-%m-%d";

/// A local account owning tasks and gamification state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Per-profile summary surfaced by `stats me`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileStats {
    pub total_points: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub tasks_completed: u64,
}

/// One row of the points leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub total_points: u64,
    pub current_streak: u32,
}

/// SQLite database for tasks, profiles and gamification state.
pub struct Database {
    conn: Connection,
}

fn parse_ts(value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_opt_ts(value: Option<String>) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    value.as_deref().map(parse_ts).transpose()
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/taskproof/taskproof.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("taskproof.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path (tests use a temp dir).
    pub fn open_at(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profiles (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                name             TEXT NOT NULL UNIQUE,
                total_points     INTEGER NOT NULL DEFAULT 0,
                current_streak   INTEGER NOT NULL DEFAULT 0,
                longest_streak   INTEGER NOT NULL DEFAULT 0,
                last_active_date TEXT,
                created_at       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id                 INTEGER PRIMARY KEY AUTOINCREMENT,
                profile_id         INTEGER NOT NULL REFERENCES profiles(id),
                title              TEXT NOT NULL,
                description        TEXT,
                priority           TEXT NOT NULL DEFAULT 'medium',
                status             TEXT NOT NULL DEFAULT 'pending',
                due_date           TEXT,
                created_at         TEXT NOT NULL,
                updated_at         TEXT NOT NULL,
                completed_at       TEXT,
                proof_kind         TEXT,
                proof_text         TEXT,
                proof_path         TEXT,
                proof_status       TEXT NOT NULL DEFAULT 'none',
                proof_submitted_at TEXT,
                proof_feedback     TEXT
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Create indexes for common query patterns
            CREATE INDEX IF NOT EXISTS idx_tasks_profile_id ON tasks(profile_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(profile_id, status);
            CREATE INDEX IF NOT EXISTS idx_tasks_completed_at ON tasks(completed_at);",
        )?;
        Ok(())
    }

    // ---- profiles ----

    /// Create a profile with all-zero gamification state.
    pub fn create_profile(&self, name: &str) -> Result<Profile, rusqlite::Error> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO profiles (name, created_at) VALUES (?1, ?2)",
            params![name, created_at.to_rfc3339()],
        )?;
        Ok(Profile {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        })
    }

    pub fn get_profile(&self, name: &str) -> Result<Option<Profile>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM profiles WHERE name = ?1")?;
        let result = stmt.query_row(params![name], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        });
        match result {
            Ok((id, name, created_at)) => Ok(Some(Profile {
                id,
                name,
                created_at: parse_ts(&created_at)?,
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM profiles ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut profiles = Vec::new();
        for row in rows {
            let (id, name, created_at) = row?;
            profiles.push(Profile {
                id,
                name,
                created_at: parse_ts(&created_at)?,
            });
        }
        Ok(profiles)
    }

    // ---- gamification state ----

    /// Load a profile's gamification snapshot.
    pub fn game_state(&self, profile_id: i64) -> Result<UserGameState, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT total_points, current_streak, longest_streak, last_active_date
             FROM profiles WHERE id = ?1",
        )?;
        stmt.query_row(params![profile_id], |row| {
            let last: Option<String> = row.get(3)?;
            let last_active_date = match last {
                Some(s) => Some(NaiveDate::parse_from_str(&s, DATE_FMT).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?),
                None => None,
            };
            Ok(UserGameState {
                total_points: row.get::<_, i64>(0)? as u64,
                current_streak: row.get::<_, i64>(1)? as u32,
                longest_streak: row.get::<_, i64>(2)? as u32,
                last_active_date,
            })
        })
    }

    /// Durably store a ledger-produced snapshot.
    pub fn save_game_state(
        &self,
        profile_id: i64,
        state: &UserGameState,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE profiles
             SET total_points = ?1, current_streak = ?2, longest_streak = ?3,
                 last_active_date = ?4
             WHERE id = ?5",
            params![
                state.total_points as i64,
                state.current_streak as i64,
                state.longest_streak as i64,
                state.last_active_date.map(|d| d.format(DATE_FMT).to_string()),
                profile_id,
            ],
        )?;
        Ok(())
    }

    // ---- tasks ----

    pub fn insert_task(
        &self,
        profile_id: i64,
        title: &str,
        description: Option<&str>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<i64, rusqlite::Error> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO tasks (profile_id, title, description, priority, due_date,
                                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                profile_id,
                title,
                description,
                priority.as_str(),
                due_date.map(|d| d.to_rfc3339()),
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn row_to_task(row: &rusqlite::Row<'_>) -> Result<Task, rusqlite::Error> {
        let priority: String = row.get(4)?;
        let status: String = row.get(5)?;
        let proof_kind: Option<String> = row.get(10)?;
        let proof_status: String = row.get(13)?;
        Ok(Task {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            priority: Priority::parse(&priority).unwrap_or_default(),
            status: TaskStatus::parse(&status).unwrap_or_default(),
            due_date: parse_opt_ts(row.get(6)?)?,
            created_at: parse_ts(&row.get::<_, String>(7)?)?,
            updated_at: parse_ts(&row.get::<_, String>(8)?)?,
            completed_at: parse_opt_ts(row.get(9)?)?,
            proof_kind: proof_kind.as_deref().and_then(ProofKind::parse),
            proof_text: row.get(11)?,
            proof_path: row.get(12)?,
            proof_status: ProofStatus::parse(&proof_status).unwrap_or_default(),
            proof_submitted_at: parse_opt_ts(row.get(14)?)?,
            proof_feedback: row.get(15)?,
        })
    }

    const TASK_COLUMNS: &'static str = "id, profile_id, title, description, priority, status, \
         due_date, created_at, updated_at, completed_at, proof_kind, proof_text, proof_path, \
         proof_status, proof_submitted_at, proof_feedback";

    pub fn get_task(
        &self,
        profile_id: i64,
        task_id: i64,
    ) -> Result<Option<Task>, rusqlite::Error> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = ?1 AND profile_id = ?2",
            Self::TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let result = stmt.query_row(params![task_id, profile_id], Self::row_to_task);
        match result {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Tasks for a profile, newest first.
    pub fn list_tasks(&self, profile_id: i64) -> Result<Vec<Task>, rusqlite::Error> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE profile_id = ?1 ORDER BY created_at DESC, id DESC",
            Self::TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![profile_id], Self::row_to_task)?;
        rows.collect()
    }

    pub fn delete_task(&self, profile_id: i64, task_id: i64) -> Result<bool, rusqlite::Error> {
        let affected = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND profile_id = ?2",
            params![task_id, profile_id],
        )?;
        Ok(affected > 0)
    }

    /// Persist the proof record and decision onto a task.
    pub fn record_proof(
        &self,
        task_id: i64,
        kind: ProofKind,
        text: Option<&str>,
        path: Option<&str>,
        decision: &ProofDecision,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), rusqlite::Error> {
        let status = if decision.approved {
            ProofStatus::Approved
        } else {
            ProofStatus::Rejected
        };
        self.conn.execute(
            "UPDATE tasks
             SET proof_kind = ?1, proof_text = ?2, proof_path = ?3, proof_status = ?4,
                 proof_submitted_at = ?5, proof_feedback = ?6, updated_at = ?5
             WHERE id = ?7",
            params![
                kind.as_str(),
                text,
                path,
                status.as_str(),
                submitted_at.to_rfc3339(),
                decision.feedback,
                task_id,
            ],
        )?;
        Ok(())
    }

    /// Transition a task into the completed state.
    pub fn mark_completed(
        &self,
        task_id: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE tasks SET status = 'completed', completed_at = ?1, updated_at = ?1
             WHERE id = ?2",
            params![completed_at.to_rfc3339(), task_id],
        )?;
        Ok(())
    }

    // ---- stats / leaderboard / calendar ----

    pub fn stats(&self, profile_id: i64) -> Result<ProfileStats, rusqlite::Error> {
        let state = self.game_state(profile_id)?;
        let tasks_completed: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE profile_id = ?1 AND status = 'completed'",
            params![profile_id],
            |row| row.get::<_, i64>(0),
        )? as u64;
        Ok(ProfileStats {
            total_points: state.total_points,
            current_streak: state.current_streak,
            longest_streak: state.longest_streak,
            tasks_completed,
        })
    }

    /// Top profiles by points.
    pub fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT name, total_points, current_streak FROM profiles
             ORDER BY total_points DESC, name ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(LeaderboardEntry {
                name: row.get(0)?,
                total_points: row.get::<_, i64>(1)? as u64,
                current_streak: row.get::<_, i64>(2)? as u32,
            })
        })?;
        rows.collect()
    }

    /// Completed-task count per UTC day over the trailing window.
    pub fn streak_calendar(
        &self,
        profile_id: i64,
        days: u32,
    ) -> Result<BTreeMap<NaiveDate, u32>, rusqlite::Error> {
        let cutoff = Utc::now() - chrono::Duration::days(days as i64);
        let mut stmt = self.conn.prepare(
            "SELECT completed_at FROM tasks
             WHERE profile_id = ?1 AND status = 'completed' AND completed_at IS NOT NULL",
        )?;
        let rows = stmt.query_map(params![profile_id], |row| row.get::<_, String>(0))?;

        let mut calendar = BTreeMap::new();
        for row in rows {
            let completed_at = parse_ts(&row?)?;
            if completed_at < cutoff {
                continue;
            }
            *calendar.entry(completed_at.date_naive()).or_insert(0u32) += 1;
        }
        Ok(calendar)
    }

    // ---- kv store ----

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
