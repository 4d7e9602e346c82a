//! Persistence for profiles, plans, and stress entries.
//!
//! The engine talks to storage only through the `PlanStore` trait.
//! `SqliteStore` is the on-disk implementation; `MemoryStore` backs
//! tests. Plans carry an optimistic version: `save_plan` rejects a
//! write whose expected version no longer matches what is stored, so
//! two concurrent adjustments cannot silently overwrite each other.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{NotFoundError, Result, RunPlanError, StorageError};
use crate::models::{RunnerProfile, StressEntry, TrainingPlan};

/// Version expected when inserting a plan that does not exist yet
pub const NEW_PLAN_VERSION: u64 = 0;

/// Storage contract used by the engine
pub trait PlanStore {
    fn save_profile(&mut self, profile: &RunnerProfile) -> Result<()>;
    fn load_profile(&self, runner_id: &str) -> Result<RunnerProfile>;

    /// Persist a plan, replacing any existing plan for the runner.
    ///
    /// `expected_version` must match the stored version (or
    /// `NEW_PLAN_VERSION` for a first save); on mismatch the write is
    /// rejected with a conflict and the caller should reload and retry.
    /// Returns the new version.
    fn save_plan(&mut self, plan: &TrainingPlan, expected_version: u64) -> Result<u64>;

    /// Load the runner's current plan together with its version
    fn load_plan(&self, runner_id: &str) -> Result<(TrainingPlan, u64)>;

    /// Record a stress entry; a second entry for the same day replaces
    /// the first
    fn record_stress_entry(&mut self, entry: &StressEntry) -> Result<()>;

    /// All stress entries for a runner, oldest first
    fn stress_entries(&self, runner_id: &str) -> Result<Vec<StressEntry>>;

    /// The entry for a specific day, if one was recorded
    fn stress_entry_on(&self, runner_id: &str, date: NaiveDate) -> Result<Option<StressEntry>>;

    /// Entries from the last `days` days up to and including `today`,
    /// newest first
    fn stress_history(
        &self,
        runner_id: &str,
        today: NaiveDate,
        days: i64,
    ) -> Result<Vec<StressEntry>> {
        let cutoff = today - chrono::Duration::days(days);
        let mut entries: Vec<StressEntry> = self
            .stress_entries(runner_id)?
            .into_iter()
            .filter(|e| e.date > cutoff && e.date <= today)
            .collect();
        entries.reverse();
        Ok(entries)
    }
}

/// In-memory store used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: HashMap<String, RunnerProfile>,
    plans: HashMap<String, (TrainingPlan, u64)>,
    entries: HashMap<String, Vec<StressEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryStore {
    fn save_profile(&mut self, profile: &RunnerProfile) -> Result<()> {
        self.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    fn load_profile(&self, runner_id: &str) -> Result<RunnerProfile> {
        self.profiles
            .get(runner_id)
            .cloned()
            .ok_or_else(|| {
                NotFoundError::Runner {
                    runner_id: runner_id.to_string(),
                }
                .into()
            })
    }

    fn save_plan(&mut self, plan: &TrainingPlan, expected_version: u64) -> Result<u64> {
        let current = self
            .plans
            .get(&plan.runner_id)
            .map(|(_, version)| *version)
            .unwrap_or(NEW_PLAN_VERSION);
        if current != expected_version {
            return Err(RunPlanError::Conflict(format!(
                "plan for runner {} is at version {current}, expected {expected_version}",
                plan.runner_id
            )));
        }
        let next = current + 1;
        self.plans
            .insert(plan.runner_id.clone(), (plan.clone(), next));
        Ok(next)
    }

    fn load_plan(&self, runner_id: &str) -> Result<(TrainingPlan, u64)> {
        self.plans
            .get(runner_id)
            .cloned()
            .ok_or_else(|| {
                NotFoundError::Plan {
                    runner_id: runner_id.to_string(),
                }
                .into()
            })
    }

    fn record_stress_entry(&mut self, entry: &StressEntry) -> Result<()> {
        let entries = self.entries.entry(entry.runner_id.clone()).or_default();
        entries.retain(|existing| existing.date != entry.date);
        entries.push(entry.clone());
        entries.sort_by_key(|existing| existing.date);
        Ok(())
    }

    fn stress_entries(&self, runner_id: &str) -> Result<Vec<StressEntry>> {
        Ok(self.entries.get(runner_id).cloned().unwrap_or_default())
    }

    fn stress_entry_on(&self, runner_id: &str, date: NaiveDate) -> Result<Option<StressEntry>> {
        Ok(self
            .entries
            .get(runner_id)
            .and_then(|entries| entries.iter().find(|entry| entry.date == date))
            .cloned())
    }
}

/// SQLite-backed store.
///
/// Profiles and plans are stored as JSON documents; stress entries get
/// their own table keyed by runner and day so a re-submitted day
/// upserts instead of duplicating.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create or open a database at the given path
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(StorageError::from)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;

                CREATE TABLE IF NOT EXISTS runners (
                    id TEXT PRIMARY KEY,
                    profile TEXT NOT NULL,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS plans (
                    runner_id TEXT PRIMARY KEY,
                    plan TEXT NOT NULL,
                    version INTEGER NOT NULL,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (runner_id) REFERENCES runners (id)
                );

                CREATE TABLE IF NOT EXISTS stress_entries (
                    runner_id TEXT NOT NULL,
                    date DATE NOT NULL,
                    stress_level INTEGER NOT NULL,
                    sleep_quality INTEGER,
                    notes TEXT,
                    PRIMARY KEY (runner_id, date)
                );

                CREATE INDEX IF NOT EXISTS idx_stress_runner_date
                    ON stress_entries (runner_id, date);
                "#,
            )
            .map_err(StorageError::from)?;
        Ok(())
    }
}

impl PlanStore for SqliteStore {
    fn save_profile(&mut self, profile: &RunnerProfile) -> Result<()> {
        let json = serde_json::to_string(profile).map_err(StorageError::from)?;
        self.conn
            .execute(
                r#"
                INSERT INTO runners (id, profile, updated_at)
                VALUES (?1, ?2, CURRENT_TIMESTAMP)
                ON CONFLICT(id) DO UPDATE SET
                    profile = excluded.profile,
                    updated_at = CURRENT_TIMESTAMP
                "#,
                params![profile.id, json],
            )
            .map_err(StorageError::from)?;
        debug!(runner_id = %profile.id, "profile saved");
        Ok(())
    }

    fn load_profile(&self, runner_id: &str) -> Result<RunnerProfile> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT profile FROM runners WHERE id = ?1",
                params![runner_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::from)?;
        match json {
            Some(json) => {
                Ok(serde_json::from_str(&json).map_err(StorageError::from)?)
            }
            None => Err(NotFoundError::Runner {
                runner_id: runner_id.to_string(),
            }
            .into()),
        }
    }

    fn save_plan(&mut self, plan: &TrainingPlan, expected_version: u64) -> Result<u64> {
        let tx = self.conn.transaction().map_err(StorageError::from)?;
        let current: Option<u64> = tx
            .query_row(
                "SELECT version FROM plans WHERE runner_id = ?1",
                params![plan.runner_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::from)?;
        let current = current.unwrap_or(NEW_PLAN_VERSION);
        if current != expected_version {
            return Err(RunPlanError::Conflict(format!(
                "plan for runner {} is at version {current}, expected {expected_version}",
                plan.runner_id
            )));
        }

        let next = current + 1;
        let json = serde_json::to_string(plan).map_err(StorageError::from)?;
        tx.execute(
            r#"
            INSERT INTO plans (runner_id, plan, version, updated_at)
            VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
            ON CONFLICT(runner_id) DO UPDATE SET
                plan = excluded.plan,
                version = excluded.version,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![plan.runner_id, json, next],
        )
        .map_err(StorageError::from)?;
        tx.commit().map_err(StorageError::from)?;
        debug!(runner_id = %plan.runner_id, version = next, "plan saved");
        Ok(next)
    }

    fn load_plan(&self, runner_id: &str) -> Result<(TrainingPlan, u64)> {
        let row: Option<(String, u64)> = self
            .conn
            .query_row(
                "SELECT plan, version FROM plans WHERE runner_id = ?1",
                params![runner_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(StorageError::from)?;
        match row {
            Some((json, version)) => {
                let plan = serde_json::from_str(&json).map_err(StorageError::from)?;
                Ok((plan, version))
            }
            None => Err(NotFoundError::Plan {
                runner_id: runner_id.to_string(),
            }
            .into()),
        }
    }

    fn record_stress_entry(&mut self, entry: &StressEntry) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO stress_entries (runner_id, date, stress_level, sleep_quality, notes)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(runner_id, date) DO UPDATE SET
                    stress_level = excluded.stress_level,
                    sleep_quality = excluded.sleep_quality,
                    notes = excluded.notes
                "#,
                params![
                    entry.runner_id,
                    entry.date,
                    entry.stress_level,
                    entry.sleep_quality,
                    entry.notes
                ],
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn stress_entries(&self, runner_id: &str) -> Result<Vec<StressEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                SELECT runner_id, date, stress_level, sleep_quality, notes
                FROM stress_entries
                WHERE runner_id = ?1
                ORDER BY date ASC
                "#,
            )
            .map_err(StorageError::from)?;
        let rows = stmt
            .query_map(params![runner_id], |row| {
                Ok(StressEntry {
                    runner_id: row.get(0)?,
                    date: row.get(1)?,
                    stress_level: row.get(2)?,
                    sleep_quality: row.get(3)?,
                    notes: row.get(4)?,
                })
            })
            .map_err(StorageError::from)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(StorageError::from)?);
        }
        Ok(entries)
    }

    fn stress_entry_on(&self, runner_id: &str, date: NaiveDate) -> Result<Option<StressEntry>> {
        self.conn
            .query_row(
                r#"
                SELECT runner_id, date, stress_level, sleep_quality, notes
                FROM stress_entries
                WHERE runner_id = ?1 AND date = ?2
                "#,
                params![runner_id, date],
                |row| {
                    Ok(StressEntry {
                        runner_id: row.get(0)?,
                        date: row.get(1)?,
                        stress_level: row.get(2)?,
                        sleep_quality: row.get(3)?,
                        notes: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(StorageError::from)
            .map_err(Into::into)
    }
}
