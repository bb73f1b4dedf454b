//! Repository Pattern for Database Abstraction
//!
//! Business logic talks to the store through two traits:
//!
//! - [`ClassRepository`] opens transactions and answers availability queries
//! - [`StoreTransaction`] is an owned, single-writer unit of work
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        AvailabilityMatcher         RegistrationCoordinator  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │          ClassRepository  ──begin()──▶  StoreTransaction    │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                           │
//!                    ▼                           ▼
//!          ┌─────────────────┐         ┌─────────────────┐
//!          │     SQLite      │         │      Mock       │
//!          │  Implementation │         │ Implementation  │
//!          └─────────────────┘         └─────────────────┘
//! ```
//!
//! A transaction that is dropped without `commit` is rolled back, so every
//! exit path releases it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use proffy::storage::repository::{ClassRepository, SqliteClassRepository};
//!
//! let repo = SqliteClassRepository::new("data/proffy.db")?;
//! let mut tx = repo.begin()?;
//! let user_id = tx.insert_profile(&profile)?;
//! tx.commit()?;
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockWriteGuard};
use std::time::Duration;

use rusqlite::{params, params_from_iter, Connection, Row};

use super::{StoreError, StoreResult};
use crate::models::{
    ClassId, ClassListing, NewSubjectOffering, NewTutorProfile, SubjectOffering, TutorProfile,
    UserId,
};
use crate::schedule::{ScheduleSlot, SlotPredicate};

// ============================================================================
// Core Types
// ============================================================================

/// Row counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub profiles: usize,
    pub offerings: usize,
    pub slots: usize,
}

/// Step at which the mock backend can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    InsertProfile,
    InsertOffering,
    InsertSlots,
    Commit,
    Rollback,
}

// ============================================================================
// Repository Traits
// ============================================================================

/// Owned transaction scope
///
/// Inserts are issued in program order by the single owner of the handle.
/// Nothing written through it is visible to readers until `commit` succeeds.
pub trait StoreTransaction {
    /// Insert a tutor profile and return its generated identity
    fn insert_profile(&mut self, profile: &NewTutorProfile) -> StoreResult<UserId>;

    /// Insert a subject offering owned by `user_id`
    fn insert_offering(
        &mut self,
        user_id: UserId,
        offering: &NewSubjectOffering,
    ) -> StoreResult<ClassId>;

    /// Insert all slots of an offering as one batch
    fn insert_slots(&mut self, class_id: ClassId, slots: &[ScheduleSlot]) -> StoreResult<()>;

    /// Make every insert visible atomically
    fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard every insert
    fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Repository for tutor classes and their weekly schedules
pub trait ClassRepository: Send + Sync {
    /// Begin a transaction scoped to the returned handle
    fn begin(&self) -> StoreResult<Box<dyn StoreTransaction + '_>>;

    /// Offerings of `subject` with at least one slot satisfying `predicate`
    ///
    /// Each offering appears at most once, in storage order.
    fn find_available(
        &self,
        subject: &str,
        predicate: &SlotPredicate,
    ) -> StoreResult<Vec<ClassListing>>;

    /// Count committed rows
    fn stats(&self) -> StoreResult<StoreStats>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        avatar TEXT NOT NULL,
        whatsapp TEXT NOT NULL,
        bio TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS classes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        subject TEXT NOT NULL,
        cost REAL NOT NULL,
        user_id INTEGER NOT NULL
            REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_classes_subject
        ON classes(subject);

    CREATE TABLE IF NOT EXISTS class_schedules (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        week_day INTEGER NOT NULL CHECK (week_day BETWEEN 0 AND 6),
        from_minute INTEGER NOT NULL CHECK (from_minute >= 0),
        to_minute INTEGER NOT NULL CHECK (to_minute <= 1440),
        class_id INTEGER NOT NULL
            REFERENCES classes(id) ON UPDATE CASCADE ON DELETE CASCADE,
        CHECK (from_minute < to_minute)
    );

    CREATE INDEX IF NOT EXISTS idx_class_schedules_class_day
        ON class_schedules(class_id, week_day);
"#;

/// Semi-join: each class appears once however many of its slots match
const FIND_AVAILABLE: &str = r#"
    SELECT c.id, c.subject, c.cost, u.id, u.name, u.avatar, u.whatsapp, u.bio
    FROM classes c
    JOIN users u ON u.id = c.user_id
    WHERE c.subject = ?1
      AND EXISTS (
          SELECT 1 FROM class_schedules s
          WHERE s.class_id = c.id
            AND s.week_day = ?2
            AND s.from_minute <= ?3
            AND s.to_minute > ?3
      )
    ORDER BY c.id
"#;

/// Slots per multi-row insert (4 bound parameters each)
const SLOT_CHUNK_SIZE: usize = 500;

/// SQLite implementation of ClassRepository
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection. An open
/// transaction holds the lock, so readers never see its uncommitted rows.
pub struct SqliteClassRepository {
    conn: Mutex<Connection>,
}

impl SqliteClassRepository {
    /// Open (or create) a SQLite repository at `path`
    pub fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_busy_timeout(path, Duration::from_secs(5))
    }

    /// Open a SQLite repository with a custom busy timeout
    pub fn with_busy_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> StoreResult<Self> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        // Enable WAL mode for better concurrency
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let repo = Self::from_connection(conn)?;
        tracing::info!(path = %path.display(), "SQLite repository initialized");
        Ok(repo)
    }

    /// Create in-memory repository (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<ClassListing> {
        let user_id = UserId(row.get(3)?);
        Ok(ClassListing {
            offering: SubjectOffering {
                id: ClassId(row.get(0)?),
                user_id,
                subject: row.get(1)?,
                cost: row.get(2)?,
            },
            tutor: TutorProfile {
                id: user_id,
                name: row.get(4)?,
                avatar: row.get(5)?,
                whatsapp: row.get(6)?,
                bio: row.get(7)?,
            },
        })
    }
}

impl ClassRepository for SqliteClassRepository {
    fn begin(&self) -> StoreResult<Box<dyn StoreTransaction + '_>> {
        let conn = self.lock()?;

        // A rollback that failed earlier leaves the shared connection mid-transaction
        if !conn.is_autocommit() {
            tracing::warn!("Connection still inside a stale transaction, rolling it back");
            conn.execute_batch("ROLLBACK")?;
        }

        // IMMEDIATE takes the write lock up front so concurrent writers queue on busy_timeout
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(Box::new(SqliteTransaction { conn, open: true }))
    }

    fn find_available(
        &self,
        subject: &str,
        predicate: &SlotPredicate,
    ) -> StoreResult<Vec<ClassListing>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(FIND_AVAILABLE)?;

        let listings = stmt
            .query_map(
                params![
                    subject,
                    predicate.weekday().value(),
                    predicate.minute().value()
                ],
                Self::listing_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(listings)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let conn = self.lock()?;
        let count = |table: &str| -> StoreResult<usize> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n as usize)
        };

        Ok(StoreStats {
            profiles: count("users")?,
            offerings: count("classes")?,
            slots: count("class_schedules")?,
        })
    }
}

/// Transaction over the repository's single connection
pub struct SqliteTransaction<'a> {
    conn: MutexGuard<'a, Connection>,
    open: bool,
}

impl StoreTransaction for SqliteTransaction<'_> {
    fn insert_profile(&mut self, profile: &NewTutorProfile) -> StoreResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (name, avatar, whatsapp, bio) VALUES (?1, ?2, ?3, ?4)",
            params![profile.name, profile.avatar, profile.whatsapp, profile.bio],
        )?;
        Ok(UserId(self.conn.last_insert_rowid()))
    }

    fn insert_offering(
        &mut self,
        user_id: UserId,
        offering: &NewSubjectOffering,
    ) -> StoreResult<ClassId> {
        self.conn.execute(
            "INSERT INTO classes (subject, cost, user_id) VALUES (?1, ?2, ?3)",
            params![offering.subject, offering.cost, user_id.0],
        )?;
        Ok(ClassId(self.conn.last_insert_rowid()))
    }

    fn insert_slots(&mut self, class_id: ClassId, slots: &[ScheduleSlot]) -> StoreResult<()> {
        if slots.is_empty() {
            return Ok(());
        }

        // Chunked to stay under SQLite's bound-parameter limit; all chunks share the open transaction
        for chunk in slots.chunks(SLOT_CHUNK_SIZE) {
            let placeholders: String = (0..chunk.len())
                .map(|i| {
                    let base = i * 4;
                    format!("(?{}, ?{}, ?{}, ?{})", base + 1, base + 2, base + 3, base + 4)
                })
                .collect::<Vec<_>>()
                .join(", ");
            let query = format!(
                "INSERT INTO class_schedules (class_id, week_day, from_minute, to_minute) VALUES {placeholders}"
            );

            let values: Vec<i64> = chunk
                .iter()
                .flat_map(|slot| {
                    [
                        class_id.0,
                        i64::from(slot.weekday.value()),
                        i64::from(slot.from),
                        i64::from(slot.to),
                    ]
                })
                .collect();

            self.conn.execute(&query, params_from_iter(values.iter()))?;
        }

        Ok(())
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        // On failure `open` stays set and Drop rolls back
        self.conn.execute_batch("COMMIT")?;
        self.open = false;
        Ok(())
    }

    fn rollback(mut self: Box<Self>) -> StoreResult<()> {
        self.open = false;
        // Some errors (FULL, IOERR, NOMEM) already rolled the transaction back
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }

        if self.conn.is_autocommit() {
            tracing::warn!("Transaction released without commit, already rolled back by SQLite");
            return;
        }

        match self.conn.execute_batch("ROLLBACK") {
            Ok(()) => tracing::warn!("Transaction released without commit, rolled back"),
            Err(e) => tracing::error!(
                error = %e,
                "Rollback of released transaction failed, store state ambiguous"
            ),
        }
    }
}

// ============================================================================
// Mock Implementation (for testing)
// ============================================================================

#[derive(Debug, Clone, Default)]
struct Tables {
    profiles: Vec<TutorProfile>,
    offerings: Vec<SubjectOffering>,
    slots: Vec<(ClassId, ScheduleSlot)>,
}

/// In-memory mock implementation of ClassRepository
///
/// Useful for testing without database dependencies. A fail point makes the
/// matching step return [`StoreError::Injected`].
pub struct MockClassRepository {
    tables: RwLock<Tables>,
    fail_point: Mutex<Option<FailPoint>>,
    next_id: Mutex<i64>,
}

impl MockClassRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            fail_point: Mutex::new(None),
            next_id: Mutex::new(1),
        }
    }

    /// Create a mock repository that fails at `point`
    pub fn failing_at(point: FailPoint) -> Self {
        let repo = Self::new();
        repo.set_fail_point(Some(point));
        repo
    }

    /// Set or clear the fail point for subsequent transactions
    pub fn set_fail_point(&self, point: Option<FailPoint>) {
        if let Ok(mut fail_point) = self.fail_point.lock() {
            *fail_point = point;
        }
    }

    fn fail_point(&self) -> StoreResult<Option<FailPoint>> {
        self.fail_point
            .lock()
            .map(|point| *point)
            .map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MockClassRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRepository for MockClassRepository {
    fn begin(&self) -> StoreResult<Box<dyn StoreTransaction + '_>> {
        let fail_point = self.fail_point()?;
        if fail_point == Some(FailPoint::Begin) {
            return Err(StoreError::Injected(FailPoint::Begin));
        }

        let committed = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(Box::new(MockTransaction {
            committed,
            staged: Tables::default(),
            next_id: &self.next_id,
            fail_point,
        }))
    }

    fn find_available(
        &self,
        subject: &str,
        predicate: &SlotPredicate,
    ) -> StoreResult<Vec<ClassListing>> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;

        let listings = tables
            .offerings
            .iter()
            .filter(|offering| offering.subject == subject)
            .filter(|offering| {
                tables
                    .slots
                    .iter()
                    .any(|(class_id, slot)| *class_id == offering.id && predicate.matches(slot))
            })
            .filter_map(|offering| {
                tables
                    .profiles
                    .iter()
                    .find(|profile| profile.id == offering.user_id)
                    .map(|tutor| ClassListing {
                        tutor: tutor.clone(),
                        offering: offering.clone(),
                    })
            })
            .collect();

        Ok(listings)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(StoreStats {
            profiles: tables.profiles.len(),
            offerings: tables.offerings.len(),
            slots: tables.slots.len(),
        })
    }
}

/// Mock transaction staging rows until commit
pub struct MockTransaction<'a> {
    committed: RwLockWriteGuard<'a, Tables>,
    staged: Tables,
    next_id: &'a Mutex<i64>,
    fail_point: Option<FailPoint>,
}

impl MockTransaction<'_> {
    fn check(&self, point: FailPoint) -> StoreResult<()> {
        if self.fail_point == Some(point) {
            return Err(StoreError::Injected(point));
        }
        Ok(())
    }

    fn allocate_id(&self) -> StoreResult<i64> {
        let mut next = self.next_id.lock().map_err(|_| StoreError::LockPoisoned)?;
        let id = *next;
        *next += 1;
        Ok(id)
    }
}

impl StoreTransaction for MockTransaction<'_> {
    fn insert_profile(&mut self, profile: &NewTutorProfile) -> StoreResult<UserId> {
        self.check(FailPoint::InsertProfile)?;

        let id = UserId(self.allocate_id()?);
        self.staged.profiles.push(TutorProfile {
            id,
            name: profile.name.clone(),
            avatar: profile.avatar.clone(),
            whatsapp: profile.whatsapp.clone(),
            bio: profile.bio.clone(),
        });
        Ok(id)
    }

    fn insert_offering(
        &mut self,
        user_id: UserId,
        offering: &NewSubjectOffering,
    ) -> StoreResult<ClassId> {
        self.check(FailPoint::InsertOffering)?;

        let known = self
            .staged
            .profiles
            .iter()
            .chain(self.committed.profiles.iter())
            .any(|profile| profile.id == user_id);
        if !known {
            return Err(StoreError::Constraint(format!("unknown {user_id}")));
        }

        let id = ClassId(self.allocate_id()?);
        self.staged.offerings.push(SubjectOffering {
            id,
            user_id,
            subject: offering.subject.clone(),
            cost: offering.cost,
        });
        Ok(id)
    }

    fn insert_slots(&mut self, class_id: ClassId, slots: &[ScheduleSlot]) -> StoreResult<()> {
        self.check(FailPoint::InsertSlots)?;

        let known = self
            .staged
            .offerings
            .iter()
            .chain(self.committed.offerings.iter())
            .any(|offering| offering.id == class_id);
        if !known {
            return Err(StoreError::Constraint(format!("unknown {class_id}")));
        }

        self.staged
            .slots
            .extend(slots.iter().map(|slot| (class_id, *slot)));
        Ok(())
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        self.check(FailPoint::Commit)?;

        let MockTransaction {
            mut committed,
            staged,
            ..
        } = *self;
        committed.profiles.extend(staged.profiles);
        committed.offerings.extend(staged.offerings);
        committed.slots.extend(staged.slots);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> StoreResult<()> {
        // Staged rows are discarded either way; the injected error only
        // simulates a rollback that cannot be confirmed
        self.check(FailPoint::Rollback)
    }
}

// ============================================================================
// Shared Repository Types
// ============================================================================

/// Thread-safe shared repository wrapper
pub type SharedClassRepository = Arc<dyn ClassRepository>;

/// Create a shared SQLite repository
pub fn create_sqlite_repository(path: impl AsRef<Path>) -> StoreResult<SharedClassRepository> {
    let repo = SqliteClassRepository::new(path)?;
    Ok(Arc::new(repo))
}

/// Create a shared mock repository
pub fn create_mock_repository() -> SharedClassRepository {
    Arc::new(MockClassRepository::new())
}

// ============================================================================
// Tests
// ============================================================================
