//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the keyed upsert used by registration.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths only accept validated `Cpf` / `RegistrationCode` values.
//! - Upsert is one statement under the connection mutex, so concurrent
//!   writers to one key never interleave; the last completed call wins.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::record::{Cpf, Record, RegistrationCode};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

const UPSERT_SQL: &str = "INSERT INTO registros (cpf, numero) VALUES (?1, ?2)
    ON CONFLICT(cpf) DO UPDATE SET numero = excluded.numero;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure for record persistence and lookup.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable keyed store for registrations.
pub trait RecordStore {
    /// Inserts the record or overwrites the code of the existing one.
    fn upsert(&self, identifier: &Cpf, code: RegistrationCode) -> RepoResult<()>;
    /// Reads back one record by CPF.
    fn get_record(&self, identifier: &Cpf) -> RepoResult<Option<Record>>;
}

/// SQLite-backed record store sharing one connection across callers.
///
/// Opened once at process start and shared behind `Arc`; every operation
/// takes the connection mutex, which serializes writers.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection that already has migrations applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Returns the number of stored records.
    pub fn count(&self) -> RepoResult<u64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM registros;", [], |row| {
            row.get::<_, i64>(0)
        })?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    /// Closes the underlying connection, flushing pending WAL state.
    pub fn close(self) -> RepoResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.close().map_err(|(_, err)| {
            error!(
                "event=db_close module=repo status=error error_code=db_close_failed error={}",
                err
            );
            RepoError::from(err)
        })?;
        info!("event=db_close module=repo status=ok");
        Ok(())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Db(DbError::LockPoisoned))
    }
}

impl RecordStore for SqliteRecordStore {
    fn upsert(&self, identifier: &Cpf, code: RegistrationCode) -> RepoResult<()> {
        let started_at = Instant::now();
        let conn = self.lock()?;
        conn.execute(UPSERT_SQL, params![identifier.as_str(), code.get()])?;
        debug!(
            "event=record_upsert module=repo status=ok cpf={} duration_ms={}",
            identifier.masked(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn get_record(&self, identifier: &Cpf) -> RepoResult<Option<Record>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT cpf, numero FROM registros WHERE cpf = ?1;",
                [identifier.as_str()],
                |row| Ok((row.get::<_, String>("cpf")?, row.get::<_, i64>("numero")?)),
            )
            .optional()?;

        match row {
            Some((cpf, numero)) => Record::from_raw(&cpf, numero)
                .map(Some)
                .map_err(|err| RepoError::InvalidData(format!("registros row: {err}"))),
            None => Ok(None),
        }
    }
}
