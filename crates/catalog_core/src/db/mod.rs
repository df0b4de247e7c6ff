//! Catalog database bootstrap: connection opening and schema upgrades.
//!
//! # Responsibility
//! - Hand out connections that are configured and migrated.
//! - Report bootstrap failures with the step that failed.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - `categories`/`books` are only touched after every migration committed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Bootstrap failure, tagged with the step that produced it.
#[derive(Debug)]
pub enum DbError {
    /// The database file (or in-memory handle) could not be opened.
    Open {
        path: Option<PathBuf>,
        source: rusqlite::Error,
    },
    /// A connection pragma (`foreign_keys`, busy timeout) was rejected.
    Configure(rusqlite::Error),
    /// Migration `version` failed; its transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build than this one.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Stable code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::Configure(_) => "db_configure_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
            Self::Sqlite(_) => "db_sqlite_error",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open {
                path: Some(path),
                source,
            } => write!(f, "cannot open catalog at {}: {source}", path.display()),
            Self::Open { path: None, source } => {
                write!(f, "cannot open in-memory catalog: {source}")
            }
            Self::Configure(err) => write!(f, "cannot configure catalog connection: {err}"),
            Self::Migration { version, source } => {
                write!(f, "catalog migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Configure(err) | Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
