use crate::db::DbError;
use crate::model::book::BookId;
use crate::model::category::CategoryId;
use crate::model::validation::ValidationError;
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

const FOREIGN_KEY_MESSAGE: &str = "FOREIGN KEY constraint failed";

/// Error returned by category and book stores.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Record failed validation before the write was attempted.
    Validation(ValidationError),
    /// `categories.name` unique constraint rejected the write.
    DuplicateCategoryName(String),
    /// Category cannot be deleted while books reference it.
    CategoryReferenced(CategoryId),
    CategoryNotFound(CategoryId),
    BookNotFound(BookId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateCategoryName(name) => {
                write!(f, "category with name '{name}' already exists")
            }
            Self::CategoryReferenced(id) => {
                write!(f, "category {id} is still referenced by books")
            }
            Self::CategoryNotFound(id) => write!(f, "category not found with id: {id}"),
            Self::BookNotFound(id) => write!(f, "book not found with id: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    has_extended_code(err, ffi::SQLITE_CONSTRAINT_UNIQUE)
}

/// Matches both the deferred-check code and the one SQLite raises for
/// `ON DELETE RESTRICT` actions, which share the same message.
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    if has_extended_code(err, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
        return true;
    }
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            failure.extended_code == ffi::SQLITE_CONSTRAINT_TRIGGER
                && message == FOREIGN_KEY_MESSAGE
        }
        _ => false,
    }
}

fn has_extended_code(err: &rusqlite::Error, code: i32) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => failure.extended_code == code,
        _ => false,
    }
}
