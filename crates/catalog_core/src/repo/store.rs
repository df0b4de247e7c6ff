//! Unit-of-work capability over the category and book stores.
//!
//! # Responsibility
//! - Run service logic against both stores inside one SQLite transaction.
//! - Commit when the closure returns `Ok`, roll back when it returns `Err`.
//!
//! # Invariants
//! - Write units start with `BEGIN IMMEDIATE`, so concurrent writers on the
//!   same database file serialize on the write lock instead of failing at
//!   commit time.
//! - Nothing written inside a failed unit stays visible.

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{Connection, TransactionBehavior};

/// Transactional access to the catalog stores.
pub trait CatalogStore {
    /// Runs read-only work against one consistent snapshot.
    fn read<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn CategoryRepository, &dyn BookRepository) -> Result<T, E>,
        E: From<RepoError>;

    /// Runs work that may write, committing only when it succeeds.
    fn write<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn CategoryRepository, &dyn BookRepository) -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed unit of work bound to one connection.
pub struct SqliteCatalogStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCatalogStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn run<T, E, F>(&mut self, behavior: TransactionBehavior, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn CategoryRepository, &dyn BookRepository) -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(behavior)
            .map_err(RepoError::from)?;

        let outcome = {
            let categories = SqliteCategoryRepository::new(&tx);
            let books = SqliteBookRepository::new(&tx);
            work(&categories, &books)
        };

        match outcome {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                Ok(value)
            }
            Err(err) => {
                // Dropping the transaction rolls it back; the work error wins
                // over any rollback failure.
                drop(tx);
                debug!("event=unit_of_work module=repo status=rollback");
                Err(err)
            }
        }
    }
}

impl CatalogStore for SqliteCatalogStore<'_> {
    fn read<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn CategoryRepository, &dyn BookRepository) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.run(TransactionBehavior::Deferred, work)
    }

    fn write<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn CategoryRepository, &dyn BookRepository) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.run(TransactionBehavior::Immediate, work)
    }
}
