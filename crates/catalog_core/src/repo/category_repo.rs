//! Category store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup by id and by unique name, insert, update, delete and
//!   existence checks over `categories`.
//!
//! # Invariants
//! - Names are persisted exactly as given; callers normalize them first.
//! - Unique-name violations map to `RepoError::DuplicateCategoryName`.
//! - Deleting a category still referenced by books maps to
//!   `RepoError::CategoryReferenced`.

use crate::model::category::{Category, CategoryId, NewCategory};
use crate::repo::error::{is_foreign_key_violation, is_unique_violation};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, description FROM categories";

/// Persistence capability for category records.
pub trait CategoryRepository {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Returns every category ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Category>>;
    /// Inserts a draft and returns the stored record with its new id.
    fn insert(&self, category: &NewCategory) -> RepoResult<Category>;
    /// Replaces name and description of an existing category.
    fn update(&self, category: &Category) -> RepoResult<Category>;
    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool>;
    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()>;
}

/// SQLite-backed category store.
///
/// Works on a plain connection or, through deref, on an open transaction.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_category_row)?;
        let categories = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    fn insert(&self, category: &NewCategory) -> RepoResult<Category> {
        category.validate()?;

        self.conn
            .execute(
                "INSERT INTO categories (name, description) VALUES (?1, ?2);",
                params![category.name.as_str(), category.description.as_deref()],
            )
            .map_err(|err| map_name_write_error(err, &category.name))?;

        Ok(Category {
            id: self.conn.last_insert_rowid(),
            name: category.name.clone(),
            description: category.description.clone(),
        })
    }

    fn update(&self, category: &Category) -> RepoResult<Category> {
        category.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE categories
                 SET
                    name = ?1,
                    description = ?2
                 WHERE id = ?3;",
                params![
                    category.name.as_str(),
                    category.description.as_deref(),
                    category.id,
                ],
            )
            .map_err(|err| map_name_write_error(err, &category.name))?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(category.id));
        }

        Ok(category.clone())
    }

    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::CategoryReferenced(id)
                } else {
                    err.into()
                }
            })?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }

        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

fn map_name_write_error(err: rusqlite::Error, name: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateCategoryName(name.to_string())
    } else {
        err.into()
    }
}
