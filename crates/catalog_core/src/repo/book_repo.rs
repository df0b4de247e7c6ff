//! Book store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert, lookup, listing, delete and existence checks over
//!   `books`.
//!
//! # Invariants
//! - Inserting a book whose `category_id` does not exist fails with
//!   `RepoError::CategoryNotFound`; the foreign key is the backstop.
//! - Listing order is insertion (id) order.

use crate::model::book::{Book, BookId, NewBook};
use crate::model::category::CategoryId;
use crate::repo::error::is_foreign_key_violation;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    isbn,
    publication_year,
    category_id
FROM books";

/// Persistence capability for book records.
pub trait BookRepository {
    /// Inserts a draft and returns the stored record with its new id.
    fn insert(&self, book: &NewBook) -> RepoResult<Book>;
    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Returns every book in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Book>>;
    fn exists_by_id(&self, id: BookId) -> RepoResult<bool>;
    fn delete_by_id(&self, id: BookId) -> RepoResult<()>;
    /// Counts books referencing the given category.
    fn count_by_category(&self, category_id: CategoryId) -> RepoResult<u64>;
}

/// SQLite-backed book store.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert(&self, book: &NewBook) -> RepoResult<Book> {
        book.validate()?;

        self.conn
            .execute(
                "INSERT INTO books (
                    title,
                    author,
                    isbn,
                    publication_year,
                    category_id
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    book.title.as_str(),
                    book.author.as_str(),
                    book.isbn.as_str(),
                    book.publication_year,
                    book.category_id,
                ],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::CategoryNotFound(book.category_id)
                } else {
                    err.into()
                }
            })?;

        Ok(Book {
            id: self.conn.last_insert_rowid(),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            publication_year: book.publication_year,
            category_id: book.category_id,
        })
    }

    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn exists_by_id(&self, id: BookId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: BookId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::BookNotFound(id));
        }

        Ok(())
    }

    fn count_by_category(&self, category_id: CategoryId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM books WHERE category_id = ?1;",
            [category_id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative book count `{count}`")))
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        isbn: row.get("isbn")?,
        publication_year: row.get("publication_year")?,
        category_id: row.get("category_id")?,
    };
    book.validate().map_err(|err| {
        RepoError::InvalidData(format!("book {} failed validation: {err}", book.id))
    })?;
    Ok(book)
}
