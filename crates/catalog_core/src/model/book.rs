//! Book domain model.
//!
//! # Invariants
//! - `title`, `author` and `isbn` are non-blank. `isbn` is not unique.
//! - `publication_year` is strictly positive.
//! - `category_id` points to a category that existed when the book was
//!   created.

use crate::model::category::CategoryId;
use crate::model::validation::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned book identifier.
pub type BookId = i64;

/// Persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub category_id: CategoryId,
}

impl Book {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.author, &self.isbn, self.publication_year)
    }
}

/// Book draft with an already resolved category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub category_id: CategoryId,
}

impl NewBook {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.author, &self.isbn, self.publication_year)
    }
}

/// Checks the book fields in declaration order and reports the first failure.
pub fn validate_fields(
    title: &str,
    author: &str,
    isbn: &str,
    publication_year: i32,
) -> Result<(), ValidationError> {
    require_non_blank("title", title)?;
    require_non_blank("author", author)?;
    require_non_blank("isbn", isbn)?;
    if publication_year <= 0 {
        return Err(ValidationError::NonPositivePublicationYear(publication_year));
    }
    Ok(())
}
