//! Book use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/delete entry points for books.
//! - Attach each new book to a category resolved by `CategoryResolver`.
//! - Compose book responses from the book and its category record.
//!
//! # Invariants
//! - Category resolution and the book insert run in one unit of work. A
//!   failed book insert also undoes a category created by resolution.
//! - Request validation happens before any store access.
//! - Deleting a book never touches its category.

use crate::model::book::{validate_fields, Book, BookId, NewBook};
use crate::model::category::{Category, CategoryId};
use crate::repo::store::CatalogStore;
use crate::service::category_resolver::CategoryResolver;
use crate::service::{CatalogError, CatalogResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Book creation input.
///
/// At least one of `category_id` / `category_name` is required; the id wins
/// when both are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl CreateBookRequest {
    fn to_new_book(&self, category_id: CategoryId) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            publication_year: self.publication_year,
            category_id,
        }
    }
}

/// Book read model with its category id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
    pub category_id: CategoryId,
    pub category_name: String,
}

impl BookResponse {
    fn from_parts(book: Book, category: &Category) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            publication_year: book.publication_year,
            category_id: category.id,
            category_name: category.name.clone(),
        }
    }
}

/// Book service facade over a catalog store.
pub struct BookService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> BookService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a book, resolving or creating its category first.
    ///
    /// # Errors
    /// - `Validation` for blank text fields or a non-positive year.
    /// - `MissingCategorySelector` when no category selector is given.
    /// - `CategoryNotFound` when `category_id` is unknown; no book is
    ///   written.
    pub fn create(&mut self, request: &CreateBookRequest) -> CatalogResult<BookResponse> {
        let started_at = Instant::now();
        let result = self.create_inner(request);
        match &result {
            Ok(created) => info!(
                "event=book_create module=service status=ok book_id={} category_id={} duration_ms={}",
                created.id,
                created.category_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=book_create module=service status=error error_kind={} duration_ms={}",
                err.kind(),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn create_inner(&mut self, request: &CreateBookRequest) -> CatalogResult<BookResponse> {
        validate_fields(
            &request.title,
            &request.author,
            &request.isbn,
            request.publication_year,
        )?;

        self.store.write(|categories, books| -> CatalogResult<BookResponse> {
            let category = CategoryResolver::new(categories)
                .resolve(request.category_id, request.category_name.as_deref())?;
            let book = books.insert(&request.to_new_book(category.id))?;
            Ok(BookResponse::from_parts(book, &category))
        })
    }

    /// Gets one book by id.
    pub fn get_by_id(&mut self, id: BookId) -> CatalogResult<BookResponse> {
        self.store.read(|categories, books| -> CatalogResult<BookResponse> {
            let book = books
                .find_by_id(id)?
                .ok_or(CatalogError::BookNotFound(id))?;
            let category = categories
                .find_by_id(book.category_id)?
                .ok_or(CatalogError::InconsistentState(
                    "book references a missing category",
                ))?;
            Ok(BookResponse::from_parts(book, &category))
        })
    }

    /// Lists every book in insertion order from one snapshot.
    pub fn list_all(&mut self) -> CatalogResult<Vec<BookResponse>> {
        self.store.read(|categories, books| -> CatalogResult<Vec<BookResponse>> {
            let mut category_cache: BTreeMap<CategoryId, Category> = BTreeMap::new();
            let mut items = Vec::new();
            for book in books.find_all()? {
                if !category_cache.contains_key(&book.category_id) {
                    let category = categories.find_by_id(book.category_id)?.ok_or(
                        CatalogError::InconsistentState("book references a missing category"),
                    )?;
                    category_cache.insert(category.id, category);
                }
                let category = &category_cache[&book.category_id];
                items.push(BookResponse::from_parts(book, category));
            }
            Ok(items)
        })
    }

    /// Deletes one book by id.
    ///
    /// # Errors
    /// - `BookNotFound` when the id is unknown; nothing changes.
    pub fn delete(&mut self, id: BookId) -> CatalogResult<()> {
        self.store.write(|_, books| -> CatalogResult<()> {
            if !books.exists_by_id(id)? {
                return Err(CatalogError::BookNotFound(id));
            }
            books.delete_by_id(id)?;
            info!("event=book_delete module=service status=ok book_id={id}");
            Ok(())
        })
    }
}
