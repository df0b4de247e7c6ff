//! Core domain logic for the book catalog.
//! This crate owns the category find-or-create rules and the consistency
//! guarantees around them; transports stay thin on top of it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookId, NewBook};
pub use model::category::{Category, CategoryId, NewCategory, AUTO_CREATED_DESCRIPTION};
pub use model::validation::ValidationError;
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::store::{CatalogStore, SqliteCatalogStore};
pub use repo::{RepoError, RepoResult};
pub use service::book_service::{BookResponse, BookService, CreateBookRequest};
pub use service::category_resolver::CategoryResolver;
pub use service::category_service::{CategoryRequest, CategoryResponse, CategoryService};
pub use service::{CatalogError, CatalogResult, ErrorKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
