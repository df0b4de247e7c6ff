//! Store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the persistence capabilities the catalog services depend on.
//! - Isolate SQLite query details from service orchestration.
//! - Translate SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - Repository writes validate records before touching SQL.
//! - A duplicate category name always surfaces as
//!   `RepoError::DuplicateCategoryName`, never as a raw SQLite error.

pub mod book_repo;
pub mod category_repo;
mod error;
pub mod store;

pub use error::{RepoError, RepoResult};
