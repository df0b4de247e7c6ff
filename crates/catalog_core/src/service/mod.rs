//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into book and category use-cases.
//! - Resolve the category of a new book with find-or-create semantics.
//! - Convert persisted records into response shapes.
//!
//! # Invariants
//! - Services receive their stores explicitly; there is no global handle.
//! - Not-found and conflict conditions are surfaced unchanged, never
//!   swallowed or downgraded.

pub mod book_service;
pub mod category_resolver;
pub mod category_service;
mod error;

pub use error::{CatalogError, CatalogResult, ErrorKind};
