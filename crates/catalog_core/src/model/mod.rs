//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted `Category` and `Book` records and their drafts.
//! - Own field-level validation shared by stores and services.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never change.
//! - A `Book` references its `Category` by id only; callers needing the
//!   category record fetch it separately.

pub mod book;
pub mod category;
pub mod validation;
