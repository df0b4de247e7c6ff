//! Category domain model.
//!
//! # Invariants
//! - `name` is trimmed and non-empty.
//! - `name` is unique across all categories; the store enforces this.

use crate::model::validation::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned category identifier.
pub type CategoryId = i64;

/// Description given to categories created implicitly by name resolution.
pub const AUTO_CREATED_DESCRIPTION: &str = "Auto-created category";

/// Persisted category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)
    }
}

/// Category draft that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Draft used by find-or-create when no category with `name` exists.
    pub fn auto_created(name: impl Into<String>) -> Self {
        Self::new(name, Some(AUTO_CREATED_DESCRIPTION.to_string()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)
    }
}

/// Normalizes a category name for lookup and persistence.
///
/// Returns `None` when nothing is left after trimming.
pub fn normalize_category_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
