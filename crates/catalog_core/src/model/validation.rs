//! Field validation errors for catalog records.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for a draft or persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    BlankField(&'static str),
    /// Publication year must be strictly positive.
    NonPositivePublicationYear(i32),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} is required"),
            Self::NonPositivePublicationYear(year) => {
                write!(f, "publicationYear must be positive, got {year}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
