use crate::model::book::BookId;
use crate::model::category::CategoryId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Coarse error classification for transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced id does not exist.
    NotFound,
    /// Uniqueness or reference constraint blocks the operation.
    Conflict,
    /// Request is malformed or incomplete.
    InvalidRequest,
    /// Store or consistency failure unrelated to the request content.
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service error for book and category use-cases.
#[derive(Debug)]
pub enum CatalogError {
    BookNotFound(BookId),
    CategoryNotFound(CategoryId),
    /// Another category already uses this name.
    DuplicateCategoryName(String),
    /// Category is still referenced by at least one book.
    CategoryInUse(CategoryId),
    /// Book creation carried neither a category id nor a category name.
    MissingCategorySelector,
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Stored records contradict each other.
    InconsistentState(&'static str),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BookNotFound(_) | Self::CategoryNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateCategoryName(_) | Self::CategoryInUse(_) => ErrorKind::Conflict,
            Self::MissingCategorySelector | Self::Validation(_) => ErrorKind::InvalidRequest,
            Self::Repo(_) | Self::InconsistentState(_) => ErrorKind::Internal,
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookNotFound(id) => write!(f, "book not found with id: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found with id: {id}"),
            Self::DuplicateCategoryName(name) => {
                write!(f, "category with name '{name}' already exists")
            }
            Self::CategoryInUse(id) => {
                write!(f, "category {id} is still referenced by books")
            }
            Self::MissingCategorySelector => {
                write!(f, "category id or category name must be provided")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent catalog state: {details}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::BookNotFound(id) => Self::BookNotFound(id),
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            RepoError::DuplicateCategoryName(name) => Self::DuplicateCategoryName(name),
            RepoError::CategoryReferenced(id) => Self::CategoryInUse(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, ErrorKind};
    use crate::model::validation::ValidationError;
    use crate::repo::RepoError;

    #[test]
    fn store_errors_are_promoted_to_semantic_variants() {
        let conflict: CatalogError = RepoError::DuplicateCategoryName("Poetry".into()).into();
        assert!(matches!(conflict, CatalogError::DuplicateCategoryName(ref name) if name == "Poetry"));
        assert_eq!(conflict.kind(), ErrorKind::Conflict);

        let missing: CatalogError = RepoError::CategoryNotFound(7).into();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let referenced: CatalogError = RepoError::CategoryReferenced(3).into();
        assert!(matches!(referenced, CatalogError::CategoryInUse(3)));
    }

    #[test]
    fn request_errors_classify_as_invalid_request() {
        assert_eq!(
            CatalogError::MissingCategorySelector.kind(),
            ErrorKind::InvalidRequest
        );
        let invalid: CatalogError = ValidationError::BlankField("title").into();
        assert_eq!(invalid.kind(), ErrorKind::InvalidRequest);
        assert_eq!(invalid.to_string(), "title is required");
    }
}
