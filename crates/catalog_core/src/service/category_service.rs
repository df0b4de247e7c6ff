//! Category use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete entry points for categories.
//!
//! # Invariants
//! - `create` pre-checks name uniqueness; the store constraint still backs
//!   it against concurrent creators.
//! - `update` replaces name and description wholesale and relies on the
//!   store constraint for uniqueness, reported as `DuplicateCategoryName`.
//! - A category referenced by any book cannot be deleted.

use crate::model::category::{normalize_category_name, Category, CategoryId, NewCategory};
use crate::model::validation::ValidationError;
use crate::repo::store::CatalogStore;
use crate::service::{CatalogError, CatalogResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Category create/update input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryRequest {
    pub fn new(name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
        }
    }

    fn normalized_name(&self) -> Result<String, ValidationError> {
        normalize_category_name(&self.name).ok_or(ValidationError::BlankField("name"))
    }
}

/// Category read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

/// Category service facade over a catalog store.
pub struct CategoryService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> CategoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a category with a name no other category uses.
    ///
    /// # Errors
    /// - `Validation` when the name is blank.
    /// - `DuplicateCategoryName` when the name is taken; the existing
    ///   category is left untouched.
    pub fn create(&mut self, request: &CategoryRequest) -> CatalogResult<CategoryResponse> {
        let name = request.normalized_name()?;
        let result = self
            .store
            .write(|categories, _| -> CatalogResult<Category> {
                if categories.find_by_name(&name)?.is_some() {
                    return Err(CatalogError::DuplicateCategoryName(name.clone()));
                }
                let created =
                    categories.insert(&NewCategory::new(name.as_str(), request.description.clone()))?;
                Ok(created)
            });
        log_outcome("category_create", result.as_ref().map(|created| created.id));
        result.map(CategoryResponse::from)
    }

    /// Gets one category by id.
    pub fn get_by_id(&mut self, id: CategoryId) -> CatalogResult<CategoryResponse> {
        self.store
            .read(|categories, _| -> CatalogResult<Category> {
                categories
                    .find_by_id(id)?
                    .ok_or(CatalogError::CategoryNotFound(id))
            })
            .map(CategoryResponse::from)
    }

    /// Lists every category in id order.
    pub fn list_all(&mut self) -> CatalogResult<Vec<CategoryResponse>> {
        let categories = self
            .store
            .read(|categories, _| -> CatalogResult<Vec<Category>> { Ok(categories.find_all()?) })?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    /// Replaces name and description of an existing category.
    ///
    /// A `None` description clears the stored one.
    ///
    /// # Errors
    /// - `CategoryNotFound` when the id is unknown.
    /// - `DuplicateCategoryName` when another category already has the name.
    pub fn update(
        &mut self,
        id: CategoryId,
        request: &CategoryRequest,
    ) -> CatalogResult<CategoryResponse> {
        let name = request.normalized_name()?;
        let result = self
            .store
            .write(|categories, _| -> CatalogResult<Category> {
                let mut category = categories
                    .find_by_id(id)?
                    .ok_or(CatalogError::CategoryNotFound(id))?;
                category.name = name;
                category.description = request.description.clone();
                Ok(categories.update(&category)?)
            });
        log_outcome("category_update", result.as_ref().map(|updated| updated.id));
        result.map(CategoryResponse::from)
    }

    /// Deletes a category that no book references.
    ///
    /// # Errors
    /// - `CategoryNotFound` when the id is unknown.
    /// - `CategoryInUse` when books still reference it; nothing changes.
    pub fn delete(&mut self, id: CategoryId) -> CatalogResult<()> {
        let result = self
            .store
            .write(|categories, books| -> CatalogResult<()> {
                if !categories.exists_by_id(id)? {
                    return Err(CatalogError::CategoryNotFound(id));
                }
                let book_count = books.count_by_category(id)?;
                if book_count > 0 {
                    warn!(
                        "event=category_delete module=service status=blocked category_id={id} book_count={book_count}"
                    );
                    return Err(CatalogError::CategoryInUse(id));
                }
                categories.delete_by_id(id)?;
                Ok(())
            });
        log_outcome("category_delete", result.as_ref().map(|_| id));
        result
    }
}

fn log_outcome(event: &str, result: Result<CategoryId, &CatalogError>) {
    match result {
        Ok(category_id) => info!("event={event} module=service status=ok category_id={category_id}"),
        Err(err) => warn!(
            "event={event} module=service status=error error_kind={}",
            err.kind()
        ),
    }
}
