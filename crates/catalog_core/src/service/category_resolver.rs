//! Category resolution for new books.
//!
//! # Responsibility
//! - Map the category selectors of a book request onto one category.
//! - Create the category on the fly when only an unknown name is given.
//!
//! # Invariants
//! - `category_id` takes precedence; the name is ignored when an id is set.
//! - An existing category is returned unchanged; its description is never
//!   overwritten by resolution.
//! - At most one category exists per name. The store's unique constraint
//!   decides concurrent creators; the loser re-reads the winner once.

use crate::model::category::{normalize_category_name, Category, CategoryId, NewCategory};
use crate::model::validation::ValidationError;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use crate::service::{CatalogError, CatalogResult};
use log::{debug, info, warn};

/// Find-or-create resolver over a category store.
pub struct CategoryResolver<'a, C: CategoryRepository + ?Sized> {
    categories: &'a C,
}

impl<'a, C: CategoryRepository + ?Sized> CategoryResolver<'a, C> {
    pub fn new(categories: &'a C) -> Self {
        Self { categories }
    }

    /// Resolves the category to attach to a new book.
    ///
    /// # Errors
    /// - `CategoryNotFound` when `category_id` is set but unknown.
    /// - `Validation` when `category_name` is blank.
    /// - `MissingCategorySelector` when both selectors are absent.
    /// - `DuplicateCategoryName` when the insert lost a race and the winner
    ///   is still not visible on re-read.
    ///
    /// # Side effects
    /// - May insert one category. Lookup paths write nothing.
    pub fn resolve(
        &self,
        category_id: Option<CategoryId>,
        category_name: Option<&str>,
    ) -> CatalogResult<Category> {
        if let Some(id) = category_id {
            return self
                .categories
                .find_by_id(id)?
                .ok_or(CatalogError::CategoryNotFound(id));
        }

        let raw_name = category_name.ok_or(CatalogError::MissingCategorySelector)?;
        let name = normalize_category_name(raw_name)
            .ok_or(ValidationError::BlankField("categoryName"))?;

        if let Some(existing) = self.categories.find_by_name(&name)? {
            debug!(
                "event=category_resolve module=service status=ok path=existing category_id={}",
                existing.id
            );
            return Ok(existing);
        }

        match self.categories.insert(&NewCategory::auto_created(name.as_str())) {
            Ok(created) => {
                info!(
                    "event=category_resolve module=service status=ok path=created category_id={}",
                    created.id
                );
                Ok(created)
            }
            Err(RepoError::DuplicateCategoryName(_)) => {
                warn!("event=category_resolve module=service status=retry reason=lost_insert_race");
                self.categories
                    .find_by_name(&name)?
                    .ok_or(CatalogError::DuplicateCategoryName(name))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryResolver;
    use crate::model::category::{Category, CategoryId, NewCategory, AUTO_CREATED_DESCRIPTION};
    use crate::repo::category_repo::CategoryRepository;
    use crate::repo::{RepoError, RepoResult};
    use crate::service::CatalogError;
    use std::cell::{Cell, RefCell};

    /// How the fake reacts to the next insert.
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum InsertMode {
        Store,
        /// A concurrent writer commits the same name first.
        LoseRace,
        /// The insert is rejected but the winner never becomes visible.
        PhantomConflict,
    }

    struct FakeCategories {
        rows: RefCell<Vec<Category>>,
        insert_mode: Cell<InsertMode>,
        inserts: Cell<u32>,
        name_lookups: Cell<u32>,
    }

    impl FakeCategories {
        fn new(rows: Vec<Category>) -> Self {
            Self {
                rows: RefCell::new(rows),
                insert_mode: Cell::new(InsertMode::Store),
                inserts: Cell::new(0),
                name_lookups: Cell::new(0),
            }
        }

        fn push(&self, name: &str, description: Option<&str>) -> Category {
            let mut rows = self.rows.borrow_mut();
            let category = Category {
                id: rows.len() as CategoryId + 1,
                name: name.to_string(),
                description: description.map(str::to_string),
            };
            rows.push(category.clone());
            category
        }
    }

    impl CategoryRepository for FakeCategories {
        fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
            Ok(self.rows.borrow().iter().find(|row| row.id == id).cloned())
        }

        fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
            self.name_lookups.set(self.name_lookups.get() + 1);
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|row| row.name == name)
                .cloned())
        }

        fn find_all(&self) -> RepoResult<Vec<Category>> {
            Ok(self.rows.borrow().clone())
        }

        fn insert(&self, category: &NewCategory) -> RepoResult<Category> {
            self.inserts.set(self.inserts.get() + 1);
            match self.insert_mode.get() {
                InsertMode::Store => Ok(self.push(&category.name, category.description.as_deref())),
                InsertMode::LoseRace => {
                    self.push(&category.name, Some("created by the other writer"));
                    Err(RepoError::DuplicateCategoryName(category.name.clone()))
                }
                InsertMode::PhantomConflict => {
                    Err(RepoError::DuplicateCategoryName(category.name.clone()))
                }
            }
        }

        fn update(&self, category: &Category) -> RepoResult<Category> {
            Ok(category.clone())
        }

        fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
            Ok(self.rows.borrow().iter().any(|row| row.id == id))
        }

        fn delete_by_id(&self, id: CategoryId) -> RepoResult<()> {
            self.rows.borrow_mut().retain(|row| row.id != id);
            Ok(())
        }
    }

    #[test]
    fn id_takes_precedence_over_name() {
        let store = FakeCategories::new(Vec::new());
        let fiction = store.push("Fiction", None);
        store.push("X", None);

        let resolved = CategoryResolver::new(&store)
            .resolve(Some(fiction.id), Some("X"))
            .unwrap();
        assert_eq!(resolved, fiction);
        assert_eq!(store.name_lookups.get(), 0);
        assert_eq!(store.inserts.get(), 0);
    }

    #[test]
    fn unknown_id_fails_even_when_name_would_match() {
        let store = FakeCategories::new(Vec::new());
        store.push("X", None);

        let err = CategoryResolver::new(&store)
            .resolve(Some(42), Some("X"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::CategoryNotFound(42)));
    }

    #[test]
    fn missing_selectors_are_rejected() {
        let store = FakeCategories::new(Vec::new());
        let err = CategoryResolver::new(&store).resolve(None, None).unwrap_err();
        assert!(matches!(err, CatalogError::MissingCategorySelector));
    }

    #[test]
    fn blank_name_is_rejected_without_writing() {
        let store = FakeCategories::new(Vec::new());
        let err = CategoryResolver::new(&store)
            .resolve(None, Some("   "))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(store.inserts.get(), 0);
    }

    #[test]
    fn existing_name_keeps_its_description() {
        let store = FakeCategories::new(Vec::new());
        let poetry = store.push("Poetry", Some("verse"));

        let resolved = CategoryResolver::new(&store)
            .resolve(None, Some(" Poetry "))
            .unwrap();
        assert_eq!(resolved, poetry);
        assert_eq!(store.inserts.get(), 0);
    }

    #[test]
    fn unknown_name_is_created_with_auto_description() {
        let store = FakeCategories::new(Vec::new());

        let resolved = CategoryResolver::new(&store)
            .resolve(None, Some("Programming"))
            .unwrap();
        assert_eq!(resolved.name, "Programming");
        assert_eq!(resolved.description.as_deref(), Some(AUTO_CREATED_DESCRIPTION));
        assert_eq!(store.rows.borrow().len(), 1);
    }

    #[test]
    fn lost_insert_race_returns_the_winner() {
        let store = FakeCategories::new(Vec::new());
        store.insert_mode.set(InsertMode::LoseRace);

        let resolved = CategoryResolver::new(&store)
            .resolve(None, Some("Programming"))
            .unwrap();
        assert_eq!(resolved.name, "Programming");
        assert_eq!(
            resolved.description.as_deref(),
            Some("created by the other writer")
        );
        assert_eq!(store.inserts.get(), 1);
        assert_eq!(store.name_lookups.get(), 2);
        assert_eq!(store.rows.borrow().len(), 1);
    }

    #[test]
    fn conflict_surfaces_when_retry_still_misses() {
        let store = FakeCategories::new(Vec::new());
        store.insert_mode.set(InsertMode::PhantomConflict);

        let err = CategoryResolver::new(&store)
            .resolve(None, Some("Programming"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategoryName(ref name) if name == "Programming"));
        assert_eq!(store.inserts.get(), 1);
        assert_eq!(store.name_lookups.get(), 2);
    }
}
