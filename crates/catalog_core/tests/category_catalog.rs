use catalog_core::db::open_db_in_memory;
use catalog_core::{
    BookService, CatalogError, CategoryRepository, CategoryRequest, CategoryService,
    CreateBookRequest, ErrorKind, NewCategory, RepoError, SqliteCatalogStore,
    SqliteCategoryRepository,
};
use rusqlite::Connection;

fn category_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_get_and_list_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());

    let fiction = service
        .create(&CategoryRequest::new("Fiction", Some("Made-up stories")))
        .unwrap();
    let science = service.create(&CategoryRequest::new("Science", None)).unwrap();

    let loaded = service.get_by_id(fiction.id).unwrap();
    assert_eq!(loaded, fiction);
    assert_eq!(loaded.description.as_deref(), Some("Made-up stories"));

    let listed = service.list_all().unwrap();
    assert_eq!(listed, vec![fiction, science]);
}

#[test]
fn create_trims_name() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());

    let created = service.create(&CategoryRequest::new("  History ", None)).unwrap();
    assert_eq!(created.name, "History");
}

#[test]
fn duplicate_name_conflicts_and_keeps_first() {
    let mut conn = open_db_in_memory().unwrap();
    let first = {
        let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
        let first = service
            .create(&CategoryRequest::new("Programming", Some("code")))
            .unwrap();

        let err = service
            .create(&CategoryRequest::new("Programming", Some("other")))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategoryName(ref name) if name == "Programming"));
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let reloaded = service.get_by_id(first.id).unwrap();
        assert_eq!(reloaded, first);
        first
    };

    assert_eq!(category_count(&conn), 1);
    assert_eq!(first.description.as_deref(), Some("code"));
}

#[test]
fn blank_name_is_invalid() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
        let err = service.create(&CategoryRequest::new("   ", None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
    assert_eq!(category_count(&conn), 0);
}

#[test]
fn get_missing_category_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());

    let err = service.get_by_id(404).unwrap_err();
    assert!(matches!(err, CatalogError::CategoryNotFound(404)));
}

#[test]
fn update_replaces_name_and_description_wholesale() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());

    let created = service
        .create(&CategoryRequest::new("Sci-Fi", Some("spaceships")))
        .unwrap();
    let updated = service
        .update(created.id, &CategoryRequest::new("Science Fiction", None))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Science Fiction");
    assert_eq!(updated.description, None);
    assert_eq!(service.get_by_id(created.id).unwrap(), updated);
}

#[test]
fn update_to_same_name_is_allowed() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());

    let created = service.create(&CategoryRequest::new("Poetry", None)).unwrap();
    let updated = service
        .update(created.id, &CategoryRequest::new("Poetry", Some("verse")))
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("verse"));
}

#[test]
fn update_onto_existing_name_surfaces_store_conflict() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());

    let poetry = service.create(&CategoryRequest::new("Poetry", None)).unwrap();
    let drama = service.create(&CategoryRequest::new("Drama", Some("plays"))).unwrap();

    let err = service
        .update(drama.id, &CategoryRequest::new("Poetry", None))
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateCategoryName(ref name) if name == "Poetry"));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(service.get_by_id(drama.id).unwrap(), drama);
    assert_eq!(service.get_by_id(poetry.id).unwrap(), poetry);
}

#[test]
fn update_missing_category_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());

    let err = service
        .update(77, &CategoryRequest::new("Anything", None))
        .unwrap_err();
    assert!(matches!(err, CatalogError::CategoryNotFound(77)));
}

#[test]
fn delete_removes_unreferenced_category() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
        let created = service.create(&CategoryRequest::new("Temp", None)).unwrap();
        service.delete(created.id).unwrap();

        let err = service.get_by_id(created.id).unwrap_err();
        assert!(matches!(err, CatalogError::CategoryNotFound(_)));
    }
    assert_eq!(category_count(&conn), 0);
}

#[test]
fn delete_missing_category_is_not_found_and_changes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
        service.create(&CategoryRequest::new("Stays", None)).unwrap();

        let err = service.delete(999).unwrap_err();
        assert!(matches!(err, CatalogError::CategoryNotFound(999)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn delete_referenced_category_is_blocked() {
    let mut conn = open_db_in_memory().unwrap();
    let book = {
        let mut books = BookService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
        books
            .create(&CreateBookRequest {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                isbn: "978-0441013593".to_string(),
                publication_year: 1965,
                category_id: None,
                category_name: Some("Sci-Fi".to_string()),
            })
            .unwrap()
    };

    {
        let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
        let err = service.delete(book.category_id).unwrap_err();
        assert!(matches!(err, CatalogError::CategoryInUse(id) if id == book.category_id));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(service.get_by_id(book.category_id).is_ok());
    }

    let mut books = BookService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
    assert_eq!(books.get_by_id(book.id).unwrap(), book);
}

#[test]
fn store_level_delete_of_referenced_category_maps_foreign_key_failure() {
    let mut conn = open_db_in_memory().unwrap();
    let category_id = {
        let mut books = BookService::new(SqliteCatalogStore::try_new(&mut conn).unwrap());
        books
            .create(&CreateBookRequest {
                title: "Ficciones".to_string(),
                author: "Jorge Luis Borges".to_string(),
                isbn: "978-0802130303".to_string(),
                publication_year: 1944,
                category_id: None,
                category_name: Some("Short Stories".to_string()),
            })
            .unwrap()
            .category_id
    };

    let repo = SqliteCategoryRepository::new(&conn);
    let err = repo.delete_by_id(category_id).unwrap_err();
    assert!(matches!(err, RepoError::CategoryReferenced(id) if id == category_id));
}

#[test]
fn store_insert_of_duplicate_name_reports_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::new(&conn);

    repo.insert(&NewCategory::new("Unique", None)).unwrap();
    let err = repo.insert(&NewCategory::new("Unique", None)).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateCategoryName(ref name) if name == "Unique"));
    assert!(repo.find_by_name("Unique").unwrap().is_some());
}
