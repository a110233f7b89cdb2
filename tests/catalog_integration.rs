//! Integration tests for the catalog on an on-disk database
//!
//! Covers the cascade and uniqueness guarantees end to end through the
//! public `Catalog` API, plus config-driven opening.

use chrono::NaiveDate;
use library_catalog::config::{CatalogConfig, DatabaseConfig, ValidationConfig};
use library_catalog::storage::{NewAuthor, NewBook, NewBookData, NewLibrary};
use library_catalog::{Catalog, CatalogError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn open_temp(dir: &tempfile::TempDir) -> Catalog {
    let config = CatalogConfig {
        database: DatabaseConfig {
            path: Some(dir.path().join("catalog.db")),
            ..DatabaseConfig::default()
        },
        ..CatalogConfig::default()
    };
    Catalog::open(&config).await.expect("Failed to open catalog")
}

#[tokio::test]
async fn test_deleting_library_keeps_book_data() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_temp(&dir).await;

    let central = catalog
        .create_library(&NewLibrary::new("Central", "1 Main St"))
        .await
        .unwrap();
    let dune = catalog
        .create_book_data(&NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412), &[])
        .await
        .unwrap();
    let copy = catalog
        .create_book(&NewBook::new(dune.book_data_id, central.library_id))
        .await
        .unwrap();

    let summary = catalog.delete_library(central.library_id).await.unwrap();
    assert_eq!(summary.books_removed, 1);

    assert!(matches!(
        catalog.get_book(copy.book_id).await,
        Err(CatalogError::RecordNotFound(_))
    ));
    let still_there = catalog.find_by_isbn("9780441013593").await.unwrap();
    assert_eq!(still_there.map(|b| b.title), Some("Dune".to_string()));
}

#[tokio::test]
async fn test_isbn_unique_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let catalog = open_temp(&dir).await;
    catalog
        .create_book_data(&NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412), &[])
        .await
        .unwrap();
    catalog.close().await.unwrap();

    let catalog = open_temp(&dir).await;
    let err = catalog
        .create_book_data(
            &NewBookData::new("Dune Deluxe", "9780441013593", date(2019, 10, 1), 896),
            &[],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::DuplicateIsbn(_)));
    assert!(err.is_constraint_violation());
    assert_eq!(catalog.stats().await.unwrap().book_data, 1);
}

#[tokio::test]
async fn test_many_copies_across_libraries() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_temp(&dir).await;

    let herbert = catalog
        .create_author(&NewAuthor::new("Frank Herbert", date(1920, 10, 8)))
        .await
        .unwrap();
    let central = catalog
        .create_library(&NewLibrary::new("Central", "1 Main St"))
        .await
        .unwrap();
    let branch = catalog
        .create_library(&NewLibrary::new("Branch", "9 Elm St"))
        .await
        .unwrap();
    let dune = catalog
        .create_book_data(
            &NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412),
            &[herbert.author_id],
        )
        .await
        .unwrap();

    for library_id in [central.library_id, central.library_id, branch.library_id] {
        catalog
            .create_book(&NewBook::new(dune.book_data_id, library_id))
            .await
            .unwrap();
    }

    assert_eq!(catalog.book_data_copies(dune.book_data_id).await.unwrap().len(), 3);
    assert_eq!(catalog.holdings(central.library_id).await.unwrap().len(), 2);

    let written = catalog.author_books(herbert.author_id).await.unwrap();
    assert_eq!(written, vec![dune.clone()]);

    let summary = catalog.delete_library(central.library_id).await.unwrap();
    assert_eq!(summary.books_removed, 2);
    assert_eq!(catalog.stats().await.unwrap().books, 1);

    let summary = catalog.delete_book_data(dune.book_data_id).await.unwrap();
    assert_eq!(summary.books_removed, 1);
    assert_eq!(summary.links_removed, 1);

    // The author outlives their titles
    assert!(catalog.get_author(herbert.author_id).await.is_ok());
    let stats = catalog.stats().await.unwrap();
    assert_eq!(stats.books, 0);
    assert_eq!(stats.author_links, 0);
}

#[tokio::test]
async fn test_copy_requires_existing_parents() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_temp(&dir).await;

    let central = catalog
        .create_library(&NewLibrary::new("Central", "1 Main St"))
        .await
        .unwrap();

    let err = catalog
        .create_book(&NewBook::new(77, central.library_id))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::MissingReference { entity: "BookData", id: 77 }));
}

#[tokio::test]
async fn test_field_limits_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_temp(&dir).await;

    let err = catalog
        .create_library(&NewLibrary::new("x".repeat(201), "1 Main St"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation { ref field, .. } if field == "name"));

    let err = catalog
        .create_author(&NewAuthor::new("", date(1900, 1, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation { .. }));

    assert_eq!(catalog.stats().await.unwrap().libraries, 0);
}

#[tokio::test]
async fn test_config_file_enables_strict_isbn() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("catalog.toml");
    let db_path = dir.path().join("strict.db");

    std::fs::write(
        &config_path,
        format!(
            "[database]\npath = {:?}\n\n[validation]\nstrict_isbn = true\n",
            db_path.display().to_string()
        ),
    )
    .unwrap();

    let config = CatalogConfig::load(&config_path).expect("Failed to load config");
    assert!(config.validation.strict_isbn);

    let catalog = Catalog::open(&config).await.unwrap();
    let err = catalog
        .create_book_data(&NewBookData::new("Typo", "9780441013594", date(1965, 8, 1), 412), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation { .. }));
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_lenient_catalog_accepts_short_isbn() {
    let catalog = Catalog::in_memory(ValidationConfig::default()).await.unwrap();

    let record = catalog
        .create_book_data(&NewBookData::new("Zine", "Z-001", date(2020, 2, 2), 0), &[])
        .await
        .unwrap();
    assert_eq!(record.page_count, 0);
}
