// Library Catalog - Book holdings storage
// Copyright (C) 2025 Library Catalog contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Catalog service
//!
//! [`Catalog`] wraps a [`Database`] with the validation policy from
//! [`CatalogConfig`] and logs every mutation. Lookups that the query layer
//! returns as `Option` become `RecordNotFound` errors here.
//!
//! # Usage Example
//! ```no_run
//! use library_catalog::{Catalog, CatalogConfig};
//! use library_catalog::storage::{NewBook, NewBookData, NewLibrary};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> library_catalog::Result<()> {
//! let catalog = Catalog::open(&CatalogConfig::default()).await?;
//!
//! let central = catalog.create_library(&NewLibrary::new("Central", "1 Main St")).await?;
//! let published = NaiveDate::from_ymd_opt(1965, 8, 1).unwrap();
//! let dune = catalog
//!     .create_book_data(&NewBookData::new("Dune", "9780441013593", published, 412), &[])
//!     .await?;
//! catalog.create_book(&NewBook::new(dune.book_data_id, central.library_id)).await?;
//!
//! let summary = catalog.delete_library(central.library_id).await?;
//! assert_eq!(summary.books_removed, 1);
//! # Ok(())
//! # }
//! ```

use crate::config::{CatalogConfig, ValidationConfig};
use crate::error::{CatalogError, Result};
use crate::storage::queries::{self, DeleteSummary, LibraryHolding};
use crate::storage::validation::validate_isbn;
use crate::storage::{
    Author, Book, BookData, BookDataAuthor, Database, Library, NewAuthor, NewBook, NewBookData, NewLibrary,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Page size used by the unpaged listing helpers
const LIST_LIMIT: i64 = 1000;

/// Record counts per entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub libraries: i64,
    pub authors: i64,
    pub book_data: i64,
    pub books: i64,
    pub author_links: i64,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    db: Database,
    validation: ValidationConfig,
}

impl Catalog {
    /// Open (and migrate) the database named by `config`
    pub async fn open(config: &CatalogConfig) -> Result<Self> {
        let db = Database::connect(&config.database).await?;
        info!(
            path = ?db.path(),
            strict_isbn = config.validation.strict_isbn,
            "catalog opened"
        );
        Ok(Self::with_database(db, config.validation.clone()))
    }

    /// In-memory catalog for tests and scratch work
    pub async fn in_memory(validation: ValidationConfig) -> Result<Self> {
        let db = Database::new_in_memory().await?;
        Ok(Self::with_database(db, validation))
    }

    pub fn with_database(db: Database, validation: ValidationConfig) -> Self {
        Self { db, validation }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn close(self) -> Result<()> {
        self.db.close().await
    }

    fn check_isbn(&self, isbn: &str) -> Result<()> {
        if self.validation.strict_isbn {
            validate_isbn(isbn)?;
        }
        Ok(())
    }

    // ===== Libraries =====

    pub async fn create_library(&self, library: &NewLibrary) -> Result<Library> {
        let library_id = queries::insert_library(self.db.pool(), library).await?;
        info!(library_id, name = %library.name, "library created");
        self.get_library(library_id).await
    }

    pub async fn get_library(&self, library_id: i64) -> Result<Library> {
        queries::find_library_by_id(self.db.pool(), library_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Library {}", library_id)))
    }

    pub async fn update_library(&self, library: &Library) -> Result<()> {
        queries::update_library(self.db.pool(), library).await?;
        debug!(library_id = library.library_id, "library updated");
        Ok(())
    }

    pub async fn libraries(&self, limit: i64, offset: i64) -> Result<Vec<Library>> {
        queries::list_libraries(self.db.pool(), limit, offset).await
    }

    /// Delete a library and every copy it holds
    pub async fn delete_library(&self, library_id: i64) -> Result<DeleteSummary> {
        let summary = queries::delete_library(self.db.pool(), library_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Library {}", library_id)))?;
        info!(library_id, books_removed = summary.books_removed, "library deleted");
        Ok(summary)
    }

    /// Copies held by a library (the library's `books`)
    pub async fn library_books(&self, library_id: i64) -> Result<Vec<Book>> {
        self.get_library(library_id).await?;
        queries::list_books_by_library(self.db.pool(), library_id).await
    }

    pub async fn holdings(&self, library_id: i64) -> Result<Vec<LibraryHolding>> {
        self.get_library(library_id).await?;
        queries::list_holdings_by_library(self.db.pool(), library_id).await
    }

    // ===== Authors =====

    pub async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
        let author_id = queries::insert_author(self.db.pool(), author).await?;
        info!(author_id, name = %author.name, "author created");
        self.get_author(author_id).await
    }

    pub async fn get_author(&self, author_id: i64) -> Result<Author> {
        queries::find_author_by_id(self.db.pool(), author_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Author {}", author_id)))
    }

    pub async fn update_author(&self, author: &Author) -> Result<()> {
        queries::update_author(self.db.pool(), author).await?;
        debug!(author_id = author.author_id, "author updated");
        Ok(())
    }

    pub async fn authors(&self, limit: i64, offset: i64) -> Result<Vec<Author>> {
        queries::list_authors(self.db.pool(), limit, offset).await
    }

    pub async fn search_authors(&self, query: &str) -> Result<Vec<Author>> {
        queries::search_authors_by_name(self.db.pool(), query, LIST_LIMIT).await
    }

    /// Delete an author; their titles stay, only the links go
    pub async fn delete_author(&self, author_id: i64) -> Result<DeleteSummary> {
        let summary = queries::delete_author(self.db.pool(), author_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Author {}", author_id)))?;
        info!(author_id, links_removed = summary.links_removed, "author deleted");
        Ok(summary)
    }

    /// Titles written by an author (the author's `books`)
    pub async fn author_books(&self, author_id: i64) -> Result<Vec<BookData>> {
        self.get_author(author_id).await?;
        queries::find_book_data_by_author(self.db.pool(), author_id).await
    }

    pub async fn author_links(&self, author_id: i64) -> Result<Vec<BookDataAuthor>> {
        self.get_author(author_id).await?;
        queries::find_links_by_author(self.db.pool(), author_id).await
    }

    // ===== Book data =====

    /// Create book data and link `author_ids` atomically
    pub async fn create_book_data(&self, book_data: &NewBookData, author_ids: &[i64]) -> Result<BookData> {
        self.check_isbn(&book_data.isbn)?;

        let book_data_id = if author_ids.is_empty() {
            queries::insert_book_data(self.db.pool(), book_data).await?
        } else {
            queries::insert_book_data_with_authors(self.db.pool(), book_data, author_ids).await?
        };
        info!(book_data_id, isbn = %book_data.isbn, authors = author_ids.len(), "book data created");
        self.get_book_data(book_data_id).await
    }

    pub async fn get_book_data(&self, book_data_id: i64) -> Result<BookData> {
        queries::find_book_data_by_id(self.db.pool(), book_data_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("BookData {}", book_data_id)))
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> Result<Option<BookData>> {
        queries::find_book_data_by_isbn(self.db.pool(), isbn).await
    }

    pub async fn update_book_data(&self, book_data: &BookData) -> Result<()> {
        self.check_isbn(&book_data.isbn)?;
        queries::update_book_data(self.db.pool(), book_data).await?;
        debug!(book_data_id = book_data.book_data_id, "book data updated");
        Ok(())
    }

    /// Insert book data, or overwrite the record that already has this ISBN
    pub async fn upsert_book_data(&self, book_data: &NewBookData) -> Result<BookData> {
        self.check_isbn(&book_data.isbn)?;
        let book_data_id = queries::upsert_book_data(self.db.pool(), book_data).await?;
        info!(book_data_id, isbn = %book_data.isbn, "book data upserted");
        self.get_book_data(book_data_id).await
    }

    pub async fn titles(&self, limit: i64, offset: i64) -> Result<Vec<BookData>> {
        queries::list_book_data(self.db.pool(), limit, offset).await
    }

    pub async fn search_titles(&self, query: &str) -> Result<Vec<BookData>> {
        queries::search_book_data_by_title(self.db.pool(), query, LIST_LIMIT).await
    }

    /// Delete book data together with its copies and author links
    pub async fn delete_book_data(&self, book_data_id: i64) -> Result<DeleteSummary> {
        let summary = queries::delete_book_data(self.db.pool(), book_data_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("BookData {}", book_data_id)))?;
        info!(
            book_data_id,
            books_removed = summary.books_removed,
            links_removed = summary.links_removed,
            "book data deleted"
        );
        Ok(summary)
    }

    pub async fn book_data_authors(&self, book_data_id: i64) -> Result<Vec<Author>> {
        self.get_book_data(book_data_id).await?;
        queries::find_authors_by_book_data(self.db.pool(), book_data_id).await
    }

    /// Copies of a title across all libraries (the title's `books`)
    pub async fn book_data_copies(&self, book_data_id: i64) -> Result<Vec<Book>> {
        self.get_book_data(book_data_id).await?;
        queries::list_books_by_book_data(self.db.pool(), book_data_id).await
    }

    /// Returns `false` if the author was already linked
    pub async fn link_author(&self, book_data_id: i64, author_id: i64) -> Result<bool> {
        let added = queries::add_book_data_author(self.db.pool(), book_data_id, author_id).await?;
        debug!(book_data_id, author_id, added, "author linked");
        Ok(added)
    }

    /// Returns `false` if there was no such link
    pub async fn unlink_author(&self, book_data_id: i64, author_id: i64) -> Result<bool> {
        let removed = queries::remove_book_data_author(self.db.pool(), book_data_id, author_id).await?;
        debug!(book_data_id, author_id, removed, "author unlinked");
        Ok(removed)
    }

    pub async fn set_authors(&self, book_data_id: i64, author_ids: &[i64]) -> Result<()> {
        queries::set_book_data_authors(self.db.pool(), book_data_id, author_ids).await?;
        debug!(book_data_id, authors = author_ids.len(), "authors replaced");
        Ok(())
    }

    /// Remove every author link of a title; returns how many were removed
    pub async fn clear_authors(&self, book_data_id: i64) -> Result<u64> {
        self.get_book_data(book_data_id).await?;
        let removed = queries::clear_book_data_authors(self.db.pool(), book_data_id).await?;
        debug!(book_data_id, removed, "authors cleared");
        Ok(removed)
    }

    // ===== Books (copies) =====

    pub async fn create_book(&self, book: &NewBook) -> Result<Book> {
        let book_id = queries::insert_book(self.db.pool(), book).await?;
        info!(
            book_id,
            book_data_id = book.book_data_id,
            library_id = book.library_id,
            "copy added"
        );
        self.get_book(book_id).await
    }

    pub async fn get_book(&self, book_id: i64) -> Result<Book> {
        queries::find_book_by_id(self.db.pool(), book_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Book {}", book_id)))
    }

    /// Repoint a copy at another title and/or library
    pub async fn update_book(&self, book: &Book) -> Result<()> {
        queries::update_book(self.db.pool(), book).await?;
        debug!(
            book_id = book.book_id,
            book_data_id = book.book_data_id,
            library_id = book.library_id,
            "copy updated"
        );
        Ok(())
    }

    /// Move a copy to another library
    pub async fn move_book(&self, book_id: i64, library_id: i64) -> Result<Book> {
        let mut book = self.get_book(book_id).await?;
        book.library_id = library_id;
        queries::update_book(self.db.pool(), &book).await?;
        info!(book_id, library_id, "copy moved");
        Ok(book)
    }

    pub async fn delete_book(&self, book_id: i64) -> Result<()> {
        if !queries::delete_book(self.db.pool(), book_id).await? {
            return Err(CatalogError::not_found(format!("Book {}", book_id)));
        }
        info!(book_id, "copy removed");
        Ok(())
    }

    // ===== Maintenance =====

    pub async fn stats(&self) -> Result<CatalogStats> {
        let pool = self.db.pool();
        Ok(CatalogStats {
            libraries: queries::count_libraries(pool).await?,
            authors: queries::count_authors(pool).await?,
            book_data: queries::count_book_data(pool).await?,
            books: queries::count_books(pool).await?,
            author_links: queries::count_book_data_authors(pool).await?,
        })
    }

    pub async fn clear(&self) -> Result<()> {
        queries::clear_catalog(self.db.pool()).await?;
        info!("catalog cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn catalog(strict_isbn: bool) -> Catalog {
        Catalog::in_memory(ValidationConfig { strict_isbn })
            .await
            .expect("Failed to create catalog")
    }

    #[tokio::test]
    async fn test_strict_isbn_policy() {
        let lenient = catalog(false).await;
        let loose = NewBookData::new("Notes", "12345", date(2001, 1, 1), 10);
        assert!(lenient.create_book_data(&loose, &[]).await.is_ok());

        let strict = catalog(true).await;
        let err = strict.create_book_data(&loose, &[]).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { ref field, .. } if field == "isbn"));

        let good = NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412);
        assert!(strict.create_book_data(&good, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_author_keeps_book_data() {
        let catalog = catalog(false).await;

        let pratchett = catalog
            .create_author(&NewAuthor::new("Terry Pratchett", date(1948, 4, 28)))
            .await
            .unwrap();
        let gaiman = catalog
            .create_author(&NewAuthor::new("Neil Gaiman", date(1960, 11, 10)))
            .await
            .unwrap();

        let omens = catalog
            .create_book_data(
                &NewBookData::new("Good Omens", "9780060853983", date(1990, 5, 1), 412),
                &[pratchett.author_id, gaiman.author_id],
            )
            .await
            .unwrap();
        let mort = catalog
            .create_book_data(
                &NewBookData::new("Mort", "9780062225719", date(1987, 11, 12), 315),
                &[pratchett.author_id],
            )
            .await
            .unwrap();

        let summary = catalog.delete_author(pratchett.author_id).await.unwrap();
        assert_eq!(summary.links_removed, 2);
        assert_eq!(summary.books_removed, 0);

        assert!(catalog.get_book_data(mort.book_data_id).await.is_ok());
        let remaining = catalog.book_data_authors(omens.book_data_id).await.unwrap();
        assert_eq!(remaining, vec![gaiman]);
    }

    #[tokio::test]
    async fn test_delete_book_data_cascades() {
        let catalog = catalog(false).await;

        let central = catalog.create_library(&NewLibrary::new("Central", "1 Main St")).await.unwrap();
        let branch = catalog.create_library(&NewLibrary::new("Branch", "9 Elm St")).await.unwrap();
        let dune = catalog
            .create_book_data(&NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412), &[])
            .await
            .unwrap();

        catalog.create_book(&NewBook::new(dune.book_data_id, central.library_id)).await.unwrap();
        catalog.create_book(&NewBook::new(dune.book_data_id, central.library_id)).await.unwrap();
        catalog.create_book(&NewBook::new(dune.book_data_id, branch.library_id)).await.unwrap();

        let summary = catalog.delete_book_data(dune.book_data_id).await.unwrap();
        assert_eq!(summary.books_removed, 3);

        let stats = catalog.stats().await.unwrap();
        assert_eq!(stats.books, 0);
        assert_eq!(stats.libraries, 2);
    }

    #[tokio::test]
    async fn test_move_book() {
        let catalog = catalog(false).await;

        let central = catalog.create_library(&NewLibrary::new("Central", "1 Main St")).await.unwrap();
        let branch = catalog.create_library(&NewLibrary::new("Branch", "9 Elm St")).await.unwrap();
        let dune = catalog
            .create_book_data(&NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412), &[])
            .await
            .unwrap();
        let copy = catalog.create_book(&NewBook::new(dune.book_data_id, central.library_id)).await.unwrap();

        let moved = catalog.move_book(copy.book_id, branch.library_id).await.unwrap();
        assert_eq!(moved.library_id, branch.library_id);
        assert!(catalog.library_books(central.library_id).await.unwrap().is_empty());
        assert_eq!(catalog.library_books(branch.library_id).await.unwrap().len(), 1);

        let err = catalog.move_book(copy.book_id, 999).await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingReference { entity: "Library", id: 999 }));
    }

    #[tokio::test]
    async fn test_upsert_applies_isbn_policy() {
        let strict = catalog(true).await;

        let bad = NewBookData::new("Dune", "9780441013594", date(1965, 8, 1), 412);
        let err = strict.upsert_book_data(&bad).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { ref field, .. } if field == "isbn"));
        assert!(strict.titles(10, 0).await.unwrap().is_empty());

        let first = strict
            .upsert_book_data(&NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412))
            .await
            .unwrap();
        let second = strict
            .upsert_book_data(&NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 896))
            .await
            .unwrap();
        assert_eq!(first.book_data_id, second.book_data_id);
        assert_eq!(second.page_count, 896);
    }

    #[tokio::test]
    async fn test_author_links_and_clear() {
        let catalog = catalog(false).await;

        let herbert = catalog
            .create_author(&NewAuthor::new("Frank Herbert", date(1920, 10, 8)))
            .await
            .unwrap();
        let dune = catalog
            .create_book_data(
                &NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412),
                &[herbert.author_id],
            )
            .await
            .unwrap();

        let links = catalog.author_links(herbert.author_id).await.unwrap();
        assert_eq!(
            links,
            vec![BookDataAuthor {
                book_data_id: dune.book_data_id,
                author_id: herbert.author_id,
            }]
        );

        assert_eq!(catalog.clear_authors(dune.book_data_id).await.unwrap(), 1);
        assert!(catalog.book_data_authors(dune.book_data_id).await.unwrap().is_empty());
        assert!(matches!(catalog.clear_authors(999).await, Err(CatalogError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_book_switches_title() {
        let catalog = catalog(false).await;

        let central = catalog.create_library(&NewLibrary::new("Central", "1 Main St")).await.unwrap();
        let dune = catalog
            .create_book_data(&NewBookData::new("Dune", "9780441013593", date(1965, 8, 1), 412), &[])
            .await
            .unwrap();
        let messiah = catalog
            .create_book_data(&NewBookData::new("Dune Messiah", "9780593098233", date(1969, 10, 15), 256), &[])
            .await
            .unwrap();
        let mut copy = catalog.create_book(&NewBook::new(dune.book_data_id, central.library_id)).await.unwrap();

        copy.book_data_id = messiah.book_data_id;
        catalog.update_book(&copy).await.unwrap();
        assert_eq!(catalog.book_data_copies(messiah.book_data_id).await.unwrap(), vec![copy]);
        assert!(catalog.book_data_copies(dune.book_data_id).await.unwrap().is_empty());

        let ghost = Book { book_id: 999, book_data_id: 1234, library_id: 5678 };
        assert!(matches!(catalog.update_book(&ghost).await, Err(CatalogError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_records() {
        let catalog = catalog(false).await;

        assert!(matches!(catalog.delete_library(1).await, Err(CatalogError::RecordNotFound(_))));
        assert!(matches!(catalog.delete_book(1).await, Err(CatalogError::RecordNotFound(_))));
        assert!(matches!(catalog.holdings(1).await, Err(CatalogError::RecordNotFound(_))));
    }
}
