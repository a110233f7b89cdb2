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


//! Database query functions
//!
//! Repository-style async functions, one section per entity.
//!
//! # Query Patterns
//! - Every insert/update runs [`Validate`] before touching SQLite
//! - Multi-step operations (author links, cascade deletes) run in one transaction
//! - SQLite constraint failures are mapped to [`CatalogError`] variants:
//!   unique `isbn` -> `DuplicateIsbn`, missing parent -> `MissingReference`,
//!   CHECK -> `ConstraintViolation`

use crate::error::{CatalogError, Result};
use crate::storage::models::*;
use crate::storage::validation::Validate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

/// Rows removed by a cascading delete, in addition to the target row itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    /// Book copies removed via `ON DELETE CASCADE`
    pub books_removed: u64,
    /// BookData <-> Author links removed
    pub links_removed: u64,
}

/// Translate a SQLite constraint failure into a catalog error
fn map_constraint_error(err: sqlx::Error, isbn: Option<&str>) -> CatalogError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(isbn) = isbn {
                return CatalogError::DuplicateIsbn(isbn.to_string());
            }
        }
        if db_err.is_check_violation() || db_err.is_foreign_key_violation() {
            return CatalogError::ConstraintViolation(db_err.message().to_string());
        }
    }
    err.into()
}

/// Fail with `MissingReference` unless `table.column = id` exists
async fn ensure_exists(
    conn: &mut SqliteConnection,
    entity: &'static str,
    table: &str,
    column: &str,
    id: i64,
) -> Result<()> {
    let sql = format!("SELECT 1 FROM {} WHERE {} = ?", table, column);
    let found: Option<i64> = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(CatalogError::MissingReference { entity, id }),
    }
}

/// `%query%` for a `LIKE ... ESCAPE '\'` clause, with wildcards in `query` matched literally
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

async fn ensure_book_parents(conn: &mut SqliteConnection, book: &NewBook) -> Result<()> {
    ensure_exists(conn, "BookData", "BookData", "book_data_id", book.book_data_id).await?;
    ensure_exists(conn, "Library", "Libraries", "library_id", book.library_id).await
}

// ============================================================================
// LIBRARY QUERIES
// ============================================================================

/// Insert a new library
///
/// Returns the library_id of the inserted library.
pub async fn insert_library(pool: &SqlitePool, library: &NewLibrary) -> Result<i64> {
    library.validate()?;

    let result = sqlx::query("INSERT INTO Libraries (name, address) VALUES (?, ?)")
        .bind(&library.name)
        .bind(&library.address)
        .execute(pool)
        .await
        .map_err(|e| map_constraint_error(e, None))?;

    Ok(result.last_insert_rowid())
}

/// Find library by ID
pub async fn find_library_by_id(pool: &SqlitePool, library_id: i64) -> Result<Option<Library>> {
    let library = sqlx::query_as::<_, Library>("SELECT * FROM Libraries WHERE library_id = ?")
        .bind(library_id)
        .fetch_optional(pool)
        .await?;

    Ok(library)
}

/// Update an existing library
pub async fn update_library(pool: &SqlitePool, library: &Library) -> Result<()> {
    library.validate()?;

    let result = sqlx::query("UPDATE Libraries SET name = ?, address = ? WHERE library_id = ?")
        .bind(&library.name)
        .bind(&library.address)
        .bind(library.library_id)
        .execute(pool)
        .await
        .map_err(|e| map_constraint_error(e, None))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("Library {}", library.library_id)));
    }

    Ok(())
}

/// List libraries ordered by name
pub async fn list_libraries(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Library>> {
    let libraries = sqlx::query_as::<_, Library>(
        "SELECT * FROM Libraries ORDER BY name, library_id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(libraries)
}

/// Count total libraries
pub async fn count_libraries(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Libraries")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete a library and, via CASCADE, every copy it holds
///
/// Returns `None` if the library does not exist.
pub async fn delete_library(pool: &SqlitePool, library_id: i64) -> Result<Option<DeleteSummary>> {
    let mut tx = pool.begin().await?;

    let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Books WHERE library_id = ?")
        .bind(library_id)
        .fetch_one(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM Libraries WHERE library_id = ?")
        .bind(library_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    tx.commit().await?;

    Ok(Some(DeleteSummary {
        books_removed: books as u64,
        links_removed: 0,
    }))
}

// ============================================================================
// AUTHOR QUERIES
// ============================================================================

/// Insert a new author
pub async fn insert_author(pool: &SqlitePool, author: &NewAuthor) -> Result<i64> {
    author.validate()?;

    let result = sqlx::query("INSERT INTO Authors (name, birth_date) VALUES (?, ?)")
        .bind(&author.name)
        .bind(author.birth_date)
        .execute(pool)
        .await
        .map_err(|e| map_constraint_error(e, None))?;

    Ok(result.last_insert_rowid())
}

/// Find author by ID
pub async fn find_author_by_id(pool: &SqlitePool, author_id: i64) -> Result<Option<Author>> {
    let author = sqlx::query_as::<_, Author>("SELECT * FROM Authors WHERE author_id = ?")
        .bind(author_id)
        .fetch_optional(pool)
        .await?;

    Ok(author)
}

/// Update an existing author
pub async fn update_author(pool: &SqlitePool, author: &Author) -> Result<()> {
    author.validate()?;

    let result = sqlx::query("UPDATE Authors SET name = ?, birth_date = ? WHERE author_id = ?")
        .bind(&author.name)
        .bind(author.birth_date)
        .bind(author.author_id)
        .execute(pool)
        .await
        .map_err(|e| map_constraint_error(e, None))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("Author {}", author.author_id)));
    }

    Ok(())
}

/// List authors ordered by name
pub async fn list_authors(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Author>> {
    let authors = sqlx::query_as::<_, Author>(
        "SELECT * FROM Authors ORDER BY name, author_id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(authors)
}

/// Search authors by name substring
pub async fn search_authors_by_name(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<Author>> {
    let authors = sqlx::query_as::<_, Author>(
        "SELECT * FROM Authors WHERE name LIKE ? ESCAPE '\\' ORDER BY name, author_id LIMIT ?",
    )
    .bind(like_pattern(query))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(authors)
}

/// Count total authors
pub async fn count_authors(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Authors")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete an author
///
/// Links to BookData are removed; the BookData rows themselves are kept.
/// Returns `None` if the author does not exist.
pub async fn delete_author(pool: &SqlitePool, author_id: i64) -> Result<Option<DeleteSummary>> {
    let mut tx = pool.begin().await?;

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM BookDataAuthors WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM Authors WHERE author_id = ?")
        .bind(author_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    tx.commit().await?;

    Ok(Some(DeleteSummary {
        books_removed: 0,
        links_removed: links as u64,
    }))
}

// ============================================================================
// BOOK DATA QUERIES
// ============================================================================

async fn insert_book_data_row(conn: &mut SqliteConnection, book_data: &NewBookData) -> Result<i64> {
    book_data.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO BookData (title, published_date, isbn, page_count)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&book_data.title)
    .bind(book_data.published_date)
    .bind(&book_data.isbn)
    .bind(book_data.page_count)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_constraint_error(e, Some(&book_data.isbn)))?;

    Ok(result.last_insert_rowid())
}

/// Insert new book data
///
/// Fails with `DuplicateIsbn` if the ISBN is already taken.
pub async fn insert_book_data(pool: &SqlitePool, book_data: &NewBookData) -> Result<i64> {
    let mut conn = pool.acquire().await?;
    insert_book_data_row(&mut conn, book_data).await
}

/// Insert new book data and link its authors in one transaction
pub async fn insert_book_data_with_authors(
    pool: &SqlitePool,
    book_data: &NewBookData,
    author_ids: &[i64],
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let book_data_id = insert_book_data_row(&mut tx, book_data).await?;
    link_authors(&mut tx, book_data_id, author_ids).await?;

    tx.commit().await?;
    Ok(book_data_id)
}

/// Find book data by ID
pub async fn find_book_data_by_id(pool: &SqlitePool, book_data_id: i64) -> Result<Option<BookData>> {
    let book_data = sqlx::query_as::<_, BookData>("SELECT * FROM BookData WHERE book_data_id = ?")
        .bind(book_data_id)
        .fetch_optional(pool)
        .await?;

    Ok(book_data)
}

/// Find book data by ISBN
pub async fn find_book_data_by_isbn(pool: &SqlitePool, isbn: &str) -> Result<Option<BookData>> {
    let book_data = sqlx::query_as::<_, BookData>("SELECT * FROM BookData WHERE isbn = ?")
        .bind(isbn)
        .fetch_optional(pool)
        .await?;

    Ok(book_data)
}

/// Update existing book data
pub async fn update_book_data(pool: &SqlitePool, book_data: &BookData) -> Result<()> {
    book_data.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE BookData SET
            title = ?, published_date = ?, isbn = ?, page_count = ?
        WHERE book_data_id = ?
        "#,
    )
    .bind(&book_data.title)
    .bind(book_data.published_date)
    .bind(&book_data.isbn)
    .bind(book_data.page_count)
    .bind(book_data.book_data_id)
    .execute(pool)
    .await
    .map_err(|e| map_constraint_error(e, Some(&book_data.isbn)))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("BookData {}", book_data.book_data_id)));
    }

    Ok(())
}

/// Upsert book data (insert or update if ISBN exists)
///
/// Returns the book_data_id (either existing or newly created).
pub async fn upsert_book_data(pool: &SqlitePool, book_data: &NewBookData) -> Result<i64> {
    if let Some(existing) = find_book_data_by_isbn(pool, &book_data.isbn).await? {
        let mut updated = existing;
        updated.title = book_data.title.clone();
        updated.published_date = book_data.published_date;
        updated.page_count = book_data.page_count;

        update_book_data(pool, &updated).await?;
        Ok(updated.book_data_id)
    } else {
        insert_book_data(pool, book_data).await
    }
}

/// List book data ordered by title
pub async fn list_book_data(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<BookData>> {
    let book_data = sqlx::query_as::<_, BookData>(
        "SELECT * FROM BookData ORDER BY title, book_data_id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(book_data)
}

/// Search book data by title
pub async fn search_book_data_by_title(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<BookData>> {
    let book_data = sqlx::query_as::<_, BookData>(
        "SELECT * FROM BookData WHERE title LIKE ? ESCAPE '\\' ORDER BY title, book_data_id LIMIT ?",
    )
    .bind(like_pattern(query))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(book_data)
}

/// Count total book data records
pub async fn count_book_data(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM BookData")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete book data, its copies and its author links (via CASCADE)
///
/// Returns `None` if the book data does not exist.
pub async fn delete_book_data(pool: &SqlitePool, book_data_id: i64) -> Result<Option<DeleteSummary>> {
    let mut tx = pool.begin().await?;

    let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Books WHERE book_data_id = ?")
        .bind(book_data_id)
        .fetch_one(&mut *tx)
        .await?;

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM BookDataAuthors WHERE book_data_id = ?")
        .bind(book_data_id)
        .fetch_one(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM BookData WHERE book_data_id = ?")
        .bind(book_data_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    tx.commit().await?;

    Ok(Some(DeleteSummary {
        books_removed: books as u64,
        links_removed: links as u64,
    }))
}

// ============================================================================
// AUTHORSHIP QUERIES (BookData <-> Author)
// ============================================================================

async fn link_authors(conn: &mut SqliteConnection, book_data_id: i64, author_ids: &[i64]) -> Result<()> {
    for &author_id in author_ids {
        ensure_exists(conn, "Author", "Authors", "author_id", author_id).await?;

        sqlx::query("INSERT OR IGNORE INTO BookDataAuthors (book_data_id, author_id) VALUES (?, ?)")
            .bind(book_data_id)
            .bind(author_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Link an author to book data
///
/// Returns `false` if the link already existed.
pub async fn add_book_data_author(pool: &SqlitePool, book_data_id: i64, author_id: i64) -> Result<bool> {
    let mut conn = pool.acquire().await?;

    ensure_exists(&mut conn, "BookData", "BookData", "book_data_id", book_data_id).await?;
    ensure_exists(&mut conn, "Author", "Authors", "author_id", author_id).await?;

    let result = sqlx::query("INSERT OR IGNORE INTO BookDataAuthors (book_data_id, author_id) VALUES (?, ?)")
        .bind(book_data_id)
        .bind(author_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Unlink an author from book data
///
/// Returns `false` if there was no such link.
pub async fn remove_book_data_author(pool: &SqlitePool, book_data_id: i64, author_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM BookDataAuthors WHERE book_data_id = ? AND author_id = ?")
        .bind(book_data_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Replace the author set of book data
///
/// Duplicate ids collapse to one link. Nothing changes if any author is missing.
pub async fn set_book_data_authors(pool: &SqlitePool, book_data_id: i64, author_ids: &[i64]) -> Result<()> {
    let mut tx = pool.begin().await?;

    ensure_exists(&mut tx, "BookData", "BookData", "book_data_id", book_data_id).await?;

    sqlx::query("DELETE FROM BookDataAuthors WHERE book_data_id = ?")
        .bind(book_data_id)
        .execute(&mut *tx)
        .await?;

    link_authors(&mut tx, book_data_id, author_ids).await?;

    tx.commit().await?;
    Ok(())
}

/// Remove every author link of book data
///
/// Returns the number of links removed.
pub async fn clear_book_data_authors(pool: &SqlitePool, book_data_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM BookDataAuthors WHERE book_data_id = ?")
        .bind(book_data_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Find the authors of book data
pub async fn find_authors_by_book_data(pool: &SqlitePool, book_data_id: i64) -> Result<Vec<Author>> {
    let authors = sqlx::query_as::<_, Author>(
        r#"
        SELECT a.* FROM Authors a
        INNER JOIN BookDataAuthors bda ON a.author_id = bda.author_id
        WHERE bda.book_data_id = ?
        ORDER BY a.name, a.author_id
        "#,
    )
    .bind(book_data_id)
    .fetch_all(pool)
    .await?;

    Ok(authors)
}

/// Find the book data written by an author
pub async fn find_book_data_by_author(pool: &SqlitePool, author_id: i64) -> Result<Vec<BookData>> {
    let book_data = sqlx::query_as::<_, BookData>(
        r#"
        SELECT bd.* FROM BookData bd
        INNER JOIN BookDataAuthors bda ON bd.book_data_id = bda.book_data_id
        WHERE bda.author_id = ?
        ORDER BY bd.title, bd.book_data_id
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(book_data)
}

/// Raw link rows for an author
pub async fn find_links_by_author(pool: &SqlitePool, author_id: i64) -> Result<Vec<BookDataAuthor>> {
    let links = sqlx::query_as::<_, BookDataAuthor>(
        "SELECT * FROM BookDataAuthors WHERE author_id = ? ORDER BY book_data_id",
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(links)
}

/// Count all author links
pub async fn count_book_data_authors(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM BookDataAuthors")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book copy
///
/// Fails with `MissingReference` if the BookData or Library does not exist.
pub async fn insert_book(pool: &SqlitePool, book: &NewBook) -> Result<i64> {
    let mut tx = pool.begin().await?;

    ensure_book_parents(&mut tx, book).await?;

    let result = sqlx::query("INSERT INTO Books (book_data_id, library_id) VALUES (?, ?)")
        .bind(book.book_data_id)
        .bind(book.library_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, None))?;

    tx.commit().await?;
    Ok(result.last_insert_rowid())
}

/// Find book by ID
pub async fn find_book_by_id(pool: &SqlitePool, book_id: i64) -> Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>("SELECT * FROM Books WHERE book_id = ?")
        .bind(book_id)
        .fetch_optional(pool)
        .await?;

    Ok(book)
}

/// Update an existing book (e.g. move the copy to another library)
pub async fn update_book(pool: &SqlitePool, book: &Book) -> Result<()> {
    let mut tx = pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM Books WHERE book_id = ?")
        .bind(book.book_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(CatalogError::not_found(format!("Book {}", book.book_id)));
    }

    ensure_book_parents(&mut tx, &NewBook::new(book.book_data_id, book.library_id)).await?;

    let result = sqlx::query("UPDATE Books SET book_data_id = ?, library_id = ? WHERE book_id = ?")
        .bind(book.book_data_id)
        .bind(book.library_id)
        .bind(book.book_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, None))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("Book {}", book.book_id)));
    }

    tx.commit().await?;
    Ok(())
}

/// List the copies held by a library
pub async fn list_books_by_library(pool: &SqlitePool, library_id: i64) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM Books WHERE library_id = ? ORDER BY book_id")
        .bind(library_id)
        .fetch_all(pool)
        .await?;

    Ok(books)
}

/// List every copy of a title
pub async fn list_books_by_book_data(pool: &SqlitePool, book_data_id: i64) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM Books WHERE book_data_id = ? ORDER BY book_id")
        .bind(book_data_id)
        .fetch_all(pool)
        .await?;

    Ok(books)
}

/// Count total book copies
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Books")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete a single copy
///
/// Returns `false` if the book does not exist.
pub async fn delete_book(pool: &SqlitePool, book_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM Books WHERE book_id = ?")
        .bind(book_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// A copy held by a library joined with its bibliographic data
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LibraryHolding {
    pub book_id: i64,
    pub book_data_id: i64,
    pub title: String,
    pub isbn: String,
    pub published_date: NaiveDate,
    pub page_count: u32,

    // Author names, comma-separated in name order
    pub authors_str: Option<String>,
}

impl LibraryHolding {
    /// Author names as a list
    pub fn authors(&self) -> Vec<String> {
        self.authors_str
            .as_deref()
            .map(|s| s.split(", ").map(String::from).collect())
            .unwrap_or_default()
    }
}

/// List a library's copies with title, ISBN and author names
pub async fn list_holdings_by_library(pool: &SqlitePool, library_id: i64) -> Result<Vec<LibraryHolding>> {
    let holdings = sqlx::query_as::<_, LibraryHolding>(
        r#"
        WITH book_data_authors AS (
            SELECT
                ordered.book_data_id,
                GROUP_CONCAT(ordered.name, ', ') AS authors
            FROM (
                SELECT bda.book_data_id, a.name
                FROM BookDataAuthors bda
                JOIN Authors a ON bda.author_id = a.author_id
                ORDER BY a.name
            ) ordered
            GROUP BY ordered.book_data_id
        )
        SELECT
            b.book_id,
            b.book_data_id,
            bd.title,
            bd.isbn,
            bd.published_date,
            bd.page_count,
            bda.authors AS authors_str
        FROM Books b
        JOIN BookData bd ON b.book_data_id = bd.book_data_id
        LEFT JOIN book_data_authors bda ON b.book_data_id = bda.book_data_id
        WHERE b.library_id = ?
        ORDER BY bd.title, b.book_id
        "#,
    )
    .bind(library_id)
    .fetch_all(pool)
    .await?;

    Ok(holdings)
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Clear all catalog data
///
/// Use with caution - this is irreversible!
pub async fn clear_catalog(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    // Delete in correct order to respect foreign keys
    sqlx::query("DELETE FROM Books").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM BookDataAuthors").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM BookData").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM Authors").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM Libraries").execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(())
}
