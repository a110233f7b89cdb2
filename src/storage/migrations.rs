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


//! Database migrations
//!
//! This module handles database schema creation and migrations.
//!
//! # Migration Strategy
//! Migrations are runtime SQL steps tracked in the `_migrations` table so the
//! crate does not need a database connection at build time.

use crate::error::Result;
use sqlx::{Executor, SqlitePool};

/// Run all database migrations
///
/// This function creates the database schema and applies any pending migrations.
/// Migrations are tracked in the `_migrations` table.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    run_migration(pool, 1, "initial_schema", create_initial_schema(pool)).await?;
    run_migration(pool, 2, "relation_indexes", create_indexes(pool)).await?;

    Ok(())
}

/// Create migrations tracking table
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

/// Run a single migration if it hasn't been applied yet
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration_fn: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    tracing::debug!(id, name, "applying migration");
    migration_fn.await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the catalog tables with their relationships and constraints
async fn create_initial_schema(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- ============================================================================
-- MAIN ENTITIES
-- ============================================================================

-- Libraries: locations holding copies
CREATE TABLE IF NOT EXISTS Libraries (
    library_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 200),
    address TEXT NOT NULL CHECK (length(address) BETWEEN 1 AND 300)
);

-- Authors
CREATE TABLE IF NOT EXISTS Authors (
    author_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 200),
    birth_date TEXT NOT NULL  -- ISO 8601 date (YYYY-MM-DD)
);

-- BookData: bibliographic metadata shared by all copies of a title
CREATE TABLE IF NOT EXISTS BookData (
    book_data_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 200),
    published_date TEXT NOT NULL,  -- ISO 8601 date (YYYY-MM-DD)
    isbn TEXT NOT NULL UNIQUE CHECK (length(isbn) BETWEEN 1 AND 13),
    page_count INTEGER NOT NULL CHECK (page_count >= 0)
);

-- Books: one copy of a BookData held by a Library
CREATE TABLE IF NOT EXISTS Books (
    book_id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_data_id INTEGER NOT NULL,
    library_id INTEGER NOT NULL,
    FOREIGN KEY (book_data_id) REFERENCES BookData(book_data_id) ON DELETE CASCADE,
    FOREIGN KEY (library_id) REFERENCES Libraries(library_id) ON DELETE CASCADE
);

-- ============================================================================
-- JUNCTION TABLES (Many-to-Many Relationships)
-- ============================================================================

-- BookDataAuthors: BookData <-> Author junction, set semantics
CREATE TABLE IF NOT EXISTS BookDataAuthors (
    book_data_id INTEGER NOT NULL,
    author_id INTEGER NOT NULL,
    FOREIGN KEY (book_data_id) REFERENCES BookData(book_data_id) ON DELETE CASCADE,
    FOREIGN KEY (author_id) REFERENCES Authors(author_id) ON DELETE CASCADE,
    PRIMARY KEY (book_data_id, author_id)
);
        "#,
    )
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
CREATE INDEX IF NOT EXISTS idx_books_book_data ON Books(book_data_id);
CREATE INDEX IF NOT EXISTS idx_books_library ON Books(library_id);
CREATE INDEX IF NOT EXISTS idx_book_data_authors_author ON BookDataAuthors(author_id);
CREATE INDEX IF NOT EXISTS idx_book_data_title ON BookData(title);
CREATE INDEX IF NOT EXISTS idx_authors_name ON Authors(name);
        "#,
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;

    #[tokio::test]
    async fn test_migrations() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .expect("Failed to query tables");

        let expected_tables = vec!["Authors", "BookData", "BookDataAuthors", "Books", "Libraries"];

        assert_eq!(tables, expected_tables, "Missing or extra tables");
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        run_migrations(db.pool()).await.expect("Second run should be a no-op");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(db.pool())
            .await
            .expect("Failed to query migrations");

        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        let fk_enabled: i32 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .expect("Failed to check foreign keys");

        assert_eq!(fk_enabled, 1, "Foreign keys not enabled");
    }

    #[tokio::test]
    async fn test_check_constraints_reject_raw_rows() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        let result = sqlx::query(
            "INSERT INTO BookData (title, published_date, isbn, page_count) VALUES ('x', '2000-01-01', '1', -1)",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err(), "negative page_count must be rejected");
    }
}
