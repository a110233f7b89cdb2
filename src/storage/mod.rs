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


//! Database storage and models
//!
//! This module handles all database operations using SQLite through sqlx.
//!
//! # Database Schema
//! - Libraries: locations holding copies
//! - Authors: people who wrote titles
//! - BookData: bibliographic metadata, unique by ISBN
//! - Books: copies, each tied to one BookData and one Library
//! - BookDataAuthors: many-to-many junction between BookData and Authors
//!
//! # Usage Example
//! ```no_run
//! use library_catalog::storage::{Database, queries, models::NewLibrary};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./catalog.db").await?;
//!
//! let library_id = queries::insert_library(
//!     db.pool(),
//!     &NewLibrary::new("Central", "1 Main St"),
//! ).await?;
//!
//! let library = queries::find_library_by_id(db.pool(), library_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod validation;

// Re-export commonly used types
pub use database::Database;
pub use models::{
    Author, Book, BookData, BookDataAuthor, Library, NewAuthor, NewBook, NewBookData, NewLibrary,
};
pub use queries::{DeleteSummary, LibraryHolding};
pub use validation::Validate;
