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


//! Database models
//!
//! Row structs for the catalog tables and the `New*` structs used for inserts.
//!
//! # Relationships
//! - Library 1 -> N Book (cascade delete)
//! - BookData 1 -> N Book (cascade delete)
//! - BookData N <-> M Author via `BookDataAuthors` (links removed on either delete)
//!
//! # SQLite Adaptations
//! - Dates stored as `YYYY-MM-DD` text, mapped to `NaiveDate`
//! - `page_count` stored as INTEGER with a `>= 0` check, mapped to `u32`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum lengths in characters
pub const LIBRARY_NAME_MAX: usize = 200;
pub const LIBRARY_ADDRESS_MAX: usize = 300;
pub const AUTHOR_NAME_MAX: usize = 200;
pub const TITLE_MAX: usize = 200;
pub const ISBN_MAX: usize = 13;

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// Library - a physical or logical location holding book copies
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Library {
    pub library_id: i64,
    pub name: String,
    pub address: String,
}

/// Author of one or more titles
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub author_id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
}

/// BookData - bibliographic metadata shared by every copy of a title
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BookData {
    pub book_data_id: i64,
    pub title: String,
    pub published_date: NaiveDate,
    /// Unique across all BookData rows
    pub isbn: String,
    pub page_count: u32,
}

/// Book - one copy of a title held by a library
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub book_id: i64,
    pub book_data_id: i64,
    pub library_id: i64,
}

// ============================================================================
// JUNCTION TABLES (Many-to-Many Relationships)
// ============================================================================

/// BookDataAuthor - junction table for BookData <-> Author
///
/// Composite primary key: (book_data_id, author_id)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BookDataAuthor {
    pub book_data_id: i64,
    pub author_id: i64,
}

// ============================================================================
// NEW RECORD STRUCTS (for inserts)
// ============================================================================

/// New library record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLibrary {
    pub name: String,
    pub address: String,
}

impl NewLibrary {
    pub fn new<N: Into<String>, A: Into<String>>(name: N, address: A) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// New author record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: NaiveDate,
}

impl NewAuthor {
    pub fn new<N: Into<String>>(name: N, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            birth_date,
        }
    }
}

/// New book data record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookData {
    pub title: String,
    pub published_date: NaiveDate,
    pub isbn: String,
    pub page_count: u32,
}

impl NewBookData {
    pub fn new<T: Into<String>, I: Into<String>>(
        title: T,
        isbn: I,
        published_date: NaiveDate,
        page_count: u32,
    ) -> Self {
        Self {
            title: title.into(),
            published_date,
            isbn: isbn.into(),
            page_count,
        }
    }
}

/// New book (copy) record for insertion
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewBook {
    pub book_data_id: i64,
    pub library_id: i64,
}

impl NewBook {
    pub fn new(book_data_id: i64, library_id: i64) -> Self {
        Self {
            book_data_id,
            library_id,
        }
    }
}
