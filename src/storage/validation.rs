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


//! Field-level validation
//!
//! The same limits are also declared as CHECK constraints in the schema, so a
//! row that bypasses these functions is still rejected by SQLite.

use crate::error::{CatalogError, Result};
use crate::storage::models::*;
use regex::Regex;

lazy_static::lazy_static! {
    static ref ISBN10: Regex = Regex::new(r"^[0-9]{9}[0-9X]$").expect("valid ISBN-10 pattern");
    static ref ISBN13: Regex = Regex::new(r"^97[89][0-9]{10}$").expect("valid ISBN-13 pattern");
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reject empty values and values longer than `max` characters
pub fn validate_length(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(field, "cannot be empty"));
    }

    let len = value.chars().count();
    if len > max {
        return Err(CatalogError::validation(
            field,
            format!("{} characters exceeds the maximum of {}", len, max),
        ));
    }

    Ok(())
}

/// Strip hyphens and whitespace and upper-case ASCII letters (so `x` becomes `X`)
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Check an already-normalized ISBN-10 or ISBN-13 including its check digit
pub fn validate_isbn(isbn: &str) -> Result<()> {
    if ISBN10.is_match(isbn) {
        // the pattern guarantees ASCII, so bytes line up with positions
        let sum: u32 = isbn
            .bytes()
            .enumerate()
            .map(|(i, b)| {
                let value = if b == b'X' { 10 } else { u32::from(b - b'0') };
                (10 - i as u32) * value
            })
            .sum();
        if sum % 11 != 0 {
            return Err(CatalogError::validation("isbn", "ISBN-10 check digit mismatch"));
        }
        return Ok(());
    }

    if ISBN13.is_match(isbn) {
        let sum: u32 = isbn
            .bytes()
            .map(|b| u32::from(b - b'0'))
            .enumerate()
            .map(|(i, d)| if i % 2 == 0 { d } else { d * 3 })
            .sum();
        if sum % 10 != 0 {
            return Err(CatalogError::validation("isbn", "ISBN-13 check digit mismatch"));
        }
        return Ok(());
    }

    Err(CatalogError::validation(
        "isbn",
        format!("'{}' is not a 10 or 13 character ISBN", isbn),
    ))
}

impl Validate for NewLibrary {
    fn validate(&self) -> Result<()> {
        validate_length("name", &self.name, LIBRARY_NAME_MAX)?;
        validate_length("address", &self.address, LIBRARY_ADDRESS_MAX)
    }
}

impl Validate for Library {
    fn validate(&self) -> Result<()> {
        validate_length("name", &self.name, LIBRARY_NAME_MAX)?;
        validate_length("address", &self.address, LIBRARY_ADDRESS_MAX)
    }
}

impl Validate for NewAuthor {
    fn validate(&self) -> Result<()> {
        validate_length("name", &self.name, AUTHOR_NAME_MAX)
    }
}

impl Validate for Author {
    fn validate(&self) -> Result<()> {
        validate_length("name", &self.name, AUTHOR_NAME_MAX)
    }
}

impl Validate for NewBookData {
    fn validate(&self) -> Result<()> {
        validate_length("title", &self.title, TITLE_MAX)?;
        validate_length("isbn", &self.isbn, ISBN_MAX)
    }
}

impl Validate for BookData {
    fn validate(&self) -> Result<()> {
        validate_length("title", &self.title, TITLE_MAX)?;
        validate_length("isbn", &self.isbn, ISBN_MAX)
    }
}
