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


//! Error types for the library catalog
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are grouped by where they originate:
//!
//! - **Constraint**: uniqueness, foreign keys and field rules enforced by SQLite
//!   or by [`crate::storage::validation`]
//! - **Database**: connection, migration and query failures
//! - **Configuration**: config file parsing and invalid settings
//! - **I/O**: database directory and config file access

use thiserror::Error;

/// Result type alias using our CatalogError type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for the library catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== Constraint Errors =====

    /// A BookData with this ISBN already exists
    #[error("ISBN already exists: {0}")]
    DuplicateIsbn(String),

    /// A referenced parent row does not exist (Book -> BookData/Library, link -> Author)
    #[error("{entity} {id} does not exist")]
    MissingReference {
        entity: &'static str,
        id: i64,
    },

    /// Field-level rule failed (length, emptiness, ISBN format)
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: String,
        reason: String,
    },

    // ===== Database Errors =====

    /// Database record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Constraint violation SQLite reported that does not map to a more specific variant
    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    // ===== Configuration Errors =====

    /// Configuration file error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ===== External Library Errors =====

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// TOML configuration parse error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Config file read or database directory creation failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CatalogError {
    /// Create a RecordNotFound error with a resource name
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        CatalogError::RecordNotFound(resource.into())
    }

    /// Create a Validation error for a field
    pub fn validation<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        CatalogError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error is a data constraint failure (caller supplied bad data)
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateIsbn(_)
                | CatalogError::MissingReference { .. }
                | CatalogError::Validation { .. }
                | CatalogError::ConstraintViolation(_)
        )
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::DuplicateIsbn(isbn) => {
                format!("A book with ISBN {} is already in the catalog.", isbn)
            }
            CatalogError::MissingReference { entity, id } => {
                format!("No {} with id {} exists. Create it first.", entity.to_lowercase(), id)
            }
            CatalogError::MigrationFailed(_) => {
                "The catalog database could not be upgraded. Check the file is not corrupted.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_classification() {
        assert!(CatalogError::DuplicateIsbn("9780441013593".into()).is_constraint_violation());
        assert!(CatalogError::validation("name", "too long").is_constraint_violation());
        assert!(!CatalogError::not_found("Library 7").is_constraint_violation());
    }

    #[test]
    fn test_user_message() {
        let err = CatalogError::MissingReference { entity: "Library", id: 3 };
        assert_eq!(err.user_message(), "No library with id 3 exists. Create it first.");
        assert_eq!(err.to_string(), "Library 3 does not exist");
    }
}
