//! Library catalog storage
//!
//! Libraries hold copies ([`storage::Book`]) of titles ([`storage::BookData`]);
//! titles are written by [`storage::Author`]s. Everything is persisted in
//! SQLite with foreign keys, a unique ISBN and cascade deletes.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

pub use catalog::{Catalog, CatalogStats};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
