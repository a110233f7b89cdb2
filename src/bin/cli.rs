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


use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use library_catalog::logging::init_logger;
use library_catalog::storage::validation::normalize_isbn;
use library_catalog::storage::{DeleteSummary, NewAuthor, NewBook, NewBookData, NewLibrary};
use library_catalog::{Catalog, CatalogConfig};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Library catalog CLI - manage libraries, titles, authors and copies", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides config and environment)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    Init,
    /// Add a library
    AddLibrary {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        address: String,
    },
    /// Add an author
    AddAuthor {
        #[arg(short, long)]
        name: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(short, long)]
        birth_date: String,
    },
    /// Add bibliographic data for a title
    AddBookData {
        #[arg(short, long)]
        title: String,
        /// ISBN; hyphens and spaces are stripped
        #[arg(short, long)]
        isbn: String,
        /// Publication date (YYYY-MM-DD)
        #[arg(short = 'd', long)]
        published_date: String,
        #[arg(short = 'p', long)]
        page_count: u32,
        /// Author id (repeatable)
        #[arg(short = 'a', long = "author-id")]
        author_ids: Vec<i64>,
    },
    /// Add a copy of a title to a library
    AddCopy {
        #[arg(long)]
        book_data_id: i64,
        #[arg(long)]
        library_id: i64,
    },
    /// Link an author to a title
    LinkAuthor {
        #[arg(long)]
        book_data_id: i64,
        #[arg(long)]
        author_id: i64,
    },
    /// Unlink an author from a title
    UnlinkAuthor {
        #[arg(long)]
        book_data_id: i64,
        #[arg(long)]
        author_id: i64,
    },
    /// List libraries
    ListLibraries {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// List authors
    ListAuthors {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Show the copies held by a library
    Holdings {
        library_id: i64,
    },
    /// Delete a library and its copies
    DeleteLibrary {
        library_id: i64,
    },
    /// Delete a title, its copies and its author links
    DeleteBookData {
        book_data_id: i64,
    },
    /// Delete an author (titles are kept)
    DeleteAuthor {
        author_id: i64,
    },
    /// Show record counts
    Stats,
}

fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn emit<T: Serialize + std::fmt::Debug>(json: bool, value: &T) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{:#?}", value);
    }
    Ok(())
}

fn report_delete(json: bool, what: &str, summary: &DeleteSummary) -> anyhow::Result<()> {
    if json {
        return emit(true, summary);
    }
    println!(
        "Deleted {} ({} copies, {} author links removed)",
        what, summary.books_removed, summary.links_removed
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CatalogConfig::default(),
    }
    .apply_env();

    if let Some(path) = cli.database {
        config.database.path = Some(path);
    }
    config.logging.verbose |= cli.verbose;
    init_logger(&config.logging);

    let catalog = Catalog::open(&config).await.context("opening catalog")?;
    let json = cli.json;

    match cli.command {
        Commands::Init => {
            let path = catalog
                .database()
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("Catalog ready at {}", path);
        }
        Commands::AddLibrary { name, address } => {
            let library = catalog.create_library(&NewLibrary::new(name, address)).await?;
            emit(json, &library)?;
        }
        Commands::AddAuthor { name, birth_date } => {
            let author = catalog
                .create_author(&NewAuthor::new(name, parse_date(&birth_date)?))
                .await?;
            emit(json, &author)?;
        }
        Commands::AddBookData {
            title,
            isbn,
            published_date,
            page_count,
            author_ids,
        } => {
            let new = NewBookData::new(title, normalize_isbn(&isbn), parse_date(&published_date)?, page_count);
            let book_data = catalog
                .create_book_data(&new, &author_ids)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            emit(json, &book_data)?;
        }
        Commands::AddCopy {
            book_data_id,
            library_id,
        } => {
            let book = catalog
                .create_book(&NewBook::new(book_data_id, library_id))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            emit(json, &book)?;
        }
        Commands::LinkAuthor {
            book_data_id,
            author_id,
        } => {
            if catalog.link_author(book_data_id, author_id).await? {
                println!("Linked author {} to book data {}", author_id, book_data_id);
            } else {
                println!("Author {} was already linked", author_id);
            }
        }
        Commands::UnlinkAuthor {
            book_data_id,
            author_id,
        } => {
            if catalog.unlink_author(book_data_id, author_id).await? {
                println!("Unlinked author {} from book data {}", author_id, book_data_id);
            } else {
                println!("Author {} was not linked", author_id);
            }
        }
        Commands::ListLibraries { limit, offset } => {
            emit(json, &catalog.libraries(limit, offset).await?)?;
        }
        Commands::ListAuthors { limit, offset } => {
            emit(json, &catalog.authors(limit, offset).await?)?;
        }
        Commands::Holdings { library_id } => {
            let holdings = catalog.holdings(library_id).await?;
            if json {
                emit(true, &holdings)?;
            } else {
                for h in &holdings {
                    println!(
                        "#{:<6} {} [{}] {}",
                        h.book_id,
                        h.title,
                        h.isbn,
                        h.authors_str.as_deref().unwrap_or("")
                    );
                }
                println!("{} copies", holdings.len());
            }
        }
        Commands::DeleteLibrary { library_id } => {
            let summary = catalog.delete_library(library_id).await?;
            report_delete(json, &format!("library {}", library_id), &summary)?;
        }
        Commands::DeleteBookData { book_data_id } => {
            let summary = catalog.delete_book_data(book_data_id).await?;
            report_delete(json, &format!("book data {}", book_data_id), &summary)?;
        }
        Commands::DeleteAuthor { author_id } => {
            let summary = catalog.delete_author(author_id).await?;
            report_delete(json, &format!("author {}", author_id), &summary)?;
        }
        Commands::Stats => {
            emit(json, &catalog.stats().await?)?;
        }
    }

    catalog.close().await?;
    Ok(())
}
