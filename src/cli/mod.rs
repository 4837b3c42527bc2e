//! Command-line interface for arbolib.
//!
//! One subcommand per library operation: registration, lending,
//! returning, inventory, lookup, removal, and recommendations. The
//! CLI performs input coercion (year and count are unsigned integers,
//! rejected at parse time when malformed) and delegates everything
//! else to [`LibrarySystem`].

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config;
use crate::domain::Book;
use crate::library::LibrarySystem;
use crate::store::sqlite::{SqliteGateway, UNCATEGORIZED, UNKNOWN_PUBLISHER};

/// arbolib - library catalog, lending and recommendations
#[derive(Parser, Debug)]
#[command(name = "arbolib")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database file (defaults to ~/.arbolib/library.db)
    #[arg(long, global = true, env = "ARBOLIB_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a book
    RegisterBook {
        /// Book title (natural key, unique case-insensitively)
        title: String,

        /// Author name
        #[arg(short, long)]
        author: String,

        /// ISBN
        #[arg(short, long, default_value = "")]
        isbn: String,

        /// Publisher name
        #[arg(short, long, default_value = UNKNOWN_PUBLISHER)]
        publisher: String,

        /// Publication year
        #[arg(short, long)]
        year: u32,

        /// Number of copies
        #[arg(short, long, default_value = "1")]
        count: u32,

        /// Category name
        #[arg(long, default_value = UNCATEGORIZED)]
        category: String,
    },

    /// Register a member
    RegisterMember {
        /// Unique member id
        id: String,

        /// Display name
        name: String,
    },

    /// Lend one copy of a title to a member
    Lend {
        /// Member id
        member_id: String,

        /// Book title (matched case-insensitively)
        title: String,
    },

    /// Return one copy of a title from a member
    Return {
        /// Member id
        member_id: String,

        /// Book title (matched case-insensitively)
        title: String,
    },

    /// List the catalog, most recently registered first
    Inventory {
        /// Emit JSON instead of human-readable lines
        #[arg(long)]
        json: bool,
    },

    /// Look up a book by exact title
    Lookup {
        /// Book title (exact)
        title: String,

        /// Emit JSON instead of human-readable lines
        #[arg(long)]
        json: bool,
    },

    /// Remove a book from the catalog
    RemoveBook {
        /// Book title (matched case-insensitively)
        title: String,
    },

    /// Recommend titles based on borrowing overlap with other members
    Recommend {
        /// Member id
        member_id: String,

        /// Emit JSON instead of human-readable lines
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let path = match self.db {
            Some(path) => path,
            None => config::database_path()?,
        };
        let gateway = SqliteGateway::open(&path)?;
        let mut system = LibrarySystem::open(gateway)?;

        match self.command {
            Commands::RegisterBook {
                title,
                author,
                isbn,
                publisher,
                year,
                count,
                category,
            } => {
                let book = system.register_book(
                    &isbn, &title, &author, &publisher, year, count, &category,
                )?;
                println!(
                    "Registered '{}' with {} {}.",
                    book.title,
                    book.initial_count,
                    plural(book.initial_count, "copy", "copies")
                );
            }
            Commands::RegisterMember { id, name } => {
                system.register_member(&id, &name)?;
                println!("Registered member '{}' with id '{}'.", name, id);
            }
            Commands::Lend { member_id, title } => {
                let book = system.lend(&member_id, &title)?;
                println!(
                    "Lent '{}' to member {}. {}/{} copies remain.",
                    book.title, member_id, book.available_count, book.initial_count
                );
            }
            Commands::Return { member_id, title } => {
                let book = system.return_book(&member_id, &title)?;
                println!(
                    "'{}' returned by member {}. Now {}/{} on the shelf.",
                    book.title, member_id, book.available_count, book.initial_count
                );
            }
            Commands::Inventory { json } => {
                show_inventory(&system, json)?;
            }
            Commands::Lookup { title, json } => {
                show_lookup(&system, &title, json)?;
            }
            Commands::RemoveBook { title } => {
                let book = system.remove_book(&title)?;
                println!("Removed '{}' from the catalog.", book.title);
            }
            Commands::Recommend { member_id, json } => {
                show_recommendations(&system, &member_id, json)?;
            }
        }

        Ok(())
    }
}

/// Print the catalog, most recently registered first
fn show_inventory(system: &LibrarySystem<SqliteGateway>, json: bool) -> Result<()> {
    let books = system.list_inventory();

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books registered.");
        return Ok(());
    }
    println!("Library inventory:");
    for book in books {
        println!("- {}", describe(book));
    }
    Ok(())
}

/// Print one book found through the ordered index
fn show_lookup(system: &LibrarySystem<SqliteGateway>, title: &str, json: bool) -> Result<()> {
    match system.lookup_book(title) {
        Some(book) if json => println!("{}", serde_json::to_string_pretty(book)?),
        Some(book) => println!("Found: {}", describe(book)),
        None => println!("'{}' is not in the library.", title),
    }
    Ok(())
}

/// Print recommendations for a member
fn show_recommendations(
    system: &LibrarySystem<SqliteGateway>,
    member_id: &str,
    json: bool,
) -> Result<()> {
    let recommendations = system.recommend(member_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("No recommendations available for member {}.", member_id);
        return Ok(());
    }
    println!("Recommended for member {}:", member_id);
    for title in recommendations {
        println!("- {}", title);
    }
    Ok(())
}

fn describe(book: &Book) -> String {
    format!(
        "{} ({}) by {}, {}, {}, category {}: {}/{}",
        book.title,
        book.isbn,
        book.author,
        book.publisher,
        book.year,
        book.category,
        book.available_count,
        book.initial_count
    )
}

fn plural(n: u32, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}
