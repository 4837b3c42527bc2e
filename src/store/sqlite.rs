//! SQLite-backed persistence gateway.
//!
//! Schema (column order is the compatibility contract):
//! - books(isbn, title PRIMARY KEY, author, publisher, year,
//!   available_count, initial_count, category)
//! - members(id PRIMARY KEY, name)
//! - loans(member_id, title, timestamp) — no primary key; duplicate
//!   (member_id, title) rows represent multiple borrowed copies
//! - publishers(name PRIMARY KEY), categories(name PRIMARY KEY)
//!
//! Every `replace_*` runs DELETE + bulk INSERT inside a transaction,
//! so a durable set is always a complete snapshot of the in-memory
//! collection.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{PersistenceGateway, StoreError};
use crate::domain::{Book, Loan, Member};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS books (
    isbn            TEXT,
    title           TEXT PRIMARY KEY,
    author          TEXT,
    publisher       TEXT,
    year            INTEGER,
    available_count INTEGER,
    initial_count   INTEGER,
    category        TEXT
);
CREATE TABLE IF NOT EXISTS members (
    id   TEXT PRIMARY KEY,
    name TEXT
);
CREATE TABLE IF NOT EXISTS loans (
    member_id TEXT,
    title     TEXT,
    timestamp TEXT
);
CREATE TABLE IF NOT EXISTS publishers (
    name TEXT PRIMARY KEY
);
CREATE TABLE IF NOT EXISTS categories (
    name TEXT PRIMARY KEY
);
";

/// Sentinel publisher seeded at initialization
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Sentinel category seeded at initialization
pub const UNCATEGORIZED: &str = "Uncategorized";

/// SQLite implementation of [`PersistenceGateway`]
pub struct SqliteGateway {
    conn: Connection,
}

impl SqliteGateway {
    /// Open (or create) a database file, creating parent directories
    /// as needed
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used by tests)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Load the publisher reference set, sorted by name
    pub fn load_publishers(&self) -> Result<Vec<String>, StoreError> {
        self.load_names("publishers")
    }

    /// Load the category reference set, sorted by name
    pub fn load_categories(&self) -> Result<Vec<String>, StoreError> {
        self.load_names("categories")
    }

    fn load_names(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let sql = format!("SELECT name FROM {} ORDER BY name", table);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn insert_if_absent(&self, table: &str, name: &str) -> Result<(), StoreError> {
        // Table names come from this module only, never from input
        let sql = format!("INSERT OR IGNORE INTO {} (name) VALUES (?1)", table);
        self.conn.execute(&sql, params![name])?;
        Ok(())
    }
}

impl PersistenceGateway for SqliteGateway {
    fn initialize(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        self.insert_if_absent("publishers", UNKNOWN_PUBLISHER)?;
        self.insert_if_absent("categories", UNCATEGORIZED)?;
        Ok(())
    }

    fn load_books(&self) -> Result<Vec<Book>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT isbn, title, author, publisher, year, available_count, initial_count, category
             FROM books ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Book {
                isbn: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                publisher: row.get(3)?,
                year: row.get(4)?,
                available_count: row.get(5)?,
                initial_count: row.get(6)?,
                category: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn load_members(&self) -> Result<Vec<Member>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM members ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(Member {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn load_loans(&self) -> Result<Vec<Loan>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT member_id, title, timestamp FROM loans ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(Loan {
                member_id: row.get(0)?,
                title: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn replace_books(&mut self, books: &[Book]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM books", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO books (isbn, title, author, publisher, year, available_count, initial_count, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for book in books {
                stmt.execute(params![
                    book.isbn,
                    book.title,
                    book.author,
                    book.publisher,
                    book.year,
                    book.available_count,
                    book.initial_count,
                    book.category,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn replace_members(&mut self, members: &[Member]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM members", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO members (id, name) VALUES (?1, ?2)")?;
            for member in members {
                stmt.execute(params![member.id, member.name])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn replace_loans(&mut self, loans: &[Loan]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM loans", [])?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO loans (member_id, title, timestamp) VALUES (?1, ?2, ?3)")?;
            for loan in loans {
                stmt.execute(params![loan.member_id, loan.title, loan.timestamp])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn register_publisher(&mut self, name: &str) -> Result<(), StoreError> {
        self.insert_if_absent("publishers", name)
    }

    fn register_category(&mut self, name: &str) -> Result<(), StoreError> {
        self.insert_if_absent("categories", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_initialized() -> SqliteGateway {
        let mut gateway = SqliteGateway::open_in_memory().unwrap();
        gateway.initialize().unwrap();
        gateway
    }

    fn count(gateway: &SqliteGateway, table: &str) -> i64 {
        gateway
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn test_initialize_seeds_reference_sets_once() {
        let mut gateway = open_initialized();
        assert_eq!(count(&gateway, "publishers"), 1);
        assert_eq!(count(&gateway, "categories"), 1);

        // Re-initialization must not duplicate the sentinels
        gateway.initialize().unwrap();
        assert_eq!(count(&gateway, "publishers"), 1);
        assert_eq!(count(&gateway, "categories"), 1);
    }

    #[test]
    fn test_books_replace_and_load() {
        let mut gateway = open_initialized();

        let books = vec![
            Book::new("111", "Dune", "Herbert", "Ace", 1965, 2, "SF"),
            Book::new("222", "Foundation", "Asimov", "Gnome", 1951, 1, "SF"),
        ];
        gateway.replace_books(&books).unwrap();

        let loaded = gateway.load_books().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "Dune");
        assert_eq!(loaded[1].title, "Foundation");
        assert_eq!(loaded[0].available_count, 2);

        // Replacement is wholesale, not additive
        gateway.replace_books(&books[..1]).unwrap();
        assert_eq!(gateway.load_books().unwrap().len(), 1);
    }

    #[test]
    fn test_loans_allow_duplicate_pairs() {
        let mut gateway = open_initialized();

        let loans = vec![Loan::new("M1", "Dune"), Loan::new("M1", "Dune")];
        gateway.replace_loans(&loans).unwrap();

        let loaded = gateway.load_loans().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().all(|l| l.matches("M1", "Dune")));
    }

    #[test]
    fn test_register_publisher_is_idempotent() {
        let mut gateway = open_initialized();

        gateway.register_publisher("Ace").unwrap();
        gateway.register_publisher("Ace").unwrap();
        gateway.register_category("SF").unwrap();

        assert_eq!(count(&gateway, "publishers"), 2);
        assert_eq!(count(&gateway, "categories"), 2);
    }
}
