//! Durable storage boundary.
//!
//! The library system mirrors its in-memory state into a durable
//! store after every mutation by replacing whole entity sets. The
//! [`PersistenceGateway`] trait is that boundary; [`SqliteGateway`]
//! is the SQLite-backed implementation used in production.

pub mod sqlite;

use thiserror::Error;

use crate::domain::{Book, Loan, Member};

pub use sqlite::SqliteGateway;

/// Errors from the durable store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable store exposing load and wholesale-replace per entity set.
///
/// `replace_*` discards the prior durable contents of the set and
/// writes the given collection in order, atomically. There is no
/// incremental write path; the in-memory side is the source of truth
/// and the caller is the sole writer.
pub trait PersistenceGateway {
    /// Create the schema if needed and seed the reference sets with
    /// their sentinel entries ("Unknown" publisher, "Uncategorized"
    /// category). Safe to call on every startup.
    fn initialize(&mut self) -> Result<(), StoreError>;

    /// Load all books, in insertion order
    fn load_books(&self) -> Result<Vec<Book>, StoreError>;

    /// Load all members
    fn load_members(&self) -> Result<Vec<Member>, StoreError>;

    /// Load all outstanding loans
    fn load_loans(&self) -> Result<Vec<Loan>, StoreError>;

    /// Replace the books entity set
    fn replace_books(&mut self, books: &[Book]) -> Result<(), StoreError>;

    /// Replace the members entity set
    fn replace_members(&mut self, members: &[Member]) -> Result<(), StoreError>;

    /// Replace the loans entity set
    fn replace_loans(&mut self, loans: &[Loan]) -> Result<(), StoreError>;

    /// Record a publisher name in the reference set (insert-if-absent)
    fn register_publisher(&mut self, name: &str) -> Result<(), StoreError>;

    /// Record a category name in the reference set (insert-if-absent)
    fn register_category(&mut self, name: &str) -> Result<(), StoreError>;
}
