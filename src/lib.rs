//! arbolib - library catalog, membership and lending manager
//!
//! Manages a library's catalog, members, and lending state, with
//! peer-similarity recommendations derived from borrowing overlap.
//!
//! # Architecture
//!
//! The in-memory state is the source of truth:
//! - An insertion-ordered catalog is the list of record for books
//! - Ordered indexes accelerate title and member-id lookup
//! - A loan graph mirrors outstanding loans for recommendations
//! - After every mutation, the affected durable entity sets are
//!   replaced wholesale through the persistence gateway
//!
//! # Modules
//!
//! - `index`: Arena-backed ordered index (insert/search/delete/iterate)
//! - `graph`: Loan graph and common-neighbor recommendations
//! - `library`: The `LibrarySystem` orchestrator
//! - `store`: Persistence gateway trait and SQLite implementation
//! - `domain`: Data structures (Book, Member, Loan)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! arbolib register-book "Dune" --author "Frank Herbert" --year 1965 --count 2
//! arbolib register-member M1 "Ada"
//! arbolib lend M1 "Dune"
//! arbolib recommend M1
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod graph;
pub mod index;
pub mod library;
pub mod store;

// Re-export main types at crate root for convenience
pub use domain::{Book, Loan, Member};
pub use graph::{LoanGraph, Vertex};
pub use index::OrderedIndex;
pub use library::{LibraryError, LibrarySystem};
pub use store::{PersistenceGateway, SqliteGateway, StoreError};
