//! Domain types for the library system.
//!
//! This module contains the core records:
//! - Book: a catalog entry with copy counts
//! - Member: a registered borrower
//! - Loan: one outstanding borrowed copy

pub mod book;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::Book;
pub use loan::Loan;
pub use member::Member;
