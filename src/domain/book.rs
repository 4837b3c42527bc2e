//! Catalog entry for a registered title.

use serde::{Deserialize, Serialize};

/// A registered book with its copy counts.
///
/// The title is the natural key: uniqueness is enforced
/// case-insensitively at registration. `available_count` moves between
/// `0` and `initial_count` through lend/return and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// ISBN as entered (not validated, not unique)
    pub isbn: String,

    /// Title (natural key, unique case-insensitively)
    pub title: String,

    /// Author name
    pub author: String,

    /// Publisher name
    pub publisher: String,

    /// Publication year
    pub year: u32,

    /// Copies currently on the shelf
    pub available_count: u32,

    /// Copies owned by the library
    pub initial_count: u32,

    /// Category name
    pub category: String,
}

impl Book {
    /// Create a new book with all copies available
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        publisher: impl Into<String>,
        year: u32,
        count: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            publisher: publisher.into(),
            year,
            available_count: count,
            initial_count: count,
            category: category.into(),
        }
    }

    /// Case-insensitive title match
    pub fn matches_title(&self, title: &str) -> bool {
        self.title.eq_ignore_ascii_case(title)
    }

    /// Check whether at least one copy is on the shelf
    pub fn has_available(&self) -> bool {
        self.available_count > 0
    }

    /// Check whether every owned copy is on the shelf
    pub fn is_fully_stocked(&self) -> bool {
        self.available_count == self.initial_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_starts_fully_stocked() {
        let book = Book::new("9780441013593", "Dune", "Frank Herbert", "Ace", 1965, 3, "SF");

        assert_eq!(book.available_count, 3);
        assert_eq!(book.initial_count, 3);
        assert!(book.has_available());
        assert!(book.is_fully_stocked());
    }

    #[test]
    fn test_title_match_ignores_case() {
        let book = Book::new("", "Dune", "Frank Herbert", "Ace", 1965, 1, "SF");

        assert!(book.matches_title("dune"));
        assert!(book.matches_title("DUNE"));
        assert!(!book.matches_title("Dune Messiah"));
    }
}
