//! Outstanding borrowed-copy record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One outstanding borrowed copy.
///
/// A member borrowing several copies of the same title produces one
/// `Loan` per copy, so the loan list is a multiset over
/// (member_id, title) — duplicates are valid and expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Borrowing member's id
    pub member_id: String,

    /// Title of the borrowed book (stored in catalog casing)
    pub title: String,

    /// When the copy was lent out
    pub timestamp: DateTime<Utc>,
}

impl Loan {
    /// Create a loan stamped with the current time
    pub fn new(member_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            title: title.into(),
            timestamp: Utc::now(),
        }
    }

    /// Match by member id (exact) and title (case-insensitive)
    pub fn matches(&self, member_id: &str, title: &str) -> bool {
        self.member_id == member_id && self.title.eq_ignore_ascii_case(title)
    }
}
