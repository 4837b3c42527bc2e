//! Registered borrower.

use serde::{Deserialize, Serialize};

/// A library member.
///
/// Members are registered once and never removed; the id is the
/// unique key used by loans and the recommendation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member id as entered
    pub id: String,

    /// Display name
    pub name: String,
}

impl Member {
    /// Create a new member
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
