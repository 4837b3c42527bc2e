//! The library system orchestrator.
//!
//! [`LibrarySystem`] owns every in-memory collection — the
//! insertion-ordered catalog, the title and member indexes, the loan
//! list, and the loan graph — and is their sole writer. Each mutating
//! operation validates first, updates memory, then replaces the
//! affected durable entity sets through the gateway in the same call.
//! Read operations never touch the gateway.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::info;

use crate::domain::{Book, Loan, Member};
use crate::graph::{LoanGraph, Vertex};
use crate::index::OrderedIndex;
use crate::store::{PersistenceGateway, StoreError};

/// Errors reported by library operations.
///
/// All variants are recoverable: an operation that fails leaves the
/// in-memory state exactly as it found it, because validation runs
/// before any mutation. The one exception is `Storage`, which means
/// memory was updated but the durable sync failed; callers that must
/// not diverge from durable state should reopen the system.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no copies of '{0}' are available")]
    Unavailable(String),

    #[error("all copies of '{0}' are already on the shelf")]
    OverReturn(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// The library: catalog, members, loans, and recommendations.
pub struct LibrarySystem<G: PersistenceGateway> {
    gateway: G,

    /// Insertion-ordered list of record for all books
    catalog: Vec<Book>,

    /// Lookup accelerator over the catalog, keyed by exact title
    title_index: OrderedIndex<String, Book>,

    /// Members keyed by id
    member_index: OrderedIndex<String, Member>,

    /// Outstanding loans; duplicates by (member, title) are valid
    loans: Vec<Loan>,

    /// Borrowing-overlap graph mirroring the loan list
    graph: LoanGraph,
}

impl<G: PersistenceGateway> LibrarySystem<G> {
    /// Open the system, initializing the store and rebuilding all
    /// in-memory structures from the durable entity sets.
    ///
    /// This is the only bulk import; afterwards memory leads and the
    /// store follows.
    pub fn open(mut gateway: G) -> Result<Self, LibraryError> {
        gateway.initialize()?;

        let books = gateway.load_books()?;
        let members = gateway.load_members()?;
        let loans = gateway.load_loans()?;

        let mut system = Self {
            gateway,
            catalog: Vec::new(),
            title_index: OrderedIndex::new(),
            member_index: OrderedIndex::new(),
            loans: Vec::new(),
            graph: LoanGraph::new(),
        };

        for book in books {
            system.title_index.insert(book.title.clone(), book.clone());
            system.graph.add_vertex(Vertex::Title(book.title.clone()));
            system.catalog.push(book);
        }
        for member in members {
            system.graph.add_vertex(Vertex::Member(member.id.clone()));
            system.member_index.insert(member.id.clone(), member);
        }
        for loan in loans {
            system.graph.add_edge(&loan.member_id, &loan.title);
            system.loans.push(loan);
        }

        info!(
            books = system.catalog.len(),
            members = system.member_index.len(),
            loans = system.loans.len(),
            "library system loaded"
        );
        Ok(system)
    }

    /// Register a new book with all copies available.
    ///
    /// The title is the natural key; registration fails with
    /// `AlreadyExists` if any book matches it case-insensitively. The
    /// publisher and category are recorded in the durable reference
    /// sets before the book itself.
    #[allow(clippy::too_many_arguments)]
    pub fn register_book(
        &mut self,
        isbn: &str,
        title: &str,
        author: &str,
        publisher: &str,
        year: u32,
        count: u32,
        category: &str,
    ) -> Result<Book, LibraryError> {
        if title.trim().is_empty() {
            return Err(LibraryError::InvalidInput("title must not be empty".into()));
        }
        if self.catalog.iter().any(|b| b.matches_title(title)) {
            return Err(LibraryError::AlreadyExists(title.to_string()));
        }

        self.gateway.register_publisher(publisher)?;
        self.gateway.register_category(category)?;

        let book = Book::new(isbn, title, author, publisher, year, count, category);
        self.title_index.insert(book.title.clone(), book.clone());
        self.graph.add_vertex(Vertex::Title(book.title.clone()));
        self.catalog.push(book.clone());
        self.sync_books()?;

        info!(title, count, "book registered");
        Ok(book)
    }

    /// Register a new member
    pub fn register_member(&mut self, id: &str, name: &str) -> Result<(), LibraryError> {
        if id.trim().is_empty() {
            return Err(LibraryError::InvalidInput(
                "member id must not be empty".into(),
            ));
        }
        if self.member_index.contains_key(id) {
            return Err(LibraryError::AlreadyExists(id.to_string()));
        }

        self.member_index
            .insert(id.to_string(), Member::new(id, name));
        self.graph.add_vertex(Vertex::Member(id.to_string()));
        self.sync_members()?;

        info!(id, name, "member registered");
        Ok(())
    }

    /// Lend one copy of a title to a member.
    ///
    /// Fails with `NotFound` for an unknown member or title and with
    /// `Unavailable` when no copy is on the shelf. Returns the book
    /// with its updated counts.
    pub fn lend(&mut self, member_id: &str, title: &str) -> Result<Book, LibraryError> {
        if !self.member_index.contains_key(member_id) {
            return Err(LibraryError::NotFound(format!("member '{}'", member_id)));
        }
        let pos = self
            .catalog
            .iter()
            .position(|b| b.matches_title(title))
            .ok_or_else(|| LibraryError::NotFound(format!("book '{}'", title)))?;
        if !self.catalog[pos].has_available() {
            return Err(LibraryError::Unavailable(self.catalog[pos].title.clone()));
        }

        self.catalog[pos].available_count -= 1;
        let book = self.catalog[pos].clone();
        self.refresh_index_entry(&book);
        self.loans.push(Loan::new(member_id, book.title.clone()));
        self.graph.add_edge(member_id, &book.title);
        self.sync_books()?;
        self.sync_loans()?;

        info!(
            member_id,
            title = %book.title,
            available = book.available_count,
            "book lent"
        );
        Ok(book)
    }

    /// Return one copy of a title from a member.
    ///
    /// Removes the first matching loan record (one copy only), fails
    /// with `NotFound` when the member or a matching loan is missing
    /// and with `OverReturn` when every owned copy is already on the
    /// shelf. Returns the book with its updated counts.
    pub fn return_book(&mut self, member_id: &str, title: &str) -> Result<Book, LibraryError> {
        if !self.member_index.contains_key(member_id) {
            return Err(LibraryError::NotFound(format!("member '{}'", member_id)));
        }
        let loan_pos = self
            .loans
            .iter()
            .position(|l| l.matches(member_id, title))
            .ok_or_else(|| {
                LibraryError::NotFound(format!("loan of '{}' by '{}'", title, member_id))
            })?;
        let book_pos = self
            .catalog
            .iter()
            .position(|b| b.matches_title(title))
            .ok_or_else(|| LibraryError::NotFound(format!("book '{}'", title)))?;
        if self.catalog[book_pos].is_fully_stocked() {
            return Err(LibraryError::OverReturn(
                self.catalog[book_pos].title.clone(),
            ));
        }

        self.catalog[book_pos].available_count += 1;
        let book = self.catalog[book_pos].clone();
        self.refresh_index_entry(&book);
        let loan = self.loans.remove(loan_pos);
        self.graph.remove_edge(&loan.member_id, &loan.title);
        self.sync_books()?;
        self.sync_loans()?;

        info!(
            member_id,
            title = %book.title,
            available = book.available_count,
            "book returned"
        );
        Ok(book)
    }

    /// Remove a title from the catalog, the index, and the graph.
    ///
    /// Every graph edge to the title is removed, from every member.
    /// Outstanding loan records referencing the title are left intact;
    /// whether removal should cascade to them (or be refused while
    /// loans are outstanding) is an unresolved product decision, so
    /// this keeps the reference behavior.
    pub fn remove_book(&mut self, title: &str) -> Result<Book, LibraryError> {
        let pos = self
            .catalog
            .iter()
            .position(|b| b.matches_title(title))
            .ok_or_else(|| LibraryError::NotFound(format!("book '{}'", title)))?;

        let book = self.catalog.remove(pos);
        self.title_index.remove(book.title.as_str());
        self.graph.remove_title(&book.title);
        self.sync_books()?;

        info!(title = %book.title, "book removed");
        Ok(book)
    }

    /// The catalog in reverse insertion order (most recently
    /// registered first)
    pub fn list_inventory(&self) -> Vec<&Book> {
        self.catalog.iter().rev().collect()
    }

    /// Exact-title lookup through the ordered index
    pub fn lookup_book(&self, title: &str) -> Option<&Book> {
        self.title_index.get(title)
    }

    /// Look up a member by id
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.member_index.get(id)
    }

    /// Titles held by members whose borrowing overlaps this member's
    pub fn recommend(&self, member_id: &str) -> BTreeSet<String> {
        self.graph.recommend(member_id)
    }

    /// Outstanding loans, in lending order
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Keep the index payload in step with the catalog record
    fn refresh_index_entry(&mut self, book: &Book) {
        if let Some(entry) = self.title_index.get_mut(book.title.as_str()) {
            *entry = book.clone();
        }
    }

    fn sync_books(&mut self) -> Result<(), StoreError> {
        self.gateway.replace_books(&self.catalog)
    }

    fn sync_members(&mut self) -> Result<(), StoreError> {
        // Serialized from the index's in-order traversal, so durable
        // rows are sorted by member id
        let members: Vec<Member> = self.member_index.iter().map(|(_, m)| m.clone()).collect();
        self.gateway.replace_members(&members)
    }

    fn sync_loans(&mut self) -> Result<(), StoreError> {
        self.gateway.replace_loans(&self.loans)
    }
}
