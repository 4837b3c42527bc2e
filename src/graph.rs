//! Loan relationship graph for borrowing-overlap recommendations.
//!
//! Vertices are members and titles; edges run member→title, one edge
//! instance per outstanding loan, so multiplicities track multi-copy
//! borrowing. Adjacency is a plain list per vertex with linear
//! scan/removal, which is adequate at library scale.

use std::collections::{BTreeSet, HashMap, HashSet};

/// A vertex in the loan graph.
///
/// The vertex space is the union of member ids and titles; the enum
/// keeps the two id spaces apart without reserving any prefix in the
/// ids themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vertex {
    /// A registered member, by id
    Member(String),

    /// A registered title, in catalog casing
    Title(String),
}

/// Directed multigraph of "member currently holds a copy of title".
#[derive(Debug, Clone, Default)]
pub struct LoanGraph {
    /// Outgoing titles per vertex; only member vertices carry edges
    adjacency: HashMap<Vertex, Vec<String>>,
}

impl LoanGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex; no-op if it is already present
    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.adjacency.entry(vertex).or_default();
    }

    /// Check whether a vertex is present
    pub fn contains_vertex(&self, vertex: &Vertex) -> bool {
        self.adjacency.contains_key(vertex)
    }

    /// Record one loan edge from a member to a title.
    ///
    /// Edges accumulate: lending a second copy of the same title to
    /// the same member adds a second instance.
    pub fn add_edge(&mut self, member_id: &str, title: &str) {
        self.adjacency
            .entry(Vertex::Member(member_id.to_string()))
            .or_default()
            .push(title.to_string());
    }

    /// Remove exactly one edge instance from a member to a title.
    ///
    /// No-op if no such edge exists.
    pub fn remove_edge(&mut self, member_id: &str, title: &str) {
        if let Some(titles) = self
            .adjacency
            .get_mut(&Vertex::Member(member_id.to_string()))
        {
            if let Some(pos) = titles.iter().position(|t| t == title) {
                titles.remove(pos);
            }
        }
    }

    /// Remove a title vertex and every edge instance pointing at it,
    /// from every member
    pub fn remove_title(&mut self, title: &str) {
        self.adjacency.remove(&Vertex::Title(title.to_string()));
        for titles in self.adjacency.values_mut() {
            titles.retain(|t| t != title);
        }
    }

    /// Number of edge instances from a member to a title
    pub fn multiplicity(&self, member_id: &str, title: &str) -> usize {
        self.adjacency
            .get(&Vertex::Member(member_id.to_string()))
            .map(|titles| titles.iter().filter(|t| *t == title).count())
            .unwrap_or(0)
    }

    /// Distinct titles a member currently holds
    pub fn holdings(&self, member_id: &str) -> HashSet<&str> {
        self.adjacency
            .get(&Vertex::Member(member_id.to_string()))
            .map(|titles| titles.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Titles held by taste-similar members.
    ///
    /// A member is similar when the set of distinct titles they hold
    /// overlaps the query member's. The result is the union of those
    /// members' holdings minus the query member's own, so it never
    /// contains an already-held title and the query member never
    /// recommends to themself. The set content is deterministic; only
    /// output ordering is unspecified by the contract.
    pub fn recommend(&self, member_id: &str) -> BTreeSet<String> {
        let own = self.holdings(member_id);
        let mut recommendations = BTreeSet::new();

        for (vertex, titles) in &self.adjacency {
            let Vertex::Member(other) = vertex else {
                continue;
            };
            if other == member_id {
                continue;
            }
            let theirs: HashSet<&str> = titles.iter().map(String::as_str).collect();
            if theirs.intersection(&own).next().is_some() {
                recommendations.extend(theirs.difference(&own).map(|t| t.to_string()));
            }
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> Vertex {
        Vertex::Member(id.to_string())
    }

    fn title(t: &str) -> Vertex {
        Vertex::Title(t.to_string())
    }

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut graph = LoanGraph::new();
        graph.add_vertex(member("M1"));
        graph.add_edge("M1", "Dune");
        graph.add_vertex(member("M1"));

        // Re-adding the vertex must not clear its edges
        assert_eq!(graph.multiplicity("M1", "Dune"), 1);
    }

    #[test]
    fn test_edges_accumulate_multiplicity() {
        let mut graph = LoanGraph::new();
        graph.add_edge("M1", "Dune");
        graph.add_edge("M1", "Dune");

        assert_eq!(graph.multiplicity("M1", "Dune"), 2);
        assert_eq!(graph.holdings("M1").len(), 1);
    }

    #[test]
    fn test_remove_edge_takes_one_instance() {
        let mut graph = LoanGraph::new();
        graph.add_edge("M1", "Dune");
        graph.add_edge("M1", "Dune");

        graph.remove_edge("M1", "Dune");
        assert_eq!(graph.multiplicity("M1", "Dune"), 1);

        graph.remove_edge("M1", "Dune");
        assert_eq!(graph.multiplicity("M1", "Dune"), 0);

        // Removing a missing edge is a no-op
        graph.remove_edge("M1", "Dune");
        graph.remove_edge("M2", "Dune");
    }

    #[test]
    fn test_remove_title_clears_all_instances() {
        let mut graph = LoanGraph::new();
        graph.add_vertex(title("Dune"));
        graph.add_edge("M1", "Dune");
        graph.add_edge("M1", "Dune");
        graph.add_edge("M2", "Dune");
        graph.add_edge("M2", "Foundation");

        graph.remove_title("Dune");

        assert!(!graph.contains_vertex(&title("Dune")));
        assert_eq!(graph.multiplicity("M1", "Dune"), 0);
        assert_eq!(graph.multiplicity("M2", "Dune"), 0);
        assert_eq!(graph.multiplicity("M2", "Foundation"), 1);
    }

    #[test]
    fn test_recommend_from_overlapping_member() {
        let mut graph = LoanGraph::new();
        // M1 and M2 both hold Foundation; M1 additionally holds Dune
        graph.add_edge("M1", "Foundation");
        graph.add_edge("M1", "Dune");
        graph.add_edge("M2", "Foundation");

        let recs = graph.recommend("M2");
        assert!(recs.contains("Dune"));
        assert!(!recs.contains("Foundation"));
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_recommend_requires_overlap() {
        let mut graph = LoanGraph::new();
        graph.add_edge("M1", "Dune");
        graph.add_edge("M2", "Foundation");

        // No common title, so no evidence of similar taste
        assert!(graph.recommend("M2").is_empty());
    }

    #[test]
    fn test_recommend_never_includes_own_holdings() {
        let mut graph = LoanGraph::new();
        graph.add_edge("M1", "Dune");
        graph.add_edge("M1", "Foundation");
        graph.add_edge("M1", "Hyperion");
        graph.add_edge("M2", "Dune");
        graph.add_edge("M2", "Foundation");

        let recs = graph.recommend("M2");
        assert_eq!(recs.into_iter().collect::<Vec<_>>(), vec!["Hyperion"]);
    }

    #[test]
    fn test_recommend_for_member_with_no_loans() {
        let mut graph = LoanGraph::new();
        graph.add_vertex(member("M3"));
        graph.add_edge("M1", "Dune");

        assert!(graph.recommend("M3").is_empty());
    }

    #[test]
    fn test_title_vertex_never_contributes_recommendations() {
        let mut graph = LoanGraph::new();
        graph.add_vertex(title("Dune"));
        graph.add_edge("M1", "Dune");
        graph.add_edge("M2", "Dune");
        graph.add_edge("M2", "Foundation");

        let recs = graph.recommend("M1");
        assert_eq!(recs.into_iter().collect::<Vec<_>>(), vec!["Foundation"]);
    }
}
