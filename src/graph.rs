//! # Reachability Graph
//!
//! Generic directed graph over node identities with transitive reachability
//! queries. Backs the precedence and stratification analyses.
//!
//! Edges and nodes live in ordered collections, so iteration and the
//! [`Display`](std::fmt::Display) rendering are deterministic. Every query is
//! total: nodes the graph has never seen answer `false`, never an error.
//!
//! Reachability is resolved by per-query depth-first search; the graph is
//! small (one node per relation) and queried rarely, so a maintained
//! transitive closure would not pay for itself.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Directed graph with transitive reachability
///
/// Nodes are registered implicitly by [`insert`](Graph::insert); inserts are
/// idempotent.
#[derive(Debug, Clone)]
pub struct Graph<N: Ord + Clone> {
    nodes: BTreeSet<N>,
    successors: BTreeMap<N, BTreeSet<N>>,
}

impl<N: Ord + Clone> Graph<N> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Graph {
            nodes: BTreeSet::new(),
            successors: BTreeMap::new(),
        }
    }

    /// Add the directed edge `from -> to`, registering both nodes
    pub fn insert(&mut self, from: N, to: N) {
        self.nodes.insert(from.clone());
        self.nodes.insert(to.clone());
        self.successors.entry(from).or_default().insert(to);
    }

    /// Check if a node was ever mentioned by an insert
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Check if the edge `from -> to` was directly inserted
    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        self.successors
            .get(from)
            .is_some_and(|succ| succ.contains(to))
    }

    /// Check if `to` is reachable from `from` via one or more edges
    ///
    /// `reaches(u, u)` is false unless `u` lies on a cycle routing back to
    /// itself: the search starts from the successors of `from`, not from
    /// `from` itself.
    pub fn reaches(&self, from: &N, to: &N) -> bool {
        let mut stack: Vec<&N> = match self.successors.get(from) {
            Some(succ) => succ.iter().collect(),
            None => return false,
        };
        let mut visited: BTreeSet<&N> = BTreeSet::new();

        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if visited.insert(node) {
                if let Some(succ) = self.successors.get(node) {
                    stack.extend(succ.iter());
                }
            }
        }

        false
    }

    /// Iterate over all registered nodes in order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Ord + Clone> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Ord + Clone + fmt::Display> fmt::Display for Graph<N> {
    /// Render all edges as `{a->b,c->d,...}` in node order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (from, successors) in &self.successors {
            for to in successors {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "{from}->{to}")?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}
