//! Graph Model for Maximum Clique
//!
//! A clique is a subset of vertices that are pairwise connected. The QAOA
//! encoding needs three things from the graph:
//! - the edge set E (rewarded when both endpoints are selected)
//! - the complement set Ē of vertex pairs without an edge (penalized)
//! - a penalty constant scaling the complement term
//!
//! # Example
//!
//! ```
//! use qclique_core::graph::Graph;
//!
//! let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (3, 1)]).unwrap();
//! assert_eq!(graph.n_edges(), 5);
//! assert_eq!(graph.complement_edges().len(), 1);
//! ```

use rustc_hash::FxHashSet;

use crate::error::{QcliqueError, Result};

// =============================================================================
// Edge
// =============================================================================

/// Undirected edge, stored with `u < v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// Lower endpoint
    pub u: usize,
    /// Higher endpoint
    pub v: usize,
}

impl Edge {
    /// Create an edge, normalizing endpoint order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            u: a.min(b),
            v: a.max(b),
        }
    }

    /// Endpoints as a pair
    pub fn nodes(&self) -> (usize, usize) {
        (self.u, self.v)
    }
}

// =============================================================================
// Graph
// =============================================================================

/// Undirected, unweighted graph with a derived complement
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// Number of vertices; node names are 0..n_nodes
    n_nodes: usize,
    /// Edges in insertion order, de-duplicated
    edges: Vec<Edge>,
    /// Vertex pairs not joined by an edge, in lexicographic order
    complement: Vec<Edge>,
    /// Explicit penalty override
    penalty: Option<i64>,
}

impl Graph {
    /// Create a graph with `n_nodes` vertices and no edges
    pub fn new(n_nodes: usize) -> Result<Self> {
        if n_nodes == 0 {
            return Err(QcliqueError::InvalidGraph(
                "graph must have at least one node".into(),
            ));
        }

        let mut graph = Self {
            n_nodes,
            edges: Vec::new(),
            complement: Vec::new(),
            penalty: None,
        };
        graph.rebuild_complement();
        Ok(graph)
    }

    /// Create a graph from an edge list
    pub fn from_edges(n_nodes: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Self::new(n_nodes)?;
        for &(a, b) in edges {
            graph.insert_edge(a, b)?;
        }
        graph.rebuild_complement();
        Ok(graph)
    }

    /// Add an undirected edge. Duplicates are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<()> {
        self.insert_edge(a, b)?;
        self.rebuild_complement();
        Ok(())
    }

    /// Override the penalty constant
    pub fn with_penalty(mut self, penalty: i64) -> Self {
        self.penalty = Some(penalty);
        self
    }

    fn insert_edge(&mut self, a: usize, b: usize) -> Result<()> {
        if a >= self.n_nodes || b >= self.n_nodes {
            return Err(QcliqueError::InvalidGraph(format!(
                "edge ({}, {}) references a node outside [0, {})",
                a, b, self.n_nodes
            )));
        }
        if a == b {
            return Err(QcliqueError::InvalidGraph(format!(
                "self-loop on node {} is not allowed",
                a
            )));
        }

        let edge = Edge::new(a, b);
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
        Ok(())
    }

    fn rebuild_complement(&mut self) {
        let present: FxHashSet<Edge> = self.edges.iter().copied().collect();
        self.complement = (0..self.n_nodes)
            .flat_map(|i| ((i + 1)..self.n_nodes).map(move |j| Edge::new(i, j)))
            .filter(|e| !present.contains(e))
            .collect();
    }

    /// Number of vertices
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of edges
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edges of the graph
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Vertex pairs not connected by an edge
    pub fn complement_edges(&self) -> &[Edge] {
        &self.complement
    }

    /// Number of edges of the complete graph on the same vertices
    pub fn max_edges(&self) -> usize {
        self.n_nodes * (self.n_nodes - 1) / 2
    }

    /// Penalty applied per selected non-edge.
    ///
    /// Defaults to the edge count, so a selection containing any non-edge
    /// never scores above zero.
    pub fn penalty(&self) -> i64 {
        self.penalty.unwrap_or(self.edges.len() as i64)
    }

    /// Check whether two nodes are adjacent
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&Edge::new(a, b))
    }

    /// Degree of a vertex
    pub fn degree(&self, node: usize) -> usize {
        self.edges
            .iter()
            .filter(|e| e.u == node || e.v == node)
            .count()
    }

    /// Check that every node in `nodes` is pairwise adjacent
    pub fn is_clique(&self, nodes: &[usize]) -> bool {
        nodes.iter().enumerate().all(|(i, &a)| {
            nodes[i + 1..].iter().all(|&b| self.has_edge(a, b))
        })
    }

    // =========================================================================
    // Standard Graph Constructors
    // =========================================================================

    /// Complete graph K_n
    pub fn complete(n: usize) -> Result<Self> {
        let edges: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        Self::from_edges(n, &edges)
    }

    /// Cycle graph C_n
    pub fn cycle(n: usize) -> Result<Self> {
        if n < 3 {
            return Err(QcliqueError::InvalidGraph(format!(
                "cycle needs at least 3 nodes, got {}",
                n
            )));
        }
        let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        Self::from_edges(n, &edges)
    }
}

// =============================================================================
// Common Instances
// =============================================================================

/// Standard clique test instances
pub mod instances {
    use super::*;

    /// Expectation-maximizing angles found for [`demo_graph`] at depth 1
    pub const REFERENCE_GAMMA: f64 = 3.10693359375;
    /// See [`REFERENCE_GAMMA`]
    pub const REFERENCE_BETA: f64 = 2.50830078125;

    /// 4-cycle with chord (3, 1); maximum cliques {0, 1, 3} and {1, 2, 3}
    pub fn demo_graph() -> Graph {
        // Node indices are literal and in range, so construction cannot fail.
        let mut graph = Graph {
            n_nodes: 4,
            edges: vec![
                Edge::new(0, 1),
                Edge::new(1, 2),
                Edge::new(2, 3),
                Edge::new(3, 0),
                Edge::new(3, 1),
            ],
            complement: Vec::new(),
            penalty: None,
        };
        graph.rebuild_complement();
        graph
    }
}

// =============================================================================
// Tests
// =============================================================================
