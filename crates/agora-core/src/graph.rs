//! # Graph Model
//!
//! The canonical in-memory graph for Agora.
//!
//! A [`GraphModel`] is constructed once per dataset load and is immutable
//! thereafter; the degree index is derived from the full edge set at
//! construction and is read-only. All storage uses `BTreeMap` for
//! deterministic iteration order.

use crate::types::{EdgeId, GraphEdge, GraphNode, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// GRAPH MODEL
// =============================================================================

/// The full knowledge graph plus its derived degree index.
///
/// Construction enforces the closure invariant from birth: edges whose
/// source or target is missing from the node set are dropped, so every
/// edge held by the model has both endpoints present.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    /// Node storage: NodeId -> GraphNode
    nodes: BTreeMap<NodeId, GraphNode>,

    /// Edge storage: EdgeId -> GraphEdge
    edges: BTreeMap<EdgeId, GraphEdge>,

    /// Derived, read-only: NodeId -> incident edge count over the full
    /// edge set. Never mutated after construction.
    degree: BTreeMap<NodeId, usize>,
}

impl GraphModel {
    /// Build a model from raw node and edge lists.
    ///
    /// Duplicate ids resolve last-write-wins; dangling edges are dropped.
    #[must_use]
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let node_map: BTreeMap<NodeId, GraphNode> =
            nodes.into_iter().map(|n| (n.id.clone(), n)).collect();

        let mut edge_map = BTreeMap::new();
        for edge in edges {
            if node_map.contains_key(&edge.source) && node_map.contains_key(&edge.target) {
                edge_map.insert(edge.id.clone(), edge);
            }
        }

        let mut degree: BTreeMap<NodeId, usize> =
            node_map.keys().map(|id| (id.clone(), 0)).collect();
        for edge in edge_map.values() {
            if let Some(d) = degree.get_mut(&edge.source) {
                *d = d.saturating_add(1);
            }
            if let Some(d) = degree.get_mut(&edge.target) {
                *d = d.saturating_add(1);
            }
        }

        Self {
            nodes: node_map,
            edges: edge_map,
            degree,
        }
    }

    /// Lookup a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Lookup an edge by id.
    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    /// Check whether a node exists.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Check whether an edge exists.
    #[must_use]
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    /// All nodes in deterministic (id) order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// All edges in deterministic (id) order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    /// Total node count.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total edge count.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Precomputed degree of a node over the full edge set.
    ///
    /// Unknown ids report zero rather than erroring; selections may
    /// reference nodes outside the current dataset.
    #[must_use]
    pub fn degree(&self, id: &NodeId) -> usize {
        self.degree.get(id).copied().unwrap_or(0)
    }

    /// The whole degree index.
    #[must_use]
    pub fn degree_index(&self) -> &BTreeMap<NodeId, usize> {
        &self.degree
    }

    /// Derived summary statistics for status surfaces.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let mut kind_counts: BTreeMap<String, usize> = BTreeMap::new();
        for node in self.nodes.values() {
            *kind_counts.entry(node.kind.as_str().to_string()).or_default() += 1;
        }
        let max_degree = self.degree.values().copied().max().unwrap_or(0);
        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            kind_counts,
            max_degree,
        }
    }
}

// =============================================================================
// GRAPH STATISTICS
// =============================================================================

/// Read-only summary of a loaded graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub kind_counts: BTreeMap<String, usize>,
    pub max_degree: usize,
}

// =============================================================================
// TESTS
// =============================================================================
