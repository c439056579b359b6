//! # Filter Engine
//!
//! Pure reduction of the full graph to a visually tractable subgraph.
//!
//! The reduction runs five passes: predicate filtering, selection override,
//! edge reduction, closure-restoring expansion, and degree-based pruning.
//! Output always satisfies the closure invariant (every surviving edge has
//! both endpoints in the surviving node set) and is fully deterministic:
//! nodes are ordered by descending full-graph degree, tie-broken by
//! ascending case-insensitive label, then ascending id.

use crate::graph::GraphModel;
use crate::primitives::DEFAULT_MAX_NODES;
use crate::types::{FilterState, GraphEdge, GraphNode, NodeId, SelectionState};
use serde::Serialize;
use std::collections::BTreeSet;

// =============================================================================
// OPTIONS & OUTPUT
// =============================================================================

/// Tuning knobs for [`filter_graph`].
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    /// Pruning budget. Pinned selection nodes are exempt: they are never
    /// silently dropped, so output may exceed this by the pinned count.
    pub max_nodes: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// The reduced graph handed to the network view.
///
/// Node order carries the pruning comparator (degree desc, label asc,
/// id asc); edges are ordered by id. Empty output is a valid value, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReducedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ReducedGraph {
    /// True when nothing survived the reduction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// The surviving node ids as a set.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<&NodeId> {
        self.nodes.iter().map(|n| &n.id).collect()
    }
}

// =============================================================================
// PREDICATE PASS
// =============================================================================

/// Dimension predicates AND together; a node missing an attribute is never
/// excluded by that dimension's filter.
fn node_passes(node: &GraphNode, filters: &FilterState) -> bool {
    if !filters.node_kinds.is_empty() && !filters.node_kinds.contains(node.kind.as_str()) {
        return false;
    }
    if !filters.periods.is_empty()
        && node
            .period
            .as_ref()
            .is_some_and(|p| !filters.periods.contains(p))
    {
        return false;
    }
    if !filters.schools.is_empty()
        && node
            .school
            .as_ref()
            .is_some_and(|s| !filters.schools.contains(s))
    {
        return false;
    }
    if !filters.search_term.is_empty() && !search_matches(node, &filters.search_term) {
        return false;
    }
    true
}

/// Case-insensitive substring search over label, description, period and
/// school.
fn search_matches(node: &GraphNode, term: &str) -> bool {
    let needle = term.to_lowercase();
    let mut haystack = node.label.to_lowercase();
    for field in [&node.description, &node.period, &node.school] {
        if let Some(value) = field {
            haystack.push(' ');
            haystack.push_str(&value.to_lowercase());
        }
    }
    haystack.contains(&needle)
}

// =============================================================================
// FILTER GRAPH
// =============================================================================

/// Reduce `graph` under `filters`, with `selection.nodes` pinned into the
/// result and the node count capped by `options.max_nodes`.
///
/// Edge semantics: with an empty relation filter an edge survives only when
/// both endpoints survived the node passes. With a non-empty relation
/// filter, an edge whose relation is explicitly selected survives when at
/// least one endpoint survived, and the expansion pass pulls the other
/// endpoint back in — an explicitly requested relation may resurface an
/// otherwise-filtered neighbor, but unselected relations never leak nodes.
#[must_use]
pub fn filter_graph(
    graph: &GraphModel,
    filters: &FilterState,
    selection: &SelectionState,
    options: &FilterOptions,
) -> ReducedGraph {
    // Pass 1: predicates.
    let mut surviving: BTreeSet<&NodeId> = graph
        .nodes()
        .filter(|n| node_passes(n, filters))
        .map(|n| &n.id)
        .collect();

    // Pass 2: pinned selection overrides the predicates.
    let pinned: BTreeSet<&NodeId> = selection
        .nodes
        .iter()
        .filter(|id| graph.contains_node(id))
        .collect();
    surviving.extend(pinned.iter().copied());

    // Pass 3: edge reduction.
    let relation_selected = !filters.relations.is_empty();
    let mut kept_edges: Vec<&GraphEdge> = Vec::new();
    for edge in graph.edges() {
        if relation_selected && !filters.relations.contains(&edge.relation) {
            continue;
        }
        let source_in = surviving.contains(&edge.source);
        let target_in = surviving.contains(&edge.target);
        let keep = if relation_selected {
            source_in || target_in
        } else {
            source_in && target_in
        };
        if keep {
            kept_edges.push(edge);
        }
    }

    // Pass 4: expansion re-establishes closure for relation-selected edges.
    if relation_selected {
        for edge in &kept_edges {
            surviving.insert(&edge.source);
            surviving.insert(&edge.target);
        }
    }

    // Pass 5: degree-based pruning with the pinned exemption.
    let mut ordered: Vec<&GraphNode> = surviving.iter().filter_map(|id| graph.node(id)).collect();
    ordered.sort_by(|a, b| {
        graph
            .degree(&b.id)
            .cmp(&graph.degree(&a.id))
            .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    });

    let final_ids: BTreeSet<&NodeId> = if ordered.len() > options.max_nodes {
        ordered
            .iter()
            .take(options.max_nodes)
            .map(|n| &n.id)
            .chain(pinned.iter().copied())
            .collect()
    } else {
        ordered.iter().map(|n| &n.id).collect()
    };

    let nodes: Vec<GraphNode> = ordered
        .iter()
        .filter(|n| final_ids.contains(&n.id))
        .map(|n| (*n).clone())
        .collect();

    // Final closure intersection over the pruned node set.
    let mut edges: Vec<GraphEdge> = kept_edges
        .into_iter()
        .filter(|e| final_ids.contains(&e.source) && final_ids.contains(&e.target))
        .cloned()
        .collect();
    edges.sort_by(|a, b| a.id.cmp(&b.id));

    ReducedGraph { nodes, edges }
}

// =============================================================================
// TESTS
// =============================================================================
