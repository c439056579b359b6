//! # Core Type Definitions
//!
//! This module contains all core types for the Agora graph workspace:
//! - Graph identifiers (`NodeId`, `EdgeId`)
//! - Node and edge records (`GraphNode`, `GraphEdge`, `NodeKind`)
//! - Canonical workspace state (`FilterState`, `SelectionState`) and the
//!   partial-update shapes applied through the store setters
//! - Error types (`AgoraError`)
//!
//! ## Determinism Guarantees
//!
//! All set-valued state uses `BTreeSet`, so equal filter or selection
//! intents always compare equal and iterate in one canonical order. That
//! ordering is what makes memoization in consuming views cheap and what
//! keeps every downstream computation reproducible.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

// =============================================================================
// GRAPH IDENTIFIERS
// =============================================================================

/// Unique identifier for a node. Identity is the string; every other node
/// field is descriptive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node id from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for an edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Create a new edge id from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// NODE KIND
// =============================================================================

/// The tagged variant a node is keyed on.
///
/// The known kinds carry the core contract; anything else arriving on the
/// wire is preserved verbatim in `Other` so filtering still works by string
/// comparison without the core inventing semantics for it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Person,
    Work,
    Concept,
    Argument,
    Debate,
    Reformulation,
    Quote,
    #[serde(untagged)]
    Other(String),
}

impl NodeKind {
    /// The wire-format string for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "person",
            Self::Work => "work",
            Self::Concept => "concept",
            Self::Argument => "argument",
            Self::Debate => "debate",
            Self::Reformulation => "reformulation",
            Self::Quote => "quote",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NODE & EDGE RECORDS
// =============================================================================

/// A node in the knowledge graph.
///
/// Statically known fields are spelled out; wire fields outside the core
/// contract land in `extra` untouched. `community` is an opaque,
/// externally-computed cluster label — the core never populates or
/// interprets it beyond passing it through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancient_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modern_scholarship: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl GraphNode {
    /// Create a node with only the identity fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(id),
            label: label.into(),
            kind,
            period: None,
            school: None,
            description: None,
            ancient_sources: Vec::new(),
            modern_scholarship: Vec::new(),
            community: None,
            extra: BTreeMap::new(),
        }
    }

    /// Builder-style period setter.
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Builder-style school setter.
    #[must_use]
    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = Some(school.into());
        self
    }

    /// Builder-style description setter.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A directed, typed edge between two nodes.
///
/// An edge is only meaningful when both endpoints exist in the active node
/// set; every filtered graph in this crate upholds that closure invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub relation: String,
}

impl GraphEdge {
    /// Create a new edge.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            id: EdgeId::new(id),
            source: NodeId::new(source),
            target: NodeId::new(target),
            relation: relation.into(),
        }
    }
}

// =============================================================================
// FILTER STATE
// =============================================================================

/// The canonical filter state shared by every view.
///
/// Set-valued fields are `BTreeSet`s: de-duplicated and sorted by
/// construction, so two equal filter intents are structurally equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(rename = "nodeTypes", default)]
    pub node_kinds: BTreeSet<String>,
    #[serde(default)]
    pub periods: BTreeSet<String>,
    #[serde(default)]
    pub schools: BTreeSet<String>,
    #[serde(default)]
    pub relations: BTreeSet<String>,
    #[serde(default)]
    pub search_term: String,
}

impl FilterState {
    /// True when no dimension constrains anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_kinds.is_empty()
            && self.periods.is_empty()
            && self.schools.is_empty()
            && self.relations.is_empty()
            && self.search_term.is_empty()
    }

    /// Return a copy widened to include the given node kind.
    ///
    /// A filter with an empty kind set already admits every kind, so the
    /// widening only applies when the set is non-empty.
    #[must_use]
    pub fn with_node_kind(&self, kind: &str) -> Self {
        let mut widened = self.clone();
        if !widened.node_kinds.is_empty() {
            widened.node_kinds.insert(kind.to_string());
        }
        widened
    }
}

/// Partial update applied to a [`FilterState`] through the store setter.
///
/// `None` fields leave the previous value untouched; `Some` fields replace
/// it wholesale. List inputs are collected into `BTreeSet`s, which is the
/// dedupe + sort normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPatch {
    #[serde(rename = "nodeTypes", default)]
    pub node_kinds: Option<Vec<String>>,
    #[serde(default)]
    pub periods: Option<Vec<String>>,
    #[serde(default)]
    pub schools: Option<Vec<String>>,
    #[serde(default)]
    pub relations: Option<Vec<String>>,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl FilterPatch {
    /// Apply this patch to a previous state, producing a new normalized one.
    #[must_use]
    pub fn apply(&self, prev: &FilterState) -> FilterState {
        FilterState {
            node_kinds: merge_set(self.node_kinds.as_deref(), &prev.node_kinds),
            periods: merge_set(self.periods.as_deref(), &prev.periods),
            schools: merge_set(self.schools.as_deref(), &prev.schools),
            relations: merge_set(self.relations.as_deref(), &prev.relations),
            search_term: self
                .search_term
                .clone()
                .unwrap_or_else(|| prev.search_term.clone()),
        }
    }
}

fn merge_set(update: Option<&[String]>, prev: &BTreeSet<String>) -> BTreeSet<String> {
    match update {
        Some(values) => values.iter().cloned().collect(),
        None => prev.clone(),
    }
}

// =============================================================================
// SELECTION STATE
// =============================================================================

/// The canonical selection state shared by every view.
///
/// `focus_node` drives camera centering, never membership; it may reference
/// an id temporarily outside the filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    #[serde(default)]
    pub nodes: BTreeSet<NodeId>,
    #[serde(default)]
    pub edges: BTreeSet<EdgeId>,
    #[serde(default)]
    pub focus_node: Option<NodeId>,
}

impl SelectionState {
    /// True when nothing is selected and no node is focused.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.focus_node.is_none()
    }
}

/// Partial update applied to a [`SelectionState`] through the store setter.
///
/// The focus field is doubly optional: outer `None` leaves the focus alone,
/// `Some(None)` clears it, `Some(Some(id))` moves it.
#[derive(Debug, Clone, Default)]
pub struct SelectionPatch {
    pub nodes: Option<Vec<NodeId>>,
    pub edges: Option<Vec<EdgeId>>,
    pub focus_node: Option<Option<NodeId>>,
}

impl SelectionPatch {
    /// Apply this patch to a previous state, producing a new normalized one.
    #[must_use]
    pub fn apply(&self, prev: &SelectionState) -> SelectionState {
        SelectionState {
            nodes: match &self.nodes {
                Some(values) => values.iter().cloned().collect(),
                None => prev.nodes.clone(),
            },
            edges: match &self.edges {
                Some(values) => values.iter().cloned().collect(),
                None => prev.edges.clone(),
            },
            focus_node: match &self.focus_node {
                Some(focus) => focus.clone(),
                None => prev.focus_node.clone(),
            },
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Agora core.
///
/// - No silent failures, and no panics: all errors are recoverable
/// - Empty results are values, not errors — a filter that removes every
///   node returns an empty graph, and a layout over zero nodes returns
///   empty geometry
#[derive(Debug, Error)]
pub enum AgoraError {
    /// The wire document could not be parsed into a graph.
    #[error("Malformed graph document: {0}")]
    MalformedDocument(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred (file-loading surfaces in the binary).
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_patch_deduplicates_and_sorts() {
        let patch = FilterPatch {
            node_kinds: Some(vec![
                "work".to_string(),
                "person".to_string(),
                "work".to_string(),
            ]),
            ..FilterPatch::default()
        };
        let state = patch.apply(&FilterState::default());

        let kinds: Vec<_> = state.node_kinds.iter().cloned().collect();
        assert_eq!(kinds, vec!["person".to_string(), "work".to_string()]);
    }

    #[test]
    fn filter_patch_apply_is_idempotent() {
        let patch = FilterPatch {
            periods: Some(vec!["hellenistic".to_string(), "classical".to_string()]),
            search_term: Some("logos".to_string()),
            ..FilterPatch::default()
        };
        let once = patch.apply(&FilterState::default());
        let twice = patch.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn equal_filter_intents_compare_equal() {
        let a = FilterPatch {
            schools: Some(vec!["stoic".to_string(), "peripatetic".to_string()]),
            ..FilterPatch::default()
        }
        .apply(&FilterState::default());
        let b = FilterPatch {
            schools: Some(vec!["peripatetic".to_string(), "stoic".to_string()]),
            ..FilterPatch::default()
        }
        .apply(&FilterState::default());
        assert_eq!(a, b);
    }

    #[test]
    fn widening_only_applies_to_constrained_kind_sets() {
        let unconstrained = FilterState::default().with_node_kind("concept");
        assert!(unconstrained.node_kinds.is_empty());

        let constrained = FilterPatch {
            node_kinds: Some(vec!["person".to_string()]),
            ..FilterPatch::default()
        }
        .apply(&FilterState::default())
        .with_node_kind("concept");
        assert!(constrained.node_kinds.contains("concept"));
        assert!(constrained.node_kinds.contains("person"));
    }

    #[test]
    fn selection_patch_clears_focus() {
        let prev = SelectionState {
            focus_node: Some(NodeId::new("plato")),
            ..SelectionState::default()
        };
        let patch = SelectionPatch {
            focus_node: Some(None),
            ..SelectionPatch::default()
        };
        assert_eq!(patch.apply(&prev).focus_node, None);
    }

    #[test]
    fn node_kind_roundtrips_unknown_strings() {
        let kind: NodeKind =
            serde_json::from_str("\"anecdote\"").expect("unknown kind should parse");
        assert_eq!(kind, NodeKind::Other("anecdote".to_string()));
        assert_eq!(kind.as_str(), "anecdote");
    }

    #[test]
    fn graph_node_wire_shape_uses_type_key() {
        let json = r#"{"id":"n1","label":"Zeno","type":"person","period":"hellenistic"}"#;
        let node: GraphNode = serde_json::from_str(json).expect("node should parse");
        assert_eq!(node.kind, NodeKind::Person);
        assert_eq!(node.period.as_deref(), Some("hellenistic"));
        assert!(node.extra.is_empty());
    }

    #[test]
    fn graph_node_preserves_unknown_wire_fields() {
        let json = r#"{"id":"n1","label":"Zeno","type":"person","century":-3}"#;
        let node: GraphNode = serde_json::from_str(json).expect("node should parse");
        assert_eq!(
            node.extra.get("century"),
            Some(&serde_json::Value::from(-3))
        );
    }
}
