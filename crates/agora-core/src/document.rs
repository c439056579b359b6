//! # Wire Document Codec
//!
//! The Cytoscape-shaped interchange form the network projection arrives in:
//! `{ "elements": { "nodes": [{"data": {...}}], "edges": [{"data": {...}}] } }`.
//!
//! The document is a transport shape only. Converting it into a
//! [`GraphModel`] drops dangling edges, which is what lets the rest of the
//! crate assume the closure invariant without re-checking it.

use crate::graph::GraphModel;
use crate::types::{AgoraError, GraphEdge, GraphNode};
use serde::{Deserialize, Serialize};

// =============================================================================
// DOCUMENT SHAPE
// =============================================================================

/// A full-graph wire document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub elements: GraphElements,
}

/// The `elements` envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphElements {
    #[serde(default)]
    pub nodes: Vec<NodeEnvelope>,
    #[serde(default)]
    pub edges: Vec<EdgeEnvelope>,
}

/// A node wrapped in the `{"data": ...}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEnvelope {
    pub data: GraphNode,
}

/// An edge wrapped in the `{"data": ...}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeEnvelope {
    pub data: GraphEdge,
}

impl GraphDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, AgoraError> {
        serde_json::from_str(json).map_err(|e| AgoraError::MalformedDocument(e.to_string()))
    }

    /// Convert into the immutable engine model.
    ///
    /// Edges referencing a node absent from the document are dropped here,
    /// never reported as errors.
    #[must_use]
    pub fn into_model(self) -> GraphModel {
        GraphModel::new(
            self.elements.nodes.into_iter().map(|n| n.data).collect(),
            self.elements.edges.into_iter().map(|e| e.data).collect(),
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeId, NodeKind};

    const SAMPLE: &str = r#"{
        "elements": {
            "nodes": [
                {"data": {"id": "plato", "label": "Plato", "type": "person", "school": "academy"}},
                {"data": {"id": "forms", "label": "Theory of Forms", "type": "concept"}}
            ],
            "edges": [
                {"data": {"id": "e1", "source": "plato", "target": "forms", "relation": "developed"}},
                {"data": {"id": "e2", "source": "plato", "target": "unknown", "relation": "taught"}}
            ]
        }
    }"#;

    #[test]
    fn parses_cytoscape_shape() {
        let doc = GraphDocument::from_json(SAMPLE).expect("document should parse");
        assert_eq!(doc.elements.nodes.len(), 2);
        assert_eq!(doc.elements.edges.len(), 2);
        assert_eq!(doc.elements.nodes[0].data.kind, NodeKind::Person);
    }

    #[test]
    fn into_model_drops_dangling_edges() {
        let model = GraphDocument::from_json(SAMPLE)
            .expect("document should parse")
            .into_model();
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edge_count(), 1);
        assert_eq!(model.degree(&NodeId::new("plato")), 1);
    }

    #[test]
    fn empty_document_yields_empty_model() {
        let model = GraphDocument::from_json("{}")
            .expect("empty document should parse")
            .into_model();
        assert_eq!(model.node_count(), 0);
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = GraphDocument::from_json("{\"elements\": [").expect_err("should fail");
        assert!(matches!(err, AgoraError::MalformedDocument(_)));
    }
}
