//! # Selection Sync
//!
//! Translates the canonical selection state into render-time instructions
//! for whichever view is mounted: "highlight exactly these ids", "center
//! the camera here", "clear the focus".
//!
//! Views react independently to the same state snapshot — selection is
//! eventually consistent across views within one synchronous update, with
//! no cross-view animation choreography. Ids that don't resolve in the
//! active graph are silently ignored: selections may legitimately reference
//! nodes temporarily outside the current filtered view.

use crate::graph::GraphModel;
use crate::primitives::FOCUS_ZOOM;
use crate::types::{EdgeId, NodeId, SelectionState};
use serde::Serialize;

// =============================================================================
// RENDER DIRECTIVES
// =============================================================================

/// The narrow command surface a rendering engine consumes.
///
/// This is everything the core ever tells a renderer; the retained engine
/// handle itself stays owned by the mounting view and is torn down there.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum RenderDirective {
    /// Highlight exactly these ids and nothing else.
    Highlight {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },
    /// Center the camera on one node at the given target zoom.
    Center { node: NodeId, zoom: f64 },
    /// The focus was cleared; drop any centering/selection emphasis.
    ClearFocus,
}

// =============================================================================
// DIRECTIVE DERIVATION
// =============================================================================

/// Derive the directives a view must apply when moving from `prev` to
/// `next` against the currently active graph.
#[must_use]
pub fn directives(
    prev: &SelectionState,
    next: &SelectionState,
    graph: &GraphModel,
) -> Vec<RenderDirective> {
    let mut out = Vec::new();

    if prev.nodes != next.nodes || prev.edges != next.edges {
        out.push(RenderDirective::Highlight {
            nodes: next
                .nodes
                .iter()
                .filter(|id| graph.contains_node(id))
                .cloned()
                .collect(),
            edges: next
                .edges
                .iter()
                .filter(|id| graph.contains_edge(id))
                .cloned()
                .collect(),
        });
    }

    if prev.focus_node != next.focus_node {
        match &next.focus_node {
            Some(id) if graph.contains_node(id) => out.push(RenderDirective::Center {
                node: id.clone(),
                zoom: FOCUS_ZOOM,
            }),
            // Unresolvable focus: emit nothing rather than crash or center
            // on a phantom.
            Some(_) => {}
            None => out.push(RenderDirective::ClearFocus),
        }
    }

    out
}

// =============================================================================
// TESTS
// =============================================================================
