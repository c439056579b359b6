//! # agora-core
//!
//! The deterministic graph-workspace engine for Agora - THE LOGIC.
//!
//! Agora explores a richly-typed knowledge graph through several
//! synchronized views. This crate holds everything those views share that
//! has real invariants: the canonical graph model and its degree index, the
//! filter/pruning engine with its edge-closure guarantee, three stateless
//! layout algorithms, and the mapping from selection state to render
//! directives.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: NO async, NO network dependencies — fetching and state
//!   orchestration live in the application crate
//! - Deterministic: BTreeMap/BTreeSet storage, explicit tie-breaks, seeded
//!   layout placement, fixed iteration budgets; identical inputs always
//!   produce identical outputs
//! - Closed: rendering engines and REST services are external
//!   collaborators; this crate only produces data and geometry for them

// =============================================================================
// MODULES
// =============================================================================

pub mod document;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod overview;
pub mod primitives;
pub mod selection;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AgoraError, EdgeId, FilterPatch, FilterState, GraphEdge, GraphNode, NodeId, NodeKind,
    SelectionPatch, SelectionState,
};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use document::GraphDocument;
pub use filter::{FilterOptions, ReducedGraph, filter_graph};
pub use graph::{GraphModel, GraphStats};
pub use selection::{RenderDirective, directives};

// =============================================================================
// RE-EXPORTS: Layout Engines
// =============================================================================

pub use layout::Point;
pub use layout::constellation::{Constellation, ConstellationOptions, constellation_layout};
pub use layout::flow::{FlowLayout, FlowLayoutOptions, FlowLink, FlowNode, evidence_flow_layout};
pub use layout::force::{ForceLayoutOptions, force_network_layout};

// =============================================================================
// RE-EXPORTS: Overview Projections
// =============================================================================

pub use overview::{
    ArgumentEvidenceOverview, ConceptClusterOverview, EvidenceStage, InfluenceMatrix, PathRequest,
    PathResponse, TimelineOverview,
};
