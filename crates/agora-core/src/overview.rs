//! # Overview Projections
//!
//! Immutable snapshot shapes for the four server-computed overviews, plus
//! the path-finding request/response pair.
//!
//! Each snapshot is fetched whole for a given filter state and replaced
//! wholesale by the next fetch; there is no incremental merge. The wire
//! format is camelCase JSON, mapped here once so nothing downstream touches
//! raw payloads.

use crate::types::{EdgeId, GraphEdge, GraphNode, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// TIMELINE
// =============================================================================

/// Chronological projection: periods with per-kind counts and member nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineOverview {
    #[serde(default)]
    pub periods: Vec<TimelinePeriod>,
    pub range: YearRange,
}

/// One named period band on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePeriod {
    pub key: String,
    pub label: String,
    pub start_year: i32,
    pub end_year: i32,
    #[serde(default)]
    pub counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub nodes: Vec<TimelineNode>,
}

/// A node pinned onto a period band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineNode {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Overall year extent of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    pub min_year: i32,
    pub max_year: i32,
}

// =============================================================================
// ARGUMENT EVIDENCE
// =============================================================================

/// Evidence-flow projection: argument → ancient source → modern reception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentEvidenceOverview {
    #[serde(default)]
    pub nodes: Vec<EvidenceNode>,
    #[serde(default)]
    pub links: Vec<EvidenceLink>,
    #[serde(default)]
    pub arguments: Vec<ArgumentSummary>,
    pub stats: EvidenceStats,
}

/// Which of the three fixed flow columns a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStage {
    Argument,
    AncientSource,
    ModernReception,
}

impl EvidenceStage {
    /// The three columns in left-to-right order.
    pub const COLUMNS: [Self; 3] = [Self::Argument, Self::AncientSource, Self::ModernReception];

    /// Zero-based column index.
    #[must_use]
    pub fn column(self) -> usize {
        match self {
            Self::Argument => 0,
            Self::AncientSource => 1,
            Self::ModernReception => 2,
        }
    }
}

/// A node in the evidence flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceNode {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    pub stage: EvidenceStage,
}

/// A weighted link between two evidence nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceLink {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default = "default_link_value")]
    pub value: f64,
}

fn default_link_value() -> f64 {
    1.0
}

/// Headline row for the argument list beside the flow board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentSummary {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub period: Option<String>,
}

/// Aggregate counts across the evidence projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceStats {
    pub total_arguments: u64,
    pub total_ancient_sources: u64,
    pub total_modern_reception: u64,
}

// =============================================================================
// CONCEPT CLUSTERS
// =============================================================================

/// Constellation projection: externally-clustered concept groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptClusterOverview {
    #[serde(default)]
    pub clusters: Vec<ConceptCluster>,
    pub stats: ClusterStats,
}

/// One cluster of concept nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptCluster {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<ClusterNode>,
}

/// A node within a cluster. `x`/`y` are optional server-suggested seed
/// positions; the constellation layout uses them as initial placement when
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: Option<NodeKind>,
    #[serde(default)]
    pub school: Option<String>,
}

/// Aggregate counts across the cluster projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStats {
    pub total_concepts: u64,
    pub cluster_count: u64,
}

// =============================================================================
// INFLUENCE MATRIX
// =============================================================================

/// Influence projection: school-by-school (or period-by-period) cell counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluenceMatrix {
    #[serde(default)]
    pub rows: Vec<MatrixAxis>,
    #[serde(default)]
    pub columns: Vec<MatrixAxis>,
    #[serde(default)]
    pub cells: Vec<MatrixCell>,
    #[serde(default)]
    pub totals: MatrixTotals,
}

/// A labeled row or column of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixAxis {
    pub key: String,
    #[serde(default)]
    pub label: String,
}

/// One populated cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub row_key: String,
    pub column_key: String,
    pub count: u64,
    #[serde(default)]
    pub sample_edges: Vec<EdgeId>,
}

/// Marginal and grand totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixTotals {
    #[serde(default)]
    pub rows: BTreeMap<String, u64>,
    #[serde(default)]
    pub columns: BTreeMap<String, u64>,
    #[serde(default)]
    pub grand: u64,
}

// =============================================================================
// PATH FINDING
// =============================================================================

/// Request forwarded verbatim to the external path-finding service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRequest {
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub max_depth: usize,
    pub allow_bidirectional: bool,
}

/// Path result; `warnings` carries soft diagnostics like truncated search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

// =============================================================================
// TESTS
// =============================================================================
