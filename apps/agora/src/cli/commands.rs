//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{AppError, FilterArgs};
use crate::client::OverviewClient;
use crate::config::AgoraConfig;
use crate::store::{OverviewFetcher, WorkspacePhase, WorkspaceSnapshot, WorkspaceStore};
use agora_core::overview::PathRequest;
use agora_core::{
    AgoraError, ConstellationOptions, FilterOptions, FlowLayoutOptions, ForceLayoutOptions,
    GraphDocument, NodeId, SelectionState, constellation_layout, evidence_flow_layout,
    filter_graph, force_network_layout,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for graph documents (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_DOCUMENT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AgoraError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AgoraError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(AgoraError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

fn build_client(config: &AgoraConfig) -> OverviewClient {
    OverviewClient::new(config.base_url.clone(), config.api_key.clone())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Fetch all four overviews through the workspace store and summarize them.
pub async fn cmd_status(
    config: &AgoraConfig,
    filters: &FilterArgs,
    json_mode: bool,
) -> Result<(), AppError> {
    let store = WorkspaceStore::new(build_client(config));
    let mut rx = store.subscribe();
    store.set_filters(&filters.to_patch());

    let snapshot = loop {
        if rx.changed().await.is_err() {
            break store.snapshot();
        }
        let snapshot = rx.borrow_and_update().clone();
        if matches!(
            snapshot.phase,
            WorkspacePhase::Loaded | WorkspacePhase::Error
        ) {
            break snapshot;
        }
    };

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&status_json(config, &snapshot))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!("Agora Workspace Status");
    println!("======================");
    println!("Service: {}", config.base_url);
    println!("Phase:   {:?}", snapshot.phase);
    println!();
    match &snapshot.timeline {
        Some(timeline) => println!(
            "Timeline:      {} periods, years {}..{}",
            timeline.periods.len(),
            timeline.range.min_year,
            timeline.range.max_year
        ),
        None => println!("Timeline:      (no data)"),
    }
    match &snapshot.influence {
        Some(matrix) => println!(
            "Influence:     {} rows x {} columns, {} total",
            matrix.rows.len(),
            matrix.columns.len(),
            matrix.totals.grand
        ),
        None => println!("Influence:     (no data)"),
    }
    match &snapshot.evidence {
        Some(evidence) => println!(
            "Evidence:      {} arguments, {} ancient sources, {} modern reception",
            evidence.stats.total_arguments,
            evidence.stats.total_ancient_sources,
            evidence.stats.total_modern_reception
        ),
        None => println!("Evidence:      (no data)"),
    }
    match &snapshot.clusters {
        Some(clusters) => println!(
            "Clusters:      {} clusters over {} concepts",
            clusters.stats.cluster_count, clusters.stats.total_concepts
        ),
        None => println!("Clusters:      (no data)"),
    }
    if let Some(error) = &snapshot.error {
        println!();
        println!("Error: {error}");
    }

    Ok(())
}

fn status_json(config: &AgoraConfig, snapshot: &WorkspaceSnapshot) -> serde_json::Value {
    serde_json::json!({
        "service": config.base_url,
        "phase": snapshot.phase,
        "generation": snapshot.generation,
        "error": snapshot.error,
        "timeline_periods": snapshot.timeline.as_ref().map(|t| t.periods.len()),
        "influence_cells": snapshot.influence.as_ref().map(|m| m.cells.len()),
        "evidence_nodes": snapshot.evidence.as_ref().map(|e| e.nodes.len()),
        "cluster_count": snapshot.clusters.as_ref().map(|c| c.clusters.len()),
    })
}

// =============================================================================
// NETWORK COMMAND
// =============================================================================

/// Filter a local graph document and optionally compute force positions.
pub fn cmd_network(
    config: &AgoraConfig,
    file: &PathBuf,
    filters: &FilterArgs,
    max_nodes: Option<usize>,
    layout: bool,
    json_mode: bool,
) -> Result<(), AppError> {
    validate_file_size(file, MAX_DOCUMENT_FILE_SIZE)?;
    let text = std::fs::read_to_string(file)
        .map_err(|e| AgoraError::IoError(format!("Cannot read '{}': {e}", file.display())))?;
    let model = GraphDocument::from_json(&text)?.into_model();

    let options = FilterOptions {
        max_nodes: max_nodes.unwrap_or(config.max_nodes),
    };
    let reduced = filter_graph(
        &model,
        &filters.to_state(),
        &SelectionState::default(),
        &options,
    );

    let positions = layout.then(|| {
        let ids: Vec<NodeId> = reduced.nodes.iter().map(|n| n.id.clone()).collect();
        let springs: Vec<(NodeId, NodeId)> = reduced
            .edges
            .iter()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();
        force_network_layout(&ids, &springs, &ForceLayoutOptions::default())
    });

    let stats = model.stats();

    if json_mode {
        let output = serde_json::json!({
            "stats": stats,
            "nodes": reduced.nodes,
            "edges": reduced.edges,
            "positions": positions,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return Ok(());
    }

    println!("Network Projection");
    println!("==================");
    println!("Source:   {:?}", file);
    println!(
        "Loaded:   {} nodes, {} edges (max degree {})",
        stats.node_count, stats.edge_count, stats.max_degree
    );
    for (kind, count) in &stats.kind_counts {
        println!("  {kind:16} {count}");
    }
    println!(
        "Reduced:  {} nodes, {} edges (budget {})",
        reduced.nodes.len(),
        reduced.edges.len(),
        options.max_nodes
    );
    if let Some(positions) = positions {
        println!("Layout:   {} positions computed", positions.len());
    }

    Ok(())
}

// =============================================================================
// EVIDENCE COMMAND
// =============================================================================

/// Fetch the argument-evidence overview and lay out the flow board.
pub async fn cmd_evidence(
    config: &AgoraConfig,
    filters: &FilterArgs,
    width: f64,
    height: f64,
    json_mode: bool,
) -> Result<(), AppError> {
    let client = build_client(config);
    let overview = client.argument_evidence(&filters.to_state()).await?;

    let options = FlowLayoutOptions {
        width,
        height,
        ..FlowLayoutOptions::default()
    };
    let board = evidence_flow_layout(&overview.nodes, &overview.links, &options);

    if json_mode {
        let output = serde_json::json!({
            "stats": overview.stats,
            "board": board,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return Ok(());
    }

    println!("Evidence Flow Board");
    println!("===================");
    println!(
        "Arguments: {}   Ancient sources: {}   Modern reception: {}",
        overview.stats.total_arguments,
        overview.stats.total_ancient_sources,
        overview.stats.total_modern_reception
    );
    println!("Placed:    {} nodes, {} links", board.nodes.len(), board.links.len());
    Ok(())
}

// =============================================================================
// CONSTELLATION COMMAND
// =============================================================================

/// Fetch concept clusters and lay out each one as a constellation.
pub async fn cmd_constellation(
    config: &AgoraConfig,
    filters: &FilterArgs,
    json_mode: bool,
) -> Result<(), AppError> {
    let client = build_client(config);
    // Clustering is meaningless without concept nodes; widen like the
    // store's own slow stage does.
    let widened = filters.to_state().with_node_kind("concept");
    let overview = client.concept_clusters(&widened).await?;

    let options = ConstellationOptions::default();
    let constellations: Vec<_> = overview
        .clusters
        .iter()
        .map(|cluster| (cluster, constellation_layout(&cluster.nodes, &options)))
        .collect();

    if json_mode {
        let output: Vec<_> = constellations
            .iter()
            .map(|(cluster, constellation)| {
                serde_json::json!({
                    "id": cluster.id,
                    "label": cluster.label,
                    "keywords": cluster.keywords,
                    "constellation": constellation,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "stats": overview.stats,
                "clusters": output,
            }))
            .unwrap_or_default()
        );
        return Ok(());
    }

    println!("Concept Constellations");
    println!("======================");
    println!(
        "{} clusters over {} concepts",
        overview.stats.cluster_count, overview.stats.total_concepts
    );
    for (cluster, constellation) in &constellations {
        println!(
            "  {:24} {} stars, {} lines",
            cluster.label,
            constellation.positions.len(),
            constellation.lines.len()
        );
    }
    Ok(())
}

// =============================================================================
// PATH COMMAND
// =============================================================================

/// Ask the path service for a route between two nodes.
pub async fn cmd_path(
    config: &AgoraConfig,
    source: &str,
    target: &str,
    max_depth: usize,
    bidirectional: bool,
    json_mode: bool,
) -> Result<(), AppError> {
    let client = build_client(config);
    let request = PathRequest {
        source_id: NodeId::new(source),
        target_id: NodeId::new(target),
        max_depth,
        allow_bidirectional: bidirectional,
    };
    let response = client.compute_path(&request).await?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Path {source} -> {target}");
    println!("========================");
    if response.nodes.is_empty() {
        println!("No path found within depth {max_depth}");
        return Ok(());
    }
    println!("Length: {} hops", response.length);
    for node in &response.nodes {
        println!("  {} ({})", node.label, node.kind);
    }
    if let Some(summary) = &response.summary {
        println!();
        println!("{summary}");
    }
    for warning in &response.warnings {
        tracing::warn!("path service: {warning}");
    }
    Ok(())
}
