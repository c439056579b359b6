//! # Constellation Layout
//!
//! Per-cluster star placement: a lightweight force simulation (repulsion +
//! centering + collision, no springs) runs over one cluster's nodes alone.
//! Server-suggested seed positions are honored as initial placement when
//! present; otherwise nodes seed onto the deterministic spiral.
//!
//! After layout, "constellation lines" join any two stars within a fixed
//! pixel distance — a proximity graph drawn as a visual aid, not a data
//! relationship.

use crate::layout::{Point, resolve_collisions, spiral_seed};
use crate::overview::ClusterNode;
use crate::primitives::{
    CONSTELLATION_ITERATIONS, CONSTELLATION_LINK_DISTANCE, FORCE_CENTERING_STRENGTH,
    FORCE_CHARGE_STRENGTH, FORCE_COLLISION_RADIUS,
};
use crate::types::NodeId;
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// OPTIONS & OUTPUT
// =============================================================================

/// Tuning knobs for [`constellation_layout`].
#[derive(Debug, Clone, Copy)]
pub struct ConstellationOptions {
    pub width: f64,
    pub height: f64,
    pub iterations: usize,
    pub repulsion_strength: f64,
    pub centering_strength: f64,
    pub collision_radius: f64,
    /// Stars closer than this get a connecting line.
    pub link_distance: f64,
}

impl Default for ConstellationOptions {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 420.0,
            iterations: CONSTELLATION_ITERATIONS,
            repulsion_strength: FORCE_CHARGE_STRENGTH,
            centering_strength: FORCE_CENTERING_STRENGTH,
            collision_radius: FORCE_COLLISION_RADIUS,
            link_distance: CONSTELLATION_LINK_DISTANCE,
        }
    }
}

/// Geometry for one laid-out cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Constellation {
    pub positions: BTreeMap<NodeId, Point>,
    /// Proximity lines between close stars, each pair ordered and listed
    /// once.
    pub lines: Vec<(NodeId, NodeId)>,
}

impl Constellation {
    /// True when the cluster contained no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Lay out one cluster's nodes as a constellation.
///
/// Duplicate ids collapse to their first occurrence. Zero nodes yield an
/// empty constellation; a single node lands at the canvas center.
#[must_use]
pub fn constellation_layout(nodes: &[ClusterNode], options: &ConstellationOptions) -> Constellation {
    let mut ids: Vec<&ClusterNode> = Vec::new();
    let mut seen: BTreeMap<&NodeId, ()> = BTreeMap::new();
    for node in nodes {
        if seen.insert(&node.id, ()).is_none() {
            ids.push(node);
        }
    }
    if ids.is_empty() {
        return Constellation::default();
    }
    // Id-sorted so the layout is a pure function of the node set.
    ids.sort_by(|a, b| a.id.cmp(&b.id));

    let center = Point::new(options.width / 2.0, options.height / 2.0);
    let mut positions: Vec<Point> = ids
        .iter()
        .enumerate()
        .map(|(i, node)| match (node.x, node.y) {
            (Some(x), Some(y)) => Point::new(x, y),
            _ => spiral_seed(i, center, options.collision_radius * 2.0),
        })
        .collect();

    let initial_temperature = options.width.min(options.height) / 10.0;
    let steps = options.iterations;

    for step in 0..steps {
        let temperature = initial_temperature * (1.0 - step as f64 / steps as f64);
        let mut forces = vec![Point::default(); positions.len()];

        // Pairwise repulsion; no springs — cluster membership, not edges,
        // is what binds a constellation.
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dx = positions[j].x - positions[i].x;
                let dy = positions[j].y - positions[i].y;
                let dist = dx.hypot(dy).max(1e-6);
                let magnitude = options.repulsion_strength / (dist * dist);
                let fx = dx / dist * magnitude;
                let fy = dy / dist * magnitude;
                forces[i].x -= fx;
                forces[i].y -= fy;
                forces[j].x += fx;
                forces[j].y += fy;
            }
        }

        for (force, position) in forces.iter_mut().zip(&positions) {
            force.x += (center.x - position.x) * options.centering_strength;
            force.y += (center.y - position.y) * options.centering_strength;
        }

        for (position, force) in positions.iter_mut().zip(&forces) {
            let magnitude = force.x.hypot(force.y);
            let scale = if magnitude > temperature && magnitude > f64::EPSILON {
                temperature / magnitude
            } else {
                1.0
            };
            position.x += force.x * scale;
            position.y += force.y * scale;
        }

        resolve_collisions(&mut positions, options.collision_radius);
    }

    // Proximity lines over the settled positions.
    let mut lines = Vec::new();
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if positions[i].distance(positions[j]) <= options.link_distance {
                lines.push((ids[i].id.clone(), ids[j].id.clone()));
            }
        }
    }

    Constellation {
        positions: ids
            .into_iter()
            .map(|n| n.id.clone())
            .zip(positions)
            .collect(),
        lines,
    }
}

// =============================================================================
// TESTS
// =============================================================================
