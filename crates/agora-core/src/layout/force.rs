//! # Force-Directed Network Layout
//!
//! Each node is a charged particle, each edge a spring. Four forces act per
//! step: inverse-square repulsion with a capped interaction distance, spring
//! attraction along edges toward a rest length, a weak centering pull, and a
//! collision constraint. The simulation runs a fixed number of steps with a
//! linearly cooling displacement cap and takes the final particle positions
//! as the layout.

use crate::layout::{Point, resolve_collisions, spiral_seed};
use crate::primitives::{
    FORCE_CENTERING_STRENGTH, FORCE_CHARGE_STRENGTH, FORCE_COLLISION_RADIUS, FORCE_ITERATIONS,
    FORCE_MAX_INTERACTION_DISTANCE, FORCE_SPRING_LENGTH, FORCE_SPRING_STRENGTH,
};
use crate::types::NodeId;
use std::collections::BTreeMap;

// =============================================================================
// OPTIONS
// =============================================================================

/// Tuning knobs for [`force_network_layout`].
#[derive(Debug, Clone, Copy)]
pub struct ForceLayoutOptions {
    pub width: f64,
    pub height: f64,
    pub iterations: usize,
    pub charge_strength: f64,
    pub max_interaction_distance: f64,
    pub spring_length: f64,
    pub spring_strength: f64,
    pub centering_strength: f64,
    pub collision_radius: f64,
}

impl Default for ForceLayoutOptions {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            iterations: FORCE_ITERATIONS,
            charge_strength: FORCE_CHARGE_STRENGTH,
            max_interaction_distance: FORCE_MAX_INTERACTION_DISTANCE,
            spring_length: FORCE_SPRING_LENGTH,
            spring_strength: FORCE_SPRING_STRENGTH,
            centering_strength: FORCE_CENTERING_STRENGTH,
            collision_radius: FORCE_COLLISION_RADIUS,
        }
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Compute positions for `nodes` connected by `edges`.
///
/// Input ids are deduplicated and sorted before seeding so the layout is a
/// pure function of the id set, not of input order. Edges referencing
/// unknown ids (or a node to itself) contribute no spring. Zero nodes yield
/// an empty map; a single node lands at the canvas center.
#[must_use]
pub fn force_network_layout(
    nodes: &[NodeId],
    edges: &[(NodeId, NodeId)],
    options: &ForceLayoutOptions,
) -> BTreeMap<NodeId, Point> {
    let mut ids: Vec<NodeId> = nodes.to_vec();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return BTreeMap::new();
    }

    let center = Point::new(options.width / 2.0, options.height / 2.0);
    let index: BTreeMap<&NodeId, usize> =
        ids.iter().enumerate().map(|(i, id)| (id, i)).collect();

    let springs: Vec<(usize, usize)> = edges
        .iter()
        .filter_map(|(a, b)| {
            let ia = *index.get(a)?;
            let ib = *index.get(b)?;
            (ia != ib).then_some((ia, ib))
        })
        .collect();

    let mut positions: Vec<Point> = (0..ids.len())
        .map(|i| spiral_seed(i, center, options.collision_radius * 2.0))
        .collect();

    let initial_temperature = options.width.min(options.height) / 10.0;
    let steps = options.iterations;

    for step in 0..steps {
        // Linear cooling: early steps untangle, late steps settle.
        let temperature = initial_temperature * (1.0 - step as f64 / steps as f64);
        let mut forces = vec![Point::default(); positions.len()];

        // Repulsive charge between all pairs within the interaction cap.
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dx = positions[j].x - positions[i].x;
                let dy = positions[j].y - positions[i].y;
                let dist = dx.hypot(dy).max(1e-6);
                if dist > options.max_interaction_distance {
                    continue;
                }
                let magnitude = options.charge_strength / (dist * dist);
                let fx = dx / dist * magnitude;
                let fy = dy / dist * magnitude;
                forces[i].x -= fx;
                forces[i].y -= fy;
                forces[j].x += fx;
                forces[j].y += fy;
            }
        }

        // Spring attraction along edges toward the rest length.
        for &(a, b) in &springs {
            let dx = positions[b].x - positions[a].x;
            let dy = positions[b].y - positions[a].y;
            let dist = dx.hypot(dy).max(1e-6);
            let magnitude = options.spring_strength * (dist - options.spring_length);
            let fx = dx / dist * magnitude;
            let fy = dy / dist * magnitude;
            forces[a].x += fx;
            forces[a].y += fy;
            forces[b].x -= fx;
            forces[b].y -= fy;
        }

        // Weak pull toward the canvas center.
        for (force, position) in forces.iter_mut().zip(&positions) {
            force.x += (center.x - position.x) * options.centering_strength;
            force.y += (center.y - position.y) * options.centering_strength;
        }

        // Integrate with the cooling displacement cap.
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

    ids.into_iter().zip(positions).collect()
}

// =============================================================================
// TESTS
// =============================================================================
