//! # Layout & Filter Primitives
//!
//! Hardcoded runtime constants for the Agora CORE.
//!
//! Agora starts with zero data but fixed geometry. These primitives are
//! compiled into the binary and are immutable at runtime; every layout run
//! with the same inputs reproduces the same output because iteration counts
//! and placement seeds live here rather than in an RNG.

/// Default cap on the number of nodes a filtered network projection may
/// contain before degree-based pruning kicks in.
///
/// Anything much above this makes the force simulation visibly stall the
/// calling thread; anything much below it hides too much of the graph.
pub const DEFAULT_MAX_NODES: usize = 175;

/// Fixed iteration count for the force-directed network simulation.
///
/// The simulation runs to a step budget, not to a convergence criterion.
pub const FORCE_ITERATIONS: usize = 300;

/// Repulsive charge constant between node pairs (inverse-square falloff).
pub const FORCE_CHARGE_STRENGTH: f64 = 4000.0;

/// Interaction cap: node pairs farther apart than this exert no charge.
pub const FORCE_MAX_INTERACTION_DISTANCE: f64 = 320.0;

/// Rest length of the spring force applied along each edge.
pub const FORCE_SPRING_LENGTH: f64 = 90.0;

/// Spring stiffness along edges.
pub const FORCE_SPRING_STRENGTH: f64 = 0.04;

/// Weak pull of every node toward the canvas center.
///
/// Kept below the point where the free-pair equilibrium distance would
/// undercut the spring rest length, so springs stay attractive in practice.
pub const FORCE_CENTERING_STRENGTH: f64 = 0.005;

/// Collision radius; two nodes closer than twice this are pushed apart.
pub const FORCE_COLLISION_RADIUS: f64 = 16.0;

/// Golden angle in radians, used for the deterministic spiral that seeds
/// initial particle positions in both force simulations.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Vertical gap between stacked nodes in an evidence-flow column.
pub const FLOW_GAP: f64 = 12.0;

/// Floor height for evidence-flow nodes so low-value nodes stay clickable.
pub const FLOW_MIN_NODE_HEIGHT: f64 = 6.0;

/// Horizontal thickness of an evidence-flow node rectangle.
pub const FLOW_NODE_WIDTH: f64 = 18.0;

/// Horizontal control-point offset of a flow link, as a fraction of the
/// distance between its columns.
pub const FLOW_CURVATURE: f64 = 0.5;

/// Multiplier applied to `ln(value + 1)` when deriving link stroke widths.
pub const FLOW_STROKE_SCALE: f64 = 2.0;

/// Fixed iteration count for the per-cluster constellation simulation.
pub const CONSTELLATION_ITERATIONS: usize = 120;

/// Maximum pixel distance at which two constellation stars are joined by a
/// visual line. This is a proximity graph, not a data relationship.
pub const CONSTELLATION_LINK_DISTANCE: f64 = 72.0;

/// Target zoom used when a centering directive is emitted for a focused node.
pub const FOCUS_ZOOM: f64 = 1.5;
