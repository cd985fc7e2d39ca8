/// Floor applied to every node-to-node (and node-to-origin) distance.
pub const MIN_DISTANCE: f64 = 0.01;

/// A run stops early once every node's swing is below this value.
pub const CONVERGENCE_SWING: f64 = 0.01;

/// Per-axis displacement norms below this value are considered degenerate.
pub const MIN_DISPLACEMENT_NORM: f64 = 0.01;

/// Norm used in place of a degenerate per-axis displacement norm.
pub const DEGENERATE_NORM_FALLBACK: f64 = 0.1;

/// Scale of the attraction force along an edge.
pub const ATTRACTION_SCALE: f64 = 10.0;

/// Deepest subdivision of the quadtree. Nodes still sharing a cell at this
/// depth are aggregated into one leaf.
pub const MAX_TREE_DEPTH: usize = 64;

/// Graph sizes at which the automatic swing tolerance steps up.
pub const MEDIUM_GRAPH_NODES: usize = 5_000;
pub const LARGE_GRAPH_NODES: usize = 50_000;

/// Swing tolerance derived from the node count `n`.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::utils::default_tolerance;
///
/// assert_eq!(default_tolerance(34), 0.1);
/// assert_eq!(default_tolerance(5_000), 1.0);
/// assert_eq!(default_tolerance(50_000), 10.0);
/// ```
pub fn default_tolerance(n: usize) -> f64 {
    if n < MEDIUM_GRAPH_NODES {
        0.1
    } else if n < LARGE_GRAPH_NODES {
        1.0
    } else {
        10.0
    }
}
