//! Force terms of ForceAtlas2, evaluated for one node at a time.
//!
//! All forces are scalar magnitudes. The simulation applies them along the
//! vector from each other node to the node being moved.
use crate::layout::ForceAtlasConfig;
use crate::utils::{ATTRACTION_SCALE, MIN_DISTANCE};

/// Euclidean distance between two positions, clamped to `MIN_DISTANCE`.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::layout::forces::distance;
///
/// assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
/// assert_eq!(distance(&[1.0, 1.0], &[1.0, 1.0]), 0.01);
/// ```
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
        .max(MIN_DISTANCE)
}

/// Attraction along an edge of weight `weight` between nodes `distance`
/// apart, felt by a node of degree `degree`.
///
/// Grows linearly with distance, or logarithmically with `lin_log`.
pub fn attraction(config: &ForceAtlasConfig, distance: f64, weight: f64, degree: f64) -> f64 {
    let mut force = ATTRACTION_SCALE * distance;
    if config.lin_log {
        force = force.ln_1p();
    }
    if config.weight_exponent != 0.0 {
        force *= weight.powf(config.weight_exponent);
    }
    if config.no_hubs {
        force /= degree + 1.0;
    }
    force
}

/// Repulsion between a node of degree `degree` and another of degree
/// `other_degree`, `distance` apart.
pub fn repulsion(repulsive_factor: f64, degree: f64, other_degree: f64, distance: f64) -> f64 {
    repulsive_factor * (degree + 1.0) * other_degree / distance
}

/// Pull towards the origin felt by a node of degree `degree` at `position`.
///
/// With `strong_gravity` the pull grows with the node's distance from the
/// origin (clamped to `MIN_DISTANCE`).
pub fn gravity(config: &ForceAtlasConfig, degree: f64, position: &[f64]) -> f64 {
    let force = config.gravity_factor * (degree + 1.0);
    if config.strong_gravity {
        let norm = position.iter().map(|x| x * x).sum::<f64>().sqrt();
        force * norm.max(MIN_DISTANCE)
    } else {
        force
    }
}

/// Adaptive speed of a node with the given swing and net force.
///
/// Nodes that oscillate (high swing) slow down. The speed is capped at
/// `speed_max / |force|` so that no node jumps too far; a zero force is
/// left uncapped.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::layout::ForceAtlasConfig;
/// use rs_forceatlas::layout::forces::node_speed;
///
/// let config = ForceAtlasConfig::default();
/// // No swing: the base speed scaled by the global speed.
/// assert_eq!(node_speed(&config, 1.0, 0.0, 1.0), 0.1);
/// // A huge force hits the cap.
/// assert_eq!(node_speed(&config, 1.0, 0.0, 1_000.0), 0.01);
/// ```
pub fn node_speed(config: &ForceAtlasConfig, global_speed: f64, swing: f64, force: f64) -> f64 {
    let speed = config.speed * global_speed / (1.0 + global_speed * swing.sqrt());
    let magnitude = force.abs();
    if magnitude > 0.0 {
        speed.min(config.speed_max / magnitude)
    } else {
        speed
    }
}
