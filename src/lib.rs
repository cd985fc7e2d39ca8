//! ForceAtlas2 graph layout with a Barnes-Hut quadtree.
//!
//! - [`graph`]: sparse adjacency matrices and a small bundled dataset.
//! - [`quadtree`]: the Barnes-Hut quadtree used to approximate repulsion.
//! - [`layout`]: the ForceAtlas2 simulation and its estimator-style facade.
//! - [`utils`]: shared constants and the crate's error type.
pub mod utils;
pub mod graph;
pub mod quadtree;
pub mod layout;

/// ### General helper function
/// - Asserts that two floating point numbers are approximately equal.
///
/// ### Arguments
///
/// * `a` - The value under test.
/// * `b` - The expected value.
/// * `epsilon` - Largest accepted absolute difference.
/// * `optional_message` - Extra context printed when the assertion fails.
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64, optional_message: Option<&str>) {
    match optional_message {
        Some(message) => assert!((a - b).abs() < epsilon, "{}: {} is not within {} of {}", message, a, epsilon, b),
        None => assert!((a - b).abs() < epsilon, "Expected {} to be within {} of {}", a, epsilon, b),
    }
}
