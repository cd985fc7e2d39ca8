//! Iteration-by-iteration ForceAtlas2 simulation.
//!
//! A [`Simulation`] owns every piece of state carried from one iteration to
//! the next: positions, each node's previous net force and swing, the global
//! speed and the shrinking step budget. Each call to [`Simulation::step`]
//! computes all forces from the current snapshot of positions (in parallel
//! with the `parallel` feature) and only then moves the nodes, so results do
//! not depend on the order in which nodes are processed.
//!
//! # Example
//!
//! ```
//! use rs_forceatlas::graph::datasets::karate_club;
//! use rs_forceatlas::layout::{ForceAtlasConfig, Simulation};
//!
//! let adjacency = karate_club();
//! let config = ForceAtlasConfig::default().with_random_state(42);
//! let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");
//!
//! // Drive the first ten iterations by hand.
//! for _ in 0..10 {
//!     let report = sim.step();
//!     assert!(report.global_speed.is_finite());
//! }
//! assert_eq!(sim.iteration(), 10);
//!
//! // Then let it finish.
//! let report = sim.run();
//! assert!(report.iterations <= 50);
//! assert_eq!(sim.positions().n_nodes(), 34);
//! ```
use std::borrow::Cow;
use std::ops::ControlFlow;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use crate::graph::CsrMatrix;
use crate::layout::forces::{attraction, distance, gravity, node_speed, repulsion};
use crate::layout::{Embedding, ForceAtlasConfig};
use crate::quadtree::{Body, QuadTree};
use crate::utils::{LayoutError, CONVERGENCE_SWING, DEGENERATE_NORM_FALLBACK, MIN_DISPLACEMENT_NORM};

/// Global quantities of one completed iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    /// 1-based number of the iteration.
    pub iteration: usize,
    pub global_swing: f64,
    pub global_traction: f64,
    /// Global speed to be used by the next iteration.
    pub global_speed: f64,
    /// True if every node's swing fell below `CONVERGENCE_SWING`.
    pub converged: bool,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutReport {
    pub iterations: usize,
    pub converged: bool,
    /// True if the observer stopped the run early.
    pub cancelled: bool,
    pub global_speed: f64,
}

// Result of the force computation for one node, before any position moves.
struct NodeUpdate {
    force: f64,
    swing: f64,
    traction: f64,
    delta: Vec<f64>,
}

/// State of a ForceAtlas2 layout in progress.
pub struct Simulation<'a> {
    config: ForceAtlasConfig,
    adjacency: Cow<'a, CsrMatrix>,
    degrees: Vec<f64>,
    positions: Embedding,
    previous_forces: Vec<f64>,
    swings: Vec<f64>,
    global_speed: f64,
    tolerance: f64,
    step_max: f64,
    step: f64,
    iteration: usize,
    converged: bool,
}

impl<'a> Simulation<'a> {
    /// Prepares a layout of `adjacency`.
    ///
    /// A directed adjacency is replaced by its undirected counterpart. Initial
    /// positions are drawn from a standard normal distribution (seeded with
    /// `config.random_state`) unless `initial_positions` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the adjacency is not
    /// square, or `initial_positions` is not `n_nodes x n_components`.
    pub fn new(
        config: &ForceAtlasConfig,
        adjacency: &'a CsrMatrix,
        initial_positions: Option<Embedding>,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        adjacency.check_square()?;
        let n = adjacency.n_nodes();

        let positions = match initial_positions {
            Some(positions) => {
                if positions.n_components() != config.n_components {
                    return Err(LayoutError::DimensionMismatch {
                        expected: config.n_components,
                        found: positions.n_components(),
                    });
                }
                if positions.n_nodes() != n {
                    return Err(LayoutError::DimensionMismatch {
                        expected: n,
                        found: positions.n_nodes(),
                    });
                }
                positions
            }
            None => {
                let mut rng = match config.random_state {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                Embedding::random(n, config.n_components, &mut rng)
            }
        };

        let adjacency = if adjacency.is_symmetric() {
            Cow::Borrowed(adjacency)
        } else {
            warn!("Adjacency matrix is not symmetric; laying out its undirected counterpart");
            Cow::Owned(adjacency.to_undirected())
        };
        let degrees = adjacency.degree_vector();

        let step_max = (0..config.n_components)
            .map(|axis| positions.axis_spread(axis))
            .fold(0.0, f64::max);
        let step = step_max / (config.n_iter as f64 + 1.0);

        Ok(Simulation {
            config: config.clone(),
            adjacency,
            degrees,
            positions,
            previous_forces: vec![0.0; n],
            swings: vec![0.0; n],
            global_speed: 1.0,
            tolerance: config.tolerance_for(n),
            step_max,
            step,
            iteration: 0,
            converged: false,
        })
    }

    /// Runs one iteration and moves every node.
    pub fn step(&mut self) -> IterationReport {
        let n = self.positions.n_nodes();
        let tree = if self.config.barnes_hut {
            Some(QuadTree::build(&self.bodies()))
        } else {
            None
        };
        let axis_sums = self.positions.axis_sums();

        #[cfg(feature = "parallel")]
        let updates: Vec<NodeUpdate> = (0..n)
            .into_par_iter()
            .map(|i| self.node_update(i, tree.as_ref(), &axis_sums))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let updates: Vec<NodeUpdate> = (0..n)
            .map(|i| self.node_update(i, tree.as_ref(), &axis_sums))
            .collect();

        let mut global_swing = 0.0;
        let mut global_traction = 0.0;
        for (i, update) in updates.iter().enumerate() {
            global_swing += (self.degrees[i] + 1.0) * update.swing;
            global_traction += (self.degrees[i] + 1.0) * update.traction;
            self.previous_forces[i] = update.force;
            self.swings[i] = update.swing;
        }

        if global_swing > 0.0 {
            self.global_speed = self.tolerance * global_traction / global_swing;
        } else {
            debug!("Global swing is zero; keeping global speed at {}", self.global_speed);
        }

        // Normalize the displacement along each axis to the current step budget.
        let d = self.config.n_components;
        let mut norms = vec![0.0; d];
        for update in &updates {
            for (norm, delta) in norms.iter_mut().zip(&update.delta) {
                *norm += delta * delta;
            }
        }
        for norm in norms.iter_mut() {
            *norm = norm.sqrt();
            if *norm < MIN_DISPLACEMENT_NORM {
                *norm = DEGENERATE_NORM_FALLBACK;
            }
        }
        for (i, update) in updates.iter().enumerate() {
            for ((x, delta), norm) in self.positions.row_mut(i).iter_mut().zip(&update.delta).zip(&norms) {
                *x += delta * self.step_max / norm;
            }
        }

        self.step_max = (self.step_max - self.step).max(0.0);
        self.iteration += 1;
        self.converged = self.swings.iter().all(|&swing| swing < CONVERGENCE_SWING);

        debug!(
            "Iteration {}: global swing {:.6}, global traction {:.6}, global speed {:.6}",
            self.iteration, global_swing, global_traction, self.global_speed
        );
        IterationReport {
            iteration: self.iteration,
            global_swing,
            global_traction,
            global_speed: self.global_speed,
            converged: self.converged,
        }
    }

    /// Steps until the iteration budget is spent or the layout converges.
    pub fn run(&mut self) -> LayoutReport {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    /// Like [`Simulation::run`], calling `observer` after every iteration.
    /// Returning `ControlFlow::Break(())` stops the run before the next
    /// iteration.
    pub fn run_with<F>(&mut self, mut observer: F) -> LayoutReport
    where
        F: FnMut(&IterationReport) -> ControlFlow<()>,
    {
        info!(
            "Starting ForceAtlas2 layout: {} nodes, {} dimensions, {} iterations, barnes_hut={}",
            self.positions.n_nodes(),
            self.config.n_components,
            self.config.n_iter,
            self.config.barnes_hut
        );
        let mut cancelled = false;
        while !self.is_finished() {
            let report = self.step();
            if observer(&report).is_break() {
                info!("Layout cancelled after {} iterations", self.iteration);
                cancelled = true;
                break;
            }
        }
        if self.converged {
            info!("Layout converged after {} iterations", self.iteration);
        }
        LayoutReport {
            iterations: self.iteration,
            converged: self.converged,
            cancelled,
            global_speed: self.global_speed,
        }
    }

    /// True once the iteration budget is spent or the layout has converged.
    /// An empty graph is finished from the start.
    pub fn is_finished(&self) -> bool {
        self.converged || self.iteration >= self.config.n_iter || self.positions.n_nodes() == 0
    }

    pub fn positions(&self) -> &Embedding {
        &self.positions
    }

    pub fn into_positions(self) -> Embedding {
        self.positions
    }

    /// Degree plus one of every node, after symmetrization.
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    pub fn swings(&self) -> &[f64] {
        &self.swings
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn global_speed(&self) -> f64 {
        self.global_speed
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Remaining distance budget of the next iteration.
    pub fn step_max(&self) -> f64 {
        self.step_max
    }

    fn bodies(&self) -> Vec<Body> {
        self.positions
            .rows()
            .zip(&self.degrees)
            .enumerate()
            .map(|(index, (row, &mass))| Body {
                index,
                x: row[0],
                y: row.get(1).copied().unwrap_or(0.0),
                mass,
            })
            .collect()
    }

    // Net force, swing and unnormalized displacement of node `i`.
    fn node_update(&self, i: usize, tree: Option<&QuadTree>, axis_sums: &[f64]) -> NodeUpdate {
        let config = &self.config;
        let n = self.positions.n_nodes();
        let position = self.positions.row(i);
        let degree = self.degrees[i];
        let gravity_force = gravity(config, degree, position);
        let mut delta = vec![0.0; config.n_components];

        let repulsion_total = match tree {
            Some(tree) => {
                let body = Body {
                    index: i,
                    x: position[0],
                    y: position.get(1).copied().unwrap_or(0.0),
                    mass: degree,
                };
                let total = tree.apply_force(&body, config.theta, config.repulsive_factor);
                // The approximate total is applied along every (pos_i - pos_j),
                // which sums to n * pos_i - sum_j pos_j.
                let magnitude = total - gravity_force;
                for ((d, x), sum) in delta.iter_mut().zip(position).zip(axis_sums) {
                    *d = magnitude * (n as f64 * x - sum);
                }
                total
            }
            None => {
                let mut total = 0.0;
                for (j, other) in self.positions.rows().enumerate() {
                    if j == i {
                        continue;
                    }
                    let r = repulsion(
                        config.repulsive_factor,
                        degree,
                        self.degrees[j],
                        distance(position, other),
                    );
                    total += r;
                    for ((d, x), y) in delta.iter_mut().zip(position).zip(other) {
                        *d += (x - y) * (r - gravity_force);
                    }
                }
                total
            }
        };

        let mut attraction_total = 0.0;
        let (neighbors, weights) = self.adjacency.neighbors(i);
        for (&j, &weight) in neighbors.iter().zip(weights) {
            let other = self.positions.row(j);
            let a = attraction(config, distance(position, other), weight, degree);
            attraction_total += a;
            for ((d, x), y) in delta.iter_mut().zip(position).zip(other) {
                *d -= (x - y) * a;
            }
        }

        let force = repulsion_total - attraction_total - gravity_force;
        let previous = self.previous_forces[i];
        let swing = (force - previous).abs();
        let traction = (force + previous).abs() / 2.0;
        let speed = node_speed(config, self.global_speed, swing, force);
        for d in delta.iter_mut() {
            *d *= speed;
        }

        NodeUpdate { force, swing, traction, delta }
    }
}
