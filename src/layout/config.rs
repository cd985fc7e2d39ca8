use crate::utils::{default_tolerance, LayoutError};

/// Parameters of a ForceAtlas2 layout.
///
/// The defaults follow the published algorithm: a 2-D layout over 50
/// iterations with the Barnes-Hut approximation enabled.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::layout::ForceAtlasConfig;
/// use rs_forceatlas::utils::LayoutError;
///
/// let config = ForceAtlasConfig::default()
///     .with_n_iter(100)
///     .with_lin_log(true)
///     .with_random_state(7);
/// assert!(config.validate().is_ok());
///
/// // Barnes-Hut only works in the plane.
/// let config = ForceAtlasConfig::default().with_n_components(3);
/// assert_eq!(config.validate(), Err(LayoutError::InvalidDimension { n_components: 3 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ForceAtlasConfig {
    /// Dimension of the layout.
    pub n_components: usize,
    /// Number of iterations to run, unless the layout converges first.
    pub n_iter: usize,
    /// Compute repulsion with the Barnes-Hut quadtree instead of all pairs.
    pub barnes_hut: bool,
    /// Use `ln(1 + a)` instead of `a` for the attraction along an edge.
    pub lin_log: bool,
    pub gravity_factor: f64,
    /// Scale gravity by the node's distance from the origin.
    pub strong_gravity: bool,
    pub repulsive_factor: f64,
    /// When non-zero, attraction is multiplied by the edge weight raised to
    /// this power.
    pub weight_exponent: f64,
    /// Divide attraction by the node's degree plus one, pushing hubs outward.
    pub no_hubs: bool,
    /// Swing tolerance. Derived from the number of nodes when unset.
    pub tolerance: Option<f64>,
    pub speed: f64,
    /// Bound on a node's speed times the magnitude of its net force.
    pub speed_max: f64,
    /// Barnes-Hut accuracy: cells with side / distance below `theta` are
    /// approximated by their center of mass.
    pub theta: f64,
    /// Seed for the initial positions. Seeded from the OS when unset.
    pub random_state: Option<u64>,
}

impl Default for ForceAtlasConfig {
    fn default() -> Self {
        Self {
            n_components: 2,
            n_iter: 50,
            barnes_hut: true,
            lin_log: false,
            gravity_factor: 0.01,
            strong_gravity: false,
            repulsive_factor: 0.01,
            weight_exponent: 0.0,
            no_hubs: false,
            tolerance: None,
            speed: 0.1,
            speed_max: 10.0,
            theta: 1.2,
            random_state: None,
        }
    }
}

impl ForceAtlasConfig {
    pub fn with_n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    pub fn with_n_iter(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter;
        self
    }

    pub fn with_barnes_hut(mut self, barnes_hut: bool) -> Self {
        self.barnes_hut = barnes_hut;
        self
    }

    pub fn with_lin_log(mut self, lin_log: bool) -> Self {
        self.lin_log = lin_log;
        self
    }

    pub fn with_gravity_factor(mut self, gravity_factor: f64) -> Self {
        self.gravity_factor = gravity_factor;
        self
    }

    pub fn with_strong_gravity(mut self, strong_gravity: bool) -> Self {
        self.strong_gravity = strong_gravity;
        self
    }

    pub fn with_repulsive_factor(mut self, repulsive_factor: f64) -> Self {
        self.repulsive_factor = repulsive_factor;
        self
    }

    pub fn with_weight_exponent(mut self, weight_exponent: f64) -> Self {
        self.weight_exponent = weight_exponent;
        self
    }

    pub fn with_no_hubs(mut self, no_hubs: bool) -> Self {
        self.no_hubs = no_hubs;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_speed_max(mut self, speed_max: f64) -> Self {
        self.speed_max = speed_max;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Checks the parameters against each other.
    ///
    /// # Errors
    ///
    /// - `LayoutError::InvalidDimension` if Barnes-Hut is enabled with more
    ///   than two dimensions. The configuration is never silently switched
    ///   to exact repulsion.
    /// - `LayoutError::InvalidParameter` for zero dimensions, a non-positive
    ///   `theta` (with Barnes-Hut), `speed`, `speed_max` or `tolerance`, or
    ///   non-finite force factors.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.n_components == 0 {
            return Err(LayoutError::InvalidParameter(
                "n_components must be at least 1".to_string(),
            ));
        }
        if self.barnes_hut && self.n_components > 2 {
            return Err(LayoutError::InvalidDimension { n_components: self.n_components });
        }
        if self.barnes_hut && !(self.theta > 0.0 && self.theta.is_finite()) {
            return Err(LayoutError::InvalidParameter(format!(
                "theta must be positive, got {}",
                self.theta
            )));
        }
        check_positive("speed", self.speed)?;
        check_positive("speed_max", self.speed_max)?;
        if let Some(tolerance) = self.tolerance {
            check_positive("tolerance", tolerance)?;
        }
        for (name, value) in [
            ("gravity_factor", self.gravity_factor),
            ("repulsive_factor", self.repulsive_factor),
            ("weight_exponent", self.weight_exponent),
        ] {
            if !value.is_finite() {
                return Err(LayoutError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Swing tolerance for a graph of `n_nodes` nodes.
    pub fn tolerance_for(&self, n_nodes: usize) -> f64 {
        self.tolerance.unwrap_or_else(|| default_tolerance(n_nodes))
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), LayoutError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}
