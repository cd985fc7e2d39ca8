use std::ops::ControlFlow;
use crate::graph::CsrMatrix;
use crate::layout::{Embedding, ForceAtlasConfig, IterationReport, LayoutReport, Simulation};
use crate::utils::LayoutError;

/// Per-call overrides for [`ForceAtlas2::fit_with`].
#[derive(Debug, Clone, Default)]
pub struct FitOptions {
    /// Layout dimension for this call only.
    pub n_components: Option<usize>,
    /// Iteration budget for this call only.
    pub n_iter: Option<usize>,
    /// Start from these positions instead of random ones.
    pub initial_positions: Option<Embedding>,
}

/// ForceAtlas2 layout of a graph.
///
/// Connected nodes attract, every pair of nodes repels, and a weak gravity
/// keeps components from drifting apart. Repulsion is computed either
/// exactly over all pairs or with the Barnes-Hut quadtree approximation.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::graph::datasets::karate_club;
/// use rs_forceatlas::layout::{ForceAtlas2, ForceAtlasConfig};
///
/// let adjacency = karate_club();
/// let mut force_atlas = ForceAtlas2::new(ForceAtlasConfig::default().with_random_state(0))
///     .expect("valid configuration");
/// let embedding = force_atlas.fit_transform(&adjacency).expect("valid adjacency");
///
/// assert_eq!(embedding.n_nodes(), 34);
/// assert_eq!(embedding.n_components(), 2);
/// assert!(embedding.as_slice().iter().all(|x| x.is_finite()));
/// ```
///
/// Barnes-Hut is restricted to the plane, and the check happens up front:
///
/// ```
/// use rs_forceatlas::layout::{ForceAtlas2, ForceAtlasConfig};
/// use rs_forceatlas::utils::LayoutError;
///
/// let result = ForceAtlas2::new(ForceAtlasConfig::default().with_n_components(3));
/// assert!(matches!(result, Err(LayoutError::InvalidDimension { n_components: 3 })));
/// ```
#[derive(Debug, Clone)]
pub struct ForceAtlas2 {
    config: ForceAtlasConfig,
    embedding: Option<Embedding>,
    report: Option<LayoutReport>,
}

impl Default for ForceAtlas2 {
    fn default() -> Self {
        Self {
            config: ForceAtlasConfig::default(),
            embedding: None,
            report: None,
        }
    }
}

impl ForceAtlas2 {
    /// # Errors
    ///
    /// Fails if `config` does not pass [`ForceAtlasConfig::validate`].
    pub fn new(config: ForceAtlasConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            config,
            embedding: None,
            report: None,
        })
    }

    pub fn config(&self) -> &ForceAtlasConfig {
        &self.config
    }

    /// Computes the layout of `adjacency`, treated as undirected.
    ///
    /// # Errors
    ///
    /// Fails if the adjacency is not square.
    pub fn fit(&mut self, adjacency: &CsrMatrix) -> Result<&mut Self, LayoutError> {
        self.fit_with(adjacency, FitOptions::default())
    }

    /// Computes the layout with per-call overrides.
    ///
    /// # Errors
    ///
    /// Fails if the adjacency is not square, if the overrides break the
    /// configuration (e.g. three dimensions with Barnes-Hut), or if the
    /// initial positions have the wrong shape.
    pub fn fit_with(
        &mut self,
        adjacency: &CsrMatrix,
        options: FitOptions,
    ) -> Result<&mut Self, LayoutError> {
        self.fit_with_observer(adjacency, options, |_| ControlFlow::Continue(()))
    }

    /// Computes the layout, calling `observer` after every iteration.
    ///
    /// Returning `ControlFlow::Break(())` from the observer stops the layout
    /// early; the positions reached so far become the embedding.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::ControlFlow;
    /// use rs_forceatlas::graph::datasets::karate_club;
    /// use rs_forceatlas::layout::{FitOptions, ForceAtlas2, ForceAtlasConfig};
    ///
    /// let mut force_atlas = ForceAtlas2::new(ForceAtlasConfig::default().with_random_state(1))
    ///     .expect("valid configuration");
    /// force_atlas
    ///     .fit_with_observer(&karate_club(), FitOptions::default(), |report| {
    ///         if report.iteration == 5 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    ///     })
    ///     .expect("valid adjacency");
    ///
    /// let report = force_atlas.report().expect("fitted");
    /// assert!(report.cancelled || report.converged);
    /// assert!(report.iterations <= 5);
    /// ```
    pub fn fit_with_observer<F>(
        &mut self,
        adjacency: &CsrMatrix,
        options: FitOptions,
        observer: F,
    ) -> Result<&mut Self, LayoutError>
    where
        F: FnMut(&IterationReport) -> ControlFlow<()>,
    {
        let mut config = self.config.clone();
        if let Some(n_components) = options.n_components {
            config.n_components = n_components;
        }
        if let Some(n_iter) = options.n_iter {
            config.n_iter = n_iter;
        }

        let mut simulation = Simulation::new(&config, adjacency, options.initial_positions)?;
        let report = simulation.run_with(observer);
        self.embedding = Some(simulation.into_positions());
        self.report = Some(report);
        Ok(self)
    }

    /// Computes the layout and returns a copy of the embedding.
    pub fn fit_transform(&mut self, adjacency: &CsrMatrix) -> Result<Embedding, LayoutError> {
        self.fit(adjacency)?;
        self.embedding.clone().ok_or_else(|| {
            LayoutError::InvalidParameter("layout produced no embedding".to_string())
        })
    }

    /// Positions from the last fit, one row per node.
    pub fn embedding(&self) -> Option<&Embedding> {
        self.embedding.as_ref()
    }

    pub fn report(&self) -> Option<&LayoutReport> {
        self.report.as_ref()
    }
}
