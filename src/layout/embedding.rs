use rand::Rng;
use rand_distr::StandardNormal;
use crate::utils::LayoutError;

/// Dense `n_nodes x n_components` matrix of node positions, stored row-major.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::layout::Embedding;
///
/// let embedding = Embedding::from_rows(&[vec![0.0, 1.0], vec![2.0, -1.0]])
///     .expect("rows have equal length");
/// assert_eq!(embedding.n_nodes(), 2);
/// assert_eq!(embedding.n_components(), 2);
/// assert_eq!(embedding.row(1), &[2.0, -1.0]);
/// assert_eq!(embedding.axis_spread(0), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    n_components: usize,
    data: Vec<f64>,
}

impl Embedding {
    /// Wraps row-major `data` of shape `n_nodes x n_components`.
    pub fn new(n_nodes: usize, n_components: usize, data: Vec<f64>) -> Result<Self, LayoutError> {
        if n_components == 0 {
            return Err(LayoutError::InvalidParameter(
                "an embedding needs at least one component".to_string(),
            ));
        }
        let expected = n_nodes.checked_mul(n_components).ok_or_else(|| {
            LayoutError::InvalidParameter(format!(
                "an embedding of {} x {} does not fit in memory",
                n_nodes, n_components
            ))
        })?;
        if data.len() != expected {
            return Err(LayoutError::DimensionMismatch { expected, found: data.len() });
        }
        Ok(Self { n_components, data })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, LayoutError> {
        let n_components = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * n_components);
        for row in rows {
            if row.len() != n_components {
                return Err(LayoutError::DimensionMismatch { expected: n_components, found: row.len() });
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), n_components, data)
    }

    /// Positions drawn independently from a standard normal distribution.
    pub fn random<R: Rng>(n_nodes: usize, n_components: usize, rng: &mut R) -> Self {
        debug_assert!(n_components > 0, "an embedding needs at least one component");
        let data = (0..n_nodes * n_components)
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        Self { n_components, data }
    }

    pub fn n_nodes(&self) -> usize {
        self.data.len().checked_div(self.n_components).unwrap_or(0)
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn row(&self, node: usize) -> &[f64] {
        &self.data[node * self.n_components..(node + 1) * self.n_components]
    }

    pub fn row_mut(&mut self, node: usize) -> &mut [f64] {
        &mut self.data[node * self.n_components..(node + 1) * self.n_components]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_components)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Difference between the largest and smallest coordinate along `axis`,
    /// or zero for an empty embedding.
    pub fn axis_spread(&self, axis: usize) -> f64 {
        let (min, max) = self
            .rows()
            .map(|row| row[axis])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| (min.min(x), max.max(x)));
        if min > max {
            0.0
        } else {
            max - min
        }
    }

    /// Sum of the coordinates along every axis.
    pub fn axis_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_components];
        for row in self.rows() {
            for (sum, x) in sums.iter_mut().zip(row) {
                *sum += x;
            }
        }
        sums
    }
}
