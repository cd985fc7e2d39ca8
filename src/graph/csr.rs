use approx::relative_eq;
use crate::utils::LayoutError;

/// Adjacency matrix in compressed sparse row form.
///
/// Row `i` stores the neighbours of node `i` in
/// `indices[indptr[i]..indptr[i + 1]]` and the matching edge weights in
/// `data`. Column indices are kept sorted within each row and duplicates are
/// summed, so two matrices describing the same graph compare equal.
///
/// # Examples
///
/// ```
/// use rs_forceatlas::graph::CsrMatrix;
///
/// // Path graph 0 - 1 - 2.
/// let adjacency = CsrMatrix::from_edges(3, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (2, 1, 1.0)])
///     .expect("valid edges");
///
/// assert_eq!(adjacency.n_nodes(), 3);
/// assert_eq!(adjacency.nnz(), 4);
/// assert!(adjacency.is_symmetric());
/// assert_eq!(adjacency.neighbors(1).0, &[0, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Creates a matrix from raw CSR arrays.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::MalformedSparse` if `indptr` does not have
    /// `n_rows + 1` entries, does not start at zero, decreases, or does not
    /// end at the number of stored entries; if `indices` and `data` differ in
    /// length; if a column index is out of bounds; or if a weight is not finite.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self, LayoutError> {
        let expected_indptr = n_rows.checked_add(1).ok_or_else(|| {
            LayoutError::MalformedSparse(format!("{} rows cannot be indexed", n_rows))
        })?;
        if indptr.len() != expected_indptr {
            return Err(LayoutError::MalformedSparse(format!(
                "indptr has {} entries, expected {}",
                indptr.len(),
                expected_indptr
            )));
        }
        if indptr[0] != 0 {
            return Err(LayoutError::MalformedSparse("indptr must start at 0".to_string()));
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(LayoutError::MalformedSparse("indptr must be non-decreasing".to_string()));
        }
        if indices.len() != data.len() {
            return Err(LayoutError::MalformedSparse(format!(
                "indices has {} entries but data has {}",
                indices.len(),
                data.len()
            )));
        }
        if indptr[n_rows] != indices.len() {
            return Err(LayoutError::MalformedSparse(format!(
                "indptr ends at {} but {} entries are stored",
                indptr[n_rows],
                indices.len()
            )));
        }
        if let Some(&col) = indices.iter().find(|&&col| col >= n_cols) {
            return Err(LayoutError::MalformedSparse(format!(
                "column index {} out of bounds for {} columns",
                col, n_cols
            )));
        }
        if data.iter().any(|w| !w.is_finite()) {
            return Err(LayoutError::MalformedSparse("edge weights must be finite".to_string()));
        }

        let rows = (0..n_rows)
            .map(|row| {
                (indptr[row]..indptr[row + 1])
                    .map(|k| (indices[k], data[k]))
                    .collect()
            })
            .collect();
        Ok(Self::from_rows(n_rows, n_cols, rows))
    }

    /// Creates an `n x n` matrix from `(source, target, weight)` triples.
    ///
    /// Edges are taken as directed; repeated edges have their weights summed.
    /// Use [`CsrMatrix::to_undirected`] to symmetrize.
    pub fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Result<Self, LayoutError> {
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for &(source, target, weight) in edges {
            if source >= n || target >= n {
                return Err(LayoutError::MalformedSparse(format!(
                    "edge ({}, {}) out of bounds for {} nodes",
                    source, target, n
                )));
            }
            if !weight.is_finite() {
                return Err(LayoutError::MalformedSparse("edge weights must be finite".to_string()));
            }
            rows[source].push((target, weight));
        }
        Ok(Self::from_rows(n, n, rows))
    }

    /// Creates a matrix from dense rows, storing every non-zero entry.
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self, LayoutError> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut sparse_rows = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != n_cols {
                return Err(LayoutError::DimensionMismatch { expected: n_cols, found: row.len() });
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(LayoutError::MalformedSparse("edge weights must be finite".to_string()));
            }
            sparse_rows.push(
                row.iter()
                    .enumerate()
                    .filter(|&(_, &w)| w != 0.0)
                    .map(|(col, &w)| (col, w))
                    .collect(),
            );
        }
        Ok(Self::from_rows(rows.len(), n_cols, sparse_rows))
    }

    // Rows are sorted by column and duplicate columns merged.
    fn from_rows(n_rows: usize, n_cols: usize, rows: Vec<Vec<(usize, f64)>>) -> Self {
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for mut row in rows {
            row.sort_by_key(|&(col, _)| col);
            let row_start = indices.len();
            for (col, weight) in row {
                if indices.len() > row_start && indices[indices.len() - 1] == col {
                    let last = data.len() - 1;
                    data[last] += weight;
                } else {
                    indices.push(col);
                    data.push(weight);
                }
            }
            indptr.push(indices.len());
        }
        Self { n_rows, n_cols, indptr, indices, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of nodes, i.e. the number of rows.
    pub fn n_nodes(&self) -> usize {
        self.n_rows
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the neighbour indices of `node` and the matching edge weights.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid row index.
    pub fn neighbors(&self, node: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[node]..self.indptr[node + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Fails with `LayoutError::NonSquareMatrix` unless the matrix is square.
    pub fn check_square(&self) -> Result<(), LayoutError> {
        if self.n_rows != self.n_cols {
            return Err(LayoutError::NonSquareMatrix { rows: self.n_rows, cols: self.n_cols });
        }
        Ok(())
    }

    pub fn transpose(&self) -> Self {
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.n_cols];
        for row in 0..self.n_rows {
            let (cols, weights) = self.neighbors(row);
            for (&col, &weight) in cols.iter().zip(weights) {
                rows[col].push((row, weight));
            }
        }
        Self::from_rows(self.n_cols, self.n_rows, rows)
    }

    /// Returns true if the matrix is square and equal to its transpose, with
    /// weights compared up to floating point noise.
    pub fn is_symmetric(&self) -> bool {
        if self.n_rows != self.n_cols {
            return false;
        }
        let transposed = self.transpose();
        self.indptr == transposed.indptr
            && self.indices == transposed.indices
            && self
                .data
                .iter()
                .zip(&transposed.data)
                .all(|(a, b)| relative_eq!(*a, *b, epsilon = 1e-12))
    }

    /// Undirected counterpart of a directed graph: `A + A^T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_forceatlas::graph::CsrMatrix;
    ///
    /// let directed = CsrMatrix::from_edges(2, &[(0, 1, 1.0)]).expect("valid edges");
    /// assert!(!directed.is_symmetric());
    ///
    /// let undirected = directed.to_undirected();
    /// assert!(undirected.is_symmetric());
    /// assert_eq!(undirected.neighbors(1), (&[0usize][..], &[1.0][..]));
    /// ```
    pub fn to_undirected(&self) -> Self {
        let transposed = self.transpose();
        let rows = (0..self.n_rows)
            .map(|row| {
                let (cols, weights) = self.neighbors(row);
                let (t_cols, t_weights) = transposed.neighbors(row);
                cols.iter()
                    .copied()
                    .zip(weights.iter().copied())
                    .chain(t_cols.iter().copied().zip(t_weights.iter().copied()))
                    .collect()
            })
            .collect();
        Self::from_rows(self.n_rows, self.n_cols, rows)
    }

    /// Weighted degree of every node, plus one.
    pub fn degree_vector(&self) -> Vec<f64> {
        (0..self.n_rows)
            .map(|row| self.neighbors(row).1.iter().sum::<f64>() + 1.0)
            .collect()
    }
}
