use crate::graph::datasets::karate_club;
use crate::graph::CsrMatrix;
use crate::utils::LayoutError;

#[test]
fn test_new_accepts_valid_arrays() {
    // Triangle with unit weights.
    let matrix = CsrMatrix::new(
        3,
        3,
        vec![0, 2, 4, 6],
        vec![1, 2, 0, 2, 0, 1],
        vec![1.0; 6],
    )
    .expect("valid CSR arrays");
    assert_eq!(matrix.shape(), (3, 3));
    assert_eq!(matrix.nnz(), 6);
    assert!(matrix.is_symmetric());
}

#[test]
fn test_new_sorts_and_merges_columns() {
    let matrix = CsrMatrix::new(2, 2, vec![0, 3, 3], vec![1, 0, 1], vec![1.0, 2.0, 0.5])
        .expect("valid CSR arrays");
    assert_eq!(matrix.indptr(), &[0, 2, 2]);
    assert_eq!(matrix.indices(), &[0, 1]);
    assert_eq!(matrix.data(), &[2.0, 1.5]);
}

#[test]
fn test_new_rejects_bad_indptr_length() {
    let result = CsrMatrix::new(2, 2, vec![0, 1], vec![1], vec![1.0]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_new_rejects_row_count_without_indptr() {
    let result = CsrMatrix::new(usize::MAX, usize::MAX, vec![], vec![], vec![]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_new_rejects_decreasing_indptr() {
    let result = CsrMatrix::new(2, 2, vec![0, 2, 1], vec![1, 0], vec![1.0, 1.0]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_new_rejects_nonzero_start() {
    let result = CsrMatrix::new(1, 2, vec![1, 1], vec![], vec![]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_new_rejects_out_of_bounds_column() {
    let result = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![2], vec![1.0]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_new_rejects_length_mismatch() {
    let result = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![1], vec![1.0, 2.0]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_new_rejects_non_finite_weight() {
    let result = CsrMatrix::new(2, 2, vec![0, 1, 1], vec![1], vec![f64::NAN]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_check_square() {
    let square = CsrMatrix::new(2, 2, vec![0, 0, 0], vec![], vec![]).expect("empty 2x2");
    assert!(square.check_square().is_ok());

    let rectangular = CsrMatrix::new(2, 3, vec![0, 0, 0], vec![], vec![]).expect("empty 2x3");
    assert_eq!(
        rectangular.check_square(),
        Err(LayoutError::NonSquareMatrix { rows: 2, cols: 3 })
    );
    assert!(!rectangular.is_symmetric());
}

#[test]
fn test_from_edges_rejects_out_of_bounds() {
    let result = CsrMatrix::from_edges(2, &[(0, 2, 1.0)]);
    assert!(matches!(result, Err(LayoutError::MalformedSparse(_))));
}

#[test]
fn test_from_edges_sums_duplicates() {
    let matrix = CsrMatrix::from_edges(2, &[(0, 1, 1.0), (0, 1, 2.0)]).expect("valid edges");
    assert_eq!(matrix.neighbors(0), (&[1usize][..], &[3.0][..]));
}

#[test]
fn test_from_dense() {
    let matrix = CsrMatrix::from_dense(&[
        vec![0.0, 2.0, 0.0],
        vec![2.0, 0.0, 1.0],
        vec![0.0, 1.0, 0.0],
    ])
    .expect("valid dense matrix");
    assert_eq!(matrix.nnz(), 4);
    assert!(matrix.is_symmetric());
    assert_eq!(matrix.neighbors(1), (&[0usize, 2][..], &[2.0, 1.0][..]));
}

#[test]
fn test_from_dense_rejects_ragged_rows() {
    let result = CsrMatrix::from_dense(&[vec![0.0, 1.0], vec![1.0]]);
    assert_eq!(result, Err(LayoutError::DimensionMismatch { expected: 2, found: 1 }));
}

#[test]
fn test_symmetry_detects_weight_difference() {
    let matrix = CsrMatrix::from_edges(2, &[(0, 1, 1.0), (1, 0, 2.0)]).expect("valid edges");
    assert!(!matrix.is_symmetric());
}

#[test]
fn test_transpose() {
    let matrix = CsrMatrix::from_edges(3, &[(0, 1, 1.0), (0, 2, 3.0)]).expect("valid edges");
    let transposed = matrix.transpose();
    assert_eq!(transposed.neighbors(0).0.len(), 0);
    assert_eq!(transposed.neighbors(1), (&[0usize][..], &[1.0][..]));
    assert_eq!(transposed.neighbors(2), (&[0usize][..], &[3.0][..]));
}

#[test]
fn test_to_undirected_adds_transpose() {
    let directed = CsrMatrix::from_edges(3, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 2.0)])
        .expect("valid edges");
    let undirected = directed.to_undirected();
    assert!(undirected.is_symmetric());
    // Reciprocal edges are counted twice, one-way edges once each direction.
    assert_eq!(undirected.neighbors(0), (&[1usize][..], &[2.0][..]));
    assert_eq!(undirected.neighbors(2), (&[1usize][..], &[2.0][..]));
}

#[test]
fn test_degree_vector_adds_one() {
    let matrix = CsrMatrix::from_edges(3, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 0.5), (2, 1, 0.5)])
        .expect("valid edges");
    assert_eq!(matrix.degree_vector(), vec![2.0, 2.5, 1.5]);
}

#[test]
fn test_karate_club_degrees() {
    let adjacency = karate_club();
    let degrees = adjacency.degree_vector();
    assert_eq!(degrees.len(), 34);
    // Node 33 is the club administrator with 17 friends, node 0 the instructor with 16.
    assert_eq!(degrees[33], 18.0);
    assert_eq!(degrees[0], 17.0);
    assert_eq!(degrees.iter().sum::<f64>(), 156.0 + 34.0);
}
