use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or running a layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Barnes-Hut was requested for a layout with more than two dimensions.
    InvalidDimension { n_components: usize },
    /// A configuration value is out of its valid range (e.g. non-positive theta).
    InvalidParameter(String),
    /// The adjacency matrix is not square.
    NonSquareMatrix { rows: usize, cols: usize },
    /// The compressed sparse row arrays are inconsistent.
    MalformedSparse(String),
    /// Supplied data does not have the expected shape.
    DimensionMismatch { expected: usize, found: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutError::InvalidDimension { n_components } => write!(
                f,
                "Barnes-Hut approximation only supports 1 or 2 dimensions, got {}",
                n_components
            ),
            LayoutError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            LayoutError::NonSquareMatrix { rows, cols } => {
                write!(f, "Adjacency matrix must be square, got {}x{}", rows, cols)
            }
            LayoutError::MalformedSparse(msg) => write!(f, "Malformed sparse matrix: {}", msg),
            LayoutError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl Error for LayoutError {}
