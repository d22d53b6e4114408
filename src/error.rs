//! Error taxonomy shared by every stage.
//!
//! Validation failures are reported before any computation runs, so a caller
//! never sees partial results together with an error.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    /// Wrong element values or an argument outside its domain
    /// (non-finite mask values, zero line count, zero cluster count, ...).
    #[error("invalid input: {0}")]
    InputType(String),

    /// Spatial dimensions of two rasters disagree, or a buffer does not match
    /// its declared dimensions.
    #[error("shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    Shape {
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The line search produced nothing the azimuth resolver could vote on.
    #[error("line search produced no candidates")]
    NoCandidates,

    #[error("clustering failed: {0}")]
    Clustering(#[from] ClusteringError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(String),
}

/// Failures specific to the spectral clustering stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    #[error("mask selects no pixels")]
    EmptyMask,

    #[error("requested {requested} clusters but the mask selects only {nodes} pixels")]
    TooManyClusters { requested: usize, nodes: usize },

    #[error("eigen-solver did not converge after {iterations} iterations (residual {residual:.3e})")]
    SolverDidNotConverge { iterations: usize, residual: f64 },

    #[error("spectral embedding contains non-finite values")]
    NonFiniteEmbedding,

    #[error("label discretization did not converge after {restarts} SVD restarts")]
    DiscretizationFailed { restarts: usize },
}

pub type Result<T> = std::result::Result<T, PanelError>;

impl PanelError {
    pub(crate) fn shape(
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        PanelError::Shape {
            context,
            expected,
            found,
        }
    }
}
