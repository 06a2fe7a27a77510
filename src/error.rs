use thiserror::Error;

/// Coarse classification of a [`FitError`].
///
/// Every variant of [`FitError`] maps to exactly one kind, so callers that only
/// care about "what sort of mistake" can match on this instead of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Two lengths that must agree do not.
    Dimension,
    /// A matrix that must be square is not.
    Shape,
    /// A scalar argument is out of its allowed range.
    InvalidArgument,
    /// The inputs are well-formed but mathematically unusable.
    Domain,
    /// The decomposition collaborator failed.
    Numerical,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("number of observations in y ({len}) does not match rows of matrix X ({rows})")]
    ObservationMismatch { rows: usize, len: usize },

    #[error("number of parameters ({len}) does not match columns of matrix X ({cols})")]
    ParameterMismatch { cols: usize, len: usize },

    #[error("number of parameters c ({params}) does not match number of observations x ({len})")]
    InputMismatch { params: usize, len: usize },

    #[error("number of weights ({weights}) does not match number of observations ({observations})")]
    WeightMismatch { weights: usize, observations: usize },

    #[error("covariance matrix is not square ({rows}x{cols})")]
    CovarianceNotSquare { rows: usize, cols: usize },

    #[error("number of parameters ({params}) does not match size of covariance matrix ({dim})")]
    CovarianceMismatch { params: usize, dim: usize },

    #[error(
        "size of workspace ({expected_rows}x{expected_cols}) does not match size of observation matrix ({rows}x{cols})"
    )]
    WorkspaceMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("lambda vector has incorrect length {len}, expected {params}")]
    RegularizationLength { params: usize, len: usize },

    #[error("number of observations in y ({observations}) does not match number of residuals ({len})")]
    ResidualMismatch { observations: usize, len: usize },

    #[error("tolerance must be positive, got {0}")]
    NonPositiveTolerance(f64),

    #[error("regularization parameter must be finite and non-negative, got {0}")]
    InvalidLambda(f64),

    #[error("weighted fits cannot be combined with a regularization term (lambda = {0})")]
    WeightedRidge(f64),

    #[error("design matrix entry ({row}, {col}) is not finite")]
    NonFiniteDesign { row: usize, col: usize },

    #[error("workspace dimensions must be positive, got {rows}x{cols}")]
    EmptyWorkspace { rows: usize, cols: usize },

    #[error("lambda matrix is singular: entry {index} is zero")]
    SingularRegularization { index: usize },

    #[error("prediction variance is negative ({0}); covariance is not positive semi-definite")]
    NegativeVariance(f64),

    #[error("singular value decomposition failed: {0}")]
    DecompositionFailed(String),
}

impl FitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FitError::ObservationMismatch { .. }
            | FitError::ParameterMismatch { .. }
            | FitError::InputMismatch { .. }
            | FitError::WeightMismatch { .. }
            | FitError::CovarianceMismatch { .. }
            | FitError::WorkspaceMismatch { .. }
            | FitError::RegularizationLength { .. }
            | FitError::ResidualMismatch { .. } => ErrorKind::Dimension,
            FitError::CovarianceNotSquare { .. } => ErrorKind::Shape,
            FitError::NonPositiveTolerance(_)
            | FitError::InvalidLambda(_)
            | FitError::WeightedRidge(_)
            | FitError::NonFiniteDesign { .. }
            | FitError::EmptyWorkspace { .. } => ErrorKind::InvalidArgument,
            FitError::SingularRegularization { .. } | FitError::NegativeVariance(_) => {
                ErrorKind::Domain
            }
            FitError::DecompositionFailed(_) => ErrorKind::Numerical,
        }
    }
}
