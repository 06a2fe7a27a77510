//! Shared domain types.
//!
//! Fit outputs are plain owned `nalgebra` containers so callers can keep them
//! after the workspace that produced them is reused or dropped. Only the
//! solver configuration is serializable; fit state is not persisted.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::models::predict;

/// Default relative singular-value tolerance (machine epsilon).
pub const DEFAULT_TOLERANCE: f64 = f64::EPSILON;

/// Knobs shared by the unregularized entry points.
///
/// `tolerance` is relative: a singular value `s_j` counts toward the rank only
/// when `s_j > tolerance * s_max`.
///
/// Column balancing rescales each column of the (weighted) design matrix by a
/// power of two so that column norms are comparable before the decomposition.
/// It is always disabled for ridge fits because the scaling cannot be applied
/// to the Tikhonov term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub balance: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            balance: true,
        }
    }
}

impl SolverConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_balance(mut self, balance: bool) -> Self {
        self.balance = balance;
        self
    }
}

/// Result of a linear least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    /// Model coefficients `c` (length p).
    pub coefficients: DVector<f64>,
    /// Coefficient covariance (p×p, symmetric).
    pub covariance: DMatrix<f64>,
    /// Residual chi-square, including the ridge penalty for unweighted ridge fits.
    pub chisq: f64,
    /// Number of singular values above the tolerance threshold.
    pub rank: usize,
}

impl LinearFit {
    /// Zeroed output buffers for a `p`-parameter fit.
    ///
    /// This is the shape the in-place (`*_into`) entry points expect.
    pub fn zeros(p: usize) -> Self {
        Self {
            coefficients: DVector::zeros(p),
            covariance: DMatrix::zeros(p, p),
            chisq: 0.0,
            rank: 0,
        }
    }

    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// Standard errors `sqrt(diag(cov))`.
    pub fn standard_errors(&self) -> DVector<f64> {
        self.covariance.diagonal().map(f64::sqrt)
    }

    /// Point estimate and its standard error for a new input row.
    pub fn predict(&self, x: &DVector<f64>) -> Result<Estimate, FitError> {
        predict(x, &self.coefficients, &self.covariance)
    }
}

/// Prediction at a single input vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// `x · c`
    pub value: f64,
    /// `sqrt(xᵀ cov x)`
    pub error: f64,
}
