//! Evaluation of a fitted linear model.
//!
//! - `predict`: point estimate `x · c` and its standard error `sqrt(xᵀ cov x)`
//! - `residuals`: `r = y - X c`
//!
//! Both are pure functions of their inputs and work for coefficients from any
//! source, not only from this crate's solvers.

use nalgebra::{DMatrix, DVector};

use crate::domain::Estimate;
use crate::error::FitError;

/// Predict the response at `x` with its standard error.
///
/// The variance is accumulated over the upper triangle of `cov`, which is
/// assumed symmetric. A covariance that is not positive semi-definite can
/// produce a negative variance; that is reported as
/// [`FitError::NegativeVariance`] rather than returned as `NaN`.
pub fn predict(
    x: &DVector<f64>,
    c: &DVector<f64>,
    cov: &DMatrix<f64>,
) -> Result<Estimate, FitError> {
    if x.len() != c.len() {
        return Err(FitError::InputMismatch {
            params: c.len(),
            len: x.len(),
        });
    }
    let (rows, cols) = cov.shape();
    if rows != cols {
        return Err(FitError::CovarianceNotSquare { rows, cols });
    }
    if c.len() != rows {
        return Err(FitError::CovarianceMismatch {
            params: c.len(),
            dim: rows,
        });
    }

    let value = x.dot(c);

    let mut var = 0.0;
    for i in 0..x.len() {
        let xi = x[i];
        var += xi * xi * cov[(i, i)];
        for j in (i + 1)..x.len() {
            var += 2.0 * xi * x[j] * cov[(i, j)];
        }
    }

    if var < 0.0 {
        return Err(FitError::NegativeVariance(var));
    }

    Ok(Estimate {
        value,
        error: var.sqrt(),
    })
}

/// Residual vector `y - X c`.
pub fn residuals(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    c: &DVector<f64>,
) -> Result<DVector<f64>, FitError> {
    let mut r = DVector::zeros(y.len());
    residuals_into(x, y, c, &mut r)?;
    Ok(r)
}

/// In-place form of [`residuals`]; `r` must have the length of `y`.
pub fn residuals_into(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    c: &DVector<f64>,
    r: &mut DVector<f64>,
) -> Result<(), FitError> {
    let (rows, cols) = x.shape();
    if rows != y.len() {
        return Err(FitError::ObservationMismatch { rows, len: y.len() });
    }
    if cols != c.len() {
        return Err(FitError::ParameterMismatch { cols, len: c.len() });
    }
    if y.len() != r.len() {
        return Err(FitError::ResidualMismatch {
            observations: y.len(),
            len: r.len(),
        });
    }

    r.copy_from(y);
    r.gemv(-1.0, x, c, 1.0);
    Ok(())
}
