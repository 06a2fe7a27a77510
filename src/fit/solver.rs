//! Linear least squares via the filtered singular value decomposition.
//!
//! Solves
//!
//! ```text
//! minimize Σ w_i (y_i - x_i^T c)^2 + lambda^2 ‖c‖^2
//! ```
//!
//! for the coefficient vector `c`. Weighting and the ridge term are never
//! combined; a weighted fit always has `lambda = 0`.
//!
//! Steps:
//! 1. copy X into the workspace; scale rows by `sqrt(max(w_i, 0))`
//! 2. optionally balance columns, `A = X D⁻¹`
//! 3. decompose `A = U S Vᵀ`
//! 4. project the right-hand side, `xt = Uᵀ t`
//! 5. filter: `QSI = V diag(alpha)` with `alpha_j = s_j / (s_j^2 + lambda^2)`
//!    for `s_j > tol * s_max`, else `0`
//! 6. `c = (QSI xt) ⊘ D`
//! 7. chi-square from the residuals against the caller's X
//! 8. `cov = s² (QSI QSIᵀ) ⊘ (D Dᵀ)`, where `s² = r² / (n - rank)` for
//!    unweighted fits and `1` for weighted fits (the weights already carry the
//!    noise model)

use nalgebra::{DMatrix, DVector};

use crate::domain::{DEFAULT_TOLERANCE, LinearFit, SolverConfig};
use crate::error::FitError;
use crate::fit::filter::apply_filter;
use crate::fit::workspace::{Scratch, Workspace};
use crate::math::{Decomposition, balance_columns};

/// Negative and NaN weights drop their observation instead of failing the fit.
pub(crate) fn clamp_weight(w: f64) -> f64 {
    if w > 0.0 { w } else { 0.0 }
}

impl<D: Decomposition> Workspace<D> {
    /// General in-place solve.
    ///
    /// `out` must be sized for `p` parameters (see [`LinearFit::zeros`]); its
    /// shapes are validated along with the inputs. Nothing in `out` is written
    /// unless the whole fit succeeds.
    ///
    /// `lambda` is the scalar Tikhonov parameter and must be `0` when
    /// `weights` is given. Balancing is taken from `config` as is; the ridge
    /// entry points disable it themselves.
    pub fn solve_into(
        &mut self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        weights: Option<&DVector<f64>>,
        config: &SolverConfig,
        lambda: f64,
        out: &mut LinearFit,
    ) -> Result<(), FitError> {
        self.validate(x, y, weights, out, config.tolerance, lambda)?;

        self.decomposed = false;
        self.scratch.run(
            &self.svd,
            x,
            y,
            weights,
            config.tolerance,
            config.balance,
            lambda,
            out,
        )?;
        self.decomposed = true;
        Ok(())
    }

    /// Ordinary least squares with the default tolerance and balancing.
    pub fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<LinearFit, FitError> {
        self.solve_owned(x, y, None, &SolverConfig::default(), 0.0)
    }

    /// Ordinary least squares with an explicit singular-value tolerance.
    pub fn fit_tol(
        &mut self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        tol: f64,
    ) -> Result<LinearFit, FitError> {
        let config = SolverConfig::default().with_tolerance(tol);
        self.solve_owned(x, y, None, &config, 0.0)
    }

    /// As [`Workspace::fit_tol`] without column balancing.
    pub fn fit_tol_unbalanced(
        &mut self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        tol: f64,
    ) -> Result<LinearFit, FitError> {
        let config = SolverConfig {
            tolerance: tol,
            balance: false,
        };
        self.solve_owned(x, y, None, &config, 0.0)
    }

    /// Standard-form Tikhonov regression, `(XᵀX + lambda² I)⁻¹ Xᵀ y`.
    ///
    /// The reported chi-square includes the penalty `lambda² ‖c‖²`.
    pub fn fit_ridge(
        &mut self,
        lambda: f64,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
    ) -> Result<LinearFit, FitError> {
        self.solve_owned(x, y, None, &ridge_config(), lambda)
    }

    /// Weighted least squares with the default tolerance and balancing.
    pub fn wfit(
        &mut self,
        x: &DMatrix<f64>,
        w: &DVector<f64>,
        y: &DVector<f64>,
    ) -> Result<LinearFit, FitError> {
        self.solve_owned(x, y, Some(w), &SolverConfig::default(), 0.0)
    }

    /// Weighted least squares with an explicit singular-value tolerance.
    pub fn wfit_tol(
        &mut self,
        x: &DMatrix<f64>,
        w: &DVector<f64>,
        y: &DVector<f64>,
        tol: f64,
    ) -> Result<LinearFit, FitError> {
        let config = SolverConfig::default().with_tolerance(tol);
        self.solve_owned(x, y, Some(w), &config, 0.0)
    }

    /// As [`Workspace::wfit_tol`] without column balancing.
    pub fn wfit_tol_unbalanced(
        &mut self,
        x: &DMatrix<f64>,
        w: &DVector<f64>,
        y: &DVector<f64>,
        tol: f64,
    ) -> Result<LinearFit, FitError> {
        let config = SolverConfig {
            tolerance: tol,
            balance: false,
        };
        self.solve_owned(x, y, Some(w), &config, 0.0)
    }

    fn solve_owned(
        &mut self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        weights: Option<&DVector<f64>>,
        config: &SolverConfig,
        lambda: f64,
    ) -> Result<LinearFit, FitError> {
        let mut out = LinearFit::zeros(x.ncols());
        self.solve_into(x, y, weights, config, lambda, &mut out)?;
        Ok(out)
    }

    /// Input and output shape checks, in reporting order.
    pub(crate) fn validate(
        &self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        weights: Option<&DVector<f64>>,
        out: &LinearFit,
        tol: f64,
        lambda: f64,
    ) -> Result<(), FitError> {
        let (rows, cols) = x.shape();
        if rows != y.len() {
            return Err(FitError::ObservationMismatch { rows, len: y.len() });
        }
        if cols != out.coefficients.len() {
            return Err(FitError::ParameterMismatch {
                cols,
                len: out.coefficients.len(),
            });
        }
        if let Some(w) = weights {
            if w.len() != y.len() {
                return Err(FitError::WeightMismatch {
                    weights: w.len(),
                    observations: y.len(),
                });
            }
        }
        let (cov_rows, cov_cols) = out.covariance.shape();
        if cov_rows != cov_cols {
            return Err(FitError::CovarianceNotSquare {
                rows: cov_rows,
                cols: cov_cols,
            });
        }
        if out.coefficients.len() != cov_rows {
            return Err(FitError::CovarianceMismatch {
                params: out.coefficients.len(),
                dim: cov_rows,
            });
        }
        self.check_dims(x)?;
        if !(tol > 0.0) {
            return Err(FitError::NonPositiveTolerance(tol));
        }
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(FitError::InvalidLambda(lambda));
        }
        if weights.is_some() && lambda != 0.0 {
            return Err(FitError::WeightedRidge(lambda));
        }
        if let Some(idx) = x.iter().position(|v| !v.is_finite()) {
            // column-major storage
            return Err(FitError::NonFiniteDesign {
                row: idx % rows,
                col: idx / rows,
            });
        }
        Ok(())
    }
}

/// Ridge fits never balance: the column scaling cannot be applied to the
/// Tikhonov term.
pub(crate) fn ridge_config() -> SolverConfig {
    SolverConfig {
        tolerance: DEFAULT_TOLERANCE,
        balance: false,
    }
}

impl Scratch {
    /// Numerical core. Inputs have already been validated against the
    /// workspace dimensions.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn run<D: Decomposition>(
        &mut self,
        svd: &D,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        weights: Option<&DVector<f64>>,
        tol: f64,
        balance: bool,
        lambda: f64,
        out: &mut LinearFit,
    ) -> Result<(), FitError> {
        let (n, p) = x.shape();

        // A = sqrt(W) X, t = sqrt(W) y
        self.a.copy_from(x);
        self.t.copy_from(y);
        if let Some(w) = weights {
            for i in 0..n {
                let sw = clamp_weight(w[i]).sqrt();
                self.a.row_mut(i).scale_mut(sw);
                self.t[i] *= sw;
            }
        }

        if balance {
            balance_columns(&mut self.a, &mut self.d);
        } else {
            self.d.fill(1.0);
        }

        svd.decompose(&mut self.a, &mut self.q, &mut self.s)?;

        self.xt.gemv_tr(1.0, &self.a, &self.t, 0.0);

        let rank = apply_filter(&self.q, &self.s, tol, lambda, &mut self.qsi);

        let c = &mut out.coefficients;
        c.gemv(1.0, &self.qsi, &self.xt, 0.0);
        c.component_div_assign(&self.d);

        // Residuals are taken against the caller's X, not the scaled copy.
        self.t.copy_from(y);
        self.t.gemv(-1.0, x, &*c, 1.0);

        let r2: f64 = match weights {
            Some(w) => self
                .t
                .iter()
                .zip(w.iter())
                .map(|(&r, &wi)| clamp_weight(wi) * r * r)
                .sum(),
            None => self.t.norm_squared(),
        };

        let (chisq, s2) = if weights.is_some() {
            (r2, 1.0)
        } else {
            let dof = n - rank;
            if dof == 0 {
                log::warn!(
                    "rank {rank} equals observation count {n}; variance scale is undefined"
                );
            }
            let ridge = lambda * lambda * c.norm_squared();
            (r2 + ridge, r2 / dof as f64)
        };

        for i in 0..p {
            let d_i = self.d[i];
            for j in i..p {
                let d_j = self.d[j];
                let s = self.qsi.row(i).dot(&self.qsi.row(j));
                let v = s * s2 / (d_i * d_j);
                out.covariance[(i, j)] = v;
                out.covariance[(j, i)] = v;
            }
        }

        out.chisq = chisq;
        out.rank = rank;

        log::debug!(
            "svd fit: n={n} p={p} rank={rank} lambda={lambda} weighted={} balanced={balance} chisq={chisq:e}",
            weights.is_some()
        );

        Ok(())
    }
}
