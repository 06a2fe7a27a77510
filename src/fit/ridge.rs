//! Ridge regression with a diagonal regularization matrix.
//!
//! Minimizes `‖y - X c‖² + ‖L c‖²` with `L = diag(lambda_1, ..., lambda_p)`.
//! With the change of variables
//!
//! ```text
//! X~ = X L⁻¹,   c~ = L c
//! ```
//!
//! this is standard-form Tikhonov regression on `X~ c~ = y` with `lambda = 1`,
//! so it reuses the scalar ridge path of the solver. The true coefficients are
//! recovered as `c = c~ ⊘ lambda`; covariance and chi-square come back from the
//! transformed solve as they are.

use nalgebra::{DMatrix, DVector};

use crate::domain::LinearFit;
use crate::error::FitError;
use crate::fit::solver::ridge_config;
use crate::fit::workspace::Workspace;
use crate::math::Decomposition;

impl<D: Decomposition> Workspace<D> {
    /// Per-parameter ridge regression. Every `lambda_j` must be nonzero.
    ///
    /// The covariance is that of the transformed coefficients `c~ = L c`, not
    /// of `c`. With a constant `lambda` it is `lambda²` times the covariance
    /// [`Workspace::fit_ridge`] reports.
    pub fn fit_ridge_vec(
        &mut self,
        lambda: &DVector<f64>,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
    ) -> Result<LinearFit, FitError> {
        let mut out = LinearFit::zeros(x.ncols());
        self.fit_ridge_vec_into(lambda, x, y, &mut out)?;
        Ok(out)
    }

    /// In-place form of [`Workspace::fit_ridge_vec`].
    ///
    /// All of `lambda` is checked before the transformed design is built, so a
    /// zero entry leaves both `out` and the workspace untouched.
    pub fn fit_ridge_vec_into(
        &mut self,
        lambda: &DVector<f64>,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        out: &mut LinearFit,
    ) -> Result<(), FitError> {
        let p = x.ncols();
        if lambda.len() != p || lambda.len() != out.coefficients.len() {
            return Err(FitError::RegularizationLength {
                params: p,
                len: lambda.len(),
            });
        }
        self.check_dims(x)?;
        if let Some(index) = lambda.iter().position(|&l| l == 0.0) {
            return Err(FitError::SingularRegularization { index });
        }

        let config = ridge_config();
        self.validate(x, y, None, out, config.tolerance, 1.0)?;

        // X~ = X L⁻¹
        for j in 0..p {
            let mut col = self.staged.column_mut(j);
            col.copy_from(&x.column(j));
            col.scale_mut(1.0 / lambda[j]);
        }

        self.decomposed = false;
        self.scratch.run(
            &self.svd,
            &self.staged,
            y,
            None,
            config.tolerance,
            config.balance,
            1.0,
            out,
        )?;
        self.decomposed = true;

        out.coefficients.component_div_assign(lambda);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> (DMatrix<f64>, DVector<f64>) {
        let ts: [f64; 8] = [0.1, 0.4, 0.9, 1.3, 2.0, 2.2, 3.1, 4.0];
        let x = DMatrix::from_fn(ts.len(), 3, |i, j| match j {
            0 => 1.0,
            1 => ts[i],
            _ => (ts[i] * 1.7).sin(),
        });
        let y = DVector::from_fn(ts.len(), |i, _| 0.5 + 1.5 * ts[i] - 0.8 * (ts[i] * 1.7).sin());
        (x, y)
    }

    #[test]
    fn constant_vector_reproduces_scalar_ridge() {
        let (x, y) = design();
        let mut work = Workspace::new(x.nrows(), 3).unwrap();
        let lambda = 0.3;

        let scalar = work.fit_ridge(lambda, &x, &y).unwrap();
        let vector = work
            .fit_ridge_vec(&DVector::from_element(3, lambda), &x, &y)
            .unwrap();

        for j in 0..3 {
            assert!((scalar.coefficients[j] - vector.coefficients[j]).abs() < 1e-10);
        }
        assert!((scalar.chisq - vector.chisq).abs() < 1e-10);
        assert_eq!(scalar.rank, vector.rank);
    }

    #[test]
    fn covariance_is_in_transformed_coordinates() {
        let (x, y) = design();
        let mut work = Workspace::new(x.nrows(), 3).unwrap();
        let lambda = 0.3;

        let scalar = work.fit_ridge(lambda, &x, &y).unwrap();
        let vector = work
            .fit_ridge_vec(&DVector::from_element(3, lambda), &x, &y)
            .unwrap();

        let scaled = &scalar.covariance * (lambda * lambda);
        let scale = scaled.amax().max(1e-300);
        assert!((&vector.covariance - &scaled).amax() / scale < 1e-8);
    }

    #[test]
    fn diagonal_penalty_matches_closed_form() {
        let (x, y) = design();
        let lambda = DVector::from_row_slice(&[0.1, 2.0, 0.5]);
        let mut work = Workspace::new(x.nrows(), 3).unwrap();
        let fit = work.fit_ridge_vec(&lambda, &x, &y).unwrap();

        let l2 = DMatrix::from_diagonal(&lambda.component_mul(&lambda));
        let gram = x.transpose() * &x + l2;
        let expected = gram.try_inverse().unwrap() * x.transpose() * &y;
        for j in 0..3 {
            assert!((fit.coefficients[j] - expected[j]).abs() < 1e-10, "coefficient {j}");
        }

        let resid = &y - &x * &fit.coefficients;
        let penalty = lambda.component_mul(&fit.coefficients).norm_squared();
        assert!((fit.chisq - (resid.norm_squared() + penalty)).abs() < 1e-10);

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(fit.covariance[(i, j)], fit.covariance[(j, i)]);
            }
        }
    }

    #[test]
    fn zero_entry_is_singular() {
        let (x, y) = design();
        let mut work = Workspace::new(x.nrows(), 3).unwrap();
        let mut out = LinearFit::zeros(3);
        let before = out.clone();
        let lambda = DVector::from_row_slice(&[1.0, 0.0, 1.0]);

        let err = work.fit_ridge_vec_into(&lambda, &x, &y, &mut out).unwrap_err();
        assert_eq!(err, FitError::SingularRegularization { index: 1 });
        assert_eq!(out, before);
        assert!(work.staged.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn lambda_length_is_checked() {
        let (x, y) = design();
        let mut work = Workspace::new(x.nrows(), 3).unwrap();
        let err = work
            .fit_ridge_vec(&DVector::from_element(2, 1.0), &x, &y)
            .unwrap_err();
        assert_eq!(err, FitError::RegularizationLength { params: 3, len: 2 });
    }
}
