//! Caller-owned scratch space for linear least-squares fits.
//!
//! A [`Workspace`] is sized once for an n×p problem and reused across fits of
//! that shape. Every entry point takes `&mut self`: a workspace serves one fit
//! at a time, and concurrent fits need one workspace each. There is no
//! internal locking.
//!
//! Buffers:
//! - `a` (n×p): working copy of the design; holds `U` after the decomposition
//! - `q` (p×p): right singular vectors `V`
//! - `qsi` (p×p): `V` with filtered columns, `V diag(alpha)`
//! - `s` (p): singular values
//! - `d` (p): column balance factors
//! - `xt` (p): projected right-hand side `Uᵀ t`
//! - `t` (n): weighted right-hand side, later the residual vector
//! - `staged` (n×p): transformed design for the per-parameter ridge path
//!
//! `staged` is separate from the scratch buffers so the ridge path can hand
//! the transformed design to the solver by shared reference while the solver
//! mutates `a`.

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;
use crate::math::{Decomposition, NalgebraSvd};

#[derive(Debug, Clone)]
pub(crate) struct Scratch {
    pub(crate) a: DMatrix<f64>,
    pub(crate) q: DMatrix<f64>,
    pub(crate) qsi: DMatrix<f64>,
    pub(crate) s: DVector<f64>,
    pub(crate) d: DVector<f64>,
    pub(crate) xt: DVector<f64>,
    pub(crate) t: DVector<f64>,
}

impl Scratch {
    fn new(n: usize, p: usize) -> Self {
        Self {
            a: DMatrix::zeros(n, p),
            q: DMatrix::zeros(p, p),
            qsi: DMatrix::zeros(p, p),
            s: DVector::zeros(p),
            d: DVector::from_element(p, 1.0),
            xt: DVector::zeros(p),
            t: DVector::zeros(n),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workspace<D = NalgebraSvd> {
    n: usize,
    p: usize,
    pub(crate) scratch: Scratch,
    pub(crate) staged: DMatrix<f64>,
    pub(crate) svd: D,
    /// Whether `scratch.s` holds the spectrum of a completed solve.
    pub(crate) decomposed: bool,
}

impl Workspace<NalgebraSvd> {
    /// Workspace for `n` observations and `p` parameters.
    pub fn new(n: usize, p: usize) -> Result<Self, FitError> {
        Self::with_decomposition(n, p, NalgebraSvd::default())
    }
}

impl<D: Decomposition> Workspace<D> {
    /// Workspace using a custom decomposition service.
    pub fn with_decomposition(n: usize, p: usize, svd: D) -> Result<Self, FitError> {
        if n == 0 || p == 0 {
            return Err(FitError::EmptyWorkspace { rows: n, cols: p });
        }
        Ok(Self {
            n,
            p,
            scratch: Scratch::new(n, p),
            staged: DMatrix::zeros(n, p),
            svd,
            decomposed: false,
        })
    }

    /// Declared `(n, p)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.n, self.p)
    }

    /// Singular values of the (weighted, balanced) matrix from the most recent
    /// successful fit, largest first. `None` before the first fit.
    pub fn singular_values(&self) -> Option<&DVector<f64>> {
        self.decomposed.then_some(&self.scratch.s)
    }

    /// Column balance factors used by the most recent successful fit.
    pub fn balance_factors(&self) -> Option<&DVector<f64>> {
        self.decomposed.then_some(&self.scratch.d)
    }

    /// Reciprocal condition number `s_min / s_max` of the most recent fit,
    /// taken over the leading `min(n, p)` singular values.
    pub fn rcond(&self) -> Option<f64> {
        let s = self.singular_values()?;
        let k = self.n.min(self.p);
        let head = s.rows(0, k);
        let s_max = head.max();
        if s_max == 0.0 {
            return Some(0.0);
        }
        Some(head.min() / s_max)
    }

    pub(crate) fn check_dims(&self, x: &DMatrix<f64>) -> Result<(), FitError> {
        let (rows, cols) = x.shape();
        if rows != self.n || cols != self.p {
            return Err(FitError::WorkspaceMismatch {
                expected_rows: self.n,
                expected_cols: self.p,
                rows,
                cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dimensions_are_rejected() {
        let err = Workspace::new(0, 3).unwrap_err();
        assert_eq!(err, FitError::EmptyWorkspace { rows: 0, cols: 3 });
        assert!(Workspace::new(3, 0).is_err());
    }

    #[test]
    fn fresh_workspace_has_no_spectrum() {
        let work = Workspace::new(4, 2).unwrap();
        assert_eq!(work.dims(), (4, 2));
        assert!(work.singular_values().is_none());
        assert!(work.rcond().is_none());
    }

    #[test]
    fn dimension_check_reports_both_shapes() {
        let work = Workspace::new(4, 2).unwrap();
        let x = DMatrix::<f64>::zeros(5, 2);
        assert_eq!(
            work.check_dims(&x).unwrap_err(),
            FitError::WorkspaceMismatch {
                expected_rows: 4,
                expected_cols: 2,
                rows: 5,
                cols: 2
            }
        );
    }
}
