//! Singular value decomposition service.
//!
//! The solver only needs a thin SVD `A = U S Vᵀ` of the n×p working matrix and
//! does not care how it is computed. The [`Decomposition`] trait is the seam;
//! [`NalgebraSvd`] is the default implementation backed by `nalgebra`.
//!
//! Output convention (k = min(n, p)):
//! - `a` (n×p) is overwritten with `U` in its first k columns, zeros after
//! - `q` (p×p) receives `V` in its first k columns, zeros after
//! - `s` (p) receives the singular values in its first k entries, zeros after
//!
//! Padding with zeros keeps every buffer at the workspace's declared size even
//! when n < p; the zero singular values are never counted toward the rank.

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;

pub trait Decomposition {
    fn decompose(
        &self,
        a: &mut DMatrix<f64>,
        q: &mut DMatrix<f64>,
        s: &mut DVector<f64>,
    ) -> Result<(), FitError>;
}

/// `nalgebra` bidiagonalization + implicit-shift QR SVD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NalgebraSvd {
    /// Convergence threshold for the off-diagonal elements.
    pub eps: f64,
    /// Iteration cap; `0` means no limit.
    pub max_iter: usize,
}

impl Default for NalgebraSvd {
    fn default() -> Self {
        Self {
            eps: f64::EPSILON,
            max_iter: 0,
        }
    }
}

impl Decomposition for NalgebraSvd {
    fn decompose(
        &self,
        a: &mut DMatrix<f64>,
        q: &mut DMatrix<f64>,
        s: &mut DVector<f64>,
    ) -> Result<(), FitError> {
        let (n, p) = a.shape();
        assert_eq!(q.shape(), (p, p), "Q must be p x p");
        assert_eq!(s.len(), p, "S must have length p");

        // nalgebra panics on NaN singular values instead of reporting them.
        if a.iter().any(|v| !v.is_finite()) {
            return Err(FitError::DecompositionFailed(format!(
                "{n}x{p} matrix has non-finite entries"
            )));
        }

        let svd = a
            .clone()
            .try_svd(true, true, self.eps, self.max_iter)
            .ok_or_else(|| {
                FitError::DecompositionFailed(format!(
                    "no convergence for {n}x{p} matrix within {} iterations",
                    self.max_iter
                ))
            })?;

        let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
            return Err(FitError::DecompositionFailed(
                "singular vectors were not computed".into(),
            ));
        };
        let k = svd.singular_values.len();

        a.fill(0.0);
        a.columns_mut(0, k).copy_from(&u);

        q.fill(0.0);
        q.columns_mut(0, k).copy_from(&v_t.transpose());

        s.fill(0.0);
        s.rows_mut(0, k).copy_from(&svd.singular_values);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(a: &DMatrix<f64>, q: &DMatrix<f64>, s: &DVector<f64>) -> DMatrix<f64> {
        a * DMatrix::from_diagonal(s) * q.transpose()
    }

    #[test]
    fn decomposition_reconstructs_tall_matrix() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.5]);
        let mut a = x.clone();
        let mut q = DMatrix::zeros(2, 2);
        let mut s = DVector::zeros(2);
        NalgebraSvd::default().decompose(&mut a, &mut q, &mut s).unwrap();

        let back = reconstruct(&a, &q, &s);
        assert!((back - &x).norm() < 1e-12);
        // U has orthonormal columns.
        let utu = a.transpose() * &a;
        assert!((utu - DMatrix::<f64>::identity(2, 2)).norm() < 1e-12);
        assert!(s.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn non_finite_entries_are_reported() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut a = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
            a[(2, 1)] = bad;
            let mut q = DMatrix::zeros(2, 2);
            let mut s = DVector::zeros(2);
            let err = NalgebraSvd::default()
                .decompose(&mut a, &mut q, &mut s)
                .unwrap_err();
            assert!(matches!(err, FitError::DecompositionFailed(_)), "{bad}");
            assert!(s.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn wide_matrix_is_zero_padded() {
        let x = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 2.0, 0.0, 3.0, 1.0]);
        let mut a = x.clone();
        let mut q = DMatrix::zeros(3, 3);
        let mut s = DVector::zeros(3);
        NalgebraSvd::default().decompose(&mut a, &mut q, &mut s).unwrap();

        assert_eq!(s[2], 0.0);
        assert!(a.column(2).iter().all(|&v| v == 0.0));
        assert!(q.column(2).iter().all(|&v| v == 0.0));
        let back = reconstruct(&a, &q, &s);
        assert!((back - &x).norm() < 1e-12);
    }
}
