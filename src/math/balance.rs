//! Column balancing.
//!
//! Before the decomposition each column `A_j` is divided by a power of two
//! `D_j` chosen so that `‖A_j‖₂ / D_j ∈ [0.5, 1]`. Powers of two keep the
//! rescaling exact in binary floating point, so balancing changes conditioning
//! without introducing rounding error of its own.
//!
//! A solution `c'` of the balanced system `A D⁻¹ c' = y` maps back to the
//! original variables as `c = c' ⊘ D`.

use nalgebra::{DMatrix, DVector};

/// Scale the columns of `a` in place and record the factors in `d`.
///
/// Zero and non-finite columns are left untouched with `d_j = 1`.
///
/// # Panics
/// Panics if `d.len() != a.ncols()`. The workspace sizes both from the same `p`.
pub fn balance_columns(a: &mut DMatrix<f64>, d: &mut DVector<f64>) {
    assert_eq!(d.len(), a.ncols(), "balance vector length must equal column count");

    for j in 0..a.ncols() {
        let norm = a.column(j).norm();
        let f = power_of_two_scale(norm);
        d[j] = f;
        if f != 1.0 {
            a.column_mut(j).scale_mut(1.0 / f);
        }
    }
}

/// Power of two `f` such that `norm / f ∈ [0.5, 1]`.
fn power_of_two_scale(norm: f64) -> f64 {
    if norm == 0.0 || !norm.is_finite() {
        return 1.0;
    }

    let mut s = norm;
    let mut f = 1.0;
    while s > 1.0 {
        s /= 2.0;
        f *= 2.0;
    }
    while s < 0.5 {
        s *= 2.0;
        f /= 2.0;
    }
    f
}
