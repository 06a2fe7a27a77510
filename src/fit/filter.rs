//! Singular-value filtering and rank estimation.
//!
//! Given the singular values `s` of the working matrix and a relative tolerance,
//! directions with `s_j <= tol * s_max` are treated as numerically zero. The
//! remaining directions are inverted with the Tikhonov filter
//!
//! ```text
//! alpha_j = s_j / (s_j^2 + lambda^2)
//! ```
//!
//! which reduces to `1 / s_j` for `lambda = 0`.

use nalgebra::{DMatrix, DVector};

/// Absolute cutoff `tol * s_max`.
pub fn rank_threshold(s: &DVector<f64>, tol: f64) -> f64 {
    tol * s.max()
}

/// Number of singular values strictly above `tol * s_max`.
pub fn effective_rank(s: &DVector<f64>, tol: f64) -> usize {
    let cutoff = rank_threshold(s, tol);
    s.iter().filter(|&&sj| sj > cutoff).count()
}

/// Filter coefficient for one singular value; `0` for excluded directions.
pub fn filter_factor(sj: f64, cutoff: f64, lambda_sq: f64) -> f64 {
    if sj <= cutoff {
        0.0
    } else {
        sj / (sj * sj + lambda_sq)
    }
}

/// Build `qsi = q * diag(alpha)` and return the effective rank.
///
/// # Panics
/// Panics if `q`, `qsi` and `s` disagree on the parameter count.
pub fn apply_filter(
    q: &DMatrix<f64>,
    s: &DVector<f64>,
    tol: f64,
    lambda: f64,
    qsi: &mut DMatrix<f64>,
) -> usize {
    assert_eq!(q.ncols(), s.len());
    qsi.copy_from(q);

    let cutoff = rank_threshold(s, tol);
    let lambda_sq = lambda * lambda;
    let mut rank = 0;

    for (j, &sj) in s.iter().enumerate() {
        if sj > cutoff {
            rank += 1;
        } else {
            log::trace!("singular value {j} ({sj:e}) at or below cutoff {cutoff:e}; excluded");
        }
        qsi.column_mut(j).scale_mut(filter_factor(sj, cutoff, lambda_sq));
    }

    rank
}
