//! Shared helpers for the integration tests.

use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

/// Route `log` output through the test harness. Safe to call repeatedly.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Seeded synthetic regression problem.
#[allow(dead_code)]
pub struct Synthetic {
    pub x: DMatrix<f64>,
    pub y: DVector<f64>,
    pub beta: DVector<f64>,
}

/// `y = X beta + noise` with uniform design entries in `[-1, 1]` plus an
/// intercept column, and `beta_j = j + 1`.
#[allow(dead_code)]
pub fn linear_problem(n: usize, p: usize, noise_std: f64, seed: u64) -> Synthetic {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise_std).unwrap();

    let x = DMatrix::from_fn(n, p, |_, j| {
        if j == 0 { 1.0 } else { rng.gen_range(-1.0..=1.0) }
    });
    let beta = DVector::from_fn(p, |j, _| (j + 1) as f64);
    let noise = DVector::from_fn(n, |_, _| normal.sample(&mut rng));
    let y = &x * &beta + noise;

    Synthetic { x, y, beta }
}

/// Positive weights in `[0.5, 2]`.
#[allow(dead_code)]
pub fn weights(n: usize, seed: u64) -> DVector<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    DVector::from_fn(n, |_, _| rng.gen_range(0.5..=2.0))
}

#[allow(dead_code)]
pub fn assert_symmetric(cov: &DMatrix<f64>) {
    for i in 0..cov.nrows() {
        for j in 0..i {
            assert_eq!(cov[(i, j)], cov[(j, i)], "cov[{i},{j}] != cov[{j},{i}]");
        }
    }
}
