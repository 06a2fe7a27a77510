//! `svdfit` library crate.
//!
//! Generalized linear least squares: given an n×p design matrix `X` and
//! observations `y`, find `c` minimizing `‖y - X c‖²`, optionally weighted or
//! Tikhonov regularized, together with a covariance estimate, the residual
//! chi-square and the numerical rank.
//!
//! Ill-conditioned and rank-deficient systems are handled by filtering the
//! singular values of the (weighted, column-balanced) design matrix.
//!
//! ```no_run
//! use nalgebra::{DMatrix, DVector};
//! use svdfit::Workspace;
//!
//! let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
//! let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
//!
//! let mut work = Workspace::new(3, 2)?;
//! let fit = work.fit(&x, &y)?;
//! let est = fit.predict(&DVector::from_row_slice(&[1.0, 1.0]))?;
//! println!("c = {}, y(1,1) = {} ± {}", fit.coefficients, est.value, est.error);
//! # Ok::<(), svdfit::FitError>(())
//! ```

pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;

pub use domain::{DEFAULT_TOLERANCE, Estimate, LinearFit, SolverConfig};
pub use error::{ErrorKind, FitError};
pub use fit::Workspace;
pub use math::{Decomposition, NalgebraSvd};
pub use models::{predict, residuals, residuals_into};
