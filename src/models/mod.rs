//! Evaluation of fitted linear models.
//!
//! Kept separate from the solvers so predictions and residuals can be computed
//! for coefficients obtained elsewhere.

pub mod estimate;

pub use estimate::*;
