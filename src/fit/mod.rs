//! Least-squares fitting.
//!
//! Responsibilities:
//!
//! - own the per-problem scratch space (`Workspace`)
//! - filter singular values and estimate rank
//! - solve weighted, unweighted and scalar-ridge problems through one core
//! - reduce per-parameter ridge problems to the scalar-ridge core

pub mod filter;
pub mod ridge;
pub mod solver;
pub mod workspace;

pub use filter::{apply_filter, effective_rank, filter_factor, rank_threshold};
pub use workspace::Workspace;
