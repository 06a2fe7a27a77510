//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - solver configuration (`SolverConfig`)
//! - fit outputs (`LinearFit`, `Estimate`)

pub mod types;

pub use types::*;
