//! Numerical building blocks: column balancing and the SVD service.

pub mod balance;
pub mod svd;

pub use balance::*;
pub use svd::*;
