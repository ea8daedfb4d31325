//! # sphcrate harmonics
//!
//! Approximation of star-shaped surfaces by truncated real spherical harmonic
//! expansions.
//!
//! The pipeline runs in four stages:
//!
//! 1. [`coords`] maps cartesian points to `(r, theta, phi)` and back.
//! 2. [`basis`] evaluates the real harmonic basis at every sample, producing
//!    a design matrix whose columns follow the order fixed in [`indexing`].
//! 3. [`fit`] solves the linear least-squares problem for the coefficients.
//! 4. [`reconstruct`] evaluates the expansion on an angular grid and returns
//!    cartesian coordinate grids.
//!
//! [`model`] ties the stages together behind a single configuration.

pub mod coords;
pub mod indexing;
pub mod legendre;
pub mod basis;
pub mod fit;
pub mod reconstruct;
pub mod model;

pub use coords::*;
pub use indexing::*;
pub use basis::*;
pub use fit::*;
pub use reconstruct::*;
pub use model::*;
