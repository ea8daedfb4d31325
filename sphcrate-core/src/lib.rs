//! Core data structures and traits for sphcrate
//!
//! This crate provides the fundamental types shared by the spherical harmonic
//! fitting pipeline: points, point clouds, meshes, angular grids and the
//! normalization applied to a cloud before it is fitted.

pub mod point;
pub mod point_cloud;
pub mod mesh;
pub mod grid;
pub mod normalize;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use mesh::*;
pub use grid::*;
pub use normalize::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, DMatrix, DVector};

/// Re-export the array type used for angular grids
pub use ndarray::Array2;
