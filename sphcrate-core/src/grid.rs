//! Angular parameter grids and surfaces sampled on them

use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;
use crate::point::Point3d;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A rectangular mesh of (theta, phi) parameters
///
/// Both arrays always have the same shape. Samples are visited in row-major
/// order, which is also the order of the rows of a design matrix built over
/// the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularGrid {
    theta: Array2<f64>,
    phi: Array2<f64>,
}

impl AngularGrid {
    /// Create a grid from explicit theta and phi arrays
    pub fn new(theta: Array2<f64>, phi: Array2<f64>) -> Result<Self> {
        if theta.dim() != phi.dim() {
            return Err(Error::ShapeMismatch(format!(
                "theta grid has shape {:?} but phi grid has shape {:?}",
                theta.dim(),
                phi.dim()
            )));
        }
        Ok(Self { theta, phi })
    }

    /// Square grid covering theta in `[0, pi]` and phi in `[0, 2pi]`
    pub fn regular(resolution: usize) -> Result<Self> {
        Self::regular_with(resolution, resolution)
    }

    /// Grid of `n_theta` zenith rows by `n_phi` azimuth columns
    ///
    /// Endpoints are included on both axes, so the first and last columns
    /// coincide on the sphere and the first and last rows collapse to the poles.
    pub fn regular_with(n_theta: usize, n_phi: usize) -> Result<Self> {
        if n_theta == 0 || n_phi == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid resolution must be positive, got {}x{}",
                n_theta, n_phi
            )));
        }
        let thetas = Array1::linspace(0.0, PI, n_theta);
        let phis = Array1::linspace(0.0, 2.0 * PI, n_phi);
        let theta = Array2::from_shape_fn((n_theta, n_phi), |(i, _)| thetas[i]);
        let phi = Array2::from_shape_fn((n_theta, n_phi), |(_, j)| phis[j]);
        Ok(Self { theta, phi })
    }

    pub fn theta(&self) -> &Array2<f64> {
        &self.theta
    }

    pub fn phi(&self) -> &Array2<f64> {
        &self.phi
    }

    /// Shape as (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.theta.dim()
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    /// Flattened theta values in row-major order
    pub fn flat_theta(&self) -> Vec<f64> {
        self.theta.iter().copied().collect()
    }

    /// Flattened phi values in row-major order
    pub fn flat_phi(&self) -> Vec<f64> {
        self.phi.iter().copied().collect()
    }
}

/// A surface sampled on an angular grid, as cartesian coordinate grids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGrid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
    /// The radius that produced each cartesian sample; may be negative
    pub radius: Array2<f64>,
}

impl SurfaceGrid {
    /// Shape as (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }

    /// Cartesian point at grid cell `(row, col)`
    pub fn point(&self, row: usize, col: usize) -> Point3d {
        Point3d::new(self.x[[row, col]], self.y[[row, col]], self.z[[row, col]])
    }

    /// All grid points in row-major order
    pub fn points(&self) -> Vec<Point3d> {
        self.x
            .iter()
            .zip(self.y.iter())
            .zip(self.z.iter())
            .map(|((&x, &y), &z)| Point3d::new(x, y, z))
            .collect()
    }

    /// Triangulate the grid, two triangles per cell
    pub fn to_mesh(&self) -> TriangleMesh {
        let (rows, cols) = self.dim();
        let mut faces = Vec::with_capacity(2 * rows.saturating_sub(1) * cols.saturating_sub(1));
        for i in 0..rows.saturating_sub(1) {
            for j in 0..cols.saturating_sub(1) {
                let a = i * cols + j;
                let b = (i + 1) * cols + j;
                let c = i * cols + j + 1;
                let d = (i + 1) * cols + j + 1;
                faces.push([a, b, c]);
                faces.push([b, d, c]);
            }
        }
        TriangleMesh::from_vertices_and_faces(self.points(), faces)
    }
}
