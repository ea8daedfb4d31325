//! Evaluation of a fitted expansion on an angular grid

use crate::basis::HarmonicBasisBuilder;
use crate::coords::to_cartesian;
use crate::indexing::num_coefficients;
use nalgebra::DVector;
use ndarray::{Array2, Zip};
use sphcrate_core::{AngularGrid, Error, Result, SurfaceGrid};

/// Grid samples evaluated per design-matrix block
const BLOCK_SAMPLES: usize = 4096;

/// Evaluates `r(theta, phi) = sum_j c_j Y_j(theta, phi)` and maps the result to cartesian grids
///
/// The radius is not clamped: an expansion truncated too early, or fitted to
/// noisy data, may produce negative or oscillating radii.
#[derive(Debug, Clone)]
pub struct SurfaceReconstructor {
    builder: HarmonicBasisBuilder,
}

impl SurfaceReconstructor {
    pub fn new(l_max: usize) -> Self {
        Self {
            builder: HarmonicBasisBuilder::new(l_max),
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.builder = self.builder.with_parallel(parallel);
        self
    }

    pub fn l_max(&self) -> usize {
        self.builder.l_max()
    }

    fn check_coefficients(&self, coefficients: &DVector<f64>) -> Result<()> {
        let expected = num_coefficients(self.l_max());
        if coefficients.len() != expected {
            return Err(Error::CoefficientCount {
                expected,
                actual: coefficients.len(),
            });
        }
        Ok(())
    }

    /// Radius of the expansion at each `(theta, phi)` sample
    pub fn evaluate_radius(
        &self,
        theta: &[f64],
        phi: &[f64],
        coefficients: &DVector<f64>,
    ) -> Result<Vec<f64>> {
        self.check_coefficients(coefficients)?;
        if theta.len() != phi.len() {
            return Err(Error::ShapeMismatch(format!(
                "{} theta values but {} phi values",
                theta.len(),
                phi.len()
            )));
        }

        // The grid design matrix is only ever needed one block at a time.
        let mut radii = Vec::with_capacity(theta.len());
        for (t, p) in theta.chunks(BLOCK_SAMPLES).zip(phi.chunks(BLOCK_SAMPLES)) {
            let design = self.builder.build(t, p)?;
            radii.extend((design.matrix() * coefficients).iter());
        }
        Ok(radii)
    }

    /// Evaluate the expansion over `grid` and convert to cartesian coordinates
    pub fn reconstruct(
        &self,
        grid: &AngularGrid,
        coefficients: &DVector<f64>,
    ) -> Result<SurfaceGrid> {
        self.check_coefficients(coefficients)?;

        let radii = self.evaluate_radius(&grid.flat_theta(), &grid.flat_phi(), coefficients)?;
        let radius = Array2::from_shape_vec(grid.dim(), radii)?;

        let mut x = Array2::zeros(grid.dim());
        let mut y = Array2::zeros(grid.dim());
        let mut z = Array2::zeros(grid.dim());
        Zip::from(&mut x)
            .and(&mut y)
            .and(&mut z)
            .and(&radius)
            .and(grid.theta())
            .and(grid.phi())
            .for_each(|x, y, z, &r, &theta, &phi| {
                let p = to_cartesian(r, theta, phi);
                *x = p.x;
                *y = p.y;
                *z = p.z;
            });

        log::debug!(
            "Reconstructed {}x{} surface grid (l_max = {})",
            grid.dim().0,
            grid.dim().1,
            self.l_max()
        );
        Ok(SurfaceGrid { x, y, z, radius })
    }
}

/// Reconstruct the surface described by `coefficients` on `grid`
pub fn reconstruct_spherical_surface(
    l_max: usize,
    grid: &AngularGrid,
    coefficients: &DVector<f64>,
) -> Result<SurfaceGrid> {
    SurfaceReconstructor::new(l_max).reconstruct(grid, coefficients)
}
