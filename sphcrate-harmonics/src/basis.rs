//! Real spherical harmonic basis and design matrix construction
//!
//! The real basis is derived from the orthonormal complex harmonics
//! `Y_l^|m|` (Condon-Shortley phase included) as
//!
//! * `m < 0`: `sqrt(2) * (-1)^m * Im(Y_l^|m|)`
//! * `m = 0`: `Re(Y_l^0)`
//! * `m > 0`: `sqrt(2) * (-1)^m * Re(Y_l^m)`
//!
//! Coefficients produced against this basis are only comparable with other
//! implementations that use the same signs and scaling, so the conversion is
//! kept literal rather than folded into the Legendre values.

use crate::indexing::{degree_orders, num_coefficients, DegreeOrder};
use crate::legendre::LegendreTable;
use nalgebra::{Complex, DMatrix};
use rayon::prelude::*;
use sphcrate_core::{Error, Result};
use std::f64::consts::SQRT_2;

/// Below this many samples rows are filled on the calling thread
const PARALLEL_MIN_SAMPLES: usize = 256;

/// Rows computed per scratch block before being copied into the matrix
const BLOCK_ROWS: usize = 1024;

/// Samples-by-coefficients matrix of basis values
///
/// Column `j` holds the basis function for `DegreeOrder::from_index(j)`.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    l_max: usize,
    matrix: DMatrix<f64>,
}

impl DesignMatrix {
    pub fn l_max(&self) -> usize {
        self.l_max
    }

    pub fn num_samples(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn num_coefficients(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn into_inner(self) -> DMatrix<f64> {
        self.matrix
    }
}

/// Builds design matrices for a fixed truncation degree
#[derive(Debug, Clone)]
pub struct HarmonicBasisBuilder {
    l_max: usize,
    parallel: bool,
}

impl HarmonicBasisBuilder {
    pub fn new(l_max: usize) -> Self {
        Self {
            l_max,
            parallel: true,
        }
    }

    /// Enable or disable multi-threaded row construction
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn l_max(&self) -> usize {
        self.l_max
    }

    pub fn num_coefficients(&self) -> usize {
        num_coefficients(self.l_max)
    }

    /// Evaluate every basis function at every `(theta, phi)` sample
    pub fn build(&self, theta: &[f64], phi: &[f64]) -> Result<DesignMatrix> {
        if theta.len() != phi.len() {
            return Err(Error::ShapeMismatch(format!(
                "{} theta values but {} phi values",
                theta.len(),
                phi.len()
            )));
        }

        let n = theta.len();
        let k = self.num_coefficients();
        let l_max = self.l_max;
        let mut matrix = DMatrix::zeros(n, k);

        // Rows are produced into a bounded row-major scratch block and copied
        // into the column-major matrix, so only one full-size buffer exists.
        let mut block = vec![0.0; BLOCK_ROWS.min(n) * k];
        for start in (0..n).step_by(BLOCK_ROWS) {
            let len = BLOCK_ROWS.min(n - start);
            let rows = &mut block[..len * k];
            let block_theta = &theta[start..start + len];
            let block_phi = &phi[start..start + len];

            if self.parallel && len >= PARALLEL_MIN_SAMPLES {
                rows.par_chunks_mut(k)
                    .zip(block_theta.par_iter().zip(block_phi.par_iter()))
                    .for_each_init(
                        || LegendreTable::new(l_max),
                        |table, (row, (&t, &p))| fill_row(table, t, p, row),
                    );
            } else {
                let mut table = LegendreTable::new(l_max);
                let samples = block_theta.iter().zip(block_phi.iter());
                for (row, (&t, &p)) in rows.chunks_mut(k).zip(samples) {
                    fill_row(&mut table, t, p, row);
                }
            }

            for (i, row) in rows.chunks(k).enumerate() {
                matrix.row_mut(start + i).copy_from_slice(row);
            }
        }

        log::debug!("Built {}x{} design matrix (l_max = {})", n, k, l_max);
        Ok(DesignMatrix { l_max, matrix })
    }
}

/// Write the real basis values for one sample into `row`, in canonical order
fn fill_row(table: &mut LegendreTable, theta: f64, phi: f64, row: &mut [f64]) {
    table.compute(theta);
    for pair in degree_orders(table.l_max()) {
        let abs_m = pair.m.unsigned_abs();
        let y = Complex::from_polar(table.get(pair.l, abs_m), abs_m as f64 * phi);
        row[pair.index()] = complex_to_real(pair.m, y);
    }
}

/// Apply the complex-to-real conversion for order `m` to `Y_l^|m|`
#[inline]
fn complex_to_real(m: isize, y: Complex<f64>) -> f64 {
    let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
    match m {
        m if m < 0 => SQRT_2 * sign * y.im,
        0 => y.re,
        _ => SQRT_2 * sign * y.re,
    }
}

/// Orthonormal complex spherical harmonic `Y_l^m` for `m >= 0`
///
/// Panics if `m > l`.
pub fn complex_harmonic(l: usize, m: usize, theta: f64, phi: f64) -> Complex<f64> {
    let mut table = LegendreTable::new(l);
    table.compute(theta);
    Complex::from_polar(table.get(l, m), m as f64 * phi)
}

/// Real spherical harmonic for a single `(l, m)` pair
pub fn real_harmonic(pair: DegreeOrder, theta: f64, phi: f64) -> f64 {
    let y = complex_harmonic(pair.l, pair.m.unsigned_abs(), theta, phi);
    complex_to_real(pair.m, y)
}

/// Design matrix for `theta`/`phi` samples truncated at `l_max`
pub fn compute_real_spherical_harmonics(
    theta: &[f64],
    phi: &[f64],
    l_max: usize,
) -> Result<DesignMatrix> {
    HarmonicBasisBuilder::new(l_max).build(theta, phi)
}
