//! End-to-end spherical harmonic surface model
//!
//! Ties coordinate conversion, basis construction, the least-squares fit and
//! grid reconstruction together behind one configuration.

use crate::basis::HarmonicBasisBuilder;
use crate::coords::{cartesian_to_spherical_with, OriginPolicy};
use crate::fit::{FitResult, LeastSquaresFitter};
use crate::indexing::{num_coefficients, DegreeOrder};
use crate::reconstruct::SurfaceReconstructor;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sphcrate_core::{
    normalize_point_cloud, AngularGrid, Error, Normalization, Point3d, PointCloud, Result,
    SurfaceGrid,
};
use std::time::Instant;

/// Configuration for fitting a spherical harmonic expansion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Highest harmonic degree in the expansion
    pub l_max: usize,
    /// Handling of input points at the origin
    pub origin_policy: OriginPolicy,
    /// Accept fewer samples than coefficients and return the minimum-norm fit
    pub allow_underdetermined: bool,
    /// Relative singular value cutoff; `None` picks one from the matrix size
    pub rcond: Option<f64>,
    /// Build design matrices on the rayon thread pool
    pub parallel: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            l_max: 50,
            origin_policy: OriginPolicy::Reject,
            allow_underdetermined: false,
            rcond: None,
            parallel: true,
        }
    }
}

impl FitConfig {
    pub fn with_l_max(mut self, l_max: usize) -> Self {
        self.l_max = l_max;
        self
    }

    pub fn with_origin_policy(mut self, origin_policy: OriginPolicy) -> Self {
        self.origin_policy = origin_policy;
        self
    }

    pub fn with_allow_underdetermined(mut self, allow: bool) -> Self {
        self.allow_underdetermined = allow;
        self
    }

    pub fn with_rcond(mut self, rcond: Option<f64>) -> Self {
        self.rcond = rcond;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of coefficients the configured expansion has
    pub fn num_coefficients(&self) -> usize {
        num_coefficients(self.l_max)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(rcond) = self.rcond {
            if !rcond.is_finite() || rcond < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "rcond must be finite and non-negative, got {}",
                    rcond
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for sampling a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    /// Rows and columns of the regular angular grid
    pub grid_res: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self { grid_res: 250 }
    }
}

impl ReconstructionConfig {
    pub fn with_grid_res(mut self, grid_res: usize) -> Self {
        self.grid_res = grid_res;
        self
    }
}

/// Both halves of a fit-and-reconstruct run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub fit: FitConfig,
    pub reconstruction: ReconstructionConfig,
}

/// A fitted truncated expansion `r(theta, phi) = sum_j c_j Y_j(theta, phi)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphericalHarmonicModel {
    l_max: usize,
    parallel: bool,
    fit: FitResult,
    /// Input indices dropped because they sat at the origin
    excluded: Vec<usize>,
}

impl SphericalHarmonicModel {
    /// Fit an expansion to the radii of `points` as seen from the origin
    ///
    /// The cloud is used as given; see [`fit_normalized`] for centering and
    /// scaling first.
    pub fn fit(points: &PointCloud<Point3d>, config: &FitConfig) -> Result<Self> {
        config.validate()?;
        points.validate()?;

        let conversion = cartesian_to_spherical_with(points, config.origin_policy)?;
        let samples = conversion.samples;
        let n = samples.len();
        let k = config.num_coefficients();

        if n == 0 {
            return Err(Error::InvalidInput(
                "No samples left after excluding origin points".to_string(),
            ));
        }
        if n < k && !config.allow_underdetermined {
            return Err(Error::InsufficientSamples {
                samples: n,
                coefficients: k,
            });
        }

        let start = Instant::now();
        let design = HarmonicBasisBuilder::new(config.l_max)
            .with_parallel(config.parallel)
            .build(&samples.thetas(), &samples.phis())?;
        let target = DVector::from_vec(samples.radii());
        // The design matrix moves into the factorization and is gone once the
        // coefficients exist.
        let fit = LeastSquaresFitter::new()
            .with_rcond(config.rcond)
            .solve_owned(design.into_inner(), &target)?;

        log::info!(
            "Fitted {} coefficients (l_max = {}) to {} samples in {:.2?}, residual {:.3e}",
            k,
            config.l_max,
            n,
            start.elapsed(),
            fit.residual_norm
        );

        Ok(Self {
            l_max: config.l_max,
            parallel: config.parallel,
            fit,
            excluded: conversion.excluded,
        })
    }

    /// Wrap existing coefficients, checking their count against `l_max`
    pub fn from_coefficients(l_max: usize, coefficients: DVector<f64>) -> Result<Self> {
        let expected = num_coefficients(l_max);
        if coefficients.len() != expected {
            return Err(Error::CoefficientCount {
                expected,
                actual: coefficients.len(),
            });
        }
        Ok(Self {
            l_max,
            parallel: true,
            fit: FitResult {
                coefficients,
                rank: expected,
                singular_values: DVector::zeros(0),
                residual_norm: 0.0,
                underdetermined: false,
            },
            excluded: Vec::new(),
        })
    }

    pub fn l_max(&self) -> usize {
        self.l_max
    }

    pub fn coefficients(&self) -> &DVector<f64> {
        &self.fit.coefficients
    }

    /// Coefficient for one `(l, m)` pair, or `None` beyond the truncation
    pub fn coefficient(&self, pair: DegreeOrder) -> Option<f64> {
        (pair.l <= self.l_max && pair.m.unsigned_abs() <= pair.l)
            .then(|| self.fit.coefficients[pair.index()])
    }

    /// Solver diagnostics of the fit
    pub fn fit_result(&self) -> &FitResult {
        &self.fit
    }

    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }

    fn reconstructor(&self) -> SurfaceReconstructor {
        SurfaceReconstructor::new(self.l_max).with_parallel(self.parallel)
    }

    /// Radius of the expansion at arbitrary angles
    pub fn evaluate(&self, theta: &[f64], phi: &[f64]) -> Result<Vec<f64>> {
        self.reconstructor()
            .evaluate_radius(theta, phi, &self.fit.coefficients)
    }

    /// Sample the surface on `grid`
    pub fn reconstruct(&self, grid: &AngularGrid) -> Result<SurfaceGrid> {
        self.reconstructor().reconstruct(grid, &self.fit.coefficients)
    }

    /// Sample the surface on a regular grid
    pub fn reconstruct_regular(&self, config: &ReconstructionConfig) -> Result<SurfaceGrid> {
        self.reconstruct(&AngularGrid::regular(config.grid_res)?)
    }
}

/// Everything produced by [`fit_normalized`]
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The input after centering and scaling into the unit ball
    pub normalized: PointCloud<Point3d>,
    pub normalization: Normalization,
    pub model: SphericalHarmonicModel,
    /// Reconstructed surface in normalized coordinates
    pub surface: SurfaceGrid,
}

/// Normalize a raw cloud, fit it and reconstruct it on a regular grid
pub fn fit_normalized(
    points: &PointCloud<Point3d>,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    let (normalized, normalization) = normalize_point_cloud(points)?;
    let model = SphericalHarmonicModel::fit(&normalized, &config.fit)?;
    let surface = model.reconstruct_regular(&config.reconstruction)?;
    Ok(PipelineOutput {
        normalized,
        normalization,
        model,
        surface,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_defaults() {
        let config = FitConfig::default();
        assert_eq!(config.l_max, 50);
        assert_eq!(config.num_coefficients(), 2601);
        assert_eq!(config.origin_policy, OriginPolicy::Reject);
        assert!(!config.allow_underdetermined);
        assert_eq!(ReconstructionConfig::default().grid_res, 250);
    }

    #[test]
    fn test_invalid_rcond_rejected() {
        let config = FitConfig::default().with_rcond(Some(f64::NAN));
        assert!(config.validate().unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_insufficient_samples() {
        let cloud = PointCloud::from_xyz(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let config = FitConfig::default().with_l_max(1);
        let err = SphericalHarmonicModel::fit(&cloud, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientSamples { samples: 3, coefficients: 4 }
        ));

        let model =
            SphericalHarmonicModel::fit(&cloud, &config.with_allow_underdetermined(true)).unwrap();
        assert!(model.fit_result().underdetermined);
        // every sample has radius 1, and an underdetermined fit interpolates
        let radii = model
            .evaluate(&[std::f64::consts::FRAC_PI_2, 0.0], &[0.0, 0.0])
            .unwrap();
        assert_relative_eq!(radii[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(radii[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_from_coefficients_checks_length() {
        assert!(SphericalHarmonicModel::from_coefficients(1, DVector::zeros(3)).is_err());
        let model = SphericalHarmonicModel::from_coefficients(1, DVector::zeros(4)).unwrap();
        assert_eq!(model.coefficient(DegreeOrder { l: 1, m: -1 }), Some(0.0));
        assert_eq!(model.coefficient(DegreeOrder { l: 2, m: 0 }), None);
    }

    #[test]
    fn test_origin_policy_applied() {
        let cloud = PointCloud::from_xyz(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let config = FitConfig::default().with_l_max(0);
        assert!(SphericalHarmonicModel::fit(&cloud, &config)
            .unwrap_err()
            .is_input_error());

        let model =
            SphericalHarmonicModel::fit(&cloud, &config.with_origin_policy(OriginPolicy::Exclude))
                .unwrap();
        assert_eq!(model.excluded(), &[0]);
        // l_max = 0 fits the mean radius
        let r = model.evaluate(&[1.0], &[1.0]).unwrap();
        assert_relative_eq!(r[0], 1.5, epsilon = 1e-12);
    }
}
