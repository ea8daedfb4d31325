//! Centering and scaling of point clouds before fitting
//!
//! A cloud is translated so its centroid sits at the origin and then scaled
//! so the farthest point lies on the unit sphere. The [`Normalization`]
//! record keeps what is needed to map fitted geometry back.

use crate::error::{Error, Result};
use crate::point::*;
use crate::point_cloud::PointCloud;
use crate::traits::Bounded;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Translation and uniform scale applied by [`normalize_point_cloud`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub centroid: Point3d,
    /// Largest distance from the centroid in the original cloud
    pub scale: f64,
}

impl Normalization {
    /// Identity normalization
    pub fn identity() -> Self {
        Self {
            centroid: Point3d::origin(),
            scale: 1.0,
        }
    }

    /// Map an original point into normalized space
    pub fn normalize_point(&self, point: &Point3d) -> Point3d {
        Point3d::from((point - self.centroid) / self.scale)
    }

    /// Map a normalized point back into the original frame
    pub fn denormalize_point(&self, point: &Point3d) -> Point3d {
        self.centroid + point.coords * self.scale
    }

    /// Homogeneous matrix taking original points to normalized ones
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        Matrix4::new_scaling(1.0 / self.scale) * Matrix4::new_translation(&(-self.centroid.coords))
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::identity()
    }
}

/// Center a cloud on its centroid and scale it into the unit ball
///
/// Fails with `InvalidInput` for an empty cloud, a cloud with non-finite
/// coordinates, or a cloud whose points all coincide.
pub fn normalize_point_cloud(
    cloud: &PointCloud<Point3d>,
) -> Result<(PointCloud<Point3d>, Normalization)> {
    cloud.validate()?;
    let centroid = cloud
        .centroid()
        .ok_or_else(|| Error::InvalidInput("Point cloud is empty".to_string()))?;

    let scale = cloud
        .iter()
        .map(|p| (p - centroid).norm())
        .fold(0.0_f64, f64::max);
    if !(scale > 0.0) || !scale.is_finite() {
        return Err(Error::InvalidInput(
            "All points coincide; cannot normalize a degenerate cloud".to_string(),
        ));
    }

    let normalization = Normalization { centroid, scale };
    let normalized = cloud.iter().map(|p| normalization.normalize_point(p)).collect();
    log::debug!(
        "Normalized {} points: centroid = {:?}, scale = {}",
        cloud.len(),
        centroid,
        scale
    );
    Ok((normalized, normalization))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalized_cloud_fits_unit_ball() {
        let cloud = PointCloud::from_xyz(&[
            [1.0, 1.0, 1.0],
            [3.0, 1.0, 1.0],
            [1.0, 5.0, 1.0],
            [1.0, 1.0, 7.0],
        ]);
        let (normalized, norm) = normalize_point_cloud(&cloud).unwrap();

        assert_relative_eq!(norm.centroid, Point3d::new(1.5, 2.0, 2.5));
        let max = normalized.iter().map(|p| p.coords.norm()).fold(0.0, f64::max);
        assert_relative_eq!(max, 1.0, epsilon = 1e-12);
        assert_relative_eq!(normalized.centroid().unwrap(), Point3d::origin(), epsilon = 1e-12);

        for (orig, n) in cloud.iter().zip(normalized.iter()) {
            assert_relative_eq!(norm.denormalize_point(n), *orig, epsilon = 1e-12);
            let via_matrix = norm.to_homogeneous().transform_point(orig);
            assert_relative_eq!(via_matrix, *n, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_clouds_rejected() {
        let coincident = PointCloud::from_xyz(&[[2.0, 2.0, 2.0], [2.0, 2.0, 2.0]]);
        assert!(normalize_point_cloud(&coincident).unwrap_err().is_input_error());
        assert!(normalize_point_cloud(&PointCloud::new()).is_err());
    }
}
