//! Cartesian and spherical coordinate conversion
//!
//! Angles follow the physics convention: `theta` is the zenith angle measured
//! from +z and `phi` the azimuth measured from +x towards +y, as returned by
//! `atan2(y, x)`.

use serde::{Deserialize, Serialize};
use sphcrate_core::{is_finite_point, Error, Point3d, PointCloud, Result, SphericalPoint};

/// What to do with input points that coincide with the origin
///
/// Such points have no defined direction, so they cannot be placed on the
/// sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginPolicy {
    /// Fail the conversion with `InvalidInput`
    Reject,
    /// Drop the point and record its index
    Exclude,
}

impl Default for OriginPolicy {
    fn default() -> Self {
        OriginPolicy::Reject
    }
}

/// Spherical samples together with the indices of input points that were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalConversion {
    pub samples: PointCloud<SphericalPoint>,
    pub excluded: Vec<usize>,
}

/// Convert a single cartesian point to spherical coordinates
///
/// Fails with `InvalidInput` when the point is the origin or has a
/// non-finite coordinate.
pub fn to_spherical(point: &Point3d) -> Result<SphericalPoint> {
    if !is_finite_point(point) {
        return Err(Error::InvalidInput(format!(
            "Point {:?} has a non-finite coordinate",
            point
        )));
    }
    let scale = point.coords.amax();
    if scale == 0.0 {
        return Err(Error::InvalidInput(
            "Point coincides with the origin; its direction is undefined".to_string(),
        ));
    }
    // Squaring raw coordinates under- or overflows at extreme magnitudes.
    let unit = point.coords / scale;
    let unit_norm = unit.norm();
    let r = scale * unit_norm;
    // Rounding can push |z / r| marginally past 1.
    let theta = (unit.z / unit_norm).clamp(-1.0, 1.0).acos();
    let phi = unit.y.atan2(unit.x);
    Ok(SphericalPoint { r, theta, phi })
}

/// Convert spherical coordinates to a cartesian point
///
/// Negative radii are accepted and land on the antipodal direction.
pub fn to_cartesian(r: f64, theta: f64, phi: f64) -> Point3d {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Point3d::new(
        r * sin_theta * cos_phi,
        r * sin_theta * sin_phi,
        r * cos_theta,
    )
}

/// Convert a whole cloud, failing on the first point at the origin
pub fn cartesian_to_spherical(cloud: &PointCloud<Point3d>) -> Result<PointCloud<SphericalPoint>> {
    cloud
        .iter()
        .enumerate()
        .map(|(i, p)| {
            to_spherical(p).map_err(|e| match e {
                Error::InvalidInput(msg) => Error::InvalidInput(format!("point {}: {}", i, msg)),
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(PointCloud::from_points)
}

/// Convert a whole cloud, handling origin points according to `policy`
///
/// Non-finite points are always rejected.
pub fn cartesian_to_spherical_with(
    cloud: &PointCloud<Point3d>,
    policy: OriginPolicy,
) -> Result<SphericalConversion> {
    match policy {
        OriginPolicy::Reject => Ok(SphericalConversion {
            samples: cartesian_to_spherical(cloud)?,
            excluded: Vec::new(),
        }),
        OriginPolicy::Exclude => {
            let mut samples = PointCloud::with_capacity(cloud.len());
            let mut excluded = Vec::new();
            for (i, p) in cloud.iter().enumerate() {
                if !is_finite_point(p) {
                    return Err(Error::InvalidInput(format!(
                        "point {} has a non-finite coordinate",
                        i
                    )));
                }
                if p.coords.amax() == 0.0 {
                    excluded.push(i);
                    continue;
                }
                samples.push(to_spherical(p)?);
            }
            if !excluded.is_empty() {
                log::warn!("Excluded {} point(s) located at the origin", excluded.len());
            }
            Ok(SphericalConversion { samples, excluded })
        }
    }
}

/// Convert spherical samples back to cartesian points
pub fn spherical_to_cartesian(samples: &PointCloud<SphericalPoint>) -> PointCloud<Point3d> {
    samples
        .iter()
        .map(|s| to_cartesian(s.r, s.theta, s.phi))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_axis_directions() {
        let s = to_spherical(&Point3d::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(s.r, 2.0);
        assert_relative_eq!(s.theta, 0.0);

        let s = to_spherical(&Point3d::new(0.0, 0.0, -1.0)).unwrap();
        assert_relative_eq!(s.theta, PI);

        let s = to_spherical(&Point3d::new(0.0, 3.0, 0.0)).unwrap();
        assert_relative_eq!(s.theta, FRAC_PI_2);
        assert_relative_eq!(s.phi, FRAC_PI_2);

        let s = to_spherical(&Point3d::new(-1.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(s.phi, PI);
    }

    #[test]
    fn test_round_trip_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = Point3d::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let s = to_spherical(&p).unwrap();
            assert!(s.r > 0.0);
            assert!((0.0..=PI).contains(&s.theta));
            assert!((-PI..=PI).contains(&s.phi));

            let back = to_cartesian(s.r, s.theta, s.phi);
            let scale = p.coords.norm();
            assert_relative_eq!(back.x, p.x, epsilon = 1e-9 * scale);
            assert_relative_eq!(back.y, p.y, epsilon = 1e-9 * scale);
            assert_relative_eq!(back.z, p.z, epsilon = 1e-9 * scale);
        }
    }

    #[test]
    fn test_extreme_magnitudes() {
        let tiny = Point3d::new(1e-170, 2e-170, 0.0);
        let s = to_spherical(&tiny).unwrap();
        assert_relative_eq!(s.r, 5f64.sqrt() * 1e-170, max_relative = 1e-14);
        assert_relative_eq!(s.theta, FRAC_PI_2, epsilon = 1e-14);
        let back = to_cartesian(s.r, s.theta, s.phi);
        assert_relative_eq!(back.x, tiny.x, max_relative = 1e-12);
        assert_relative_eq!(back.y, tiny.y, max_relative = 1e-12);

        let huge = Point3d::new(1e200, 0.0, 1e200);
        let s = to_spherical(&huge).unwrap();
        assert!(s.r.is_finite());
        assert_relative_eq!(s.r, 2f64.sqrt() * 1e200, max_relative = 1e-14);
        assert_relative_eq!(s.theta, PI / 4.0, epsilon = 1e-14);
        let back = to_cartesian(s.r, s.theta, s.phi);
        assert!(is_finite_point(&back));
        assert_relative_eq!(back.x, huge.x, max_relative = 1e-12);
        assert_relative_eq!(back.z, huge.z, max_relative = 1e-12);

        let subnormal = PointCloud::from_xyz(&[[0.0, 0.0, 1e-310], [1.0, 0.0, 0.0]]);
        let conv = cartesian_to_spherical_with(&subnormal, OriginPolicy::Exclude).unwrap();
        assert!(conv.excluded.is_empty());
        assert_relative_eq!(conv.samples[0].r, 1e-310, max_relative = 1e-12);
        assert_eq!(conv.samples[0].theta, 0.0);
    }

    #[test]
    fn test_origin_rejected() {
        let err = to_spherical(&Point3d::origin()).unwrap_err();
        assert!(err.is_input_error());

        let cloud = PointCloud::from_xyz(&[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let err = cartesian_to_spherical(&cloud).unwrap_err();
        assert!(err.to_string().contains("point 1"));
    }

    #[test]
    fn test_origin_excluded() {
        let cloud = PointCloud::from_xyz(&[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let conv = cartesian_to_spherical_with(&cloud, OriginPolicy::Exclude).unwrap();
        assert_eq!(conv.samples.len(), 2);
        assert_eq!(conv.excluded, vec![1]);

        let nan = PointCloud::from_xyz(&[[f64::NAN, 0.0, 0.0]]);
        assert!(cartesian_to_spherical_with(&nan, OriginPolicy::Exclude).is_err());
    }

    #[test]
    fn test_negative_radius_is_antipodal() {
        let p = to_cartesian(-1.0, FRAC_PI_2, 0.0);
        assert_relative_eq!(p, Point3d::new(-1.0, 0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_cloud_round_trip() {
        let cloud = PointCloud::from_xyz(&[[1.0, 2.0, 3.0], [-4.0, 0.5, -1.0]]);
        let samples = cartesian_to_spherical(&cloud).unwrap();
        let back = spherical_to_cartesian(&samples);
        for (a, b) in cloud.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}
