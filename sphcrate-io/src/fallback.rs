//! Procedural stand-in shape used when no scan can be loaded
//!
//! The shape is a squashed, rippled body with ear patches above it and a
//! mirrored copy of them below.

use ndarray::Array1;
use sphcrate_core::{Point3d, PointCloud};
use std::f64::consts::PI;

const BODY_U_STEPS: usize = 100;
const BODY_V_STEPS: usize = 50;
const EAR_U_STEPS: usize = 20;
const EAR_V_STEPS: usize = 10;

/// Number of points produced by [`fallback_bunny`]
pub const FALLBACK_POINT_COUNT: usize =
    BODY_U_STEPS * BODY_V_STEPS + 2 * EAR_U_STEPS * EAR_V_STEPS;

/// Generate the built-in fallback point cloud
///
/// Points are emitted body first, then the upper ears, then the mirrored
/// lower ears; each block is ordered row by row in `v`.
pub fn fallback_bunny() -> PointCloud<Point3d> {
    let mut cloud = PointCloud::with_capacity(FALLBACK_POINT_COUNT);

    let us = Array1::linspace(0.0, 2.0 * PI, BODY_U_STEPS);
    let vs = Array1::linspace(0.0, PI, BODY_V_STEPS);
    for &v in vs.iter() {
        for &u in us.iter() {
            let bulge = 1.0 + 0.3 * v.cos();
            cloud.push(Point3d::new(
                0.8 * u.cos() * bulge,
                0.6 * u.sin() * bulge,
                0.5 * (v.sin() - 0.5) + 0.2 * (3.0 * u).cos() * (5.0 * v).sin(),
            ));
        }
    }

    let ear_us = Array1::linspace(PI / 4.0, 3.0 * PI / 4.0, EAR_U_STEPS);
    let ear_vs = Array1::linspace(PI / 3.0, PI / 2.0, EAR_V_STEPS);
    for sign in [1.0, -1.0] {
        for &v in ear_vs.iter() {
            for &u in ear_us.iter() {
                cloud.push(Point3d::new(
                    0.3 * u.cos(),
                    0.3 * u.sin(),
                    sign * (0.4 + 0.3 * v),
                ));
            }
        }
    }

    cloud
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_count_and_layout() {
        let cloud = fallback_bunny();
        assert_eq!(cloud.len(), FALLBACK_POINT_COUNT);
        assert_eq!(cloud.len(), 5400);

        // u = 0, v = 0 on the body
        assert_relative_eq!(cloud[0], Point3d::new(1.04, 0.0, -0.25), epsilon = 1e-12);

        // upper and lower ears mirror each other in z
        let upper = &cloud.points[5000..5200];
        let lower = &cloud.points[5200..5400];
        for (a, b) in upper.iter().zip(lower.iter()) {
            assert_relative_eq!(a.x, b.x);
            assert_relative_eq!(a.y, b.y);
            assert_relative_eq!(a.z, -b.z);
            assert!(a.z > 0.0);
        }
    }

    #[test]
    fn test_all_points_finite() {
        assert!(fallback_bunny().validate().is_ok());
    }
}
