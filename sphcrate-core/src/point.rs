//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A point expressed in spherical coordinates
///
/// `theta` is the zenith angle in `[0, pi]` measured from +z, `phi` the
/// azimuth in `(-pi, pi]` measured from +x towards +y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalPoint {
    pub r: f64,
    pub theta: f64,
    pub phi: f64,
}

impl SphericalPoint {
    pub fn new(r: f64, theta: f64, phi: f64) -> Self {
        Self { r, theta, phi }
    }

    /// Check that all three components are finite
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.theta.is_finite() && self.phi.is_finite()
    }
}

impl Default for SphericalPoint {
    fn default() -> Self {
        Self {
            r: 0.0,
            theta: 0.0,
            phi: 0.0,
        }
    }
}

/// Check that all coordinates of a point are finite
pub fn is_finite_point(point: &Point3d) -> bool {
    point.x.is_finite() && point.y.is_finite() && point.z.is_finite()
}
