//! Point cloud container

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An ordered collection of samples
///
/// The container is generic so the same type carries both the cartesian
/// input cloud and its spherical counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A cloud of cartesian points
pub type PointCloud3d = PointCloud<Point3d>;

/// A cloud of spherical samples
pub type SphericalCloud = PointCloud<SphericalPoint>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }
}

impl PointCloud<Point3d> {
    /// Build a cloud from flat `[x, y, z]` triples
    pub fn from_xyz(coords: &[[f64; 3]]) -> Self {
        coords
            .iter()
            .map(|&[x, y, z]| Point3d::new(x, y, z))
            .collect()
    }

    /// Fail with `InvalidInput` if the cloud is empty or holds a non-finite coordinate
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidInput("Point cloud is empty".to_string()));
        }
        if let Some(index) = self.points.iter().position(|p| !is_finite_point(p)) {
            return Err(Error::InvalidInput(format!(
                "Point {} has a non-finite coordinate",
                index
            )));
        }
        Ok(())
    }

    /// Split the cloud into separate x, y and z columns
    pub fn to_columns(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(self.len());
        let mut ys = Vec::with_capacity(self.len());
        let mut zs = Vec::with_capacity(self.len());
        for p in &self.points {
            xs.push(p.x);
            ys.push(p.y);
            zs.push(p.z);
        }
        (xs, ys, zs)
    }
}

impl PointCloud<SphericalPoint> {
    /// Radii of all samples, in order
    pub fn radii(&self) -> Vec<f64> {
        self.points.iter().map(|s| s.r).collect()
    }

    /// Zenith angles of all samples, in order
    pub fn thetas(&self) -> Vec<f64> {
        self.points.iter().map(|s| s.theta).collect()
    }

    /// Azimuth angles of all samples, in order
    pub fn phis(&self) -> Vec<f64> {
        self.points.iter().map(|s| s.phi).collect()
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> Extend<T> for PointCloud<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}
