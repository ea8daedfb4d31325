//! Core traits for sphcrate

use crate::{mesh::TriangleMesh, point::*, point_cloud::PointCloud};

/// Trait for geometry with spatial extent
pub trait Bounded {
    /// Get the axis-aligned bounding box, or `None` when there is no geometry
    fn bounding_box(&self) -> Option<(Point3d, Point3d)>;

    /// Arithmetic mean of the vertices, or `None` when there is no geometry
    fn centroid(&self) -> Option<Point3d>;

    /// Center of the bounding box
    fn center(&self) -> Option<Point3d> {
        self.bounding_box().map(|(min, max)| nalgebra::center(&min, &max))
    }
}

fn bounds_of<'a, I: IntoIterator<Item = &'a Point3d>>(points: I) -> Option<(Point3d, Point3d)> {
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    let (mut min, mut max) = (first, first);
    for p in iter {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);

        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }
    Some((min, max))
}

fn mean_of(points: &[Point3d]) -> Option<Point3d> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3d::zeros(), |acc, p| acc + p.coords);
    Some(Point3d::from(sum / points.len() as f64))
}

impl Bounded for PointCloud<Point3d> {
    fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        bounds_of(&self.points)
    }

    fn centroid(&self) -> Option<Point3d> {
        mean_of(&self.points)
    }
}

impl Bounded for TriangleMesh {
    fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        bounds_of(&self.vertices)
    }

    fn centroid(&self) -> Option<Point3d> {
        mean_of(&self.vertices)
    }
}
