//! I/O for sphcrate
//!
//! Point clouds come in from PLY files or, when no file can be read, from a
//! procedurally generated fallback shape. Fitted surfaces leave through the
//! [`SurfaceSink`] trait.

pub mod ply;
pub mod fallback;
pub mod source;
pub mod sink;

pub use fallback::*;
pub use source::*;
pub use sink::*;

use sphcrate_core::{Error, PointCloud, Point3d, Result, TriangleMesh};
use std::path::Path;

/// Trait for reading point clouds from files
pub trait PointCloudReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud<Point3d>>;
}

/// Trait for writing point clouds to files
pub trait PointCloudWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud<Point3d>, path: P) -> Result<()>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

/// Auto-detect format and read point cloud
pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud<Point3d>> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("ply") => ply::PlyReader::read_point_cloud(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported point cloud format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("ply") => ply::PlyWriter::write_mesh(mesh, path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_rejected() {
        let err = read_point_cloud("cloud.xyz").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));

        let err = write_mesh(&TriangleMesh::new(), "mesh.stl").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
