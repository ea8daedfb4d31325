//! File-level tests for sphcrate-io

use approx::assert_relative_eq;
use sphcrate_core::{AngularGrid, Array2, Point3d, PointCloud, SurfaceGrid};
use sphcrate_io::ply::PlyReader;
use sphcrate_io::*;
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sphcrate-io-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// Unit sphere sampled on a regular grid
fn unit_sphere(res: usize) -> SurfaceGrid {
    let grid = AngularGrid::regular(res).unwrap();
    let (theta, phi) = (grid.theta(), grid.phi());
    SurfaceGrid {
        x: Array2::from_shape_fn(grid.dim(), |ij| theta[ij].sin() * phi[ij].cos()),
        y: Array2::from_shape_fn(grid.dim(), |ij| theta[ij].sin() * phi[ij].sin()),
        z: Array2::from_shape_fn(grid.dim(), |ij| theta[ij].cos()),
        radius: Array2::ones(grid.dim()),
    }
}

#[test]
fn test_ply_sink_writes_both_files() {
    let dir = scratch_dir("ply-sink");
    let cloud = PointCloud::from_xyz(&[[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]]);
    let surface = unit_sphere(6);

    let mut sink = PlySink::new(&dir);
    sink.consume(&cloud, &surface).unwrap();

    let points = read_point_cloud(sink.points_path()).unwrap();
    assert_eq!(points.len(), 3);
    assert_relative_eq!(points[1], Point3d::new(0.0, -1.0, 0.0));

    let vertices = PlyReader::read_point_cloud(sink.surface_path()).unwrap();
    assert_eq!(vertices.len(), 36);
    for v in vertices.iter() {
        assert_relative_eq!(v.coords.norm(), 1.0, epsilon = 1e-9);
    }

    let text = fs::read_to_string(sink.surface_path()).unwrap();
    assert!(text.contains("element face 50"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_file_source_reads_written_cloud() {
    let dir = scratch_dir("file-source");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cloud.ply");
    let cloud = fallback_bunny();
    ply::PlyWriter::write_point_cloud(&cloud, &path).unwrap();

    let loaded = load_point_cloud_or_fallback(Some(path.clone())).unwrap();
    assert_eq!(loaded.cloud.len(), cloud.len());
    assert!(loaded.source.contains("cloud.ply"));

    let _ = fs::remove_dir_all(&dir);
}
