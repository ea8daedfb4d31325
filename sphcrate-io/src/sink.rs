//! Consumers of fitted surfaces
//!
//! A sink receives the (normalized) input points and the reconstructed
//! surface grids and does whatever presentation it likes with them. Nothing
//! else flows back into the fitting pipeline.

use crate::ply::PlyWriter;
use crate::{MeshWriter, PointCloudWriter};
use ndarray::Array2;
use sphcrate_core::{Point3d, PointCloud, Result, SurfaceGrid};
use std::path::{Path, PathBuf};

/// Receiver for an input cloud and its reconstructed surface
pub trait SurfaceSink {
    fn consume(&mut self, points: &PointCloud<Point3d>, surface: &SurfaceGrid) -> Result<()>;
}

impl<F> SurfaceSink for F
where
    F: FnMut(&PointCloud<Point3d>, &SurfaceGrid) -> Result<()>,
{
    fn consume(&mut self, points: &PointCloud<Point3d>, surface: &SurfaceGrid) -> Result<()> {
        self(points, surface)
    }
}

/// Writes the input cloud and the triangulated surface as PLY files
#[derive(Debug, Clone)]
pub struct PlySink {
    out_dir: PathBuf,
}

impl PlySink {
    pub const POINTS_FILE: &'static str = "input_points.ply";
    pub const SURFACE_FILE: &'static str = "reconstruction.ply";

    pub fn new<P: Into<PathBuf>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn points_path(&self) -> PathBuf {
        self.out_dir.join(Self::POINTS_FILE)
    }

    pub fn surface_path(&self) -> PathBuf {
        self.out_dir.join(Self::SURFACE_FILE)
    }
}

impl SurfaceSink for PlySink {
    fn consume(&mut self, points: &PointCloud<Point3d>, surface: &SurfaceGrid) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;

        PlyWriter::write_point_cloud(points, self.points_path())?;

        let mut mesh = surface.to_mesh();
        mesh.compute_vertex_normals();
        PlyWriter::write_mesh(&mesh, self.surface_path())?;

        log::info!(
            "Wrote {} input points and a {}-vertex surface to {}",
            points.len(),
            mesh.vertex_count(),
            self.out_dir.display()
        );
        Ok(())
    }
}

/// Keeps the received arrays in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Input cloud as x, y and z columns
    pub points: Option<(Vec<f64>, Vec<f64>, Vec<f64>)>,
    /// Surface as x, y and z grids
    pub surface: Option<(Array2<f64>, Array2<f64>, Array2<f64>)>,
}

impl SurfaceSink for MemorySink {
    fn consume(&mut self, points: &PointCloud<Point3d>, surface: &SurfaceGrid) -> Result<()> {
        self.points = Some(points.to_columns());
        self.surface = Some((surface.x.clone(), surface.y.clone(), surface.z.clone()));
        Ok(())
    }
}
