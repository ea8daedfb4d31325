//! Point cloud acquisition with fallback

use crate::fallback::fallback_bunny;
use crate::read_point_cloud;
use sphcrate_core::{Error, Point3d, PointCloud, Result};
use std::path::PathBuf;

/// Something that can produce a point cloud
pub trait PointCloudSource {
    /// Short human-readable description for logs
    fn describe(&self) -> String;

    fn load(&self) -> Result<PointCloud<Point3d>>;
}

/// A point cloud stored in a file, format chosen by extension
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl PointCloudSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load(&self) -> Result<PointCloud<Point3d>> {
        if !self.path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", self.path.display()),
            )));
        }
        read_point_cloud(&self.path)
    }
}

/// The built-in procedural shape; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSource;

impl PointCloudSource for FallbackSource {
    fn describe(&self) -> String {
        "built-in fallback shape".to_string()
    }

    fn load(&self) -> Result<PointCloud<Point3d>> {
        Ok(fallback_bunny())
    }
}

/// A cloud together with the description of the source that produced it
#[derive(Debug, Clone)]
pub struct LoadedCloud {
    pub cloud: PointCloud<Point3d>,
    pub source: String,
}

/// Try each source in order and return the first non-empty cloud
///
/// Failures are logged and the next source is tried. The error of the last
/// source is returned when all of them fail.
pub fn load_first(sources: &[&dyn PointCloudSource]) -> Result<LoadedCloud> {
    let mut last_error = Error::InvalidInput("No point cloud sources given".to_string());
    for source in sources {
        match source.load() {
            Ok(cloud) if !cloud.is_empty() => {
                log::info!("Loaded {} points from {}", cloud.len(), source.describe());
                return Ok(LoadedCloud {
                    cloud,
                    source: source.describe(),
                });
            }
            Ok(_) => {
                log::warn!("{} produced no points", source.describe());
                last_error =
                    Error::InvalidInput(format!("{} produced no points", source.describe()));
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}", source.describe(), e);
                last_error = e;
            }
        }
    }
    Err(last_error)
}

/// Load `path` if given, falling back to the built-in shape otherwise
pub fn load_point_cloud_or_fallback(path: Option<PathBuf>) -> Result<LoadedCloud> {
    match path {
        Some(path) => load_first(&[&FileSource::new(path), &FallbackSource]),
        None => load_first(&[&FallbackSource]),
    }
}
