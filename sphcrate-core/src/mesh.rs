//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3d>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3d>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Calculate face normals
    ///
    /// Degenerate faces (the collapsed rows at the poles of a spherical grid)
    /// get a zero normal.
    pub fn calculate_face_normals(&self) -> Vec<Vector3d> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                let edge1 = v1 - v0;
                let edge2 = v2 - v0;

                edge1
                    .cross(&edge2)
                    .try_normalize(1e-15)
                    .unwrap_or_else(Vector3d::zeros)
            })
            .collect()
    }

    /// Accumulate face normals onto vertices and store the result
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3d::zeros(); self.vertices.len()];
        for (face, normal) in self.faces.iter().zip(self.calculate_face_normals()) {
            for &index in face {
                normals[index] += normal;
            }
        }
        for normal in &mut normals {
            *normal = normal.try_normalize(1e-15).unwrap_or_else(Vector3d::zeros);
        }
        self.normals = Some(normals);
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_face_normals() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
                Point3d::new(0.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 3, 1]],
        );
        let normals = mesh.calculate_face_normals();
        assert_relative_eq!(normals[0], Vector3d::new(0.0, 0.0, 1.0));
        assert_eq!(normals[1], Vector3d::zeros());
    }

    #[test]
    fn test_vertex_normals() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        mesh.compute_vertex_normals();
        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 3);
        for n in normals {
            assert_relative_eq!(*n, Vector3d::new(0.0, 0.0, 1.0));
        }
    }
}
