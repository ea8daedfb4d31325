//! PLY format support

use crate::{MeshWriter, PointCloudReader, PointCloudWriter};
use ply_rs::{
    parser::Parser,
    ply::{Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType},
    writer::Writer,
};
use sphcrate_core::{Error, Point3d, PointCloud, Result, TriangleMesh};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub struct PlyReader;
pub struct PlyWriter;

impl PlyReader {
    /// Read the vertex positions of a PLY stream
    ///
    /// Faces and any extra vertex properties (normals, confidence, colors)
    /// are ignored.
    pub fn read_points<R: Read>(reader: &mut R) -> Result<PointCloud<Point3d>> {
        let parser = Parser::<DefaultElement>::new();
        let ply = parser.read_ply(reader)?;

        let vertices = ply
            .payload
            .get("vertex")
            .ok_or_else(|| Error::Parse("PLY file has no vertex element".to_string()))?;

        let mut points = PointCloud::with_capacity(vertices.len());
        for vertex in vertices {
            let x = extract_property_value(vertex, "x")?;
            let y = extract_property_value(vertex, "y")?;
            let z = extract_property_value(vertex, "z")?;
            points.push(Point3d::new(x, y, z));
        }
        log::debug!("Read {} vertices from PLY data", points.len());
        Ok(points)
    }
}

impl PointCloudReader for PlyReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud<Point3d>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_points(&mut reader)
    }
}

fn vertex_element_def(count: usize, with_normals: bool) -> ElementDef {
    let mut vertex_element = ElementDef::new("vertex".to_string());
    vertex_element.count = count;
    let mut names = vec!["x", "y", "z"];
    if with_normals {
        names.extend(["nx", "ny", "nz"]);
    }
    for name in names {
        vertex_element.properties.add(PropertyDef::new(
            name.to_string(),
            PropertyType::Scalar(ScalarType::Double),
        ));
    }
    vertex_element
}

fn vertex_payload(point: &Point3d) -> DefaultElement {
    let mut vertex = DefaultElement::new();
    vertex.insert("x".to_string(), Property::Double(point.x));
    vertex.insert("y".to_string(), Property::Double(point.y));
    vertex.insert("z".to_string(), Property::Double(point.z));
    vertex
}

impl PlyWriter {
    /// Write a point cloud as ASCII PLY to any writer
    pub fn write_points<W: Write>(cloud: &PointCloud<Point3d>, writer: &mut W) -> Result<()> {
        let mut ply = Ply::<DefaultElement>::new();
        ply.header.elements.add(vertex_element_def(cloud.len(), false));
        ply.payload.insert(
            "vertex".to_string(),
            cloud.iter().map(vertex_payload).collect(),
        );

        Writer::new().write_ply(writer, &mut ply)?;
        Ok(())
    }

    /// Write a triangle mesh as ASCII PLY to any writer
    pub fn write_mesh_to<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
        let normals = mesh
            .normals
            .as_ref()
            .filter(|n| n.len() == mesh.vertices.len());

        let mut ply = Ply::<DefaultElement>::new();
        ply.header
            .elements
            .add(vertex_element_def(mesh.vertices.len(), normals.is_some()));

        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = mesh.faces.len();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::UInt),
        ));
        ply.header.elements.add(face_element);

        let mut vertices = Vec::with_capacity(mesh.vertices.len());
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            let mut element = vertex_payload(vertex);
            if let Some(normals) = normals {
                element.insert("nx".to_string(), Property::Double(normals[i].x));
                element.insert("ny".to_string(), Property::Double(normals[i].y));
                element.insert("nz".to_string(), Property::Double(normals[i].z));
            }
            vertices.push(element);
        }
        ply.payload.insert("vertex".to_string(), vertices);

        let mut faces = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            let indices = face
                .iter()
                .map(|&i| {
                    u32::try_from(i).map_err(|_| {
                        Error::InvalidInput(format!("vertex index {} does not fit in PLY", i))
                    })
                })
                .collect::<Result<Vec<u32>>>()?;
            let mut element = DefaultElement::new();
            element.insert("vertex_indices".to_string(), Property::ListUInt(indices));
            faces.push(element);
        }
        ply.payload.insert("face".to_string(), faces);

        Writer::new().write_ply(writer, &mut ply)?;
        Ok(())
    }
}

impl PointCloudWriter for PlyWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud<Point3d>, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_points(cloud, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl MeshWriter for PlyWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_mesh_to(mesh, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Extract a property value as f64 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f64> {
    match element.get(name) {
        Some(Property::Double(val)) => Ok(*val),
        Some(Property::Float(val)) => Ok(*val as f64),
        Some(Property::Int(val)) => Ok(*val as f64),
        Some(Property::UInt(val)) => Ok(*val as f64),
        Some(Property::Short(val)) => Ok(*val as f64),
        Some(Property::UShort(val)) => Ok(*val as f64),
        Some(Property::Char(val)) => Ok(*val as f64),
        Some(Property::UChar(val)) => Ok(*val as f64),
        _ => Err(Error::Parse(format!(
            "Property '{}' not found or invalid type",
            name
        ))),
    }
}
