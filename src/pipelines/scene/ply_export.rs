// SPDX-License-Identifier: GPL-3.0-only

//! PLY point cloud export
//!
//! Writes a single `vertex` element with the properties
//! `float x, float y, float z, uchar red, uchar green, uchar blue`
//! in that order. Positions are camera-space meters, colors RGB bytes.

use crate::errors::ExportError;
use crate::geometry::{PointCloud, Vertex};
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

const VERTEX_ELEMENT: &str = "vertex";

/// Vertex properties in file order, with their scalar types
const VERTEX_LAYOUT: [(&str, ScalarType); 6] = [
    ("x", ScalarType::Float),
    ("y", ScalarType::Float),
    ("z", ScalarType::Float),
    ("red", ScalarType::UChar),
    ("green", ScalarType::UChar),
    ("blue", ScalarType::UChar),
];

/// PLY body encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlyEncoding {
    /// Human-readable text body
    #[default]
    Ascii,
    /// Compact little-endian binary body
    BinaryLittleEndian,
}

impl From<PlyEncoding> for Encoding {
    fn from(encoding: PlyEncoding) -> Self {
        match encoding {
            PlyEncoding::Ascii => Encoding::Ascii,
            PlyEncoding::BinaryLittleEndian => Encoding::BinaryLittleEndian,
        }
    }
}

/// Export options
#[derive(Debug, Clone, Copy, Default)]
pub struct PlyExportOptions {
    pub encoding: PlyEncoding,
    /// Drop vertices whose pixel had no depth sample
    pub skip_invalid: bool,
}

/// Write a point cloud to any writer
///
/// Returns the number of vertices written.
pub fn write_ply<W: Write>(
    out: &mut W,
    cloud: &PointCloud,
    options: PlyExportOptions,
) -> Result<usize, ExportError> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = options.encoding.into();
    ply.header
        .comments
        .push(format!("Exported from rgbd-viewer {}", env!("GIT_VERSION")));

    let vertices: Vec<DefaultElement> = cloud
        .vertices()
        .iter()
        .filter(|v| !options.skip_invalid || v.has_depth())
        .map(vertex_to_element)
        .collect();
    let count = vertices.len();

    let mut vertex_element = ElementDef::new(VERTEX_ELEMENT.to_string());
    vertex_element.count = count;
    for (name, scalar) in VERTEX_LAYOUT {
        vertex_element.properties.add(PropertyDef::new(
            name.to_string(),
            PropertyType::Scalar(scalar),
        ));
    }
    ply.header.elements.add(vertex_element);
    ply.payload.insert(VERTEX_ELEMENT.to_string(), vertices);

    let written = Writer::new().write_ply(out, &mut ply)?;
    debug!(vertices = count, bytes = written, "PLY body written");

    Ok(count)
}

/// Write a point cloud to a file, creating parent directories
pub fn export_point_cloud_ply(
    cloud: &PointCloud,
    path: &Path,
    options: PlyExportOptions,
) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let count = write_ply(&mut writer, cloud, options)?;
    writer.flush()?;

    info!(
        point_count = count,
        encoding = ?options.encoding,
        path = %path.display(),
        "Exported point cloud"
    );
    Ok(count)
}

/// Parse a PLY vertex list written by [`write_ply`] (or any file with the
/// same vertex layout)
pub fn read_ply<R: Read>(source: &mut R) -> Result<PointCloud, ExportError> {
    let ply = Parser::<DefaultElement>::new().read_ply(source)?;

    let element = ply
        .header
        .elements
        .get(VERTEX_ELEMENT)
        .ok_or_else(|| ExportError::Format("missing vertex element".to_string()))?;

    let names: Vec<&str> = element.properties.keys().map(String::as_str).collect();
    let expected: Vec<&str> = VERTEX_LAYOUT.iter().map(|(name, _)| *name).collect();
    if names != expected {
        return Err(ExportError::Format(format!(
            "vertex properties {:?}, expected {:?}",
            names, expected
        )));
    }

    let vertices = ply
        .payload
        .get(VERTEX_ELEMENT)
        .map(|elements| {
            elements
                .iter()
                .map(element_to_vertex)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    if vertices.len() != element.count {
        return Err(ExportError::Format(format!(
            "header declares {} vertices, body holds {}",
            element.count,
            vertices.len()
        )));
    }

    Ok(PointCloud::from_vertices(vertices))
}

/// Read a PLY file from disk
pub fn read_ply_file(path: &Path) -> Result<PointCloud, ExportError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_ply(&mut reader)
}

fn vertex_to_element(vertex: &Vertex) -> DefaultElement {
    let [x, y, z] = vertex.position;
    let [r, g, b] = vertex.color;
    let mut element = DefaultElement::new();
    element.insert("x".to_string(), Property::Float(x));
    element.insert("y".to_string(), Property::Float(y));
    element.insert("z".to_string(), Property::Float(z));
    element.insert("red".to_string(), Property::UChar(r));
    element.insert("green".to_string(), Property::UChar(g));
    element.insert("blue".to_string(), Property::UChar(b));
    element
}

fn element_to_vertex(element: &DefaultElement) -> Result<Vertex, ExportError> {
    let float = |name: &str| match element.get(name) {
        Some(Property::Float(v)) => Ok(*v),
        other => Err(ExportError::Format(format!(
            "property {} is {:?}, expected float",
            name, other
        ))),
    };
    let uchar = |name: &str| match element.get(name) {
        Some(Property::UChar(v)) => Ok(*v),
        other => Err(ExportError::Format(format!(
            "property {} is {:?}, expected uchar",
            name, other
        ))),
    };

    Ok(Vertex {
        position: [float("x")?, float("y")?, float("z")?],
        color: [uchar("red")?, uchar("green")?, uchar("blue")?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cloud() -> PointCloud {
        PointCloud::from_vertices(vec![
            Vertex {
                position: [0.0, 0.0, 2.0],
                color: [255, 0, 0],
            },
            Vertex {
                position: [0.02, -0.015625, 2.0],
                color: [1, 128, 254],
            },
            Vertex {
                position: [0.0, 0.0, 0.0],
                color: [9, 9, 9],
            },
        ])
    }

    #[test]
    fn test_ascii_header_layout() {
        let mut buf = Vec::new();
        write_ply(&mut buf, &sample_cloud(), PlyExportOptions::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("ply\n"));
        assert!(text.contains("format ascii 1.0"));
        assert!(text.contains("element vertex 3"));
        let props: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("property"))
            .collect();
        assert_eq!(
            props,
            vec![
                "property float x",
                "property float y",
                "property float z",
                "property uchar red",
                "property uchar green",
                "property uchar blue",
            ]
        );
    }

    #[test]
    fn test_roundtrip_ascii_and_binary() {
        let cloud = sample_cloud();
        for encoding in [PlyEncoding::Ascii, PlyEncoding::BinaryLittleEndian] {
            let options = PlyExportOptions {
                encoding,
                skip_invalid: false,
            };
            let mut buf = Vec::new();
            assert_eq!(write_ply(&mut buf, &cloud, options).unwrap(), 3);

            let parsed = read_ply(&mut buf.as_slice()).unwrap();
            assert_eq!(parsed.vertices(), cloud.vertices(), "{:?}", encoding);
        }
    }

    #[test]
    fn test_skip_invalid() {
        let options = PlyExportOptions {
            skip_invalid: true,
            ..Default::default()
        };
        let mut buf = Vec::new();
        assert_eq!(write_ply(&mut buf, &sample_cloud(), options).unwrap(), 2);
        let parsed = read_ply(&mut buf.as_slice()).unwrap();
        assert!(parsed.vertices().iter().all(Vertex::has_depth));
    }

    #[test]
    fn test_empty_cloud() {
        let mut buf = Vec::new();
        write_ply(&mut buf, &PointCloud::default(), PlyExportOptions::default()).unwrap();
        let parsed = read_ply(&mut buf.as_slice()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_rejects_foreign_layout() {
        let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty double x\nproperty double y\nproperty double z\nend_header\n1 2 3\n";
        assert!(matches!(
            read_ply(&mut text.as_bytes()),
            Err(ExportError::Format(_))
        ));
    }

    #[test]
    fn test_file_export_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("pcd.ply");
        let count =
            export_point_cloud_ply(&sample_cloud(), &path, PlyExportOptions::default()).unwrap();
        assert_eq!(count, 3);
        assert_eq!(read_ply_file(&path).unwrap().len(), 3);
    }
}
