use std::io::{BufWriter, Write};
use std::path::Path;

use super::{
    properties::{PlyDataType, PlyEncoding, PlyPropertyValue},
    PlyError,
};
use crate::pointcloud::PointCloud;

/// Write a point cloud to a PLY file.
///
/// Positions (and normals, when present) are stored as `double`; colors, when
/// present, as `uchar`.
///
/// # Arguments
///
/// * `path` - The destination file; it is created or truncated.
/// * `pointcloud` - The point cloud to store.
/// * `encoding` - The payload encoding.
///
/// # Example
///
/// ```no_run
/// use depthcloud_3d::io::ply::{write_ply, PlyEncoding};
/// use depthcloud_3d::pointcloud::PointCloud;
///
/// let pointcloud = PointCloud::new(vec![[0.0, 1.0, 2.0]], None, None);
/// write_ply("data.ply", &pointcloud, PlyEncoding::default()).unwrap();
/// ```
pub fn write_ply(
    path: impl AsRef<Path>,
    pointcloud: &PointCloud,
    encoding: PlyEncoding,
) -> Result<(), PlyError> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ply_to_writer(&mut writer, pointcloud, encoding)?;
    writer.flush()?;
    Ok(())
}

/// Write a point cloud as PLY to any writer. See [`write_ply`].
pub fn write_ply_to_writer<W: Write>(
    writer: &mut W,
    pointcloud: &PointCloud,
    encoding: PlyEncoding,
) -> Result<(), PlyError> {
    let colors = pointcloud.colors();
    let normals = pointcloud.normals();

    if colors.is_some_and(|c| c.len() != pointcloud.len())
        || normals.is_some_and(|n| n.len() != pointcloud.len())
    {
        return Err(PlyError::InvalidValue(
            "colors and normals must have one entry per point".to_string(),
        ));
    }

    let mut schema = vec![
        ("x", PlyDataType::Float64),
        ("y", PlyDataType::Float64),
        ("z", PlyDataType::Float64),
    ];
    if colors.is_some() {
        schema.extend([
            ("red", PlyDataType::UInt8),
            ("green", PlyDataType::UInt8),
            ("blue", PlyDataType::UInt8),
        ]);
    }
    if normals.is_some() {
        schema.extend([
            ("nx", PlyDataType::Float64),
            ("ny", PlyDataType::Float64),
            ("nz", PlyDataType::Float64),
        ]);
    }

    writeln!(writer, "ply")?;
    writeln!(writer, "format {} 1.0", encoding.keyword())?;
    writeln!(writer, "comment generated by depthcloud")?;
    writeln!(writer, "element vertex {}", pointcloud.len())?;
    for (name, data_type) in &schema {
        writeln!(writer, "property {} {}", data_type.keyword(), name)?;
    }
    writeln!(writer, "end_header")?;

    let mut record = Vec::with_capacity(schema.len());

    for (i, point) in pointcloud.points().iter().enumerate() {
        record.clear();
        record.extend(point.iter().map(|&v| PlyPropertyValue::Float64(v)));
        if let Some(colors) = colors {
            record.extend(colors[i].iter().map(|&v| PlyPropertyValue::UInt8(v)));
        }
        if let Some(normals) = normals {
            record.extend(normals[i].iter().map(|&v| PlyPropertyValue::Float64(v)));
        }

        match encoding {
            PlyEncoding::BinaryLittleEndian => {
                for value in &record {
                    value.write_le(writer)?;
                }
            }
            PlyEncoding::Ascii => {
                for (j, value) in record.iter().enumerate() {
                    if j > 0 {
                        write!(writer, " ")?;
                    }
                    value.write_ascii(writer)?;
                }
                writeln!(writer)?;
            }
        }
    }

    log::debug!(
        "wrote {} vertices as {}",
        pointcloud.len(),
        encoding.keyword()
    );

    Ok(())
}
