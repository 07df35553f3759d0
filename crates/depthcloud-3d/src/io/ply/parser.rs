use std::io::{BufRead, Read};
use std::path::Path;

use super::{
    properties::{PlyDataType, PlyEncoding, PlyPropertyDefinition, PlyVertex},
    PlyError,
};
use crate::pointcloud::PointCloud;

// the vertex count comes from the file, so preallocation is bounded
const MAX_PREALLOCATED_VERTICES: usize = 1 << 16;

struct PlyHeader {
    pub vertex_count: usize,
    pub properties: Vec<PlyPropertyDefinition>,
    pub encoding: PlyEncoding,
}

impl PlyHeader {
    fn has(&self, names: &[&str]) -> bool {
        names
            .iter()
            .all(|name| self.properties.iter().any(|p| p.name == *name))
    }

    fn record_size(&self) -> usize {
        self.properties.iter().map(|p| p.data_type.size()).sum()
    }
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();

    reader.read_line(&mut line)?;
    if line.trim() != "ply" {
        return Err(PlyError::MissingMagic);
    }

    let mut encoding = None;
    let mut vertex_count = None;
    let mut properties = Vec::new();
    // name of the element the following properties belong to
    let mut current_element = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::MalformedHeader(
                "missing end_header".to_string(),
            ));
        }

        let parts = line.split_whitespace().collect::<Vec<_>>();
        match parts.as_slice() {
            ["end_header"] => break,
            ["comment", ..] | ["obj_info", ..] | [] => {}
            ["format", keyword, _version] => encoding = Some(PlyEncoding::from_keyword(keyword)?),
            ["element", name, count] => {
                let count = count
                    .parse::<usize>()
                    .map_err(|_| PlyError::MalformedHeader(line.trim().to_string()))?;
                if *name == "vertex" {
                    vertex_count = Some(count);
                } else if vertex_count.is_none() && count > 0 {
                    // elements are stored in header order, so data before the vertices cannot be skipped
                    return Err(PlyError::UnsupportedFormat(format!(
                        "element `{name}` precedes the vertex element"
                    )));
                }
                current_element = name.to_string();
            }
            ["property", "list", ..] if current_element == "vertex" => {
                return Err(PlyError::UnsupportedProperty(line.trim().to_string()));
            }
            ["property", data_type, name] if current_element == "vertex" => {
                properties.push(PlyPropertyDefinition {
                    name: name.to_string(),
                    data_type: PlyDataType::parse(data_type)?,
                });
            }
            ["property", ..] => {}
            _ => return Err(PlyError::MalformedHeader(line.trim().to_string())),
        }
    }

    let encoding = encoding.ok_or_else(|| PlyError::MalformedHeader("missing format".into()))?;
    let vertex_count = vertex_count.ok_or(PlyError::MissingProperty("element vertex"))?;

    Ok(PlyHeader {
        vertex_count,
        properties,
        encoding,
    })
}

/// Read the vertex element of a PLY file into a point cloud.
///
/// Both `ascii` and `binary_little_endian` payloads are supported and any
/// scalar property type is accepted. Positions are read from `x, y, z`;
/// colors from `red, green, blue` and normals from `nx, ny, nz` are only
/// returned when all three properties are present.
///
/// # Errors
///
/// Returns an error if the header is malformed, the encoding is not
/// supported, the position properties are missing or the payload is
/// truncated.
pub fn read_ply(path: impl AsRef<Path>) -> Result<PointCloud, PlyError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    read_ply_from_reader(&mut reader)
}

/// Read a PLY stream into a point cloud. See [`read_ply`].
pub fn read_ply_from_reader<R: BufRead>(reader: &mut R) -> Result<PointCloud, PlyError> {
    let header = parse_header(reader)?;

    if !header.has(&["x", "y", "z"]) {
        return Err(PlyError::MissingProperty("x, y, z"));
    }

    let with_colors = header.has(&["red", "green", "blue"]);
    let with_normals = header.has(&["nx", "ny", "nz"]);

    log::debug!(
        "reading {} vertices ({:?}, colors: {}, normals: {})",
        header.vertex_count,
        header.encoding,
        with_colors,
        with_normals
    );

    let capacity = header.vertex_count.min(MAX_PREALLOCATED_VERTICES);
    let mut points = Vec::with_capacity(capacity);
    let mut colors = Vec::with_capacity(if with_colors { capacity } else { 0 });
    let mut normals = Vec::with_capacity(if with_normals { capacity } else { 0 });

    let mut buffer = vec![0u8; header.record_size()];
    let mut line = String::new();

    for _ in 0..header.vertex_count {
        let vertex = match header.encoding {
            PlyEncoding::BinaryLittleEndian => {
                reader.read_exact(&mut buffer)?;
                PlyVertex::from_le_bytes(&buffer, &header.properties)?
            }
            PlyEncoding::Ascii => {
                line.clear();
                if reader.read_line(&mut line)? == 0 {
                    return Err(PlyError::InvalidValue(
                        "unexpected end of vertex data".to_string(),
                    ));
                }
                PlyVertex::from_ascii(&line, &header.properties)?
            }
        };

        points.push(vertex.to_point());
        if with_colors {
            colors.push(vertex.to_color());
        }
        if with_normals {
            normals.push(vertex.to_normal());
        }
    }

    Ok(PointCloud::new(
        points,
        with_colors.then_some(colors),
        with_normals.then_some(normals),
    ))
}
