use std::io::Write;

use super::PlyError;

/// Encoding of the PLY payload.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum PlyEncoding {
    /// Whitespace separated text, one vertex per line.
    Ascii,
    /// Packed little endian records.
    #[default]
    BinaryLittleEndian,
}

impl PlyEncoding {
    /// The keyword used in the `format` header line.
    pub fn keyword(&self) -> &'static str {
        match self {
            PlyEncoding::Ascii => "ascii",
            PlyEncoding::BinaryLittleEndian => "binary_little_endian",
        }
    }

    pub(crate) fn from_keyword(keyword: &str) -> Result<Self, PlyError> {
        match keyword {
            "ascii" => Ok(PlyEncoding::Ascii),
            "binary_little_endian" => Ok(PlyEncoding::BinaryLittleEndian),
            other => Err(PlyError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A named scalar property of the vertex element.
#[derive(Debug, PartialEq, Clone)]
pub struct PlyPropertyDefinition {
    /// The property name, e.g. `x` or `red`.
    pub name: String,
    /// The scalar type of the property.
    pub data_type: PlyDataType,
}

/// Scalar types allowed in a PLY property.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlyDataType {
    /// `float` / `float32`
    Float32,
    /// `double` / `float64`
    Float64,
    /// `char` / `int8`
    Int8,
    /// `uchar` / `uint8`
    UInt8,
    /// `short` / `int16`
    Int16,
    /// `ushort` / `uint16`
    UInt16,
    /// `int` / `int32`
    Int32,
    /// `uint` / `uint32`
    UInt32,
}

impl PlyDataType {
    /// Size in bytes of one value in a binary payload.
    pub fn size(&self) -> usize {
        match self {
            PlyDataType::Float32 | PlyDataType::Int32 | PlyDataType::UInt32 => 4,
            PlyDataType::Float64 => 8,
            PlyDataType::Int16 | PlyDataType::UInt16 => 2,
            PlyDataType::Int8 | PlyDataType::UInt8 => 1,
        }
    }

    /// The type name written in headers.
    pub fn keyword(&self) -> &'static str {
        match self {
            PlyDataType::Float32 => "float",
            PlyDataType::Float64 => "double",
            PlyDataType::Int8 => "char",
            PlyDataType::UInt8 => "uchar",
            PlyDataType::Int16 => "short",
            PlyDataType::UInt16 => "ushort",
            PlyDataType::Int32 => "int",
            PlyDataType::UInt32 => "uint",
        }
    }

    pub(crate) fn parse(type_str: &str) -> Result<Self, PlyError> {
        match type_str {
            "float" | "float32" => Ok(PlyDataType::Float32),
            "double" | "float64" => Ok(PlyDataType::Float64),
            "char" | "int8" => Ok(PlyDataType::Int8),
            "uchar" | "uint8" => Ok(PlyDataType::UInt8),
            "short" | "int16" => Ok(PlyDataType::Int16),
            "ushort" | "uint16" => Ok(PlyDataType::UInt16),
            "int" | "int32" => Ok(PlyDataType::Int32),
            "uint" | "uint32" => Ok(PlyDataType::UInt32),
            other => Err(PlyError::UnsupportedProperty(other.to_string())),
        }
    }
}

/// A single decoded property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlyPropertyValue {
    /// 32-bit float
    Float32(f32),
    /// 64-bit float
    Float64(f64),
    /// signed 8-bit integer
    Int8(i8),
    /// unsigned 8-bit integer
    UInt8(u8),
    /// signed 16-bit integer
    Int16(i16),
    /// unsigned 16-bit integer
    UInt16(u16),
    /// signed 32-bit integer
    Int32(i32),
    /// unsigned 32-bit integer
    UInt32(u32),
}

impl PlyPropertyValue {
    /// Decode a little endian value; `buf` must hold at least `data_type.size()` bytes.
    pub(crate) fn from_le_bytes(data_type: PlyDataType, buf: &[u8]) -> Result<Self, PlyError> {
        let bytes = buf
            .get(..data_type.size())
            .ok_or_else(|| PlyError::InvalidValue("truncated binary record".to_string()))?;

        // the slice length is checked above so the array conversions cannot fail
        let value = match data_type {
            PlyDataType::Float32 => PlyPropertyValue::Float32(f32::from_le_bytes(array(bytes))),
            PlyDataType::Float64 => PlyPropertyValue::Float64(f64::from_le_bytes(array(bytes))),
            PlyDataType::Int8 => PlyPropertyValue::Int8(bytes[0] as i8),
            PlyDataType::UInt8 => PlyPropertyValue::UInt8(bytes[0]),
            PlyDataType::Int16 => PlyPropertyValue::Int16(i16::from_le_bytes(array(bytes))),
            PlyDataType::UInt16 => PlyPropertyValue::UInt16(u16::from_le_bytes(array(bytes))),
            PlyDataType::Int32 => PlyPropertyValue::Int32(i32::from_le_bytes(array(bytes))),
            PlyDataType::UInt32 => PlyPropertyValue::UInt32(u32::from_le_bytes(array(bytes))),
        };

        Ok(value)
    }

    /// Parse a value from an ascii token.
    pub(crate) fn parse_ascii(data_type: PlyDataType, token: &str) -> Result<Self, PlyError> {
        let value = match data_type {
            PlyDataType::Float32 => PlyPropertyValue::Float32(parse_token(token, data_type)?),
            PlyDataType::Float64 => PlyPropertyValue::Float64(parse_token(token, data_type)?),
            PlyDataType::Int8 => PlyPropertyValue::Int8(parse_token(token, data_type)?),
            PlyDataType::UInt8 => PlyPropertyValue::UInt8(parse_token(token, data_type)?),
            PlyDataType::Int16 => PlyPropertyValue::Int16(parse_token(token, data_type)?),
            PlyDataType::UInt16 => PlyPropertyValue::UInt16(parse_token(token, data_type)?),
            PlyDataType::Int32 => PlyPropertyValue::Int32(parse_token(token, data_type)?),
            PlyDataType::UInt32 => PlyPropertyValue::UInt32(parse_token(token, data_type)?),
        };
        Ok(value)
    }

    /// Get the value as a float.
    pub fn as_f64(&self) -> f64 {
        match *self {
            PlyPropertyValue::Float32(v) => v as f64,
            PlyPropertyValue::Float64(v) => v,
            PlyPropertyValue::Int8(v) => v as f64,
            PlyPropertyValue::UInt8(v) => v as f64,
            PlyPropertyValue::Int16(v) => v as f64,
            PlyPropertyValue::UInt16(v) => v as f64,
            PlyPropertyValue::Int32(v) => v as f64,
            PlyPropertyValue::UInt32(v) => v as f64,
        }
    }

    /// Get the value as a color channel; floats are read in `[0, 1]`.
    pub fn as_u8(&self) -> u8 {
        match *self {
            PlyPropertyValue::UInt8(v) => v,
            PlyPropertyValue::Float32(v) => (v * 255.0) as u8,
            PlyPropertyValue::Float64(v) => (v * 255.0) as u8,
            other => other.as_f64().clamp(0.0, 255.0) as u8,
        }
    }

    pub(crate) fn write_le(&self, out: &mut impl Write) -> std::io::Result<()> {
        match *self {
            PlyPropertyValue::Float32(v) => out.write_all(&v.to_le_bytes()),
            PlyPropertyValue::Float64(v) => out.write_all(&v.to_le_bytes()),
            PlyPropertyValue::Int8(v) => out.write_all(&v.to_le_bytes()),
            PlyPropertyValue::UInt8(v) => out.write_all(&v.to_le_bytes()),
            PlyPropertyValue::Int16(v) => out.write_all(&v.to_le_bytes()),
            PlyPropertyValue::UInt16(v) => out.write_all(&v.to_le_bytes()),
            PlyPropertyValue::Int32(v) => out.write_all(&v.to_le_bytes()),
            PlyPropertyValue::UInt32(v) => out.write_all(&v.to_le_bytes()),
        }
    }

    pub(crate) fn write_ascii(&self, out: &mut impl Write) -> std::io::Result<()> {
        match *self {
            PlyPropertyValue::Float32(v) => write!(out, "{v}"),
            PlyPropertyValue::Float64(v) => write!(out, "{v}"),
            PlyPropertyValue::Int8(v) => write!(out, "{v}"),
            PlyPropertyValue::UInt8(v) => write!(out, "{v}"),
            PlyPropertyValue::Int16(v) => write!(out, "{v}"),
            PlyPropertyValue::UInt16(v) => write!(out, "{v}"),
            PlyPropertyValue::Int32(v) => write!(out, "{v}"),
            PlyPropertyValue::UInt32(v) => write!(out, "{v}"),
        }
    }
}

fn parse_token<T: std::str::FromStr>(token: &str, data_type: PlyDataType) -> Result<T, PlyError> {
    token
        .parse()
        .map_err(|_| PlyError::InvalidValue(format!("{token} as {}", data_type.keyword())))
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// A decoded vertex record with its values keyed by property name.
#[derive(Debug)]
pub struct PlyVertex {
    properties: Vec<(String, PlyPropertyValue)>,
}

impl PlyVertex {
    pub(crate) fn from_le_bytes(
        buffer: &[u8],
        schema: &[PlyPropertyDefinition],
    ) -> Result<Self, PlyError> {
        let mut properties = Vec::with_capacity(schema.len());
        let mut offset = 0;

        for prop_def in schema {
            let value = PlyPropertyValue::from_le_bytes(
                prop_def.data_type,
                buffer.get(offset..).unwrap_or_default(),
            )?;
            properties.push((prop_def.name.clone(), value));
            offset += prop_def.data_type.size();
        }

        Ok(PlyVertex { properties })
    }

    pub(crate) fn from_ascii(line: &str, schema: &[PlyPropertyDefinition]) -> Result<Self, PlyError> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() != schema.len() {
            return Err(PlyError::InvalidValue(format!(
                "expected {} values per vertex, found {}",
                schema.len(),
                tokens.len()
            )));
        }

        let properties = schema
            .iter()
            .zip(tokens)
            .map(|(prop_def, token)| {
                let value = PlyPropertyValue::parse_ascii(prop_def.data_type, token)?;
                Ok((prop_def.name.clone(), value))
            })
            .collect::<Result<Vec<_>, PlyError>>()?;

        Ok(PlyVertex { properties })
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<PlyPropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    fn get_f64(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, |v| v.as_f64())
    }

    fn get_u8(&self, name: &str) -> u8 {
        self.get(name).map_or(0, |v| v.as_u8())
    }

    /// The `x, y, z` position.
    pub fn to_point(&self) -> [f64; 3] {
        [self.get_f64("x"), self.get_f64("y"), self.get_f64("z")]
    }

    /// The `red, green, blue` color.
    pub fn to_color(&self) -> [u8; 3] {
        [self.get_u8("red"), self.get_u8("green"), self.get_u8("blue")]
    }

    /// The `nx, ny, nz` normal.
    pub fn to_normal(&self) -> [f64; 3] {
        [self.get_f64("nx"), self.get_f64("ny"), self.get_f64("nz")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parsing() -> Result<(), PlyError> {
        assert_eq!(PlyDataType::parse("float")?, PlyDataType::Float32);
        assert_eq!(PlyDataType::parse("uchar")?, PlyDataType::UInt8);
        assert_eq!(PlyDataType::parse("float64")?, PlyDataType::Float64);
        assert!(PlyDataType::parse("invalid").is_err());
        Ok(())
    }

    #[test]
    fn test_value_le_bytes() -> Result<(), PlyError> {
        let value = PlyPropertyValue::from_le_bytes(PlyDataType::Int16, &(-2i16).to_le_bytes())?;
        assert_eq!(value, PlyPropertyValue::Int16(-2));
        assert!(PlyPropertyValue::from_le_bytes(PlyDataType::Float64, &[0u8; 4]).is_err());
        Ok(())
    }

    #[test]
    fn test_value_ascii() -> Result<(), PlyError> {
        let value = PlyPropertyValue::parse_ascii(PlyDataType::Float32, "0.25")?;
        assert_eq!(value.as_f64(), 0.25);
        assert!(PlyPropertyValue::parse_ascii(PlyDataType::UInt8, "300").is_err());
        Ok(())
    }

    #[test]
    fn test_color_from_float() {
        assert_eq!(PlyPropertyValue::Float32(1.0).as_u8(), 255);
        assert_eq!(PlyPropertyValue::Int32(-5).as_u8(), 0);
    }

    #[test]
    fn test_vertex_ascii_wrong_arity() {
        let schema = vec![PlyPropertyDefinition {
            name: "x".to_string(),
            data_type: PlyDataType::Float32,
        }];
        assert!(PlyVertex::from_ascii("1.0 2.0", &schema).is_err());
    }
}
