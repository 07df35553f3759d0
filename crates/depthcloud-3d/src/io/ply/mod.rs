mod parser;
mod properties;
mod writer;

pub use parser::*;
pub use properties::*;
pub use writer::*;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write the PLY file
    #[error("Failed to read or write PLY file. {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the `ply` magic line
    #[error("Missing `ply` magic line")]
    MissingMagic,

    /// The header is malformed
    #[error("Malformed PLY header: {0}")]
    MalformedHeader(String),

    /// The payload encoding is not supported
    #[error("Unsupported PLY format: {0}")]
    UnsupportedFormat(String),

    /// The property type is not supported
    #[error("Unsupported PLY property: {0}")]
    UnsupportedProperty(String),

    /// A required vertex property is missing
    #[error("Missing PLY vertex property: {0}")]
    MissingProperty(&'static str),

    /// A value in an ascii payload could not be parsed
    #[error("Invalid PLY value: {0}")]
    InvalidValue(String),
}
