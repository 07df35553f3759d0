/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the images have different sizes.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when a reduction finds no finite pixel values.
    #[error("Image has no finite pixel values")]
    NoFinitePixels,

    /// Error when a percentile is requested outside of [0, 100].
    #[error("Percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),
}
