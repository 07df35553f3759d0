use std::path::PathBuf;

/// Errors raised while loading or running the depth network.
#[derive(thiserror::Error, Debug)]
pub enum MonodepthError {
    /// A model file does not exist.
    #[error("Model file does not exist: {0}")]
    ModelNotFound(PathBuf),

    /// A model declares no inputs.
    #[error("Model has no inputs: {0}")]
    NoInputs(PathBuf),

    /// Error coming from the onnx runtime.
    #[error("Onnx runtime error. {0}")]
    Ort(#[from] ort::Error),

    /// Error while preparing or converting images.
    #[error("Failed to process the image. {0}")]
    Image(#[from] depthcloud_image::ImageError),

    /// The encoder outputs cannot be wired to the decoder inputs.
    #[error("Encoder produces {0} feature maps but the decoder expects {1}")]
    FeatureMismatch(usize, usize),

    /// The requested disparity output is not produced by the decoder.
    #[error("Decoder has no output named `{0}` (available: {1:?})")]
    MissingOutput(String, Vec<String>),

    /// A tensor has an unexpected shape.
    #[error("Unexpected tensor shape {0:?}, expected {1}")]
    InvalidShape(Vec<i64>, &'static str),
}
