use std::path::{Path, PathBuf};

use depthcloud_image::{ops, Image, ImageSize};
use depthcloud_imgproc::resize::{resize_bilinear_f32, resize_lanczos_rgb8};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{Tensor, ValueType};

use crate::error::MonodepthError;

/// Configuration to build a [`Monodepth`] model.
///
/// # Example
///
/// ```
/// use depthcloud_dnn::MonodepthConfig;
///
/// let config = MonodepthConfig::new("encoder.onnx", "depth.onnx")
///     .with_feed_size([1024, 320].into())
///     .with_intra_threads(2);
///
/// assert_eq!(config.feed_size.width, 1024);
/// assert_eq!(config.disparity_output, "disp_0");
/// ```
#[derive(Debug, Clone)]
pub struct MonodepthConfig {
    /// Path to the encoder onnx model.
    pub encoder_path: PathBuf,
    /// Path to the depth decoder onnx model.
    pub decoder_path: PathBuf,
    /// Network input size, used when the encoder input shape is dynamic.
    pub feed_size: ImageSize,
    /// Name of the decoder output holding the full resolution disparity.
    pub disparity_output: String,
    /// Number of threads used by the runtime within one operator.
    pub intra_threads: usize,
}

impl Default for MonodepthConfig {
    fn default() -> Self {
        Self {
            encoder_path: PathBuf::from("models/mono_640x192/encoder.onnx"),
            decoder_path: PathBuf::from("models/mono_640x192/depth.onnx"),
            feed_size: ImageSize {
                width: 640,
                height: 192,
            },
            disparity_output: "disp_0".to_string(),
            intra_threads: 4,
        }
    }
}

impl MonodepthConfig {
    /// Create a configuration for the given encoder and decoder files.
    pub fn new(encoder_path: impl Into<PathBuf>, decoder_path: impl Into<PathBuf>) -> Self {
        Self {
            encoder_path: encoder_path.into(),
            decoder_path: decoder_path.into(),
            ..Default::default()
        }
    }

    /// Set the fallback network input size.
    pub fn with_feed_size(mut self, feed_size: ImageSize) -> Self {
        self.feed_size = feed_size;
        self
    }

    /// Set the decoder output to read the disparity from.
    pub fn with_disparity_output(mut self, name: impl Into<String>) -> Self {
        self.disparity_output = name.into();
        self
    }

    /// Set the number of intra-op threads.
    pub fn with_intra_threads(mut self, intra_threads: usize) -> Self {
        self.intra_threads = intra_threads;
        self
    }
}

/// A monocular depth network split in a feature encoder and a depth decoder.
///
/// Every encoder output is fed, in order, to the decoder inputs. The decoder
/// yields sigmoid disparities at one or more scales; the configured output
/// is resized back to the input image resolution.
pub struct Monodepth {
    encoder: Session,
    decoder: Session,
    input_name: String,
    feed_size: ImageSize,
    disparity_output: String,
}

impl Monodepth {
    /// Load the encoder and decoder models.
    ///
    /// # Errors
    ///
    /// Returns [`MonodepthError::ModelNotFound`] if a model file is missing,
    /// and a runtime error if the models cannot be loaded or wired together.
    pub fn new(config: MonodepthConfig) -> Result<Self, MonodepthError> {
        let encoder = load_session(&config.encoder_path, config.intra_threads)?;
        let decoder = load_session(&config.decoder_path, config.intra_threads)?;

        if encoder.outputs.len() != decoder.inputs.len() {
            return Err(MonodepthError::FeatureMismatch(
                encoder.outputs.len(),
                decoder.inputs.len(),
            ));
        }

        let available = decoder
            .outputs
            .iter()
            .map(|o| o.name.clone())
            .collect::<Vec<_>>();
        if !available.contains(&config.disparity_output) {
            return Err(MonodepthError::MissingOutput(
                config.disparity_output,
                available,
            ));
        }

        let input = encoder
            .inputs
            .first()
            .ok_or_else(|| MonodepthError::NoInputs(config.encoder_path.clone()))?;

        let input_name = input.name.clone();
        let feed_size = static_image_size(&input.input_type).unwrap_or(config.feed_size);

        log::info!(
            "loaded depth model (feed size {}, {} feature maps)",
            feed_size,
            encoder.outputs.len()
        );

        Ok(Self {
            encoder,
            decoder,
            input_name,
            feed_size,
            disparity_output: config.disparity_output,
        })
    }

    /// The size images are resized to before entering the network.
    pub fn feed_size(&self) -> ImageSize {
        self.feed_size
    }

    /// Estimate the disparity of an rgb8 image.
    ///
    /// # Returns
    ///
    /// The disparity map with the same size as `image`.
    pub fn forward(&self, image: &Image<u8, 3>) -> Result<Image<f32, 1>, MonodepthError> {
        let (shape, data) = preprocess(image, self.feed_size)?;

        let input = Tensor::from_array((shape, data))?;
        let features = self
            .encoder
            .run(ort::inputs![self.input_name.as_str() => input]?)?;

        // re-wrap every feature map as a decoder input, matched by position
        let mut decoder_inputs = Vec::with_capacity(self.decoder.inputs.len());
        for (enc_output, dec_input) in self.encoder.outputs.iter().zip(self.decoder.inputs.iter()) {
            let (feature_shape, feature) =
                features[enc_output.name.as_str()].try_extract_raw_tensor::<f32>()?;
            log::debug!(
                "feature {} -> {}: {:?}",
                enc_output.name,
                dec_input.name,
                feature_shape
            );
            let tensor = Tensor::from_array((feature_shape, feature.to_vec()))?;
            decoder_inputs.push((dec_input.name.clone(), tensor));
        }

        let outputs = self.decoder.run(decoder_inputs)?;
        let (disp_shape, disp) =
            outputs[self.disparity_output.as_str()].try_extract_raw_tensor::<f32>()?;

        postprocess(&disp_shape, disp, image.size())
    }
}

fn load_session(path: &Path, intra_threads: usize) -> Result<Session, MonodepthError> {
    if !path.exists() {
        return Err(MonodepthError::ModelNotFound(path.to_path_buf()));
    }

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)?;

    log::debug!(
        "{}: inputs {:?}, outputs {:?}",
        path.display(),
        session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
        session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>()
    );

    Ok(session)
}

// reads (H, W) from a static NCHW input, dynamic axes are reported as -1
fn static_image_size(value_type: &ValueType) -> Option<ImageSize> {
    match value_type {
        ValueType::Tensor { dimensions, .. } => match dimensions.as_slice() {
            [_, _, h, w] if *h > 0 && *w > 0 => Some(ImageSize {
                width: *w as usize,
                height: *h as usize,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Prepare an rgb8 image as the network input tensor.
///
/// The image is resized to `feed_size` with a Lanczos filter, scaled to
/// `[0, 1]` and rearranged to planar layout.
///
/// # Returns
///
/// The tensor shape `[1, 3, H, W]` and its data.
pub fn preprocess(
    image: &Image<u8, 3>,
    feed_size: ImageSize,
) -> Result<([usize; 4], Vec<f32>), MonodepthError> {
    let mut resized = Image::<u8, 3>::from_size_val(feed_size, 0)?;
    resize_lanczos_rgb8(image, &mut resized)?;

    let mut resized_f32 = Image::<f32, 3>::from_size_val(feed_size, 0.0)?;
    ops::cast_and_scale(&resized, &mut resized_f32, 1.0 / 255.0)?;

    let shape = [1, 3, feed_size.height, feed_size.width];

    Ok((shape, ops::hwc_to_chw(&resized_f32)))
}

/// Convert a `[1, 1, h, w]` disparity tensor to an image of `output_size`.
///
/// # Errors
///
/// Returns [`MonodepthError::InvalidShape`] if the shape is not a single
/// channel batch of one or does not match the data length.
pub fn postprocess(
    shape: &[i64],
    data: &[f32],
    output_size: ImageSize,
) -> Result<Image<f32, 1>, MonodepthError> {
    let (rows, cols) = match shape {
        [1, 1, h, w] if *h > 0 && *w > 0 => (*h as usize, *w as usize),
        _ => return Err(MonodepthError::InvalidShape(shape.to_vec(), "[1, 1, h, w]")),
    };

    let disparity = Image::<f32, 1>::from_size_slice([cols, rows].into(), data)?;

    let mut disparity_resized = Image::<f32, 1>::from_size_val(output_size, 0.0)?;
    resize_bilinear_f32(&disparity, &mut disparity_resized)?;

    Ok(disparity_resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn preprocess_shape_and_range() -> Result<(), MonodepthError> {
        let image = Image::<u8, 3>::new(
            [4, 2].into(),
            (0..4 * 2 * 3).map(|v| (v * 10) as u8).collect(),
        )?;
        let (shape, data) = preprocess(&image, [8, 6].into())?;

        assert_eq!(shape, [1, 3, 6, 8]);
        assert_eq!(data.len(), 3 * 6 * 8);
        assert!(data.iter().all(|v| (0.0..=1.0).contains(v)));

        Ok(())
    }

    #[test]
    fn preprocess_is_planar() -> Result<(), MonodepthError> {
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend_from_slice(&[255u8, 0, 51]);
        }
        let image = Image::<u8, 3>::new([2, 2].into(), data)?;
        let (_, tensor) = preprocess(&image, [2, 2].into())?;

        assert_eq!(&tensor[..4], &[1.0; 4]);
        assert_eq!(&tensor[4..8], &[0.0; 4]);
        for v in &tensor[8..] {
            assert_relative_eq!(*v, 0.2, epsilon = 1e-6);
        }

        Ok(())
    }

    #[test]
    fn postprocess_resizes_to_image_size() -> Result<(), MonodepthError> {
        let disparity = postprocess(&[1, 1, 2, 3], &[0.1; 6], [12, 9].into())?;

        assert_eq!(disparity.size(), [12, 9].into());
        for v in disparity.as_slice() {
            assert_relative_eq!(*v, 0.1, epsilon = 1e-6);
        }

        Ok(())
    }

    #[test]
    fn postprocess_rejects_bad_shapes() {
        assert!(matches!(
            postprocess(&[1, 2, 2, 2], &[0.0; 8], [2, 2].into()),
            Err(MonodepthError::InvalidShape(..))
        ));
        assert!(matches!(
            postprocess(&[2, 2], &[0.0; 4], [2, 2].into()),
            Err(MonodepthError::InvalidShape(..))
        ));
        assert!(matches!(
            postprocess(&[1, 1, 2, 2], &[0.0; 3], [2, 2].into()),
            Err(MonodepthError::Image(_))
        ));
    }

    #[test]
    fn missing_model_file() {
        let config = MonodepthConfig::new("does/not/exist.onnx", "nor/this.onnx");
        assert!(matches!(
            Monodepth::new(config),
            Err(MonodepthError::ModelNotFound(_))
        ));
    }
}
