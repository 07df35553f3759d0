use std::path::Path;

use depthcloud_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path and converts it to rgb8.
///
/// The method tries to read from any image format supported by the image
/// crate; grayscale and alpha images are converted to three channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels (rgb8).
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] if the path does not exist and a
/// decode error if the content is not a supported image.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    log::debug!(
        "decoded {} ({:?}) with {}",
        file_path.display(),
        img.color(),
        size
    );

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_any_jpeg() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gradient.jpg");

        let img = image::RgbImage::from_fn(32, 16, |x, y| image::Rgb([x as u8 * 8, y as u8 * 16, 0]));
        img.save(&file_path)?;

        let image = read_image_any_rgb8(&file_path)?;
        assert_eq!(image.cols(), 32);
        assert_eq!(image.rows(), 16);
        assert_eq!(image.num_channels(), 3);

        Ok(())
    }

    #[test]
    fn read_any_gray_png_as_rgb() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        image::GrayImage::from_pixel(4, 3, image::Luma([42])).save(&file_path)?;

        let image = read_image_any_rgb8(&file_path)?;
        assert_eq!(image.size(), [4, 3].into());
        assert!(image.as_slice().iter().all(|&v| v == 42));

        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_any_rgb8("does/not/exist.jpg");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_not_an_image() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("garbage.jpg");
        std::fs::write(&file_path, b"definitely not a jpeg")?;

        assert!(read_image_any_rgb8(&file_path).is_err());

        Ok(())
    }
}
