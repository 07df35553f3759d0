use crate::{Image, ImageError};

/// Cast the pixel data of an image to a different type and scale it.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use depthcloud_image::{Image, ImageSize};
/// use depthcloud_image::ops::cast_and_scale;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![0u8, 255],
/// ).unwrap();
///
/// let mut image_f32 = Image::from_size_val(image.size(), 0.0f32).unwrap();
///
/// cast_and_scale(&image, &mut image_f32, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f32.get([0, 0, 0]), Some(&0.0f32));
/// assert_eq!(image_f32.get([0, 1, 0]), Some(&1.0f32));
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<U, Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp)
                .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })?;

    Ok(())
}

/// Rearrange the interleaved (H, W, C) pixels into planar (C, H, W) order.
///
/// ```
/// use depthcloud_image::Image;
/// use depthcloud_image::ops::hwc_to_chw;
///
/// let image = Image::<u8, 3>::new([2, 1].into(), vec![1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(hwc_to_chw(&image), vec![1, 4, 2, 5, 3, 6]);
/// ```
pub fn hwc_to_chw<T: Copy, const C: usize>(image: &Image<T, C>) -> Vec<T> {
    let num_pixels = image.size().area();
    let mut planar = Vec::with_capacity(num_pixels * C);
    for ch in 0..C {
        planar.extend(image.pixels().map(|pixel| pixel[ch]));
    }
    planar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageSize;

    #[test]
    fn test_cast_and_scale() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                height: 2,
                width: 1,
            },
            vec![0u8, 0, 255, 0, 0, 255],
        )?;

        let mut image_f64: Image<f64, 3> = Image::from_size_val(image.size(), 0.0)?;

        super::cast_and_scale(&image, &mut image_f64, 1. / 255.0)?;

        let expected = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0];

        assert_eq!(image_f64.as_slice(), expected);

        Ok(())
    }

    #[test]
    fn test_cast_and_scale_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = Image::<f32, 1>::from_size_val([3, 2].into(), 0.0)?;
        assert_eq!(
            cast_and_scale(&image, &mut dst, 1.0),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );
        Ok(())
    }

    #[test]
    fn test_hwc_to_chw_single_channel() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([3, 1].into(), vec![1.0, 2.0, 3.0])?;
        assert_eq!(hwc_to_chw(&image), vec![1.0, 2.0, 3.0]);
        Ok(())
    }
}
