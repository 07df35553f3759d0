use depthcloud_image::{Image, ImageError};
use image::{imageops, imageops::FilterType, ImageBuffer, Rgb};

/// Resize an rgb8 image using a Lanczos3 filter.
///
/// The output size is taken from `dst`.
///
/// # Example
///
/// ```
/// use depthcloud_image::Image;
/// use depthcloud_imgproc::resize::resize_lanczos_rgb8;
///
/// let src = Image::<u8, 3>::from_size_val([8, 4].into(), 128).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val([4, 2].into(), 0).unwrap();
///
/// resize_lanczos_rgb8(&src, &mut dst).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 128));
/// ```
pub fn resize_lanczos_rgb8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    let buf = ImageBuffer::<Rgb<u8>, _>::from_raw(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
    )
    .ok_or(ImageError::InvalidChannelShape(
        src.as_slice().len(),
        src.size().area() * 3,
    ))?;

    let resized = imageops::resize(
        &buf,
        dst.width() as u32,
        dst.height() as u32,
        FilterType::Lanczos3,
    );

    dst.as_slice_mut().copy_from_slice(resized.as_raw());

    Ok(())
}

/// Resize a single channel float map with bilinear interpolation.
///
/// Every output pixel samples the source at its centre, mapped as
/// `(dst + 0.5) * scale - 0.5` and clamped at zero, i.e. without corner
/// alignment. The kernel does not widen when downsampling. The output size
/// is taken from `dst`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` is empty and `dst` is not.
///
/// # Example
///
/// ```
/// use depthcloud_image::Image;
/// use depthcloud_imgproc::resize::resize_bilinear_f32;
///
/// let src = Image::<f32, 1>::new([2, 1].into(), vec![0.0, 1.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val([4, 1].into(), 0.0).unwrap();
///
/// resize_bilinear_f32(&src, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0.0, 0.25, 0.75, 1.0]);
/// ```
pub fn resize_bilinear_f32(src: &Image<f32, 1>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if dst.size().area() == 0 {
        return Ok(());
    }

    if src.size().area() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let scale_x = src.width() as f32 / dst.width() as f32;
    let scale_y = src.height() as f32 / dst.height() as f32;
    let dst_cols = dst.cols();

    dst.as_slice_mut()
        .chunks_exact_mut(dst_cols)
        .enumerate()
        .for_each(|(r, row)| {
            let v = ((r as f32 + 0.5) * scale_y - 0.5).max(0.0);
            for (c, out) in row.iter_mut().enumerate() {
                let u = ((c as f32 + 0.5) * scale_x - 0.5).max(0.0);
                *out = bilinear_interpolation(src, u, v);
            }
        });

    log::debug!(
        "resized float map from {} to {}",
        src.size(),
        dst.size()
    );

    Ok(())
}

// samples a non-empty single channel image at the non-negative location (u, v)
fn bilinear_interpolation(image: &Image<f32, 1>, u: f32, v: f32) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);
    let iu1 = (iu0 + 1).min(cols - 1);
    let iv1 = (iv0 + 1).min(rows - 1);

    let frac_u = u - iu0 as f32;
    let frac_v = v - iv0 as f32;

    let data = image.as_slice();
    let p00 = data[iv0 * cols + iu0];
    let p01 = data[iv0 * cols + iu1];
    let p10 = data[iv1 * cols + iu0];
    let p11 = data[iv1 * cols + iu1];

    let top = p00 + (p01 - p00) * frac_u;
    let bottom = p10 + (p11 - p10) * frac_u;

    top + (bottom - top) * frac_v
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn resize_bilinear_upsample_row() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([2, 1].into(), vec![0.0, 1.0])?;
        let mut dst = Image::<f32, 1>::from_size_val([4, 1].into(), 0.0)?;

        resize_bilinear_f32(&src, &mut dst)?;

        let expected = [0.0, 0.25, 0.75, 1.0];
        for (v, e) in dst.as_slice().iter().zip(expected.iter()) {
            assert_relative_eq!(v, e, epsilon = 1e-5);
        }

        Ok(())
    }

    #[test]
    fn resize_bilinear_keeps_range_outside_unit() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([2, 1].into(), vec![10.0, 30.0])?;
        let mut dst = Image::<f32, 1>::from_size_val([4, 2].into(), 0.0)?;

        resize_bilinear_f32(&src, &mut dst)?;

        let row = &dst.as_slice()[..4];
        assert_relative_eq!(row[0], 10.0, epsilon = 1e-3);
        assert_relative_eq!(row[1], 15.0, epsilon = 1e-3);
        assert_relative_eq!(row[3], 30.0, epsilon = 1e-3);

        Ok(())
    }

    #[test]
    fn resize_bilinear_downsample_is_point_sampled() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([8, 1].into(), vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0])?;
        let mut dst = Image::<f32, 1>::from_size_val([4, 1].into(), -1.0)?;

        resize_bilinear_f32(&src, &mut dst)?;

        assert_eq!(dst.as_slice(), &[0.0, 1.0, 0.0, 1.0]);

        Ok(())
    }

    #[test]
    fn resize_bilinear_downsample_rows() -> Result<(), ImageError> {
        // 1x4 column resized to 1x3: centres land on 1/6, 1.5, 17/6
        let src = Image::<f32, 1>::new([1, 4].into(), vec![0.0, 3.0, 6.0, 9.0])?;
        let mut dst = Image::<f32, 1>::from_size_val([1, 3].into(), 0.0)?;

        resize_bilinear_f32(&src, &mut dst)?;

        let expected = [0.5, 4.5, 8.5];
        for (v, e) in dst.as_slice().iter().zip(expected.iter()) {
            assert_relative_eq!(v, e, epsilon = 1e-5);
        }

        Ok(())
    }

    #[test]
    fn resize_bilinear_empty_source() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([0, 0].into(), vec![])?;
        let mut dst = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        assert!(resize_bilinear_f32(&src, &mut dst).is_err());
        Ok(())
    }

    #[test]
    fn resize_bilinear_constant() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([5, 3].into(), 0.7)?;
        let mut dst = Image::<f32, 1>::from_size_val([9, 7].into(), 0.0)?;

        resize_bilinear_f32(&src, &mut dst)?;

        for v in dst.as_slice() {
            assert_relative_eq!(*v, 0.7, epsilon = 1e-5);
        }

        Ok(())
    }

    #[test]
    fn resize_lanczos_shape() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::from_size_val([10, 6].into(), 7)?;
        let mut dst = Image::<u8, 3>::from_size_val([5, 3].into(), 0)?;

        resize_lanczos_rgb8(&src, &mut dst)?;

        assert_eq!(dst.as_slice().len(), 5 * 3 * 3);
        assert!(dst.as_slice().iter().all(|&v| v == 7));

        Ok(())
    }
}
