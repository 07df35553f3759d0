use depthcloud_image::{Image, ImageError};

/// Find the minimum and maximum finite values in an image.
///
/// Non-finite values (NaN, +/-inf) are ignored.
///
/// # Errors
///
/// Returns [`ImageError::NoFinitePixels`] if the image holds no finite value.
///
/// # Example
///
/// ```
/// use depthcloud_image::Image;
/// use depthcloud_imgproc::stats::find_min_max;
///
/// let image = Image::<f32, 1>::new([2, 2].into(), vec![0.5, f32::NAN, -1.0, 3.0]).unwrap();
/// assert_eq!(find_min_max(&image).unwrap(), (-1.0, 3.0));
/// ```
pub fn find_min_max<const C: usize>(image: &Image<f32, C>) -> Result<(f32, f32), ImageError> {
    image
        .as_slice()
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or(ImageError::NoFinitePixels)
}

/// Compute the `q`-th percentile of the finite values of an image.
///
/// The percentile is linearly interpolated between the two closest ranks,
/// so `q = 0` is the minimum, `q = 100` the maximum and `q = 50` the median.
///
/// # Arguments
///
/// * `image` - The input image.
/// * `q` - The percentile to compute, in `[0, 100]`.
///
/// # Errors
///
/// Returns an error if `q` is out of range or the image has no finite values.
pub fn percentile<const C: usize>(image: &Image<f32, C>, q: f64) -> Result<f32, ImageError> {
    if !(0.0..=100.0).contains(&q) {
        return Err(ImageError::InvalidPercentile(q));
    }

    let mut values = image
        .as_slice()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();

    if values.is_empty() {
        return Err(ImageError::NoFinitePixels);
    }

    values.sort_by(f32::total_cmp);

    let rank = q / 100.0 * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    let value = values[lo] as f64 + (values[hi] as f64 - values[lo] as f64) * frac;

    Ok(value as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn min_max() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([3, 1].into(), vec![2.0, -4.0, 8.0])?;
        assert_eq!(find_min_max(&image)?, (-4.0, 8.0));
        Ok(())
    }

    #[test]
    fn min_max_all_nan() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_size_val([2, 2].into(), f32::NAN)?;
        assert_eq!(find_min_max(&image), Err(ImageError::NoFinitePixels));
        Ok(())
    }

    #[test]
    fn percentile_linear() -> Result<(), ImageError> {
        // matches numpy.percentile([1, 2, 3, 4], q)
        let image = Image::<f32, 1>::new([4, 1].into(), vec![4.0, 1.0, 3.0, 2.0])?;
        assert_relative_eq!(percentile(&image, 0.0)?, 1.0);
        assert_relative_eq!(percentile(&image, 50.0)?, 2.5);
        assert_relative_eq!(percentile(&image, 95.0)?, 3.85, epsilon = 1e-6);
        assert_relative_eq!(percentile(&image, 100.0)?, 4.0);
        Ok(())
    }

    #[test]
    fn percentile_single_value() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([1, 1].into(), vec![0.3])?;
        assert_relative_eq!(percentile(&image, 95.0)?, 0.3);
        Ok(())
    }

    #[test]
    fn percentile_out_of_range() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([1, 1].into(), vec![0.3])?;
        assert_eq!(
            percentile(&image, 101.0),
            Err(ImageError::InvalidPercentile(101.0))
        );
        Ok(())
    }
}
