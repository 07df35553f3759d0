use depthcloud_image::{Image, ImageError};

// ColorBrewer sequential "Greys" ramp, from light to dark.
const GREYS: [u8; 9] = [255, 240, 217, 189, 150, 115, 82, 37, 0];

/// Look up the "Greys" ramp at `t` in `[0, 1]`.
///
/// Low values are white and high values are black. Values outside the range
/// are clipped and non-finite values map to white.
///
/// The ramp is interpolated continuously and rounded, so a level can differ
/// by one from a lookup in a 256-entry table built from the same stops.
pub fn greys(t: f32) -> u8 {
    if !t.is_finite() {
        return GREYS[0];
    }

    let t = t.clamp(0.0, 1.0);
    let pos = t * (GREYS.len() - 1) as f32;
    let i = (pos.floor() as usize).min(GREYS.len() - 2);
    let frac = pos - i as f32;

    let lo = GREYS[i] as f32;
    let hi = GREYS[i + 1] as f32;

    (lo + (hi - lo) * frac).round() as u8
}

/// Render a scalar map with the "Greys" colormap.
///
/// Each value is normalized as `(v - vmin) / (vmax - vmin)`, clipped to
/// `[0, 1]` and looked up with [`greys`]. If `vmax <= vmin` every finite
/// value maps to the low end of the ramp.
///
/// # Arguments
///
/// * `src` - The scalar map with shape (H, W, 1).
/// * `dst` - The rendered gray image with the same size.
/// * `vmin` - The value mapped to white.
/// * `vmax` - The value mapped to black.
///
/// # Example
///
/// ```
/// use depthcloud_image::Image;
/// use depthcloud_imgproc::colormap::apply_greys;
///
/// let src = Image::<f32, 1>::new([3, 1].into(), vec![0.0, 0.5, 1.0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// apply_greys(&src, &mut dst, 0.0, 1.0).unwrap();
/// assert_eq!(dst.as_slice(), &[255, 150, 0]);
/// ```
pub fn apply_greys(
    src: &Image<f32, 1>,
    dst: &mut Image<u8, 1>,
    vmin: f32,
    vmax: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let range = vmax - vmin;

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .for_each(|(out, &v)| {
            let t = if range > 0.0 { (v - vmin) / range } else { 0.0 };
            *out = greys(if v.is_finite() { t } else { f32::NAN });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greys_endpoints() {
        assert_eq!(greys(0.0), 255);
        assert_eq!(greys(1.0), 0);
        assert_eq!(greys(-3.0), 255);
        assert_eq!(greys(7.0), 0);
        assert_eq!(greys(f32::NAN), 255);
    }

    #[test]
    fn greys_monotone() {
        let samples = (0..=100).map(|i| greys(i as f32 / 100.0)).collect::<Vec<_>>();
        assert!(samples.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn apply_greys_clips_above_vmax() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([4, 1].into(), vec![0.1, 0.2, 0.9, f32::NAN])?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        apply_greys(&src, &mut dst, 0.1, 0.2)?;
        assert_eq!(dst.as_slice(), &[255, 0, 0, 255]);
        Ok(())
    }

    #[test]
    fn apply_greys_degenerate_range() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 0.4)?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        apply_greys(&src, &mut dst, 0.4, 0.4)?;
        assert!(dst.as_slice().iter().all(|&v| v == 255));
        Ok(())
    }
}
