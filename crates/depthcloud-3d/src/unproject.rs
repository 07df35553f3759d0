use std::fmt;

use depthcloud_image::{Image, ImageError};

use crate::{camera::PinholeCameraIntrinsic, pointcloud::PointCloud};

/// Exclusive upper bound of a usable disparity value.
pub const MAX_DISPARITY: f32 = 255.0;

/// Divisor applied to a disparity value to obtain the depth coordinate.
pub const DISPARITY_SCALE: f32 = 256.0;

// arrays with more elements than this are printed in summarized form
const PRINT_THRESHOLD: usize = 1000;
const PRINT_EDGE_ITEMS: usize = 3;

/// A per-pixel map of camera-space points.
///
/// Pixel `(row, col)` holds the `[x, y, z]` coordinates derived from the
/// disparity at that pixel. Invalid pixels hold `[0, 0, NaN]`.
#[derive(Debug, Clone)]
pub struct PointMap(Image<f32, 3>);

impl PointMap {
    /// Get the underlying three channel image.
    pub fn image(&self) -> &Image<f32, 3> {
        &self.0
    }

    /// Get the point at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<[f32; 3]> {
        Some([
            *self.0.get([row, col, 0])?,
            *self.0.get([row, col, 1])?,
            *self.0.get([row, col, 2])?,
        ])
    }

    /// Number of pixels with a valid point.
    pub fn num_valid(&self) -> usize {
        self.0.pixels().filter(|p| p[2].is_finite()).count()
    }

    /// Collect the valid points in row-major order.
    pub fn to_pointcloud(&self) -> PointCloud {
        let points = self
            .0
            .pixels()
            .filter(|p| p[2].is_finite())
            .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
            .collect::<Vec<_>>();

        PointCloud::new(points, None, None)
    }
}

/// Unproject a disparity map to camera-space points.
///
/// A pixel at `(r, c)` with disparity `d` is valid when `0 < d < 255`. For a
/// valid pixel the point is
///
/// ```text
/// z = d / 256
/// x = z * (c - cx) / fx
/// y = z * (r - cy) / fy
/// ```
///
/// and invalid pixels become `[0, 0, NaN]`.
///
/// # Example
///
/// ```
/// use depthcloud_image::Image;
/// use depthcloud_3d::camera::PinholeCameraIntrinsic;
/// use depthcloud_3d::unproject::disparity_to_points;
///
/// let disparity = Image::<f32, 1>::from_size_val([4, 3].into(), 128.0).unwrap();
/// let intrinsic = PinholeCameraIntrinsic::new(1.0, 1.0, 0.0, 0.0).unwrap();
///
/// let points = disparity_to_points(&disparity, &intrinsic).unwrap();
/// assert_eq!(points.get(2, 3), Some([1.5, 1.0, 0.5]));
/// ```
pub fn disparity_to_points(
    disparity: &Image<f32, 1>,
    intrinsic: &PinholeCameraIntrinsic,
) -> Result<PointMap, ImageError> {
    let cols = disparity.cols();
    let (fx, fy) = (intrinsic.fx as f32, intrinsic.fy as f32);
    let (cx, cy) = (intrinsic.cx as f32, intrinsic.cy as f32);

    let mut points = Vec::with_capacity(disparity.size().area() * 3);

    for (i, &d) in disparity.as_slice().iter().enumerate() {
        let (r, c) = ((i / cols) as f32, (i % cols) as f32);
        if d > 0.0 && d < MAX_DISPARITY {
            let z = d / DISPARITY_SCALE;
            points.extend_from_slice(&[z * (c - cx) / fx, z * (r - cy) / fy, z]);
        } else {
            points.extend_from_slice(&[0.0, 0.0, f32::NAN]);
        }
    }

    let points = Image::new(disparity.size(), points)?;

    log::debug!(
        "unprojected {} valid points out of {}",
        points.pixels().filter(|p| p[2].is_finite()).count(),
        disparity.size().area()
    );

    Ok(PointMap(points))
}

// indices to print along one axis, `None` marks the elided range
fn summarize_axis(len: usize, summarize: bool) -> Vec<Option<usize>> {
    if summarize && len > 2 * PRINT_EDGE_ITEMS {
        (0..PRINT_EDGE_ITEMS)
            .map(Some)
            .chain(std::iter::once(None))
            .chain((len - PRINT_EDGE_ITEMS..len).map(Some))
            .collect()
    } else {
        (0..len).map(Some).collect()
    }
}

fn fmt_value(v: f32) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.8}", v)
    }
}

impl fmt::Display for PointMap {
    /// Prints the map as a nested `rows x cols x 3` array, eliding the middle
    /// rows and columns of large maps.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summarize = self.0.as_slice().len() > PRINT_THRESHOLD;
        let rows = summarize_axis(self.0.rows(), summarize);
        let cols = summarize_axis(self.0.cols(), summarize);

        write!(f, "[")?;
        for (ri, row) in rows.iter().enumerate() {
            if ri > 0 {
                write!(f, " ")?;
            }
            let Some(row) = row else {
                write!(f, "...\n\n")?;
                continue;
            };

            write!(f, "[")?;
            for (ci, col) in cols.iter().enumerate() {
                if ci > 0 {
                    write!(f, "  ")?;
                }
                match col.and_then(|col| self.get(*row, col)) {
                    Some([x, y, z]) => {
                        write!(f, "[{} {} {}]", fmt_value(x), fmt_value(y), fmt_value(z))?
                    }
                    None => write!(f, "...")?,
                }
                if ci + 1 < cols.len() {
                    writeln!(f)?;
                }
            }
            write!(f, "]")?;

            if ri + 1 < rows.len() {
                write!(f, "\n\n")?;
            }
        }
        write!(f, "]")
    }
}
