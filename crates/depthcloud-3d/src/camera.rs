use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error types for the camera module.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// Failed to read the intrinsics file.
    #[error("Failed to read camera intrinsics. {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the intrinsics file.
    #[error("Failed to parse camera intrinsics. {0}")]
    Json(#[from] serde_json::Error),

    /// The focal lengths must be finite and non-zero.
    #[error("Invalid focal length: fx={0}, fy={1}")]
    InvalidFocalLength(f64, f64),
}

/// Represents the intrinsic parameters of a pinhole camera.
///
/// The [`Default`] value holds uncalibrated placeholder values
/// (`fx = fy = cx = cy = 90`).
///
/// # Example
///
/// ```
/// use depthcloud_3d::camera::PinholeCameraIntrinsic;
///
/// let intrinsic = PinholeCameraIntrinsic::default();
/// assert_eq!(intrinsic.fx, 90.0);
/// assert_eq!(intrinsic.cy, 90.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeCameraIntrinsic {
    /// The focal length in the x direction
    pub fx: f64,
    /// The focal length in the y direction
    pub fy: f64,
    /// The x coordinate of the principal point
    pub cx: f64,
    /// The y coordinate of the principal point
    pub cy: f64,
}

impl Default for PinholeCameraIntrinsic {
    fn default() -> Self {
        Self {
            fx: 90.0,
            fy: 90.0,
            cx: 90.0,
            cy: 90.0,
        }
    }
}

impl PinholeCameraIntrinsic {
    /// Creates a new set of intrinsics.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidFocalLength`] if a focal length is zero or not finite.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Result<Self, CameraError> {
        let intrinsic = Self { fx, fy, cx, cy };
        intrinsic.validate()?;
        Ok(intrinsic)
    }

    /// Loads intrinsics from a JSON file with the keys `fx`, `fy`, `cx` and `cy`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let content = std::fs::read_to_string(path)?;
        let intrinsic: Self = serde_json::from_str(&content)?;
        intrinsic.validate()?;
        Ok(intrinsic)
    }

    fn validate(&self) -> Result<(), CameraError> {
        let valid = |f: f64| f.is_finite() && f != 0.0;
        if !valid(self.fx) || !valid(self.fy) {
            return Err(CameraError::InvalidFocalLength(self.fx, self.fy));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_intrinsics() {
        let intrinsic = PinholeCameraIntrinsic::default();
        assert_eq!(
            intrinsic,
            PinholeCameraIntrinsic {
                fx: 90.0,
                fy: 90.0,
                cx: 90.0,
                cy: 90.0,
            }
        );
    }

    #[test]
    fn zero_focal_length() {
        assert!(matches!(
            PinholeCameraIntrinsic::new(0.0, 1.0, 0.0, 0.0),
            Err(CameraError::InvalidFocalLength(..))
        ));
    }

    #[test]
    fn from_json() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("intrinsics.json");
        std::fs::write(&path, r#"{"fx": 500.0, "fy": 510.0, "cx": 320.0, "cy": 240.0}"#)?;

        let intrinsic = PinholeCameraIntrinsic::from_json_file(&path)?;
        assert_eq!(intrinsic, PinholeCameraIntrinsic::new(500.0, 510.0, 320.0, 240.0)?);

        Ok(())
    }

    #[test]
    fn from_json_missing_key() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("intrinsics.json");
        std::fs::write(&path, r#"{"fx": 500.0}"#)?;

        assert!(matches!(
            PinholeCameraIntrinsic::from_json_file(&path),
            Err(CameraError::Json(_))
        ));

        Ok(())
    }
}
