#![deny(missing_docs)]
//! Image types and basic pixel operations used across the depthcloud crates.

/// Error types for the image module.
pub mod error;

/// Image representation for computer vision purposes.
pub mod image;

/// Image operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
