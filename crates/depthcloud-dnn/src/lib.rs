#![deny(missing_docs)]
//! Deep learning models for depth estimation.

mod error;
pub use error::MonodepthError;

/// Encoder/decoder monocular depth network.
pub mod monodepth;
pub use monodepth::{Monodepth, MonodepthConfig};
