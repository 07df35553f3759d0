#![deny(missing_docs)]
//! Image processing operations applied around the depth network.

/// Colormaps to render scalar maps as images.
pub mod colormap;

/// Image resizing: Lanczos through the `image` crate, bilinear natively.
pub mod resize;

/// Reductions over image values (min/max, percentiles).
pub mod stats;
