//! Monocular depth estimation and point cloud utilities.
//!
//! This crate re-exports the `depthcloud-*` crates under short module names.

#[doc(inline)]
pub use depthcloud_image as image;

#[doc(inline)]
pub use depthcloud_imgproc as imgproc;

#[doc(inline)]
pub use depthcloud_io as io;

#[doc(inline)]
pub use depthcloud_3d as k3d;

#[doc(inline)]
pub use depthcloud_dnn as dnn;
