#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pinhole camera intrinsics.
pub mod camera;

/// I/O utilities for reading and writing 3D data.
pub mod io;

/// Point cloud container.
pub mod pointcloud;

/// Random point cloud generation.
pub mod random;

/// Unprojection of disparity maps to camera-space points.
pub mod unproject;
