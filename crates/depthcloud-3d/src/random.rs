use rand::Rng;

use crate::pointcloud::PointCloud;

/// Generate a point cloud with coordinates drawn uniformly from `[0, 1)`.
///
/// The returned cloud carries no colors or normals.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use depthcloud_3d::random::random_pointcloud;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let pointcloud = random_pointcloud(100, &mut rng);
/// assert_eq!(pointcloud.len(), 100);
/// ```
pub fn random_pointcloud<R: Rng + ?Sized>(num_points: usize, rng: &mut R) -> PointCloud {
    let points = (0..num_points)
        .map(|_| [rng.random(), rng.random(), rng.random()])
        .collect::<Vec<[f64; 3]>>();

    PointCloud::new(points, None, None)
}
