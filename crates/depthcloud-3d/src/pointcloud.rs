/// A point cloud with points, colors, and normals.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
    // The colors of the points.
    colors: Option<Vec<[u8; 3]>>,
    // The normals of the points.
    normals: Option<Vec<[f64; 3]>>,
}

impl PointCloud {
    /// Create a new point cloud from points, colors (optional), and normals (optional).
    pub fn new(
        points: Vec<[f64; 3]>,
        colors: Option<Vec<[u8; 3]>>,
        normals: Option<Vec<[f64; 3]>>,
    ) -> Self {
        Self {
            points,
            colors,
            normals,
        }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> Option<&[[u8; 3]]> {
        self.colors.as_deref()
    }

    /// Get as reference the normals of the points in the point cloud.
    pub fn normals(&self) -> Option<&[[f64; 3]]> {
        self.normals.as_deref()
    }

    /// Get the per-axis minimum of the points, or `None` if the cloud is empty.
    pub fn min_bound(&self) -> Option<[f64; 3]> {
        self.fold_bound(f64::min)
    }

    /// Get the per-axis maximum of the points, or `None` if the cloud is empty.
    pub fn max_bound(&self) -> Option<[f64; 3]> {
        self.fold_bound(f64::max)
    }

    fn fold_bound(&self, f: impl Fn(f64, f64) -> f64) -> Option<[f64; 3]> {
        let (first, rest) = self.points.split_first()?;
        Some(rest.iter().fold(*first, |acc, p| {
            [f(acc[0], p[0]), f(acc[1], p[1]), f(acc[2], p[2])]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointcloud() {
        let pointcloud = PointCloud::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            Some(vec![[255, 0, 0], [0, 255, 0]]),
            Some(vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
        );

        assert_eq!(pointcloud.len(), 2);
        assert!(!pointcloud.is_empty());
        assert_eq!(pointcloud.colors().map(|c| c.len()), Some(2));
        assert_eq!(pointcloud.normals().map(|n| n.len()), Some(2));
        assert_eq!(pointcloud.points()[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bounds() {
        let pointcloud = PointCloud::new(
            vec![[0.5, -1.0, 2.0], [1.0, 3.0, -2.0], [-0.5, 0.0, 0.0]],
            None,
            None,
        );

        assert_eq!(pointcloud.min_bound(), Some([-0.5, -1.0, -2.0]));
        assert_eq!(pointcloud.max_bound(), Some([1.0, 3.0, 2.0]));
    }

    #[test]
    fn test_empty_bounds() {
        let pointcloud = PointCloud::new(vec![], None, None);
        assert!(pointcloud.is_empty());
        assert_eq!(pointcloud.min_bound(), None);
    }
}
