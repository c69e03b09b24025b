//! Axis-aligned bounding boxes

use crate::foundation::math::{scale_of, Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box in an object's local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box at the origin, used for objects without geometry
    pub fn empty() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }

    /// Smallest box containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(*first, *first);
        for point in rest {
            bounds.min = bounds.min.inf(point);
            bounds.max = bounds.max.sup(point);
        }
        Some(bounds)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Size once placed by `matrix`: local size times the matrix's per-axis scale
    pub fn dimensions(&self, matrix: &Mat4) -> Vec3 {
        self.size().component_mul(&scale_of(matrix))
    }

    /// Center once placed by `matrix`
    pub fn world_center(&self, matrix: &Mat4) -> Vec3 {
        matrix.transform_point(&Point3::from(self.center())).coords
    }

    /// The 8 corner points, bottom face first
    ///
    /// Order: (-x,-y,-z), (-x,-y,+z), (-x,+y,+z), (-x,+y,-z),
    /// (+x,-y,-z), (+x,-y,+z), (+x,+y,+z), (+x,+y,-z).
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
        ]
    }
}
