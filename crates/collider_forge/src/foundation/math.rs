//! Math utilities and types
//!
//! Provides the math types used by the scene model and the geometry builders.
//! World matrices are column-vector affine `Mat4`s; the upper-left 3x3 block
//! holds rotation and scale, the last column holds the translation.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Transform {
    /// Create a transform from position, rotation and scale
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Upper-left 3x3 block (rotation and scale) of an affine matrix
pub fn linear_part(matrix: &Mat4) -> Mat3 {
    matrix.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Per-axis scale of an affine matrix (column lengths)
pub fn scale_of(matrix: &Mat4) -> Vec3 {
    let linear = linear_part(matrix);
    Vec3::new(
        linear.column(0).magnitude(),
        linear.column(1).magnitude(),
        linear.column(2).magnitude(),
    )
}

/// Whether the matrix is a finite affine transform with an invertible linear part
///
/// Singularity is judged relative to the column lengths, so a uniformly tiny
/// scale (e.g. millimetre units) is still valid while a collapsed axis is not.
pub fn is_valid_affine(matrix: &Mat4) -> bool {
    if matrix.iter().any(|v| !v.is_finite()) {
        return false;
    }
    let bottom_row_ok = matrix.m41 == 0.0 && matrix.m42 == 0.0 && matrix.m43 == 0.0 && matrix.m44 == 1.0;
    if !bottom_row_ok {
        return false;
    }
    let det = linear_part(matrix).determinant();
    let volume = scale_of(matrix).product();
    det.is_normal() && volume.is_normal() && det.abs() > f32::EPSILON * volume
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}
