//! Transform baking
//!
//! Moves the rotation and scale of an object's world matrix into its vertex
//! positions so only the translation is left on the object.

use crate::foundation::collections::ObjectKey;
use crate::foundation::math::{is_valid_affine, linear_part, translation_of, Mat3, Mat4};
use crate::geometry::GeometryError;
use crate::scene::{MeshData, Scene};

/// Transform every vertex by `linear`
///
/// A mirroring transform flips face winding so faces keep pointing outward.
pub fn apply_linear(mesh: &mut MeshData, linear: &Mat3) {
    for vertex in &mut mesh.vertices {
        *vertex = linear * *vertex;
    }
    if linear.determinant() < 0.0 {
        for face in &mut mesh.faces {
            face.reverse();
        }
    }
}

/// Bake rotation and scale of `key` into its mesh
///
/// A mesh shared with other objects is copied first so they are unaffected.
/// Returns `Ok(false)` when the object is gone or already has no rotation
/// or scale.
pub fn bake_transform(scene: &mut Scene, key: ObjectKey) -> Result<bool, GeometryError> {
    let Some(object) = scene.object(key) else {
        return Ok(false);
    };
    let matrix = object.matrix_world;
    if !is_valid_affine(&matrix) {
        return Err(GeometryError::InvalidTransform(object.name().to_string()));
    }
    let linear = linear_part(&matrix);
    if linear == Mat3::identity() {
        return Ok(false);
    }

    if let Some(mesh) = scene.make_single_user(key) {
        if let Some(data) = scene.mesh_mut(mesh) {
            apply_linear(data, &linear);
        }
    }
    if let Some(object) = scene.object_mut(key) {
        object.matrix_world = Mat4::new_translation(&translation_of(&matrix));
    }
    Ok(true)
}
