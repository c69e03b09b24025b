//! Bounding cylinder builder
//!
//! An upright cylinder sized from the source's world-space bounding box.
//! The radius is a quarter of the summed horizontal extents, so for a square
//! footprint the cylinder is the one inscribed in the box.

use crate::core::{CylinderConfig, Naming};
use crate::foundation::math::{constants::TAU, Mat4, Vec3};
use crate::scene::{MeshData, SceneObject};

use super::{eligible, ColliderProxy};

/// Closed cylinder mesh centered on the origin with its axis along +Z
///
/// Vertices are a bottom ring followed by a top ring. Sides are quads, caps
/// are single n-gons, all wound counter-clockwise seen from outside.
/// `segments` is clamped to `3..=CylinderConfig::MAX_SEGMENTS`.
pub fn cylinder_mesh(name: impl Into<String>, radius: f32, depth: f32, segments: u32) -> MeshData {
    let segments = segments.clamp(3, CylinderConfig::MAX_SEGMENTS);
    let half = depth * 0.5;

    let ring = |z: f32| {
        (0..segments).map(move |i| {
            let angle = TAU * i as f32 / segments as f32;
            Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
        })
    };
    let vertices: Vec<Vec3> = ring(-half).chain(ring(half)).collect();

    let mut faces: Vec<Vec<u32>> = (0..segments)
        .map(|i| {
            let next = (i + 1) % segments;
            vec![i, next, segments + next, segments + i]
        })
        .collect();
    faces.push((segments..2 * segments).collect());
    faces.push((0..segments).rev().collect());

    MeshData::from_data(name, vertices, faces)
}

/// Build an upright cylinder around the source's bounding box
///
/// `radius = (dx + dy) / radius_divisor`, `depth = dz + height_buffer`, where
/// the `d` values are the world-space dimensions. The proxy sits at the
/// world-space center of the box with no rotation or scale.
pub fn build_bounding_cylinder(
    source: &SceneObject,
    mesh: Option<&MeshData>,
    naming: &Naming,
    config: &CylinderConfig,
) -> Option<ColliderProxy> {
    if !eligible(source, mesh, naming) {
        return None;
    }
    let bounds = mesh?.bounds();
    let dimensions = bounds.dimensions(&source.matrix_world);
    let center = bounds.world_center(&source.matrix_world);

    let radius = (dimensions.x + dimensions.y) / config.radius_divisor;
    let depth = dimensions.z + config.height_buffer;
    let name = naming.collider_name(source.name());

    Some(ColliderProxy::new(
        name.clone(),
        cylinder_mesh(name, radius, depth, config.segments),
        Mat4::new_translation(&center),
    ))
}
