//! Duplicate builder
//!
//! Used for organic sources (rocks, foliage, terrain) whose concavity a hull
//! would smooth over.

use crate::core::Naming;
use crate::scene::{MeshData, SceneObject};

use super::{eligible, ColliderProxy};

/// Copy the source mesh verbatim into a new proxy
///
/// The proxy keeps the source transform; its mesh is named `"<mesh> collider"`.
pub fn build_duplicate(
    source: &SceneObject,
    mesh: Option<&MeshData>,
    naming: &Naming,
) -> Option<ColliderProxy> {
    if !eligible(source, mesh, naming) {
        return None;
    }
    let mesh = mesh?;
    let copy = MeshData::from_data(
        format!("{} collider", mesh.name),
        mesh.vertices.clone(),
        mesh.faces.clone(),
    );
    Some(ColliderProxy::new(
        naming.collider_name(source.name()),
        copy,
        source.matrix_world,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::{MeshKey, SlotMap};
    use crate::foundation::math::{Mat4, Vec3};
    use crate::tags::ColliderTags;

    fn concave_l() -> MeshData {
        MeshData::from_data(
            "L",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 2.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3, 4, 5]],
        )
    }

    #[test]
    fn test_duplicate_copies_geometry_and_transform() {
        let mut meshes: SlotMap<MeshKey, MeshData> = SlotMap::with_key();
        let key = meshes.insert(concave_l());
        let matrix = Mat4::new_translation(&Vec3::new(3.0, 0.0, -1.0));
        let source = SceneObject::new("rock_07").with_mesh(key).with_matrix(matrix);

        let proxy = build_duplicate(&source, meshes.get(key), &Naming::default()).unwrap();

        assert_eq!(proxy.name, "rock_07_collider");
        assert_eq!(proxy.mesh.name, "L collider");
        assert_eq!(proxy.mesh.vertices, concave_l().vertices);
        assert_eq!(proxy.mesh.faces, concave_l().faces);
        assert_eq!(proxy.matrix_world, matrix);
        assert_eq!(proxy.tags.flags(), ColliderTags::COLLIDER);
    }

    #[test]
    fn test_duplicate_skips_ineligible_sources() {
        let mut meshes: SlotMap<MeshKey, MeshData> = SlotMap::with_key();
        let key = meshes.insert(concave_l());
        let link = SceneObject::new("Gazebo_gltf").with_mesh(key);

        assert!(build_duplicate(&link, meshes.get(key), &Naming::default()).is_none());
        assert!(build_duplicate(&SceneObject::new("Empty"), None, &Naming::default()).is_none());
    }
}
