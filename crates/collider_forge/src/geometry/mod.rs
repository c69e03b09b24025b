//! Collider synthesis
//!
//! Three builders turn a source object into a proxy object:
//!
//! - [`build_duplicate`] - verbatim copy of the source mesh, keeps concavity
//! - [`build_convex_hull`] - boundary of the convex hull of the source vertices
//! - [`build_bounding_cylinder`] - upright cylinder around the source's bounding box
//!
//! Builders are pure: they read the source object and its mesh and return an
//! owned [`ColliderProxy`]. Inserting the proxy into a scene and placing it in
//! a grouping is up to the caller. A source that is not eligible (no mesh, or
//! an externally linked object) yields `Ok(None)`, which callers treat as a
//! normal skip.

pub mod cylinder;
pub mod duplicate;
pub mod hull;

pub use cylinder::{build_bounding_cylinder, cylinder_mesh};
pub use duplicate::build_duplicate;
pub use hull::{build_convex_hull, convex_hull, HullError, HullMesh};

use serde::{Deserialize, Serialize};

use crate::core::config::PipelineConfig;
use crate::core::Naming;
use crate::foundation::collections::ObjectKey;
use crate::foundation::math::Mat4;
use crate::scene::{MeshData, Scene, SceneObject};
use crate::tags::{ColliderTags, TagSet};

/// Proxy representation to build for a source object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderKind {
    /// Exact copy of the source mesh
    #[default]
    Duplicate,
    /// Convex hull of the source vertices
    ConvexHull,
    /// Upright cylinder around the source bounds
    BoundingCylinder,
}

/// Per-object geometry failures
///
/// These never abort a batch; the pipeline records them and moves on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Too few points, or all points collinear or coplanar
    #[error("degenerate hull input for '{object}': {reason}")]
    DegenerateHull {
        /// Source object name
        object: String,
        /// What made the input degenerate
        reason: HullError,
    },

    /// A vertex coordinate is NaN or infinite
    #[error("mesh of '{object}' has a non-finite vertex at index {index}")]
    NonFiniteVertex {
        /// Source object name
        object: String,
        /// Offending vertex index
        index: usize,
    },

    /// The object's mesh handle no longer resolves
    #[error("object '{0}' references a mesh that is not in the scene")]
    MissingMesh(String),

    /// The world matrix cannot be baked (non-finite, non-affine or singular)
    #[error("object '{0}' has a transform that cannot be applied")]
    InvalidTransform(String),
}

/// A generated proxy object, not yet part of any scene
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderProxy {
    /// Requested object name, `<source-name><suffix>`
    pub name: String,
    /// Proxy geometry
    pub mesh: MeshData,
    /// World transform of the proxy
    pub matrix_world: Mat4,
    /// Tags; always includes `collider`
    pub tags: TagSet,
}

impl ColliderProxy {
    pub(crate) fn new(name: String, mesh: MeshData, matrix_world: Mat4) -> Self {
        Self {
            name,
            mesh,
            matrix_world,
            tags: TagSet::from_flags(ColliderTags::COLLIDER),
        }
    }

    /// Add the proxy and its mesh to a scene; the object is not linked anywhere
    pub fn insert_into(self, scene: &mut Scene) -> ObjectKey {
        let mesh = scene.add_mesh(self.mesh);
        scene.add_object(
            SceneObject::new(self.name)
                .with_mesh(mesh)
                .with_matrix(self.matrix_world)
                .with_tags(self.tags),
        )
    }
}

/// Whether colliders may be generated for `source`
///
/// Requires a mesh payload and a name without the external-link marker.
pub fn eligible(source: &SceneObject, mesh: Option<&MeshData>, naming: &Naming) -> bool {
    source.is_mesh() && mesh.is_some() && !naming.is_link(source.name())
}

/// Run the builder selected by `kind`
pub fn build(
    kind: ColliderKind,
    source: &SceneObject,
    mesh: Option<&MeshData>,
    config: &PipelineConfig,
) -> Result<Option<ColliderProxy>, GeometryError> {
    match kind {
        ColliderKind::Duplicate => Ok(build_duplicate(source, mesh, &config.naming)),
        ColliderKind::ConvexHull => build_convex_hull(source, mesh, &config.naming, &config.hull),
        ColliderKind::BoundingCylinder => Ok(build_bounding_cylinder(
            source,
            mesh,
            &config.naming,
            &config.cylinder,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn triangle() -> MeshData {
        MeshData::from_data(
            "Tri",
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![vec![0, 1, 2]],
        )
    }

    #[test]
    fn test_eligibility() {
        let naming = Naming::default();
        let mut scene = Scene::new();
        let mesh_key = scene.add_mesh(triangle());
        let mesh = scene.mesh(mesh_key);

        let rock = SceneObject::new("rock_07").with_mesh(mesh_key);
        let link = SceneObject::new("Fountain_gltf").with_mesh(mesh_key);
        let empty = SceneObject::new("Marker");

        assert!(eligible(&rock, mesh, &naming));
        assert!(!eligible(&link, mesh, &naming));
        assert!(!eligible(&empty, None, &naming));
    }

    #[test]
    fn test_insert_into_scene_is_unlinked() {
        let mut scene = Scene::new();
        let proxy = ColliderProxy::new("rock_07_collider".to_string(), triangle(), Mat4::identity());
        let key = proxy.insert_into(&mut scene);

        let object = scene.object(key).unwrap();
        assert_eq!(object.name(), "rock_07_collider");
        assert_eq!(object.tags.get("collider"), Some(1));
        assert!(scene.collections_of(key).is_empty());
        assert!(!scene.root().contains(key));
        assert_eq!(scene.object_mesh(key).unwrap().vertices.len(), 3);
    }
}
