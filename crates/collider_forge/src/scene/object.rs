//! Scene objects

use crate::foundation::collections::{MaterialKey, MeshKey};
use crate::foundation::math::{Mat4, Vec3};
use crate::tags::TagSet;

/// An entity in the scene graph
///
/// The name is owned by the [`Scene`](super::Scene), which keeps it unique;
/// everything else may be edited freely through `Scene::object_mut`.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub(super) name: String,
    /// Mesh payload, `None` for transform-only objects
    pub data: Option<MeshKey>,
    /// Local-to-world affine transform
    pub matrix_world: Mat4,
    /// Visibility flag
    pub visible: bool,
    /// Active material
    pub material: Option<MaterialKey>,
    /// Custom tags
    pub tags: TagSet,
}

impl SceneObject {
    /// Create a visible, transform-only object at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
            matrix_world: Mat4::identity(),
            visible: true,
            material: None,
            tags: TagSet::new(),
        }
    }

    /// Attach a mesh payload
    pub fn with_mesh(mut self, mesh: MeshKey) -> Self {
        self.data = Some(mesh);
        self
    }

    /// Set the world transform
    pub fn with_matrix(mut self, matrix: Mat4) -> Self {
        self.matrix_world = matrix;
        self
    }

    /// Set the world transform to a pure translation
    pub fn with_location(mut self, location: Vec3) -> Self {
        self.matrix_world = Mat4::new_translation(&location);
        self
    }

    /// Set the active material
    pub fn with_material(mut self, material: MaterialKey) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the custom tags
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    /// Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Unique object name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the object carries a mesh payload
    pub fn is_mesh(&self) -> bool {
        self.data.is_some()
    }
}
