//! Mesh payloads and materials

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use super::bounds::Aabb;

/// Polygon mesh: vertex positions plus faces as ordered vertex-index loops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Mesh name
    pub name: String,
    /// Vertex positions in object space
    #[serde(default)]
    pub vertices: Vec<Vec3>,
    /// Faces, each a loop of indices into `vertices`
    #[serde(default)]
    pub faces: Vec<Vec<u32>>,
}

impl MeshData {
    /// Create a mesh from vertex and face data
    pub fn from_data(name: impl Into<String>, vertices: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
        }
    }

    /// Whether the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Local-space bounds of all vertices
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices).unwrap_or_else(Aabb::empty)
    }

    /// Whether every face references existing vertices
    pub fn faces_in_range(&self) -> bool {
        let count = self.vertices.len();
        self.faces
            .iter()
            .flatten()
            .all(|&index| (index as usize) < count)
    }
}

/// Surface material; only the culling mode matters to collider generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Whether back faces are culled when rendering
    #[serde(default)]
    pub backface_culling: bool,
}

impl Material {
    /// Create a material with back-face culling disabled
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backface_culling: false,
        }
    }
}
