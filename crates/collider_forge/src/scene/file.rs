//! Serializable scene snapshots
//!
//! A [`SceneFile`] is the on-disk form of a [`Scene`]: flat lists keyed by name
//! instead of handles. It loads and saves through the [`Config`] trait, so
//! `.toml` and `.ron` both work.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::collections::{CollectionKey, ObjectKey};
use crate::foundation::math::Mat4;
use crate::tags::TagSet;

use super::{Material, MeshData, Scene, SceneError, SceneObject};

fn identity() -> Mat4 {
    Mat4::identity()
}

fn visible() -> bool {
    true
}

/// One object entry of a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Unique object name
    pub name: String,
    /// Name of the mesh payload, if any
    #[serde(default)]
    pub mesh: Option<String>,
    /// Name of the active material, if any
    #[serde(default)]
    pub material: Option<String>,
    /// Local-to-world transform, column-major
    #[serde(default = "identity")]
    pub matrix_world: Mat4,
    /// Visibility flag
    #[serde(default = "visible")]
    pub visible: bool,
    /// Custom tags
    #[serde(default)]
    pub tags: BTreeMap<String, i64>,
}

/// One collection entry of a scene file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    /// Unique collection name
    pub name: String,
    /// Names of direct member objects
    #[serde(default)]
    pub objects: Vec<String>,
    /// Names of nested child collections
    #[serde(default)]
    pub children: Vec<String>,
}

/// Name-keyed snapshot of a whole scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Materials
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Mesh payloads
    #[serde(default)]
    pub meshes: Vec<MeshData>,
    /// Objects
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
    /// Collections; those that are nobody's child hang off the root
    #[serde(default)]
    pub collections: Vec<CollectionEntry>,
    /// Objects linked directly under the root
    #[serde(default)]
    pub root_objects: Vec<String>,
}

impl Config for SceneFile {}

fn check_unique<'a>(kind: &'static str, names: impl Iterator<Item = &'a str>) -> Result<(), SceneError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(SceneError::DuplicateName { kind, name: name.to_string() });
        }
    }
    Ok(())
}

impl Scene {
    /// Build a scene from a snapshot
    pub fn from_file(file: &SceneFile) -> Result<Self, SceneError> {
        check_unique("material", file.materials.iter().map(|m| m.name.as_str()))?;
        check_unique("mesh", file.meshes.iter().map(|m| m.name.as_str()))?;
        check_unique("object", file.objects.iter().map(|o| o.name.as_str()))?;
        check_unique("collection", file.collections.iter().map(|c| c.name.as_str()))?;

        let mut scene = Self::new();
        for material in &file.materials {
            scene.add_material(material.clone());
        }
        for mesh in &file.meshes {
            if !mesh.faces_in_range() {
                return Err(SceneError::FaceOutOfRange(mesh.name.clone()));
            }
            scene.add_mesh(mesh.clone());
        }

        for entry in &file.objects {
            let mut object = SceneObject::new(entry.name.clone())
                .with_matrix(entry.matrix_world)
                .with_visible(entry.visible)
                .with_tags(TagSet::from_map(&entry.tags));
            if let Some(mesh) = &entry.mesh {
                let key = scene.find_mesh(mesh).ok_or_else(|| SceneError::UnknownMesh {
                    object: entry.name.clone(),
                    mesh: mesh.clone(),
                })?;
                object = object.with_mesh(key);
            }
            if let Some(material) = &entry.material {
                let key = scene.find_material(material).ok_or_else(|| {
                    SceneError::UnknownMaterial {
                        object: entry.name.clone(),
                        material: material.clone(),
                    }
                })?;
                object = object.with_material(key);
            }
            scene.add_object(object);
        }

        for entry in &file.collections {
            scene.create_collection(&entry.name);
        }
        for entry in &file.collections {
            let Some(key) = scene.find_collection(&entry.name) else {
                continue;
            };
            for member in &entry.objects {
                let object = scene.find_object(member).ok_or_else(|| SceneError::UnknownMember {
                    collection: entry.name.clone(),
                    member: member.clone(),
                })?;
                scene.link_object(key, object);
            }
            for child in &entry.children {
                let child_key = scene.find_collection(child).ok_or_else(|| SceneError::UnknownMember {
                    collection: entry.name.clone(),
                    member: child.clone(),
                })?;
                scene.link_child(key, child_key);
            }
        }
        for entry in &file.collections {
            if let Some(key) = scene.find_collection(&entry.name) {
                if !scene.has_parent(key) {
                    scene.link_collection_to_root(key);
                }
            }
        }

        for name in &file.root_objects {
            let object = scene.find_object(name).ok_or_else(|| SceneError::UnknownMember {
                collection: "<root>".to_string(),
                member: name.clone(),
            })?;
            scene.link_object_to_root(object);
        }

        Ok(scene)
    }

    /// Snapshot the scene
    pub fn to_file(&self) -> SceneFile {
        let object_name = |key: ObjectKey| self.object(key).map(|o| o.name().to_string());
        let collection_name = |key: CollectionKey| self.collection(key).map(|c| c.name().to_string());

        let mut materials: Vec<Material> = self.materials.values().cloned().collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        let mut meshes: Vec<MeshData> = self.meshes.values().cloned().collect();
        meshes.sort_by(|a, b| a.name.cmp(&b.name));

        let objects = self
            .objects()
            .map(|(_, object)| ObjectEntry {
                name: object.name().to_string(),
                mesh: object.data.and_then(|k| self.mesh(k)).map(|m| m.name.clone()),
                material: object.material.and_then(|k| self.material(k)).map(|m| m.name.clone()),
                matrix_world: object.matrix_world,
                visible: object.visible,
                tags: object.tags.to_map(),
            })
            .collect();

        let collections = self
            .collections
            .values()
            .map(|collection| CollectionEntry {
                name: collection.name().to_string(),
                objects: collection.objects().iter().filter_map(|&k| object_name(k)).collect(),
                children: collection.children().iter().filter_map(|&k| collection_name(k)).collect(),
            })
            .collect();

        SceneFile {
            materials,
            meshes,
            objects,
            collections,
            root_objects: self.root.objects().iter().filter_map(|&k| object_name(k)).collect(),
        }
    }
}
