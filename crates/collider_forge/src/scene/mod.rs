//! Scene graph document
//!
//! The document the collider pipeline runs against: objects, mesh payloads,
//! materials and named collections, each stored in its own slot-map arena.
//! Names are unique per arena; asking for a taken name yields the next free
//! `name.001`-style variant, the way authoring hosts resolve clashes.
//!
//! The scene has one unnamed root collection. Named collections are linked
//! under it (or under each other) and objects may be linked either to the root
//! or to any number of named collections.

pub mod bounds;
pub mod collection;
pub mod file;
pub mod mesh;
pub mod object;

pub use bounds::Aabb;
pub use collection::Collection;
pub use file::SceneFile;
pub use mesh::{Material, MeshData};
pub use object::SceneObject;

use std::collections::HashMap;

use log::trace;

use crate::foundation::collections::{
    CollectionKey, MaterialKey, MeshKey, MeshMap, ObjectKey, ObjectMap, SlotMap,
};
use crate::foundation::math::Vec3;

/// Scene document errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An object references a mesh that does not exist
    #[error("object '{object}' references unknown mesh '{mesh}'")]
    UnknownMesh {
        /// Referencing object
        object: String,
        /// Missing mesh name
        mesh: String,
    },

    /// An object references a material that does not exist
    #[error("object '{object}' references unknown material '{material}'")]
    UnknownMaterial {
        /// Referencing object
        object: String,
        /// Missing material name
        material: String,
    },

    /// A collection references an object or child collection that does not exist
    #[error("collection '{collection}' references unknown member '{member}'")]
    UnknownMember {
        /// Referencing collection
        collection: String,
        /// Missing member name
        member: String,
    },

    /// Two entries share a name that must be unique
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName {
        /// Entry kind (object, mesh, material, collection)
        kind: &'static str,
        /// Clashing name
        name: String,
    },

    /// A face indexes past the end of its vertex list
    #[error("mesh '{0}' has a face referencing a missing vertex")]
    FaceOutOfRange(String),
}

/// In-memory scene graph
#[derive(Debug, Default)]
pub struct Scene {
    objects: ObjectMap<SceneObject>,
    meshes: MeshMap<MeshData>,
    materials: SlotMap<MaterialKey, Material>,
    collections: SlotMap<CollectionKey, Collection>,
    root: Collection,
    object_names: HashMap<String, ObjectKey>,
    mesh_names: HashMap<String, MeshKey>,
    material_names: HashMap<String, MaterialKey>,
    collection_names: HashMap<String, CollectionKey>,
}

/// First free variant of `base` (`base`, `base.001`, `base.002`, ...)
fn unique_name<V>(names: &HashMap<String, V>, base: &str) -> String {
    if !names.contains_key(base) {
        return base.to_string();
    }
    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}.{counter:03}");
        if !names.contains_key(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Add an object; returns its handle. The object is not linked anywhere.
    pub fn add_object(&mut self, mut object: SceneObject) -> ObjectKey {
        object.name = unique_name(&self.object_names, &object.name);
        let name = object.name.clone();
        let key = self.objects.insert(object);
        self.object_names.insert(name, key);
        key
    }

    /// Remove an object from the scene entirely
    ///
    /// The object is unlinked from every collection, and its mesh is freed
    /// when no other object uses it.
    pub fn remove_object(&mut self, key: ObjectKey) -> Option<SceneObject> {
        let object = self.objects.remove(key)?;
        self.object_names.remove(&object.name);
        self.root.unlink(key);
        for collection in self.collections.values_mut() {
            collection.unlink(key);
        }
        if let Some(mesh) = object.data {
            if self.mesh_users(mesh) == 0 {
                if let Some(data) = self.meshes.remove(mesh) {
                    trace!("Freed orphaned mesh '{}'", data.name);
                    self.mesh_names.remove(&data.name);
                }
            }
        }
        Some(object)
    }

    /// Look up an object
    pub fn object(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Look up an object for editing
    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    /// Find an object by name
    pub fn find_object(&self, name: &str) -> Option<ObjectKey> {
        self.object_names.get(name).copied()
    }

    /// Iterate over all objects in the document
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    /// Number of objects in the document
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // ------------------------------------------------------------------
    // Meshes and materials
    // ------------------------------------------------------------------

    /// Add a mesh payload; the name is made unique
    pub fn add_mesh(&mut self, mut mesh: MeshData) -> MeshKey {
        mesh.name = unique_name(&self.mesh_names, &mesh.name);
        let name = mesh.name.clone();
        let key = self.meshes.insert(mesh);
        self.mesh_names.insert(name, key);
        key
    }

    /// Look up a mesh
    pub fn mesh(&self, key: MeshKey) -> Option<&MeshData> {
        self.meshes.get(key)
    }

    /// Look up a mesh for editing
    pub fn mesh_mut(&mut self, key: MeshKey) -> Option<&mut MeshData> {
        self.meshes.get_mut(key)
    }

    /// Mesh payload of an object, if it has one
    pub fn object_mesh(&self, key: ObjectKey) -> Option<&MeshData> {
        self.objects.get(key)?.data.and_then(|mesh| self.meshes.get(mesh))
    }

    /// Find a mesh by name
    pub fn find_mesh(&self, name: &str) -> Option<MeshKey> {
        self.mesh_names.get(name).copied()
    }

    /// Number of mesh payloads in the document
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of objects using a mesh
    pub fn mesh_users(&self, mesh: MeshKey) -> usize {
        self.objects.values().filter(|o| o.data == Some(mesh)).count()
    }

    /// Give an object its own copy of a shared mesh
    ///
    /// Returns the mesh the object uses afterwards.
    pub fn make_single_user(&mut self, key: ObjectKey) -> Option<MeshKey> {
        let mesh = self.objects.get(key)?.data?;
        if self.mesh_users(mesh) <= 1 {
            return Some(mesh);
        }
        let copy = self.meshes.get(mesh)?.clone();
        let copy_key = self.add_mesh(copy);
        if let Some(object) = self.objects.get_mut(key) {
            object.data = Some(copy_key);
        }
        Some(copy_key)
    }

    /// Add a material; the name is made unique
    pub fn add_material(&mut self, mut material: Material) -> MaterialKey {
        material.name = unique_name(&self.material_names, &material.name);
        let name = material.name.clone();
        let key = self.materials.insert(material);
        self.material_names.insert(name, key);
        key
    }

    /// Find a material by name
    pub fn find_material(&self, name: &str) -> Option<MaterialKey> {
        self.material_names.get(name).copied()
    }

    /// Look up a material
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Look up a material for editing
    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// Find a collection by name
    pub fn find_collection(&self, name: &str) -> Option<CollectionKey> {
        self.collection_names.get(name).copied()
    }

    /// Look up a collection
    pub fn collection(&self, key: CollectionKey) -> Option<&Collection> {
        self.collections.get(key)
    }

    /// The unnamed root collection
    pub fn root(&self) -> &Collection {
        &self.root
    }

    /// Create a collection; it is not linked under the root yet
    pub fn create_collection(&mut self, name: &str) -> CollectionKey {
        let name = unique_name(&self.collection_names, name);
        let key = self.collections.insert(Collection::new(name.clone()));
        self.collection_names.insert(name, key);
        key
    }

    /// Link a collection under the scene root
    pub fn link_collection_to_root(&mut self, key: CollectionKey) -> bool {
        if !self.collections.contains_key(key) || self.root.children.contains(&key) {
            return false;
        }
        self.root.children.push(key);
        true
    }

    /// Nest `child` under `parent`
    ///
    /// Refuses links that would create a cycle.
    pub fn link_child(&mut self, parent: CollectionKey, child: CollectionKey) -> bool {
        if parent == child
            || !self.collections.contains_key(child)
            || self.descendants(child).contains(&parent)
        {
            return false;
        }
        match self.collections.get_mut(parent) {
            Some(collection) if !collection.children.contains(&child) => {
                collection.children.push(child);
                true
            }
            _ => false,
        }
    }

    /// Remove a collection; member objects stay in the scene
    ///
    /// Child collections that lose their only parent are re-linked to the root.
    pub fn remove_collection(&mut self, key: CollectionKey) -> Option<Collection> {
        let collection = self.collections.remove(key)?;
        self.collection_names.remove(&collection.name);
        self.root.children.retain(|&c| c != key);
        for other in self.collections.values_mut() {
            other.children.retain(|&c| c != key);
        }
        for &child in &collection.children {
            if !self.has_parent(child) {
                self.root.children.push(child);
            }
        }
        Some(collection)
    }

    /// Link an object into a collection
    pub fn link_object(&mut self, collection: CollectionKey, object: ObjectKey) -> bool {
        if !self.objects.contains_key(object) {
            return false;
        }
        self.collections
            .get_mut(collection)
            .is_some_and(|c| c.link(object))
    }

    /// Unlink an object from a collection
    pub fn unlink_object(&mut self, collection: CollectionKey, object: ObjectKey) -> bool {
        self.collections
            .get_mut(collection)
            .is_some_and(|c| c.unlink(object))
    }

    /// Link an object directly under the scene root
    pub fn link_object_to_root(&mut self, object: ObjectKey) -> bool {
        self.objects.contains_key(object) && self.root.link(object)
    }

    /// Unlink an object from the scene root
    pub fn unlink_object_from_root(&mut self, object: ObjectKey) -> bool {
        self.root.unlink(object)
    }

    /// Named collections the object is a direct member of
    pub fn collections_of(&self, object: ObjectKey) -> Vec<CollectionKey> {
        self.collections
            .iter()
            .filter(|(_, c)| c.contains(object))
            .map(|(key, _)| key)
            .collect()
    }

    /// All collections nested under `key`, depth first, excluding `key`
    pub fn descendants(&self, key: CollectionKey) -> Vec<CollectionKey> {
        let mut found = Vec::new();
        let mut stack: Vec<CollectionKey> = self
            .collections
            .get(key)
            .map(|c| c.children.clone())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if found.contains(&next) {
                continue;
            }
            found.push(next);
            if let Some(c) = self.collections.get(next) {
                stack.extend(c.children.iter().rev().copied());
            }
        }
        found
    }

    fn has_parent(&self, key: CollectionKey) -> bool {
        self.root.children.contains(&key)
            || self.collections.values().any(|c| c.children.contains(&key))
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    /// Local-space bounding box of an object's geometry
    pub fn local_bounds(&self, key: ObjectKey) -> Aabb {
        self.object_mesh(key).map_or_else(Aabb::empty, MeshData::bounds)
    }

    /// The 8 local-space bounding box corners of an object
    pub fn bound_box(&self, key: ObjectKey) -> [Vec3; 8] {
        self.local_bounds(key).corners()
    }

    /// Object dimensions: local bounding box size scaled by the world transform
    pub fn dimensions(&self, key: ObjectKey) -> Vec3 {
        self.objects
            .get(key)
            .map_or_else(Vec3::zeros, |o| self.local_bounds(key).dimensions(&o.matrix_world))
    }

    /// World-space center of an object's bounding box
    pub fn bbox_center_world(&self, key: ObjectKey) -> Vec3 {
        self.objects
            .get(key)
            .map_or_else(Vec3::zeros, |o| self.local_bounds(key).world_center(&o.matrix_world))
    }
}
