//! Collection store
//!
//! Pipeline-level operations on named groupings. Every grouping the pipeline
//! manages is exclusive: [`CollectionStore::move_object`] unlinks an object from
//! everything it belongs to before linking it to the destination.
//!
//! Membership queries are direct (non-recursive) unless the `_recursive`
//! variants are used; nested child groupings are not searched by default.

use log::debug;

use crate::foundation::collections::{CollectionKey, ObjectKey};
use crate::scene::Scene;

/// Grouping operations used by the collider pipeline
pub trait CollectionStore {
    /// Existing grouping by name, or a new empty one linked under the scene root
    fn get_or_create(&mut self, name: &str) -> CollectionKey;

    /// Destroy every member object of the grouping, then the grouping itself
    ///
    /// Returns the number of objects removed; a missing grouping is a no-op.
    fn delete_hierarchy(&mut self, name: &str) -> usize;

    /// Unlink `object` from every grouping (and the root), then link it into `name`
    fn move_object(&mut self, name: &str, object: ObjectKey) -> CollectionKey;

    /// Direct members of a grouping; empty when the grouping does not exist
    fn members_of(&self, name: &str) -> Vec<ObjectKey>;

    /// Whether `object` is a direct member of the grouping
    fn is_direct_member_of(&self, name: &str, object: ObjectKey) -> bool;

    /// Members of a grouping and of all groupings nested under it
    fn all_members_of(&self, name: &str) -> Vec<ObjectKey>;

    /// Whether `object` is a member of the grouping or of any grouping nested under it
    fn is_member_of_recursive(&self, name: &str, object: ObjectKey) -> bool;
}

impl CollectionStore for Scene {
    fn get_or_create(&mut self, name: &str) -> CollectionKey {
        if let Some(key) = self.find_collection(name) {
            return key;
        }
        let key = self.create_collection(name);
        self.link_collection_to_root(key);
        debug!("Created collection '{}'", name);
        key
    }

    fn delete_hierarchy(&mut self, name: &str) -> usize {
        let Some(key) = self.find_collection(name) else {
            return 0;
        };
        let members = self
            .collection(key)
            .map(|c| c.objects().to_vec())
            .unwrap_or_default();
        let removed = members
            .into_iter()
            .filter(|&object| self.remove_object(object).is_some())
            .count();
        self.remove_collection(key);
        debug!("Deleted collection '{}' and {} objects", name, removed);
        removed
    }

    fn move_object(&mut self, name: &str, object: ObjectKey) -> CollectionKey {
        for collection in self.collections_of(object) {
            self.unlink_object(collection, object);
        }
        self.unlink_object_from_root(object);
        let destination = self.get_or_create(name);
        self.link_object(destination, object);
        destination
    }

    fn members_of(&self, name: &str) -> Vec<ObjectKey> {
        self.find_collection(name)
            .and_then(|key| self.collection(key))
            .map(|c| c.objects().to_vec())
            .unwrap_or_default()
    }

    fn is_direct_member_of(&self, name: &str, object: ObjectKey) -> bool {
        self.find_collection(name)
            .and_then(|key| self.collection(key))
            .is_some_and(|c| c.contains(object))
    }

    fn all_members_of(&self, name: &str) -> Vec<ObjectKey> {
        let Some(key) = self.find_collection(name) else {
            return Vec::new();
        };
        let mut members: Vec<ObjectKey> = Vec::new();
        for collection in std::iter::once(key).chain(self.descendants(key)) {
            if let Some(c) = self.collection(collection) {
                for &object in c.objects() {
                    if !members.contains(&object) {
                        members.push(object);
                    }
                }
            }
        }
        members
    }

    fn is_member_of_recursive(&self, name: &str, object: ObjectKey) -> bool {
        let Some(key) = self.find_collection(name) else {
            return false;
        };
        std::iter::once(key)
            .chain(self.descendants(key))
            .filter_map(|c| self.collection(c))
            .any(|c| c.contains(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut scene = Scene::new();
        let first = scene.get_or_create("Colliders");
        let second = scene.get_or_create("Colliders");

        assert_eq!(first, second);
        assert_eq!(scene.root().children(), &[first]);
    }

    #[test]
    fn test_delete_hierarchy_removes_members_from_scene() {
        let mut scene = Scene::new();
        let a = scene.add_object(SceneObject::new("a_collider"));
        let b = scene.add_object(SceneObject::new("b_collider"));
        scene.move_object("Colliders", a);
        scene.move_object("Colliders", b);

        assert_eq!(scene.delete_hierarchy("Colliders"), 2);
        assert_eq!(scene.object_count(), 0);
        assert!(scene.find_collection("Colliders").is_none());
        assert_eq!(scene.delete_hierarchy("Colliders"), 0);
    }

    #[test]
    fn test_move_is_exclusive() {
        let mut scene = Scene::new();
        let object = scene.add_object(SceneObject::new("Bench01"));
        scene.link_object_to_root(object);
        let decorations = scene.get_or_create("Decorations");
        let planters = scene.get_or_create("Planters");
        scene.link_object(decorations, object);
        scene.link_object(planters, object);

        scene.move_object("Colliders", object);

        assert!(scene.is_direct_member_of("Colliders", object));
        assert!(!scene.is_direct_member_of("Decorations", object));
        assert!(!scene.is_direct_member_of("Planters", object));
        assert!(!scene.root().contains(object));
        assert_eq!(scene.collections_of(object).len(), 1);
    }

    #[test]
    fn test_missing_grouping_is_empty() {
        let scene = Scene::new();
        assert!(scene.members_of("TerrainPieces").is_empty());
        assert!(scene.all_members_of("TerrainPieces").is_empty());
    }

    #[test]
    fn test_direct_membership_ignores_nested_groupings() {
        let mut scene = Scene::new();
        let planters = scene.get_or_create("Planters");
        let long = scene.create_collection("Planters_Long_A");
        scene.link_child(planters, long);
        let box_a = scene.add_object(SceneObject::new("PlanterBox_A"));
        scene.link_object(long, box_a);

        assert!(!scene.is_direct_member_of("Planters", box_a));
        assert!(scene.is_member_of_recursive("Planters", box_a));
        assert!(scene.members_of("Planters").is_empty());
        assert_eq!(scene.all_members_of("Planters"), vec![box_a]);
    }
}
