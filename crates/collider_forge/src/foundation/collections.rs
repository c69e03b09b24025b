//! Handle types for the scene arenas
//!
//! Every arena in [`Scene`](crate::scene::Scene) is a slot map, so handles stay
//! valid (and detectably stale) across removals.

pub use slotmap::{SlotMap, Key};

slotmap::new_key_type! {
    /// Handle to a scene object
    pub struct ObjectKey;

    /// Handle to a mesh payload
    pub struct MeshKey;

    /// Handle to a material
    pub struct MaterialKey;

    /// Handle to a named collection (grouping)
    pub struct CollectionKey;
}

/// Handle-based map for scene objects
pub type ObjectMap<T> = SlotMap<ObjectKey, T>;

/// Handle-based map for mesh payloads
pub type MeshMap<T> = SlotMap<MeshKey, T>;
