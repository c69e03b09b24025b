//! Named object groupings

use crate::foundation::collections::{CollectionKey, ObjectKey};

/// A named, host-managed set of objects
///
/// Membership is kept in insertion order so iteration is stable within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub(super) name: String,
    pub(super) objects: Vec<ObjectKey>,
    pub(super) children: Vec<CollectionKey>,
}

impl Collection {
    pub(super) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct member objects
    pub fn objects(&self) -> &[ObjectKey] {
        &self.objects
    }

    /// Nested child collections
    pub fn children(&self) -> &[CollectionKey] {
        &self.children
    }

    /// Whether the object is a direct member
    pub fn contains(&self, object: ObjectKey) -> bool {
        self.objects.contains(&object)
    }

    pub(super) fn link(&mut self, object: ObjectKey) -> bool {
        if self.contains(object) {
            return false;
        }
        self.objects.push(object);
        true
    }

    pub(super) fn unlink(&mut self, object: ObjectKey) -> bool {
        let before = self.objects.len();
        self.objects.retain(|&o| o != object);
        self.objects.len() != before
    }
}
