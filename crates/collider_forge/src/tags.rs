//! Semantic tags attached to scene objects
//!
//! Downstream consumers read tags as `key -> value` pairs. The keys this crate
//! produces are a closed set ([`ColliderTags`]); anything else an authoring tool
//! or a scene file carries survives in an open map so it round-trips untouched.

use bitflags::bitflags;
use std::collections::BTreeMap;

/// Value written for every tag this crate sets
pub const DEFAULT_TAG_VALUE: i64 = 1;

bitflags! {
    /// Tags produced by collider generation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColliderTags: u8 {
        /// Object is a generated collision proxy
        const COLLIDER = 1 << 0;
        /// Players can plant on this surface
        const PLANTABLE = 1 << 1;
        /// Players can teleport onto this surface
        const TELEPORT = 1 << 2;
    }
}

impl ColliderTags {
    const KEYS: [(Self, &'static str); 3] = [
        (Self::COLLIDER, "collider"),
        (Self::PLANTABLE, "plantable"),
        (Self::TELEPORT, "teleport"),
    ];

    /// Flag for a well-known tag key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::KEYS.iter().find(|(_, name)| *name == key).map(|(flag, _)| *flag)
    }

    /// Keys of all set flags, in declaration order
    pub fn keys(self) -> impl Iterator<Item = &'static str> {
        Self::KEYS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

/// Tag mapping of a single object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    flags: ColliderTags,
    extra: BTreeMap<String, i64>,
}

impl TagSet {
    /// Empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag set holding the given well-known tags
    pub fn from_flags(flags: ColliderTags) -> Self {
        Self { flags, extra: BTreeMap::new() }
    }

    /// Well-known tags currently set
    pub fn flags(&self) -> ColliderTags {
        self.flags
    }

    /// Add well-known tags; tags are never removed by this
    pub fn insert_flags(&mut self, flags: ColliderTags) {
        self.flags |= flags;
    }

    /// Set a tag with the default value
    pub fn insert(&mut self, key: &str) {
        self.insert_value(key, DEFAULT_TAG_VALUE);
    }

    /// Set a tag with an explicit value
    ///
    /// Well-known keys only store the default value; other values for them
    /// are kept in the open map.
    pub fn insert_value(&mut self, key: &str, value: i64) {
        match ColliderTags::from_key(key) {
            Some(flag) if value == DEFAULT_TAG_VALUE => {
                self.flags |= flag;
                self.extra.remove(key);
            }
            Some(flag) => {
                self.flags.remove(flag);
                self.extra.insert(key.to_string(), value);
            }
            None => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Whether every given well-known tag is set
    pub fn contains(&self, flags: ColliderTags) -> bool {
        self.flags.contains(flags)
    }

    /// Value of a tag, if present
    pub fn get(&self, key: &str) -> Option<i64> {
        match ColliderTags::from_key(key) {
            Some(flag) if self.flags.contains(flag) => Some(DEFAULT_TAG_VALUE),
            _ => self.extra.get(key).copied(),
        }
    }

    /// Number of tags set
    pub fn len(&self) -> usize {
        self.flags.iter().count() + self.extra.len()
    }

    /// Whether no tag is set
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.extra.is_empty()
    }

    /// Flatten into a plain key/value map
    pub fn to_map(&self) -> BTreeMap<String, i64> {
        let mut map = self.extra.clone();
        for key in self.flags.keys() {
            map.insert(key.to_string(), DEFAULT_TAG_VALUE);
        }
        map
    }

    /// Build from a plain key/value map
    pub fn from_map(map: &BTreeMap<String, i64>) -> Self {
        let mut tags = Self::new();
        for (key, value) in map {
            tags.insert_value(key, *value);
        }
        tags
    }
}

impl From<ColliderTags> for TagSet {
    fn from(flags: ColliderTags) -> Self {
        Self::from_flags(flags)
    }
}
