//! Classification of generated colliders
//!
//! Decides which gameplay tags a collider gets beyond `collider`, from the
//! source grouping it was generated under, the source's membership in the
//! planter groupings, and (for terrain) its name.
//!
//! Tags are additive. Nothing here removes a tag.

use serde::{Deserialize, Serialize};

use crate::collections::CollectionStore;
use crate::core::PipelineConfig;
use crate::foundation::collections::ObjectKey;
use crate::scene::Scene;
use crate::tags::ColliderTags;

/// Tagging rule attached to a source grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupTagging {
    /// Only `collider`
    #[default]
    None,
    /// `plantable` when the source also belongs to a planter grouping
    Planters,
    /// Always `teleport`
    Traversable,
    /// `teleport`, plus `plantable` unless the name carries the road marker
    Terrain,
}

/// Whether `object` belongs to any configured planter grouping
///
/// Direct membership only unless `recursive_membership` is enabled, in which
/// case planters nested inside those groupings count too.
pub fn is_planter(scene: &Scene, object: ObjectKey, config: &PipelineConfig) -> bool {
    config.planter_collections.iter().any(|name| {
        if config.recursive_membership {
            scene.is_member_of_recursive(name, object)
        } else {
            scene.is_direct_member_of(name, object)
        }
    })
}

/// Tags to add to the collider of `source` under `tagging`, excluding `collider`
pub fn classify(
    scene: &Scene,
    source: ObjectKey,
    tagging: GroupTagging,
    config: &PipelineConfig,
) -> ColliderTags {
    match tagging {
        GroupTagging::None => ColliderTags::empty(),
        GroupTagging::Planters if is_planter(scene, source, config) => ColliderTags::PLANTABLE,
        GroupTagging::Planters => ColliderTags::empty(),
        GroupTagging::Traversable => ColliderTags::TELEPORT,
        GroupTagging::Terrain => {
            let road = scene
                .object(source)
                .is_some_and(|o| is_road(o.name(), &config.naming.road_marker));
            if road {
                ColliderTags::TELEPORT
            } else {
                ColliderTags::TELEPORT | ColliderTags::PLANTABLE
            }
        }
    }
}

fn is_road(name: &str, marker: &str) -> bool {
    !marker.is_empty() && name.contains(marker)
}
