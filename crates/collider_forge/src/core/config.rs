//! # Pipeline Configuration
//!
//! Every constant the collider pipeline depends on lives here: which source
//! groupings are processed and in what order, which builder each uses, the
//! name markers of the legacy naming convention, and the primitive sizing
//! parameters. Defaults reproduce the garden environment's conventions.
//!
//! ## Format
//!
//! `PipelineConfig` implements [`Config`], so it loads from `.toml` or `.ron`.
//! Every field has a default; a file only needs the values it overrides.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};
use crate::classify::GroupTagging;
use crate::geometry::ColliderKind;

/// # Naming Conventions
///
/// Substring markers and suffixes the pipeline matches against object names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Objects whose name contains this are replaced by external links
    pub link_marker: String,
    /// Terrain pieces whose name contains this are not plantable
    pub road_marker: String,
    /// Appended to the source name to name its collider
    pub collider_suffix: String,
}

impl Naming {
    /// Name of the collider generated for `source`
    pub fn collider_name(&self, source: &str) -> String {
        format!("{}{}", source, self.collider_suffix)
    }

    /// Whether `name` marks an externally linked object
    pub fn is_link(&self, name: &str) -> bool {
        !self.link_marker.is_empty() && name.contains(&self.link_marker)
    }
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            link_marker: "gltf".to_string(),
            road_marker: "Road".to_string(),
            collider_suffix: "_collider".to_string(),
        }
    }
}

/// # Bounding Cylinder Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderConfig {
    /// Added to the vertical extent so the caps do not clip the source
    pub height_buffer: f32,
    /// Sum of the horizontal extents is divided by this to get the radius
    pub radius_divisor: f32,
    /// Vertices per ring
    pub segments: u32,
}

impl CylinderConfig {
    /// Most vertices per ring a cylinder may use
    pub const MAX_SEGMENTS: u32 = 4096;
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            height_buffer: 0.2,
            radius_divisor: 4.0,
            segments: 32,
        }
    }
}

/// # Convex Hull Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Coplanarity tolerance, relative to the input's bounding box diagonal
    pub epsilon: f32,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self { epsilon: 1e-5 }
    }
}

/// # Source Grouping
///
/// One grouping whose direct members get colliders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGroupConfig {
    /// Grouping name
    pub name: String,
    /// Builder used for every member
    #[serde(default)]
    pub collider: ColliderKind,
    /// Classification rule for the generated colliders
    #[serde(default)]
    pub tagging: GroupTagging,
    /// Members whose name contains any of these are skipped
    #[serde(default)]
    pub skip_substrings: Vec<String>,
}

impl SourceGroupConfig {
    /// Create a grouping entry using the duplicate builder and no extra tags
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collider: ColliderKind::default(),
            tagging: GroupTagging::default(),
            skip_substrings: Vec::new(),
        }
    }

    /// Set the builder
    pub fn with_collider(mut self, collider: ColliderKind) -> Self {
        self.collider = collider;
        self
    }

    /// Set the classification rule
    pub fn with_tagging(mut self, tagging: GroupTagging) -> Self {
        self.tagging = tagging;
        self
    }

    /// Skip members whose name contains `substring`
    pub fn skipping(mut self, substring: impl Into<String>) -> Self {
        self.skip_substrings.push(substring.into());
        self
    }

    /// Whether a member with this name is filtered out
    pub fn skips(&self, name: &str) -> bool {
        self.skip_substrings
            .iter()
            .any(|s| !s.is_empty() && name.contains(s.as_str()))
    }
}

/// # Complete Pipeline Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Log level used when the application initializes logging
    pub log_level: String,
    /// Output grouping for generated colliders
    pub colliders_collection: String,
    /// Output grouping for external-link placeholders
    pub links_collection: String,
    /// Groupings whose members are plantable decorations
    pub planter_collections: Vec<String>,
    /// Source groupings, processed in order
    pub source_groups: Vec<SourceGroupConfig>,
    /// Name markers
    pub naming: Naming,
    /// Bounding cylinder sizing
    pub cylinder: CylinderConfig,
    /// Convex hull tolerance
    pub hull: HullConfig,
    /// Resolve planter membership through nested groupings
    pub recursive_membership: bool,
}

impl PipelineConfig {
    /// Create the default garden configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            colliders_collection: "Colliders".to_string(),
            links_collection: "GLTFLinks".to_string(),
            planter_collections: vec![
                "Planters".to_string(),
                "Planters_Long".to_string(),
                "Planters_Circular".to_string(),
            ],
            source_groups: vec![
                SourceGroupConfig::new("FloraAndRocks").skipping("grass"),
                SourceGroupConfig::new("Decorations").with_tagging(GroupTagging::Planters),
                SourceGroupConfig::new("Traversables").with_tagging(GroupTagging::Traversable),
                SourceGroupConfig::new("TerrainPieces").with_tagging(GroupTagging::Terrain),
            ],
            naming: Naming::default(),
            cylinder: CylinderConfig::default(),
            hull: HullConfig::default(),
            recursive_membership: false,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Replace the source grouping list
    pub fn with_source_groups(mut self, groups: Vec<SourceGroupConfig>) -> Self {
        self.source_groups = groups;
        self
    }

    /// Set cylinder sizing
    pub fn with_cylinder(mut self, cylinder: CylinderConfig) -> Self {
        self.cylinder = cylinder;
        self
    }

    /// Enable or disable recursive planter membership
    pub fn with_recursive_membership(mut self, enabled: bool) -> Self {
        self.recursive_membership = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.colliders_collection.is_empty() || self.links_collection.is_empty() {
            return Err("Output collection names cannot be empty".to_string());
        }
        if self.colliders_collection == self.links_collection {
            return Err("Colliders and links must use different collections".to_string());
        }
        if self.naming.collider_suffix.is_empty() {
            return Err("Collider suffix cannot be empty".to_string());
        }
        if !(self.cylinder.radius_divisor.is_finite() && self.cylinder.radius_divisor > 0.0) {
            return Err("Cylinder radius divisor must be positive".to_string());
        }
        if !(self.cylinder.height_buffer.is_finite() && self.cylinder.height_buffer >= 0.0) {
            return Err("Cylinder height buffer cannot be negative".to_string());
        }
        if self.cylinder.segments < 3 {
            return Err("Cylinder needs at least 3 segments".to_string());
        }
        if self.cylinder.segments > CylinderConfig::MAX_SEGMENTS {
            return Err(format!(
                "Cylinder segments must be at most {}",
                CylinderConfig::MAX_SEGMENTS
            ));
        }
        if !(self.hull.epsilon.is_finite() && self.hull.epsilon >= 0.0) {
            return Err("Hull epsilon cannot be negative".to_string());
        }

        let outputs = [&self.colliders_collection, &self.links_collection];
        for (index, group) in self.source_groups.iter().enumerate() {
            if group.name.is_empty() {
                return Err(format!("Source group {} has no name", index));
            }
            if outputs.contains(&&group.name) {
                return Err(format!("Source group '{}' is an output collection", group.name));
            }
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for PipelineConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Format;

    #[test]
    fn test_default_matches_garden_conventions() {
        let config = PipelineConfig::default();
        let order: Vec<&str> = config.source_groups.iter().map(|g| g.name.as_str()).collect();

        assert_eq!(order, ["FloraAndRocks", "Decorations", "Traversables", "TerrainPieces"]);
        assert!(config.source_groups.iter().all(|g| g.collider == ColliderKind::Duplicate));
        assert!(config.source_groups[0].skips("grassTuft_07"));
        assert!(!config.source_groups[1].skips("grassTuft_07"));
        assert_eq!(config.cylinder.height_buffer, 0.2);
        assert_eq!(config.cylinder.radius_divisor, 4.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            recursive_membership = true

            [cylinder]
            height_buffer = 0.5

            [[source_groups]]
            name = "Rocks"
            collider = "convex_hull"
        "#;
        let config = PipelineConfig::from_str_as(toml, Format::Toml).unwrap();

        assert!(config.recursive_membership);
        assert_eq!(config.cylinder.height_buffer, 0.5);
        assert_eq!(config.cylinder.radius_divisor, 4.0);
        assert_eq!(config.source_groups.len(), 1);
        assert_eq!(config.source_groups[0].collider, ColliderKind::ConvexHull);
        assert_eq!(config.source_groups[0].tagging, GroupTagging::None);
        assert_eq!(config.colliders_collection, "Colliders");
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = PipelineConfig::default().with_recursive_membership(true);
        let text = config.to_string_as(Format::Ron).unwrap();
        assert_eq!(PipelineConfig::from_str_as(&text, Format::Ron).unwrap(), config);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.cylinder.radius_divisor = 0.0;
        assert!(config.validate().is_err());

        let config = PipelineConfig::default()
            .with_source_groups(vec![SourceGroupConfig::new("Colliders")]);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.cylinder.segments = 2;
        assert!(config.validate().is_err());

        config.cylinder.segments = u32::MAX;
        assert!(config.validate().is_err());
        config.cylinder.segments = CylinderConfig::MAX_SEGMENTS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_segment_count_in_file_is_rejected() {
        let config = PipelineConfig::from_str_as("[cylinder]\nsegments = 2147483648\n", Format::Toml).unwrap();
        assert_eq!(config.cylinder.segments, 2_147_483_648);
        assert!(config.validate().is_err());
    }
}
