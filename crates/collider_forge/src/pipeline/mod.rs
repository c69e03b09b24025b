//! # Collider Pipeline
//!
//! Runs the full collider pass over a scene, one stage at a time:
//!
//! 1. **Materials**: switch back-face culling on for every material in use
//! 2. **Link placeholders**: hide externally linked objects and stand an empty
//!    placeholder in for each one in the links grouping
//! 3. **Reset**: delete the colliders grouping and everything in it
//! 4. **Generation**: for each source grouping in order, build, tag and place
//!    a collider for every visible direct member
//! 5. **Normalization**: bake rotation and scale of every collider into its
//!    vertices
//!
//! Stages 2 to 5 clear their own output first, so running the pipeline again
//! on the same scene rebuilds the same result.
//!
//! ## Failures
//!
//! A builder error or an unbakeable transform only affects its own object.
//! It is logged, recorded in the [`PipelineReport`], and the run continues.

pub mod normalize;
pub mod report;

pub use normalize::{apply_linear, bake_transform};
pub use report::{GroupReport, ObjectFailure, PipelineReport, SkipReason};

use std::collections::BTreeSet;
use std::path::Path;

use crate::classify::classify;
use crate::collections::CollectionStore;
use crate::config::{Config, ConfigError};
use crate::core::{PipelineConfig, SourceGroupConfig};
use crate::foundation::collections::ObjectKey;
use crate::geometry::{self, GeometryError};
use crate::scene::{Scene, SceneObject};

/// Pipeline construction errors
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The configuration failed validation
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// The configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The collider generation pass
#[derive(Debug, Clone)]
pub struct ColliderPipeline {
    config: PipelineConfig,
}

impl ColliderPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// Create a pipeline from a `.toml` or `.ron` configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        Self::new(PipelineConfig::load_from_file(path)?)
    }

    /// The configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage against `scene`
    pub fn run(&self, scene: &mut Scene) -> PipelineReport {
        log::info!("Running collider pipeline on {} objects", scene.object_count());
        let mut report = PipelineReport::default();

        report.materials_updated = self.normalize_materials(scene);
        self.placeholder_links(scene, &mut report);
        report.colliders_removed = self.reset_colliders(scene);
        for group in &self.config.source_groups {
            let group_report = self.generate_for_group(scene, group);
            report.groups.push(group_report);
        }
        self.normalize_transforms(scene, &mut report);

        log::info!("Collider pipeline finished: {}", report);
        report
    }

    /// Turn on back-face culling for every material an object uses
    ///
    /// Returns how many materials changed.
    pub fn normalize_materials(&self, scene: &mut Scene) -> usize {
        let used: BTreeSet<_> = scene.objects().filter_map(|(_, o)| o.material).collect();
        let mut updated = 0;
        for key in used {
            if let Some(material) = scene.material_mut(key) {
                if !material.backface_culling {
                    material.backface_culling = true;
                    updated += 1;
                }
            }
        }
        log::debug!("Back-face culling enabled on {} materials", updated);
        updated
    }

    /// Rebuild the links grouping
    ///
    /// Every externally linked object outside the grouping is hidden, and an
    /// empty object with its name and world matrix is placed in the grouping.
    /// The placeholder's name gets a numeric suffix since names are unique.
    /// The grouping only exists while it holds a placeholder.
    pub fn placeholder_links(&self, scene: &mut Scene, report: &mut PipelineReport) {
        let links = self.config.links_collection.as_str();
        report.links_removed = scene.delete_hierarchy(links);

        let sources: Vec<ObjectKey> = scene
            .objects()
            .filter(|(_, o)| self.config.naming.is_link(o.name()))
            .map(|(key, _)| key)
            .filter(|&key| !scene.is_direct_member_of(links, key))
            .collect();

        for source in sources {
            let Some(object) = scene.object_mut(source) else {
                continue;
            };
            object.visible = false;
            let placeholder = SceneObject::new(object.name()).with_matrix(object.matrix_world);

            let key = scene.add_object(placeholder);
            scene.move_object(links, key);
            if let Some(created) = scene.object(key) {
                log::debug!("Placeholder '{}' stands in for a linked object", created.name());
                report.placeholders.push(created.name().to_string());
            }
        }
        log::info!(
            "{} link placeholders created in '{}' ({} removed)",
            report.placeholders.len(),
            links,
            report.links_removed
        );
    }

    /// Delete the colliders grouping with every collider in it
    ///
    /// Returns how many colliders were removed.
    pub fn reset_colliders(&self, scene: &mut Scene) -> usize {
        let removed = scene.delete_hierarchy(&self.config.colliders_collection);
        log::info!(
            "Cleared '{}': {} colliders removed",
            self.config.colliders_collection,
            removed
        );
        removed
    }

    /// Build, tag and place colliders for the direct members of one grouping
    ///
    /// A grouping that does not exist has no members and yields an empty report.
    pub fn generate_for_group(&self, scene: &mut Scene, group: &SourceGroupConfig) -> GroupReport {
        let mut report = GroupReport::new(&group.name);

        for source in scene.members_of(&group.name) {
            let Some(object) = scene.object(source) else {
                continue;
            };
            let name = object.name().to_string();

            if !object.visible {
                report.skipped.push((name, SkipReason::Hidden));
                continue;
            }
            if group.skips(&name) {
                log::debug!("Skipping '{}' in '{}': name filtered", name, group.name);
                report.skipped.push((name, SkipReason::NameFiltered));
                continue;
            }

            let mesh = scene.object_mesh(source);
            let built = if object.data.is_some() && mesh.is_none() {
                Err(GeometryError::MissingMesh(name.clone()))
            } else {
                geometry::build(group.collider, object, mesh, &self.config)
            };

            match built {
                Ok(Some(mut proxy)) => {
                    proxy
                        .tags
                        .insert_flags(classify(scene, source, group.tagging, &self.config));
                    let key = proxy.insert_into(scene);
                    scene.move_object(&self.config.colliders_collection, key);
                    if let Some(collider) = scene.object(key) {
                        log::debug!("Created '{}' from '{}'", collider.name(), name);
                        report.created.push(collider.name().to_string());
                    }
                }
                Ok(None) => report.skipped.push((name, SkipReason::Ineligible)),
                Err(error) => {
                    log::warn!("No collider for '{}': {}", name, error);
                    report.failures.push(ObjectFailure { object: name, error });
                }
            }
        }

        log::info!(
            "'{}': {} colliders, {} skipped, {} failed",
            group.name,
            report.created.len(),
            report.skipped.len(),
            report.failures.len()
        );
        report
    }

    /// Bake rotation and scale of every collider into its mesh
    pub fn normalize_transforms(&self, scene: &mut Scene, report: &mut PipelineReport) {
        for key in scene.members_of(&self.config.colliders_collection) {
            match bake_transform(scene, key) {
                Ok(true) => report.normalized += 1,
                Ok(false) => {}
                Err(error) => {
                    log::warn!("Transform left as is: {}", error);
                    let object = scene.object(key).map(|o| o.name().to_string()).unwrap_or_default();
                    report.normalize_failures.push(ObjectFailure { object, error });
                }
            }
        }
        log::info!("Normalized {} collider transforms", report.normalized);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::geometry::ColliderKind;
    use crate::scene::{Material, MeshData};

    fn tetra(name: &str) -> MeshData {
        MeshData::from_data(
            name,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]],
        )
    }

    fn add_member(scene: &mut Scene, group: &str, name: &str) -> ObjectKey {
        let mesh = scene.add_mesh(tetra(name));
        let key = scene.add_object(SceneObject::new(name).with_mesh(mesh));
        scene.move_object(group, key);
        key
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = PipelineConfig::default();
        config.links_collection = config.colliders_collection.clone();

        assert!(matches!(ColliderPipeline::new(config), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_materials_get_backface_culling() {
        let mut scene = Scene::new();
        let material = scene.add_material(Material::new("Stone"));
        let unused = scene.add_material(Material::new("Unused"));
        scene.add_object(SceneObject::new("Wall").with_material(material));
        scene.add_object(SceneObject::new("Wall2").with_material(material));

        let pipeline = ColliderPipeline::new(PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.normalize_materials(&mut scene), 1);
        assert_eq!(pipeline.normalize_materials(&mut scene), 0);

        assert!(scene.material(material).unwrap().backface_culling);
        assert!(!scene.material(unused).unwrap().backface_culling);
    }

    #[test]
    fn test_links_grouping_exists_only_with_placeholders() {
        let mut scene = Scene::new();
        add_member(&mut scene, "Decorations", "Lamp");
        let pipeline = ColliderPipeline::new(PipelineConfig::default()).unwrap();

        let mut report = PipelineReport::default();
        pipeline.placeholder_links(&mut scene, &mut report);
        assert!(report.placeholders.is_empty());
        assert!(scene.find_collection("GLTFLinks").is_none());

        let statue = add_member(&mut scene, "Decorations", "Statue_gltf");
        pipeline.placeholder_links(&mut scene, &mut report);
        assert_eq!(scene.members_of("GLTFLinks").len(), 1);

        // the linked object is gone, so the stale grouping goes with it
        scene.remove_object(statue);
        let mut report = PipelineReport::default();
        pipeline.placeholder_links(&mut scene, &mut report);
        assert_eq!(report.links_removed, 1);
        assert!(scene.find_collection("GLTFLinks").is_none());
    }

    #[test]
    fn test_missing_group_is_empty() {
        let mut scene = Scene::new();
        let pipeline = ColliderPipeline::new(PipelineConfig::default()).unwrap();

        let report = pipeline.generate_for_group(&mut scene, &SourceGroupConfig::new("Nowhere"));

        assert_eq!(report, GroupReport::new("Nowhere"));
        assert!(scene.find_collection("Colliders").is_none());
    }

    #[test]
    fn test_hidden_and_filtered_members_are_skipped() {
        let mut scene = Scene::new();
        add_member(&mut scene, "FloraAndRocks", "rock_07");
        add_member(&mut scene, "FloraAndRocks", "grassTuft_07");
        let hidden = add_member(&mut scene, "FloraAndRocks", "fern_02");
        scene.object_mut(hidden).unwrap().visible = false;
        let empty = scene.add_object(SceneObject::new("Marker"));
        scene.move_object("FloraAndRocks", empty);

        let pipeline = ColliderPipeline::new(PipelineConfig::default()).unwrap();
        let group = pipeline.config().source_groups[0].clone();
        let report = pipeline.generate_for_group(&mut scene, &group);

        assert_eq!(report.created, vec!["rock_07_collider".to_string()]);
        assert_eq!(report.skipped_for(SkipReason::NameFiltered), 1);
        assert_eq!(report.skipped_for(SkipReason::Hidden), 1);
        assert_eq!(report.skipped_for(SkipReason::Ineligible), 1);
        assert_eq!(scene.members_of("Colliders").len(), 1);
    }

    #[test]
    fn test_convex_hull_group_failure_keeps_going() {
        let mut scene = Scene::new();
        let flat = scene.add_mesh(MeshData::from_data(
            "Flat",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        ));
        let pond = scene.add_object(SceneObject::new("Pond").with_mesh(flat));
        scene.move_object("Rocks", pond);
        add_member(&mut scene, "Rocks", "Boulder");

        let group = SourceGroupConfig::new("Rocks").with_collider(ColliderKind::ConvexHull);
        let pipeline = ColliderPipeline::new(PipelineConfig::default()).unwrap();
        let report = pipeline.generate_for_group(&mut scene, &group);

        assert_eq!(report.created, vec!["Boulder_collider".to_string()]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].object, "Pond");
        assert!(matches!(report.failures[0].error, GeometryError::DegenerateHull { .. }));
    }
}
