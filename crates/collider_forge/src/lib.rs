//! # Collider Forge
//!
//! Batch generation of collision proxies for authored scenes.
//!
//! Environment artists keep detailed visual meshes; the runtime consumes cheap
//! proxy shapes with gameplay tags instead. This crate derives those proxies,
//! tags them, and gathers them into one output grouping of the scene.
//!
//! ## Features
//!
//! - **Scene model**: Slot-map backed document of objects, meshes, materials
//!   and named groupings, persisted as RON or TOML
//! - **Geometry builders**: Verbatim duplicate, convex hull and bounding
//!   cylinder proxies, all pure functions
//! - **Classification**: `collider`, `plantable` and `teleport` tags derived
//!   from grouping membership and naming
//! - **Pipeline**: Idempotent staged pass ending in transform baking
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collider_forge::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = SceneFile::load_from_file("garden.ron")?;
//!     let mut scene = Scene::from_file(&file)?;
//!
//!     let pipeline = ColliderPipeline::new(PipelineConfig::default())?;
//!     let report = pipeline.run(&mut scene);
//!     println!("{}", report);
//!
//!     scene.to_file().save_to_file("garden_colliders.ron")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;

pub mod classify;
pub mod collections;
pub mod geometry;
pub mod pipeline;
pub mod scene;
pub mod tags;

pub use pipeline::{ColliderPipeline, PipelineError, PipelineReport};

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::{
        classify::GroupTagging,
        collections::CollectionStore,
        config::{Config, ConfigError},
        core::{PipelineConfig, SourceGroupConfig},
        foundation::math::{Mat4, Vec3},
        geometry::{ColliderKind, ColliderProxy, GeometryError},
        pipeline::{ColliderPipeline, PipelineError, PipelineReport, SkipReason},
        scene::{Material, MeshData, Scene, SceneError, SceneFile, SceneObject},
        tags::{ColliderTags, TagSet},
    };
}
