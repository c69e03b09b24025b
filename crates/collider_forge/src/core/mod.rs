//! # Core Module
//!
//! Shared configuration for the collider pipeline.
//!
//! ## Organization
//!
//! - **Config**: Typed pipeline configuration (groupings, naming, sizing)

pub mod config;

// Re-export commonly used config types
pub use config::{
    PipelineConfig,
    SourceGroupConfig,
    Naming,
    CylinderConfig,
    HullConfig,
    Config,
    ConfigError,
};
