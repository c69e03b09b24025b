//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and transform decomposition
//! - Handle types for the scene arenas
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
