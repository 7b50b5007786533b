//! Preset registry: named times of day and fixed viewpoints.
pub mod config;
pub mod registry;

pub use registry::{PresetRegistry, ViewCollection, FREE_CAMERA_KEY};
