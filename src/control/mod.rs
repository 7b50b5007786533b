//! Time and view controllers with their rig cache and occlusion handling.
pub mod cache;
pub mod camera;
pub mod components;
pub mod errors;
pub mod plugin;
pub mod state;
pub mod systems;
pub mod time;

pub use plugin::ControlPlugin;
