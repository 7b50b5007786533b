//! World module housing the scene environment, free camera, and sky lighting.
pub mod components;
pub mod plugin;
pub mod systems;
pub mod time;

pub use plugin::WorldPlugin;
