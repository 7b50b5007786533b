// src/ui/selection_panel/mod.rs
//
// Selection panel: preset buttons plus the active time and camera labels.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::SelectionPanelPlugin;
