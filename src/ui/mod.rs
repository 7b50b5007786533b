// src/ui/mod.rs
//
// Display layer for the scene controller.
//
// - bridge: labels pushed by the controllers, selection callbacks into them
// - selection_panel: buttons for every preset and the active labels

pub mod bridge;
pub mod plugin;
pub mod selection_panel;

pub use plugin::UiPlugin;
