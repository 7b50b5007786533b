// src/ui/selection_panel/components.rs
//
// Components and resources for the preset selection panel.

use bevy::prelude::*;

use crate::ui::bridge::SelectionRequest;

/// Root node of the selection panel.
#[derive(Component, Debug)]
pub struct SelectionPanel;

/// Collapsible part of the panel holding the preset buttons.
#[derive(Component, Debug)]
pub struct SelectionPanelBody;

/// Header button that collapses or expands the panel body.
#[derive(Component, Debug)]
pub struct PanelToggleButton;

/// Text inside the toggle button.
#[derive(Component, Debug)]
pub struct PanelToggleLabel;

/// Text showing the active time preset.
#[derive(Component, Debug)]
pub struct TimeLabelText;

/// Text showing the active camera view.
#[derive(Component, Debug)]
pub struct CameraLabelText;

/// A preset button and the selection it raises when pressed.
#[derive(Component, Debug, Clone)]
pub struct SelectionButton(pub SelectionRequest);

/// Whether the panel body is collapsed. Pure display state.
#[derive(Resource, Debug, Default)]
pub struct SelectionPanelState {
    pub collapsed: bool,
}

/// Layout settings for the selection panel.
#[derive(Resource, Debug)]
pub struct SelectionPanelSettings {
    /// Panel width (pixels).
    pub panel_width: f32,

    /// Offset from the top-left corner (pixels).
    pub margin: f32,

    /// Padding inside the panel (pixels).
    pub padding: f32,

    /// Gap between buttons (pixels).
    pub button_gap: f32,

    /// Width of a time-of-day button (pixels).
    pub time_button_width: f32,

    /// Font size for section headers and labels (points).
    pub heading_font_size: f32,

    /// Font size for button text (points).
    pub button_font_size: f32,
}

impl Default for SelectionPanelSettings {
    fn default() -> Self {
        Self {
            panel_width: 340.0,
            margin: 16.0,
            padding: 12.0,
            button_gap: 4.0,
            time_button_width: 48.0,
            heading_font_size: 16.0,
            button_font_size: 13.0,
        }
    }
}
