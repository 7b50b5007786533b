// src/ui/selection_panel/plugin.rs
//
// SelectionPanelPlugin builds the panel and keeps it in step with the labels.

use bevy::prelude::*;

use crate::ui::bridge::SelectionLabels;

use super::components::{SelectionPanelSettings, SelectionPanelState};
use super::systems::{
    handle_selection_buttons, highlight_selection_buttons, refresh_selection_labels,
    spawn_selection_panel, toggle_selection_panel,
};

pub struct SelectionPanelPlugin;

impl Plugin for SelectionPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionPanelSettings>()
            .init_resource::<SelectionPanelState>()
            .add_systems(Startup, spawn_selection_panel)
            .add_systems(
                Update,
                (
                    handle_selection_buttons,
                    toggle_selection_panel,
                    refresh_selection_labels.run_if(resource_changed::<SelectionLabels>),
                    highlight_selection_buttons,
                ),
            );
    }
}
