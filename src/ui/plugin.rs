// src/ui/plugin.rs
//
// UiPlugin registers the label/selection bridge and the selection panel.

use bevy::prelude::*;

use super::bridge::{apply_selection_requests, SelectionLabels, SelectionRequest};
use super::selection_panel::{
    systems::{handle_selection_buttons, highlight_selection_buttons, refresh_selection_labels},
    SelectionPanelPlugin,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.init_resource::<SelectionLabels>()
            .add_message::<SelectionRequest>()
            .add_plugins(SelectionPanelPlugin)
            .add_systems(
                Update,
                apply_selection_requests
                    .after(handle_selection_buttons)
                    .before(refresh_selection_labels)
                    .before(highlight_selection_buttons),
            );
    }
}
