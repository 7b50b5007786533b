//! ControlPlugin wires the preset registry and the view/time controller.
use bevy::prelude::*;

use crate::control::systems::{drive_camera_override, hide_occluded_avatars, init_scene_controller};
use crate::presets::{PresetRegistry, ViewCollection};
use crate::ui::bridge::apply_selection_requests;

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        let registry = PresetRegistry::load_or_default();
        info!(
            "Presets loaded: {} times, {} camera views, {} sky views (camera blend {:.2}s)",
            registry.time_presets().len(),
            registry.views(ViewCollection::Camera).len(),
            registry.views(ViewCollection::Sky).len(),
            registry.camera_transition().as_secs_f32()
        );

        app.insert_resource(registry)
            .add_systems(PostStartup, init_scene_controller)
            .add_systems(
                Update,
                (drive_camera_override, hide_occluded_avatars).after(apply_selection_requests),
            );

        #[cfg(feature = "view_debug")]
        {
            use crate::control::systems::{log_view_state, ViewDebugTimer};
            app.init_resource::<ViewDebugTimer>()
                .add_systems(Update, log_view_state);
        }
    }
}
