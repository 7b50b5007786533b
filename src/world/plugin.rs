//! WorldPlugin owns scene setup, the free camera, and time-of-day lighting.
use bevy::prelude::*;

use crate::world::{
    systems::{
        fly_camera_mouse_look, fly_camera_translate, spawn_world_environment, update_cursor_grab,
    },
    time::{advance_sky_transition, apply_world_lighting, SkyboxTime, WorldClock, WorldTimeSettings},
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let time_settings = WorldTimeSettings::load_or_default();
        info!(
            "Sky transitions take {:.2}s (sunrise {:.2}, sunset {:.2})",
            time_settings.transition_seconds,
            time_settings.sunrise_fraction,
            time_settings.sunset_fraction
        );

        app.insert_resource(time_settings)
            .init_resource::<SkyboxTime>()
            .init_resource::<WorldClock>()
            .add_systems(Startup, spawn_world_environment)
            .add_systems(
                Update,
                (
                    (
                        update_cursor_grab,
                        fly_camera_mouse_look.after(update_cursor_grab),
                        fly_camera_translate,
                    ),
                    (advance_sky_transition, apply_world_lighting).chain(),
                ),
            );
    }
}
