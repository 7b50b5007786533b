//! Time-of-day selection.
use bevy::prelude::*;

use crate::control::{
    errors::SceneControlError,
    state::{with_controller, SceneController},
};
use crate::presets::{registry::format_clock, PresetRegistry};
use crate::ui::bridge::SelectionLabels;
use crate::world::time::{SkyboxTime, TimeTransition};

impl SceneController {
    /// Applies the time preset `key` to the skybox and pushes its label.
    ///
    /// Returns the preset's seconds of day. An unknown key changes nothing.
    pub fn set_time(&mut self, world: &mut World, key: &str) -> Result<u32, SceneControlError> {
        let seconds = world
            .get_resource::<PresetRegistry>()
            .ok_or_else(|| {
                SceneControlError::engine_failure("set_time", "preset registry is missing")
            })?
            .time_preset(key)?
            .seconds_of_day;

        if !world.contains_resource::<SkyboxTime>() {
            return Err(SceneControlError::engine_failure(
                "set_time",
                "skybox time resource is missing",
            ));
        }
        if !world.contains_resource::<SelectionLabels>() {
            return Err(SceneControlError::engine_failure(
                "set_time",
                "selection labels resource is missing",
            ));
        }

        self.state.current_time_key = key.to_string();
        world
            .resource_mut::<SkyboxTime>()
            .set_fixed(seconds, TimeTransition::Forward);
        world.resource_mut::<SelectionLabels>().set_time_label(key);

        info!(
            "Time preset '{}' applied: {} s ({})",
            key,
            seconds,
            format_clock(seconds)
        );
        Ok(seconds)
    }
}

/// Selects a time preset on the world's scene controller.
pub fn set_time(world: &mut World, key: &str) -> Result<u32, SceneControlError> {
    with_controller(world, "set_time", |controller, world| {
        controller.set_time(world, key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::errors::PresetCollection;

    fn scene_world() -> World {
        let mut world = World::new();
        let registry = PresetRegistry::builtin();
        let default_key = registry.default_time().key.clone();
        world.insert_resource(registry);
        world.init_resource::<SkyboxTime>();
        world.init_resource::<SelectionLabels>();
        let camera = world.spawn(Transform::default()).id();
        world.insert_resource(SceneController::new(camera, default_key));
        world
    }

    #[test]
    fn every_time_preset_updates_label_and_skybox() {
        let mut world = scene_world();
        let presets = world.resource::<PresetRegistry>().time_presets().to_vec();

        for preset in presets {
            let seconds = set_time(&mut world, &preset.key).expect("registered key");
            assert_eq!(seconds, preset.seconds_of_day);
            assert_eq!(world.resource::<SelectionLabels>().time_label(), preset.key);
            let skybox = world.resource::<SkyboxTime>();
            assert_eq!(skybox.fixed_seconds, preset.seconds_of_day);
            assert_eq!(skybox.transition, TimeTransition::Forward);
            assert_eq!(
                world.resource::<SceneController>().state().current_time_key,
                preset.key
            );
        }
    }

    #[test]
    fn unknown_time_key_changes_nothing() {
        let mut world = scene_world();
        set_time(&mut world, "07:00").unwrap();
        let state_before = world.resource::<SceneController>().state().clone();
        let skybox_before = *world.resource::<SkyboxTime>();

        let outcome = set_time(&mut world, "25:00");

        assert_eq!(
            outcome,
            Err(SceneControlError::unknown_key(
                PresetCollection::TimePresets,
                "25:00"
            ))
        );
        assert_eq!(world.resource::<SceneController>().state(), &state_before);
        assert_eq!(*world.resource::<SkyboxTime>(), skybox_before);
        assert_eq!(world.resource::<SelectionLabels>().time_label(), "07:00");
    }

    #[test]
    fn missing_skybox_is_fatal_and_leaves_state_alone() {
        let mut world = scene_world();
        world.remove_resource::<SkyboxTime>();

        let outcome = set_time(&mut world, "09:00");

        assert!(outcome.as_ref().is_err_and(SceneControlError::is_fatal));
        assert_ne!(
            world.resource::<SceneController>().state().current_time_key,
            "09:00"
        );
    }
}
