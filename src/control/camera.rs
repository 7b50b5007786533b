//! Camera-view selection: virtual camera binding and avatar occlusion.
use bevy::prelude::*;

use crate::control::{
    cache::VirtualCameraRig,
    components::{ActiveCameraOverride, AvatarOcclusionVolume, FreeCameraPose, VirtualCamera},
    errors::SceneControlError,
    state::{with_controller, SceneController},
};
use crate::presets::{
    registry::OcclusionRegion, PresetRegistry, ViewCollection, FREE_CAMERA_KEY,
};
use crate::ui::bridge::SelectionLabels;

impl SceneController {
    /// Switches to the view `key` of `collection`, or back to the free camera.
    pub fn set_camera(
        &mut self,
        world: &mut World,
        key: &str,
        collection: ViewCollection,
    ) -> Result<(), SceneControlError> {
        let registry = world.get_resource::<PresetRegistry>().ok_or_else(|| {
            SceneControlError::engine_failure("set_camera", "preset registry is missing")
        })?;
        let occlusion = registry.occlusion();
        let view = if key == FREE_CAMERA_KEY {
            None
        } else {
            Some((
                registry.view(collection, key)?.clone(),
                registry.camera_transition(),
            ))
        };

        if !world.contains_resource::<SelectionLabels>() {
            return Err(SceneControlError::engine_failure(
                "set_camera",
                "selection labels resource is missing",
            ));
        }

        self.check_occlusion_volume(world)?;

        match view {
            None => {
                self.release_camera(world)?;
                self.disable_occlusion(world, occlusion)?;
                info!("Camera released to '{}'", FREE_CAMERA_KEY);
            }
            Some((view, transition)) => {
                if world.get::<Transform>(self.primary_camera).is_none() {
                    return Err(SceneControlError::engine_failure(
                        "set_camera",
                        format!("primary camera {:?} has no transform", self.primary_camera),
                    ));
                }
                let rig = self
                    .rigs
                    .get_or_create(world, view.position, view.look_at, transition);
                self.bind_camera(world, rig)?;
                self.enable_occlusion(world, occlusion)?;
                info!(
                    "Camera locked to '{}' ({:?}): position {}, look-at {}",
                    key, collection, view.position, view.look_at
                );
            }
        }

        self.state.current_camera_key = key.to_string();
        world.resource_mut::<SelectionLabels>().set_camera_label(key);
        Ok(())
    }

    fn bind_camera(
        &mut self,
        world: &mut World,
        rig: VirtualCameraRig,
    ) -> Result<(), SceneControlError> {
        let transition = world
            .get::<VirtualCamera>(rig.camera)
            .map(|camera| camera.transition)
            .ok_or_else(|| {
                SceneControlError::engine_failure(
                    "bind_camera",
                    format!("virtual camera {:?} is missing", rig.camera),
                )
            })?;

        let mut camera = world
            .get_entity_mut(self.primary_camera)
            .map_err(|err| SceneControlError::engine_failure("bind_camera", err.to_string()))?;

        if camera
            .get::<ActiveCameraOverride>()
            .is_some_and(|active| active.rig == rig)
        {
            return Ok(());
        }

        let current = *camera.get::<Transform>().ok_or_else(|| {
            SceneControlError::engine_failure("bind_camera", "primary camera has no transform")
        })?;
        if !camera.contains::<FreeCameraPose>() {
            camera.insert(FreeCameraPose(current));
        }
        camera.insert(ActiveCameraOverride::new(rig, current, transition));
        Ok(())
    }

    fn check_occlusion_volume(&self, world: &World) -> Result<(), SceneControlError> {
        match self.occlusion_volume {
            Some(volume) if world.get::<Transform>(volume).is_none() => {
                Err(SceneControlError::engine_failure(
                    "set_camera",
                    format!("occlusion volume {:?} has no transform", volume),
                ))
            }
            _ => Ok(()),
        }
    }

    fn release_camera(&mut self, world: &mut World) -> Result<(), SceneControlError> {
        let mut camera = world
            .get_entity_mut(self.primary_camera)
            .map_err(|err| SceneControlError::engine_failure("release_camera", err.to_string()))?;

        camera.remove::<ActiveCameraOverride>();
        if let Some(FreeCameraPose(pose)) = camera.take::<FreeCameraPose>() {
            camera.insert(pose);
        }
        Ok(())
    }

    fn enable_occlusion(
        &mut self,
        world: &mut World,
        occlusion: OcclusionRegion,
    ) -> Result<(), SceneControlError> {
        if self.state.avatar_hidden_enabled {
            return Ok(());
        }

        match self.occlusion_volume {
            None => {
                let volume = world
                    .spawn((
                        Transform::from_translation(occlusion.center),
                        AvatarOcclusionVolume {
                            size: occlusion.size,
                        },
                        Name::new("Avatar Occlusion Volume"),
                    ))
                    .id();
                self.occlusion_volume = Some(volume);
            }
            Some(volume) => {
                relocate_volume(world, volume, occlusion.center)?;
            }
        }

        self.state.avatar_hidden_enabled = true;
        Ok(())
    }

    fn disable_occlusion(
        &mut self,
        world: &mut World,
        occlusion: OcclusionRegion,
    ) -> Result<(), SceneControlError> {
        if !self.state.avatar_hidden_enabled {
            return Ok(());
        }
        if let Some(volume) = self.occlusion_volume {
            relocate_volume(world, volume, occlusion.disabled_position)?;
        }
        self.state.avatar_hidden_enabled = false;
        Ok(())
    }
}

fn relocate_volume(
    world: &mut World,
    volume: Entity,
    translation: Vec3,
) -> Result<(), SceneControlError> {
    let mut transform = world.get_mut::<Transform>(volume).ok_or_else(|| {
        SceneControlError::engine_failure(
            "relocate_occlusion_volume",
            format!("occlusion volume {:?} has no transform", volume),
        )
    })?;
    transform.translation = translation;
    Ok(())
}

/// Selects a camera or sky view on the world's scene controller.
pub fn set_camera(
    world: &mut World,
    key: &str,
    collection: ViewCollection,
) -> Result<(), SceneControlError> {
    with_controller(world, "set_camera", |controller, world| {
        controller.set_camera(world, key, collection)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{errors::PresetCollection, state::ViewMode};
    use crate::presets::registry::{TimePreset, ViewPoint};

    const START_POSE: Vec3 = Vec3::new(-12.0, 8.0, 16.0);

    fn scene_world(registry: PresetRegistry) -> World {
        let mut world = World::new();
        let default_key = registry.default_time().key.clone();
        world.insert_resource(registry);
        world.init_resource::<SelectionLabels>();
        let camera = world.spawn(Transform::from_translation(START_POSE)).id();
        world.insert_resource(SceneController::new(camera, default_key));
        world
    }

    fn controller(world: &World) -> &SceneController {
        world.resource::<SceneController>()
    }

    fn rig_count(world: &mut World) -> usize {
        world.query::<&VirtualCamera>().iter(world).count()
    }

    fn volume_translation(world: &World) -> Vec3 {
        let volume = controller(world).occlusion_volume().expect("volume exists");
        world.get::<Transform>(volume).unwrap().translation
    }

    #[test]
    fn overview_then_free_camera_scenario() {
        let mut world = scene_world(PresetRegistry::builtin());
        let primary = controller(&world).primary_camera();
        let occlusion = world.resource::<PresetRegistry>().occlusion();
        assert_eq!(controller(&world).view_mode(), ViewMode::Free);

        set_camera(&mut world, "Overview", ViewCollection::Camera).unwrap();

        assert!(controller(&world).state().avatar_hidden_enabled);
        assert_eq!(volume_translation(&world), occlusion.center);
        let binding = world.get::<ActiveCameraOverride>(primary).expect("bound");
        let overview = world
            .resource::<PresetRegistry>()
            .view(ViewCollection::Camera, "Overview")
            .unwrap()
            .clone();
        assert_eq!(
            world.get::<Transform>(binding.rig.camera).unwrap().translation,
            overview.position
        );
        assert_eq!(
            world.get::<Transform>(binding.rig.look_at).unwrap().translation,
            overview.look_at
        );
        assert_eq!(world.resource::<SelectionLabels>().camera_label(), "Overview");
        assert_eq!(controller(&world).view_mode(), ViewMode::Locked("Overview"));

        set_camera(&mut world, FREE_CAMERA_KEY, ViewCollection::Camera).unwrap();

        assert!(world.get::<ActiveCameraOverride>(primary).is_none());
        assert!(world.get::<FreeCameraPose>(primary).is_none());
        assert_eq!(
            world.get::<Transform>(primary).unwrap().translation,
            START_POSE
        );
        assert!(!controller(&world).state().avatar_hidden_enabled);
        assert_eq!(volume_translation(&world), occlusion.disabled_position);
        assert_eq!(
            world.resource::<SelectionLabels>().camera_label(),
            FREE_CAMERA_KEY
        );
        assert_eq!(controller(&world).view_mode(), ViewMode::Free);
    }

    #[test]
    fn reselecting_a_view_is_idempotent() {
        let mut world = scene_world(PresetRegistry::builtin());
        let primary = controller(&world).primary_camera();

        set_camera(&mut world, "Plaza", ViewCollection::Camera).unwrap();
        let state_once = controller(&world).state().clone();
        let binding_once = world.get::<ActiveCameraOverride>(primary).unwrap().clone();
        let volume = controller(&world).occlusion_volume().unwrap();
        let volume_changed = world
            .entity(volume)
            .get_ref::<Transform>()
            .unwrap()
            .last_changed();
        let entity_count = world.entities().len();

        world.increment_change_tick();
        set_camera(&mut world, "Plaza", ViewCollection::Camera).unwrap();

        assert_eq!(controller(&world).state(), &state_once);
        assert_eq!(controller(&world).rigs().len(), 1);
        assert_eq!(rig_count(&mut world), 1);
        assert_eq!(world.entities().len(), entity_count);
        let binding_twice = world.get::<ActiveCameraOverride>(primary).unwrap();
        assert_eq!(binding_twice.rig, binding_once.rig);
        assert_eq!(binding_twice.blend_from, binding_once.blend_from);
        assert_eq!(
            world
                .entity(volume)
                .get_ref::<Transform>()
                .unwrap()
                .last_changed(),
            volume_changed
        );
    }

    #[test]
    fn keys_with_identical_coordinates_share_one_rig() {
        let position = Vec3::new(5.0, 5.0, 5.0);
        let registry = PresetRegistry::new(
            vec![TimePreset::new("Noon", 43_200)],
            vec![
                ViewPoint::new("North Steps", position, Vec3::ZERO),
                ViewPoint::new("Main Steps", position, Vec3::ZERO),
            ],
            vec![],
        );
        let mut world = scene_world(registry);
        let primary = controller(&world).primary_camera();

        set_camera(&mut world, "North Steps", ViewCollection::Camera).unwrap();
        let first = world.get::<ActiveCameraOverride>(primary).unwrap().rig;
        set_camera(&mut world, "Main Steps", ViewCollection::Camera).unwrap();
        let second = world.get::<ActiveCameraOverride>(primary).unwrap().rig;

        assert_eq!(first, second);
        assert_eq!(controller(&world).rigs().len(), 1);
        assert_eq!(rig_count(&mut world), 1);
        assert_eq!(controller(&world).state().current_camera_key, "Main Steps");
        assert_eq!(world.resource::<SelectionLabels>().camera_label(), "Main Steps");
    }

    #[test]
    fn locked_free_locked_restores_occlusion_region() {
        let mut world = scene_world(PresetRegistry::builtin());
        let occlusion = world.resource::<PresetRegistry>().occlusion();

        set_camera(&mut world, "Gate", ViewCollection::Camera).unwrap();
        let volume = controller(&world).occlusion_volume().unwrap();
        let first_activation = volume_translation(&world);

        set_camera(&mut world, FREE_CAMERA_KEY, ViewCollection::Camera).unwrap();
        set_camera(&mut world, "Sky Zenith", ViewCollection::Sky).unwrap();

        assert_eq!(controller(&world).occlusion_volume(), Some(volume));
        assert_eq!(volume_translation(&world), first_activation);
        assert_eq!(first_activation, occlusion.center);
        assert!(controller(&world).state().avatar_hidden_enabled);
        assert_eq!(
            world.query::<&AvatarOcclusionVolume>().iter(&world).count(),
            1
        );
    }

    #[test]
    fn switching_views_keeps_the_original_free_pose() {
        let mut world = scene_world(PresetRegistry::builtin());
        let primary = controller(&world).primary_camera();

        set_camera(&mut world, "Overview", ViewCollection::Camera).unwrap();
        // Simulate the blend having moved the primary camera.
        world.get_mut::<Transform>(primary).unwrap().translation = Vec3::new(0.0, 30.0, 30.0);
        set_camera(&mut world, "Sky East", ViewCollection::Sky).unwrap();

        let binding = world.get::<ActiveCameraOverride>(primary).unwrap();
        assert_eq!(binding.blend_from.translation, Vec3::new(0.0, 30.0, 30.0));
        assert_eq!(
            world.get::<FreeCameraPose>(primary).unwrap().0.translation,
            START_POSE
        );
        assert_eq!(controller(&world).rigs().len(), 2);
    }

    #[test]
    fn unknown_view_changes_nothing() {
        let mut world = scene_world(PresetRegistry::builtin());
        let primary = controller(&world).primary_camera();
        let state_before = controller(&world).state().clone();

        let outcome = set_camera(&mut world, "Nonexistent", ViewCollection::Camera);

        assert_eq!(
            outcome,
            Err(SceneControlError::unknown_key(
                PresetCollection::CameraViews,
                "Nonexistent"
            ))
        );
        assert_eq!(controller(&world).state(), &state_before);
        assert!(controller(&world).occlusion_volume().is_none());
        assert_eq!(controller(&world).rigs().len(), 0);
        assert!(world.get::<ActiveCameraOverride>(primary).is_none());

        // A sky key is unknown in the camera collection.
        assert!(set_camera(&mut world, "Sky North", ViewCollection::Camera).is_err());
        assert_eq!(controller(&world).state(), &state_before);
    }

    #[test]
    fn free_camera_from_free_is_a_no_op() {
        let mut world = scene_world(PresetRegistry::builtin());
        set_camera(&mut world, FREE_CAMERA_KEY, ViewCollection::Sky).unwrap();
        assert!(controller(&world).occlusion_volume().is_none());
        assert_eq!(controller(&world).state().current_camera_key, FREE_CAMERA_KEY);
    }

    #[test]
    fn despawned_primary_camera_is_fatal() {
        let mut world = scene_world(PresetRegistry::builtin());
        let primary = controller(&world).primary_camera();
        world.despawn(primary);

        let outcome = set_camera(&mut world, "Overview", ViewCollection::Camera);

        assert!(outcome.is_err_and(|err| err.is_fatal()));
        assert_eq!(controller(&world).rigs().len(), 0);
    }

    #[test]
    fn broken_occlusion_volume_keeps_the_locked_view() {
        let mut world = scene_world(PresetRegistry::builtin());
        let primary = controller(&world).primary_camera();
        set_camera(&mut world, "Gate", ViewCollection::Camera).unwrap();
        let volume = controller(&world).occlusion_volume().unwrap();
        world.entity_mut(volume).remove::<Transform>();
        let state_before = controller(&world).state().clone();

        let outcome = set_camera(&mut world, FREE_CAMERA_KEY, ViewCollection::Camera);

        assert!(outcome.is_err_and(|err| err.is_fatal()));
        assert_eq!(controller(&world).state(), &state_before);
        assert!(world.get::<ActiveCameraOverride>(primary).is_some());
        assert_eq!(world.resource::<SelectionLabels>().camera_label(), "Gate");
    }
}
