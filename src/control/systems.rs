//! Systems that set up the controller and render its state every frame.
use bevy::prelude::*;

use crate::control::{
    components::{ActiveCameraOverride, AvatarOcclusionVolume, LookAtTarget, VirtualCamera},
    state::SceneController,
};
use crate::presets::{PresetRegistry, FREE_CAMERA_KEY};
use crate::ui::bridge::SelectionLabels;
#[cfg(feature = "view_debug")]
use crate::control::state::ViewMode;
use crate::world::{
    components::{Avatar, PrimaryCamera},
    time::{SkyboxTime, TimeTransition, WorldClock},
};

/// Creates the scene controller once the primary camera exists and publishes the initial labels.
pub fn init_scene_controller(
    mut commands: Commands,
    registry: Res<PresetRegistry>,
    cameras: Query<Entity, With<PrimaryCamera>>,
    mut labels: ResMut<SelectionLabels>,
    mut skybox: ResMut<SkyboxTime>,
    mut clock: ResMut<WorldClock>,
) {
    let Ok(camera) = cameras.single() else {
        error!("Expected exactly one primary camera; scene controller not created");
        return;
    };

    let default_time = registry.default_time();
    skybox.set_fixed(default_time.seconds_of_day, TimeTransition::Forward);
    clock.snap_to(default_time.day_fraction());
    labels.set_time_label(&default_time.key);
    labels.set_camera_label(FREE_CAMERA_KEY);

    commands.insert_resource(SceneController::new(camera, default_time.key.clone()));
    info!(
        "Scene controller ready: time '{}', camera '{}', {} time presets",
        default_time.key,
        FREE_CAMERA_KEY,
        registry.time_presets().len()
    );
}

/// Eases the primary camera from its pre-switch pose to the bound rig's pose.
pub fn drive_camera_override(
    time: Res<Time>,
    mut cameras: Query<(&mut Transform, &mut ActiveCameraOverride), With<PrimaryCamera>>,
    rigs: Query<&Transform, (With<VirtualCamera>, Without<PrimaryCamera>)>,
    targets: Query<
        &Transform,
        (
            With<LookAtTarget>,
            Without<PrimaryCamera>,
            Without<VirtualCamera>,
        ),
    >,
) {
    for (mut transform, mut binding) in cameras.iter_mut() {
        let (Ok(rig), Ok(target)) = (
            rigs.get(binding.rig.camera),
            targets.get(binding.rig.look_at),
        ) else {
            warn!("Virtual camera rig {:?} is incomplete", binding.rig);
            continue;
        };

        if binding.progress() < 1.0 {
            binding.elapsed += time.delta_secs();
        }
        let goal =
            Transform::from_translation(rig.translation).looking_at(target.translation, Vec3::Y);
        let t = ease_out_cubic(binding.progress());
        transform.translation = binding.blend_from.translation.lerp(goal.translation, t);
        transform.rotation = binding.blend_from.rotation.slerp(goal.rotation, t);
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Hides avatars standing inside an occlusion volume and shows the rest.
pub fn hide_occluded_avatars(
    volumes: Query<(&Transform, &AvatarOcclusionVolume)>,
    mut avatars: Query<(&Transform, &mut Visibility), With<Avatar>>,
) {
    for (transform, mut visibility) in avatars.iter_mut() {
        let occluded = volumes
            .iter()
            .any(|(center, volume)| volume.contains(center.translation, transform.translation));
        let desired = if occluded {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
        visibility.set_if_neq(desired);
    }
}

#[cfg(feature = "view_debug")]
#[derive(Resource)]
pub(crate) struct ViewDebugTimer {
    timer: Timer,
}

#[cfg(feature = "view_debug")]
impl Default for ViewDebugTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

#[cfg(feature = "view_debug")]
pub(crate) fn log_view_state(
    time: Res<Time>,
    mut timer: ResMut<ViewDebugTimer>,
    controller: Option<Res<SceneController>>,
) {
    if !timer.timer.tick(time.delta()).just_finished() {
        return;
    }
    let Some(controller) = controller else {
        return;
    };
    let state = controller.state();
    let view = match controller.view_mode() {
        ViewMode::Free => "free".to_string(),
        ViewMode::Locked(key) => format!("locked to '{}'", key),
    };
    info!(
        target: "view_debug",
        "time '{}' | camera {} | avatars hidden: {} | rigs: {}",
        state.current_time_key,
        view,
        state.avatar_hidden_enabled,
        controller.rigs().len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{cache::VirtualCameraRig, camera::set_camera};
    use crate::presets::ViewCollection;
    use std::time::Duration;

    #[test]
    fn blend_reaches_rig_pose_after_transition() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_systems(Update, drive_camera_override);

        let world = app.world_mut();
        let target = world
            .spawn((Transform::from_xyz(0.0, 1.0, 0.0), LookAtTarget))
            .id();
        let rig_camera = world
            .spawn((
                Transform::from_xyz(0.0, 10.0, 10.0),
                VirtualCamera {
                    look_at: target,
                    transition: Duration::from_millis(500),
                },
            ))
            .id();
        let rig = VirtualCameraRig {
            camera: rig_camera,
            look_at: target,
        };
        let primary = world
            .spawn((
                Transform::default(),
                PrimaryCamera,
                ActiveCameraOverride::new(rig, Transform::default(), Duration::from_millis(500)),
            ))
            .id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(250));
        app.update();
        let halfway = app.world().get::<Transform>(primary).unwrap().translation;
        assert!(halfway.y > 0.0 && halfway.y < 10.0);

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        app.update();
        let transform = *app.world().get::<Transform>(primary).unwrap();
        assert!(transform.translation.distance(Vec3::new(0.0, 10.0, 10.0)) < 1e-4);
        let expected_forward = (Vec3::new(0.0, 1.0, 0.0) - transform.translation).normalize();
        assert!(transform.forward().as_vec3().distance(expected_forward) < 1e-4);
    }

    #[test]
    fn avatars_hide_only_while_occlusion_is_enabled() {
        let mut app = App::new();
        app.insert_resource(PresetRegistry::builtin())
            .init_resource::<SelectionLabels>()
            .add_systems(Update, hide_occluded_avatars);

        let world = app.world_mut();
        let camera = world.spawn((Transform::default(), PrimaryCamera)).id();
        world.insert_resource(SceneController::new(camera, "00:00"));
        let inside = world
            .spawn((Transform::from_xyz(2.0, 0.9, 2.0), Visibility::Inherited, Avatar))
            .id();
        let outside = world
            .spawn((Transform::from_xyz(80.0, 0.9, 80.0), Visibility::Inherited, Avatar))
            .id();

        set_camera(app.world_mut(), "Overview", ViewCollection::Camera).unwrap();
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(inside),
            Some(&Visibility::Hidden)
        );
        assert_eq!(
            app.world().get::<Visibility>(outside),
            Some(&Visibility::Inherited)
        );

        set_camera(app.world_mut(), FREE_CAMERA_KEY, ViewCollection::Camera).unwrap();
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(inside),
            Some(&Visibility::Inherited)
        );
    }

    #[test]
    fn controller_initialises_from_registry_default() {
        let mut app = App::new();
        app.insert_resource(PresetRegistry::builtin().with_default_time("12:00"))
            .init_resource::<SelectionLabels>()
            .init_resource::<SkyboxTime>()
            .init_resource::<WorldClock>()
            .add_systems(Update, init_scene_controller);
        let camera = app.world_mut().spawn((Transform::default(), PrimaryCamera)).id();

        app.update();

        let controller = app.world().resource::<SceneController>();
        assert_eq!(controller.primary_camera(), camera);
        assert_eq!(controller.state().current_time_key, "12:00");
        let labels = app.world().resource::<SelectionLabels>();
        assert_eq!(labels.time_label(), "12:00");
        assert_eq!(labels.camera_label(), FREE_CAMERA_KEY);
        assert_eq!(app.world().resource::<SkyboxTime>().fixed_seconds, 43_200);
        assert!((app.world().resource::<WorldClock>().time_of_day() - 0.5).abs() < 1e-6);
    }
}
