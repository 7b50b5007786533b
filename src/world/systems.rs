//! Scene setup and free-camera controls.
use bevy::{
    ecs::message::MessageReader,
    input::{mouse::MouseMotion, ButtonInput},
    math::primitives::{Capsule3d, Cuboid, Cylinder, Plane3d},
    prelude::*,
    window::{CursorGrabMode, CursorOptions},
};

use crate::control::components::ActiveCameraOverride;
use crate::world::components::{Avatar, FlyCamera, PrimaryCamera, PrimarySun};

const GROUND_SCALE: f32 = 100.0;
const CAMERA_START_POS: Vec3 = Vec3::new(-12.0, 8.0, 16.0);
const PITCH_LIMIT: f32 = 1.54;

const AVATAR_POSITIONS: [Vec3; 4] = [
    Vec3::new(3.0, 0.9, 2.0),
    Vec3::new(-4.0, 0.9, -3.0),
    Vec3::new(6.0, 0.9, -7.0),
    Vec3::new(-9.0, 0.9, 8.0),
];

/// Spawns the scene: ground, sun, a plaza landmark, avatars, and the primary camera.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(90, 140, 90),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
        Name::new("Ground"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 20_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(16.0, 32.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
        PrimarySun,
        Name::new("Sun"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(2.5, 1.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(170, 170, 180),
            perceptual_roughness: 0.6,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.75, 0.0),
        Name::new("Fountain"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(4.0, 12.0, 4.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(140, 110, 90),
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::from_xyz(-20.0, 6.0, -20.0),
        Name::new("Tower"),
    ));

    let avatar_mesh = meshes.add(Capsule3d::new(0.35, 1.1));
    let avatar_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(210, 120, 80),
        ..default()
    });
    for (index, position) in AVATAR_POSITIONS.iter().enumerate() {
        commands.spawn((
            Mesh3d(avatar_mesh.clone()),
            MeshMaterial3d(avatar_material.clone()),
            Transform::from_translation(*position),
            Visibility::Inherited,
            Avatar,
            Name::new(format!("Avatar {}", index)),
        ));
    }

    let camera_transform =
        Transform::from_translation(CAMERA_START_POS).looking_at(Vec3::ZERO, Vec3::Y);
    let (yaw, pitch) = yaw_pitch_from_transform(&camera_transform);

    commands.spawn((
        Camera3d::default(),
        camera_transform,
        FlyCamera::new(yaw, pitch),
        PrimaryCamera,
        Name::new("Primary Camera"),
    ));
}

/// Locks the cursor while the right mouse button steers the free camera.
pub fn update_cursor_grab(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_options: Query<&mut CursorOptions>,
) {
    let grab = if mouse_buttons.just_pressed(MouseButton::Right) {
        true
    } else if mouse_buttons.just_released(MouseButton::Right) {
        false
    } else {
        return;
    };

    for mut options in cursor_options.iter_mut() {
        options.visible = !grab;
        options.grab_mode = if grab {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        };
    }
}

/// Mouse look for the free camera. Ignored while a virtual camera overrides the view.
pub fn fly_camera_mouse_look(
    mut motion_events: MessageReader<MouseMotion>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut query: Query<(&mut FlyCamera, &mut Transform), Without<ActiveCameraOverride>>,
) {
    let delta: Vec2 = motion_events.read().map(|motion| motion.delta).sum();
    if delta == Vec2::ZERO || !mouse_buttons.pressed(MouseButton::Right) {
        return;
    }

    for (mut fly_cam, mut transform) in query.iter_mut() {
        let scale = fly_cam.look_sensitivity * time.delta_secs();
        fly_cam.yaw -= delta.x * scale;
        fly_cam.pitch = (fly_cam.pitch - delta.y * scale).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        transform.rotation = fly_cam.rotation();
    }
}

/// WASD + Space/LShift movement for the free camera, LCtrl to boost.
pub fn fly_camera_translate(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<(&FlyCamera, &mut Transform), Without<ActiveCameraOverride>>,
) {
    for (fly_cam, mut transform) in query.iter_mut() {
        let direction = movement_direction(&keyboard, &transform);
        if direction == Vec3::ZERO {
            continue;
        }
        let speed = if keyboard.pressed(KeyCode::ControlLeft) {
            fly_cam.move_speed * fly_cam.boost
        } else {
            fly_cam.move_speed
        };
        transform.translation += direction * speed * time.delta_secs();
    }
}

fn movement_direction(keyboard: &ButtonInput<KeyCode>, transform: &Transform) -> Vec3 {
    let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
    let forward = flatten(transform.forward().as_vec3());
    let right = flatten(transform.right().as_vec3());

    let bindings = [
        (KeyCode::KeyW, forward),
        (KeyCode::KeyS, -forward),
        (KeyCode::KeyD, right),
        (KeyCode::KeyA, -right),
        (KeyCode::Space, Vec3::Y),
        (KeyCode::ShiftLeft, -Vec3::Y),
    ];
    bindings
        .iter()
        .filter(|(key, _)| keyboard.pressed(*key))
        .map(|(_, direction)| *direction)
        .sum::<Vec3>()
        .normalize_or_zero()
}

// Inverse of `FlyCamera::rotation` for a camera built with `looking_at`.
fn yaw_pitch_from_transform(transform: &Transform) -> (f32, f32) {
    let forward = transform.forward().as_vec3();
    let yaw = (-forward.x).atan2(-forward.z);
    let pitch = forward.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_pitch_reproduces_looking_at_rotation() {
        let transform =
            Transform::from_translation(CAMERA_START_POS).looking_at(Vec3::ZERO, Vec3::Y);
        let (yaw, pitch) = yaw_pitch_from_transform(&transform);
        let rebuilt = FlyCamera::new(yaw, pitch).rotation();

        let expected = transform.forward().as_vec3();
        let actual = rebuilt * Vec3::NEG_Z;
        assert!(expected.distance(actual) < 1e-4);
    }

    #[test]
    fn opposing_keys_cancel_out() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyS);
        assert_eq!(
            movement_direction(&keyboard, &Transform::default()),
            Vec3::ZERO
        );

        keyboard.press(KeyCode::Space);
        assert_eq!(movement_direction(&keyboard, &Transform::default()), Vec3::Y);
    }
}
