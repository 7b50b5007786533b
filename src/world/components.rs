//! Components used by the world module.
use bevy::prelude::*;

/// Player-driven orientation and speed of the free camera.
#[derive(Component, Debug)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub move_speed: f32,
    pub boost: f32,
    pub look_sensitivity: f32,
}

impl FlyCamera {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch,
            move_speed: 10.0,
            boost: 2.5,
            look_sensitivity: 0.2,
        }
    }

    pub fn rotation(&self) -> Quat {
        (Quat::from_axis_angle(Vec3::Y, self.yaw) * Quat::from_axis_angle(Vec3::X, self.pitch))
            .normalize()
    }
}

/// The camera that renders the scene; virtual camera rigs override its pose.
#[derive(Component, Debug, Default)]
pub struct PrimaryCamera;

/// Marker component identifying the main directional light (the "sun").
#[derive(Component, Debug, Default)]
pub struct PrimarySun;

/// A scene participant that the occlusion volume can hide.
#[derive(Component, Debug, Default)]
pub struct Avatar;
