//! Components attached to camera rigs, the primary camera, and the occlusion volume.
use std::time::Duration;

use bevy::prelude::*;

use crate::control::cache::VirtualCameraRig;

/// Camera half of a virtual camera rig.
#[derive(Component, Debug, Clone)]
pub struct VirtualCamera {
    pub look_at: Entity,
    /// Blend time when the primary camera switches to this rig.
    pub transition: Duration,
}

/// Look-at half of a virtual camera rig.
#[derive(Component, Debug, Default)]
pub struct LookAtTarget;

/// Placed on the primary camera while a virtual camera drives its pose.
#[derive(Component, Debug, Clone)]
pub struct ActiveCameraOverride {
    pub rig: VirtualCameraRig,
    pub blend_from: Transform,
    pub elapsed: f32,
    pub duration: f32,
}

impl ActiveCameraOverride {
    pub fn new(rig: VirtualCameraRig, blend_from: Transform, transition: Duration) -> Self {
        Self {
            rig,
            blend_from,
            elapsed: 0.0,
            duration: transition.as_secs_f32(),
        }
    }

    /// Blend progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Pose of the primary camera when it last left free mode.
#[derive(Component, Debug, Clone, Copy)]
pub struct FreeCameraPose(pub Transform);

/// Box that hides avatars inside it. Its `Transform` translation is the box centre.
#[derive(Component, Debug, Clone, Copy)]
pub struct AvatarOcclusionVolume {
    pub size: Vec3,
}

impl AvatarOcclusionVolume {
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        let half = self.size * 0.5;
        let offset = (point - center).abs();
        offset.x <= half.x && offset.y <= half.y && offset.z <= half.z
    }
}
