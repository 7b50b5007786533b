//! Memoised creation of virtual camera rigs keyed by their exact coordinates.
use std::{collections::HashMap, time::Duration};

use bevy::prelude::*;

use crate::control::components::{LookAtTarget, VirtualCamera};

/// The two entities that make up a fixed viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualCameraRig {
    pub camera: Entity,
    pub look_at: Entity,
}

/// Exact-value key of a `(position, look_at)` pair.
///
/// Coordinates compare by bit pattern, with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigKey([u32; 6]);

impl RigKey {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        let [px, py, pz] = position.to_array();
        let [lx, ly, lz] = look_at.to_array();
        Self([px, py, pz, lx, ly, lz].map(canonical_bits))
    }
}

fn canonical_bits(value: f32) -> u32 {
    if value == 0.0 {
        0.0f32.to_bits()
    } else {
        value.to_bits()
    }
}

/// Rigs created so far. Rigs live as long as the scene and are never despawned.
#[derive(Debug, Default)]
pub struct VirtualCameraCache {
    rigs: HashMap<RigKey, VirtualCameraRig>,
}

impl VirtualCameraCache {
    /// Returns the rig for `(position, look_at)`, spawning it on first request.
    pub fn get_or_create(
        &mut self,
        world: &mut World,
        position: Vec3,
        look_at: Vec3,
        transition: Duration,
    ) -> VirtualCameraRig {
        let key = RigKey::new(position, look_at);
        if let Some(rig) = self.rigs.get(&key) {
            return *rig;
        }

        let target = world
            .spawn((
                Transform::from_translation(look_at),
                LookAtTarget,
                Name::new("Virtual Camera Target"),
            ))
            .id();
        let camera = world
            .spawn((
                Transform::from_translation(position).looking_at(look_at, Vec3::Y),
                VirtualCamera {
                    look_at: target,
                    transition,
                },
                Name::new("Virtual Camera"),
            ))
            .id();

        let rig = VirtualCameraRig {
            camera,
            look_at: target,
        };
        debug!(
            "Created virtual camera rig {:?} at {} looking at {}",
            rig.camera, position, look_at
        );
        self.rigs.insert(key, rig);
        rig
    }

    #[cfg(test)]
    pub fn get(&self, position: Vec3, look_at: Vec3) -> Option<VirtualCameraRig> {
        self.rigs.get(&RigKey::new(position, look_at)).copied()
    }

    #[cfg(any(test, feature = "view_debug"))]
    pub fn len(&self) -> usize {
        self.rigs.len()
    }
}
