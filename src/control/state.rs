//! The scene controller: active selection, rig cache, and occlusion volume.
use bevy::prelude::*;

use crate::control::{cache::VirtualCameraCache, errors::SceneControlError};
use crate::presets::FREE_CAMERA_KEY;

/// Currently selected presets.
#[cfg_attr(not(any(test, feature = "view_debug")), allow(dead_code))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveState {
    pub current_time_key: String,
    pub current_camera_key: String,
    pub avatar_hidden_enabled: bool,
}

impl ActiveState {
    pub fn new(time_key: impl Into<String>) -> Self {
        Self {
            current_time_key: time_key.into(),
            current_camera_key: FREE_CAMERA_KEY.to_string(),
            avatar_hidden_enabled: false,
        }
    }
}

/// Camera mode derived from the active state.
#[cfg(any(test, feature = "view_debug"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode<'a> {
    Free,
    Locked(&'a str),
}

/// Sole writer of the active state, the rig cache, and the occlusion volume.
#[derive(Resource, Debug)]
pub struct SceneController {
    pub(crate) state: ActiveState,
    pub(crate) rigs: VirtualCameraCache,
    pub(crate) primary_camera: Entity,
    pub(crate) occlusion_volume: Option<Entity>,
}

impl SceneController {
    pub fn new(primary_camera: Entity, default_time_key: impl Into<String>) -> Self {
        Self {
            state: ActiveState::new(default_time_key),
            rigs: VirtualCameraCache::default(),
            primary_camera,
            occlusion_volume: None,
        }
    }

    #[cfg(any(test, feature = "view_debug"))]
    pub fn state(&self) -> &ActiveState {
        &self.state
    }

    #[cfg(any(test, feature = "view_debug"))]
    pub fn rigs(&self) -> &VirtualCameraCache {
        &self.rigs
    }

    #[cfg(test)]
    pub fn primary_camera(&self) -> Entity {
        self.primary_camera
    }

    #[cfg(test)]
    pub fn occlusion_volume(&self) -> Option<Entity> {
        self.occlusion_volume
    }

    #[cfg(any(test, feature = "view_debug"))]
    pub fn view_mode(&self) -> ViewMode<'_> {
        if self.state.current_camera_key == FREE_CAMERA_KEY {
            ViewMode::Free
        } else {
            ViewMode::Locked(&self.state.current_camera_key)
        }
    }
}

/// Runs `operation` with the controller temporarily taken out of the world.
pub(crate) fn with_controller<U>(
    world: &mut World,
    operation: &'static str,
    f: impl FnOnce(&mut SceneController, &mut World) -> Result<U, SceneControlError>,
) -> Result<U, SceneControlError> {
    world
        .try_resource_scope(|world, mut controller: Mut<SceneController>| {
            f(&mut *controller, world)
        })
        .unwrap_or_else(|| {
            Err(SceneControlError::engine_failure(
                operation,
                "scene controller resource is missing",
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_free_mode_with_avatars_visible() {
        let controller = SceneController::new(Entity::PLACEHOLDER, "06:00");
        assert_eq!(controller.state().current_time_key, "06:00");
        assert_eq!(controller.state().current_camera_key, FREE_CAMERA_KEY);
        assert!(!controller.state().avatar_hidden_enabled);
        assert_eq!(controller.view_mode(), ViewMode::Free);
        assert!(controller.occlusion_volume().is_none());
        assert_eq!(controller.rigs().len(), 0);
    }

    #[test]
    fn missing_controller_is_an_engine_failure() {
        let mut world = World::new();
        let outcome = with_controller(&mut world, "probe", |_, _| Ok(()));
        assert!(matches!(
            outcome,
            Err(SceneControlError::EngineOperationFailed {
                operation: "probe",
                ..
            })
        ));
    }
}
