//! Error types surfaced by the time and view controllers.
use std::fmt;

/// Registry collections a selection key can be resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetCollection {
    TimePresets,
    CameraViews,
    SkyViews,
}

impl fmt::Display for PresetCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TimePresets => "time presets",
            Self::CameraViews => "camera views",
            Self::SkyViews => "sky views",
        };
        write!(f, "{}", label)
    }
}

/// Failures returned by controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneControlError {
    /// The key is not part of the requested registry collection. No state changed.
    UnknownPresetKey {
        collection: PresetCollection,
        key: String,
    },
    /// The host runtime could not create or mutate an entity or resource.
    EngineOperationFailed {
        operation: &'static str,
        message: String,
    },
}

impl SceneControlError {
    pub fn unknown_key(collection: PresetCollection, key: impl Into<String>) -> Self {
        Self::UnknownPresetKey {
            collection,
            key: key.into(),
        }
    }

    pub fn engine_failure(operation: &'static str, message: impl Into<String>) -> Self {
        Self::EngineOperationFailed {
            operation,
            message: message.into(),
        }
    }

    /// Engine failures indicate a broken host runtime and are never retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EngineOperationFailed { .. })
    }
}

impl fmt::Display for SceneControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPresetKey { collection, key } => {
                write!(f, "Unknown preset key '{}' in {}", key, collection)
            }
            Self::EngineOperationFailed { operation, message } => {
                write!(f, "Engine operation '{}' failed: {}", operation, message)
            }
        }
    }
}

impl std::error::Error for SceneControlError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_error_variants() {
        let unknown = SceneControlError::unknown_key(PresetCollection::CameraViews, "Nowhere");
        match &unknown {
            SceneControlError::UnknownPresetKey { collection, key } => {
                assert_eq!(*collection, PresetCollection::CameraViews);
                assert_eq!(key, "Nowhere");
            }
            _ => panic!("expected unknown key variant"),
        }
        assert!(!unknown.is_fatal());
        assert!(unknown.to_string().contains("camera views"));

        let failure = SceneControlError::engine_failure("bind_camera", "entity despawned");
        assert!(failure.is_fatal());
        assert!(failure.to_string().contains("bind_camera"));
        assert!(failure.to_string().contains("entity despawned"));
    }
}
