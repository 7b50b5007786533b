//! TOML overrides for the preset registry.
use std::{collections::BTreeMap, collections::HashSet, fs, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

use crate::config::config_path;
use crate::presets::registry::{
    builtin_camera_views, builtin_sky_views, hourly_time_presets, parse_clock, OcclusionRegion,
    PresetRegistry, TimePreset, ViewPoint, FREE_CAMERA_KEY, SECONDS_PER_DAY,
};

const CONFIG_FILE: &str = "presets.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawPresetConfig {
    #[serde(default)]
    time: RawTimeSection,
    #[serde(default)]
    camera_views: Option<Vec<RawViewPoint>>,
    #[serde(default)]
    sky_views: Option<Vec<RawViewPoint>>,
    #[serde(default)]
    camera: RawCameraSection,
    #[serde(default)]
    occlusion: RawOcclusionSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTimeSection {
    default: Option<String>,
    presets: Option<BTreeMap<String, RawTimeValue>>,
}

/// Either raw seconds of day or an `HH:MM` clock string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawTimeValue {
    Seconds(i64),
    Clock(String),
}

impl RawTimeValue {
    fn seconds_of_day(&self) -> Option<u32> {
        match self {
            Self::Seconds(seconds) => u32::try_from(*seconds)
                .ok()
                .filter(|seconds| *seconds < SECONDS_PER_DAY),
            Self::Clock(clock) => parse_clock(clock),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawViewPoint {
    key: String,
    position: [f32; 3],
    look_at: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCameraSection {
    transition_seconds: f32,
}

impl Default for RawCameraSection {
    fn default() -> Self {
        Self {
            transition_seconds: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawOcclusionSection {
    region_center: [f32; 3],
    region_size: [f32; 3],
    disabled_position: [f32; 3],
}

impl Default for RawOcclusionSection {
    fn default() -> Self {
        let region = OcclusionRegion::default();
        Self {
            region_center: region.center.to_array(),
            region_size: region.size.to_array(),
            disabled_position: region.disabled_position.to_array(),
        }
    }
}

impl PresetRegistry {
    /// Loads `presets.toml` from the config directory, falling back to the built-in presets.
    pub fn load_or_default() -> Self {
        let path = config_path(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(data) => match Self::from_toml_str(&data) {
                Ok(registry) => registry,
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to built-in presets.",
                        path.display(),
                        err
                    );
                    RawPresetConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to built-in presets.",
                    path.display(),
                    err
                );
                RawPresetConfig::default().into()
            }
        }
    }

    pub fn from_toml_str(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawPresetConfig>(data).map(Into::into)
    }
}

impl From<RawPresetConfig> for PresetRegistry {
    fn from(value: RawPresetConfig) -> Self {
        let time_presets = match value.time.presets {
            Some(raw) => time_presets_from_raw(raw),
            None => hourly_time_presets(),
        };
        let camera_views = value
            .camera_views
            .map(|raw| views_from_raw("camera_views", raw))
            .unwrap_or_else(builtin_camera_views);
        let sky_views = value
            .sky_views
            .map(|raw| views_from_raw("sky_views", raw))
            .unwrap_or_else(builtin_sky_views)
            .into_iter()
            .filter(|view| {
                let shadowed = camera_views.iter().any(|camera| camera.key == view.key);
                if shadowed {
                    warn!("Dropping sky_views entry '{}': key names a camera view", view.key);
                }
                !shadowed
            })
            .collect();

        let occlusion = OcclusionRegion {
            center: Vec3::from_array(value.occlusion.region_center),
            size: Vec3::from_array(value.occlusion.region_size).abs(),
            disabled_position: Vec3::from_array(value.occlusion.disabled_position),
        };
        let transition_seconds = value.camera.transition_seconds;
        let transition = Duration::try_from_secs_f32(transition_seconds).unwrap_or_else(|err| {
            warn!(
                "Ignoring camera transition of {}s ({}); using 0.5s",
                transition_seconds, err
            );
            Duration::from_millis(500)
        });

        let registry = PresetRegistry::new(time_presets, camera_views, sky_views)
            .with_camera_transition(transition)
            .with_occlusion(occlusion);

        match value.time.default.as_deref() {
            Some(key) => registry.with_default_time(key),
            None => registry,
        }
    }
}

fn time_presets_from_raw(raw: BTreeMap<String, RawTimeValue>) -> Vec<TimePreset> {
    raw.into_iter()
        .filter_map(|(key, value)| match value.seconds_of_day() {
            Some(seconds) => Some(TimePreset::new(key, seconds)),
            None => {
                warn!("Dropping time preset '{}': {:?} is not a time of day", key, value);
                None
            }
        })
        .collect()
}

fn views_from_raw(section: &str, raw: Vec<RawViewPoint>) -> Vec<ViewPoint> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|view| {
            let position = Vec3::from_array(view.position);
            let look_at = Vec3::from_array(view.look_at);
            if view.key == FREE_CAMERA_KEY {
                warn!("Dropping {} entry '{}': key is reserved", section, view.key);
                return None;
            }
            if !position.is_finite() || !look_at.is_finite() {
                warn!("Dropping {} entry '{}': non-finite coordinates", section, view.key);
                return None;
            }
            if !seen.insert(view.key.clone()) {
                warn!("Dropping duplicate {} entry '{}'", section, view.key);
                return None;
            }
            Some(ViewPoint::new(view.key, position, look_at))
        })
        .collect()
}
