//! Read-only preset collections driving time-of-day and viewpoint selection.
use std::time::Duration;

use bevy::prelude::*;

use crate::control::errors::{PresetCollection, SceneControlError};

/// Camera-view key meaning "no virtual camera, player controls the view".
pub const FREE_CAMERA_KEY: &str = "Free Camera";

pub const SECONDS_PER_DAY: u32 = 86_400;

const DEFAULT_CAMERA_TRANSITION_SECS: f32 = 0.5;

/// A named time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePreset {
    pub key: String,
    pub seconds_of_day: u32,
}

impl TimePreset {
    pub fn new(key: impl Into<String>, seconds_of_day: u32) -> Self {
        Self {
            key: key.into(),
            seconds_of_day,
        }
    }

    /// Fraction of the day in `[0, 1)`.
    pub fn day_fraction(&self) -> f32 {
        self.seconds_of_day as f32 / SECONDS_PER_DAY as f32
    }
}

/// A named fixed viewpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPoint {
    pub key: String,
    pub position: Vec3,
    pub look_at: Vec3,
}

impl ViewPoint {
    pub fn new(key: impl Into<String>, position: Vec3, look_at: Vec3) -> Self {
        Self {
            key: key.into(),
            position,
            look_at,
        }
    }
}

/// Which of the two view collections a selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewCollection {
    Camera,
    Sky,
}

impl ViewCollection {
    pub fn preset_collection(self) -> PresetCollection {
        match self {
            Self::Camera => PresetCollection::CameraViews,
            Self::Sky => PresetCollection::SkyViews,
        }
    }
}

/// Where the avatar occlusion volume sits when enabled, and where it is parked otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionRegion {
    pub center: Vec3,
    pub size: Vec3,
    pub disabled_position: Vec3,
}

impl Default for OcclusionRegion {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 4.0, 0.0),
            size: Vec3::new(48.0, 8.0, 48.0),
            disabled_position: Vec3::new(0.0, -1000.0, 0.0),
        }
    }
}

/// Immutable registry of every selectable preset.
#[derive(Resource, Debug, Clone)]
pub struct PresetRegistry {
    time_presets: Vec<TimePreset>,
    default_time: usize,
    camera_views: Vec<ViewPoint>,
    sky_views: Vec<ViewPoint>,
    camera_transition: Duration,
    occlusion: OcclusionRegion,
}

impl PresetRegistry {
    /// Builds a registry; time presets are ordered by time of day and an empty
    /// list is replaced with the hourly presets.
    pub fn new(
        mut time_presets: Vec<TimePreset>,
        camera_views: Vec<ViewPoint>,
        sky_views: Vec<ViewPoint>,
    ) -> Self {
        if time_presets.is_empty() {
            time_presets = hourly_time_presets();
        }
        time_presets.sort_by_key(|preset| preset.seconds_of_day);

        Self {
            time_presets,
            default_time: 0,
            camera_views,
            sky_views,
            camera_transition: Duration::from_secs_f32(DEFAULT_CAMERA_TRANSITION_SECS),
            occlusion: OcclusionRegion::default(),
        }
    }

    /// Selects the initial time preset. Unknown keys keep the first preset.
    pub fn with_default_time(mut self, key: &str) -> Self {
        match self.time_presets.iter().position(|preset| preset.key == key) {
            Some(index) => self.default_time = index,
            None => warn!(
                "Default time preset '{}' not found; using '{}'",
                key, self.time_presets[0].key
            ),
        }
        self
    }

    pub fn with_camera_transition(mut self, transition: Duration) -> Self {
        self.camera_transition = transition;
        self
    }

    pub fn with_occlusion(mut self, occlusion: OcclusionRegion) -> Self {
        self.occlusion = occlusion;
        self
    }

    /// Time presets ordered by seconds of day.
    pub fn time_presets(&self) -> &[TimePreset] {
        &self.time_presets
    }

    pub fn default_time(&self) -> &TimePreset {
        &self.time_presets[self.default_time]
    }

    pub fn time_preset(&self, key: &str) -> Result<&TimePreset, SceneControlError> {
        self.time_presets
            .iter()
            .find(|preset| preset.key == key)
            .ok_or_else(|| SceneControlError::unknown_key(PresetCollection::TimePresets, key))
    }

    /// Fixed viewpoints of a collection; the free-camera sentinel is not part of it.
    pub fn views(&self, collection: ViewCollection) -> &[ViewPoint] {
        match collection {
            ViewCollection::Camera => &self.camera_views,
            ViewCollection::Sky => &self.sky_views,
        }
    }

    /// Selectable keys of a collection, with the free-camera sentinel leading the camera views.
    pub fn view_keys(&self, collection: ViewCollection) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.views(collection).len() + 1);
        if collection == ViewCollection::Camera {
            keys.push(FREE_CAMERA_KEY);
        }
        keys.extend(self.views(collection).iter().map(|view| view.key.as_str()));
        keys
    }

    pub fn view(&self, collection: ViewCollection, key: &str) -> Result<&ViewPoint, SceneControlError> {
        self.views(collection)
            .iter()
            .find(|view| view.key == key)
            .ok_or_else(|| SceneControlError::unknown_key(collection.preset_collection(), key))
    }

    pub fn camera_transition(&self) -> Duration {
        self.camera_transition
    }

    pub fn occlusion(&self) -> OcclusionRegion {
        self.occlusion
    }

    /// The presets shipped with the scene.
    pub fn builtin() -> Self {
        Self::new(hourly_time_presets(), builtin_camera_views(), builtin_sky_views())
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Formats seconds of day as `HH:MM`.
pub fn format_clock(seconds_of_day: u32) -> String {
    let minutes = (seconds_of_day % SECONDS_PER_DAY) / 60;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parses `HH:MM` into seconds of day.
pub fn parse_clock(value: &str) -> Option<u32> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 3600 + minutes * 60)
}

pub(crate) fn hourly_time_presets() -> Vec<TimePreset> {
    (0..24)
        .map(|hour| TimePreset::new(format!("{:02}:00", hour), hour * 3600))
        .collect()
}

pub(crate) fn builtin_camera_views() -> Vec<ViewPoint> {
    vec![
        ViewPoint::new("Overview", Vec3::new(0.0, 40.0, 45.0), Vec3::ZERO),
        ViewPoint::new("Plaza", Vec3::new(12.0, 4.0, 12.0), Vec3::new(0.0, 2.0, 0.0)),
        ViewPoint::new("Fountain", Vec3::new(-6.0, 2.5, 6.0), Vec3::new(0.0, 1.5, 0.0)),
        ViewPoint::new("Gate", Vec3::new(0.0, 3.0, -30.0), Vec3::new(0.0, 2.0, 0.0)),
        ViewPoint::new("Rooftop", Vec3::new(-20.0, 18.0, -20.0), Vec3::ZERO),
    ]
}

// One view per skybox capture orientation, all from the plaza centre.
pub(crate) fn builtin_sky_views() -> Vec<ViewPoint> {
    let eye = Vec3::new(0.0, 2.0, 0.0);
    vec![
        ViewPoint::new("Sky North", eye, Vec3::new(0.0, 10.0, -100.0)),
        ViewPoint::new("Sky East", eye, Vec3::new(100.0, 10.0, 0.0)),
        ViewPoint::new("Sky South", eye, Vec3::new(0.0, 10.0, 100.0)),
        ViewPoint::new("Sky West", eye, Vec3::new(-100.0, 10.0, 0.0)),
        ViewPoint::new("Sky Zenith", eye, Vec3::new(0.0, 100.0, -1.0)),
    ]
}
