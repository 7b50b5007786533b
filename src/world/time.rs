//! Skybox time, the rendered world clock, and time-of-day lighting.
use std::{f32::consts::TAU, fs};

use bevy::prelude::*;
use serde::Deserialize;

use crate::config::config_path;
use crate::presets::registry::SECONDS_PER_DAY;
use crate::world::components::PrimarySun;

const CONFIG_FILE: &str = "time.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawTimeConfig {
    #[serde(default)]
    transition: RawTransitionSection,
    #[serde(default)]
    clock: RawClockSection,
    #[serde(default)]
    lighting: RawLightingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTransitionSection {
    seconds: f32,
}

impl Default for RawTransitionSection {
    fn default() -> Self {
        Self { seconds: 2.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawClockSection {
    sunrise_fraction: f32,
    sunset_fraction: f32,
    sun_declination_radians: f32,
}

impl Default for RawClockSection {
    fn default() -> Self {
        Self {
            sunrise_fraction: 0.25,
            sunset_fraction: 0.79,
            sun_declination_radians: 0.4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawLightingSection {
    noon_lux: f32,
    night_lux: f32,
    ambient_day: [f32; 3],
    ambient_night: [f32; 3],
}

impl Default for RawLightingSection {
    fn default() -> Self {
        Self {
            noon_lux: 50_000.0,
            night_lux: 5.0,
            ambient_day: [0.35, 0.35, 0.4],
            ambient_night: [0.05, 0.05, 0.1],
        }
    }
}

/// Tunable parameters for sky transitions and lighting.
#[derive(Resource, Debug, Clone)]
pub struct WorldTimeSettings {
    pub transition_seconds: f32,
    pub sunrise_fraction: f32,
    pub sunset_fraction: f32,
    pub sun_declination: f32,
    pub noon_lux: f32,
    pub night_lux: f32,
    pub ambient_day: Vec3,
    pub ambient_night: Vec3,
}

impl WorldTimeSettings {
    pub fn load_or_default() -> Self {
        let path = config_path(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(data) => match toml::from_str::<RawTimeConfig>(&data) {
                Ok(raw) => raw.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        path.display(),
                        err
                    );
                    RawTimeConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                RawTimeConfig::default().into()
            }
        }
    }
}

impl Default for WorldTimeSettings {
    fn default() -> Self {
        RawTimeConfig::default().into()
    }
}

impl From<RawTimeConfig> for WorldTimeSettings {
    fn from(value: RawTimeConfig) -> Self {
        let clock = value.clock;
        let lighting = value.lighting;

        let sunrise = clock.sunrise_fraction.clamp(0.0, 1.0);
        let sunset = clock.sunset_fraction.clamp(0.0, 1.0);
        let (sunrise, sunset) = if sunrise == sunset {
            (sunrise, (sunrise + 0.5) % 1.0)
        } else {
            (sunrise.min(sunset), sunrise.max(sunset))
        };

        Self {
            transition_seconds: value.transition.seconds.max(0.0),
            sunrise_fraction: sunrise,
            sunset_fraction: sunset,
            sun_declination: clock.sun_declination_radians,
            noon_lux: lighting.noon_lux.max(lighting.night_lux),
            night_lux: lighting.night_lux.max(0.0),
            ambient_day: Vec3::from_array(lighting.ambient_day),
            ambient_night: Vec3::from_array(lighting.ambient_night),
        }
    }
}

/// How the sky moves from its current time to a newly fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeTransition {
    /// Always advance through the day, wrapping past midnight; never run backwards.
    #[default]
    Forward,
}

/// Global skybox time: the fixed time of day the lighting converges to.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkyboxTime {
    pub fixed_seconds: u32,
    pub transition: TimeTransition,
}

impl SkyboxTime {
    pub fn set_fixed(&mut self, seconds_of_day: u32, transition: TimeTransition) {
        self.fixed_seconds = seconds_of_day % SECONDS_PER_DAY;
        self.transition = transition;
    }

    pub fn day_fraction(&self) -> f32 {
        self.fixed_seconds as f32 / SECONDS_PER_DAY as f32
    }
}

#[derive(Debug, Clone, Copy)]
struct ClockTransition {
    from: f32,
    target: f32,
    distance: f32,
    elapsed: f32,
}

/// The day fraction currently rendered, animating towards the skybox time.
#[derive(Resource, Debug, Default)]
pub struct WorldClock {
    time_of_day: f32,
    transition: Option<ClockTransition>,
}

impl WorldClock {
    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    #[cfg(test)]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Jumps straight to `fraction`, cancelling any running transition.
    pub fn snap_to(&mut self, fraction: f32) {
        self.time_of_day = fraction.rem_euclid(1.0);
        self.transition = None;
    }

    /// Starts moving forward from the current fraction to `target`.
    pub fn begin_forward_transition(&mut self, target: f32) {
        let target = target.rem_euclid(1.0);
        let distance = (target - self.time_of_day).rem_euclid(1.0);
        if distance <= f32::EPSILON {
            self.snap_to(target);
            return;
        }
        self.transition = Some(ClockTransition {
            from: self.time_of_day,
            target,
            distance,
            elapsed: 0.0,
        });
    }

    fn tick(&mut self, delta_seconds: f32, duration_seconds: f32) {
        let Some(mut transition) = self.transition else {
            return;
        };

        transition.elapsed += delta_seconds.max(0.0);
        let progress = if duration_seconds <= 0.0 {
            1.0
        } else {
            (transition.elapsed / duration_seconds).min(1.0)
        };

        if progress >= 1.0 {
            self.snap_to(transition.target);
        } else {
            self.time_of_day = (transition.from + transition.distance * progress).rem_euclid(1.0);
            self.transition = Some(transition);
        }
    }
}

/// Starts a transition whenever the skybox time changes and advances the running one.
pub fn advance_sky_transition(
    skybox: Res<SkyboxTime>,
    settings: Res<WorldTimeSettings>,
    time: Res<Time>,
    mut clock: ResMut<WorldClock>,
) {
    if skybox.is_changed() {
        match skybox.transition {
            TimeTransition::Forward => clock.begin_forward_transition(skybox.day_fraction()),
        }
    }
    clock.tick(time.delta_secs(), settings.transition_seconds);
}

/// 0 at night, rising to 1 and back over the daylight span.
pub fn daylight_factor(day_fraction: f32, settings: &WorldTimeSettings) -> f32 {
    let daylight_span = settings.sunset_fraction - settings.sunrise_fraction;
    if daylight_span <= 0.0 {
        return 1.0;
    }
    if day_fraction < settings.sunrise_fraction || day_fraction > settings.sunset_fraction {
        return 0.0;
    }
    let normalized = (day_fraction - settings.sunrise_fraction) / daylight_span;
    (normalized * std::f32::consts::PI).sin().max(0.0)
}

/// Applies the rendered time of day to the primary sun and ambient light.
pub fn apply_world_lighting(
    clock: Res<WorldClock>,
    settings: Res<WorldTimeSettings>,
    mut ambient: ResMut<AmbientLight>,
    mut sun_query: Query<(&mut Transform, &mut DirectionalLight), With<PrimarySun>>,
) {
    let day_fraction = clock.time_of_day();
    let sun_angle = (day_fraction - 0.25) * TAU;
    let rotation =
        Quat::from_euler(EulerRot::ZYX, 0.0, settings.sun_declination, sun_angle).normalize();

    let daylight = daylight_factor(day_fraction, &settings);
    let intensity =
        settings.night_lux + (settings.noon_lux - settings.night_lux) * daylight.powf(1.5);

    let ambient_vec = settings.ambient_night.lerp(settings.ambient_day, daylight);
    ambient.color = Color::linear_rgb(ambient_vec.x, ambient_vec.y, ambient_vec.z);

    for (mut transform, mut light) in sun_query.iter_mut() {
        transform.rotation = rotation;
        light.illuminance = intensity;
    }
}
