//! Grab controller configuration parsing from grab.toml files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::game::constants::grab as defaults;

/// What the scroll axis does while a body is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    /// Spin the held body around the camera's up axis
    #[default]
    Rotate,
    /// Push the held body away from or pull it toward the camera
    Distance,
}

/// Tuning for the grab/hold/throw controller.
///
/// Every field has a valid range; values outside it are clamped rather than
/// rejected, both by the setters and by [`GrabConfig::sanitized`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Maximum ray length for acquiring a body (> 0)
    pub grab_distance: f32,
    /// Collision-group bits the acquisition ray is filtered to
    pub grab_mask: u32,
    /// Closest allowed hold distance (>= 0)
    pub min_hold_distance: f32,
    /// Farthest allowed hold distance (>= min_hold_distance)
    pub max_hold_distance: f32,
    /// Spring constant, [100, 2000]
    pub spring_strength: f32,
    /// Velocity damping of the regulator and linear holding damping, [0, 50]
    pub damping_factor: f32,
    /// Target smoothing time constant in seconds, [0.01, 0.5]
    pub smooth_time: f32,
    /// Speed cap for the held body (>= 0)
    pub max_velocity: f32,
    /// Synthesize a throw velocity on release
    pub allow_throwing: bool,
    /// Forward throw speed, [0, 20]
    pub horizontal_throw_force: f32,
    /// Upward throw speed, [0, 20]
    pub vertical_throw_force: f32,
    /// Add the camera's own motion to the throw
    pub inherit_camera_velocity: bool,
    /// Scale of inherited camera motion, [0, 2]
    pub camera_velocity_multiplier: f32,
    /// Speed cap for the throw (>= 0)
    pub max_throw_velocity: f32,
    /// Scroll axis behavior while holding
    pub scroll_mode: ScrollMode,
    /// Angular velocity change per unit of scroll (>= 0)
    pub rotation_speed: f32,
    /// Hold distance change per unit of scroll (>= 0)
    pub distance_step: f32,
    /// Emit debug lines for the grab ray and hold targets
    pub show_debug_ray: bool,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            grab_distance: defaults::DEFAULT_GRAB_DISTANCE,
            grab_mask: u32::MAX,
            min_hold_distance: defaults::DEFAULT_MIN_HOLD_DISTANCE,
            max_hold_distance: defaults::DEFAULT_MAX_HOLD_DISTANCE,
            spring_strength: defaults::DEFAULT_SPRING_STRENGTH,
            damping_factor: defaults::DEFAULT_DAMPING_FACTOR,
            smooth_time: defaults::DEFAULT_SMOOTH_TIME,
            max_velocity: defaults::DEFAULT_MAX_VELOCITY,
            allow_throwing: true,
            horizontal_throw_force: defaults::DEFAULT_HORIZONTAL_THROW_FORCE,
            vertical_throw_force: defaults::DEFAULT_VERTICAL_THROW_FORCE,
            inherit_camera_velocity: true,
            camera_velocity_multiplier: defaults::DEFAULT_CAMERA_VELOCITY_MULTIPLIER,
            max_throw_velocity: defaults::DEFAULT_MAX_THROW_VELOCITY,
            scroll_mode: ScrollMode::Rotate,
            rotation_speed: defaults::DEFAULT_ROTATION_SPEED,
            distance_step: defaults::DEFAULT_DISTANCE_STEP,
            show_debug_ray: true,
        }
    }
}

/// Clamp into `[lo, hi]`, falling back when the input is not a number.
fn clamp_param(value: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

const NON_NEGATIVE: (f32, f32) = (0.0, f32::MAX);

impl GrabConfig {
    /// Load grab configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path.to_path_buf())
    }

    /// Parse grab configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, PathBuf::from("<inline>"))
    }

    fn parse(content: &str, path: PathBuf) -> Result<Self, ConfigError> {
        let config: GrabConfig =
            toml::from_str(content).map_err(|source| ConfigError::Parse { path, source })?;
        Ok(config.sanitized())
    }

    /// Returns a copy with every field pulled into its valid range.
    pub fn sanitized(&self) -> Self {
        let fresh = Self::default();
        let mut c = self.clone();
        c.set_grab_distance(self.grab_distance);
        c.min_hold_distance =
            clamp_param(self.min_hold_distance, NON_NEGATIVE, fresh.min_hold_distance);
        c.max_hold_distance = clamp_param(
            self.max_hold_distance,
            (c.min_hold_distance, f32::MAX),
            fresh.max_hold_distance.max(c.min_hold_distance),
        );
        c.set_spring_strength(self.spring_strength);
        c.set_damping_factor(self.damping_factor);
        c.set_smooth_time(self.smooth_time);
        c.set_max_velocity(self.max_velocity);
        c.set_horizontal_throw_force(self.horizontal_throw_force);
        c.set_vertical_throw_force(self.vertical_throw_force);
        c.set_camera_velocity_multiplier(self.camera_velocity_multiplier);
        c.set_max_throw_velocity(self.max_throw_velocity);
        c.set_rotation_speed(self.rotation_speed);
        c.set_distance_step(self.distance_step);
        c
    }

    pub fn set_grab_distance(&mut self, value: f32) {
        self.grab_distance = clamp_param(
            value,
            (defaults::MIN_GRAB_DISTANCE, f32::MAX),
            defaults::DEFAULT_GRAB_DISTANCE,
        );
    }

    /// Sets both hold distance bounds. A max below the min is raised to the min.
    pub fn set_hold_distance_bounds(&mut self, min: f32, max: f32) {
        self.min_hold_distance =
            clamp_param(min, NON_NEGATIVE, defaults::DEFAULT_MIN_HOLD_DISTANCE);
        self.max_hold_distance = clamp_param(
            max,
            (self.min_hold_distance, f32::MAX),
            defaults::DEFAULT_MAX_HOLD_DISTANCE.max(self.min_hold_distance),
        );
    }

    pub fn set_spring_strength(&mut self, value: f32) {
        self.spring_strength = clamp_param(
            value,
            defaults::SPRING_STRENGTH_RANGE,
            defaults::DEFAULT_SPRING_STRENGTH,
        );
    }

    pub fn set_damping_factor(&mut self, value: f32) {
        self.damping_factor = clamp_param(
            value,
            defaults::DAMPING_FACTOR_RANGE,
            defaults::DEFAULT_DAMPING_FACTOR,
        );
    }

    pub fn set_smooth_time(&mut self, value: f32) {
        self.smooth_time =
            clamp_param(value, defaults::SMOOTH_TIME_RANGE, defaults::DEFAULT_SMOOTH_TIME);
    }

    pub fn set_max_velocity(&mut self, value: f32) {
        self.max_velocity = clamp_param(value, NON_NEGATIVE, defaults::DEFAULT_MAX_VELOCITY);
    }

    pub fn set_horizontal_throw_force(&mut self, value: f32) {
        self.horizontal_throw_force = clamp_param(
            value,
            defaults::THROW_FORCE_RANGE,
            defaults::DEFAULT_HORIZONTAL_THROW_FORCE,
        );
    }

    pub fn set_vertical_throw_force(&mut self, value: f32) {
        self.vertical_throw_force = clamp_param(
            value,
            defaults::THROW_FORCE_RANGE,
            defaults::DEFAULT_VERTICAL_THROW_FORCE,
        );
    }

    pub fn set_camera_velocity_multiplier(&mut self, value: f32) {
        self.camera_velocity_multiplier = clamp_param(
            value,
            defaults::CAMERA_VELOCITY_MULTIPLIER_RANGE,
            defaults::DEFAULT_CAMERA_VELOCITY_MULTIPLIER,
        );
    }

    pub fn set_max_throw_velocity(&mut self, value: f32) {
        self.max_throw_velocity =
            clamp_param(value, NON_NEGATIVE, defaults::DEFAULT_MAX_THROW_VELOCITY);
    }

    pub fn set_rotation_speed(&mut self, value: f32) {
        self.rotation_speed = clamp_param(value, NON_NEGATIVE, defaults::DEFAULT_ROTATION_SPEED);
    }

    pub fn set_distance_step(&mut self, value: f32) {
        self.distance_step = clamp_param(value, NON_NEGATIVE, defaults::DEFAULT_DISTANCE_STEP);
    }

    /// Clamp a hold distance into the configured bounds
    pub fn clamp_hold_distance(&self, distance: f32) -> f32 {
        if distance.is_finite() {
            distance.clamp(self.min_hold_distance, self.max_hold_distance)
        } else {
            self.min_hold_distance
        }
    }

    /// Linear damping applied to a body while it is held
    pub fn holding_linear_damping(&self) -> f32 {
        self.damping_factor
    }

    /// Angular damping applied to a body while it is held
    pub fn holding_angular_damping(&self) -> f32 {
        self.damping_factor * defaults::ANGULAR_HOLD_DAMPING_RATIO
    }
}

/// Errors that can occur when loading grab configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = GrabConfig::from_toml_str("spring_strength = 800.0").unwrap();
        assert_eq!(config.spring_strength, 800.0);
        assert_eq!(config.grab_distance, defaults::DEFAULT_GRAB_DISTANCE);
        assert_eq!(config.scroll_mode, ScrollMode::Rotate);
    }

    #[test]
    fn test_scroll_mode_parses_snake_case() {
        let config = GrabConfig::from_toml_str("scroll_mode = \"distance\"").unwrap();
        assert_eq!(config.scroll_mode, ScrollMode::Distance);
    }

    #[test]
    fn test_out_of_range_values_are_clamped_on_load() {
        let config = GrabConfig::from_toml_str(
            r#"
            spring_strength = 5.0
            damping_factor = 90.0
            smooth_time = 0.0
            horizontal_throw_force = -3.0
            camera_velocity_multiplier = 7.0
            max_velocity = -1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.spring_strength, 100.0);
        assert_eq!(config.damping_factor, 50.0);
        assert_eq!(config.smooth_time, 0.01);
        assert_eq!(config.horizontal_throw_force, 0.0);
        assert_eq!(config.camera_velocity_multiplier, 2.0);
        assert_eq!(config.max_velocity, 0.0);
    }

    #[test]
    fn test_inverted_hold_bounds_collapse_to_min() {
        let config =
            GrabConfig::from_toml_str("min_hold_distance = 4.0\nmax_hold_distance = 2.0").unwrap();
        assert_eq!(config.min_hold_distance, 4.0);
        assert_eq!(config.max_hold_distance, 4.0);
        assert_eq!(config.clamp_hold_distance(10.0), 4.0);
        assert_eq!(config.clamp_hold_distance(0.5), 4.0);
    }

    #[test]
    fn test_setters_clamp_and_reject_nan() {
        let mut config = GrabConfig::default();
        config.set_spring_strength(1.0e6);
        assert_eq!(config.spring_strength, 2000.0);
        config.set_smooth_time(f32::NAN);
        assert_eq!(config.smooth_time, defaults::DEFAULT_SMOOTH_TIME);
        config.set_hold_distance_bounds(-1.0, 3.0);
        assert_eq!(config.min_hold_distance, 0.0);
        assert_eq!(config.max_hold_distance, 3.0);
    }

    #[test]
    fn test_holding_damping_values() {
        let mut config = GrabConfig::default();
        config.set_damping_factor(20.0);
        assert_eq!(config.holding_linear_damping(), 20.0);
        assert_eq!(config.holding_angular_damping(), 10.0);
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = GrabConfig::from_toml_str("spring_strength = \"stiff\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = GrabConfig::from_file(Path::new("/nonexistent/grab.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
