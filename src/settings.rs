//! Simulation tuning
//!
//! Every number that shapes the simulation lives here. Defaults reproduce
//! the reference feel; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::renderer::Color;

/// How ring collisions within a single tick see the ball's velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// A bounce off one ring is visible to the next ring checked in the same tick
    #[default]
    Sequential,
    /// Every ring sees the velocity from before the collision pass; responses are summed
    Snapshot,
}

impl CollisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionMode::Sequential => "sequential",
            CollisionMode::Snapshot => "snapshot",
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gravity ===
    pub gravity: f32,
    pub gravity_above_factor: f32,
    pub gravity_below_factor: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    pub max_component_speed: f32,
    pub wall_damping_x: f32,
    pub wall_damping_y: f32,

    // === Rings ===
    pub ring_count: usize,
    pub ring_base_radius: f32,
    pub ring_spacing: f32,
    pub ring_stroke_width: f32,
    pub gap_start: f32,
    pub gap_size: f32,
    pub rotation_speed: f32,
    pub ring_colors: Vec<Color>,

    // === Collision ===
    pub collision_margin: f32,
    pub bounce_response: f32,
    pub collision_mode: CollisionMode,

    // === Particles ===
    pub particle_count: usize,
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
    pub particle_alpha_step: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            gravity_above_factor: GRAVITY_ABOVE_FACTOR,
            gravity_below_factor: GRAVITY_BELOW_FACTOR,

            ball_radius: BALL_RADIUS,
            launch_speed_min: LAUNCH_SPEED_MIN,
            launch_speed_max: LAUNCH_SPEED_MAX,
            max_component_speed: MAX_COMPONENT_SPEED,
            wall_damping_x: WALL_DAMPING_X,
            wall_damping_y: WALL_DAMPING_Y,

            ring_count: RING_COUNT,
            ring_base_radius: RING_BASE_RADIUS,
            ring_spacing: RING_SPACING,
            ring_stroke_width: RING_STROKE_WIDTH,
            gap_start: GAP_START,
            gap_size: GAP_SIZE,
            rotation_speed: RING_ROTATION_SPEED,
            ring_colors: RING_COLORS
                .iter()
                .filter_map(|hex| Color::from_hex(hex))
                .collect(),

            collision_margin: COLLISION_MARGIN,
            bounce_response: BOUNCE_RESPONSE,
            collision_mode: CollisionMode::Sequential,

            particle_count: PARTICLE_COUNT,
            particle_speed_min: PARTICLE_SPEED_MIN,
            particle_speed_max: PARTICLE_SPEED_MAX,
            particle_alpha_step: PARTICLE_ALPHA_STEP,
        }
    }
}

impl Settings {
    /// Gravity applied while the ball is above the world center
    pub fn gravity_above(&self) -> f32 {
        self.gravity * self.gravity_above_factor
    }

    /// Gravity applied while the ball is level with or below the world center
    pub fn gravity_below(&self) -> f32 {
        self.gravity * self.gravity_below_factor
    }

    /// Radius of the ring at `index` (0 = innermost)
    pub fn ring_radius(&self, index: usize) -> f32 {
        self.ring_base_radius + index as f32 * self.ring_spacing
    }

    /// Color of the ring at `index`, cycling through the palette
    pub fn ring_color(&self, index: usize) -> Color {
        if self.ring_colors.is_empty() {
            Color::BLACK
        } else {
            self.ring_colors[index % self.ring_colors.len()]
        }
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json).inspect_err(|e| {
            log::warn!("Rejected settings from {}: {}", path.display(), e);
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check that every value is finite and in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("gravity", self.gravity),
            ("gravity_above_factor", self.gravity_above_factor),
            ("gravity_below_factor", self.gravity_below_factor),
            ("ball_radius", self.ball_radius),
            ("launch_speed_min", self.launch_speed_min),
            ("launch_speed_max", self.launch_speed_max),
            ("max_component_speed", self.max_component_speed),
            ("wall_damping_x", self.wall_damping_x),
            ("wall_damping_y", self.wall_damping_y),
            ("ring_base_radius", self.ring_base_radius),
            ("ring_spacing", self.ring_spacing),
            ("ring_stroke_width", self.ring_stroke_width),
            ("gap_start", self.gap_start),
            ("gap_size", self.gap_size),
            ("rotation_speed", self.rotation_speed),
            ("collision_margin", self.collision_margin),
            ("bounce_response", self.bounce_response),
            ("particle_speed_min", self.particle_speed_min),
            ("particle_speed_max", self.particle_speed_max),
            ("particle_alpha_step", self.particle_alpha_step),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} must be finite", name)));
        }

        if self.ball_radius <= 0.0 {
            return Err(invalid("ball_radius must be positive"));
        }
        if self.ring_base_radius <= 0.0 {
            return Err(invalid("ring_base_radius must be positive"));
        }
        // Radii must strictly increase with index
        if self.ring_count > 1 && self.ring_spacing <= 0.0 {
            return Err(invalid("ring_spacing must be positive"));
        }
        if self.gap_size <= 0.0 || self.gap_size >= std::f32::consts::TAU {
            return Err(invalid("gap_size must be in (0, 2π)"));
        }
        if self.launch_speed_min < 0.0 || self.launch_speed_min > self.launch_speed_max {
            return Err(invalid("launch speed range is inverted or negative"));
        }
        if self.particle_speed_min < 0.0 || self.particle_speed_min > self.particle_speed_max {
            return Err(invalid("particle speed range is inverted or negative"));
        }
        if self.max_component_speed <= 0.0 {
            return Err(invalid("max_component_speed must be positive"));
        }
        for (name, damping) in [
            ("wall_damping_x", self.wall_damping_x),
            ("wall_damping_y", self.wall_damping_y),
        ] {
            if !(0.0..=1.0).contains(&damping) {
                return Err(invalid(format!("{} must be in [0, 1]", name)));
            }
        }
        if self.particle_alpha_step <= 0.0 {
            return Err(invalid("particle_alpha_step must be positive"));
        }
        if self.collision_margin < 0.0 {
            return Err(invalid("collision_margin must not be negative"));
        }
        if self.ring_count > 0 && self.ring_colors.is_empty() {
            return Err(invalid("ring_colors must not be empty"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.ring_colors.len(), 6);
        assert!((settings.gravity_above() - 0.18).abs() < 1e-6);
        assert!((settings.gravity_below() - 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_ring_radius_and_color_cycle() {
        let settings = Settings::default();
        assert_eq!(settings.ring_radius(0), 80.0);
        assert_eq!(settings.ring_radius(5), 255.0);
        assert_eq!(settings.ring_color(6), settings.ring_color(0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "ring_count": 3, "collision_mode": "snapshot" }"#).unwrap();
        assert_eq!(settings.ring_count, 3);
        assert_eq!(settings.collision_mode, CollisionMode::Snapshot);
        assert_eq!(settings.ball_radius, BALL_RADIUS);
    }

    #[test]
    fn test_json_roundtrip_keeps_colors() {
        let settings = Settings::default();
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "gap_size": 0.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "launch_speed_min": 5.0, "launch_speed_max": 1.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "wall_damping_y": 1.5 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "ring_colors": ["not-a-color"] }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
