//! Ring Burst - a ball bouncing inside concentric rotating rings
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, rings, particle bursts, world tick)
//! - `renderer`: Drawing surface abstraction and scene renderer
//! - `platform`: Frame driver, cancellation, browser integration
//! - `settings`: Data-driven tuning

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SurfaceError};
pub use settings::{CollisionMode, Settings};

use glam::Vec2;

/// Simulation constants (units are pixels and ticks, not seconds)
pub mod consts {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    /// Base gravity added to vertical velocity every tick
    pub const GRAVITY: f32 = 0.15;
    /// Gravity multiplier while the ball is above the world center
    pub const GRAVITY_ABOVE_FACTOR: f32 = 1.2;
    /// Gravity multiplier while the ball is level with or below the world center
    pub const GRAVITY_BELOW_FACTOR: f32 = 0.8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 16.0;
    pub const LAUNCH_SPEED_MIN: f32 = 1.5;
    pub const LAUNCH_SPEED_MAX: f32 = 3.0;
    /// Per-axis velocity cap
    pub const MAX_COMPONENT_SPEED: f32 = 6.0;

    /// Outer boundary damping (applied on reflection)
    pub const WALL_DAMPING_X: f32 = 0.9;
    pub const WALL_DAMPING_Y: f32 = 0.8;

    /// Ring layout
    pub const RING_COUNT: usize = 6;
    pub const RING_BASE_RADIUS: f32 = 80.0;
    pub const RING_SPACING: f32 = 35.0;
    pub const RING_STROKE_WIDTH: f32 = 16.0;
    /// Gap starts straight up from the center (canvas y grows downward)
    pub const GAP_START: f32 = -FRAC_PI_2;
    pub const GAP_SIZE: f32 = FRAC_PI_4;
    /// Radians per tick
    pub const RING_ROTATION_SPEED: f32 = 0.02;
    pub const RING_COLORS: [&str; 6] = [
        "#dfb220", "#ea2636", "#6dc993", "#fc2936", "#eeb421", "#6dc993",
    ];

    /// Extra radial slack on the outside of a ring so fast balls don't tunnel
    pub const COLLISION_MARGIN: f32 = 2.0;
    /// Reflection coefficient (2.0 would be a pure elastic reflection)
    pub const BOUNCE_RESPONSE: f32 = 2.5;

    /// Particle bursts
    pub const PARTICLE_COUNT: usize = 100;
    pub const PARTICLE_SPEED_MIN: f32 = 1.0;
    pub const PARTICLE_SPEED_MAX: f32 = 3.0;
    pub const PARTICLE_ALPHA_STEP: f32 = 0.01;
    pub const PARTICLE_RADIUS: f32 = 2.0;

    /// Nominal frame rate the per-tick speeds are tuned for
    pub const NOMINAL_FPS: u32 = 60;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta in [0, 2π)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), normalize_angle(pos.y.atan2(pos.x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_normalize_angle_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-FRAC_PI_2) - 1.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!(normalize_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_polar_roundtrip_straight_up() {
        // Canvas y points down, so "up" is negative y
        let (r, theta) = cartesian_to_polar(Vec2::new(0.0, -10.0));
        assert!((r - 10.0).abs() < 1e-5);
        assert!((theta - 1.5 * PI).abs() < 1e-5);

        let p = polar_to_cartesian(r, theta);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y + 10.0).abs() < 1e-4);
    }
}
