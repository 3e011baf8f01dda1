//! Simulation entities: the ball, the rings, and the viewport they live in
//!
//! Positions are in logical canvas pixels with y growing downward. Speeds
//! are per tick; there is no delta time anywhere in the simulation.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{RingContact, ball_ring_contact};
use super::gap::GapArc;
use super::particle::ParticleBurst;
use crate::renderer::Color;
use crate::settings::Settings;
use crate::{normalize_angle, polar_to_cartesian};

/// Logical (device-pixel-ratio independent) size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert a physical pixel size to logical units
    pub fn from_physical(width_px: f32, height_px: f32, scale: f32) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        Self {
            width: width_px / scale,
            height: height_px / scale,
        }
    }

    /// World center; everything rotates and collides around this point
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The single moving body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// Place the ball at `center` heading in a uniformly random direction
    pub fn launch<R: Rng + ?Sized>(rng: &mut R, center: Vec2, settings: &Settings) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = settings.launch_speed_min
            + rng.random::<f32>() * (settings.launch_speed_max - settings.launch_speed_min);
        Self::new(center, polar_to_cartesian(speed, angle), settings.ball_radius)
    }

    /// Apply asymmetric gravity, then move
    ///
    /// Above `center_y` the ball falls harder than it does below it, so bounce
    /// peaks drop quickly and the climb back up is slower.
    pub fn integrate(&mut self, center_y: f32, gravity_above: f32, gravity_below: f32) {
        if self.pos.y < center_y {
            self.vel.y += gravity_above;
        } else {
            self.vel.y += gravity_below;
        }
        self.pos += self.vel;
    }

    /// Bounce off the viewport edges
    ///
    /// Returns `(hit_side, hit_top_or_bottom)`. Sides only flip and damp the
    /// horizontal velocity; top and bottom also clamp the position inside.
    pub fn reflect_off_bounds(
        &mut self,
        viewport: Viewport,
        damping_x: f32,
        damping_y: f32,
    ) -> (bool, bool) {
        let r = self.radius;

        let hit_side = self.pos.x - r < 0.0 || self.pos.x + r > viewport.width;
        if hit_side {
            self.vel.x *= -damping_x;
        }

        let hit_floor = self.pos.y - r < 0.0 || self.pos.y + r > viewport.height;
        if hit_floor {
            self.vel.y *= -damping_y;
            // min before max so a viewport shorter than the ball can't panic
            self.pos.y = self.pos.y.min(viewport.height - r).max(r);
        }

        (hit_side, hit_floor)
    }

    /// Clamp each velocity component independently to ±`max`
    pub fn clamp_velocity(&mut self, max: f32) {
        self.vel.x = self.vel.x.clamp(-max, max);
        self.vel.y = self.vel.y.clamp(-max, max);
    }
}

/// Whether a ring still blocks the ball or has shattered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RingPhase {
    /// Rotating and colliding
    Active,
    /// Shattered; only its particles remain (possibly none)
    Shattered(ParticleBurst),
}

/// A circular obstacle with one rotating opening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Spawn order, innermost first
    pub index: usize,
    /// Distance from world center to the ring's arc
    pub radius: f32,
    /// Base angle of the gap before rotation
    pub gap_start: f32,
    /// Angular width of the gap
    pub gap_size: f32,
    /// Cumulative rotation, kept in [0, 2π)
    pub rotation: f32,
    /// Radians per tick
    pub rotation_speed: f32,
    pub color: Color,
    pub phase: RingPhase,
}

impl Ring {
    /// Build the ring at `index` from the settings
    pub fn new(index: usize, settings: &Settings) -> Self {
        Self {
            index,
            radius: settings.ring_radius(index),
            gap_start: settings.gap_start,
            gap_size: settings.gap_size,
            rotation: 0.0,
            rotation_speed: settings.rotation_speed,
            color: settings.ring_color(index),
            phase: RingPhase::Active,
        }
    }

    /// Build the full, ordered ring set (ascending radius)
    pub fn spawn_all(settings: &Settings) -> Vec<Ring> {
        (0..settings.ring_count)
            .map(|i| Ring::new(i, settings))
            .collect()
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        matches!(self.phase, RingPhase::Shattered(_))
    }

    /// Particles of a shattered ring (None while active)
    pub fn burst(&self) -> Option<&ParticleBurst> {
        match &self.phase {
            RingPhase::Active => None,
            RingPhase::Shattered(burst) => Some(burst),
        }
    }

    /// Rotate an active ring, or age the burst of a shattered one
    pub fn advance(&mut self) {
        match &mut self.phase {
            RingPhase::Active => {
                self.rotation = normalize_angle(self.rotation + self.rotation_speed);
            }
            RingPhase::Shattered(burst) => burst.advance(),
        }
    }

    /// Where the opening currently is
    pub fn current_gap(&self) -> GapArc {
        GapArc::rotated(self.gap_start, self.gap_size, self.rotation)
    }

    /// Classify the ball against this ring; shattered rings never collide
    pub fn check_collision(
        &self,
        ball_pos: Vec2,
        ball_radius: f32,
        center: Vec2,
        margin: f32,
    ) -> RingContact {
        if self.is_destroyed() {
            return RingContact::None;
        }
        ball_ring_contact(
            ball_pos - center,
            ball_radius,
            self.radius,
            margin,
            &self.current_gap(),
        )
    }

    /// Break the ring into a particle burst around `center`
    ///
    /// Returns false (and does nothing) if the ring was already shattered.
    pub fn shatter<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        center: Vec2,
        settings: &Settings,
    ) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let burst = ParticleBurst::spawn(
            rng,
            center,
            self.radius,
            settings.particle_count,
            (settings.particle_speed_min, settings.particle_speed_max),
            settings.particle_alpha_step,
        );
        self.phase = RingPhase::Shattered(burst);
        true
    }
}
