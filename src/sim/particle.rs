//! Particle bursts left behind by shattered rings

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// A single fading particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Opacity, starts at 1.0 and only goes down
    pub alpha: f32,
}

/// Cloud of particles flying outward from a ring's circle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub particles: Vec<Particle>,
    /// Alpha lost per tick
    pub alpha_step: f32,
}

impl ParticleBurst {
    /// Scatter `count` particles on the circle of `ring_radius` around `center`
    ///
    /// Each particle flies outward along its own angle at a speed drawn
    /// uniformly from `speed_range`.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        center: Vec2,
        ring_radius: f32,
        count: usize,
        speed_range: (f32, f32),
        alpha_step: f32,
    ) -> Self {
        let (speed_min, speed_max) = speed_range;
        let particles = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let speed = speed_min + rng.random::<f32>() * (speed_max - speed_min);
                Particle {
                    pos: center + polar_to_cartesian(ring_radius, angle),
                    vel: polar_to_cartesian(speed, angle),
                    alpha: 1.0,
                }
            })
            .collect();

        Self {
            particles,
            alpha_step,
        }
    }

    /// Move every particle, fade it, and drop the ones that are fully transparent
    pub fn advance(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.alpha -= self.alpha_step;
        }
        self.particles.retain(|p| p.alpha > 0.0);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True once every particle has faded out
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
