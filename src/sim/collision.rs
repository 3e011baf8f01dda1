//! Ball/ring contact classification and response
//!
//! A ring is an infinitely thin circle around the world center. The ball
//! touches it when its disc overlaps the circle (with a little slack on the
//! outside). Touching inside the rotated gap means the ball slips through;
//! touching anywhere else means it bounces off the radial normal.

use glam::Vec2;

use super::gap::GapArc;
use crate::cartesian_to_polar;

/// Outcome of checking the ball against one ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingContact {
    /// Ball doesn't overlap the ring (or sits exactly on the center)
    None,
    /// Ball overlaps the ring inside its gap
    PassThrough,
    /// Ball overlaps the solid part; `normal` points from center toward the ball
    Bounce { normal: Vec2 },
}

/// Classify the ball against a ring of `ring_radius` with the given gap
///
/// `offset` is the ball position relative to the world center.
pub fn ball_ring_contact(
    offset: Vec2,
    ball_radius: f32,
    ring_radius: f32,
    margin: f32,
    gap: &GapArc,
) -> RingContact {
    let (dist, theta) = cartesian_to_polar(offset);

    // The radial normal is undefined at the exact center
    if dist <= f32::EPSILON {
        return RingContact::None;
    }

    let touching = dist + ball_radius >= ring_radius && dist - ball_radius <= ring_radius + margin;
    if !touching {
        return RingContact::None;
    }

    if gap.contains_angle(theta) {
        RingContact::PassThrough
    } else {
        RingContact::Bounce {
            normal: offset / dist,
        }
    }
}

/// Reflect velocity off a surface: v' = v - k(v·n)n
///
/// k = 2 is a pure elastic reflection; larger values overcorrect and push
/// the ball back harder than it came in.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, response: f32) -> Vec2 {
    velocity - response * velocity.dot(normal) * normal
}
