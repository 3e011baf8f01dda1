//! Angular gap geometry for rotating rings
//!
//! A ring is a full circle with one opening. The opening is described by
//! a start angle and an angular width, both rotated by the ring's current
//! rotation. Angles are normalized to [0, 2π), so the opening may straddle
//! the 0/2π seam (end < start).

use serde::{Deserialize, Serialize};

use crate::normalize_angle;

/// A rotated opening in a ring, as a normalized angular interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapArc {
    /// Start angle (radians, normalized to [0, 2π))
    pub start: f32,
    /// End angle (radians, normalized to [0, 2π))
    pub end: f32,
}

impl GapArc {
    /// Build the gap from its base angle, width and the ring's rotation
    pub fn rotated(gap_start: f32, gap_size: f32, rotation: f32) -> Self {
        let start = normalize_angle(gap_start + rotation);
        Self {
            start,
            end: normalize_angle(start + gap_size),
        }
    }

    /// Whether the interval crosses the 0/2π seam
    #[inline]
    pub fn wraps(&self) -> bool {
        self.end < self.start
    }

    /// Angular width of the gap (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.end - self.start;
        if span < 0.0 {
            span += std::f32::consts::TAU;
        }
        span
    }

    /// Check if an angle lies inside the gap (both ends inclusive)
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = normalize_angle(theta);
        if self.wraps() {
            theta >= self.start || theta <= self.end
        } else {
            theta >= self.start && theta <= self.end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

    #[test]
    fn test_gap_straight_up() {
        let gap = GapArc::rotated(-FRAC_PI_2, FRAC_PI_4, 0.0);
        assert!(!gap.wraps());
        assert!(gap.contains_angle(-FRAC_PI_2));
        assert!(gap.contains_angle(-FRAC_PI_2 + 0.5));
        assert!(!gap.contains_angle(0.0));
        assert!(!gap.contains_angle(PI));
    }

    #[test]
    fn test_gap_wraparound() {
        // Rotated so the gap runs from 350° to 35°
        let gap = GapArc::rotated(-FRAC_PI_2, FRAC_PI_4, FRAC_PI_2 - 10f32.to_radians());
        assert!(gap.wraps());
        assert!(gap.contains_angle(0.0));
        assert!(gap.contains_angle(355f32.to_radians()));
        assert!(gap.contains_angle(30f32.to_radians()));
        assert!(!gap.contains_angle(PI));
        assert!((gap.angular_span() - FRAC_PI_4).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_wraps_full_turn() {
        let a = GapArc::rotated(-FRAC_PI_2, FRAC_PI_4, 0.3);
        let b = GapArc::rotated(-FRAC_PI_2, FRAC_PI_4, 0.3 + TAU);
        assert!((a.start - b.start).abs() < 1e-4);
        assert!((a.end - b.end).abs() < 1e-4);
    }
}
