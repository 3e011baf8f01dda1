//! Rendering
//!
//! The simulation never draws. Each frame the renderer reads an immutable
//! [`Snapshot`] and issues a handful of 2D primitives to a [`Surface`]:
//! a background fill, one arc stroke per active ring, one dot per particle,
//! and the ball.

pub mod color;
pub mod recording;

pub use color::Color;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PARTICLE_RADIUS;
use crate::settings::Settings;
use crate::sim::{RingPhase, Snapshot, Viewport};

/// How the ends of a stroked arc are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    /// Canvas `lineCap` keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Stroke parameters for arcs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub cap: LineCap,
}

/// Drop shadow under a filled shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
}

/// A 2D drawing target with a known logical size
///
/// Coordinates are logical pixels; implementations handle any
/// device-pixel-ratio scaling themselves.
pub trait Surface {
    /// Current logical size
    fn viewport(&self) -> Viewport;

    /// Called after a resize notification so the surface can resize its backing store
    fn reconfigure(&mut self) {}

    /// Called once before each frame is drawn
    fn begin_frame(&mut self) {}

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Stroke the arc of `radius` around `center` from `start` to `end` (radians, clockwise on screen)
    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, stroke: &Stroke);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, shadow: Option<Shadow>);
}

/// Colors and sizes used to draw a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub background: Color,
    pub ball_color: Color,
    pub ball_shadow: Option<Shadow>,
    pub ring_width: f32,
    pub ring_cap: LineCap,
    /// Base particle color; each particle's alpha replaces the alpha channel
    pub particle_color: Color,
    pub particle_radius: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            ball_color: Color::RED,
            ball_shadow: Some(Shadow {
                color: Color::BLACK.with_alpha(0.3),
                blur: 12.0,
            }),
            ring_width: crate::consts::RING_STROKE_WIDTH,
            ring_cap: LineCap::Round,
            particle_color: Color::BLACK,
            particle_radius: PARTICLE_RADIUS,
        }
    }
}

impl RenderStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            ring_width: settings.ring_stroke_width,
            ..Self::default()
        }
    }
}

/// Draws snapshots onto a surface
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Draw one frame: background, rings (or their particles), then the ball
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, snapshot: &Snapshot<'_>) {
        let style = &self.style;
        let vp = snapshot.viewport;

        surface.begin_frame();
        surface.fill_rect(0.0, 0.0, vp.width, vp.height, style.background);

        for ring in snapshot.rings {
            match &ring.phase {
                RingPhase::Shattered(burst) => {
                    for p in &burst.particles {
                        surface.fill_circle(
                            p.pos,
                            style.particle_radius,
                            style.particle_color.with_alpha(p.alpha),
                            None,
                        );
                    }
                }
                RingPhase::Active => {
                    // Solid part runs from the end of the gap all the way round to its start
                    let gap_start = ring.gap_start + ring.rotation;
                    let stroke = Stroke {
                        color: ring.color,
                        width: style.ring_width,
                        cap: style.ring_cap,
                    };
                    surface.stroke_arc(
                        snapshot.center,
                        ring.radius,
                        gap_start + ring.gap_size,
                        gap_start + std::f32::consts::TAU,
                        &stroke,
                    );
                }
            }
        }

        let ball = snapshot.ball;
        surface.fill_circle(ball.pos, ball.radius, style.ball_color, style.ball_shadow);
    }
}
