//! Headless surface that records draw calls instead of rasterizing them

use glam::Vec2;
use serde::Serialize;

use super::{Color, Shadow, Stroke, Surface};
use crate::sim::Viewport;

/// One recorded drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    StrokeArc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        stroke: Stroke,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        shadow: Option<Shadow>,
    },
}

/// Surface that keeps the commands of the latest frame
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    /// Size applied on the next `reconfigure`
    pending: Option<Viewport>,
    /// Commands of the frame in progress (cleared by `begin_frame`)
    pub commands: Vec<DrawCommand>,
    pub frames: u64,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            pending: None,
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Simulate the host window changing size; takes effect on `reconfigure`
    pub fn request_resize(&mut self, viewport: Viewport) {
        self.pending = Some(viewport);
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn reconfigure(&mut self) {
        if let Some(viewport) = self.pending.take() {
            self.viewport = viewport;
        }
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            start,
            end,
            stroke: *stroke,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, shadow: Option<Shadow>) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
            shadow,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame_clears() {
        let mut surface = RecordingSurface::new(Viewport::new(10.0, 10.0));
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);
        surface.begin_frame();
        assert!(surface.commands.is_empty());
        assert_eq!(surface.frames, 1);
    }

    #[test]
    fn test_resize_applies_on_reconfigure() {
        let mut surface = RecordingSurface::new(Viewport::new(10.0, 10.0));
        surface.request_resize(Viewport::new(20.0, 30.0));
        assert_eq!(surface.viewport(), Viewport::new(10.0, 10.0));
        surface.reconfigure();
        assert_eq!(surface.viewport(), Viewport::new(20.0, 30.0));
    }
}
