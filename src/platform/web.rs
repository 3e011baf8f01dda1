//! Browser integration
//!
//! Draws onto a `<canvas>` through the 2D context, paces frames with
//! `requestAnimationFrame`, and listens for window resizes. Both
//! registrations are held as [`Subscription`]s so they are released when
//! the [`WebHandle`] is stopped or dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::{CancellationToken, Driver, FrameOutcome, Subscription};
use crate::error::SurfaceError;
use crate::renderer::{Color, Renderer, Shadow, Stroke, Surface};
use crate::settings::Settings;
use crate::sim::{Viewport, World};

/// A full-window canvas scaled for the device pixel ratio
pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasSurface {
    /// Look up the canvas by id and grab its 2D context
    pub fn acquire(canvas_id: &str) -> Result<Self, SurfaceError> {
        let window = web_sys::window().ok_or_else(|| SurfaceError::Platform("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SurfaceError::Platform("no document".into()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| SurfaceError::CanvasNotFound(canvas_id.to_string()))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(SurfaceError::ContextUnavailable)?;

        let mut surface = Self {
            window,
            canvas,
            ctx,
            viewport: Viewport::new(0.0, 0.0),
        };
        surface.reconfigure();
        Ok(surface)
    }
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Match the window size and device pixel ratio
    fn reconfigure(&mut self) {
        let ratio = self.window.device_pixel_ratio();
        let scale = if ratio > 0.0 { ratio } else { 1.0 };
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        self.canvas.set_width((width * scale) as u32);
        self.canvas.set_height((height * scale) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));
        let _ = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0);

        self.viewport = Viewport::from_physical(
            self.canvas.width() as f32,
            self.canvas.height() as f32,
            scale as f32,
        );
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, stroke: &Stroke) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_stroke_style_str(&stroke.color.to_css());
        ctx.set_line_width(stroke.width as f64);
        ctx.set_line_cap(stroke.cap.as_str());
        ctx.begin_path();
        let _ = ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            start as f64,
            end as f64,
        );
        ctx.stroke();
        ctx.restore();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, shadow: Option<Shadow>) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_fill_style_str(&color.to_css());
        if let Some(shadow) = shadow {
            ctx.set_shadow_color(&shadow.color.to_css());
            ctx.set_shadow_blur(shadow.blur as f64);
        }
        ctx.begin_path();
        let _ = ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
        ctx.restore();
    }
}

type SharedDriver = Rc<RefCell<Driver<CanvasSurface>>>;

/// Running simulation mounted on a canvas
///
/// Dropping the handle (or calling `stop`) cancels the frame loop and
/// removes the resize listener.
#[wasm_bindgen]
pub struct WebHandle {
    driver: SharedDriver,
    token: CancellationToken,
    subscriptions: Vec<Subscription>,
}

#[wasm_bindgen]
impl WebHandle {
    /// Stop the frame loop and release all listeners
    pub fn stop(&mut self) {
        self.token.cancel();
        self.subscriptions.clear();
        log::info!("Simulation stopped");
    }

    /// Start over with a fresh launch and intact rings
    pub fn reset(&self) {
        self.driver.borrow_mut().reset();
    }

    /// Number of rings not yet shattered
    pub fn active_rings(&self) -> usize {
        self.driver.borrow().world().active_rings()
    }
}

impl Drop for WebHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Mount the simulation on the canvas with id `canvas_id`
///
/// Fails if the canvas or its 2D context is missing; there is no retry.
#[wasm_bindgen]
pub fn mount(canvas_id: &str) -> Result<WebHandle, JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let surface =
        CanvasSurface::acquire(canvas_id).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let seed = js_sys::Date::now() as u64;
    let world = World::with_seed(seed, Settings::default(), surface.viewport());
    let driver: SharedDriver = Rc::new(RefCell::new(Driver::new(
        world,
        Renderer::default(),
        surface,
    )));
    let token = driver.borrow().cancellation_token();
    log::info!("Mounted on #{} with seed {}", canvas_id, seed);

    let resize = listen_for_resize(&window, driver.clone())?;
    let frames = start_frame_loop(&window, driver.clone(), token.clone())?;

    Ok(WebHandle {
        driver,
        token,
        subscriptions: vec![resize, frames],
    })
}

fn listen_for_resize(window: &Window, driver: SharedDriver) -> Result<Subscription, JsValue> {
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        driver.borrow_mut().notify_resize();
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

    let window = window.clone();
    Ok(Subscription::new(move || {
        let _ =
            window.remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        drop(on_resize);
    }))
}

/// Request one animation frame per rendered frame until cancelled
fn start_frame_loop(
    window: &Window,
    driver: SharedDriver,
    token: CancellationToken,
) -> Result<Subscription, JsValue> {
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

    let next = callback.clone();
    let frame_pending = pending.clone();
    let frame_window = window.clone();
    let frame_token = token.clone();
    *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
        frame_pending.set(None);
        if frame_token.is_cancelled() {
            return;
        }
        if matches!(driver.borrow_mut().frame(), FrameOutcome::Cancelled) {
            return;
        }
        if let Some(cb) = next.borrow().as_ref() {
            match frame_window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => frame_pending.set(Some(id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
        }
    }));

    let first = match callback.borrow().as_ref() {
        Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref())?,
        None => return Err(JsValue::from_str("frame callback missing")),
    };
    pending.set(Some(first));

    let window = window.clone();
    Ok(Subscription::new(move || {
        token.cancel();
        if let Some(id) = pending.take() {
            let _ = window.cancel_animation_frame(id);
        }
        // The callback holds a reference to itself; break the cycle
        callback.borrow_mut().take();
    }))
}
