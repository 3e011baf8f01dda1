//! Platform abstraction layer
//!
//! Handles the boundary between the simulation and its host:
//! - Frame pacing (`TickSource`)
//! - Teardown (`CancellationToken`, `Subscription`)
//! - The owned per-frame loop (`Driver`)
//! - Browser canvas integration (`web`, wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

use rand::Rng;
use rand_pcg::Pcg32;

#[cfg(not(target_arch = "wasm32"))]
use crate::consts::NOMINAL_FPS;
use crate::renderer::{Renderer, Surface};
use crate::sim::{World, WorldEvent};

/// Shared stop flag checked between frames
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A revocable registration (event listener, frame callback, ...)
///
/// The release closure runs exactly once: on `cancel()` or when the
/// subscription is dropped, whichever comes first.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release now instead of on drop
    pub fn cancel(mut self) {
        self.release_now();
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Source of frame ticks
pub trait TickSource {
    /// Block until the next frame is due; false once the source is exhausted
    fn next_tick(&mut self) -> bool;
}

/// Paces frames at a fixed interval, optionally stopping after a frame limit
///
/// Browsers pace frames with `requestAnimationFrame` instead (see `web`).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FixedRateTicker {
    interval: Duration,
    next_due: Option<Instant>,
    remaining: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FixedRateTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            remaining: None,
        }
    }

    /// Ticks at the nominal display rate the simulation speeds are tuned for
    pub fn nominal() -> Self {
        Self::new(Duration::from_secs(1) / NOMINAL_FPS)
    }

    /// Ticks as fast as possible (headless runs, tests)
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Stop after `frames` ticks
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TickSource for FixedRateTicker {
    fn next_tick(&mut self) -> bool {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }

        if !self.interval.is_zero() {
            let now = Instant::now();
            let due = self.next_due.unwrap_or(now);
            if due > now {
                std::thread::sleep(due - now);
            }
            // Don't try to catch up after a stall; one frame is one tick
            self.next_due = Some(due.max(now) + self.interval);
        }
        true
    }
}

/// Result of a single `Driver::frame` call
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Rendered(Vec<WorldEvent>),
    Cancelled,
}

/// Owns the world, the renderer and the surface, and runs frames
pub struct Driver<S: Surface, R: Rng = Pcg32> {
    world: World<R>,
    renderer: Renderer,
    surface: S,
    cancel: CancellationToken,
    frames: u64,
}

impl<S: Surface, R: Rng> Driver<S, R> {
    pub fn new(world: World<R>, renderer: Renderer, surface: S) -> Self {
        Self {
            world,
            renderer,
            surface,
            cancel: CancellationToken::new(),
            frames: 0,
        }
    }

    /// Token that stops the loop before its next frame
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn world(&self) -> &World<R> {
        &self.world
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one tick and draw it
    pub fn frame(&mut self) -> FrameOutcome {
        if self.cancel.is_cancelled() {
            return FrameOutcome::Cancelled;
        }

        self.world.set_viewport(self.surface.viewport());
        let events = self.world.advance();
        self.renderer.draw(&mut self.surface, &self.world.snapshot());
        self.frames += 1;

        FrameOutcome::Rendered(events)
    }

    /// Run frames until the tick source ends or the token is cancelled
    ///
    /// Returns the number of frames rendered by this call.
    pub fn run<T: TickSource + ?Sized>(&mut self, ticks: &mut T) -> u64 {
        let start = self.frames;
        log::info!("Driver started");

        while ticks.next_tick() {
            match self.frame() {
                FrameOutcome::Rendered(events) => {
                    for event in events {
                        if let WorldEvent::RingShattered { index } = event {
                            log::info!(
                                "Ring {} shattered, {} left",
                                index,
                                self.world.active_rings()
                            );
                        }
                    }
                }
                FrameOutcome::Cancelled => break,
            }
        }

        let rendered = self.frames - start;
        log::info!("Driver stopped after {} frames", rendered);
        rendered
    }

    /// The host surface changed size
    pub fn notify_resize(&mut self) {
        self.surface.reconfigure();
        let viewport = self.surface.viewport();
        log::info!("Resized to {}x{}", viewport.width, viewport.height);
        self.world.set_viewport(viewport);
    }

    /// Start the world over
    pub fn reset(&mut self) {
        self.world.reset();
    }

    /// Hand back the parts
    pub fn into_parts(self) -> (World<R>, Renderer, S) {
        (self.world, self.renderer, self.surface)
    }
}
