//! The simulation world and its fixed-order tick
//!
//! One call to [`World::advance`] is one display frame. The order of the
//! steps matters:
//! 1. recompute the world center from the current viewport
//! 2. rotate active rings, age the bursts of shattered ones
//! 3. apply gravity and move the ball
//! 4. check the already-moved ball against every active ring, innermost first
//! 5. reflect off the viewport edges
//! 6. clamp each velocity component

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{RingContact, reflect_velocity};
use super::state::{Ball, Ring, Viewport};
use crate::settings::{CollisionMode, Settings};

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// The ball slipped through the gap of ring `index`
    RingShattered { index: usize },
    /// The ball bounced off the solid part of ring `index`
    RingBounce { index: usize },
    /// The ball hit the left or right edge
    SideWall,
    /// The ball hit the top or bottom edge
    FloorOrCeiling,
}

/// Immutable view of the world for rendering
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub viewport: Viewport,
    pub center: Vec2,
    pub ball: &'a Ball,
    pub rings: &'a [Ring],
    pub time_ticks: u64,
}

/// Owns the ball, the rings and the random source
#[derive(Debug, Clone)]
pub struct World<R: Rng = Pcg32> {
    settings: Settings,
    viewport: Viewport,
    center: Vec2,
    ball: Ball,
    rings: Vec<Ring>,
    rng: R,
    time_ticks: u64,
}

impl World<Pcg32> {
    /// Create a reproducible world from a seed
    pub fn with_seed(seed: u64, settings: Settings, viewport: Viewport) -> Self {
        Self::new(settings, viewport, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> World<R> {
    /// Create a world with the ball launched from the viewport center
    pub fn new(settings: Settings, viewport: Viewport, mut rng: R) -> Self {
        let center = viewport.center();
        let ball = Ball::launch(&mut rng, center, &settings);
        let rings = Ring::spawn_all(&settings);

        log::info!(
            "World created: {} rings, viewport {}x{}, collision mode {}",
            rings.len(),
            viewport.width,
            viewport.height,
            settings.collision_mode.as_str()
        );

        Self {
            settings,
            viewport,
            center,
            ball,
            rings,
            rng,
            time_ticks: 0,
        }
    }

    /// Start over: fresh launch from the current center, all rings active
    pub fn reset(&mut self) {
        self.center = self.viewport.center();
        self.ball = Ball::launch(&mut self.rng, self.center, &self.settings);
        self.rings = Ring::spawn_all(&self.settings);
        self.time_ticks = 0;
        log::info!("World reset");
    }

    /// Record a new surface size; the center moves on the next tick
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Center used by the most recent tick
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Direct access for scripted scenarios
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Direct access for scripted scenarios
    pub fn rings_mut(&mut self) -> &mut [Ring] {
        &mut self.rings
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Number of rings still blocking the ball
    pub fn active_rings(&self) -> usize {
        self.rings.iter().filter(|r| !r.is_destroyed()).count()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            viewport: self.viewport,
            center: self.center,
            ball: &self.ball,
            rings: &self.rings,
            time_ticks: self.time_ticks,
        }
    }

    /// Advance the simulation by one tick
    pub fn advance(&mut self) -> Vec<WorldEvent> {
        let mut events = Vec::new();
        self.time_ticks += 1;

        self.center = self.viewport.center();

        for ring in &mut self.rings {
            ring.advance();
        }

        self.ball.integrate(
            self.center.y,
            self.settings.gravity_above(),
            self.settings.gravity_below(),
        );

        match self.settings.collision_mode {
            CollisionMode::Sequential => self.collide_sequential(&mut events),
            CollisionMode::Snapshot => self.collide_snapshot(&mut events),
        }

        let (side, floor) = self.ball.reflect_off_bounds(
            self.viewport,
            self.settings.wall_damping_x,
            self.settings.wall_damping_y,
        );
        if side {
            events.push(WorldEvent::SideWall);
        }
        if floor {
            events.push(WorldEvent::FloorOrCeiling);
        }

        self.ball.clamp_velocity(self.settings.max_component_speed);

        events
    }

    /// Each bounce immediately changes the velocity the next ring sees
    fn collide_sequential(&mut self, events: &mut Vec<WorldEvent>) {
        let center = self.center;
        let pos = self.ball.pos;
        let radius = self.ball.radius;

        for ring in &mut self.rings {
            match ring.check_collision(pos, radius, center, self.settings.collision_margin) {
                RingContact::None => {}
                RingContact::PassThrough => {
                    if ring.shatter(&mut self.rng, center, &self.settings) {
                        log::debug!("Ring {} shattered at tick {}", ring.index, self.time_ticks);
                        events.push(WorldEvent::RingShattered { index: ring.index });
                    }
                }
                RingContact::Bounce { normal } => {
                    self.ball.vel =
                        reflect_velocity(self.ball.vel, normal, self.settings.bounce_response);
                    events.push(WorldEvent::RingBounce { index: ring.index });
                }
            }
        }
    }

    /// Every ring sees the pre-pass velocity; the responses are summed
    fn collide_snapshot(&mut self, events: &mut Vec<WorldEvent>) {
        let center = self.center;
        let pos = self.ball.pos;
        let radius = self.ball.radius;
        let vel = self.ball.vel;
        let mut delta = Vec2::ZERO;

        for ring in &mut self.rings {
            match ring.check_collision(pos, radius, center, self.settings.collision_margin) {
                RingContact::None => {}
                RingContact::PassThrough => {
                    if ring.shatter(&mut self.rng, center, &self.settings) {
                        log::debug!("Ring {} shattered at tick {}", ring.index, self.time_ticks);
                        events.push(WorldEvent::RingShattered { index: ring.index });
                    }
                }
                RingContact::Bounce { normal } => {
                    delta += reflect_velocity(vel, normal, self.settings.bounce_response) - vel;
                    events.push(WorldEvent::RingBounce { index: ring.index });
                }
            }
        }

        self.ball.vel = vel + delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RingPhase;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn still_ball(world: &mut World, offset: Vec2, vel: Vec2) {
        let center = world.viewport().center();
        let ball = world.ball_mut();
        ball.pos = center + offset;
        ball.vel = vel;
    }

    fn weightless(ring_count: usize) -> Settings {
        Settings {
            gravity: 0.0,
            ring_count,
            ..Settings::default()
        }
    }

    #[test]
    fn test_new_world_layout() {
        let world = World::with_seed(1, Settings::default(), VIEWPORT);
        assert_eq!(world.rings().len(), 6);
        assert_eq!(world.active_rings(), 6);
        assert_eq!(world.ball().pos, Vec2::new(400.0, 300.0));
        for pair in world.rings().windows(2) {
            assert!(pair[1].radius > pair[0].radius);
        }
    }

    #[test]
    fn test_gravity_falls_then_reflects_off_floor() {
        let settings = Settings {
            ring_count: 0,
            ..Settings::default()
        };
        let max = settings.max_component_speed;
        let bound = settings.wall_damping_y * (max + settings.gravity_below());
        let mut world = World::with_seed(5, settings, VIEWPORT);
        still_ball(&mut world, Vec2::ZERO, Vec2::ZERO);

        let mut last_y = world.ball().pos.y;
        for _ in 0..500 {
            let events = world.advance();
            if events.contains(&WorldEvent::FloorOrCeiling) {
                let vy = world.ball().vel.y;
                assert!(vy < 0.0, "vy should flip upward, got {}", vy);
                assert!(vy.abs() <= bound + 1e-4);
                return;
            }
            assert!(world.ball().pos.y > last_y);
            assert!(world.ball().vel.y > 0.0);
            last_y = world.ball().pos.y;
        }
        panic!("ball never reached the floor");
    }

    #[test]
    fn test_gap_straight_up_passes_right_bounces() {
        let settings = Settings::default();
        let ring = Ring::new(0, &settings);
        let center = VIEWPORT.center();

        let up = center + Vec2::new(0.0, -ring.radius);
        assert_eq!(
            ring.check_collision(up, settings.ball_radius, center, settings.collision_margin),
            RingContact::PassThrough
        );

        let right = center + Vec2::new(ring.radius, 0.0);
        assert!(matches!(
            ring.check_collision(right, settings.ball_radius, center, settings.collision_margin),
            RingContact::Bounce { .. }
        ));
    }

    #[test]
    fn test_ball_in_gap_shatters_ring_and_burst_fades() {
        let mut world = World::with_seed(9, weightless(1), VIEWPORT);
        // Middle of the gap, on the ring
        let offset = crate::polar_to_cartesian(80.0, -FRAC_PI_2 + FRAC_PI_8);
        still_ball(&mut world, offset, Vec2::ZERO);

        let events = world.advance();
        assert!(events.contains(&WorldEvent::RingShattered { index: 0 }));
        assert!(world.rings()[0].is_destroyed());
        assert_eq!(world.rings()[0].burst().map(|b| b.len()), Some(100));

        for _ in 0..101 {
            world.advance();
            assert!(world.rings()[0].is_destroyed());
        }
        assert!(world.rings()[0].burst().is_some_and(|b| b.is_empty()));
    }

    #[test]
    fn test_solid_hit_bounces_without_shattering() {
        let mut world = World::with_seed(9, weightless(1), VIEWPORT);
        still_ball(&mut world, Vec2::new(80.0, 0.0), Vec2::new(1.0, 0.0));

        let events = world.advance();
        assert_eq!(events, vec![WorldEvent::RingBounce { index: 0 }]);
        assert!(!world.rings()[0].is_destroyed());
        assert!((world.ball().vel - Vec2::new(-1.5, 0.0)).length() < 1e-4);
    }

    fn overlapping_rings(mode: CollisionMode) -> World {
        let settings = Settings {
            gravity: 0.0,
            ring_count: 2,
            ring_spacing: 10.0,
            collision_mode: mode,
            ..Settings::default()
        };
        let mut world = World::with_seed(2, settings, VIEWPORT);
        still_ball(&mut world, Vec2::new(84.0, 0.0), Vec2::new(1.0, 0.0));
        world
    }

    #[test]
    fn test_sequential_bounces_chain_through_rings() {
        let mut world = overlapping_rings(CollisionMode::Sequential);
        let events = world.advance();
        assert_eq!(
            events,
            vec![
                WorldEvent::RingBounce { index: 0 },
                WorldEvent::RingBounce { index: 1 }
            ]
        );
        // (1,0) -> (-1.5,0) off ring 0, then (-1.5,0) -> (2.25,0) off ring 1
        assert!((world.ball().vel - Vec2::new(2.25, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_snapshot_mode_sums_responses() {
        let mut world = overlapping_rings(CollisionMode::Snapshot);
        world.advance();
        assert!((world.ball().vel - Vec2::new(-4.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_ball_on_center_is_ignored() {
        let settings = Settings {
            gravity: 0.0,
            ring_count: 1,
            ring_base_radius: 4.0,
            ..Settings::default()
        };
        let mut world = World::with_seed(4, settings, VIEWPORT);
        still_ball(&mut world, Vec2::ZERO, Vec2::ZERO);

        let events = world.advance();
        assert!(events.is_empty());
        assert_eq!(world.ball().vel, Vec2::ZERO);
        assert!(world.ball().pos.is_finite());
    }

    #[test]
    fn test_repeated_same_resize_changes_nothing() {
        let mut a = World::with_seed(77, Settings::default(), VIEWPORT);
        let mut b = World::with_seed(77, Settings::default(), VIEWPORT);

        for _ in 0..200 {
            for _ in 0..3 {
                b.set_viewport(VIEWPORT);
            }
            a.advance();
            b.advance();
        }
        assert_eq!(a.center(), b.center());
        assert_eq!(a.ball(), b.ball());
        assert_eq!(a.rings(), b.rings());
    }

    #[test]
    fn test_resize_recenters_without_reset() {
        let mut world = World::with_seed(12, Settings::default(), VIEWPORT);
        for _ in 0..30 {
            world.advance();
        }
        let ticks = world.time_ticks();
        let rotation = world.rings()[0].rotation;

        world.set_viewport(Viewport::new(1200.0, 900.0));
        assert_eq!(world.center(), Vec2::new(400.0, 300.0));
        world.advance();

        assert_eq!(world.center(), Vec2::new(600.0, 450.0));
        assert_eq!(world.time_ticks(), ticks + 1);
        assert!(world.rings()[0].rotation > rotation || world.rings()[0].is_destroyed());
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut world = World::with_seed(9, weightless(1), VIEWPORT);
        let offset = crate::polar_to_cartesian(80.0, -FRAC_PI_2 + FRAC_PI_8);
        still_ball(&mut world, offset, Vec2::ZERO);
        world.advance();
        assert_eq!(world.active_rings(), 0);

        world.reset();
        assert_eq!(world.time_ticks(), 0);
        assert_eq!(world.active_rings(), 1);
        assert_eq!(world.rings()[0].rotation, 0.0);
        assert_eq!(world.rings()[0].phase, RingPhase::Active);
        assert_eq!(world.ball().pos, VIEWPORT.center());
        assert!(world.ball().vel.length() >= 1.49);
    }

    #[test]
    fn test_determinism() {
        let mut a = World::with_seed(99999, Settings::default(), VIEWPORT);
        let mut b = World::with_seed(99999, Settings::default(), VIEWPORT);
        for _ in 0..1000 {
            assert_eq!(a.advance(), b.advance());
        }
        assert_eq!(a.ball(), b.ball());
        assert_eq!(a.rings(), b.rings());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut world = World::with_seed(3, Settings::default(), VIEWPORT);
        world.advance();
        let json = serde_json::to_value(world.snapshot()).unwrap();
        assert_eq!(json["time_ticks"], 1);
        assert_eq!(json["rings"].as_array().map(|r| r.len()), Some(6));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_invariants_hold_every_tick(
            seed in any::<u64>(),
            width in 200.0f32..2000.0,
            height in 200.0f32..2000.0,
        ) {
            let mut world = World::with_seed(seed, Settings::default(), Viewport::new(width, height));
            let max = world.settings().max_component_speed;
            let mut destroyed = vec![false; world.rings().len()];
            let mut alphas: Vec<Vec<f32>> = vec![Vec::new(); world.rings().len()];

            for _ in 0..400 {
                world.advance();
                let vel = world.ball().vel;
                prop_assert!(vel.x.abs() <= max && vel.y.abs() <= max);

                for (i, ring) in world.rings().iter().enumerate() {
                    // Shattered rings never come back
                    prop_assert!(!destroyed[i] || ring.is_destroyed());
                    destroyed[i] = ring.is_destroyed();

                    if let Some(burst) = ring.burst() {
                        prop_assert!(burst.particles.iter().all(|p| p.alpha > 0.0));
                        // Survivors keep their order, so alphas pair up front to front
                        for (now, before) in burst.particles.iter().zip(&alphas[i]) {
                            prop_assert!(now.alpha < *before);
                        }
                        alphas[i] = burst.particles.iter().map(|p| p.alpha).collect();
                    }
                }
            }
        }
    }
}
