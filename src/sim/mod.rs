//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - One call to `World::advance` per frame, no delta time
//! - Injected RNG only
//! - Stable iteration order (rings innermost first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod gap;
pub mod particle;
pub mod state;
pub mod world;

pub use collision::{RingContact, ball_ring_contact, reflect_velocity};
pub use gap::GapArc;
pub use particle::{Particle, ParticleBurst};
pub use state::{Ball, Ring, RingPhase, Viewport};
pub use world::{Snapshot, World, WorldEvent};
