//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool prefix order, roster order)
//! - No rendering, audio, or file I/O

pub mod boss;
pub mod collision;
pub mod enemy;
pub mod particle;
pub mod projectile;
pub mod spatial;
pub mod state;
pub mod tick;
pub mod wave;

pub use boss::Boss;
pub use collision::{CollisionReport, segment_hits_circle};
pub use enemy::{Archetype, Enemy, EnemyState};
pub use particle::ParticlePool;
pub use projectile::{ProjectilePool, ProjectileStore, Side};
pub use spatial::SpatialGrid;
pub use state::{GameState, Phase, Player, RunSummary, ScreenShake, SimEvent};
pub use tick::{TickInput, tick};
pub use wave::WaveDirector;
