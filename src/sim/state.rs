//! Game state and core simulation types
//!
//! Everything one run mutates lives in `GameState`. Score and difficulty are
//! kept outside in the `Session` so a fresh state can be paired with any
//! session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Archetype;
use super::particle::ParticlePool;
use super::projectile::ProjectileStore;
use super::spatial::SpatialGrid;
use super::wave::WaveDirector;
use crate::consts::*;
use crate::ease_angle;
use crate::tuning::Tuning;

pub const PLAYER_START: Vec2 = Vec2::new(640.0, 360.0);
pub const PLAYER_MAX_HP: f32 = 100.0;
/// Collision radius against enemy bullets and bodies
pub const PLAYER_HITBOX: f32 = 6.0;
/// Vertical clamp (horizontal uses SIDE_MARGIN)
pub const PLAYER_MIN_Y: f32 = 20.0;
pub const PLAYER_MAX_Y: f32 = 700.0;
/// Seconds between player shots
pub const PLAYER_FIRE_COOLDOWN: f32 = 0.1;
pub const PLAYER_BULLET_SPEED: f32 = 800.0;
/// Shots leave this far above the ship
pub const PLAYER_MUZZLE_OFFSET: f32 = 20.0;
/// Seconds of immunity after taking a hit
pub const INVULNERABILITY_DURATION: f32 = 1.0;

/// Maximum bank (radians) while strafing
const MAX_BANK: f32 = 0.4;
/// Horizontal speed at which the bank saturates
const BANK_SPEED: f32 = 1200.0;
const BANK_RATE: f32 = 10.0;
/// Displayed health catches up at this rate (1/s)
const HP_DISPLAY_RATE: f32 = 5.0;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    Paused,
    /// Player died
    GameOver,
    /// Boss destroyed
    Victory,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Victory)
    }
}

/// Final figures carried by the terminal events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub wave: u32,
    pub boss_defeated: bool,
}

/// Things that happened during a step, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    RunStarted,
    WaveStarted { wave: u32 },
    EnemyKilled { archetype: Archetype, pos: Vec2 },
    /// An enemy rammed the player and was destroyed
    EnemyCrashed { archetype: Archetype },
    PlayerHit { damage: f32, hp: f32 },
    BossSpawned,
    BossDefeated,
    GameOver(RunSummary),
    Victory(RunSummary),
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Bank angle (radians, 0 = level)
    pub angle: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Health shown on the HUD, easing toward `hp`
    pub displayed_hp: f32,
    /// Seconds of immunity left
    pub invulnerable_timer: f32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            angle: 0.0,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            displayed_hp: PLAYER_MAX_HP,
            invulnerable_timer: 0.0,
            fire_cooldown: 0.0,
        }
    }
}

impl Player {
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Follow the pointer (clamped to the field) and tick the timers
    pub fn update(&mut self, target: Option<Vec2>, dt: f32) {
        let prev_x = self.pos.x;
        if let Some(target) = target {
            self.pos = Vec2::new(
                target.x.clamp(SIDE_MARGIN, FIELD_WIDTH - SIDE_MARGIN),
                target.y.clamp(PLAYER_MIN_Y, PLAYER_MAX_Y),
            );
        }

        if dt > 0.0 {
            let vx = (self.pos.x - prev_x) / dt;
            let bank = (vx / BANK_SPEED).clamp(-1.0, 1.0) * MAX_BANK;
            self.angle = ease_angle(self.angle, bank, BANK_RATE, dt);
        }

        self.displayed_hp += (self.hp - self.displayed_hp) * (HP_DISPLAY_RATE * dt).min(1.0);

        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        }
        self.fire_cooldown -= dt;
    }

    /// Muzzle position and velocity if the gun is ready; resets the cooldown
    pub fn try_fire(&mut self) -> Option<(Vec2, Vec2)> {
        if self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = PLAYER_FIRE_COOLDOWN;
        Some((
            self.pos - Vec2::new(0.0, PLAYER_MUZZLE_OFFSET),
            Vec2::new(0.0, -PLAYER_BULLET_SPEED),
        ))
    }
}

/// Camera shake request; the latest trigger replaces the previous one
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub magnitude: f32,
    pub timer: f32,
}

impl ScreenShake {
    pub fn trigger(&mut self, magnitude: f32, duration: f32) {
        self.magnitude = magnitude;
        self.timer = duration;
    }

    pub fn update(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.timer = 0.0;
                self.magnitude = 0.0;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }
}

/// Shake presets (magnitude, seconds)
pub mod shake {
    pub const ENEMY_KILLED: (f32, f32) = (5.0, 0.2);
    pub const BODY_CRASH: (f32, f32) = (20.0, 0.5);
    pub const PLAYER_HIT: (f32, f32) = (10.0, 0.4);
    pub const BOSS_KILLED: (f32, f32) = (20.0, 1.0);
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: Phase,
    /// Seconds of play (excludes pauses)
    pub time: f32,
    pub player: Player,
    pub projectiles: ProjectileStore,
    pub particles: ParticlePool,
    /// Rebuilt from the roster every step; ids are roster indices
    pub grid: SpatialGrid,
    pub director: WaveDirector,
    pub shake: ScreenShake,
    /// HUD score scale; jumps on kills and settles back to 1
    pub score_pulse: f32,
    /// HUD score counter, rolling up toward the session score
    pub displayed_score: f32,
    pub rng: Pcg32,
    /// Events from the most recent step
    pub events: Vec<SimEvent>,
    started: bool,
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: Phase::Playing,
            time: 0.0,
            player: Player::default(),
            projectiles: ProjectileStore::new(
                tuning.player_projectile_capacity,
                tuning.enemy_projectile_capacity,
            ),
            // Cosmetic stream, independent of gameplay rolls
            particles: ParticlePool::new(tuning.particle_capacity, tuning.seed ^ 0x9e37_79b9),
            grid: SpatialGrid::new(tuning.grid_cell_size.max(1.0)),
            director: WaveDirector::new(&tuning),
            shake: ScreenShake::default(),
            score_pulse: 1.0,
            displayed_score: 0.0,
            rng: Pcg32::seed_from_u64(tuning.seed),
            events: Vec::new(),
            started: false,
            tuning,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(Tuning::with_seed(seed))
    }

    /// Emit `RunStarted` on the first call only
    pub(crate) fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
