//! Boss agent
//!
//! A single high-hp encounter that flies a figure-eight and fires radial
//! bursts into the enemy projectile pool.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::ProjectilePool;

pub const BOSS_MAX_HP: f32 = 1000.0;
pub const BOSS_RADIUS: f32 = 50.0;
pub const BOSS_SPAWN: Vec2 = Vec2::new(640.0, -100.0);

/// Figure-eight path: x = cx + ax·sin(fx·t), y = cy + ay·sin(t)
const PATH_CENTER: Vec2 = Vec2::new(640.0, 150.0);
const PATH_AMPLITUDE: Vec2 = Vec2::new(300.0, 50.0);
const PATH_X_FREQ: f32 = 0.5;

const BURST_INTERVAL: f32 = 0.2;
const BURST_BULLETS: usize = 20;
const BURST_SPEED: f32 = 300.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    /// Seconds since spawn; drives the path and burst rotation
    pub time: f32,
    pub burst_timer: f32,
    /// Cleared exactly when hp reaches zero
    pub active: bool,
}

impl Default for Boss {
    fn default() -> Self {
        Self::new()
    }
}

impl Boss {
    pub fn new() -> Self {
        Self {
            pos: BOSS_SPAWN,
            hp: BOSS_MAX_HP,
            max_hp: BOSS_MAX_HP,
            time: 0.0,
            burst_timer: 0.0,
            active: true,
        }
    }

    /// Fraction of hp remaining (0..=1)
    pub fn health_fraction(&self) -> f32 {
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    pub fn update(&mut self, dt: f32, bullets: &mut ProjectilePool) {
        if !self.active {
            return;
        }
        self.time += dt;
        self.pos = PATH_CENTER
            + PATH_AMPLITUDE * Vec2::new((self.time * PATH_X_FREQ).sin(), self.time.sin());

        self.burst_timer += dt;
        if self.burst_timer >= BURST_INTERVAL {
            self.burst_timer -= BURST_INTERVAL;
            self.fire_burst(bullets);
        }
    }

    fn fire_burst(&self, bullets: &mut ProjectilePool) {
        for i in 0..BURST_BULLETS {
            let angle = i as f32 / BURST_BULLETS as f32 * TAU + self.time;
            let vel = Vec2::from_angle(angle) * BURST_SPEED;
            bullets.spawn(self.pos.x, self.pos.y, vel.x, vel.y);
        }
    }

    /// Apply bullet damage. Returns true on the hit that kills the boss.
    pub fn apply_hit(&mut self, damage: f32) -> bool {
        if !self.active {
            return false;
        }
        self.hp -= damage;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.active = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dies_exactly_on_last_hit() {
        let mut boss = Boss::new();
        let hits = BOSS_MAX_HP as usize;
        for n in 1..hits {
            assert!(!boss.apply_hit(1.0), "died early at hit {n}");
            assert!(boss.active);
        }
        assert!(boss.apply_hit(1.0));
        assert!(!boss.active);
        assert_eq!(boss.hp, 0.0);
    }

    #[test]
    fn test_hits_after_death_are_ignored() {
        let mut boss = Boss::new();
        boss.apply_hit(BOSS_MAX_HP);
        assert!(!boss.apply_hit(1.0));
        assert_eq!(boss.health_fraction(), 0.0);
    }

    #[test]
    fn test_burst_is_radial() {
        let mut boss = Boss::new();
        let mut pool = ProjectilePool::with_capacity(64);
        boss.update(BURST_INTERVAL + 0.01, &mut pool);
        assert_eq!(pool.len(), BURST_BULLETS);
        for i in 0..pool.len() {
            assert!((pool.vel(i).length() - BURST_SPEED).abs() < 1e-2);
            assert_eq!(pool.pos(i), boss.pos);
        }
    }

    #[test]
    fn test_burst_cadence_holds_at_frame_rate() {
        let mut boss = Boss::new();
        let mut pool = ProjectilePool::with_capacity(4096);
        // 10 s plus a few frames of slack
        for _ in 0..610 {
            boss.update(1.0 / 60.0, &mut pool);
        }
        assert_eq!(pool.len(), 50 * BURST_BULLETS);
    }

    #[test]
    fn test_follows_figure_eight() {
        let mut boss = Boss::new();
        let mut pool = ProjectilePool::with_capacity(0);
        for _ in 0..600 {
            boss.update(1.0 / 60.0, &mut pool);
            assert!((boss.pos.x - 640.0).abs() <= 300.0 + 1e-3);
            assert!((boss.pos.y - 150.0).abs() <= 50.0 + 1e-3);
        }
        // A full pool drops the burst silently
        assert!(pool.is_empty());
    }

    #[test]
    fn test_inactive_boss_does_not_move() {
        let mut boss = Boss::new();
        boss.active = false;
        let mut pool = ProjectilePool::with_capacity(64);
        boss.update(1.0, &mut pool);
        assert_eq!(boss.pos, BOSS_SPAWN);
        assert!(pool.is_empty());
    }
}
