//! Cosmetic particle pool
//!
//! Same prefix-compaction layout as the projectile pools. Particles never
//! take part in collision; they only feed the renderer.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::projectile::is_dead;

/// Gravity applied to particle vertical velocity (units/s²)
const PARTICLE_GRAVITY: f32 = 200.0;
/// Life lost per second (life starts at 1.0)
const PARTICLE_FADE: f32 = 1.5;
/// Size lost per second
const PARTICLE_SHRINK: f32 = 1.0;
/// Random jitter added to a directed emit
const DIRECTED_JITTER: f32 = 50.0;
/// Random speed range for an undirected burst
const BURST_SPEED: f32 = 150.0;

pub mod colors {
    pub const PLAYER_TRAIL: [f32; 3] = [0.5, 1.0, 1.0];
    pub const ENEMY_TRAIL: [f32; 3] = [1.0, 0.5, 0.5];
    pub const ENEMY_DEATH: [f32; 3] = [1.0, 0.6, 0.1];
    pub const BOSS_DEATH: [f32; 3] = [1.0, 0.0, 1.0];
}

/// Fixed-capacity structure-of-arrays particle pool
#[derive(Debug, Clone)]
pub struct ParticlePool {
    x: Vec<f32>,
    y: Vec<f32>,
    vx: Vec<f32>,
    vy: Vec<f32>,
    life: Vec<f32>,
    size: Vec<f32>,
    color: Vec<[f32; 3]>,
    count: usize,
    rng: Pcg32,
}

impl ParticlePool {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            x: vec![0.0; capacity],
            y: vec![0.0; capacity],
            vx: vec![0.0; capacity],
            vy: vec![0.0; capacity],
            life: vec![0.0; capacity],
            size: vec![0.0; capacity],
            color: vec![[0.0; 3]; capacity],
            count: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.x.len()
    }

    /// Emit up to `count` particles at (x, y). With a velocity the particles
    /// drift along it with jitter; without one they burst in all directions.
    /// Clipped to the remaining capacity.
    pub fn emit(&mut self, x: f32, y: f32, count: usize, color: [f32; 3], vel: Option<(f32, f32)>) {
        let count = count.min(self.capacity() - self.count);
        for _ in 0..count {
            let i = self.count;
            let (vx, vy) = match vel {
                Some((vx, vy)) => (
                    vx + self.rng.random_range(-DIRECTED_JITTER..DIRECTED_JITTER),
                    vy + self.rng.random_range(-DIRECTED_JITTER..DIRECTED_JITTER),
                ),
                None => (
                    self.rng.random_range(-BURST_SPEED..BURST_SPEED),
                    self.rng.random_range(-BURST_SPEED..BURST_SPEED),
                ),
            };
            self.x[i] = x;
            self.y[i] = y;
            self.vx[i] = vx;
            self.vy[i] = vy;
            self.life[i] = 1.0;
            self.size[i] = self.rng.random_range(2.0..4.0);
            self.color[i] = color;
            self.count += 1;
        }
    }

    /// Roll a trail particle with probability `chance`
    pub fn maybe_trail(&mut self, x: f32, y: f32, vx: f32, vy: f32, chance: f64, color: [f32; 3]) {
        if self.count < self.capacity() && self.rng.random_bool(chance) {
            self.emit(x, y, 1, color, Some((-vx * 0.1, -vy * 0.1)));
        }
    }

    pub fn step(&mut self, dt: f32) {
        let n = self.count;
        for i in 0..n {
            self.x[i] += self.vx[i] * dt;
            self.y[i] += self.vy[i] * dt;
            self.vy[i] += PARTICLE_GRAVITY * dt;
            self.life[i] -= PARTICLE_FADE * dt;
            self.size[i] = (self.size[i] - PARTICLE_SHRINK * dt).max(0.0);
        }

        let mut write = 0;
        for read in 0..n {
            if self.life[read] <= 0.0 || is_dead(self.x[read], self.y[read]) {
                continue;
            }
            if write != read {
                self.x[write] = self.x[read];
                self.y[write] = self.y[read];
                self.vx[write] = self.vx[read];
                self.vy[write] = self.vy[read];
                self.life[write] = self.life[read];
                self.size[write] = self.size[read];
                self.color[write] = self.color[read];
            }
            write += 1;
        }
        self.count = write;
    }

    /// (x, y, life, size, color) of particle `i`
    #[inline]
    pub fn get(&self, i: usize) -> (f32, f32, f32, f32, [f32; 3]) {
        (self.x[i], self.y[i], self.life[i], self.size[i], self.color[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_clips_to_capacity() {
        let mut pool = ParticlePool::new(10, 1);
        pool.emit(100.0, 100.0, 7, colors::BOSS_DEATH, None);
        pool.emit(100.0, 100.0, 7, colors::BOSS_DEATH, None);
        assert_eq!(pool.len(), 10);
        pool.emit(100.0, 100.0, 1, colors::BOSS_DEATH, None);
        assert_eq!(pool.len(), 10);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut pool = ParticlePool::new(16, 2);
        pool.emit(640.0, 360.0, 16, colors::ENEMY_DEATH, Some((0.0, 0.0)));
        // Life 1.0 at 1.5/s is gone after ~0.67s
        for _ in 0..45 {
            pool.step(1.0 / 60.0);
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_emitted_particle_starts_fresh() {
        let mut pool = ParticlePool::new(4, 3);
        pool.emit(5.0, 6.0, 1, colors::PLAYER_TRAIL, Some((0.0, 0.0)));
        let (x, y, life, size, color) = pool.get(0);
        assert_eq!((x, y, life), (5.0, 6.0, 1.0));
        assert!((2.0..4.0).contains(&size));
        assert_eq!(color, colors::PLAYER_TRAIL);
    }

    #[test]
    fn test_trail_certain_and_never() {
        let mut pool = ParticlePool::new(4, 4);
        pool.maybe_trail(100.0, 100.0, 0.0, -800.0, 0.0, colors::PLAYER_TRAIL);
        assert!(pool.is_empty());
        pool.maybe_trail(100.0, 100.0, 0.0, -800.0, 1.0, colors::PLAYER_TRAIL);
        assert_eq!(pool.len(), 1);
    }
}
