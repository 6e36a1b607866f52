//! Projectile pools
//!
//! One fixed-capacity structure-of-arrays pool per side. Live entries are
//! always the prefix `[0, len)`; dead entries are squeezed out by an
//! order-preserving compaction once per step. A collision "removes" a
//! projectile by parking it off-field so the next compaction reclaims it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_MARGIN, FIELD_WIDTH, OFF_FIELD_Y};

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// True once a position has left the field plus margin (or was parked off-field)
#[inline]
pub fn is_dead(x: f32, y: f32) -> bool {
    x < -FIELD_MARGIN
        || x > FIELD_WIDTH + FIELD_MARGIN
        || y < -FIELD_MARGIN
        || y > FIELD_HEIGHT + FIELD_MARGIN
}

/// Fixed-capacity structure-of-arrays projectile pool
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    x: Vec<f32>,
    y: Vec<f32>,
    dx: Vec<f32>,
    dy: Vec<f32>,
    count: usize,
}

impl ProjectilePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: vec![0.0; capacity],
            y: vec![0.0; capacity],
            dx: vec![0.0; capacity],
            dy: vec![0.0; capacity],
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.x.len()
    }

    /// Append a projectile. At capacity this is a silent no-op; returns
    /// whether the projectile was stored.
    pub fn spawn(&mut self, x: f32, y: f32, dx: f32, dy: f32) -> bool {
        let i = self.count;
        if i >= self.capacity() {
            return false;
        }
        self.x[i] = x;
        self.y[i] = y;
        self.dx[i] = dx;
        self.dy[i] = dy;
        self.count += 1;
        true
    }

    #[inline]
    pub fn pos(&self, i: usize) -> Vec2 {
        Vec2::new(self.x[i], self.y[i])
    }

    #[inline]
    pub fn vel(&self, i: usize) -> Vec2 {
        Vec2::new(self.dx[i], self.dy[i])
    }

    /// Where projectile `i` was at the start of the step, assuming uniform velocity
    #[inline]
    pub fn prev_pos(&self, i: usize, dt: f32) -> Vec2 {
        self.pos(i) - self.vel(i) * dt
    }

    /// Live x column
    pub fn xs(&self) -> &[f32] {
        &self.x[..self.count]
    }

    /// Live y column
    pub fn ys(&self) -> &[f32] {
        &self.y[..self.count]
    }

    /// Park projectile `i` off-field; it is reclaimed at the next compaction
    #[inline]
    pub fn kill(&mut self, i: usize) {
        self.y[i] = OFF_FIELD_Y;
    }

    /// Whether projectile `i` has been hit or has left the field this step
    #[inline]
    pub fn is_spent(&self, i: usize) -> bool {
        is_dead(self.x[i], self.y[i])
    }

    /// Advance every live projectile by `velocity * dt`
    pub fn integrate(&mut self, dt: f32) {
        let n = self.count;
        for (x, dx) in self.x[..n].iter_mut().zip(&self.dx[..n]) {
            *x += dx * dt;
        }
        for (y, dy) in self.y[..n].iter_mut().zip(&self.dy[..n]) {
            *y += dy * dt;
        }
    }

    /// Drop every dead entry, keeping survivors in their original order
    pub fn compact(&mut self) {
        debug_assert!(
            self.y.len() == self.x.len()
                && self.dx.len() == self.x.len()
                && self.dy.len() == self.x.len(),
            "projectile columns out of sync"
        );

        let mut write = 0;
        for read in 0..self.count {
            if is_dead(self.x[read], self.y[read]) {
                continue;
            }
            if write != read {
                self.x[write] = self.x[read];
                self.y[write] = self.y[read];
                self.dx[write] = self.dx[read];
                self.dy[write] = self.dy[read];
            }
            write += 1;
        }
        self.count = write;
    }

    /// Integrate, then compact
    pub fn step(&mut self, dt: f32) {
        self.integrate(dt);
        self.compact();
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }
}

/// Both projectile pools
#[derive(Debug, Clone)]
pub struct ProjectileStore {
    pub player: ProjectilePool,
    pub enemy: ProjectilePool,
}

impl ProjectileStore {
    pub fn new(player_capacity: usize, enemy_capacity: usize) -> Self {
        Self {
            player: ProjectilePool::with_capacity(player_capacity),
            enemy: ProjectilePool::with_capacity(enemy_capacity),
        }
    }

    pub fn pool(&self, side: Side) -> &ProjectilePool {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn pool_mut(&mut self, side: Side) -> &mut ProjectilePool {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Append to the matching pool; silently dropped at capacity
    pub fn spawn(&mut self, x: f32, y: f32, vx: f32, vy: f32, side: Side) -> bool {
        self.pool_mut(side).spawn(x, y, vx, vy)
    }

    pub fn step(&mut self, dt: f32) {
        self.player.step(dt);
        self.enemy.step(dt);
    }

    pub fn len(&self) -> usize {
        self.player.len() + self.enemy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.player.is_empty() && self.enemy.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_appends_exact_values() {
        let mut pool = ProjectilePool::with_capacity(4);
        assert!(pool.spawn(10.0, 20.0, 1.0, -2.0));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.pos(0), Vec2::new(10.0, 20.0));
        assert_eq!(pool.vel(0), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_spawn_at_capacity_is_noop() {
        let mut pool = ProjectilePool::with_capacity(2);
        pool.spawn(1.0, 1.0, 0.0, 0.0);
        pool.spawn(2.0, 2.0, 0.0, 0.0);
        assert!(!pool.spawn(3.0, 3.0, 0.0, 0.0));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.pos(1), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_step_reclaims_off_field() {
        let mut pool = ProjectilePool::with_capacity(8);
        pool.spawn(640.0, 10.0, 0.0, -800.0); // leaves the top
        pool.spawn(640.0, 360.0, 0.0, -800.0); // stays
        pool.step(0.1);
        assert_eq!(pool.len(), 1);
        assert!((pool.pos(0).y - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_margin_keeps_slightly_off_screen() {
        let mut pool = ProjectilePool::with_capacity(2);
        pool.spawn(-FIELD_MARGIN + 1.0, 100.0, 0.0, 0.0);
        pool.step(0.016);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_kill_is_lazy_until_compaction() {
        let mut pool = ProjectilePool::with_capacity(4);
        pool.spawn(100.0, 100.0, 0.0, 0.0);
        pool.spawn(200.0, 100.0, 0.0, 0.0);
        pool.kill(0);
        assert_eq!(pool.len(), 2);
        assert!(pool.is_spent(0));
        pool.compact();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.pos(0).x, 200.0);
    }

    #[test]
    fn test_store_routes_by_side() {
        let mut store = ProjectileStore::new(1, 1);
        assert!(store.spawn(0.0, 0.0, 0.0, 0.0, Side::Enemy));
        assert!(!store.spawn(0.0, 0.0, 0.0, 0.0, Side::Enemy));
        assert!(store.spawn(0.0, 0.0, 0.0, 0.0, Side::Player));
        assert_eq!(store.pool(Side::Player).len(), 1);
        assert_eq!(store.pool(Side::Enemy).len(), 1);
        assert_eq!(store.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_count_never_exceeds_capacity(capacity in 0usize..32, spawns in 0usize..64) {
            let mut pool = ProjectilePool::with_capacity(capacity);
            for i in 0..spawns {
                let before = pool.len();
                let stored = pool.spawn(i as f32, 100.0, 0.0, 0.0);
                if before < capacity {
                    prop_assert!(stored);
                    prop_assert_eq!(pool.len(), before + 1);
                } else {
                    prop_assert!(!stored);
                    prop_assert_eq!(pool.len(), before);
                }
            }
            prop_assert!(pool.len() <= pool.capacity());
        }

        #[test]
        fn prop_compaction_preserves_survivor_order(kills in proptest::collection::vec(any::<bool>(), 0..40)) {
            let mut pool = ProjectilePool::with_capacity(kills.len());
            for i in 0..kills.len() {
                pool.spawn(i as f32, 100.0, 0.0, 0.0);
            }
            for (i, &kill) in kills.iter().enumerate() {
                if kill {
                    pool.kill(i);
                }
            }
            pool.compact();

            let expected: Vec<f32> = kills
                .iter()
                .enumerate()
                .filter(|(_, kill)| !**kill)
                .map(|(i, _)| i as f32)
                .collect();
            prop_assert_eq!(pool.xs(), expected.as_slice());
            prop_assert!(pool.ys().iter().all(|&y| !is_dead(0.0, y)));
        }
    }
}
