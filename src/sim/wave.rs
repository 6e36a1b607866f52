//! Wave director
//!
//! Owns the enemy roster and the boss. Spawns groups on a cadence that
//! tightens with the wave number and difficulty, advances waves on a fixed
//! timer, and swaps normal spawning for the boss at the boss wave. The boss
//! transition consumes whatever is still on the roster.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::enemy::{AgentContext, Archetype, Enemy, Formation, SPAWN_Y};
use super::state::SimEvent;
use crate::settings::Difficulty;
use crate::tuning::Tuning;

/// Spawn interval at wave 0, before difficulty scaling
const BASE_SPAWN_INTERVAL: f32 = 2.0;
/// Interval lost per wave
const SPAWN_INTERVAL_STEP: f32 = 0.1;
/// Floor on the unscaled interval
const MIN_SPAWN_INTERVAL: f32 = 0.5;

pub const MAX_GROUP: u32 = 5;
/// Horizontal band groups spawn in
const SPAWN_LEFT: f32 = 100.0;
const SPAWN_RIGHT: f32 = 1180.0;
/// Vertical stagger between group members
const TIGHT_STAGGER: f32 = 30.0;
const SPREAD_STAGGER: f32 = 50.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    /// Current wave (starts at 1, never decreases)
    pub wave: u32,
    /// Seconds into the current wave
    pub wave_timer: f32,
    /// Seconds since the last group spawn
    pub spawn_timer: f32,
    pub enemies: Vec<Enemy>,
    boss: Option<Boss>,
    boss_spawned: bool,
    boss_wave: u32,
    wave_duration: f32,
    settle_delay: f32,
}

impl WaveDirector {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            wave: 1,
            wave_timer: 0.0,
            spawn_timer: 0.0,
            enemies: Vec::new(),
            boss: None,
            boss_spawned: false,
            boss_wave: tuning.boss_wave.max(1),
            wave_duration: tuning.wave_duration,
            settle_delay: tuning.settle_delay,
        }
    }

    /// The live boss, if one is on the field
    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref().filter(|b| b.active)
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        self.boss.as_mut().filter(|b| b.active)
    }

    /// Whether the boss has appeared this run (alive or not)
    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    /// Whether the boss appeared and has since been destroyed
    pub fn boss_defeated(&self) -> bool {
        self.boss_spawned && self.boss().is_none()
    }

    /// Seconds between groups for the current wave at `difficulty`
    pub fn spawn_interval(&self, difficulty: Difficulty) -> f32 {
        let base = (BASE_SPAWN_INTERVAL - SPAWN_INTERVAL_STEP * self.wave as f32)
            .max(MIN_SPAWN_INTERVAL);
        base * difficulty.spawn_interval_scale()
    }

    /// Advance timers, spawn, and update every agent. Dead roster entries
    /// from the previous step are pruned first.
    pub fn update(&mut self, dt: f32, ctx: &mut AgentContext<'_>, events: &mut Vec<SimEvent>) {
        self.enemies.retain(|e| e.active);

        if !self.boss_spawned {
            self.wave_timer += dt;
            self.spawn_timer += dt;

            if self.wave >= self.boss_wave {
                self.spawn_boss(events);
            } else {
                if self.wave_timer > self.settle_delay
                    && self.spawn_timer > self.spawn_interval(ctx.difficulty)
                {
                    self.spawn_random_group(ctx.difficulty, ctx.rng);
                    self.spawn_timer = 0.0;
                }
                if self.wave_timer > self.wave_duration {
                    self.wave += 1;
                    self.wave_timer = 0.0;
                    log::info!("Wave {} started", self.wave);
                    events.push(SimEvent::WaveStarted { wave: self.wave });
                }
            }
        }

        for enemy in &mut self.enemies {
            enemy.update(dt, ctx);
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.update(dt, ctx.bullets);
        }
    }

    fn spawn_boss(&mut self, events: &mut Vec<SimEvent>) {
        let consumed = self.active_enemies().count();
        for enemy in &mut self.enemies {
            enemy.active = false;
        }
        if consumed > 0 {
            log::debug!("Boss transition cleared {consumed} enemies");
        }
        self.boss = Some(Boss::new());
        self.boss_spawned = true;
        log::info!("Boss spawned at wave {}", self.wave);
        events.push(SimEvent::BossSpawned);
    }

    fn spawn_random_group(&mut self, difficulty: Difficulty, rng: &mut Pcg32) {
        let id = rng.random_range(0..Archetype::ALL.len());
        let archetype = Archetype::ALL[id];
        let count = rng.random_range(1..=MAX_GROUP);
        self.spawn_group(archetype, count, difficulty, rng);
    }

    /// Add `count` enemies of one archetype above the field in its formation
    pub fn spawn_group(
        &mut self,
        archetype: Archetype,
        count: u32,
        difficulty: Difficulty,
        rng: &mut Pcg32,
    ) {
        if count == 0 {
            return;
        }
        let (formation, spacing) = archetype.formation();
        match formation {
            Formation::Tight => {
                let half_width = count as f32 * spacing * 0.5;
                let lo = SPAWN_LEFT + half_width;
                let hi = (SPAWN_RIGHT - half_width).max(lo);
                let center = rng.random_range(lo..=hi);
                let start = center - (count - 1) as f32 * spacing * 0.5;
                for i in 0..count {
                    let pos = Vec2::new(
                        start + i as f32 * spacing,
                        SPAWN_Y - i as f32 * TIGHT_STAGGER,
                    );
                    self.enemies.push(Enemy::new(archetype, pos, difficulty));
                }
            }
            Formation::Spread => {
                for i in 0..count {
                    let pos = Vec2::new(
                        rng.random_range(SPAWN_LEFT..=SPAWN_RIGHT),
                        SPAWN_Y - i as f32 * SPREAD_STAGGER,
                    );
                    self.enemies.push(Enemy::new(archetype, pos, difficulty));
                }
            }
        }
        log::debug!(
            "Spawned {count} x {archetype:?} ({formation:?}) on wave {}",
            self.wave
        );
    }

    /// Iterator over live roster entries
    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }
}
