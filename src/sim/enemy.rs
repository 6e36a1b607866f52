//! Enemy agents
//!
//! Each enemy runs a two-state machine (`Entering` then `Active`). While
//! active, its archetype selects a velocity law and a fire law from a static
//! behavior table, so the per-frame update is a single table lookup.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::projectile::ProjectilePool;
use crate::consts::{FIELD_WIDTH, SIDE_MARGIN};
use crate::settings::Difficulty;
use crate::{ease_angle, facing_for};

/// Collision radius used by bullets and body contact
pub const ENEMY_RADIUS: f32 = 20.0;
/// Half of the 32x32 box indexed in the spatial grid
pub const ENEMY_HALF_EXTENT: Vec2 = Vec2::new(16.0, 16.0);
/// Hit points before difficulty scaling
pub const ENEMY_BASE_HP: f32 = 10.0;

/// Highest spawn y; groups stagger upward from here
pub const SPAWN_Y: f32 = -50.0;
/// Descent speed while entering
pub const ENTRY_SPEED: f32 = 200.0;
/// Entering enemies go active once they reach this y
pub const ENTRY_LINE: f32 = 25.0;
/// Enemies below this y are culled without score
pub const CULL_Y: f32 = 820.0;
/// Facing easing rate (1/s)
pub const TURN_RATE: f32 = 5.0;
/// Bullets leave this far below the enemy center
const MUZZLE_OFFSET: Vec2 = Vec2::new(0.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Descending onto the field, not firing
    Entering,
    /// Running its archetype pattern
    Active,
}

/// How a spawned group is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    /// Fixed spacing around one random center
    Tight,
    /// Independent random x per enemy
    Spread,
}

/// Fixed enemy behavior profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Sine weave, single downward shot
    Weaver,
    /// Square-wave zig-zag, widening spread volley
    ZigZag,
    /// Dives and steers toward the player, never fires
    Kamikaze,
    /// Advances, halts, and snipes at the player
    Sniper,
    /// Circular sway with a rotating spiral shot
    Orbiter,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Weaver,
        Archetype::ZigZag,
        Archetype::Kamikaze,
        Archetype::Sniper,
        Archetype::Orbiter,
    ];

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    fn behavior(&self) -> &'static Behavior {
        &BEHAVIORS[*self as usize]
    }

    /// Group layout and spacing used by the wave director
    pub fn formation(&self) -> (Formation, f32) {
        let b = self.behavior();
        (b.formation, b.spacing)
    }

    /// Seconds between volleys before difficulty scaling (None = never fires)
    pub fn fire_interval(&self) -> Option<f32> {
        let b = self.behavior();
        b.fire.map(|_| b.fire_interval)
    }
}

/// Per-step inputs an agent reads and the pool it fires into
pub struct AgentContext<'a> {
    pub player: Vec2,
    pub difficulty: Difficulty,
    pub rng: &'a mut Pcg32,
    pub bullets: &'a mut ProjectilePool,
}

/// A volley being fired from one muzzle
struct Volley<'a, 'b> {
    muzzle: Vec2,
    ctx: &'a mut AgentContext<'b>,
}

impl Volley<'_, '_> {
    fn shoot(&mut self, vel: Vec2) {
        self.ctx
            .bullets
            .spawn(self.muzzle.x, self.muzzle.y, vel.x, vel.y);
    }
}

type VelocityLaw = fn(&Enemy, Vec2, f32) -> Vec2;
type FireLaw = fn(&Enemy, &mut Volley<'_, '_>);

struct Behavior {
    velocity: VelocityLaw,
    fire: Option<FireLaw>,
    fire_interval: f32,
    /// Face the player instead of the direction of travel
    aims: bool,
    formation: Formation,
    spacing: f32,
}

/// Indexed by `Archetype as usize`
static BEHAVIORS: [Behavior; 5] = [
    Behavior {
        velocity: weave_velocity,
        fire: Some(fire_down),
        fire_interval: 1.5,
        aims: false,
        formation: Formation::Tight,
        spacing: 60.0,
    },
    Behavior {
        velocity: zigzag_velocity,
        fire: Some(fire_spread),
        fire_interval: 2.0,
        aims: false,
        formation: Formation::Spread,
        spacing: 200.0,
    },
    Behavior {
        velocity: dive_velocity,
        fire: None,
        fire_interval: 0.0,
        aims: false,
        formation: Formation::Tight,
        spacing: 50.0,
    },
    Behavior {
        velocity: halt_velocity,
        fire: Some(fire_aimed),
        fire_interval: 1.0,
        aims: true,
        formation: Formation::Spread,
        spacing: 250.0,
    },
    Behavior {
        velocity: orbit_velocity,
        fire: Some(fire_spiral),
        fire_interval: 0.5,
        aims: false,
        formation: Formation::Tight,
        spacing: 40.0,
    },
];

fn weave_velocity(e: &Enemy, _player: Vec2, _dt: f32) -> Vec2 {
    Vec2::new((e.clock * 2.0).cos() * 150.0, 100.0)
}

fn zigzag_velocity(e: &Enemy, _player: Vec2, _dt: f32) -> Vec2 {
    let vx = if (e.clock as u32) % 2 == 0 { 100.0 } else { -100.0 };
    Vec2::new(vx, 80.0)
}

/// Dive fast and steer toward the player's column (proportional, not snapped)
fn dive_velocity(e: &Enemy, player: Vec2, dt: f32) -> Vec2 {
    const MAX_VX: f32 = 300.0;
    const DEAD_BAND: f32 = 10.0;
    const GAIN: f32 = 5.0;

    let dx = player.x - e.pos.x;
    let target_vx = if dx > DEAD_BAND {
        MAX_VX
    } else if dx < -DEAD_BAND {
        -MAX_VX
    } else {
        0.0
    };
    let vx = e.vel.x + (target_vx - e.vel.x) * (GAIN * dt).min(1.0);
    Vec2::new(vx, 300.0)
}

fn halt_velocity(e: &Enemy, _player: Vec2, _dt: f32) -> Vec2 {
    if e.clock < 1.0 {
        Vec2::new(0.0, 150.0)
    } else {
        Vec2::ZERO
    }
}

fn orbit_velocity(e: &Enemy, _player: Vec2, _dt: f32) -> Vec2 {
    Vec2::new(e.clock.cos() * 100.0, 50.0)
}

fn fire_down(_e: &Enemy, v: &mut Volley<'_, '_>) {
    v.shoot(Vec2::new(0.0, 300.0));
}

/// 3-way fan, one extra pair per hard tier step
fn fire_spread(_e: &Enemy, v: &mut Volley<'_, '_>) {
    const EXTRA: [Vec2; 2] = [Vec2::new(200.0, 200.0), Vec2::new(300.0, 150.0)];

    v.shoot(Vec2::new(0.0, 300.0));
    v.shoot(Vec2::new(-100.0, 250.0));
    v.shoot(Vec2::new(100.0, 250.0));
    let pairs = v.ctx.difficulty.extra_volley_pairs();
    for side in EXTRA.iter().take(pairs) {
        v.shoot(Vec2::new(-side.x, side.y));
        v.shoot(*side);
    }
}

/// Jittered shot at the player, plus fixed-offset flankers on harder tiers
fn fire_aimed(e: &Enemy, v: &mut Volley<'_, '_>) {
    const SPEED: f32 = 400.0;
    const JITTER: f32 = 0.1;
    const FLANKS: [f32; 2] = [0.2, 0.4];

    let base = (v.ctx.player - e.pos)
        .try_normalize()
        .map_or(Vec2::new(0.0, SPEED), |dir| dir * SPEED);
    let jitter = v.ctx.rng.random_range(-JITTER..=JITTER);
    v.shoot(Vec2::from_angle(jitter).rotate(base));

    let pairs = v.ctx.difficulty.extra_volley_pairs();
    for &offset in FLANKS.iter().take(pairs) {
        v.shoot(Vec2::from_angle(-offset).rotate(base));
        v.shoot(Vec2::from_angle(offset).rotate(base));
    }
}

fn fire_spiral(e: &Enemy, v: &mut Volley<'_, '_>) {
    let angle = e.clock * 2.0;
    v.shoot(Vec2::new(angle.cos() * 200.0, angle.sin() * 200.0 + 200.0));
}

/// An enemy on the wave director's roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub archetype: Archetype,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current facing (radians, 0 = down the field)
    pub angle: f32,
    /// Facing the agent is easing toward
    pub target_angle: f32,
    pub hp: f32,
    pub state: EnemyState,
    /// Cleared when killed, culled, or crashed; pruned by the director
    pub active: bool,
    /// Seconds spent in the current state
    pub clock: f32,
    /// Seconds since the last volley
    pub shoot_timer: f32,
}

impl Enemy {
    pub fn new(archetype: Archetype, pos: Vec2, difficulty: Difficulty) -> Self {
        Self {
            archetype,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            target_angle: 0.0,
            hp: ENEMY_BASE_HP * difficulty.enemy_hp_scale(),
            state: EnemyState::Entering,
            active: true,
            clock: 0.0,
            shoot_timer: 0.0,
        }
    }

    pub fn is_entering(&self) -> bool {
        self.state == EnemyState::Entering
    }

    /// Advance one step: motion, facing, and firing
    pub fn update(&mut self, dt: f32, ctx: &mut AgentContext<'_>) {
        if !self.active {
            return;
        }
        self.clock += dt;

        if self.state == EnemyState::Entering {
            self.angle = 0.0;
            self.target_angle = 0.0;
            if self.pos.y < ENTRY_LINE {
                self.vel = Vec2::new(0.0, ENTRY_SPEED);
                self.pos.y += ENTRY_SPEED * dt;
            } else {
                self.vel = Vec2::ZERO;
                self.state = EnemyState::Active;
                self.clock = 0.0;
            }
            return;
        }

        let behavior = self.archetype.behavior();
        self.vel = (behavior.velocity)(self, ctx.player, dt);
        self.pos += self.vel * dt;

        let right = FIELD_WIDTH - SIDE_MARGIN;
        if self.pos.x < SIDE_MARGIN {
            self.pos.x = SIDE_MARGIN;
            self.vel.x = -self.vel.x;
        } else if self.pos.x > right {
            self.pos.x = right;
        }

        if self.pos.y > CULL_Y {
            self.active = false;
            return;
        }

        if behavior.aims {
            let to_player = ctx.player - self.pos;
            if to_player != Vec2::ZERO {
                self.target_angle = facing_for(to_player);
            }
        } else if self.vel.x.abs() > 10.0 || self.vel.y.abs() > 10.0 {
            self.target_angle = facing_for(self.vel);
        }
        self.angle = ease_angle(self.angle, self.target_angle, TURN_RATE, dt);

        self.shoot_timer += dt;
        if let Some(fire) = behavior.fire {
            let interval = behavior.fire_interval * ctx.difficulty.fire_interval_scale();
            if self.shoot_timer > interval {
                self.shoot_timer = 0.0;
                let mut volley = Volley {
                    muzzle: self.pos + MUZZLE_OFFSET,
                    ctx,
                };
                fire(self, &mut volley);
            }
        }
    }
}
