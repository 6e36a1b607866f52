//! Flat read-only view of a run for drawing
//!
//! A renderer copies one `Snapshot` per frame and never touches the live
//! state. Instance arrays are `Pod` so they can be uploaded as-is.

use bytemuck::{Pod, Zeroable};

use crate::session::Session;
use crate::sim::state::{GameState, Phase};

/// Sprite kinds understood by the renderer
pub mod kind {
    pub const PLAYER: u32 = 0;
    pub const BOSS: u32 = 1;
    /// Enemies use `ENEMY + archetype id`
    pub const ENEMY: u32 = 2;
    pub const PLAYER_BULLET: u32 = 7;
    pub const ENEMY_BULLET: u32 = 8;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    pub angle: f32,
    pub kind: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub size: f32,
    pub alpha: f32,
    pub color: [f32; 3],
}

/// Boss health bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossHud {
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    /// Rolling score counter, trails `score`
    pub displayed_score: u64,
    pub high_score: u64,
    /// Score text scale (1.0 at rest)
    pub score_pulse: f32,
    pub wave: u32,
    pub hp: f32,
    /// Health bar value, lags behind `hp`
    pub displayed_hp: f32,
    pub max_hp: f32,
    pub invulnerable: bool,
    /// Present only while a boss is alive
    pub boss: Option<BossHud>,
    pub shake_magnitude: f32,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub sprites: Vec<SpriteInstance>,
    pub particles: Vec<ParticleInstance>,
    pub hud: Hud,
}

impl Snapshot {
    pub fn capture(state: &GameState, session: &Session) -> Self {
        let bullets = &state.projectiles;
        let boss = state.director.boss();
        let mut sprites = Vec::with_capacity(
            1 + boss.is_some() as usize + state.director.enemies.len() + bullets.len(),
        );

        let player = &state.player;
        sprites.push(SpriteInstance {
            position: player.pos.to_array(),
            angle: player.angle,
            kind: kind::PLAYER,
        });
        if let Some(boss) = boss {
            sprites.push(SpriteInstance {
                position: boss.pos.to_array(),
                angle: 0.0,
                kind: kind::BOSS,
            });
        }
        for enemy in state.director.active_enemies() {
            sprites.push(SpriteInstance {
                position: enemy.pos.to_array(),
                angle: enemy.angle,
                kind: kind::ENEMY + enemy.archetype.id() as u32,
            });
        }
        for (pool, sprite_kind) in [
            (&bullets.player, kind::PLAYER_BULLET),
            (&bullets.enemy, kind::ENEMY_BULLET),
        ] {
            for i in 0..pool.len() {
                if pool.is_spent(i) {
                    continue;
                }
                let v = pool.vel(i);
                sprites.push(SpriteInstance {
                    position: pool.pos(i).to_array(),
                    angle: crate::facing_for(v),
                    kind: sprite_kind,
                });
            }
        }

        let particles = (0..state.particles.len())
            .map(|i| {
                let (x, y, life, size, color) = state.particles.get(i);
                ParticleInstance {
                    position: [x, y],
                    size,
                    alpha: life.clamp(0.0, 1.0),
                    color,
                }
            })
            .collect();

        let hud = Hud {
            score: session.score,
            displayed_score: (state.displayed_score.round() as u64).min(session.score),
            high_score: session.high_score.max(session.score),
            score_pulse: state.score_pulse,
            wave: state.director.wave,
            hp: player.hp.max(0.0),
            displayed_hp: player.displayed_hp.max(0.0),
            max_hp: player.max_hp,
            invulnerable: player.is_invulnerable(),
            boss: boss.map(|b| BossHud {
                hp: b.hp,
                max_hp: b.max_hp,
            }),
            shake_magnitude: if state.shake.is_active() {
                state.shake.magnitude
            } else {
                0.0
            },
            phase: state.phase,
        };

        Self {
            sprites,
            particles,
            hud,
        }
    }

    /// Sprite instances as raw bytes for upload
    pub fn sprite_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }

    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::enemy::{Archetype, Enemy};
    use glam::Vec2;

    #[test]
    fn test_capture_lists_every_drawable() {
        let mut state = GameState::default();
        let session = Session::new(Difficulty::Easy);
        state.director.enemies.push(Enemy::new(
            Archetype::Sniper,
            Vec2::new(100.0, 100.0),
            Difficulty::Easy,
        ));
        let mut dead = Enemy::new(Archetype::Weaver, Vec2::new(200.0, 100.0), Difficulty::Easy);
        dead.active = false;
        state.director.enemies.push(dead);
        state.projectiles.player.spawn(300.0, 300.0, 0.0, -800.0);
        state.projectiles.enemy.spawn(400.0, 300.0, 0.0, 300.0);
        state.projectiles.enemy.spawn(400.0, 300.0, 0.0, 300.0);
        state.projectiles.enemy.kill(1);

        let snap = Snapshot::capture(&state, &session);
        let kinds: Vec<u32> = snap.sprites.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![kind::PLAYER, kind::ENEMY + 3, kind::PLAYER_BULLET, kind::ENEMY_BULLET]
        );
        assert!(snap.hud.boss.is_none());
    }

    #[test]
    fn test_bytes_match_instance_layout() {
        let state = GameState::default();
        let snap = Snapshot::capture(&state, &Session::new(Difficulty::Medium));
        assert_eq!(
            snap.sprite_bytes().len(),
            snap.sprites.len() * std::mem::size_of::<SpriteInstance>()
        );
        assert!(snap.particle_bytes().is_empty());
    }

    #[test]
    fn test_hud_reflects_session() {
        let state = GameState::default();
        let mut session = Session::new(Difficulty::Hard);
        session.high_score = 50;
        session.add_score(200);
        let snap = Snapshot::capture(&state, &session);
        assert_eq!(snap.hud.score, 200);
        assert_eq!(snap.hud.displayed_score, 0);
        assert_eq!(snap.hud.high_score, 200);
        assert_eq!(snap.hud.wave, 1);
        assert_eq!(snap.hud.hp, 100.0);
        assert!(!snap.hud.invulnerable);
    }
}
