//! Collision detection and response
//!
//! Every projectile test is swept: the projectile's path over the step is
//! treated as a segment from its reconstructed previous position to its
//! current one, so fast bullets cannot skip over a target between samples.

use glam::Vec2;

use super::boss::BOSS_RADIUS;
use super::enemy::ENEMY_RADIUS;
use super::particle::colors;
use super::state::{GameState, INVULNERABILITY_DURATION, PLAYER_HITBOX, SimEvent, shake};
use crate::session::Session;

pub const ENEMY_KILL_SCORE: u64 = 100;
pub const BOSS_KILL_SCORE: u64 = 5000;
pub const ENEMY_BULLET_DAMAGE: f32 = 10.0;
pub const BODY_CONTACT_DAMAGE: f32 = 40.0;
/// Boss hp lost per player bullet
pub const BOSS_BULLET_DAMAGE: f32 = 1.0;

const ENEMY_DEATH_PARTICLES: usize = 12;
const BOSS_DEATH_PARTICLES: usize = 48;

/// Whether the segment `p0 -> p1` passes within `radius` of `center`
pub fn segment_hits_circle(p0: Vec2, p1: Vec2, center: Vec2, radius: f32) -> bool {
    let seg = p1 - p0;
    let len_sq = seg.length_squared();
    // A stationary point degenerates to a point-in-circle test
    let t = if len_sq > 0.0 {
        ((center - p0).dot(seg) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = p0 + seg * t;
    closest.distance_squared(center) <= radius * radius
}

/// Broad-phase window for a swept path: the segment's bounding box grown by
/// `radius` on every side, as (center, width, height)
pub fn swept_window(p0: Vec2, p1: Vec2, radius: f32) -> (Vec2, f32, f32) {
    let size = (p1 - p0).abs() + Vec2::splat(2.0 * radius);
    ((p0 + p1) * 0.5, size.x, size.y)
}

/// What the collision passes did this step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    pub enemies_killed: u32,
    /// Enemy bullets or bodies connected with the player
    pub player_hit: bool,
    pub boss_killed: bool,
}

/// Run every pass in order against the freshly rebuilt grid
pub fn resolve(state: &mut GameState, session: &mut Session, dt: f32) -> CollisionReport {
    let mut report = CollisionReport {
        enemies_killed: player_bullets_vs_enemies(state, session, dt),
        ..Default::default()
    };

    if !state.player.is_invulnerable() {
        let bullet_hit = enemy_bullets_vs_player(state, session, dt);
        let body_hit = enemy_bodies_vs_player(state, session);
        report.player_hit = bullet_hit || body_hit;
    }

    report.boss_killed = player_bullets_vs_boss(state, session, dt);

    if report.player_hit {
        state.player.invulnerable_timer = INVULNERABILITY_DURATION;
        state.shake.trigger(shake::PLAYER_HIT.0, shake::PLAYER_HIT.1);
    }
    report
}

/// Pass 1: each bullet kills at most one enemy
fn player_bullets_vs_enemies(state: &mut GameState, session: &mut Session, dt: f32) -> u32 {
    let bullets = &mut state.projectiles.player;
    let enemies = &mut state.director.enemies;
    let mut candidates = Vec::new();
    let mut kills = 0;

    for i in 0..bullets.len() {
        if bullets.is_spent(i) {
            continue;
        }
        let p1 = bullets.pos(i);
        let p0 = bullets.prev_pos(i, dt);
        let (center, w, h) = swept_window(p0, p1, ENEMY_RADIUS);
        state.grid.query_into(center, w, h, &mut candidates);

        for &id in &candidates {
            let Some(enemy) = enemies.get_mut(id) else {
                continue;
            };
            if !enemy.active || !segment_hits_circle(p0, p1, enemy.pos, ENEMY_RADIUS) {
                continue;
            }
            enemy.active = false;
            bullets.kill(i);
            session.add_score(ENEMY_KILL_SCORE);
            state.score_pulse = 1.5;
            state.shake.trigger(shake::ENEMY_KILLED.0, shake::ENEMY_KILLED.1);
            state.particles.emit(
                enemy.pos.x,
                enemy.pos.y,
                ENEMY_DEATH_PARTICLES,
                colors::ENEMY_DEATH,
                None,
            );
            state.events.push(SimEvent::EnemyKilled {
                archetype: enemy.archetype,
                pos: enemy.pos,
            });
            kills += 1;
            break;
        }
    }
    kills
}

/// Pass 2: every connecting bullet deals damage
fn enemy_bullets_vs_player(state: &mut GameState, session: &Session, dt: f32) -> bool {
    let bullets = &mut state.projectiles.enemy;
    let player = &mut state.player;
    let mut hit = false;

    for i in 0..bullets.len() {
        if bullets.is_spent(i) {
            continue;
        }
        let p1 = bullets.pos(i);
        let p0 = bullets.prev_pos(i, dt);
        if segment_hits_circle(p0, p1, player.pos, PLAYER_HITBOX) {
            let damage = session.scaled_damage(ENEMY_BULLET_DAMAGE);
            player.hp -= damage;
            bullets.kill(i);
            state.events.push(SimEvent::PlayerHit {
                damage,
                hp: player.hp,
            });
            hit = true;
        }
    }
    hit
}

/// Pass 3: direct overlap, the rammer is destroyed without score
fn enemy_bodies_vs_player(state: &mut GameState, session: &Session) -> bool {
    let reach = ENEMY_RADIUS + PLAYER_HITBOX;
    let player = &mut state.player;
    let mut hit = false;

    for enemy in state.director.enemies.iter_mut().filter(|e| e.active) {
        if enemy.pos.distance_squared(player.pos) > reach * reach {
            continue;
        }
        let damage = session.scaled_damage(BODY_CONTACT_DAMAGE);
        player.hp -= damage;
        enemy.active = false;
        state.shake.trigger(shake::BODY_CRASH.0, shake::BODY_CRASH.1);
        state.events.push(SimEvent::EnemyCrashed {
            archetype: enemy.archetype,
        });
        state.events.push(SimEvent::PlayerHit {
            damage,
            hp: player.hp,
        });
        hit = true;
    }
    hit
}

/// Pass 4: each bullet chips one hp off the boss
fn player_bullets_vs_boss(state: &mut GameState, session: &mut Session, dt: f32) -> bool {
    let Some(boss) = state.director.boss_mut() else {
        return false;
    };
    let bullets = &mut state.projectiles.player;

    for i in 0..bullets.len() {
        if bullets.is_spent(i) {
            continue;
        }
        let p1 = bullets.pos(i);
        let p0 = bullets.prev_pos(i, dt);
        if !segment_hits_circle(p0, p1, boss.pos, BOSS_RADIUS) {
            continue;
        }
        bullets.kill(i);
        if boss.apply_hit(BOSS_BULLET_DAMAGE) {
            session.add_score(BOSS_KILL_SCORE);
            session.boss_defeated = true;
            state.score_pulse = 2.0;
            state.shake.trigger(shake::BOSS_KILLED.0, shake::BOSS_KILLED.1);
            state.particles.emit(
                boss.pos.x,
                boss.pos.y,
                BOSS_DEATH_PARTICLES,
                colors::BOSS_DEATH,
                None,
            );
            log::info!("Boss defeated");
            state.events.push(SimEvent::BossDefeated);
            return true;
        }
    }
    false
}
