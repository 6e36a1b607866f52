//! Fixed timestep simulation tick
//!
//! One call advances the run by one step in a fixed order: player, director
//! and agents, projectiles, particles, grid rebuild, collision, terminal
//! check. Collaborator calls go out only after all of that has finished.

use glam::Vec2;

use super::collision;
use super::enemy::{AgentContext, ENEMY_HALF_EXTENT};
use super::particle::colors;
use super::projectile::ProjectilePool;
use super::state::{GameState, Phase, RunSummary, SimEvent};
use crate::session::{Host, Session, Track};

/// Chance per live projectile per step of dropping a trail particle
const TRAIL_CHANCE: f64 = 0.3;
/// HUD score pulse settle rate (1/s)
const SCORE_PULSE_RATE: f32 = 5.0;
/// HUD score counter roll rate (1/s); snaps once within one point
const SCORE_ROLL_RATE: f32 = 5.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in field coordinates; the ship follows it
    pub pointer: Option<Vec2>,
    /// Fire held
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by one fixed timestep.
///
/// Events raised during the step are left in `state.events` for the caller
/// and are replaced on the next call.
pub fn tick(
    state: &mut GameState,
    session: &mut Session,
    input: &TickInput,
    host: &mut dyn Host,
    dt: f32,
) {
    state.events.clear();

    if state.mark_started() {
        log::info!("Run started on {}", session.difficulty.as_str());
        state.events.push(SimEvent::RunStarted);
    }

    if input.pause {
        match state.phase {
            Phase::Playing => state.phase = Phase::Paused,
            Phase::Paused => state.phase = Phase::Playing,
            _ => {}
        }
    }

    if state.phase == Phase::Playing {
        step(state, session, input, dt);
    }

    dispatch(state, session, host);
}

fn step(state: &mut GameState, session: &mut Session, input: &TickInput, dt: f32) {
    state.time += dt;
    state.shake.update(dt);
    state.score_pulse += (1.0 - state.score_pulse) * (SCORE_PULSE_RATE * dt).min(1.0);
    roll_score(state, session.score as f32, dt);

    state.player.update(input.pointer, dt);
    if input.fire {
        if let Some((muzzle, vel)) = state.player.try_fire() {
            state
                .projectiles
                .player
                .spawn(muzzle.x, muzzle.y, vel.x, vel.y);
        }
    }

    let mut ctx = AgentContext {
        player: state.player.pos,
        difficulty: session.difficulty,
        rng: &mut state.rng,
        bullets: &mut state.projectiles.enemy,
    };
    state.director.update(dt, &mut ctx, &mut state.events);

    state.projectiles.step(dt);

    state.particles.step(dt);
    emit_trails(state);

    state.grid.clear();
    for (id, enemy) in state.director.enemies.iter().enumerate() {
        if enemy.active {
            state.grid.insert(id, enemy.pos, ENEMY_HALF_EXTENT);
        }
    }

    collision::resolve(state, session, dt);

    let summary = RunSummary {
        score: session.score,
        wave: state.director.wave,
        boss_defeated: session.boss_defeated,
    };
    if state.player.is_dead() {
        state.phase = Phase::GameOver;
        log::info!(
            "Game over: score {} on wave {}",
            summary.score,
            summary.wave
        );
        state.events.push(SimEvent::GameOver(summary));
    } else if session.boss_defeated {
        state.phase = Phase::Victory;
        log::info!("Victory: score {}", summary.score);
        state.events.push(SimEvent::Victory(summary));
    }
}

fn roll_score(state: &mut GameState, score: f32, dt: f32) {
    let gap = score - state.displayed_score;
    if gap.abs() < 1.0 {
        state.displayed_score = score;
    } else {
        state.displayed_score += gap * (SCORE_ROLL_RATE * dt).min(1.0);
    }
}

fn emit_trails(state: &mut GameState) {
    let particles = &mut state.particles;
    let mut trail = |pool: &ProjectilePool, color| {
        for i in 0..pool.len() {
            let (p, v) = (pool.pos(i), pool.vel(i));
            particles.maybe_trail(p.x, p.y, v.x, v.y, TRAIL_CHANCE, color);
        }
    };
    trail(&state.projectiles.player, colors::PLAYER_TRAIL);
    trail(&state.projectiles.enemy, colors::ENEMY_TRAIL);
}

/// Forward the step's events to the host
fn dispatch(state: &GameState, session: &mut Session, host: &mut dyn Host) {
    for event in &state.events {
        match event {
            SimEvent::RunStarted => host.play_track(Track::Game),
            SimEvent::BossSpawned => host.play_track(Track::Boss),
            SimEvent::GameOver(_) | SimEvent::Victory(_) => {
                if let Some(score) = session.settle_high_score() {
                    log::debug!("New high score {score}");
                    host.record_high_score(score);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::NullHost;
    use crate::settings::Difficulty;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_first_tick_starts_run() {
        let mut state = GameState::default();
        let mut session = Session::new(Difficulty::Medium);
        tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        assert_eq!(state.events, vec![SimEvent::RunStarted]);
        tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_fire_spawns_player_bullet() {
        let mut state = GameState::default();
        let mut session = Session::new(Difficulty::Medium);
        let input = TickInput {
            pointer: Some(Vec2::new(400.0, 500.0)),
            fire: true,
            pause: false,
        };
        tick(&mut state, &mut session, &input, &mut NullHost, DT);
        assert_eq!(state.player.pos, Vec2::new(400.0, 500.0));
        assert_eq!(state.projectiles.player.len(), 1);
        // Spawned at y - 20 and integrated once in the same step
        let p = state.projectiles.player.pos(0);
        assert!((p.y - (480.0 - 800.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = GameState::default();
        let mut session = Session::new(Difficulty::Medium);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &mut session, &pause, &mut NullHost, DT);
        assert_eq!(state.phase, Phase::Paused);
        let frozen = state.time;
        tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        assert_eq!(state.time, frozen);
        tick(&mut state, &mut session, &pause, &mut NullHost, DT);
        assert_eq!(state.phase, Phase::Playing);
        assert!(state.time > frozen);
    }

    #[test]
    fn test_displayed_score_rolls_up_then_snaps() {
        let mut state = GameState::default();
        let mut session = Session::new(Difficulty::Medium);
        session.add_score(1000);

        tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        let first = state.displayed_score;
        assert!(first > 0.0 && first < 1000.0);
        tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        assert!(state.displayed_score > first);

        // Well inside the settle delay, so nothing can interfere
        for _ in 0..118 {
            tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        }
        assert_eq!(state.displayed_score, 1000.0);
    }

    #[test]
    fn test_grid_matches_live_roster() {
        let mut state = GameState::default();
        let mut session = Session::new(Difficulty::Extreme);
        for _ in 0..300 {
            tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        }
        let live = state.director.active_enemies().count();
        assert!(live > 0);
        for (id, enemy) in state.director.enemies.iter().enumerate() {
            if enemy.active {
                let found = state.grid.query(enemy.pos, 1.0, 1.0);
                assert!(found.contains(&id));
            }
        }
    }

    #[test]
    fn test_terminal_state_stops_stepping() {
        let mut state = GameState::default();
        let mut session = Session::new(Difficulty::Medium);
        state.player.hp = 5.0;
        let p = state.player.pos;
        state.projectiles.enemy.spawn(p.x, p.y - 5.0, 0.0, 300.0);
        tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        assert_eq!(state.phase, Phase::GameOver);

        let t = state.time;
        tick(&mut state, &mut session, &TickInput::default(), &mut NullHost, DT);
        assert_eq!(state.time, t);
        assert!(state.events.is_empty());
    }
}
