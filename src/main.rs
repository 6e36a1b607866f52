//! Neon Barrage headless runner
//!
//! Flies a scripted autopilot through a run at the fixed timestep and
//! reports the result. Usage: `neon-barrage [difficulty] [seconds]`

use std::path::{Path, PathBuf};

use glam::Vec2;

use neon_barrage::consts::SIM_DT;
use neon_barrage::sim::{GameState, SimEvent, TickInput, tick};
use neon_barrage::snapshot::Snapshot;
use neon_barrage::{Difficulty, Host, Session, Settings, Track, Tuning};

const DEFAULT_SECONDS: f32 = 120.0;
/// Tuning overrides are read from here when present
const TUNING_FILE: &str = "tuning.json";

/// Host that logs music cues and persists high scores to the settings file
struct SettingsHost {
    settings: Settings,
    path: PathBuf,
}

impl Host for SettingsHost {
    fn play_track(&mut self, track: Track) {
        log::info!(
            "Music: {} (volume {:.0}%)",
            track.as_str(),
            self.settings.music_volume * 100.0
        );
    }

    fn record_high_score(&mut self, score: u64) {
        if !self.settings.submit_score(score) {
            return;
        }
        if let Err(err) = self.settings.save(&self.path) {
            log::error!("Could not save high score: {err}");
        }
    }
}

/// Sweep across the lower field, sidestepping the closest incoming bullet
fn autopilot(state: &GameState) -> TickInput {
    const DODGE_RADIUS: f32 = 80.0;

    let t = state.time;
    let mut target = Vec2::new(640.0 + 450.0 * (t * 0.6).sin(), 600.0 + 60.0 * (t * 1.3).sin());

    let pos = state.player.pos;
    let bullets = &state.projectiles.enemy;
    let threat = (0..bullets.len())
        .map(|i| bullets.pos(i))
        .filter(|b| b.y < pos.y && b.distance_squared(pos) < DODGE_RADIUS * DODGE_RADIUS)
        .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)));
    if let Some(threat) = threat {
        let side = if threat.x > pos.x { -1.0 } else { 1.0 };
        target.x = pos.x + side * DODGE_RADIUS;
    }

    TickInput {
        pointer: Some(target),
        fire: true,
        pause: false,
    }
}

fn main() {
    env_logger::init();
    log::info!("Neon Barrage (headless) starting...");

    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(Settings::FILE_NAME);
    let mut settings = Settings::load(&path);
    if let Some(name) = args.next() {
        match Difficulty::from_str(&name) {
            Some(difficulty) => settings.difficulty = difficulty,
            None => log::warn!("Unknown difficulty '{name}', using {}", settings.difficulty.as_str()),
        }
    }
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);

    let tuning = match Tuning::load(Path::new(TUNING_FILE)) {
        Ok(tuning) => {
            log::info!("Loaded tuning overrides from {TUNING_FILE}");
            tuning
        }
        Err(err) => {
            log::debug!("No tuning overrides ({err}), using defaults");
            Tuning::default()
        }
    };

    let mut session = Session::from_settings(&settings);
    let mut state = GameState::new(tuning);
    let mut host = SettingsHost { settings, path };

    let steps = (seconds / SIM_DT).ceil() as u64;
    let mut kills = 0u32;
    for _ in 0..steps {
        let input = autopilot(&state);
        tick(&mut state, &mut session, &input, &mut host, SIM_DT);

        for event in &state.events {
            match event {
                SimEvent::EnemyKilled { .. } => kills += 1,
                SimEvent::WaveStarted { wave } => log::info!("Wave {wave}"),
                SimEvent::PlayerHit { damage, hp } => {
                    log::debug!("Hit for {damage:.0}, {hp:.0} hp left")
                }
                _ => {}
            }
        }
        if state.phase.is_terminal() {
            break;
        }
    }

    let hud = Snapshot::capture(&state, &session).hud;
    println!(
        "{:?} after {:.1}s on {}: score {} (best {}), wave {}, {} kills, {:.0} hp",
        hud.phase,
        state.time,
        session.difficulty.as_str(),
        hud.score,
        hud.high_score,
        hud.wave,
        kills,
        hud.hp,
    );
}
