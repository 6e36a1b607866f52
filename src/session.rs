//! Per-run session context and host collaborators
//!
//! Score, difficulty, and the high score live here instead of in globals so
//! every run (and every test) gets an isolated session.

use serde::{Deserialize, Serialize};

use crate::settings::{Difficulty, Settings};

/// Music tracks the host can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    Menu,
    Game,
    Boss,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Menu => "menu",
            Track::Game => "game",
            Track::Boss => "boss",
        }
    }
}

/// Side effects the simulation requests but does not own.
///
/// Calls arrive after a step has fully resolved, never mid-iteration, so an
/// implementation may freely start a scene transition from inside them.
pub trait Host {
    /// Start (or switch to) a music track
    fn play_track(&mut self, track: Track);
    /// Persist a new best score
    fn record_high_score(&mut self, score: u64);
}

/// Host that ignores every call
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl Host for NullHost {
    fn play_track(&mut self, _track: Track) {}
    fn record_high_score(&mut self, _score: u64) {}
}

/// Score and difficulty for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub difficulty: Difficulty,
    pub score: u64,
    /// Best score known when the run started; raised when the run beats it
    pub high_score: u64,
    pub boss_defeated: bool,
}

impl Session {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            score: 0,
            high_score: 0,
            boss_defeated: false,
        }
    }

    /// Start a run from persisted settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            high_score: settings.high_score,
            ..Self::new(settings.difficulty)
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Scale raw incoming damage by the difficulty tier
    pub fn scaled_damage(&self, base: f32) -> f32 {
        base * self.difficulty.damage_multiplier()
    }

    /// Promote the current score to high score if it beats it.
    /// Returns the new high score when one was set.
    pub fn settle_high_score(&mut self) -> Option<u64> {
        if self.score > self.high_score {
            self.high_score = self.score;
            Some(self.score)
        } else {
            None
        }
    }
}
