//! Data-driven run configuration
//!
//! Capacities, cadence, and the boss wave. Every field has a default so a
//! tuning file only needs the keys it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Wave number at which the boss replaces normal spawning
    pub boss_wave: u32,
    /// Player projectile pool ceiling
    pub player_projectile_capacity: usize,
    /// Enemy projectile pool ceiling
    pub enemy_projectile_capacity: usize,
    /// Cosmetic particle ceiling
    pub particle_capacity: usize,
    /// Spatial grid cell edge length
    pub grid_cell_size: f32,
    /// Seconds before a wave advances
    pub wave_duration: f32,
    /// Seconds at the start of each wave before groups spawn
    pub settle_delay: f32,
    /// Seed for spawn placement, spread jitter, and particles
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            boss_wave: 10,
            player_projectile_capacity: 2048,
            enemy_projectile_capacity: 8192,
            particle_capacity: 5000,
            grid_cell_size: 100.0,
            wave_duration: 25.0,
            settle_delay: 3.0,
            seed: 0x5eed_ba55,
        }
    }
}

impl Tuning {
    /// Same defaults with a different seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        // A zero cell would divide by zero in the grid; a zero boss wave would never trigger
        tuning.grid_cell_size = tuning.grid_cell_size.max(1.0);
        tuning.boss_wave = tuning.boss_wave.max(1);
        Ok(tuning)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
