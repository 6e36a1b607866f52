//! Player settings and preferences
//!
//! Persisted as JSON next to the executable. Missing or corrupt files fall
//! back to defaults; only writes report errors.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" | "normal" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Multiplier on all damage the player takes
    pub fn damage_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Extreme => 2.0,
        }
    }

    /// Scale on the wave director's spawn interval (lower = faster)
    pub fn spawn_interval_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 0.7,
            Difficulty::Hard => 0.5,
            Difficulty::Extreme => 0.3,
        }
    }

    /// Scale on every enemy fire interval (lower = faster)
    pub fn fire_interval_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 0.7,
            Difficulty::Hard => 0.5,
            Difficulty::Extreme => 0.3,
        }
    }

    /// Scale on enemy base hit points
    pub fn enemy_hp_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
            Difficulty::Extreme => 3.0,
        }
    }

    /// Extra symmetric pairs added to spread and aimed volleys
    pub fn extra_volley_pairs(&self) -> usize {
        match self {
            Difficulty::Easy | Difficulty::Medium => 0,
            Difficulty::Hard => 1,
            Difficulty::Extreme => 2,
        }
    }
}

/// Errors from reading or writing a JSON config file
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "settings i/o failed: {err}"),
            Self::Parse(err) => write!(f, "settings json invalid: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected difficulty tier
    pub difficulty: Difficulty,

    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    /// Best score across runs
    pub high_score: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            music_volume: 0.5,
            sfx_volume: 0.5,
            high_score: 0,
        }
    }
}

impl Settings {
    /// Default file name used by the runner
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Record a finished run. Returns true if it set a new high score.
    pub fn submit_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    /// Parse settings from JSON, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(err) => {
                log::warn!("Failed to read {}: {}", path.display(), err);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings to disk as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trips_names() {
        for tier in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_damage_multiplier_is_monotonic() {
        let mults: Vec<f32> = Difficulty::ALL.iter().map(|d| d.damage_multiplier()).collect();
        assert!(mults.windows(2).all(|w| w[0] < w[1]));
        assert!(Difficulty::Hard.damage_multiplier() > Difficulty::Easy.damage_multiplier());
    }

    #[test]
    fn test_harder_spawns_and_fires_faster() {
        let easy = Difficulty::Easy;
        let extreme = Difficulty::Extreme;
        assert!(extreme.spawn_interval_scale() < easy.spawn_interval_scale());
        assert!(extreme.fire_interval_scale() < easy.fire_interval_scale());
        assert!(extreme.enemy_hp_scale() > easy.enemy_hp_scale());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"hard","music_volume":4.0}"#)
            .expect("valid json");
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.5);
        assert_eq!(settings.high_score, 0);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_submit_score_only_raises() {
        let mut settings = Settings::default();
        assert!(settings.submit_score(500));
        assert!(!settings.submit_score(200));
        assert_eq!(settings.high_score, 500);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "neon_barrage_settings_{}.json",
            std::process::id()
        ));
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Extreme;
        settings.high_score = 4200;
        settings.save(&path).expect("save");

        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("neon_barrage_definitely_missing.json");
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
