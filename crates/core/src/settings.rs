//! Game settings: difficulty, animation speeds and board size
//!
//! The engine reads settings when a sequence starts and never writes them.
//! Settings can be loaded from a JSON file; missing fields fall back to the
//! defaults, so `{}` is a valid settings file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    gem_types_for_difficulty, scaled_duration_ms, BASE_DISAPPEAR_MS, BASE_FALL_MS, BASE_SWAP_MS,
    BOARD_SIZE, DEFAULT_DIFFICULTY, DEFAULT_SPEED, GEM_TYPES_BY_DIFFICULTY, MAX_BOARD_SIZE,
    MAX_SPEED, MIN_BOARD_SIZE, MIN_SPEED,
};

/// Error type for settings validation and loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("difficulty must be 1, 2 or 3 (got {0})")]
    Difficulty(u8),
    #[error("{name} must be between 1 and 5 (got {value})")]
    Speed { name: &'static str, value: u8 },
    #[error("board size must be between 3 and 16 (got {0})")]
    BoardSize(u8),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Player-facing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 1 (easy, 5 gem types) to 3 (hard, 7 gem types)
    pub difficulty: u8,
    /// 1 (very slow) to 5 (very fast); also drives the swap animation
    pub disappear_speed: u8,
    /// 1 (very slow) to 5 (very fast)
    pub fall_speed: u8,
    pub board_size: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            disappear_speed: DEFAULT_SPEED,
            fall_speed: DEFAULT_SPEED,
            board_size: BOARD_SIZE,
        }
    }
}

/// Phase durations derived from the speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTiming {
    pub swap_ms: u32,
    pub disappear_ms: u32,
    pub fall_ms: u32,
}

impl Settings {
    pub fn new(difficulty: u8, disappear_speed: u8, fall_speed: u8) -> Result<Self, SettingsError> {
        Self {
            difficulty,
            disappear_speed,
            fall_speed,
            ..Self::default()
        }
        .validate()
    }

    /// Check every field, returning the settings unchanged when valid.
    pub fn validate(self) -> Result<Self, SettingsError> {
        if gem_types_for_difficulty(self.difficulty).is_none() {
            return Err(SettingsError::Difficulty(self.difficulty));
        }
        for (name, value) in [
            ("disappear speed", self.disappear_speed),
            ("fall speed", self.fall_speed),
        ] {
            if !(MIN_SPEED..=MAX_SPEED).contains(&value) {
                return Err(SettingsError::Speed { name, value });
            }
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(SettingsError::BoardSize(self.board_size));
        }
        Ok(self)
    }

    pub fn with_difficulty(self, difficulty: u8) -> Result<Self, SettingsError> {
        Self { difficulty, ..self }.validate()
    }

    /// Parse and validate settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()
    }

    /// Load and validate a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Number of distinct gem types for the configured difficulty.
    ///
    /// An invalid difficulty falls back to the hardest setting.
    pub fn gem_types(&self) -> u8 {
        gem_types_for_difficulty(self.difficulty).unwrap_or(GEM_TYPES_BY_DIFFICULTY[2])
    }

    pub fn timing(&self) -> PhaseTiming {
        PhaseTiming {
            swap_ms: scaled_duration_ms(BASE_SWAP_MS, self.disappear_speed),
            disappear_ms: scaled_duration_ms(BASE_DISAPPEAR_MS, self.disappear_speed),
            fall_ms: scaled_duration_ms(BASE_FALL_MS, self.fall_speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.gem_types(), 6);
        assert_eq!(
            s.timing(),
            PhaseTiming {
                swap_ms: 200,
                disappear_ms: 300,
                fall_ms: 200
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(matches!(
            Settings::new(0, 3, 3),
            Err(SettingsError::Difficulty(0))
        ));
        assert!(matches!(
            Settings::new(2, 6, 3),
            Err(SettingsError::Speed { value: 6, .. })
        ));
        assert!(matches!(
            Settings::new(2, 3, 0),
            Err(SettingsError::Speed { value: 0, .. })
        ));
        let tiny = Settings {
            board_size: 2,
            ..Settings::default()
        };
        assert!(matches!(tiny.validate(), Err(SettingsError::BoardSize(2))));
    }

    #[test]
    fn test_speed_dials_scale_their_phases() {
        let s = Settings::new(1, 5, 1).unwrap();
        let t = s.timing();
        assert_eq!(t.swap_ms, 60);
        assert_eq!(t.disappear_ms, 90);
        assert_eq!(t.fall_ms, 500);
        assert_eq!(s.gem_types(), 5);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let s = Settings::from_json(r#"{ "difficulty": 3 }"#).unwrap();
        assert_eq!(s.difficulty, 3);
        assert_eq!(s.fall_speed, DEFAULT_SPEED);
        assert_eq!(s.board_size, BOARD_SIZE);

        assert!(matches!(
            Settings::from_json(r#"{ "fall_speed": 9 }"#),
            Err(SettingsError::Speed { .. })
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Serde(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load("/nonexistent/tui-gems/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
