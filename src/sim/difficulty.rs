//! Difficulty profiles
//!
//! Each named level maps to a fixed bundle of physics and pacing constants.
//! The profile is resolved once when a session is (re)started and stays
//! locked until the next reset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors raised at the input/preferences boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown difficulty '{0}' (expected easy, normal, hard or insane)")]
    UnknownDifficulty(String),
}

/// Named difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

/// Physics and pacing constants for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Velocity set by a jump (negative = up)
    pub jump_power: f32,
    /// Vertical opening between top and bottom pipe
    pub pipe_gap: f32,
    /// Leftward pipe speed per tick
    pub pipe_speed: f32,
    /// Horizontal distance from the right edge the last pipe must clear before the next spawns
    pub pipe_interval: f32,
    /// Ticks before the first pipe may appear
    pub first_pipe_delay: u64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    /// Display label for the HUD
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Insane => "INSANE",
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                gravity: 0.25,
                jump_power: -6.0,
                pipe_gap: 220.0,
                pipe_speed: 1.5,
                pipe_interval: 200.0,
                first_pipe_delay: 90,
            },
            Difficulty::Normal => DifficultyProfile {
                gravity: 0.35,
                jump_power: -7.0,
                pipe_gap: 200.0,
                pipe_speed: 2.0,
                pipe_interval: 180.0,
                first_pipe_delay: 80,
            },
            Difficulty::Hard => DifficultyProfile {
                gravity: 0.45,
                jump_power: -8.0,
                pipe_gap: 180.0,
                pipe_speed: 2.5,
                pipe_interval: 160.0,
                first_pipe_delay: 70,
            },
            Difficulty::Insane => DifficultyProfile {
                gravity: 0.55,
                jump_power: -9.0,
                pipe_gap: 160.0,
                pipe_speed: 3.5,
                pipe_interval: 140.0,
                first_pipe_delay: 60,
            },
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "insane" => Ok(Difficulty::Insane),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        assert_eq!("  HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
    }

    #[test]
    fn test_unknown_difficulty_is_error() {
        let err = "nightmare".parse::<Difficulty>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownDifficulty("nightmare".into()));
        assert!(err.to_string().contains("nightmare"));
    }

    #[test]
    fn test_profiles_get_harder() {
        let profiles: Vec<_> = Difficulty::ALL.iter().map(|d| d.profile()).collect();
        for pair in profiles.windows(2) {
            assert!(pair[1].gravity > pair[0].gravity);
            assert!(pair[1].pipe_gap < pair[0].pipe_gap);
            assert!(pair[1].pipe_speed > pair[0].pipe_speed);
            assert!(pair[1].first_pipe_delay < pair[0].first_pipe_delay);
        }
    }

    #[test]
    fn test_normal_profile_values() {
        let p = Difficulty::Normal.profile();
        assert_eq!(p.gravity, 0.35);
        assert_eq!(p.jump_power, -7.0);
        assert_eq!(p.pipe_gap, 200.0);
    }
}
