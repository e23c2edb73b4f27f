//! Simulation configuration and difficulty presets
//!
//! Every physical constant the simulation reads comes from [`SimConfig`]. Defaults
//! match `crate::consts`; a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier on zombie base speed
    pub fn zombie_speed_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.35,
        }
    }

    /// Starting lives
    pub fn hero_lives(&self) -> u32 {
        match self {
            Difficulty::Easy => 7,
            Difficulty::Normal => HERO_LIVES_INITIAL,
            Difficulty::Hard => 3,
        }
    }

    /// Invulnerability window after a hit (seconds)
    pub fn damage_duration(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Normal => HERO_DAMAGE_DURATION,
            Difficulty::Hard => 1.0,
        }
    }
}

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    /// Half-extent of the square play area
    pub world_size: f32,
    /// Inset for first-person movement clamping
    pub first_person_margin: f32,
    /// Boundary margin for zombies (negative = more tolerant)
    pub zombie_boundary_margin: f32,

    // === Hero ===
    pub hero_lives_initial: u32,
    /// Cooldown after a hit, in seconds
    pub hero_damage_duration: f32,
    pub hero_radius: f32,
    pub hero_move_speed: f32,
    /// Radians per second
    pub hero_turn_speed: f32,
    /// Per-step knockback velocity retention
    pub hero_friction: f32,
    pub push_strength: f32,

    // === Zombies ===
    pub zombie_radius: f32,
    pub zombie_base_speed: f32,
    pub slow_zombie_multiplier: f32,
    /// Every Nth zombie (by index) is slow
    pub slow_zombie_every: usize,
    pub restitution: f32,
    pub impulse_scale: f32,

    // === Falling ===
    pub fall_rotation_speed: f32,
    pub fall_descent_speed: f32,
    pub fall_death_depth: f32,

    // === Coins and spawn layout ===
    pub collect_distance: f32,
    pub spawn_corner_inset: f32,
    pub zombie_pair_spacing: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,
            first_person_margin: EDGE_INSET,
            zombie_boundary_margin: ZOMBIE_BOUNDARY_MARGIN,

            hero_lives_initial: HERO_LIVES_INITIAL,
            hero_damage_duration: HERO_DAMAGE_DURATION,
            hero_radius: HERO_RADIUS,
            hero_move_speed: HERO_MOVE_SPEED,
            hero_turn_speed: HERO_TURN_SPEED,
            hero_friction: HERO_FRICTION,
            push_strength: PUSH_STRENGTH,

            zombie_radius: ZOMBIE_RADIUS,
            zombie_base_speed: ZOMBIE_BASE_SPEED,
            slow_zombie_multiplier: SLOW_ZOMBIE_MULTIPLIER,
            slow_zombie_every: SLOW_ZOMBIE_EVERY,
            restitution: RESTITUTION,
            impulse_scale: IMPULSE_SCALE,

            fall_rotation_speed: FALL_ROTATION_SPEED,
            fall_descent_speed: FALL_DESCENT_SPEED,
            fall_death_depth: FALL_DEATH_DEPTH,

            collect_distance: COLLECT_DISTANCE,
            spawn_corner_inset: SPAWN_CORNER_INSET,
            zombie_pair_spacing: ZOMBIE_PAIR_SPACING,
        }
    }
}

impl SimConfig {
    /// Create a config from a difficulty preset (applies preset defaults)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_difficulty(difficulty);
        config
    }

    /// Apply a difficulty preset on top of the current values
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.hero_lives_initial = difficulty.hero_lives();
        self.hero_damage_duration = difficulty.damage_duration();
        self.zombie_base_speed *= difficulty.zombie_speed_scale();
    }

    /// Parse and validate a JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_size", self.world_size),
            ("hero_damage_duration", self.hero_damage_duration),
            ("hero_radius", self.hero_radius),
            ("hero_move_speed", self.hero_move_speed),
            ("zombie_radius", self.zombie_radius),
            ("zombie_base_speed", self.zombie_base_speed),
            ("slow_zombie_multiplier", self.slow_zombie_multiplier),
            ("fall_rotation_speed", self.fall_rotation_speed),
            ("fall_descent_speed", self.fall_descent_speed),
            ("collect_distance", self.collect_distance),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        if self.hero_lives_initial == 0 {
            return Err(ConfigError::Invalid {
                field: "hero_lives_initial",
                reason: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::Invalid {
                field: "restitution",
                reason: "must be within [0, 1]",
            });
        }
        if !(self.hero_friction > 0.0 && self.hero_friction <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "hero_friction",
                reason: "must be within (0, 1]",
            });
        }
        if !(self.fall_death_depth < 0.0) {
            return Err(ConfigError::Invalid {
                field: "fall_death_depth",
                reason: "must be below ground level",
            });
        }
        if self.slow_zombie_every == 0 {
            return Err(ConfigError::Invalid {
                field: "slow_zombie_every",
                reason: "must be at least 1",
            });
        }
        if self.spawn_corner_inset >= self.world_size {
            return Err(ConfigError::Invalid {
                field: "spawn_corner_inset",
                reason: "must leave coins inside the world",
            });
        }
        Ok(())
    }
}
