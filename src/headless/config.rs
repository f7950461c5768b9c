//! JSON configuration parsing for headless encounters
//!
//! Parses JSON encounter descriptions and converts variant and damage
//! category names into the simulation's types.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::enemy::damage::DamageCategory;
use crate::enemy::EnemyKind;

/// One enemy placed in the encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawnConfig {
    /// Variant name ("Anukus", "Goblin", ...), case-insensitive
    pub variant: String,
    /// Spawn position on the arena floor
    pub position: [f32; 2],
}

/// The player the enemies fight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub position: [f32; 2],
    pub max_health: i32,
    /// Damage categories fired in turn
    pub weapon_rotation: Vec<String>,
    pub damage: i32,
    /// Seconds between shots
    pub fire_interval: f32,
    pub range: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            max_health: 100,
            weapon_rotation: vec![
                "Physical".to_string(),
                "Fire".to_string(),
                "Ice".to_string(),
            ],
            damage: 15,
            fire_interval: 0.5,
            range: 10.0,
        }
    }
}

/// Headless encounter configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Enemies to spawn (at least one)
    pub enemies: Vec<EnemySpawnConfig>,
    #[serde(default)]
    pub player: PlayerConfig,
    /// Maximum encounter duration in seconds (default: 120)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Simulation ticks per second (default: 60)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Random seed for deterministic encounter reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Enemy roster RON file (optional, defaults to the shipped roster)
    #[serde(default)]
    pub roster_path: Option<String>,
}

fn default_max_duration() -> f32 {
    120.0
}

fn default_tick_rate() -> u32 {
    60
}

impl EncounterConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: EncounterConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enemies.is_empty() {
            return Err("enemies must list at least one enemy".to_string());
        }
        for enemy in &self.enemies {
            Self::parse_variant(&enemy.variant)?;
        }
        for category in &self.player.weapon_rotation {
            Self::parse_category(category)?;
        }

        if self.player.max_health <= 0 {
            return Err("player.max_health must be positive".to_string());
        }
        if self.player.damage < 0 {
            return Err("player.damage must not be negative".to_string());
        }
        if self.player.fire_interval <= 0.0 {
            return Err("player.fire_interval must be positive".to_string());
        }
        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }
        if self.tick_rate == 0 {
            return Err("tick_rate must be positive".to_string());
        }

        Ok(())
    }

    /// Parse a variant name into EnemyKind
    pub fn parse_variant(name: &str) -> Result<EnemyKind, String> {
        EnemyKind::from_name(name).ok_or_else(|| {
            let valid: Vec<&str> = EnemyKind::ALL.iter().map(|k| k.name()).collect();
            format!("Unknown enemy variant: '{}'. Valid variants: {}", name, valid.join(", "))
        })
    }

    /// Parse a damage category name into DamageCategory
    pub fn parse_category(name: &str) -> Result<DamageCategory, String> {
        match name {
            "Physical" => Ok(DamageCategory::Physical),
            "Fire" => Ok(DamageCategory::Fire),
            "Ice" => Ok(DamageCategory::Ice),
            "Venom" => Ok(DamageCategory::Venom),
            _ => Err(format!(
                "Unknown damage category: '{}'. Valid categories: Physical, Fire, Ice, Venom",
                name
            )),
        }
    }

    /// Enemies with parsed variants and positions.
    pub fn spawns(&self) -> Result<Vec<(EnemyKind, Vec2)>, String> {
        self.enemies
            .iter()
            .map(|e| Ok((Self::parse_variant(&e.variant)?, Vec2::from(e.position))))
            .collect()
    }

    /// The player's weapon rotation with parsed categories.
    pub fn weapon_rotation(&self) -> Result<Vec<DamageCategory>, String> {
        self.player
            .weapon_rotation
            .iter()
            .map(|name| Self::parse_category(name))
            .collect()
    }

    pub fn tick_duration_secs(&self) -> f64 {
        1.0 / self.tick_rate.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{ "enemies": [ { "variant": "anukus", "position": [0.0, 5.0] } ] }"#
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: EncounterConfig = serde_json::from_str(minimal_json()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.max_duration_secs, 120.0);
        assert_eq!(config.player.max_health, 100);
        assert_eq!(config.spawns().unwrap(), vec![(EnemyKind::Anukus, Vec2::new(0.0, 5.0))]);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let mut config: EncounterConfig = serde_json::from_str(minimal_json()).unwrap();
        config.enemies[0].variant = "Dragon".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Dragon"), "Error should name the bad variant: {}", err);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut config: EncounterConfig = serde_json::from_str(minimal_json()).unwrap();
        config.player.weapon_rotation = vec!["Lightning".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_encounter_rejected() {
        let mut config: EncounterConfig = serde_json::from_str(minimal_json()).unwrap();
        config.enemies.clear();
        assert!(config.validate().is_err());
    }
}
