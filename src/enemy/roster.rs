//! Data-Driven Enemy Configuration
//!
//! Every variant's tuning lives in `assets/config/enemies.ron`. Each struct
//! defaults to the shipped game values and is `#[serde(default)]`, so a file
//! only needs to name what it changes.
//!
//! ## Usage
//! ```ignore
//! fn my_system(roster: Res<EnemyRoster>) {
//!     println!("Anukus swings for {}", roster.anukus.sword_damage);
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::behavior::LostTargetTuning;
use super::status_effects::StatusTuning;
use super::EnemyKind;
use crate::arena::loot::DropTable;

pub const DEFAULT_ROSTER_PATH: &str = "assets/config/enemies.ron";

/// Stats the generic enemy aggregate needs, whatever the variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyProfile {
    pub name: String,
    pub max_health: i32,
    pub move_speed: f32,
    /// Secondary speed channel scaled by freeze
    pub dash_speed: Option<f32>,
    pub death_duration: f32,
    pub is_boss: bool,
    pub phase_two: Option<PhaseTwoProfile>,
    pub drops: DropTable,
}

/// Base stats written when a boss enters phase two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTwoProfile {
    /// Health fraction at or below which phase two starts
    pub health_threshold: f32,
    pub move_speed: f32,
    pub dash_speed: Option<f32>,
}

// ============================================================================
// Variant tuning
// ============================================================================

/// The plain melee enemy: chase, swing when in range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GruntConfig {
    pub max_health: i32,
    pub move_speed: f32,
    pub damage: i32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Length of the damage-active window
    pub attack_duration: f32,
    pub death_duration: f32,
    pub drops: DropTable,
}

impl Default for GruntConfig {
    fn default() -> Self {
        Self {
            max_health: 50,
            move_speed: 2.0,
            damage: 10,
            attack_range: 1.5,
            attack_cooldown: 1.0,
            attack_duration: 0.1,
            death_duration: 0.1,
            drops: DropTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnukusPhaseTwo {
    pub health_threshold: f32,
    pub move_speed: f32,
    pub sword_damage: i32,
    pub attack_cooldown: f32,
    /// Swings per commit before recovering
    pub attacks_per_commit: u32,
}

impl Default for AnukusPhaseTwo {
    fn default() -> Self {
        Self {
            health_threshold: 0.4,
            move_speed: 7.0,
            sword_damage: 35,
            attack_cooldown: 2.0,
            attacks_per_commit: 2,
        }
    }
}

/// Sword boss: lines up on a row or column, backsteps, flashes, then swings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnukusConfig {
    pub max_health: i32,
    pub move_speed: f32,
    pub melee_range: f32,
    pub backstep_distance: f32,
    pub backstep_duration: f32,
    pub charge_duration: f32,
    pub attack_duration: f32,
    pub hitbox_activation_delay: f32,
    /// How far in front of Anukus the sword hitbox sits
    pub hitbox_distance: f32,
    pub hitbox_radius: f32,
    pub sword_damage: i32,
    pub attack_cooldown: f32,
    pub recover_duration: f32,
    pub death_duration: f32,
    pub phase_two: AnukusPhaseTwo,
    pub drops: DropTable,
}

impl Default for AnukusConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            move_speed: 5.0,
            melee_range: 2.5,
            backstep_distance: 1.5,
            backstep_duration: 0.15,
            charge_duration: 0.1,
            attack_duration: 0.3,
            hitbox_activation_delay: 0.15,
            hitbox_distance: 1.5,
            hitbox_radius: 1.25,
            sword_damage: 25,
            attack_cooldown: 3.0,
            recover_duration: 0.3,
            death_duration: 1.5,
            phase_two: AnukusPhaseTwo::default(),
            drops: DropTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BobPhaseTwo {
    pub health_threshold: f32,
    pub dash_speed: f32,
    pub dash_damage: i32,
    pub dash_cooldown: f32,
}

impl Default for BobPhaseTwo {
    fn default() -> Self {
        Self {
            health_threshold: 0.4,
            dash_speed: 85.0,
            dash_damage: 35,
            dash_cooldown: 1.5,
        }
    }
}

/// Dash boss: holds a horizontal distance on the target's row, charges, dashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BobConfig {
    pub max_health: i32,
    pub move_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Vertical tolerance for "same row"
    pub positioning_tolerance: f32,
    pub charge_duration: f32,
    pub dash_speed: f32,
    pub dash_damage: i32,
    pub dash_cooldown: f32,
    /// Dash ends after travelling this far
    pub dash_travel: f32,
    pub dash_max_duration: f32,
    pub contact_radius: f32,
    pub recover_duration: f32,
    pub death_duration: f32,
    pub phase_two: BobPhaseTwo,
    pub drops: DropTable,
}

impl Default for BobConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            move_speed: 9.0,
            min_distance: 8.0,
            max_distance: 15.0,
            positioning_tolerance: 1.0,
            charge_duration: 0.8,
            dash_speed: 60.0,
            dash_damage: 20,
            dash_cooldown: 2.5,
            dash_travel: 30.0,
            dash_max_duration: 1.0,
            contact_radius: 1.0,
            recover_duration: 0.2,
            death_duration: 1.5,
            phase_two: BobPhaseTwo::default(),
            drops: DropTable::default(),
        }
    }
}

/// Fast melee enemy with a short gap-closing dash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoblinConfig {
    pub max_health: i32,
    pub move_speed: f32,
    pub damage: i32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub attack_duration: f32,
    pub dash_speed: f32,
    pub dash_cooldown: f32,
    pub dash_duration: f32,
    pub dash_range: f32,
    pub dash_windup: f32,
    pub contact_radius: f32,
    pub death_duration: f32,
    pub drops: DropTable,
}

impl Default for GoblinConfig {
    fn default() -> Self {
        Self {
            max_health: 30,
            move_speed: 4.5,
            damage: 7,
            attack_range: 1.0,
            attack_cooldown: 0.7,
            attack_duration: 0.1,
            dash_speed: 10.0,
            dash_cooldown: 2.5,
            dash_duration: 0.4,
            dash_range: 6.0,
            dash_windup: 0.1,
            contact_radius: 0.8,
            death_duration: 0.1,
            drops: DropTable::default(),
        }
    }
}

/// Flying eye: hovers at range and shoots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeholderConfig {
    pub max_health: i32,
    pub move_speed: f32,
    pub damage: i32,
    pub shoot_range: f32,
    pub attack_cooldown: f32,
    /// Preferred distance as a fraction of shoot range
    pub ideal_distance_factor: f32,
    pub hover_height: f32,
    pub hover_frequency: f32,
    pub hover_amplitude: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_lifetime: f32,
    pub recover_duration: f32,
    pub death_duration: f32,
    pub drops: DropTable,
}

impl Default for BeholderConfig {
    fn default() -> Self {
        Self {
            max_health: 50,
            move_speed: 2.0,
            damage: 8,
            shoot_range: 6.0,
            attack_cooldown: 2.0,
            ideal_distance_factor: 0.7,
            hover_height: 2.0,
            hover_frequency: 2.0,
            hover_amplitude: 0.5,
            projectile_speed: 8.0,
            projectile_radius: 0.5,
            projectile_lifetime: 5.0,
            recover_duration: 0.0,
            death_duration: 0.1,
            drops: DropTable::default(),
        }
    }
}

/// Burrowing worm: keeps its distance, spits fireball bursts, bites up close.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FireWormConfig {
    pub max_health: i32,
    pub move_speed: f32,
    /// Retreats when the target is closer than this
    pub min_distance: f32,
    /// Advances when the target is farther than this
    pub keep_distance: f32,
    /// Runs at the target when it is farther than this
    pub chase_distance: f32,
    pub fireball_damage: i32,
    pub fireballs_per_burst: u32,
    pub fireball_interval: f32,
    pub burst_cooldown: f32,
    pub fireball_speed: f32,
    /// Random spread either side of the aim, in degrees
    pub fireball_spread_degrees: f32,
    pub projectile_radius: f32,
    pub projectile_lifetime: f32,
    pub bite_range: f32,
    pub bite_damage: i32,
    pub bite_windup: f32,
    pub bite_activation_delay: f32,
    pub bite_duration: f32,
    pub bite_cooldown: f32,
    pub recover_duration: f32,
    pub death_duration: f32,
    pub drops: DropTable,
}

impl Default for FireWormConfig {
    fn default() -> Self {
        Self {
            max_health: 50,
            move_speed: 2.0,
            min_distance: 5.0,
            keep_distance: 7.0,
            chase_distance: 12.0,
            fireball_damage: 15,
            fireballs_per_burst: 3,
            fireball_interval: 0.3,
            burst_cooldown: 3.0,
            fireball_speed: 8.0,
            fireball_spread_degrees: 5.0,
            projectile_radius: 0.5,
            projectile_lifetime: 5.0,
            bite_range: 1.5,
            bite_damage: 15,
            bite_windup: 0.3,
            bite_activation_delay: 0.1,
            bite_duration: 0.25,
            bite_cooldown: 1.5,
            recover_duration: 0.5,
            death_duration: 0.1,
            drops: DropTable::default(),
        }
    }
}

/// Armored brute: slow punches and a telegraphed ground slam.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GolemConfig {
    pub max_health: i32,
    pub move_speed: f32,
    /// Flat reduction on every hit, floored at 1 damage
    pub armor: i32,
    pub punch_damage: i32,
    pub punch_range: f32,
    pub punch_cooldown: f32,
    pub punch_duration: f32,
    pub slam_radius: f32,
    pub slam_damage: i32,
    pub slam_cooldown: f32,
    pub slam_windup: f32,
    /// Slam starts when the target is within this multiple of the radius
    pub slam_trigger_factor: f32,
    pub slam_duration: f32,
    pub recover_duration: f32,
    pub death_duration: f32,
    pub drops: DropTable,
}

impl Default for GolemConfig {
    fn default() -> Self {
        Self {
            max_health: 150,
            move_speed: 1.5,
            armor: 5,
            punch_damage: 25,
            punch_range: 2.0,
            punch_cooldown: 3.0,
            punch_duration: 0.1,
            slam_radius: 2.5,
            slam_damage: 30,
            slam_cooldown: 4.0,
            slam_windup: 1.2,
            slam_trigger_factor: 1.2,
            slam_duration: 0.1,
            recover_duration: 0.3,
            death_duration: 0.5,
            drops: DropTable::default(),
        }
    }
}

// ============================================================================
// Roster
// ============================================================================

/// All enemy tuning, loaded once at startup.
/// Access via `Res<EnemyRoster>` in systems.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRoster {
    pub status_effects: StatusTuning,
    pub lost_target: LostTargetTuning,
    /// Allowed upward drift of current speed before it is snapped back
    pub speed_drift_tolerance: f32,
    pub grunt: GruntConfig,
    pub anukus: AnukusConfig,
    pub bob: BobConfig,
    pub goblin: GoblinConfig,
    pub beholder: BeholderConfig,
    pub fire_worm: FireWormConfig,
    pub golem: GolemConfig,
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self {
            status_effects: StatusTuning::default(),
            lost_target: LostTargetTuning::default(),
            speed_drift_tolerance: 0.1,
            grunt: GruntConfig::default(),
            anukus: AnukusConfig::default(),
            bob: BobConfig::default(),
            goblin: GoblinConfig::default(),
            beholder: BeholderConfig::default(),
            fire_worm: FireWormConfig::default(),
            golem: GolemConfig::default(),
        }
    }
}

impl EnemyRoster {
    /// Load and validate a roster file.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let roster: EnemyRoster = ron::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

        roster.validate()?;
        Ok(roster)
    }

    /// Generic stats for one variant.
    pub fn profile(&self, kind: EnemyKind) -> EnemyProfile {
        match kind {
            EnemyKind::Grunt => EnemyProfile {
                name: kind.name().to_string(),
                max_health: self.grunt.max_health,
                move_speed: self.grunt.move_speed,
                dash_speed: None,
                death_duration: self.grunt.death_duration,
                is_boss: false,
                phase_two: None,
                drops: self.grunt.drops.clone(),
            },
            EnemyKind::Anukus => EnemyProfile {
                name: kind.name().to_string(),
                max_health: self.anukus.max_health,
                move_speed: self.anukus.move_speed,
                dash_speed: None,
                death_duration: self.anukus.death_duration,
                is_boss: true,
                phase_two: Some(PhaseTwoProfile {
                    health_threshold: self.anukus.phase_two.health_threshold,
                    move_speed: self.anukus.phase_two.move_speed,
                    dash_speed: None,
                }),
                drops: self.anukus.drops.clone(),
            },
            EnemyKind::Bob => EnemyProfile {
                name: kind.name().to_string(),
                max_health: self.bob.max_health,
                move_speed: self.bob.move_speed,
                dash_speed: Some(self.bob.dash_speed),
                death_duration: self.bob.death_duration,
                is_boss: true,
                phase_two: Some(PhaseTwoProfile {
                    health_threshold: self.bob.phase_two.health_threshold,
                    // Bob keeps his walking speed; only the dash gets faster.
                    move_speed: self.bob.move_speed,
                    dash_speed: Some(self.bob.phase_two.dash_speed),
                }),
                drops: self.bob.drops.clone(),
            },
            EnemyKind::Goblin => EnemyProfile {
                name: kind.name().to_string(),
                max_health: self.goblin.max_health,
                move_speed: self.goblin.move_speed,
                dash_speed: Some(self.goblin.dash_speed),
                death_duration: self.goblin.death_duration,
                is_boss: false,
                phase_two: None,
                drops: self.goblin.drops.clone(),
            },
            EnemyKind::Beholder => EnemyProfile {
                name: kind.name().to_string(),
                max_health: self.beholder.max_health,
                move_speed: self.beholder.move_speed,
                dash_speed: None,
                death_duration: self.beholder.death_duration,
                is_boss: false,
                phase_two: None,
                drops: self.beholder.drops.clone(),
            },
            EnemyKind::FireWorm => EnemyProfile {
                name: kind.name().to_string(),
                max_health: self.fire_worm.max_health,
                move_speed: self.fire_worm.move_speed,
                dash_speed: None,
                death_duration: self.fire_worm.death_duration,
                is_boss: false,
                phase_two: None,
                drops: self.fire_worm.drops.clone(),
            },
            EnemyKind::Golem => EnemyProfile {
                name: kind.name().to_string(),
                max_health: self.golem.max_health,
                move_speed: self.golem.move_speed,
                dash_speed: None,
                death_duration: self.golem.death_duration,
                is_boss: false,
                phase_two: None,
                drops: self.golem.drops.clone(),
            },
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        self.status_effects.validate()?;
        if self.speed_drift_tolerance < 0.0 {
            return Err(format!(
                "speed_drift_tolerance must not be negative, got {}",
                self.speed_drift_tolerance
            ));
        }
        for kind in EnemyKind::ALL {
            let profile = self.profile(kind);
            if profile.max_health <= 0 {
                return Err(format!("{}: max_health must be positive, got {}", kind.name(), profile.max_health));
            }
            if profile.move_speed <= 0.0 {
                return Err(format!("{}: move_speed must be positive, got {}", kind.name(), profile.move_speed));
            }
            if profile.death_duration < 0.0 {
                return Err(format!("{}: death_duration must not be negative", kind.name()));
            }
            if let Some(phase_two) = profile.phase_two {
                if !(phase_two.health_threshold > 0.0 && phase_two.health_threshold < 1.0) {
                    return Err(format!(
                        "{}: phase two health_threshold must be in (0, 1), got {}",
                        kind.name(),
                        phase_two.health_threshold
                    ));
                }
            }
        }
        if self.bob.min_distance > self.bob.max_distance {
            return Err("Bob: min_distance must not exceed max_distance".to_string());
        }
        if self.fire_worm.min_distance > self.fire_worm.keep_distance {
            return Err("FireWorm: min_distance must not exceed keep_distance".to_string());
        }
        Ok(())
    }
}

/// Bevy plugin that inserts the [`EnemyRoster`] resource.
///
/// With no explicit path the default file is used when present, otherwise the
/// built-in values. An explicit path that fails to load is fatal.
#[derive(Default)]
pub struct EnemyRosterPlugin {
    pub path: Option<PathBuf>,
}

impl Plugin for EnemyRosterPlugin {
    fn build(&self, app: &mut App) {
        let roster = match &self.path {
            Some(path) => match EnemyRoster::load_from_file(path) {
                Ok(roster) => roster,
                Err(e) => panic!("Failed to load enemy roster: {}", e),
            },
            None => load_default_roster(),
        };
        app.insert_resource(roster);
    }
}

/// Roster from [`DEFAULT_ROSTER_PATH`], or built-in defaults if absent.
pub fn load_default_roster() -> EnemyRoster {
    let path = Path::new(DEFAULT_ROSTER_PATH);
    if !path.exists() {
        info!("No {} found, using built-in enemy tuning", DEFAULT_ROSTER_PATH);
        return EnemyRoster::default();
    }
    match EnemyRoster::load_from_file(path) {
        Ok(roster) => {
            info!("Loaded enemy roster from {}", DEFAULT_ROSTER_PATH);
            roster
        }
        Err(e) => {
            warn!("{}; falling back to built-in enemy tuning", e);
            EnemyRoster::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_is_valid() {
        assert!(EnemyRoster::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let roster: EnemyRoster = ron::from_str("(golem: (armor: 8))").unwrap();
        assert_eq!(roster.golem.armor, 8);
        assert_eq!(roster.golem.max_health, 150, "Unnamed fields keep their defaults");
        assert_eq!(roster.anukus.sword_damage, 25);
    }

    #[test]
    fn test_validate_rejects_zero_health() {
        let mut roster = EnemyRoster::default();
        roster.goblin.max_health = 0;
        let err = roster.validate().unwrap_err();
        assert!(err.contains("Goblin"), "Error should name the variant: {}", err);
    }

    #[test]
    fn test_validate_rejects_bad_phase_threshold() {
        let mut roster = EnemyRoster::default();
        roster.anukus.phase_two.health_threshold = 1.5;
        assert!(roster.validate().is_err());
    }

    #[test]
    fn test_bob_phase_two_keeps_walk_speed() {
        let profile = EnemyRoster::default().profile(EnemyKind::Bob);
        let phase_two = profile.phase_two.unwrap();
        assert_eq!(phase_two.move_speed, profile.move_speed);
        assert_eq!(phase_two.dash_speed, Some(85.0));
    }

    #[test]
    fn test_shipped_roster_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_ROSTER_PATH);
        let roster = EnemyRoster::load_from_file(&path).expect("shipped roster must load");
        assert_eq!(roster.anukus.phase_two.health_threshold, 0.4);
    }

    #[test]
    fn test_plugin_inserts_roster_from_explicit_path() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_ROSTER_PATH);
        let mut app = App::new();
        app.add_plugins(EnemyRosterPlugin { path: Some(path) });
        let roster = app.world().resource::<EnemyRoster>();
        assert_eq!(roster.anukus.drops.entries.len(), 2, "Roster should come from the shipped file");
        assert_eq!(roster.grunt.max_health, 50);
    }
}
