//! Combat events
//!
//! Everything the enemy core reports through cues is republished here as a
//! Bevy event, so spawners, loot, the arena and the combat log can react
//! without knowing about each other.

use bevy::prelude::*;

use crate::enemy::behavior::{BehaviorState, BossPhase};
use crate::enemy::damage::DamageCategory;
use crate::enemy::status_effects::StatusKind;
use crate::enemy::EnemyKind;

/// A hit aimed at an enemy. The damage receiver contract: anything that
/// wants to hurt an enemy sends one of these.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Enemy receiving the damage
    pub target: Entity,
    /// Amount before variant mitigation
    pub amount: i32,
    pub category: DamageCategory,
    /// Display name of whatever dealt the hit
    pub source: String,
}

/// Fired once, when an enemy enters its death sequence.
#[derive(Event, Debug, Clone)]
pub struct EnemyDeathEvent {
    pub entity: Entity,
    pub name: String,
    pub kind: EnemyKind,
    pub is_boss: bool,
}

/// Fired when the death sequence has finished and the entity is removed.
#[derive(Event, Debug, Clone)]
pub struct EnemyDestroyedEvent {
    pub entity: Entity,
    pub name: String,
}

/// Fired whenever the behavior driver enters a state, including a
/// restarted swing of a multi-hit commit.
#[derive(Event, Debug, Clone)]
pub struct StateEnteredEvent {
    pub entity: Entity,
    pub state: BehaviorState,
    pub facing: Vec2,
}

/// Damage that actually landed on an enemy.
#[derive(Event, Debug, Clone)]
pub struct EnemyHitEvent {
    pub entity: Entity,
    pub category: DamageCategory,
    /// Amount after mitigation
    pub amount: i32,
    pub health_after: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusChange {
    Applied { refreshed: bool },
    Ticked { amount: i32, ticks_remaining: u32 },
    Expired,
    /// Removed early, by death
    Cancelled,
}

#[derive(Event, Debug, Clone)]
pub struct StatusEffectEvent {
    pub entity: Entity,
    pub kind: StatusKind,
    pub change: StatusChange,
}

#[derive(Event, Debug, Clone)]
pub struct PhaseChangedEvent {
    pub entity: Entity,
    pub phase: BossPhase,
    /// Effective movement speed right after the change
    pub move_speed: f32,
}

/// An enemy attack that connected with the player.
#[derive(Event, Debug, Clone)]
pub struct PlayerDamagedEvent {
    pub source: Entity,
    pub source_name: String,
    pub amount: i32,
    /// "strikes", "shoots", ...
    pub verb: &'static str,
}
