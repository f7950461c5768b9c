//! Fire-and-forget notifications produced by the core.
//!
//! The core never calls out to presentation, logging or the spawner directly.
//! It pushes cues into a buffer that the ECS layer turns into events and
//! combat log lines after each call.

use bevy::math::Vec2;
use smallvec::SmallVec;

use super::behavior::{BehaviorState, BossPhase};
use super::damage::DamageCategory;
use super::status_effects::StatusKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatCue {
    StateEntered { state: BehaviorState, facing: Vec2 },
    Hit { category: DamageCategory, amount: i32, health_after: i32 },
    BurnTick { amount: i32, ticks_remaining: u32 },
    StatusApplied { kind: StatusKind, refreshed: bool },
    StatusExpired { kind: StatusKind },
    StatusCancelled { kind: StatusKind },
    PhaseChanged { phase: BossPhase, move_speed: f32 },
    /// Movement speed drifted above its expected value and was snapped back
    SpeedCorrected { from: f32, to: f32 },
    /// Death notification, pushed exactly once per enemy
    Died,
    Destroyed,
}

pub type CueBuffer = SmallVec<[CombatCue; 8]>;
