//! Combat system
//!
//! Bridges the enemy core into the ECS:
//! - Damage requests in, cues out as events
//! - Phase-ordered system sets
//! - Combat logging

use bevy::prelude::*;

pub mod events;
pub mod log;
pub mod systems;

use events::*;

/// Plugin for the combat system
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageEvent>()
            .add_event::<EnemyDeathEvent>()
            .add_event::<EnemyDestroyedEvent>()
            .add_event::<StateEnteredEvent>()
            .add_event::<EnemyHitEvent>()
            .add_event::<StatusEffectEvent>()
            .add_event::<PhaseChangedEvent>()
            .add_event::<PlayerDamagedEvent>()
            // Resources
            .init_resource::<log::CombatLog>();

        systems::configure_combat_system_ordering(app);
        systems::add_core_combat_systems(app, || true);
    }
}
