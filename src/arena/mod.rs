//! Arena
//!
//! The collaborators around the enemies: spawning, walking, the player they
//! hunt, projectiles in flight, and the death consumers (spawner registry,
//! loot, boss victory).

use bevy::prelude::*;

pub mod loot;
pub mod navigation;
pub mod player;
pub mod projectiles;
pub mod rng;
pub mod spawner;
pub mod victory;

use crate::combat::systems::{
    activate_spawned_enemies, drive_enemies, process_player_damage, CombatSystemPhase,
};

/// Plugin for the arena collaborators. Add after [`crate::combat::CombatPlugin`].
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<spawner::SpawnEnemyEvent>()
            .init_resource::<rng::GameRng>()
            .init_resource::<spawner::SpawnRegistry>()
            .init_resource::<victory::BossArena>()
            .init_resource::<loot::LootLedger>()
            .add_systems(
                Update,
                spawner::spawn_requested_enemies
                    .in_set(CombatSystemPhase::Lifecycle)
                    .before(activate_spawned_enemies),
            )
            .add_systems(
                Update,
                (
                    player::player_auto_attack,
                    navigation::follow_paths,
                    projectiles::move_projectiles,
                )
                    .chain()
                    .in_set(CombatSystemPhase::Behavior)
                    .after(drive_enemies),
            )
            .add_systems(
                Update,
                projectiles::process_projectile_hits
                    .in_set(CombatSystemPhase::Resolution)
                    .before(process_player_damage),
            )
            .add_systems(
                Update,
                (
                    spawner::track_enemy_deaths,
                    victory::track_boss_deaths,
                    loot::drop_loot_on_death,
                    victory::declare_victory,
                )
                    .chain()
                    .in_set(CombatSystemPhase::Bookkeeping),
            );
    }
}
