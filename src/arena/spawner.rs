//! Enemy spawning and the spawner registry.
//!
//! Anything that wants an enemy in the arena sends a [`SpawnEnemyEvent`].
//! The registry keeps one record per spawned enemy and is told about deaths
//! through [`EnemyDeathEvent`], so it always knows how many are still alive.

use bevy::prelude::*;

use super::loot::CoinDropper;
use super::navigation::PathFollower;
use super::rng::GameRng;
use super::victory::BossArena;
use crate::combat::events::EnemyDeathEvent;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::enemy::roster::EnemyRoster;
use crate::enemy::{Enemy, EnemyKind};

#[derive(Event, Debug, Clone)]
pub struct SpawnEnemyEvent {
    pub kind: EnemyKind,
    pub position: Vec2,
}

/// What the registry remembers about one spawned enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRecord {
    pub entity: Entity,
    pub name: String,
    pub kind: EnemyKind,
    pub max_health: i32,
    pub is_boss: bool,
    pub spawned_at: f32,
    pub died_at: Option<f32>,
}

#[derive(Resource, Debug, Default)]
pub struct SpawnRegistry {
    pub records: Vec<SpawnRecord>,
    pub killed_total: u32,
}

impl SpawnRegistry {
    pub fn spawned_total(&self) -> u32 {
        self.records.len() as u32
    }

    /// Enemies spawned and not yet dead.
    pub fn live(&self) -> u32 {
        self.spawned_total() - self.killed_total
    }

    pub fn record(&self, entity: Entity) -> Option<&SpawnRecord> {
        self.records.iter().find(|r| r.entity == entity)
    }

    /// Name for the next enemy of `kind`: the variant name, numbered from
    /// the second one on.
    pub fn next_name(&self, kind: EnemyKind) -> String {
        let existing = self.records.iter().filter(|r| r.kind == kind).count();
        if existing == 0 {
            kind.name().to_string()
        } else {
            format!("{} {}", kind.name(), existing + 1)
        }
    }

    pub fn register(&mut self, record: SpawnRecord) {
        self.records.push(record);
    }

    /// Record a death. Returns false for unknown or already-dead entities.
    pub fn mark_dead(&mut self, entity: Entity, now: f32) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.entity == entity) else {
            return false;
        };
        if record.died_at.is_some() {
            return false;
        }
        record.died_at = Some(now);
        self.killed_total += 1;
        true
    }
}

/// Turn spawn requests into enemy entities.
pub fn spawn_requested_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut requests: EventReader<SpawnEnemyEvent>,
    roster: Res<EnemyRoster>,
    mut rng: ResMut<GameRng>,
    mut registry: ResMut<SpawnRegistry>,
    mut arena: ResMut<BossArena>,
    mut combat_log: ResMut<CombatLog>,
) {
    let now = time.elapsed_secs();
    for request in requests.read() {
        let profile = roster.profile(request.kind);
        let name = registry.next_name(request.kind);
        let hover_seed = rng.random_f32();
        let enemy = Enemy::from_roster(request.kind, &roster, request.position, now, hover_seed).with_name(name.clone());

        let entity = commands
            .spawn((
                enemy,
                Transform::from_translation(request.position.extend(0.0)),
                PathFollower::default(),
                CoinDropper(profile.drops.clone()),
            ))
            .id();

        registry.register(SpawnRecord {
            entity,
            name: name.clone(),
            kind: request.kind,
            max_health: profile.max_health,
            is_boss: profile.is_boss,
            spawned_at: now,
            died_at: None,
        });
        if profile.is_boss {
            arena.register_boss();
        }

        info!("Spawned {} at ({:.1}, {:.1})", name, request.position.x, request.position.y);
        combat_log.log(
            CombatLogEventType::EncounterEvent,
            format!("{} spawned", name),
        );
    }
}

/// Death callback consumer: keep live/killed counts current.
pub fn track_enemy_deaths(time: Res<Time>, mut deaths: EventReader<EnemyDeathEvent>, mut registry: ResMut<SpawnRegistry>) {
    let now = time.elapsed_secs();
    for death in deaths.read() {
        if !registry.mark_dead(death.entity, now) {
            warn!("Death reported for unregistered or already dead {}", death.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entity: Entity, kind: EnemyKind) -> SpawnRecord {
        SpawnRecord {
            entity,
            name: kind.name().to_string(),
            kind,
            max_health: 50,
            is_boss: false,
            spawned_at: 0.0,
            died_at: None,
        }
    }

    #[test]
    fn test_registry_counts_live_enemies() {
        let mut registry = SpawnRegistry::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        registry.register(record(a, EnemyKind::Grunt));
        registry.register(record(b, EnemyKind::Goblin));
        assert_eq!(registry.live(), 2);

        assert!(registry.mark_dead(a, 3.0));
        assert!(!registry.mark_dead(a, 4.0), "A death is only counted once");
        assert_eq!(registry.live(), 1);
        assert_eq!(registry.record(a).and_then(|r| r.died_at), Some(3.0));
    }

    #[test]
    fn test_repeated_variants_are_numbered() {
        let mut registry = SpawnRegistry::default();
        assert_eq!(registry.next_name(EnemyKind::Goblin), "Goblin");
        registry.register(record(Entity::from_raw(1), EnemyKind::Goblin));
        assert_eq!(registry.next_name(EnemyKind::Goblin), "Goblin 2");
        assert_eq!(registry.next_name(EnemyKind::Golem), "Golem");
    }
}
