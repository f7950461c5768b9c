//! Combat systems
//!
//! ECS systems that drive the enemy core: activation, per-tick behavior,
//! incoming damage and enemy attacks on the player. Cues pushed by the core
//! are republished as events and combat log lines by [`CueWriters`].

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::events::*;
use super::log::{CombatLog, CombatLogEventType};
use crate::arena::navigation::PathFollower;
use crate::arena::player::{current_target, CombatTarget};
use crate::arena::projectiles::spawn_projectile;
use crate::arena::rng::GameRng;
use crate::enemy::behavior::{AttackIntent, MovementIntent};
use crate::enemy::cues::{CombatCue, CueBuffer};
use crate::enemy::damage::{AppliedDamage, DamageRequest};
use crate::enemy::status_effects::StatusKind;
use crate::enemy::{Enemy, Lifecycle, TickInput};

/// Label used as the damage source for burn ticks.
pub const BURN_SOURCE: &str = "Burn";

/// System set labels for combat system ordering.
///
/// Use these to ensure proper ordering when adding custom systems that
/// interact with combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSystemPhase {
    /// Phase 1: Encounter clock, enemy activation
    Lifecycle,
    /// Phase 2: Enemy behavior, movement, player weapon, projectiles
    Behavior,
    /// Phase 3: Damage on enemies and on the player
    Resolution,
    /// Phase 4: Death consumers (spawner, loot, arena), encounter end
    Bookkeeping,
}

/// Configures the ordering between combat system phases.
///
/// Call this once during app setup before adding combat systems.
pub fn configure_combat_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatSystemPhase::Lifecycle,
            CombatSystemPhase::Behavior,
            CombatSystemPhase::Resolution,
            CombatSystemPhase::Bookkeeping,
        )
            .chain(),
    );
}

/// Adds the enemy simulation systems to the app.
///
/// # Example
/// ```ignore
/// add_core_combat_systems(&mut app, || true);
/// ```
pub fn add_core_combat_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(
        Update,
        (advance_combat_clock, activate_spawned_enemies)
            .chain()
            .in_set(CombatSystemPhase::Lifecycle)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        drive_enemies
            .in_set(CombatSystemPhase::Behavior)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (process_damage_events, process_player_damage)
            .chain()
            .in_set(CombatSystemPhase::Resolution)
            .run_if(run_condition),
    );
}

// ============================================================================
// Cue publishing
// ============================================================================

/// Everything needed to turn core cues into events and log lines.
#[derive(SystemParam)]
pub struct CueWriters<'w> {
    state_entered: EventWriter<'w, StateEnteredEvent>,
    hits: EventWriter<'w, EnemyHitEvent>,
    status: EventWriter<'w, StatusEffectEvent>,
    phases: EventWriter<'w, PhaseChangedEvent>,
    deaths: EventWriter<'w, EnemyDeathEvent>,
    destroyed: EventWriter<'w, EnemyDestroyedEvent>,
    combat_log: ResMut<'w, CombatLog>,
}

impl CueWriters<'_> {
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.combat_log.log(event_type, message);
    }

    /// Publish a batch of cues produced by one call into `enemy`.
    /// `damage_source` names whoever dealt any `Hit` in the batch.
    pub fn publish(&mut self, entity: Entity, enemy: &Enemy, damage_source: &str, cues: &CueBuffer) {
        let name = enemy.name();
        for cue in cues.iter().copied() {
            match cue {
                CombatCue::StateEntered { state, facing } => {
                    self.state_entered.send(StateEnteredEvent { entity, state, facing });
                    self.combat_log.log(
                        CombatLogEventType::StateChange,
                        format!("{} enters {}", name, state.name()),
                    );
                }
                CombatCue::Hit {
                    category,
                    amount,
                    health_after,
                } => {
                    self.hits.send(EnemyHitEvent {
                        entity,
                        category,
                        amount,
                        health_after,
                    });
                    self.combat_log.log_damage(
                        damage_source.to_string(),
                        name.to_string(),
                        category.name().to_string(),
                        amount,
                        health_after == 0,
                        format!(
                            "{} hits {} for {} {} damage ({} HP left)",
                            damage_source,
                            name,
                            amount,
                            category.name(),
                            health_after
                        ),
                    );
                }
                CombatCue::BurnTick {
                    amount,
                    ticks_remaining,
                } => {
                    debug!("{} burns for {} ({} ticks left)", name, amount, ticks_remaining);
                    self.status.send(StatusEffectEvent {
                        entity,
                        kind: StatusKind::Burn,
                        change: StatusChange::Ticked {
                            amount,
                            ticks_remaining,
                        },
                    });
                }
                CombatCue::StatusApplied { kind, refreshed } => {
                    self.status.send(StatusEffectEvent {
                        entity,
                        kind,
                        change: StatusChange::Applied { refreshed },
                    });
                    let condition = match kind {
                        StatusKind::Burn => "burning",
                        StatusKind::Freeze => "frozen",
                    };
                    let suffix = if refreshed { " (refreshed)" } else { "" };
                    self.combat_log.log(
                        CombatLogEventType::StatusEffect,
                        format!("{} is {}{}", name, condition, suffix),
                    );
                }
                CombatCue::StatusExpired { kind } => {
                    self.status.send(StatusEffectEvent {
                        entity,
                        kind,
                        change: StatusChange::Expired,
                    });
                    self.combat_log.log(
                        CombatLogEventType::StatusEffect,
                        format!("{}'s {} wore off", name, kind.name()),
                    );
                }
                CombatCue::StatusCancelled { kind } => {
                    self.status.send(StatusEffectEvent {
                        entity,
                        kind,
                        change: StatusChange::Cancelled,
                    });
                    self.combat_log.log(
                        CombatLogEventType::StatusEffect,
                        format!("{}'s {} was cancelled", name, kind.name()),
                    );
                }
                CombatCue::PhaseChanged { phase, move_speed } => {
                    info!("{} enters phase {}", name, phase.number());
                    self.phases.send(PhaseChangedEvent {
                        entity,
                        phase,
                        move_speed,
                    });
                    self.combat_log.log(
                        CombatLogEventType::PhaseChange,
                        format!("{} enters phase {} (move speed {:.1})", name, phase.number(), move_speed),
                    );
                }
                CombatCue::SpeedCorrected { from, to } => {
                    warn!("{} move speed drifted to {:.2}, reset to {:.2}", name, from, to);
                }
                CombatCue::Died => {
                    info!("{} died", name);
                    self.deaths.send(EnemyDeathEvent {
                        entity,
                        name: name.to_string(),
                        kind: enemy.kind(),
                        is_boss: enemy.is_boss(),
                    });
                    self.combat_log.log_death(
                        name.to_string(),
                        Some(damage_source.to_string()),
                        format!("{} has been slain by {}", name, damage_source),
                    );
                }
                CombatCue::Destroyed => {
                    debug!("{} removed", name);
                    self.destroyed.send(EnemyDestroyedEvent {
                        entity,
                        name: name.to_string(),
                    });
                }
            }
        }
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Keep the combat log timestamps on encounter time.
pub fn advance_combat_clock(time: Res<Time>, mut combat_log: ResMut<CombatLog>) {
    combat_log.match_time = time.elapsed_secs();
}

/// Spawned → Active for every enemy that arrived since the last tick.
pub fn activate_spawned_enemies(mut enemies: Query<&mut Enemy>) {
    for mut enemy in enemies.iter_mut() {
        if enemy.lifecycle() == Lifecycle::Spawned && enemy.activate() {
            debug!("{} activated", enemy.name());
        }
    }
}

/// Tick every enemy once and carry out what it asked for.
pub fn drive_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut enemies: Query<(Entity, &mut Enemy, &mut Transform, &mut PathFollower)>,
    targets: Query<(&Transform, &CombatTarget), Without<Enemy>>,
    mut player_hits: EventWriter<PlayerDamagedEvent>,
    mut writers: CueWriters,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();
    let target = current_target(&targets);

    for (entity, mut enemy, mut transform, mut follower) in enemies.iter_mut() {
        let mut cues = CueBuffer::new();
        let input = TickInput {
            now,
            dt,
            position: transform.translation.truncate(),
            target,
        };
        let tick = enemy.tick(&input, &mut cues);
        writers.publish(entity, &enemy, BURN_SOURCE, &cues);

        if tick.destroyed {
            commands.entity(entity).despawn();
            continue;
        }

        apply_movement(tick.movement, dt, &mut transform, &mut follower);

        match tick.attack {
            AttackIntent::None => {}
            AttackIntent::Strike { damage } => {
                player_hits.send(PlayerDamagedEvent {
                    source: entity,
                    source_name: enemy.name().to_string(),
                    amount: damage,
                    verb: "strikes",
                });
            }
            AttackIntent::Launch(launch) => {
                spawn_projectile(&mut commands, &mut rng, entity, enemy.name(), &launch);
                writers.log(
                    CombatLogEventType::Attack,
                    format!("{} launches a projectile", enemy.name()),
                );
            }
        }
    }
}

fn apply_movement(movement: MovementIntent, dt: f32, transform: &mut Transform, follower: &mut PathFollower) {
    match movement {
        MovementIntent::Hold => follower.stop(),
        MovementIntent::Follow { destination, speed } => {
            follower.set_speed(speed);
            follower.set_destination(destination);
        }
        MovementIntent::Kinematic { velocity } => {
            follower.stop();
            transform.translation += (velocity * dt).extend(0.0);
        }
        MovementIntent::Place { position } => {
            follower.stop();
            transform.translation.x = position.x;
            transform.translation.y = position.y;
        }
    }
}

/// Apply [`DamageEvent`]s through each enemy's damage pipeline.
pub fn process_damage_events(
    time: Res<Time>,
    mut damage_events: EventReader<DamageEvent>,
    mut enemies: Query<&mut Enemy>,
    mut writers: CueWriters,
) {
    let now = time.elapsed_secs();
    for event in damage_events.read() {
        let Ok(mut enemy) = enemies.get_mut(event.target) else {
            continue;
        };
        let mut cues = CueBuffer::new();
        let applied = enemy.take_damage(now, DamageRequest::new(event.amount, event.category), &mut cues);
        if let AppliedDamage::Ignored(reason) = applied {
            debug!("{} ignored a hit from {}: {:?}", enemy.name(), event.source, reason);
        }
        writers.publish(event.target, &enemy, &event.source, &cues);
    }
}

/// Apply enemy attacks to the player.
pub fn process_player_damage(
    mut hits: EventReader<PlayerDamagedEvent>,
    mut targets: Query<&mut CombatTarget>,
    mut combat_log: ResMut<CombatLog>,
) {
    for hit in hits.read() {
        for mut target in targets.iter_mut() {
            if !target.is_alive() {
                continue;
            }
            let removed = target.health.apply_damage(hit.amount);
            combat_log.log(
                CombatLogEventType::Attack,
                format!(
                    "{} {} Player for {} ({} HP left)",
                    hit.source_name,
                    hit.verb,
                    removed,
                    target.health.current()
                ),
            );
            if !target.is_alive() {
                info!("Player was killed by {}", hit.source_name);
                combat_log.log_death(
                    "Player".to_string(),
                    Some(hit.source_name.clone()),
                    format!("Player has been slain by {}", hit.source_name),
                );
            }
        }
    }
}
