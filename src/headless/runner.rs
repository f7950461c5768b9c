//! Headless encounter execution
//!
//! Runs encounters without any graphical output on a fixed simulated clock,
//! suitable for automated testing and balance runs.

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::collections::HashMap;
use std::time::Duration;

use crate::arena::loot::LootLedger;
use crate::arena::player::{CombatTarget, PlayerWeapon};
use crate::arena::rng::GameRng;
use crate::arena::spawner::{SpawnEnemyEvent, SpawnRegistry};
use crate::arena::victory::{declare_victory, BossArena};
use crate::arena::ArenaPlugin;
use crate::combat::log::{CombatLog, CombatLogEventType, EncounterMetadata, EnemyMetadata};
use crate::combat::systems::CombatSystemPhase;
use crate::combat::CombatPlugin;
use crate::enemy::roster::EnemyRoster;
use crate::enemy::{Enemy, EnemyKind};

use super::config::EncounterConfig;

/// How an encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    /// Every boss fell and the victory delay elapsed
    Victory,
    /// Every enemy died in an encounter without bosses
    AllEnemiesDead,
    PlayerDefeated,
    TimedOut,
}

impl EncounterOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            EncounterOutcome::Victory => "Victory",
            EncounterOutcome::AllEnemiesDead => "AllEnemiesDead",
            EncounterOutcome::PlayerDefeated => "PlayerDefeated",
            EncounterOutcome::TimedOut => "TimedOut",
        }
    }

    pub fn player_won(&self) -> bool {
        matches!(self, EncounterOutcome::Victory | EncounterOutcome::AllEnemiesDead)
    }
}

/// Result of a completed headless encounter
///
/// This struct provides programmatic access to encounter results for testing and analysis.
#[derive(Debug, Clone)]
pub struct EncounterResult {
    pub outcome: EncounterOutcome,
    /// Encounter duration in simulated seconds
    pub elapsed_secs: f32,
    pub player_max_health: i32,
    pub player_final_health: i32,
    /// Per-enemy statistics, in spawn order
    pub enemies: Vec<EnemyResult>,
    pub coins_collected: u32,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

impl EncounterResult {
    pub fn enemy(&self, name: &str) -> Option<&EnemyResult> {
        self.enemies.iter().find(|e| e.name == name)
    }
}

/// Statistics for a single enemy after the encounter
#[derive(Debug, Clone)]
pub struct EnemyResult {
    pub name: String,
    pub kind: EnemyKind,
    pub max_health: i32,
    /// Health at encounter end (0 if dead)
    pub final_health: i32,
    pub survived: bool,
    /// Total damage taken, from the combat log
    pub damage_taken: i32,
    pub death_time: Option<f32>,
    /// Highest phase reached (1 for non-bosses)
    pub final_phase: u8,
}

/// Last observed state of an enemy. Enemies are despawned after their death
/// sequence, so results are built from these.
#[derive(Debug, Clone, Copy)]
struct EnemySnapshot {
    health: i32,
    phase: u8,
}

/// Resource to track headless encounter state
#[derive(Resource)]
pub struct EncounterState {
    pub max_duration: f32,
    pub elapsed_time: f32,
    pub output_path: Option<String>,
    pub random_seed: Option<u64>,
    pub complete: bool,
    /// Populated when the encounter completes
    pub result: Option<EncounterResult>,
    spawns: Vec<(EnemyKind, Vec2)>,
    player_position: Vec2,
    player_max_health: i32,
    snapshots: HashMap<Entity, EnemySnapshot>,
}

impl EncounterState {
    pub fn new(config: &EncounterConfig) -> Result<Self, String> {
        Ok(Self {
            max_duration: config.max_duration_secs,
            elapsed_time: 0.0,
            output_path: config.output_path.clone(),
            random_seed: config.random_seed,
            complete: false,
            result: None,
            spawns: config.spawns()?,
            player_position: Vec2::from(config.player.position),
            player_max_health: config.player.max_health,
            snapshots: HashMap::new(),
        })
    }
}

/// Plugin for headless encounter execution. Add after [`ArenaPlugin`].
pub struct EncounterPlugin {
    pub weapon: PlayerWeapon,
}

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(StartingWeapon(self.weapon.clone()))
            .add_systems(Startup, setup_encounter)
            .add_systems(
                Update,
                (snapshot_enemies, check_encounter_end)
                    .chain()
                    .in_set(CombatSystemPhase::Bookkeeping)
                    .after(declare_victory),
            );
    }
}

#[derive(Resource)]
struct StartingWeapon(PlayerWeapon);

/// Setup system: queue the enemy spawns and place the player.
fn setup_encounter(
    mut commands: Commands,
    state: Res<EncounterState>,
    weapon: Res<StartingWeapon>,
    mut spawn_requests: EventWriter<SpawnEnemyEvent>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::EncounterEvent,
        "Encounter started (headless mode)!".to_string(),
    );

    for (kind, position) in &state.spawns {
        spawn_requests.send(SpawnEnemyEvent {
            kind: *kind,
            position: *position,
        });
    }

    commands.spawn((
        Transform::from_translation(state.player_position.extend(0.0)),
        CombatTarget::new(state.player_max_health),
        weapon.0.clone(),
    ));

    info!(
        "Headless encounter setup complete: {} enemies vs player ({} HP)",
        state.spawns.len(),
        state.player_max_health
    );
}

fn snapshot_enemies(enemies: Query<(Entity, &Enemy)>, mut state: ResMut<EncounterState>) {
    for (entity, enemy) in enemies.iter() {
        state.snapshots.insert(
            entity,
            EnemySnapshot {
                health: enemy.health().current(),
                phase: enemy.phase().number(),
            },
        );
    }
}

/// Check whether the encounter has ended (player dead, enemies dead, boss
/// victory, or timeout).
fn check_encounter_end(
    time: Res<Time>,
    player: Query<&CombatTarget>,
    registry: Res<SpawnRegistry>,
    arena: Res<BossArena>,
    ledger: Res<LootLedger>,
    mut combat_log: ResMut<CombatLog>,
    mut state: ResMut<EncounterState>,
) {
    if state.complete {
        return;
    }
    state.elapsed_time = time.elapsed_secs();

    let player_health = player.iter().next().map(|p| p.health.current()).unwrap_or(0);
    let outcome = if player_health <= 0 {
        Some(EncounterOutcome::PlayerDefeated)
    } else if arena.is_victory() {
        Some(EncounterOutcome::Victory)
    } else if arena.bosses_registered == 0 && registry.spawned_total() > 0 && registry.live() == 0 {
        Some(EncounterOutcome::AllEnemiesDead)
    } else if state.elapsed_time >= state.max_duration {
        Some(EncounterOutcome::TimedOut)
    } else {
        None
    };

    let Some(outcome) = outcome else {
        return;
    };

    info!("Encounter ended after {:.1}s: {}", state.elapsed_time, outcome.name());
    combat_log.log(
        CombatLogEventType::EncounterEvent,
        format!("Encounter ended: {}", outcome.name()),
    );

    let result = build_encounter_result(outcome, player_health, &registry, &ledger, &combat_log, &state);
    save_encounter_log(&result, &combat_log, state.output_path.as_deref());
    state.result = Some(result);
    state.complete = true;
}

fn build_encounter_result(
    outcome: EncounterOutcome,
    player_health: i32,
    registry: &SpawnRegistry,
    ledger: &LootLedger,
    combat_log: &CombatLog,
    state: &EncounterState,
) -> EncounterResult {
    let enemies = registry
        .records
        .iter()
        .map(|record| {
            let snapshot = state.snapshots.get(&record.entity);
            let final_health = if record.died_at.is_some() {
                0
            } else {
                snapshot.map(|s| s.health).unwrap_or(record.max_health)
            };
            EnemyResult {
                name: record.name.clone(),
                kind: record.kind,
                max_health: record.max_health,
                final_health,
                survived: record.died_at.is_none(),
                damage_taken: combat_log.damage_taken_by(&record.name),
                death_time: record.died_at,
                final_phase: snapshot.map(|s| s.phase).unwrap_or(1),
            }
        })
        .collect();

    EncounterResult {
        outcome,
        elapsed_secs: state.elapsed_time,
        player_max_health: state.player_max_health,
        player_final_health: player_health.max(0),
        enemies,
        coins_collected: ledger.total(),
        random_seed: state.random_seed,
    }
}

/// Save the combat log to a file. Only runs when an output path was given.
fn save_encounter_log(result: &EncounterResult, combat_log: &CombatLog, output_path: Option<&str>) {
    let Some(path) = output_path else {
        return;
    };

    let metadata = EncounterMetadata {
        outcome: result.outcome.name().to_string(),
        duration_secs: result.elapsed_secs,
        random_seed: result.random_seed,
        player_final_health: result.player_final_health,
        coins_collected: result.coins_collected,
        enemies: result
            .enemies
            .iter()
            .map(|e| EnemyMetadata {
                name: e.name.clone(),
                kind: e.kind.name().to_string(),
                max_health: e.max_health,
                final_health: e.final_health,
                survived: e.survived,
                damage_taken: e.damage_taken,
                final_phase: e.final_phase,
            })
            .collect(),
    };

    match combat_log.save_to_file(&metadata, Some(path)) {
        Ok(filename) => info!("Combat log saved to: {}", filename),
        Err(e) => error!("Failed to save combat log: {}", e),
    }
}

/// Build a headless app for the encounter. Each `update()` advances the
/// simulation by one tick of `1 / tick_rate` seconds.
///
/// With `log_level` set, a [`LogPlugin`] is installed at that level.
pub fn build_encounter_app(
    config: &EncounterConfig,
    roster: EnemyRoster,
    log_level: Option<Level>,
) -> Result<App, String> {
    config.validate()?;
    roster.validate()?;

    let weapon = PlayerWeapon::new(
        config.weapon_rotation()?,
        config.player.damage,
        config.player.fire_interval,
        config.player.range,
    );

    let mut app = App::new();
    if let Some(level) = log_level {
        app.add_plugins(LogPlugin { level, ..default() });
    }

    let game_rng = match config.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };

    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            config.tick_duration_secs(),
        )))
        .insert_resource(game_rng)
        .insert_resource(roster)
        .insert_resource(EncounterState::new(config)?)
        .add_plugins(CombatPlugin)
        .add_plugins(ArenaPlugin)
        .add_plugins(EncounterPlugin { weapon });
    app.finish();
    app.cleanup();
    Ok(app)
}

/// Run a headless encounter to completion.
pub fn run_encounter(
    config: &EncounterConfig,
    roster: EnemyRoster,
    log_level: Option<Level>,
) -> Result<EncounterResult, String> {
    let mut app = build_encounter_app(config, roster, log_level)?;
    info!(
        "Starting headless encounter: {} enemies, max duration {:.0}s, {} ticks/s",
        config.enemies.len(),
        config.max_duration_secs,
        config.tick_rate
    );

    // One extra second of ticks past the timeout as a hard stop.
    let max_ticks = ((config.max_duration_secs + 1.0) * config.tick_rate as f32).ceil() as u64 + 1;
    for _ in 0..max_ticks {
        app.update();
        if app.world().resource::<EncounterState>().complete {
            break;
        }
    }

    app.world_mut()
        .resource_mut::<EncounterState>()
        .result
        .take()
        .ok_or_else(|| format!("Encounter did not finish within {} ticks", max_ticks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_names() {
        assert!(EncounterOutcome::Victory.player_won());
        assert!(EncounterOutcome::AllEnemiesDead.player_won());
        assert!(!EncounterOutcome::TimedOut.player_won());
        assert_eq!(EncounterOutcome::PlayerDefeated.name(), "PlayerDefeated");
    }
}
