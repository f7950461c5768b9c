//! Integration tests for the enemy core
//!
//! These tests drive a bare [`Enemy`] tick by tick, without an ECS world,
//! and verify that:
//! - Every variant reaches a committed attack against a reachable target
//! - A commit lands at most one hit (per swing for multi-swing bosses)
//! - Lost targets are waited for, walked home from, and reacquired
//! - The Fire damage scenario produces the expected health and phase changes

use bevy::math::Vec2;

use rageborn::enemy::behavior::{AttackIntent, BehaviorState, BossPhase, CommitKind, MovementIntent};
use rageborn::enemy::cues::{CombatCue, CueBuffer};
use rageborn::enemy::damage::{DamageCategory, DamageRequest};
use rageborn::enemy::roster::EnemyRoster;
use rageborn::enemy::{Enemy, EnemyKind, TickInput};

const DT: f32 = 1.0 / 60.0;

/// Drives one enemy against a stationary target and applies its movement
/// intents the way the path follower and kinematic mover would.
struct Harness {
    enemy: Enemy,
    position: Vec2,
    target: Option<Vec2>,
    tick: u32,
    states: Vec<BehaviorState>,
    strikes: Vec<i32>,
    launches: u32,
    last_movement: MovementIntent,
}

impl Harness {
    fn new(kind: EnemyKind, target: Option<Vec2>) -> Self {
        let mut enemy = Enemy::from_roster(kind, &EnemyRoster::default(), Vec2::ZERO, 0.0, 0.0);
        enemy.activate();
        Self {
            enemy,
            position: Vec2::ZERO,
            target,
            tick: 0,
            states: Vec::new(),
            strikes: Vec::new(),
            launches: 0,
            last_movement: MovementIntent::Hold,
        }
    }

    fn now(&self) -> f32 {
        self.tick as f32 * DT
    }

    fn step(&mut self) {
        let mut cues = CueBuffer::new();
        let input = TickInput {
            now: self.now(),
            dt: DT,
            position: self.position,
            target: self.target,
        };
        let output = self.enemy.tick(&input, &mut cues);

        match output.attack {
            AttackIntent::Strike { damage } => self.strikes.push(damage),
            AttackIntent::Launch(_) => self.launches += 1,
            AttackIntent::None => {}
        }
        for cue in &cues {
            if let CombatCue::StateEntered { state, .. } = cue {
                self.states.push(*state);
            }
        }

        match output.movement {
            MovementIntent::Hold => {}
            MovementIntent::Follow { destination, speed } => {
                let delta = destination - self.position;
                let max_step = speed * DT;
                if delta.length() <= max_step {
                    self.position = destination;
                } else {
                    self.position += delta.normalize() * max_step;
                }
            }
            MovementIntent::Kinematic { velocity } => self.position += velocity * DT,
            MovementIntent::Place { position } => self.position = position,
        }
        self.last_movement = output.movement;
        self.tick += 1;
    }

    fn run_for(&mut self, seconds: f32) {
        let ticks = (seconds / DT).round() as u32;
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Step until `done` holds or `seconds` run out. Returns whether it held.
    fn run_until(&mut self, seconds: f32, done: impl Fn(&Harness) -> bool) -> bool {
        let ticks = (seconds / DT).round() as u32;
        for _ in 0..ticks {
            self.step();
            if done(self) {
                return true;
            }
        }
        false
    }

    fn state(&self) -> BehaviorState {
        self.enemy.behavior().state()
    }

    fn entered(&self, state: BehaviorState) -> bool {
        self.states.contains(&state)
    }
}

// =============================================================================
// Liveness
// =============================================================================

#[test]
fn test_every_variant_reaches_a_commit() {
    let cases = [
        (EnemyKind::Grunt, Vec2::new(4.0, 0.0)),
        (EnemyKind::Anukus, Vec2::new(0.0, 4.0)),
        (EnemyKind::Bob, Vec2::new(10.0, 0.0)),
        (EnemyKind::Goblin, Vec2::new(4.0, 0.0)),
        (EnemyKind::Beholder, Vec2::new(4.0, 0.0)),
        (EnemyKind::FireWorm, Vec2::new(6.0, 0.0)),
        (EnemyKind::Golem, Vec2::new(2.0, 0.0)),
    ];

    for (kind, target) in cases {
        let mut harness = Harness::new(kind, Some(target));
        let committed = harness.run_until(10.0, |h| h.state().is_commit());
        assert!(committed, "{} never committed an attack; states: {:?}", kind.name(), harness.states);
        assert_eq!(harness.states.first(), Some(&BehaviorState::Approach), "{} starts by approaching", kind.name());
    }
}

#[test]
fn test_every_variant_recovers_and_approaches_again() {
    for kind in EnemyKind::ALL {
        let target = match kind {
            EnemyKind::Bob => Vec2::new(10.0, 0.0),
            EnemyKind::Anukus => Vec2::new(0.0, 1.0),
            _ => Vec2::new(1.0, 0.0),
        };
        let mut harness = Harness::new(kind, Some(target));
        let looped = harness.run_until(15.0, |h| {
            h.entered(BehaviorState::Recover) && h.states.iter().filter(|s| **s == BehaviorState::Approach).count() >= 2
        });
        assert!(looped, "{} never completed a full attack loop; states: {:?}", kind.name(), harness.states);
    }
}

// =============================================================================
// One hit per commit
// =============================================================================

#[test]
fn test_grunt_lands_one_hit_per_commit() {
    let mut harness = Harness::new(EnemyKind::Grunt, Some(Vec2::new(1.0, 0.0)));
    harness.run_for(3.5);

    let commits = harness
        .states
        .iter()
        .filter(|s| **s == BehaviorState::Commit(CommitKind::Attack))
        .count();
    assert!(commits >= 2, "Grunt should attack at least twice in 3.5s, got {}", commits);
    assert_eq!(harness.strikes.len(), commits, "Exactly one strike per commit");
    assert!(harness.strikes.iter().all(|d| *d == 10), "Grunt hits for 10");
}

#[test]
fn test_bob_dash_through_target_hits_once() {
    let mut harness = Harness::new(EnemyKind::Bob, Some(Vec2::new(10.0, 0.0)));
    let recovered = harness.run_until(5.0, |h| h.state() == BehaviorState::Recover);

    assert!(recovered, "Dash should end; states: {:?}", harness.states);
    assert_eq!(harness.strikes, vec![20], "A dash passing through the target hits once");
    assert!(harness.position.x > 10.0, "Bob dashes straight through the target");
}

#[test]
fn test_beholder_fires_one_projectile_per_commit() {
    let mut harness = Harness::new(EnemyKind::Beholder, Some(Vec2::new(4.0, 0.0)));
    let recovered = harness.run_until(2.0, |h| h.state() == BehaviorState::Recover);

    assert!(recovered);
    assert_eq!(harness.launches, 1);
    assert!(harness.strikes.is_empty(), "Beholder only damages through projectiles");
}

#[test]
fn test_fire_worm_burst_fires_three_shots() {
    let mut harness = Harness::new(EnemyKind::FireWorm, Some(Vec2::new(6.0, 0.0)));
    let recovered = harness.run_until(3.0, |h| h.state() == BehaviorState::Recover);

    assert!(recovered);
    assert_eq!(harness.launches, 3, "One burst is three fireballs");
}

#[test]
fn test_anukus_swings_once_in_phase_one() {
    let mut harness = Harness::new(EnemyKind::Anukus, Some(Vec2::new(0.0, 1.0)));
    let recovered = harness.run_until(3.0, |h| h.state() == BehaviorState::Recover);

    assert!(recovered, "States: {:?}", harness.states);
    assert_eq!(harness.strikes, vec![25]);
}

#[test]
fn test_anukus_swings_twice_in_phase_two() {
    let mut harness = Harness::new(EnemyKind::Anukus, Some(Vec2::new(0.0, 1.0)));
    let mut cues = CueBuffer::new();
    harness
        .enemy
        .take_damage(0.0, DamageRequest::new(60, DamageCategory::Physical), &mut cues);
    assert_eq!(harness.enemy.phase(), BossPhase::Two, "40/100 is at the phase-two threshold");

    let recovered = harness.run_until(3.0, |h| h.state() == BehaviorState::Recover);
    assert!(recovered, "States: {:?}", harness.states);
    assert_eq!(harness.strikes, vec![35, 35], "Two swings, one hit each");

    let swings = harness
        .states
        .iter()
        .filter(|s| **s == BehaviorState::Commit(CommitKind::Attack))
        .count();
    assert_eq!(swings, 2, "Each swing announces itself");
}

// =============================================================================
// Lost target
// =============================================================================

#[test]
fn test_lost_target_waits_returns_home_and_reacquires() {
    let mut harness = Harness::new(EnemyKind::Grunt, Some(Vec2::new(5.0, 0.0)));
    harness.run_for(1.0);
    let chased_to = harness.position;
    assert!(chased_to.x > 1.0, "Grunt should have chased the target");

    harness.target = None;
    harness.step();
    assert_eq!(harness.state(), BehaviorState::LostTarget);

    harness.run_for(2.5);
    assert_eq!(harness.position, chased_to, "Holds still during the grace period");

    harness.run_for(0.6);
    match harness.last_movement {
        MovementIntent::Follow { destination, speed } => {
            assert_eq!(destination, Vec2::ZERO, "Heads back to spawn");
            assert!((speed - 1.0).abs() < 1e-4, "Walks home at half speed, got {}", speed);
        }
        other => panic!("Expected to walk home, got {:?}", other),
    }

    let home = harness.run_until(6.0, |h| h.state() == BehaviorState::Idle);
    assert!(home, "Grunt should settle at spawn");
    assert!(harness.position.length() <= 0.1);

    harness.target = Some(Vec2::new(5.0, 0.0));
    harness.step();
    assert_eq!(harness.state(), BehaviorState::Approach, "A returning target is reacquired");
}

#[test]
fn test_commit_interrupted_by_lost_target() {
    let mut harness = Harness::new(EnemyKind::Golem, Some(Vec2::new(2.0, 0.0)));
    let winding_up = harness.run_until(1.0, |h| matches!(h.state(), BehaviorState::Telegraph(_)));
    assert!(winding_up);

    harness.target = None;
    harness.step();
    assert_eq!(harness.state(), BehaviorState::LostTarget, "Telegraphs are dropped when the target vanishes");
    assert!(harness.strikes.is_empty());
}

// =============================================================================
// Damage scenario
// =============================================================================

#[test]
fn test_anukus_fire_scenario() {
    let mut harness = Harness::new(EnemyKind::Anukus, None);
    let mut cues = CueBuffer::new();

    let first = harness
        .enemy
        .take_damage(0.0, DamageRequest::new(15, DamageCategory::Fire), &mut cues);
    assert_eq!(harness.enemy.health().current(), 85);
    assert_eq!(first.report().map(|r| r.health_after), Some(85));
    let burn = harness.enemy.status().burn().copied().expect("first Fire hit starts a burn");
    assert_eq!(burn.damage_per_tick, 3);
    assert_eq!(burn.ticks_remaining, 3);

    for i in 1..3 {
        harness
            .enemy
            .take_damage(0.1 * i as f32, DamageRequest::new(15, DamageCategory::Fire), &mut cues);
    }
    assert_eq!(harness.enemy.health().current(), 55);
    assert!(harness.enemy.status().is_burning(), "Burn keeps running after the hits");

    // Burn restarted at 0.2: ticks at 1.0, 1.8 and 2.6.
    harness.tick = (0.25 / DT) as u32;
    harness.run_for(3.0);
    assert_eq!(harness.enemy.health().current(), 46);
    assert!(!harness.enemy.status().is_burning());
    assert_eq!(harness.enemy.phase(), BossPhase::One);

    let now = harness.now();
    harness
        .enemy
        .take_damage(now, DamageRequest::new(6, DamageCategory::Physical), &mut cues);
    harness
        .enemy
        .take_damage(now + 0.1, DamageRequest::new(15, DamageCategory::Physical), &mut cues);
    assert_eq!(harness.enemy.health().current(), 25);
    assert_eq!(harness.enemy.phase(), BossPhase::Two);
    assert_eq!(harness.enemy.move_speed().current(), 7.0, "Phase-two base speed");

    let phase_changes = cues
        .iter()
        .filter(|c| matches!(c, CombatCue::PhaseChanged { .. }))
        .count();
    assert_eq!(phase_changes, 1, "Exactly one phase transition");
}
