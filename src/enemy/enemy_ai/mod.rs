//! Variant-Specific Enemy AI
//!
//! Each variant fills in the generic behavior driver through the [`EnemyAI`]
//! trait. The driver decides which hook runs (by current state), applies the
//! returned transition and owns all timing data; a variant only reads the
//! [`BehaviorContext`] snapshot and answers with a [`Step`].
//!
//! Variants are stateless apart from their tuning, so any per-entity memory
//! (locked directions, cooldowns, swing counts) lives in the
//! [`BehaviorStateMachine`] they are handed.

pub mod anukus;
pub mod beholder;
pub mod bob;
pub mod fire_worm;
pub mod goblin;
pub mod golem;
pub mod grunt;

use bevy::prelude::*;

use super::behavior::{
    AttackIntent, BehaviorContext, BehaviorState, BehaviorStateMachine, BossPhase, CommitKind, MovementIntent,
    Step, TelegraphKind,
};
use super::roster::EnemyRoster;
use super::EnemyKind;

pub trait EnemyAI: Send + Sync {
    fn kind(&self) -> EnemyKind;

    /// Called right after the driver enters `state`, before the state's
    /// first tick. Scratch data is fresh at this point.
    fn on_enter(&self, _state: BehaviorState, _machine: &mut BehaviorStateMachine, _ctx: &BehaviorContext, _target: Vec2) {}

    /// Chasing or positioning.
    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step;

    fn telegraph(
        &self,
        _kind: TelegraphKind,
        _machine: &mut BehaviorStateMachine,
        _ctx: &BehaviorContext,
        _target: Vec2,
    ) -> Step {
        Step::hold()
    }

    fn commit(&self, kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step;

    /// Stand still for [`EnemyAI::recover_duration`], then approach again.
    fn recover(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, _target: Vec2) -> Step {
        if machine.elapsed(ctx.now) >= self.recover_duration(ctx.phase) {
            Step::hold().then(BehaviorState::Approach)
        } else {
            Step::hold()
        }
    }

    fn recover_duration(&self, _phase: BossPhase) -> f32 {
        0.0
    }

    /// Mitigation applied to every incoming hit.
    fn modify_incoming_damage(&self, amount: i32) -> i32 {
        amount
    }
}

/// Get the AI implementation for a given variant.
pub fn get_enemy_ai(kind: EnemyKind, roster: &EnemyRoster, hover_seed: f32) -> Box<dyn EnemyAI> {
    match kind {
        EnemyKind::Grunt => Box::new(grunt::GruntAI::new(roster.grunt.clone())),
        EnemyKind::Anukus => Box::new(anukus::AnukusAI::new(roster.anukus.clone())),
        EnemyKind::Bob => Box::new(bob::BobAI::new(roster.bob.clone())),
        EnemyKind::Goblin => Box::new(goblin::GoblinAI::new(roster.goblin.clone())),
        EnemyKind::Beholder => Box::new(beholder::BeholderAI::new(roster.beholder.clone(), hover_seed)),
        EnemyKind::FireWorm => Box::new(fire_worm::FireWormAI::new(roster.fire_worm.clone())),
        EnemyKind::Golem => Box::new(golem::GolemAI::new(roster.golem.clone())),
    }
}

// ============================================================================
// Shared Movement and Melee Utilities
// ============================================================================

/// Follow the target until within `stop_range`, then stand.
pub fn chase(ctx: &BehaviorContext, target: Vec2, stop_range: f32) -> MovementIntent {
    if ctx.position.distance(target) > stop_range {
        MovementIntent::Follow {
            destination: target,
            speed: ctx.move_speed,
        }
    } else {
        MovementIntent::Hold
    }
}

/// Move straight at `destination` without overshooting it this tick.
pub fn move_towards(ctx: &BehaviorContext, destination: Vec2, speed: f32) -> MovementIntent {
    let delta = destination - ctx.position;
    let max_step = speed * ctx.dt;
    let velocity = if ctx.dt > 0.0 && delta.length() <= max_step {
        delta / ctx.dt
    } else {
        delta.normalize_or_zero() * speed
    };
    MovementIntent::Kinematic { velocity }
}

/// Land the commit's single hit if `target` is within `reach` of `origin`
/// while the damage window `[start, end)` is open.
pub fn strike_in_window(
    machine: &mut BehaviorStateMachine,
    now: f32,
    window: (f32, f32),
    origin: Vec2,
    reach: f32,
    target: Vec2,
    damage: i32,
) -> AttackIntent {
    let elapsed = machine.elapsed(now);
    let open = elapsed >= window.0 && elapsed < window.1;
    if open && origin.distance(target) <= reach && machine.land_hit() {
        AttackIntent::Strike { damage }
    } else {
        AttackIntent::None
    }
}

/// Horizontal unit direction from `from` towards `to`.
pub fn horizontal_towards(from: Vec2, to: Vec2) -> Vec2 {
    if to.x >= from.x {
        Vec2::X
    } else {
        Vec2::NEG_X
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::enemy::behavior::BehaviorState;

    #[test]
    fn test_chase_stops_inside_range() {
        let ctx = context(0.0, Vec2::ZERO, Vec2::new(1.0, 0.0), 3.0);
        assert_eq!(chase(&ctx, Vec2::new(1.0, 0.0), 1.5), MovementIntent::Hold);
        let ctx = context(0.0, Vec2::ZERO, Vec2::new(4.0, 0.0), 3.0);
        assert!(matches!(chase(&ctx, Vec2::new(4.0, 0.0), 1.5), MovementIntent::Follow { speed, .. } if speed == 3.0));
    }

    #[test]
    fn test_move_towards_does_not_overshoot() {
        let ctx = context(0.0, Vec2::ZERO, Vec2::ZERO, 60.0);
        let MovementIntent::Kinematic { velocity } = move_towards(&ctx, Vec2::new(0.5, 0.0), 60.0) else {
            panic!("expected kinematic movement");
        };
        assert!((velocity.x * DT - 0.5).abs() < 1e-4, "Lands exactly on the destination");
    }

    #[test]
    fn test_strike_in_window_hits_once() {
        let mut machine = machine_in(BehaviorState::Commit(CommitKind::Attack), 0.0);
        let early = strike_in_window(&mut machine, 0.05, (0.1, 0.3), Vec2::ZERO, 1.0, Vec2::X, 10);
        assert_eq!(early, AttackIntent::None, "Window not open yet");
        let hit = strike_in_window(&mut machine, 0.15, (0.1, 0.3), Vec2::ZERO, 1.0, Vec2::X, 10);
        assert_eq!(hit, AttackIntent::Strike { damage: 10 });
        let again = strike_in_window(&mut machine, 0.2, (0.1, 0.3), Vec2::ZERO, 1.0, Vec2::X, 10);
        assert_eq!(again, AttackIntent::None, "Second tick in the window must not hit");
    }

    #[test]
    fn test_every_kind_has_an_ai() {
        let roster = EnemyRoster::default();
        for kind in EnemyKind::ALL {
            assert_eq!(get_enemy_ai(kind, &roster, 0.0).kind(), kind);
        }
    }
}
