//! Beholder AI
//!
//! Flying eye. Drifts to a preferred distance from the target with a gentle
//! hover bob and fires a single projectile whenever its cooldown allows.

use bevy::prelude::*;
use std::f32::consts::TAU;

use super::{move_towards, EnemyAI};
use crate::enemy::behavior::{
    AttackIntent, AttackSlot, BehaviorContext, BehaviorState, BehaviorStateMachine, BossPhase, CommitKind,
    ProjectileLaunch, Step,
};
use crate::enemy::roster::BeholderConfig;
use crate::enemy::EnemyKind;

pub struct BeholderAI {
    config: BeholderConfig,
    /// Phase offset in [0, 1) so a group of beholders does not bob in sync
    hover_seed: f32,
}

impl BeholderAI {
    pub fn new(config: BeholderConfig, hover_seed: f32) -> Self {
        Self { config, hover_seed }
    }

    fn ideal_distance(&self) -> f32 {
        self.config.shoot_range * self.config.ideal_distance_factor
    }

    fn hover_offset(&self, now: f32) -> f32 {
        self.config.hover_height
            + (now * self.config.hover_frequency + self.hover_seed * TAU).sin() * self.config.hover_amplitude
    }

    /// Where the eye wants to float this tick.
    pub fn hover_target(&self, position: Vec2, target: Vec2, now: f32) -> Vec2 {
        let offset = position - target;
        let distance = offset.length();
        let ideal = self.ideal_distance();
        let away = offset.try_normalize().unwrap_or(Vec2::Y);

        let ground = if distance > ideal || distance < ideal * 0.5 {
            target + away * ideal
        } else {
            // Comfortable band: slow orbit around the target
            let orbit = Vec2::new(-away.y, away.x);
            position + orbit * self.config.move_speed * 0.25
        };
        ground + Vec2::new(0.0, self.hover_offset(now))
    }
}

impl EnemyAI for BeholderAI {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Beholder
    }

    fn on_enter(&self, state: BehaviorState, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) {
        if state == BehaviorState::Commit(CommitKind::Shoot) {
            machine.start_cooldown(AttackSlot::Primary, ctx.now);
            machine.face(target - ctx.position);
        }
    }

    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let in_range = ctx.position.distance(target) <= self.config.shoot_range;
        if in_range && machine.cooldown_ready(AttackSlot::Primary, ctx.now, self.config.attack_cooldown) {
            return Step::hold().then(BehaviorState::Commit(CommitKind::Shoot));
        }
        let destination = self.hover_target(ctx.position, target, ctx.now);
        Step::moving(move_towards(ctx, destination, ctx.move_speed))
    }

    fn commit(&self, _kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        if machine.scratch().shots_fired > 0 {
            return Step::hold().then(BehaviorState::Recover);
        }
        machine.scratch_mut().shots_fired = 1;
        let direction = (target - ctx.position).try_normalize().unwrap_or(machine.facing());
        Step::hold().with_attack(AttackIntent::Launch(ProjectileLaunch {
            origin: ctx.position,
            direction,
            speed: self.config.projectile_speed,
            damage: self.config.damage,
            radius: self.config.projectile_radius,
            lifetime: self.config.projectile_lifetime,
            spread_degrees: 0.0,
        }))
    }

    fn recover_duration(&self, _phase: BossPhase) -> f32 {
        self.config.recover_duration
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::enemy::behavior::MovementIntent;

    #[test]
    fn test_hover_target_backs_off_when_too_close() {
        let mut config = BeholderConfig::default();
        config.hover_amplitude = 0.0;
        let ai = BeholderAI::new(config, 0.0);
        let desired = ai.hover_target(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.0);
        assert!((desired.x - 4.2).abs() < 1e-4, "Ideal distance is 70% of a 6.0 range, got {}", desired.x);
        assert!((desired.y - 2.0).abs() < 1e-4, "Floats at hover height");
    }

    #[test]
    fn test_hover_seed_desyncs_bob() {
        let a = BeholderAI::new(BeholderConfig::default(), 0.0);
        let b = BeholderAI::new(BeholderConfig::default(), 0.25);
        assert_ne!(a.hover_offset(1.0), b.hover_offset(1.0));
    }

    #[test]
    fn test_single_shot_per_commit() {
        let ai = BeholderAI::new(BeholderConfig::default(), 0.0);
        let target = Vec2::new(5.0, 0.0);
        let mut machine = machine_in(BehaviorState::Commit(CommitKind::Shoot), 0.0);
        let ctx = context(0.0, Vec2::ZERO, target, 2.0);

        let shot = ai.commit(CommitKind::Shoot, &mut machine, &ctx, target);
        let AttackIntent::Launch(launch) = shot.attack else {
            panic!("first commit tick launches");
        };
        assert_eq!(launch.direction, Vec2::X);
        assert_eq!(launch.damage, 8);

        let after = ai.commit(CommitKind::Shoot, &mut machine, &ctx, target);
        assert_eq!(after.attack, AttackIntent::None);
        assert_eq!(after.next, Some(BehaviorState::Recover));
    }

    #[test]
    fn test_out_of_range_drifts_closer() {
        let ai = BeholderAI::new(BeholderConfig::default(), 0.0);
        let target = Vec2::new(10.0, 0.0);
        let mut machine = machine_in(BehaviorState::Approach, 0.0);
        let step = ai.approach(&mut machine, &context(0.0, Vec2::ZERO, target, 2.0), target);
        assert_eq!(step.next, None);
        let MovementIntent::Kinematic { velocity } = step.movement else {
            panic!("beholders fly directly");
        };
        assert!(velocity.x > 0.0);
    }
}
