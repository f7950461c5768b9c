//! Grunt AI
//!
//! The plain melee enemy. Chases until in range, swings when the cooldown
//! allows. No telegraph.

use bevy::prelude::*;

use super::{chase, strike_in_window, EnemyAI};
use crate::enemy::behavior::{
    AttackSlot, BehaviorContext, BehaviorState, BehaviorStateMachine, CommitKind, Step,
};
use crate::enemy::roster::GruntConfig;
use crate::enemy::EnemyKind;

pub struct GruntAI {
    config: GruntConfig,
}

impl GruntAI {
    pub fn new(config: GruntConfig) -> Self {
        Self { config }
    }
}

impl EnemyAI for GruntAI {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Grunt
    }

    fn on_enter(&self, state: BehaviorState, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) {
        if state == BehaviorState::Commit(CommitKind::Attack) {
            machine.start_cooldown(AttackSlot::Primary, ctx.now);
            machine.face(target - ctx.position);
        }
    }

    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let in_range = ctx.position.distance(target) <= self.config.attack_range;
        if in_range && machine.cooldown_ready(AttackSlot::Primary, ctx.now, self.config.attack_cooldown) {
            return Step::hold().then(BehaviorState::Commit(CommitKind::Attack));
        }
        Step::moving(chase(ctx, target, self.config.attack_range))
    }

    fn commit(&self, _kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let attack = strike_in_window(
            machine,
            ctx.now,
            (0.0, self.config.attack_duration),
            ctx.position,
            self.config.attack_range,
            target,
            self.config.damage,
        );
        let step = Step::hold().with_attack(attack);
        if machine.elapsed(ctx.now) >= self.config.attack_duration {
            step.then(BehaviorState::Recover)
        } else {
            step
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::enemy::behavior::{AttackIntent, MovementIntent};

    #[test]
    fn test_grunt_chases_when_out_of_range() {
        let ai = GruntAI::new(GruntConfig::default());
        let mut machine = machine_in(BehaviorState::Approach, 0.0);
        let step = ai.approach(&mut machine, &context(0.0, Vec2::ZERO, Vec2::new(5.0, 0.0), 2.0), Vec2::new(5.0, 0.0));
        assert!(matches!(step.movement, MovementIntent::Follow { .. }));
        assert_eq!(step.next, None);
    }

    #[test]
    fn test_grunt_attacks_in_range_respecting_cooldown() {
        let ai = GruntAI::new(GruntConfig::default());
        let target = Vec2::new(1.0, 0.0);
        let mut machine = machine_in(BehaviorState::Approach, 0.0);
        let step = ai.approach(&mut machine, &context(0.0, Vec2::ZERO, target, 2.0), target);
        assert_eq!(step.next, Some(BehaviorState::Commit(CommitKind::Attack)));

        machine.start_cooldown(AttackSlot::Primary, 0.0);
        let step = ai.approach(&mut machine, &context(0.5, Vec2::ZERO, target, 2.0), target);
        assert_eq!(step.next, None, "Cooldown of 1s has not elapsed");
    }

    #[test]
    fn test_grunt_commit_hits_then_recovers() {
        let ai = GruntAI::new(GruntConfig::default());
        let target = Vec2::new(1.0, 0.0);
        let mut machine = machine_in(BehaviorState::Commit(CommitKind::Attack), 0.0);
        let first = ai.commit(CommitKind::Attack, &mut machine, &context(0.02, Vec2::ZERO, target, 2.0), target);
        assert_eq!(first.attack, AttackIntent::Strike { damage: 10 });
        let second = ai.commit(CommitKind::Attack, &mut machine, &context(0.05, Vec2::ZERO, target, 2.0), target);
        assert_eq!(second.attack, AttackIntent::None);
        let last = ai.commit(CommitKind::Attack, &mut machine, &context(0.12, Vec2::ZERO, target, 2.0), target);
        assert_eq!(last.next, Some(BehaviorState::Recover));
    }
}
