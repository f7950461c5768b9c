//! Golem AI
//!
//! Slow and armored. Punches what is in front of it and, when the target
//! stays close, rears up for a ground slam that hits everything around it.

use bevy::prelude::*;

use super::{chase, strike_in_window, EnemyAI};
use crate::enemy::behavior::{
    AttackSlot, BehaviorContext, BehaviorState, BehaviorStateMachine, BossPhase, CommitKind, Step, TelegraphKind,
};
use crate::enemy::roster::GolemConfig;
use crate::enemy::EnemyKind;

pub struct GolemAI {
    config: GolemConfig,
}

impl GolemAI {
    pub fn new(config: GolemConfig) -> Self {
        Self { config }
    }
}

impl EnemyAI for GolemAI {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Golem
    }

    fn on_enter(&self, state: BehaviorState, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) {
        match state {
            BehaviorState::Telegraph(TelegraphKind::Windup) => machine.start_cooldown(AttackSlot::Secondary, ctx.now),
            BehaviorState::Commit(CommitKind::Attack) => {
                machine.start_cooldown(AttackSlot::Primary, ctx.now);
                machine.face(target - ctx.position);
            }
            _ => {}
        }
    }

    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let distance = ctx.position.distance(target);
        let slam_trigger = self.config.slam_radius * self.config.slam_trigger_factor;
        if distance <= slam_trigger && machine.cooldown_ready(AttackSlot::Secondary, ctx.now, self.config.slam_cooldown) {
            return Step::hold().then(BehaviorState::Telegraph(TelegraphKind::Windup));
        }
        if distance <= self.config.punch_range
            && machine.cooldown_ready(AttackSlot::Primary, ctx.now, self.config.punch_cooldown)
        {
            return Step::hold().then(BehaviorState::Commit(CommitKind::Attack));
        }
        Step::moving(chase(ctx, target, self.config.punch_range))
    }

    fn telegraph(
        &self,
        _kind: TelegraphKind,
        machine: &mut BehaviorStateMachine,
        ctx: &BehaviorContext,
        _target: Vec2,
    ) -> Step {
        if machine.elapsed(ctx.now) >= self.config.slam_windup {
            Step::hold().then(BehaviorState::Commit(CommitKind::Slam))
        } else {
            Step::hold()
        }
    }

    fn commit(&self, kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let (duration, reach, damage) = match kind {
            CommitKind::Slam => (self.config.slam_duration, self.config.slam_radius, self.config.slam_damage),
            _ => (self.config.punch_duration, self.config.punch_range, self.config.punch_damage),
        };
        let attack = strike_in_window(machine, ctx.now, (0.0, duration), ctx.position, reach, target, damage);
        let step = Step::hold().with_attack(attack);
        if machine.elapsed(ctx.now) >= duration {
            step.then(BehaviorState::Recover)
        } else {
            step
        }
    }

    fn recover_duration(&self, _phase: BossPhase) -> f32 {
        self.config.recover_duration
    }

    fn modify_incoming_damage(&self, amount: i32) -> i32 {
        (amount - self.config.armor).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::enemy::behavior::AttackIntent;

    #[test]
    fn test_armor_floors_at_one() {
        let ai = GolemAI::new(GolemConfig::default());
        assert_eq!(ai.modify_incoming_damage(20), 15);
        assert_eq!(ai.modify_incoming_damage(3), 1, "Chip damage still lands");
    }

    #[test]
    fn test_slam_takes_priority_when_close() {
        let ai = GolemAI::new(GolemConfig::default());
        let target = Vec2::new(1.5, 0.0);
        let mut machine = machine_in(BehaviorState::Approach, 0.0);
        let step = ai.approach(&mut machine, &context(0.0, Vec2::ZERO, target, 1.5), target);
        assert_eq!(step.next, Some(BehaviorState::Telegraph(TelegraphKind::Windup)));
    }

    #[test]
    fn test_punch_when_slam_cooling() {
        let ai = GolemAI::new(GolemConfig::default());
        let target = Vec2::new(1.5, 0.0);
        let mut machine = machine_in(BehaviorState::Approach, 0.0);
        machine.start_cooldown(AttackSlot::Secondary, 0.0);
        let step = ai.approach(&mut machine, &context(1.0, Vec2::ZERO, target, 1.5), target);
        assert_eq!(step.next, Some(BehaviorState::Commit(CommitKind::Attack)));
    }

    #[test]
    fn test_slam_hits_everything_in_radius() {
        let ai = GolemAI::new(GolemConfig::default());
        let target = Vec2::new(0.0, -2.2);
        let mut machine = machine_in(BehaviorState::Commit(CommitKind::Slam), 0.0);
        let step = ai.commit(CommitKind::Slam, &mut machine, &context(0.0, Vec2::ZERO, target, 1.5), target);
        assert_eq!(step.attack, AttackIntent::Strike { damage: 30 });
        let done = ai.commit(CommitKind::Slam, &mut machine, &context(0.1, Vec2::ZERO, target, 1.5), target);
        assert_eq!(done.next, Some(BehaviorState::Recover));
    }
}
