//! Goblin AI
//!
//! Fast melee enemy. Closes mid-range gaps with a short dash, then stabs.

use bevy::prelude::*;

use super::{chase, strike_in_window, EnemyAI};
use crate::enemy::behavior::{
    segment_hits, AttackIntent, AttackSlot, BehaviorContext, BehaviorState, BehaviorStateMachine, CommitKind,
    MovementIntent, Step, TelegraphKind,
};
use crate::enemy::roster::GoblinConfig;
use crate::enemy::EnemyKind;

pub struct GoblinAI {
    config: GoblinConfig,
}

impl GoblinAI {
    pub fn new(config: GoblinConfig) -> Self {
        Self { config }
    }

    fn wants_dash(&self, machine: &BehaviorStateMachine, ctx: &BehaviorContext, distance: f32) -> bool {
        distance <= self.config.dash_range
            && distance > self.config.attack_range * 1.5
            && machine.cooldown_ready(AttackSlot::Secondary, ctx.now, self.config.dash_cooldown)
    }
}

impl EnemyAI for GoblinAI {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Goblin
    }

    fn on_enter(&self, state: BehaviorState, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) {
        match state {
            BehaviorState::Telegraph(_) => machine.face(target - ctx.position),
            BehaviorState::Commit(CommitKind::Dash) => {
                machine.start_cooldown(AttackSlot::Secondary, ctx.now);
                let direction = machine.facing();
                machine.scratch_mut().attack_direction = direction;
            }
            BehaviorState::Commit(CommitKind::Attack) => {
                machine.start_cooldown(AttackSlot::Primary, ctx.now);
                machine.face(target - ctx.position);
            }
            _ => {}
        }
    }

    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let distance = ctx.position.distance(target);
        if self.wants_dash(machine, ctx, distance) {
            return Step::hold().then(BehaviorState::Telegraph(TelegraphKind::Charge));
        }
        if distance <= self.config.attack_range
            && machine.cooldown_ready(AttackSlot::Primary, ctx.now, self.config.attack_cooldown)
        {
            return Step::hold().then(BehaviorState::Commit(CommitKind::Attack));
        }
        Step::moving(chase(ctx, target, self.config.attack_range))
    }

    fn telegraph(
        &self,
        _kind: TelegraphKind,
        machine: &mut BehaviorStateMachine,
        ctx: &BehaviorContext,
        _target: Vec2,
    ) -> Step {
        if machine.elapsed(ctx.now) >= self.config.dash_windup {
            Step::hold().then(BehaviorState::Commit(CommitKind::Dash))
        } else {
            Step::hold()
        }
    }

    fn commit(&self, kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let elapsed = machine.elapsed(ctx.now);
        match kind {
            CommitKind::Dash => {
                if elapsed >= self.config.dash_duration {
                    return Step::hold().then(BehaviorState::Recover);
                }
                let speed = ctx.dash_speed.unwrap_or(self.config.dash_speed);
                let velocity = machine.scratch().attack_direction * speed;
                let sweep_end = ctx.position + velocity * ctx.dt;
                let attack = if segment_hits(ctx.position, sweep_end, target, self.config.contact_radius)
                    && machine.land_hit()
                {
                    AttackIntent::Strike {
                        damage: self.config.damage,
                    }
                } else {
                    AttackIntent::None
                };
                Step::moving(MovementIntent::Kinematic { velocity }).with_attack(attack)
            }
            _ => {
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
                if elapsed >= self.config.attack_duration {
                    step.then(BehaviorState::Recover)
                } else {
                    step
                }
            }
        }
    }
}
