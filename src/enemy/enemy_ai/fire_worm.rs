//! Fire Worm AI
//!
//! Keeps the target at arm's length and spits bursts of fireballs. Anything
//! that gets right next to it gets bitten after a short windup.

use bevy::prelude::*;

use super::{move_towards, strike_in_window, EnemyAI};
use crate::enemy::behavior::{
    AttackIntent, AttackSlot, BehaviorContext, BehaviorState, BehaviorStateMachine, BossPhase, CommitKind,
    MovementIntent, ProjectileLaunch, Step, TelegraphKind,
};
use crate::enemy::roster::FireWormConfig;
use crate::enemy::EnemyKind;

pub struct FireWormAI {
    config: FireWormConfig,
}

impl FireWormAI {
    pub fn new(config: FireWormConfig) -> Self {
        Self { config }
    }

    /// Chase from far away, stalk into keep distance, back off when crowded.
    fn positioning(&self, ctx: &BehaviorContext, target: Vec2) -> MovementIntent {
        let distance = ctx.position.distance(target);
        if distance > self.config.chase_distance {
            MovementIntent::Follow {
                destination: target,
                speed: ctx.move_speed,
            }
        } else if distance > self.config.keep_distance {
            let toward = (target - ctx.position).normalize_or_zero();
            let stop = target - toward * self.config.keep_distance;
            move_towards(ctx, stop, ctx.move_speed)
        } else if distance < self.config.min_distance {
            let away = (ctx.position - target).try_normalize().unwrap_or(Vec2::Y);
            let retreat = target + away * self.config.min_distance;
            move_towards(ctx, retreat, ctx.move_speed)
        } else {
            MovementIntent::Hold
        }
    }

    fn fireball(&self, origin: Vec2, direction: Vec2) -> ProjectileLaunch {
        ProjectileLaunch {
            origin,
            direction,
            speed: self.config.fireball_speed,
            damage: self.config.fireball_damage,
            radius: self.config.projectile_radius,
            lifetime: self.config.projectile_lifetime,
            spread_degrees: self.config.fireball_spread_degrees,
        }
    }
}

impl EnemyAI for FireWormAI {
    fn kind(&self) -> EnemyKind {
        EnemyKind::FireWorm
    }

    fn on_enter(&self, state: BehaviorState, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) {
        match state {
            BehaviorState::Telegraph(TelegraphKind::Windup) => {
                machine.start_cooldown(AttackSlot::Secondary, ctx.now);
                machine.face(target - ctx.position);
            }
            BehaviorState::Commit(CommitKind::Shoot) => {
                machine.start_cooldown(AttackSlot::Primary, ctx.now);
                machine.face(target - ctx.position);
            }
            _ => {}
        }
    }

    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let distance = ctx.position.distance(target);
        if distance <= self.config.bite_range
            && machine.cooldown_ready(AttackSlot::Secondary, ctx.now, self.config.bite_cooldown)
        {
            return Step::hold().then(BehaviorState::Telegraph(TelegraphKind::Windup));
        }
        if distance <= self.config.keep_distance
            && machine.cooldown_ready(AttackSlot::Primary, ctx.now, self.config.burst_cooldown)
        {
            return Step::hold().then(BehaviorState::Commit(CommitKind::Shoot));
        }
        Step::moving(self.positioning(ctx, target))
    }

    fn telegraph(
        &self,
        _kind: TelegraphKind,
        machine: &mut BehaviorStateMachine,
        ctx: &BehaviorContext,
        _target: Vec2,
    ) -> Step {
        if machine.elapsed(ctx.now) >= self.config.bite_windup {
            Step::hold().then(BehaviorState::Commit(CommitKind::Bite))
        } else {
            Step::hold()
        }
    }

    fn commit(&self, kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let elapsed = machine.elapsed(ctx.now);
        match kind {
            CommitKind::Shoot => {
                let fired = machine.scratch().shots_fired;
                if fired >= self.config.fireballs_per_burst {
                    return Step::hold().then(BehaviorState::Recover);
                }
                if elapsed < fired as f32 * self.config.fireball_interval {
                    return Step::hold();
                }
                machine.scratch_mut().shots_fired = fired + 1;
                let direction = (target - ctx.position).try_normalize().unwrap_or(machine.facing());
                Step::hold().with_attack(AttackIntent::Launch(self.fireball(ctx.position, direction)))
            }
            _ => {
                let start = self.config.bite_activation_delay;
                let end = start + self.config.bite_duration;
                let attack = strike_in_window(
                    machine,
                    ctx.now,
                    (start, end),
                    ctx.position,
                    self.config.bite_range,
                    target,
                    self.config.bite_damage,
                );
                let step = Step::hold().with_attack(attack);
                if elapsed >= end {
                    step.then(BehaviorState::Recover)
                } else {
                    step
                }
            }
        }
    }

    fn recover_duration(&self, _phase: BossPhase) -> f32 {
        self.config.recover_duration
    }
}
