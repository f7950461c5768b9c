//! Bob AI
//!
//! Dash boss. Lines up on the target's row at a comfortable horizontal
//! distance, charges in place, then dashes straight through. The dash ends
//! after a fixed travel distance or a hard time cap, whichever comes first.

use bevy::prelude::*;

use super::{horizontal_towards, EnemyAI};
use crate::enemy::behavior::{
    segment_hits, AttackIntent, AttackSlot, BehaviorContext, BehaviorState, BehaviorStateMachine, BossPhase,
    CommitKind, MovementIntent, Step, TelegraphKind,
};
use crate::enemy::roster::BobConfig;
use crate::enemy::EnemyKind;

pub struct BobAI {
    config: BobConfig,
}

impl BobAI {
    pub fn new(config: BobConfig) -> Self {
        Self { config }
    }

    fn dash_damage(&self, phase: BossPhase) -> i32 {
        match phase {
            BossPhase::One => self.config.dash_damage,
            BossPhase::Two => self.config.phase_two.dash_damage,
        }
    }

    fn dash_cooldown(&self, phase: BossPhase) -> f32 {
        match phase {
            BossPhase::One => self.config.dash_cooldown,
            BossPhase::Two => self.config.phase_two.dash_cooldown,
        }
    }

    /// Spot on the target's row, on Bob's current side, inside the dash band.
    pub fn preferred_position(&self, position: Vec2, target: Vec2) -> Vec2 {
        let dx = position.x - target.x;
        let side = if dx >= 0.0 { 1.0 } else { -1.0 };
        let x = if dx.abs() < self.config.min_distance {
            target.x + side * self.config.max_distance
        } else if dx.abs() > self.config.max_distance {
            target.x + side * self.config.min_distance
        } else {
            position.x
        };
        Vec2::new(x, target.y)
    }

    fn lined_up(&self, position: Vec2, target: Vec2) -> bool {
        let dx = (position.x - target.x).abs();
        let dy = (position.y - target.y).abs();
        dy <= self.config.positioning_tolerance && dx >= self.config.min_distance && dx <= self.config.max_distance
    }
}

impl EnemyAI for BobAI {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Bob
    }

    fn on_enter(&self, state: BehaviorState, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) {
        match state {
            BehaviorState::Telegraph(TelegraphKind::Charge) => {
                machine.face(horizontal_towards(ctx.position, target));
            }
            BehaviorState::Commit(CommitKind::Dash) => {
                machine.start_cooldown(AttackSlot::Primary, ctx.now);
                let direction = machine.facing();
                let scratch = machine.scratch_mut();
                scratch.anchor = ctx.position;
                scratch.attack_direction = direction;
            }
            _ => {}
        }
    }

    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let ready = machine.cooldown_ready(AttackSlot::Primary, ctx.now, self.dash_cooldown(ctx.phase));
        if ready && self.lined_up(ctx.position, target) {
            return Step::hold().then(BehaviorState::Telegraph(TelegraphKind::Charge));
        }
        Step::moving(MovementIntent::Follow {
            destination: self.preferred_position(ctx.position, target),
            speed: ctx.move_speed,
        })
    }

    fn telegraph(
        &self,
        _kind: TelegraphKind,
        machine: &mut BehaviorStateMachine,
        ctx: &BehaviorContext,
        target: Vec2,
    ) -> Step {
        machine.face(horizontal_towards(ctx.position, target));
        if machine.elapsed(ctx.now) >= self.config.charge_duration {
            Step::hold().then(BehaviorState::Commit(CommitKind::Dash))
        } else {
            Step::hold()
        }
    }

    fn commit(&self, _kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let travelled = ctx.position.distance(machine.scratch().anchor);
        if travelled >= self.config.dash_travel || machine.elapsed(ctx.now) >= self.config.dash_max_duration {
            return Step::hold().then(BehaviorState::Recover);
        }

        let speed = ctx.dash_speed.unwrap_or(self.config.dash_speed);
        let velocity = machine.scratch().attack_direction * speed;
        let sweep_end = ctx.position + velocity * ctx.dt;
        let attack = if segment_hits(ctx.position, sweep_end, target, self.config.contact_radius) && machine.land_hit() {
            AttackIntent::Strike {
                damage: self.dash_damage(ctx.phase),
            }
        } else {
            AttackIntent::None
        };
        Step::moving(MovementIntent::Kinematic { velocity }).with_attack(attack)
    }

    fn recover_duration(&self, _phase: BossPhase) -> f32 {
        self.config.recover_duration
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_preferred_position_keeps_inside_dash_band() {
        let ai = BobAI::new(BobConfig::default());
        let target = Vec2::new(0.0, 3.0);
        assert_eq!(ai.preferred_position(Vec2::new(2.0, 0.0), target), Vec2::new(15.0, 3.0), "Too close: back off");
        assert_eq!(ai.preferred_position(Vec2::new(-20.0, 0.0), target), Vec2::new(-8.0, 3.0), "Too far: close in");
        assert_eq!(ai.preferred_position(Vec2::new(10.0, 0.0), target), Vec2::new(10.0, 3.0), "In band: match row");
    }

    #[test]
    fn test_charge_only_when_lined_up_and_ready() {
        let ai = BobAI::new(BobConfig::default());
        let target = Vec2::ZERO;
        let mut machine = machine_in(BehaviorState::Approach, 0.0);

        let off_row = ai.approach(&mut machine, &context(0.0, Vec2::new(10.0, 2.0), target, 9.0), target);
        assert_eq!(off_row.next, None);

        let lined = ai.approach(&mut machine, &context(0.0, Vec2::new(10.0, 0.5), target, 9.0), target);
        assert_eq!(lined.next, Some(BehaviorState::Telegraph(TelegraphKind::Charge)));

        machine.start_cooldown(AttackSlot::Primary, 0.0);
        let cooling = ai.approach(&mut machine, &context(1.0, Vec2::new(10.0, 0.5), target, 9.0), target);
        assert_eq!(cooling.next, None, "Dash cooldown is 2.5s");
    }

    #[test]
    fn test_dash_hits_once_and_stops_at_travel_limit() {
        let ai = BobAI::new(BobConfig::default());
        let target = Vec2::ZERO;
        let mut machine = machine_in(BehaviorState::Commit(CommitKind::Dash), 0.0);
        let scratch = machine.scratch_mut();
        scratch.anchor = Vec2::new(10.0, 0.0);
        scratch.attack_direction = Vec2::NEG_X;

        let mut ctx = context(0.1, Vec2::new(0.5, 0.0), target, 9.0);
        ctx.dash_speed = Some(60.0);
        let hit = ai.commit(CommitKind::Dash, &mut machine, &ctx, target);
        assert_eq!(hit.attack, AttackIntent::Strike { damage: 20 });
        assert_eq!(hit.movement, MovementIntent::Kinematic { velocity: Vec2::new(-60.0, 0.0) });

        let again = ai.commit(CommitKind::Dash, &mut machine, &ctx, target);
        assert_eq!(again.attack, AttackIntent::None, "One hit per dash");

        let far = context(0.5, Vec2::new(-20.0, 0.0), target, 9.0);
        let done = ai.commit(CommitKind::Dash, &mut machine, &far, target);
        assert_eq!(done.next, Some(BehaviorState::Recover));
    }

    #[test]
    fn test_dash_has_time_cap() {
        let ai = BobAI::new(BobConfig::default());
        let mut machine = machine_in(BehaviorState::Commit(CommitKind::Dash), 0.0);
        machine.scratch_mut().anchor = Vec2::ZERO;
        let stuck = context(1.0, Vec2::ZERO, Vec2::new(50.0, 0.0), 9.0);
        let step = ai.commit(CommitKind::Dash, &mut machine, &stuck, Vec2::new(50.0, 0.0));
        assert_eq!(step.next, Some(BehaviorState::Recover));
    }
}
