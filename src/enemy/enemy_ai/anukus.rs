//! Anukus AI
//!
//! Sword boss. Walks the target down until it lines up on a row or column,
//! hops back, flashes, then swings in the cardinal direction it locked in.
//! In phase two it is faster, hits harder, recovers sooner and swings twice
//! per commit.

use bevy::prelude::*;

use super::EnemyAI;
use crate::enemy::behavior::{
    cardinal, AttackIntent, AttackSlot, BehaviorContext, BehaviorState, BehaviorStateMachine, BossPhase,
    CommitKind, MovementIntent, Step, TelegraphKind,
};
use crate::enemy::roster::AnukusConfig;
use crate::enemy::EnemyKind;

pub struct AnukusAI {
    config: AnukusConfig,
}

impl AnukusAI {
    pub fn new(config: AnukusConfig) -> Self {
        Self { config }
    }

    fn sword_damage(&self, phase: BossPhase) -> i32 {
        match phase {
            BossPhase::One => self.config.sword_damage,
            BossPhase::Two => self.config.phase_two.sword_damage,
        }
    }

    fn attack_cooldown(&self, phase: BossPhase) -> f32 {
        match phase {
            BossPhase::One => self.config.attack_cooldown,
            BossPhase::Two => self.config.phase_two.attack_cooldown,
        }
    }

    fn swings_per_commit(&self, phase: BossPhase) -> u32 {
        match phase {
            BossPhase::One => 1,
            BossPhase::Two => self.config.phase_two.attacks_per_commit.max(1),
        }
    }

    /// Same row (or column) within half the range, and within range along it.
    fn aligned(&self, position: Vec2, target: Vec2) -> bool {
        let range = self.config.melee_range;
        let distance = (target - position).abs();
        let horizontal = distance.y <= range * 0.5 && distance.x <= range;
        let vertical = distance.x <= range * 0.5 && distance.y <= range;
        horizontal || vertical
    }

    /// Where the sword hitbox sits for the locked attack direction.
    pub fn hitbox_center(&self, position: Vec2, attack_direction: Vec2) -> Vec2 {
        position + cardinal(attack_direction) * self.config.hitbox_distance
    }
}

impl EnemyAI for AnukusAI {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Anukus
    }

    fn on_enter(&self, state: BehaviorState, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) {
        match state {
            BehaviorState::Telegraph(TelegraphKind::Backstep) => {
                let direction = (target - ctx.position).try_normalize().unwrap_or(machine.facing());
                machine.face(direction);
                let scratch = machine.scratch_mut();
                scratch.anchor = ctx.position;
                scratch.attack_direction = direction;
            }
            BehaviorState::Telegraph(TelegraphKind::Charge) | BehaviorState::Commit(CommitKind::Attack) => {
                let direction = machine.facing();
                machine.scratch_mut().attack_direction = direction;
            }
            BehaviorState::Recover => machine.start_cooldown(AttackSlot::Primary, ctx.now),
            _ => {}
        }
    }

    fn approach(&self, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let step = Step::moving(MovementIntent::Follow {
            destination: target,
            speed: ctx.move_speed,
        });
        let ready = machine.cooldown_ready(AttackSlot::Primary, ctx.now, self.attack_cooldown(ctx.phase));
        if ready && self.aligned(ctx.position, target) {
            step.then(BehaviorState::Telegraph(TelegraphKind::Backstep))
        } else {
            step
        }
    }

    fn telegraph(
        &self,
        kind: TelegraphKind,
        machine: &mut BehaviorStateMachine,
        ctx: &BehaviorContext,
        _target: Vec2,
    ) -> Step {
        let elapsed = machine.elapsed(ctx.now);
        match kind {
            TelegraphKind::Backstep => {
                let scratch = machine.scratch();
                let start = scratch.anchor;
                let end = start - scratch.attack_direction * self.config.backstep_distance;
                let progress = elapsed / self.config.backstep_duration;
                if progress < 1.0 {
                    Step::moving(MovementIntent::Place {
                        position: start.lerp(end, progress),
                    })
                } else {
                    Step::moving(MovementIntent::Place { position: end })
                        .then(BehaviorState::Telegraph(TelegraphKind::Charge))
                }
            }
            TelegraphKind::Charge | TelegraphKind::Windup => {
                if elapsed >= self.config.charge_duration {
                    Step::hold().then(BehaviorState::Commit(CommitKind::Attack))
                } else {
                    Step::hold()
                }
            }
        }
    }

    fn commit(&self, _kind: CommitKind, machine: &mut BehaviorStateMachine, ctx: &BehaviorContext, target: Vec2) -> Step {
        let elapsed = machine.elapsed(ctx.now);
        let hitbox = self.hitbox_center(ctx.position, machine.scratch().attack_direction);
        let window_open = elapsed >= self.config.hitbox_activation_delay && elapsed < self.config.attack_duration;

        let attack = if window_open && hitbox.distance(target) <= self.config.hitbox_radius && machine.land_hit() {
            AttackIntent::Strike {
                damage: self.sword_damage(ctx.phase),
            }
        } else {
            AttackIntent::None
        };
        let step = Step::hold().with_attack(attack);

        if elapsed < self.config.attack_duration {
            return step;
        }
        let swings = machine.register_attack();
        if swings < self.swings_per_commit(ctx.phase) {
            step.repeat()
        } else {
            step.then(BehaviorState::Recover)
        }
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
    fn test_alignment_rules() {
        let ai = AnukusAI::new(AnukusConfig::default());
        assert!(ai.aligned(Vec2::ZERO, Vec2::new(2.4, 1.0)), "Row within half range");
        assert!(ai.aligned(Vec2::ZERO, Vec2::new(1.0, -2.4)), "Column within half range");
        assert!(!ai.aligned(Vec2::ZERO, Vec2::new(2.0, 2.0)), "Diagonal is not aligned");
        assert!(!ai.aligned(Vec2::ZERO, Vec2::new(3.0, 0.0)), "Too far along the row");
    }

    #[test]
    fn test_backstep_lerps_away_from_target() {
        let ai = AnukusAI::new(AnukusConfig::default());
        let mut machine = machine_in(BehaviorState::Telegraph(TelegraphKind::Backstep), 0.0);
        let scratch = machine.scratch_mut();
        scratch.anchor = Vec2::ZERO;
        scratch.attack_direction = Vec2::X;

        let halfway = ai.telegraph(TelegraphKind::Backstep, &mut machine, &context(0.075, Vec2::ZERO, Vec2::X, 5.0), Vec2::X);
        let MovementIntent::Place { position } = halfway.movement else {
            panic!("backstep places the boss directly");
        };
        assert!((position.x + 0.75).abs() < 1e-4, "Halfway through a 1.5 backstep");
        assert_eq!(halfway.next, None);

        let done = ai.telegraph(TelegraphKind::Backstep, &mut machine, &context(0.15, Vec2::ZERO, Vec2::X, 5.0), Vec2::X);
        assert_eq!(done.next, Some(BehaviorState::Telegraph(TelegraphKind::Charge)));
        assert_eq!(done.movement, MovementIntent::Place { position: Vec2::new(-1.5, 0.0) });
    }

    #[test]
    fn test_phase_two_swings_twice() {
        let ai = AnukusAI::new(AnukusConfig::default());
        let mut machine = machine_in(BehaviorState::Commit(CommitKind::Attack), 0.0);
        let mut ctx = context(0.31, Vec2::ZERO, Vec2::new(1.5, 0.0), 7.0);
        ctx.phase = BossPhase::Two;
        let first_end = ai.commit(CommitKind::Attack, &mut machine, &ctx, Vec2::new(1.5, 0.0));
        assert!(first_end.repeat, "First phase-two swing loops back into the commit");
        assert_eq!(first_end.next, None);
        assert_eq!(machine.attack_counter(), 1);

        let second_end = ai.commit(CommitKind::Attack, &mut machine, &ctx, Vec2::new(1.5, 0.0));
        assert_eq!(second_end.next, Some(BehaviorState::Recover));
    }

    #[test]
    fn test_hitbox_uses_cardinal_direction() {
        let ai = AnukusAI::new(AnukusConfig::default());
        let center = ai.hitbox_center(Vec2::ZERO, Vec2::new(0.3, -0.9));
        assert_eq!(center, Vec2::new(0.0, -1.5));
    }
}
