//! Behavior State Machine
//!
//! One generic driver for every enemy variant. It owns the current state,
//! the timestamp the state was entered, per-state scratch data, attack
//! cooldowns and the multi-hit attack counter. Variant logic lives behind the
//! [`EnemyAI`] trait and only answers "what now?" for the state the driver
//! hands it; every requested transition is checked against
//! [`BehaviorState::can_transition_to`].
//!
//! The generic pattern is Approach → Telegraph → Commit → Recover → Approach.
//! `LostTarget` and `Idle` cover an absent target, `Dying` is terminal.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::cues::{CombatCue, CueBuffer};
use super::enemy_ai::EnemyAI;

// ============================================================================
// States
// ============================================================================

/// Warning window before an attack commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TelegraphKind {
    /// Short hop away from the target along the attack axis
    Backstep,
    /// Stand still and flash
    Charge,
    /// Rear up before a heavy blow
    Windup,
}

/// The attack performed while committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitKind {
    Attack,
    Dash,
    Slam,
    Shoot,
    Bite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    Idle,
    /// Chasing or positioning relative to the target
    Approach,
    Telegraph(TelegraphKind),
    Commit(CommitKind),
    /// Cooldown after a committed attack
    Recover,
    /// Target absent: hold, then walk back to spawn
    LostTarget,
    Dying,
}

impl BehaviorState {
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "Idle",
            BehaviorState::Approach => "Approach",
            BehaviorState::Telegraph(TelegraphKind::Backstep) => "Telegraph(Backstep)",
            BehaviorState::Telegraph(TelegraphKind::Charge) => "Telegraph(Charge)",
            BehaviorState::Telegraph(TelegraphKind::Windup) => "Telegraph(Windup)",
            BehaviorState::Commit(CommitKind::Attack) => "Commit(Attack)",
            BehaviorState::Commit(CommitKind::Dash) => "Commit(Dash)",
            BehaviorState::Commit(CommitKind::Slam) => "Commit(Slam)",
            BehaviorState::Commit(CommitKind::Shoot) => "Commit(Shoot)",
            BehaviorState::Commit(CommitKind::Bite) => "Commit(Bite)",
            BehaviorState::Recover => "Recover",
            BehaviorState::LostTarget => "LostTarget",
            BehaviorState::Dying => "Dying",
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, BehaviorState::Commit(_))
    }

    /// Transition table. Commit → Commit is deliberately absent: repeated
    /// swings go through [`BehaviorStateMachine::restart_commit`].
    pub fn can_transition_to(self, next: BehaviorState) -> bool {
        use BehaviorState::*;
        match (self, next) {
            (Dying, _) => false,
            (_, Dying) => true,
            (Idle, LostTarget) | (LostTarget, LostTarget) => false,
            (_, LostTarget) => true,
            (Idle, Approach) | (LostTarget, Approach) | (LostTarget, Idle) => true,
            (Approach, Telegraph(_)) | (Approach, Commit(_)) => true,
            (Telegraph(TelegraphKind::Backstep), Telegraph(TelegraphKind::Charge)) => true,
            (Telegraph(_), Commit(_)) => true,
            (Commit(_), Recover) => true,
            (Recover, Approach) => true,
            _ => false,
        }
    }
}

/// Boss tier. Only ever advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum BossPhase {
    #[default]
    One,
    Two,
}

impl BossPhase {
    pub fn number(&self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
        }
    }
}

// ============================================================================
// Intents
// ============================================================================

/// What the enemy wants its body to do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementIntent {
    /// Stop and disable the path follower
    Hold,
    /// Hand a destination to the path follower
    Follow { destination: Vec2, speed: f32 },
    /// Path follower off; move directly at this velocity
    Kinematic { velocity: Vec2 },
    /// Path follower off; snap to an exact scripted position
    Place { position: Vec2 },
}

/// A projectile the enemy wants launched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub origin: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    pub damage: i32,
    pub radius: f32,
    pub lifetime: f32,
    /// Random aim error either side of `direction`, in degrees, rolled by
    /// whoever spawns the projectile
    pub spread_degrees: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackIntent {
    None,
    /// Damage that landed on the target this tick
    Strike { damage: i32 },
    Launch(ProjectileLaunch),
}

/// Snapshot an enemy thinks with. Built once per tick so every decision in
/// that tick sees the same time.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorContext {
    pub now: f32,
    pub dt: f32,
    pub position: Vec2,
    pub target: Option<Vec2>,
    pub phase: BossPhase,
    /// Current (debuffed) movement speed
    pub move_speed: f32,
    /// Current (debuffed) dash speed, for variants that dash
    pub dash_speed: Option<f32>,
}

/// A variant's answer for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub movement: MovementIntent,
    pub attack: AttackIntent,
    pub next: Option<BehaviorState>,
    /// Start another swing of the current commit (multi-hit attacks)
    pub repeat: bool,
}

impl Step {
    pub fn hold() -> Self {
        Self::moving(MovementIntent::Hold)
    }

    pub fn moving(movement: MovementIntent) -> Self {
        Self {
            movement,
            attack: AttackIntent::None,
            next: None,
            repeat: false,
        }
    }

    pub fn then(mut self, next: BehaviorState) -> Self {
        self.next = Some(next);
        self
    }

    pub fn with_attack(mut self, attack: AttackIntent) -> Self {
        self.attack = attack;
        self
    }

    pub fn repeat(mut self) -> Self {
        self.repeat = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorOutput {
    pub movement: MovementIntent,
    pub attack: AttackIntent,
}

impl BehaviorOutput {
    pub fn idle() -> Self {
        Self {
            movement: MovementIntent::Hold,
            attack: AttackIntent::None,
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Independent cooldown timers a variant can keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackSlot {
    Primary,
    Secondary,
}

/// Per-state data, reset whenever a state is entered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StateScratch {
    /// Direction locked in when the attack started
    pub attack_direction: Vec2,
    /// Position remembered on entry (backstep start, dash start, ...)
    pub anchor: Vec2,
    pub has_dealt_damage: bool,
    pub shots_fired: u32,
}

/// How an enemy behaves while its target is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LostTargetTuning {
    /// Seconds spent standing still before heading home
    pub grace_period: f32,
    /// Fraction of move speed used on the way home
    pub return_speed_factor: f32,
    /// Distance from spawn that counts as home
    pub arrival_tolerance: f32,
}

impl Default for LostTargetTuning {
    fn default() -> Self {
        Self {
            grace_period: 3.0,
            return_speed_factor: 0.5,
            arrival_tolerance: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BehaviorStateMachine {
    state: BehaviorState,
    entered_at: f32,
    scratch: StateScratch,
    attack_counter: u32,
    cooldowns: SmallVec<[(AttackSlot, f32); 2]>,
    spawn_position: Vec2,
    facing: Vec2,
    lost_target: LostTargetTuning,
}

impl BehaviorStateMachine {
    pub fn new(spawn_position: Vec2, now: f32, lost_target: LostTargetTuning) -> Self {
        Self {
            state: BehaviorState::Idle,
            entered_at: now,
            scratch: StateScratch::default(),
            attack_counter: 0,
            cooldowns: SmallVec::new(),
            spawn_position,
            facing: Vec2::NEG_Y,
            lost_target,
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn entered_at(&self) -> f32 {
        self.entered_at
    }

    /// Seconds since the current state was entered.
    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.entered_at
    }

    pub fn scratch(&self) -> &StateScratch {
        &self.scratch
    }

    pub fn scratch_mut(&mut self) -> &mut StateScratch {
        &mut self.scratch
    }

    pub fn attack_counter(&self) -> u32 {
        self.attack_counter
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_position
    }

    pub fn face(&mut self, direction: Vec2) {
        if let Some(direction) = direction.try_normalize() {
            self.facing = direction;
        }
    }

    /// True if the slot never fired or `cooldown` seconds have passed since.
    pub fn cooldown_ready(&self, slot: AttackSlot, now: f32, cooldown: f32) -> bool {
        self.cooldowns
            .iter()
            .find(|(s, _)| *s == slot)
            .map_or(true, |(_, started)| now - started >= cooldown)
    }

    pub fn start_cooldown(&mut self, slot: AttackSlot, now: f32) {
        match self.cooldowns.iter_mut().find(|(s, _)| *s == slot) {
            Some(entry) => entry.1 = now,
            None => self.cooldowns.push((slot, now)),
        }
    }

    /// Claim this commit's single hit. False if it already landed.
    pub fn land_hit(&mut self) -> bool {
        if self.scratch.has_dealt_damage {
            false
        } else {
            self.scratch.has_dealt_damage = true;
            true
        }
    }

    /// Count one finished swing and return the new total.
    pub fn register_attack(&mut self) -> u32 {
        self.attack_counter += 1;
        self.attack_counter
    }

    /// Start another swing of the current commit without leaving it.
    pub fn restart_commit(&mut self, now: f32, cues: &mut CueBuffer) {
        if !self.state.is_commit() {
            return;
        }
        self.entered_at = now;
        self.scratch.has_dealt_damage = false;
        self.scratch.shots_fired = 0;
        cues.push(CombatCue::StateEntered {
            state: self.state,
            facing: self.facing,
        });
    }

    /// Apply a transition if the table allows it.
    pub fn transition(&mut self, now: f32, next: BehaviorState, cues: &mut CueBuffer) -> bool {
        if !self.switch_state(now, next) {
            warn!(
                "Ignoring illegal behavior transition {} -> {}",
                self.state.name(),
                next.name()
            );
            return false;
        }
        cues.push(CombatCue::StateEntered {
            state: next,
            facing: self.facing,
        });
        true
    }

    fn switch_state(&mut self, now: f32, next: BehaviorState) -> bool {
        if !self.state.can_transition_to(next) {
            return false;
        }
        self.state = next;
        self.entered_at = now;
        self.scratch = StateScratch::default();
        if matches!(
            next,
            BehaviorState::Recover | BehaviorState::LostTarget | BehaviorState::Dying
        ) {
            self.attack_counter = 0;
        }
        true
    }

    /// Enter `Dying`. In-flight telegraphs and commits are dropped.
    pub fn enter_dying(&mut self, now: f32, cues: &mut CueBuffer) -> bool {
        self.transition(now, BehaviorState::Dying, cues)
    }

    /// Advance one tick.
    pub fn tick(&mut self, ai: &dyn EnemyAI, ctx: &BehaviorContext, cues: &mut CueBuffer) -> BehaviorOutput {
        if self.state == BehaviorState::Dying {
            return BehaviorOutput::idle();
        }

        let Some(target) = ctx.target else {
            return self.tick_without_target(ctx, cues);
        };

        if matches!(self.state, BehaviorState::Idle | BehaviorState::LostTarget) {
            self.enter(ai, ctx, target, BehaviorState::Approach, cues);
        }

        let step = match self.state {
            BehaviorState::Approach => ai.approach(self, ctx, target),
            BehaviorState::Telegraph(kind) => ai.telegraph(kind, self, ctx, target),
            BehaviorState::Commit(kind) => ai.commit(kind, self, ctx, target),
            BehaviorState::Recover => ai.recover(self, ctx, target),
            BehaviorState::Idle | BehaviorState::LostTarget | BehaviorState::Dying => Step::hold(),
        };

        match step.movement {
            MovementIntent::Follow { destination, .. } => self.face(destination - ctx.position),
            MovementIntent::Kinematic { velocity } => self.face(velocity),
            MovementIntent::Hold | MovementIntent::Place { .. } => {}
        }

        if step.repeat {
            self.restart_commit(ctx.now, cues);
        } else if let Some(next) = step.next {
            self.enter(ai, ctx, target, next, cues);
        }

        BehaviorOutput {
            movement: step.movement,
            attack: step.attack,
        }
    }

    fn enter(
        &mut self,
        ai: &dyn EnemyAI,
        ctx: &BehaviorContext,
        target: Vec2,
        next: BehaviorState,
        cues: &mut CueBuffer,
    ) {
        let previous = self.state;
        if !self.switch_state(ctx.now, next) {
            warn!(
                "{} requested illegal transition {} -> {}",
                ai.kind().name(),
                previous.name(),
                next.name()
            );
            return;
        }
        // Entry hook runs before the cue so it carries the new facing.
        ai.on_enter(next, self, ctx, target);
        cues.push(CombatCue::StateEntered {
            state: next,
            facing: self.facing,
        });
    }

    fn tick_without_target(&mut self, ctx: &BehaviorContext, cues: &mut CueBuffer) -> BehaviorOutput {
        match self.state {
            BehaviorState::Idle => BehaviorOutput::idle(),
            BehaviorState::LostTarget => {
                if self.elapsed(ctx.now) < self.lost_target.grace_period {
                    return BehaviorOutput::idle();
                }
                let home = self.spawn_position;
                if ctx.position.distance(home) <= self.lost_target.arrival_tolerance {
                    self.transition(ctx.now, BehaviorState::Idle, cues);
                    return BehaviorOutput::idle();
                }
                self.face(home - ctx.position);
                BehaviorOutput {
                    movement: MovementIntent::Follow {
                        destination: home,
                        speed: ctx.move_speed * self.lost_target.return_speed_factor,
                    },
                    attack: AttackIntent::None,
                }
            }
            _ => {
                self.transition(ctx.now, BehaviorState::LostTarget, cues);
                BehaviorOutput::idle()
            }
        }
    }
}

// ============================================================================
// Geometry helpers shared by variants
// ============================================================================

/// Snap a direction to the dominant axis.
pub fn cardinal(direction: Vec2) -> Vec2 {
    if direction.x.abs() >= direction.y.abs() {
        Vec2::new(direction.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, direction.y.signum())
    }
}

/// Whether `point` lies within `radius` of the segment `start..end`.
pub fn segment_hits(start: Vec2, end: Vec2, point: Vec2, radius: f32) -> bool {
    let segment = end - start;
    let length_squared = segment.length_squared();
    let t = if length_squared > 0.0 {
        ((point - start).dot(segment) / length_squared).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (start + segment * t).distance(point) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table_core_loop() {
        use BehaviorState::*;
        assert!(Approach.can_transition_to(Telegraph(TelegraphKind::Backstep)));
        assert!(Telegraph(TelegraphKind::Backstep).can_transition_to(Telegraph(TelegraphKind::Charge)));
        assert!(Telegraph(TelegraphKind::Charge).can_transition_to(Commit(CommitKind::Attack)));
        assert!(Commit(CommitKind::Attack).can_transition_to(Recover));
        assert!(Recover.can_transition_to(Approach));
    }

    #[test]
    fn test_transition_table_rejects_shortcuts() {
        use BehaviorState::*;
        assert!(!Commit(CommitKind::Attack).can_transition_to(Commit(CommitKind::Attack)),
            "Repeated swings must use the attack counter");
        assert!(!Telegraph(TelegraphKind::Charge).can_transition_to(Recover));
        assert!(!Recover.can_transition_to(Commit(CommitKind::Dash)));
        assert!(!Idle.can_transition_to(LostTarget));
    }

    #[test]
    fn test_dying_is_terminal() {
        use BehaviorState::*;
        for next in [Idle, Approach, Recover, LostTarget, Dying, Commit(CommitKind::Slam)] {
            assert!(!Dying.can_transition_to(next), "Dying -> {} must be rejected", next.name());
        }
        assert!(Commit(CommitKind::Attack).can_transition_to(Dying));
        assert!(Telegraph(TelegraphKind::Windup).can_transition_to(Dying));
    }

    #[test]
    fn test_transition_resets_scratch_and_counter() {
        let mut cues = CueBuffer::new();
        let mut machine = BehaviorStateMachine::new(Vec2::ZERO, 0.0, LostTargetTuning::default());
        machine.transition(0.0, BehaviorState::Approach, &mut cues);
        machine.transition(1.0, BehaviorState::Commit(CommitKind::Attack), &mut cues);
        assert!(machine.land_hit());
        assert!(!machine.land_hit(), "Only one hit per commit");
        machine.register_attack();
        machine.restart_commit(1.3, &mut cues);
        assert!(machine.land_hit(), "A restarted swing may hit again");
        assert_eq!(machine.attack_counter(), 1);

        machine.transition(1.6, BehaviorState::Recover, &mut cues);
        assert_eq!(machine.attack_counter(), 0, "Counter resets on Recover");
        assert!(!machine.scratch().has_dealt_damage);
        assert_eq!(machine.entered_at(), 1.6);
    }

    #[test]
    fn test_cooldown_slots_are_independent() {
        let mut machine = BehaviorStateMachine::new(Vec2::ZERO, 0.0, LostTargetTuning::default());
        assert!(machine.cooldown_ready(AttackSlot::Primary, 0.0, 3.0), "Unused slot is ready");
        machine.start_cooldown(AttackSlot::Primary, 1.0);
        assert!(!machine.cooldown_ready(AttackSlot::Primary, 2.0, 3.0));
        assert!(machine.cooldown_ready(AttackSlot::Primary, 4.0, 3.0));
        assert!(machine.cooldown_ready(AttackSlot::Secondary, 2.0, 3.0));
    }

    #[test]
    fn test_cardinal_snaps_to_dominant_axis() {
        assert_eq!(cardinal(Vec2::new(0.9, -0.3)), Vec2::X);
        assert_eq!(cardinal(Vec2::new(-0.2, -0.8)), Vec2::NEG_Y);
    }

    #[test]
    fn test_segment_hits_catches_fast_movers() {
        let start = Vec2::new(0.0, 0.5);
        let end = Vec2::new(2.0, 0.5);
        assert!(segment_hits(start, end, Vec2::new(1.0, 0.0), 0.6));
        assert!(!segment_hits(start, end, Vec2::new(3.0, 0.0), 0.6));
    }
}
