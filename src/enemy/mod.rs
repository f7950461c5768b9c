//! Enemies and bosses
//!
//! The [`Enemy`] component is the aggregate every simulation tick goes
//! through. It owns:
//! - health and speed stats (`stats`)
//! - lifecycle gating (`lifecycle`)
//! - burn and freeze timers (`status_effects`)
//! - the generic behavior driver (`behavior`) and the variant strategy that
//!   fills it in (`enemy_ai`)
//!
//! Damage resolution lives in `damage`. None of this needs an ECS world;
//! the systems in [`crate::combat`] feed it positions and time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod behavior;
pub mod cues;
pub mod damage;
pub mod enemy_ai;
pub mod lifecycle;
pub mod roster;
pub mod stats;
pub mod status_effects;

use behavior::{
    AttackIntent, BehaviorContext, BehaviorStateMachine, BossPhase, LostTargetTuning, MovementIntent,
};
use cues::{CombatCue, CueBuffer};
use enemy_ai::{get_enemy_ai, EnemyAI};
pub use lifecycle::Lifecycle;
use roster::{EnemyProfile, EnemyRoster, PhaseTwoProfile};
use stats::{Health, StatValue};
use status_effects::{StatusEffects, StatusKind, StatusTuning};

/// The playable enemy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Anukus,
    Bob,
    Goblin,
    Beholder,
    FireWorm,
    Golem,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Grunt,
        EnemyKind::Anukus,
        EnemyKind::Bob,
        EnemyKind::Goblin,
        EnemyKind::Beholder,
        EnemyKind::FireWorm,
        EnemyKind::Golem,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Grunt => "Grunt",
            EnemyKind::Anukus => "Anukus",
            EnemyKind::Bob => "Bob",
            EnemyKind::Goblin => "Goblin",
            EnemyKind::Beholder => "Beholder",
            EnemyKind::FireWorm => "FireWorm",
            EnemyKind::Golem => "Golem",
        }
    }

    /// Parse a variant name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// Per-tick input for one enemy.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub now: f32,
    pub dt: f32,
    pub position: Vec2,
    /// `None` when the target is absent or dead
    pub target: Option<Vec2>,
}

/// Per-tick output for one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTick {
    pub movement: MovementIntent,
    pub attack: AttackIntent,
    /// The death sequence just finished; despawn the entity
    pub destroyed: bool,
}

impl EnemyTick {
    fn idle() -> Self {
        Self {
            movement: MovementIntent::Hold,
            attack: AttackIntent::None,
            destroyed: false,
        }
    }
}

/// One hostile entity: stats, lifecycle, status effects and behavior.
#[derive(Component)]
pub struct Enemy {
    kind: EnemyKind,
    name: String,
    is_boss: bool,
    health: Health,
    move_speed: StatValue,
    dash_speed: Option<StatValue>,
    phase: BossPhase,
    phase_two: Option<PhaseTwoProfile>,
    lifecycle: Lifecycle,
    death_duration: f32,
    status: StatusEffects,
    status_tuning: StatusTuning,
    speed_drift_tolerance: f32,
    brain: BehaviorStateMachine,
    ai: Box<dyn EnemyAI>,
}

impl Enemy {
    /// Build an enemy from explicit parts. It starts `Spawned`, at full health,
    /// in phase one.
    pub fn new(
        profile: &EnemyProfile,
        ai: Box<dyn EnemyAI>,
        status_tuning: StatusTuning,
        lost_target: LostTargetTuning,
        spawn_position: Vec2,
        now: f32,
    ) -> Self {
        Self {
            kind: ai.kind(),
            name: profile.name.clone(),
            is_boss: profile.is_boss,
            health: Health::new(profile.max_health),
            move_speed: StatValue::new(profile.move_speed),
            dash_speed: profile.dash_speed.map(StatValue::new),
            phase: BossPhase::One,
            phase_two: profile.phase_two,
            lifecycle: Lifecycle::Spawned,
            death_duration: profile.death_duration,
            status: StatusEffects::default(),
            status_tuning,
            speed_drift_tolerance: 0.1,
            brain: BehaviorStateMachine::new(spawn_position, now, lost_target),
            ai,
        }
    }

    /// Build a variant with its roster tuning. `hover_seed` (0.0 - 1.0)
    /// de-synchronises otherwise identical hover motion.
    pub fn from_roster(kind: EnemyKind, roster: &EnemyRoster, spawn_position: Vec2, now: f32, hover_seed: f32) -> Self {
        let profile = roster.profile(kind);
        let mut enemy = Self::new(
            &profile,
            get_enemy_ai(kind, roster, hover_seed),
            roster.status_effects.clone(),
            roster.lost_target.clone(),
            spawn_position,
            now,
        );
        enemy.speed_drift_tolerance = roster.speed_drift_tolerance;
        enemy
    }

    /// Display name used in logs, e.g. "Goblin 2" when a variant repeats.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_boss(&self) -> bool {
        self.is_boss
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn move_speed(&self) -> &StatValue {
        &self.move_speed
    }

    pub fn dash_speed(&self) -> Option<&StatValue> {
        self.dash_speed.as_ref()
    }

    /// Phase-correct, debuff-free move speed.
    pub fn base_move_speed(&self) -> f32 {
        self.move_speed.base()
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }

    pub fn status(&self) -> &StatusEffects {
        &self.status
    }

    pub fn status_tuning(&self) -> &StatusTuning {
        &self.status_tuning
    }

    pub fn behavior(&self) -> &BehaviorStateMachine {
        &self.brain
    }

    /// Spawned → Active.
    pub fn activate(&mut self) -> bool {
        self.lifecycle.activate()
    }

    /// Restore health. Dead enemies cannot be healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.lifecycle.is_active() {
            return 0;
        }
        self.health.heal(amount)
    }

    /// Advance lifecycle, status effects and behavior by one tick, all at
    /// `input.now`.
    pub fn tick(&mut self, input: &TickInput, cues: &mut CueBuffer) -> EnemyTick {
        match self.lifecycle {
            Lifecycle::Spawned | Lifecycle::Destroyed => return EnemyTick::idle(),
            Lifecycle::Dying { .. } => {
                let destroyed = self.lifecycle.advance_death(input.now, self.death_duration);
                if destroyed {
                    cues.push(CombatCue::Destroyed);
                }
                return EnemyTick {
                    destroyed,
                    ..EnemyTick::idle()
                };
            }
            Lifecycle::Active => {}
        }

        self.tick_status_effects(input.now, cues);
        if !self.lifecycle.is_active() {
            return EnemyTick::idle();
        }

        self.reconcile_speed(cues);
        self.update_phase(cues);

        let ctx = BehaviorContext {
            now: input.now,
            dt: input.dt,
            position: input.position,
            target: input.target,
            phase: self.phase,
            move_speed: self.move_speed.current(),
            dash_speed: self.dash_speed.map(|dash| dash.current()),
        };
        let output = self.brain.tick(self.ai.as_ref(), &ctx, cues);

        EnemyTick {
            movement: output.movement,
            attack: output.attack,
            destroyed: false,
        }
    }

    /// Enter phase two once health falls to the threshold. Base stats change
    /// in one step; an active freeze carries over onto the new base.
    pub(crate) fn update_phase(&mut self, cues: &mut CueBuffer) {
        let Some(phase_two) = self.phase_two else {
            return;
        };
        if self.phase >= BossPhase::Two || self.health.fraction() > phase_two.health_threshold {
            return;
        }
        self.phase = BossPhase::Two;
        self.move_speed.set_base(phase_two.move_speed);
        if let (Some(dash), Some(base)) = (self.dash_speed.as_mut(), phase_two.dash_speed) {
            dash.set_base(base);
        }
        cues.push(CombatCue::PhaseChanged {
            phase: self.phase,
            move_speed: self.move_speed.current(),
        });
    }

    /// Active → Dying. Cancels every timer, stops movement and fires the
    /// death cue. Returns true only the first time.
    pub(crate) fn begin_dying(&mut self, now: f32, cues: &mut CueBuffer) -> bool {
        if !self.lifecycle.begin_dying(now) {
            return false;
        }
        let cancelled = self.status.cancel_all();
        if cancelled.burn {
            cues.push(CombatCue::StatusCancelled { kind: StatusKind::Burn });
        }
        if cancelled.freeze {
            cues.push(CombatCue::StatusCancelled { kind: StatusKind::Freeze });
        }
        self.restore_speed();
        self.brain.enter_dying(now, cues);
        cues.push(CombatCue::Died);
        true
    }

    fn reconcile_speed(&mut self, cues: &mut CueBuffer) {
        if let Some(drifted) = self.move_speed.reconcile(self.speed_drift_tolerance) {
            cues.push(CombatCue::SpeedCorrected {
                from: drifted,
                to: self.move_speed.current(),
            });
        }
    }

    #[cfg(test)]
    pub(crate) fn move_speed_mut(&mut self) -> &mut StatValue {
        &mut self.move_speed
    }
}
