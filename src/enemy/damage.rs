//! Damage Pipeline
//!
//! Resolves an incoming hit into applied damage: variant mitigation, health
//! clamp, on-hit status effects, and death. Every edge case is a no-op that
//! reports what happened; nothing here can fail.

use serde::{Deserialize, Serialize};

use super::cues::{CombatCue, CueBuffer};
use super::status_effects::StatusKind;
use super::Enemy;

/// Damage categories. Each carries its own on-hit effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCategory {
    Physical,
    Fire,
    Ice,
    Venom,
}

impl DamageCategory {
    pub fn name(&self) -> &'static str {
        match self {
            DamageCategory::Physical => "Physical",
            DamageCategory::Fire => "Fire",
            DamageCategory::Ice => "Ice",
            DamageCategory::Venom => "Venom",
        }
    }
}

/// A hit as seen by the enemy taking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    pub amount: i32,
    pub category: DamageCategory,
    /// Set by burn ticks so their own damage cannot start another burn
    pub suppress_secondary_effects: bool,
}

impl DamageRequest {
    pub fn new(amount: i32, category: DamageCategory) -> Self {
        Self {
            amount,
            category,
            suppress_secondary_effects: false,
        }
    }

    pub fn burn_tick(amount: i32) -> Self {
        Self {
            amount,
            category: DamageCategory::Fire,
            suppress_secondary_effects: true,
        }
    }
}

/// Why a hit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Enemy has not been activated yet
    NotYetActive,
    /// Health already reached zero
    AlreadyDead,
}

/// On-hit effect triggered by a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SecondaryEffect {
    Burn { damage_per_tick: i32, restarted: bool },
    Freeze { refreshed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    pub requested: i32,
    /// Damage after variant mitigation
    pub final_amount: i32,
    pub health_after: i32,
    pub secondary: Option<SecondaryEffect>,
    /// True only for the hit that started the death sequence
    pub killed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppliedDamage {
    Ignored(IgnoreReason),
    Applied(DamageReport),
}

impl AppliedDamage {
    pub fn report(&self) -> Option<&DamageReport> {
        match self {
            AppliedDamage::Applied(report) => Some(report),
            AppliedDamage::Ignored(_) => None,
        }
    }

    pub fn killed(&self) -> bool {
        self.report().map_or(false, |r| r.killed)
    }
}

impl Enemy {
    /// Apply one hit. The damage receiver contract used by melee, projectiles
    /// and burn ticks alike.
    pub fn take_damage(&mut self, now: f32, request: DamageRequest, cues: &mut CueBuffer) -> AppliedDamage {
        if self.lifecycle == super::Lifecycle::Spawned {
            return AppliedDamage::Ignored(IgnoreReason::NotYetActive);
        }
        if !self.lifecycle.is_active() || self.health.is_depleted() {
            return AppliedDamage::Ignored(IgnoreReason::AlreadyDead);
        }

        let final_amount = self.ai.modify_incoming_damage(request.amount.max(0));
        self.health.apply_damage(final_amount);
        cues.push(CombatCue::Hit {
            category: request.category,
            amount: final_amount,
            health_after: self.health.current(),
        });

        if self.health.is_depleted() {
            let killed = self.begin_dying(now, cues);
            return AppliedDamage::Applied(DamageReport {
                requested: request.amount,
                final_amount,
                health_after: 0,
                secondary: None,
                killed,
            });
        }

        let secondary = if request.suppress_secondary_effects {
            None
        } else {
            self.dispatch_secondary(now, request.category, final_amount, cues)
        };
        self.update_phase(cues);

        AppliedDamage::Applied(DamageReport {
            requested: request.amount,
            final_amount,
            health_after: self.health.current(),
            secondary,
            killed: false,
        })
    }

    fn dispatch_secondary(
        &mut self,
        now: f32,
        category: DamageCategory,
        final_amount: i32,
        cues: &mut CueBuffer,
    ) -> Option<SecondaryEffect> {
        match category {
            DamageCategory::Fire => {
                let damage_per_tick = self.status_tuning.burn_damage_for(final_amount);
                if damage_per_tick <= 0 {
                    return None;
                }
                let restarted = self.apply_burn(now, damage_per_tick, cues)?;
                Some(SecondaryEffect::Burn {
                    damage_per_tick,
                    restarted,
                })
            }
            DamageCategory::Ice => {
                let multiplier = self.status_tuning.freeze_speed_multiplier;
                let duration = self.status_tuning.freeze_duration;
                let refreshed = self.apply_freeze(now, multiplier, duration, cues)?;
                Some(SecondaryEffect::Freeze { refreshed })
            }
            // Extension point
            DamageCategory::Physical | DamageCategory::Venom => None,
        }
    }

    /// Start (or restart) a burn. Returns whether a running burn was
    /// replaced, or `None` if the enemy cannot carry effects.
    pub fn apply_burn(&mut self, now: f32, damage_per_tick: i32, cues: &mut CueBuffer) -> Option<bool> {
        if !self.lifecycle.is_active() || damage_per_tick <= 0 {
            return None;
        }
        let restarted = self.status.start_burn(now, damage_per_tick, &self.status_tuning);
        cues.push(CombatCue::StatusApplied {
            kind: StatusKind::Burn,
            refreshed: restarted,
        });
        Some(restarted)
    }

    /// Start (or refresh) a freeze. Speed is restored to the phase-correct
    /// base before the new multiplier applies. Returns whether a running
    /// freeze was replaced, or `None` if the enemy cannot carry effects.
    pub fn apply_freeze(
        &mut self,
        now: f32,
        speed_multiplier: f32,
        duration: f32,
        cues: &mut CueBuffer,
    ) -> Option<bool> {
        if !self.lifecycle.is_active() {
            return None;
        }
        let speed_multiplier = speed_multiplier.clamp(f32::EPSILON, 1.0);
        if self.status.is_frozen() {
            self.restore_speed();
        }
        let refreshed = self.status.start_freeze(now, speed_multiplier, duration);
        self.move_speed.apply_modifier(speed_multiplier);
        if let Some(dash) = self.dash_speed.as_mut() {
            dash.apply_modifier(speed_multiplier.clamp(0.1, 2.0));
        }
        cues.push(CombatCue::StatusApplied {
            kind: StatusKind::Freeze,
            refreshed,
        });
        Some(refreshed)
    }

    /// Run due burn ticks and freeze expiry at `now`.
    pub(super) fn tick_status_effects(&mut self, now: f32, cues: &mut CueBuffer) {
        while self.status.burn_due(now) {
            if self.health.is_depleted() {
                self.status.abort_burn();
                break;
            }
            let Some(tick) = self.status.consume_burn_tick(now) else {
                break;
            };
            let applied = self.take_damage(now, DamageRequest::burn_tick(tick.damage), cues);
            if let Some(report) = applied.report() {
                cues.push(CombatCue::BurnTick {
                    amount: report.final_amount,
                    ticks_remaining: tick.ticks_remaining,
                });
            }
            if !self.lifecycle.is_active() {
                return;
            }
            if tick.ticks_remaining == 0 {
                cues.push(CombatCue::StatusExpired { kind: StatusKind::Burn });
            }
        }

        if self.status.freeze_expired(now) {
            self.status.end_freeze();
            self.restore_speed();
            cues.push(CombatCue::StatusExpired { kind: StatusKind::Freeze });
        }
    }

    /// Speed back to the current phase base, secondary channel included.
    pub(super) fn restore_speed(&mut self) {
        self.move_speed.clear_modifier();
        if let Some(dash) = self.dash_speed.as_mut() {
            dash.clear_modifier();
        }
    }
}
