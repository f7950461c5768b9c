//! Status Effect Scheduler
//!
//! Burn (damage over time) and freeze (movement slow) are modelled as explicit
//! deadline fields checked once per tick. Each kind lives in an `Option`, so an
//! entity can never hold two timers of the same kind: starting an effect
//! replaces the previous one before the new deadline is armed.
//!
//! The scheduler only keeps time. Applying burn damage and writing speed
//! modifiers is done by the owning [`Enemy`](super::Enemy), which has access
//! to health and stats.

use serde::{Deserialize, Serialize};

/// Kinds of timed effects an enemy can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Burn,
    Freeze,
}

impl StatusKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Burn => "Burn",
            StatusKind::Freeze => "Freeze",
        }
    }
}

/// Timing and strength of on-hit status effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusTuning {
    /// Seconds between burn ticks
    pub burn_tick_interval: f32,
    /// Number of ticks in one burn
    pub burn_ticks: u32,
    /// Fraction of a Fire hit's final damage dealt per burn tick
    pub burn_damage_ratio: f32,
    /// Speed multiplier while frozen, in (0, 1]
    pub freeze_speed_multiplier: f32,
    /// Freeze duration in seconds
    pub freeze_duration: f32,
}

impl Default for StatusTuning {
    fn default() -> Self {
        Self {
            burn_tick_interval: 0.8,
            burn_ticks: 3,
            burn_damage_ratio: 0.2,
            freeze_speed_multiplier: 2.0 / 3.0,
            freeze_duration: 1.2,
        }
    }
}

impl StatusTuning {
    pub fn validate(&self) -> Result<(), String> {
        if self.burn_tick_interval <= 0.0 {
            return Err(format!("burn_tick_interval must be positive, got {}", self.burn_tick_interval));
        }
        if self.burn_ticks == 0 {
            return Err("burn_ticks must be at least 1".to_string());
        }
        if !(self.freeze_speed_multiplier > 0.0 && self.freeze_speed_multiplier <= 1.0) {
            return Err(format!(
                "freeze_speed_multiplier must be in (0, 1], got {}",
                self.freeze_speed_multiplier
            ));
        }
        if self.freeze_duration <= 0.0 {
            return Err(format!("freeze_duration must be positive, got {}", self.freeze_duration));
        }
        Ok(())
    }

    /// Per-tick burn damage for a Fire hit that dealt `final_amount`.
    pub fn burn_damage_for(&self, final_amount: i32) -> i32 {
        (final_amount as f32 * self.burn_damage_ratio).round() as i32
    }
}

/// A running burn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnEffect {
    pub damage_per_tick: i32,
    pub ticks_remaining: u32,
    pub tick_interval: f32,
    next_tick_at: f32,
}

impl BurnEffect {
    pub fn next_tick_at(&self) -> f32 {
        self.next_tick_at
    }
}

/// A running freeze.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeEffect {
    pub speed_multiplier: f32,
    pub applied_at: f32,
    expires_at: f32,
}

impl FreezeEffect {
    pub fn expires_at(&self) -> f32 {
        self.expires_at
    }

    pub fn remaining(&self, now: f32) -> f32 {
        (self.expires_at - now).max(0.0)
    }
}

/// One burn tick taken off the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnTick {
    pub damage: i32,
    /// Ticks left after this one
    pub ticks_remaining: u32,
}

/// What was running when effects were cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cancelled {
    pub burn: bool,
    pub freeze: bool,
}

/// Per-enemy burn and freeze timers.
#[derive(Debug, Clone, Default)]
pub struct StatusEffects {
    burn: Option<BurnEffect>,
    freeze: Option<FreezeEffect>,
}

impl StatusEffects {
    pub fn burn(&self) -> Option<&BurnEffect> {
        self.burn.as_ref()
    }

    pub fn freeze(&self) -> Option<&FreezeEffect> {
        self.freeze.as_ref()
    }

    pub fn is_burning(&self) -> bool {
        self.burn.is_some()
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze.is_some()
    }

    /// Start a burn, cancelling any running one first. The first tick lands
    /// one interval after `now`. Returns true if a burn was restarted.
    pub fn start_burn(&mut self, now: f32, damage_per_tick: i32, tuning: &StatusTuning) -> bool {
        let restarted = self.burn.take().is_some();
        self.burn = Some(BurnEffect {
            damage_per_tick,
            ticks_remaining: tuning.burn_ticks,
            tick_interval: tuning.burn_tick_interval,
            next_tick_at: now + tuning.burn_tick_interval,
        });
        restarted
    }

    /// Whether a burn tick is due at `now`.
    pub fn burn_due(&self, now: f32) -> bool {
        self.burn.map_or(false, |burn| now >= burn.next_tick_at)
    }

    /// Take the next due burn tick off the schedule. Clears the burn after
    /// its last tick.
    pub fn consume_burn_tick(&mut self, now: f32) -> Option<BurnTick> {
        let burn = self.burn.as_mut()?;
        if now < burn.next_tick_at {
            return None;
        }
        burn.ticks_remaining = burn.ticks_remaining.saturating_sub(1);
        let tick = BurnTick {
            damage: burn.damage_per_tick,
            ticks_remaining: burn.ticks_remaining,
        };
        if burn.ticks_remaining == 0 {
            self.burn = None;
        } else {
            burn.next_tick_at += burn.tick_interval;
        }
        Some(tick)
    }

    /// Drop the burn without dealing further ticks.
    pub fn abort_burn(&mut self) -> bool {
        self.burn.take().is_some()
    }

    /// Start a freeze, cancelling any running one first. Returns true if a
    /// freeze was refreshed.
    pub fn start_freeze(&mut self, now: f32, speed_multiplier: f32, duration: f32) -> bool {
        let refreshed = self.freeze.take().is_some();
        self.freeze = Some(FreezeEffect {
            speed_multiplier,
            applied_at: now,
            expires_at: now + duration,
        });
        refreshed
    }

    /// Whether the running freeze has reached its expiry at `now`.
    pub fn freeze_expired(&self, now: f32) -> bool {
        self.freeze.map_or(false, |freeze| now >= freeze.expires_at)
    }

    pub fn end_freeze(&mut self) -> Option<FreezeEffect> {
        self.freeze.take()
    }

    /// Cancel everything outstanding.
    pub fn cancel_all(&mut self) -> Cancelled {
        Cancelled {
            burn: self.burn.take().is_some(),
            freeze: self.freeze.take().is_some(),
        }
    }
}
