//! Health and movement stats
//!
//! `StatValue` keeps a designer-set base apart from the value the simulation
//! actually moves with, so debuffs can be layered and removed across phase
//! changes without losing the base.

use serde::{Deserialize, Serialize};

/// Hit points of one enemy. `0 <= current <= maximum` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    maximum: i32,
}

impl Health {
    /// Full health. `maximum` must be positive; the roster validates this.
    pub fn new(maximum: i32) -> Self {
        debug_assert!(maximum > 0, "max health must be positive");
        let maximum = maximum.max(1);
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Current health as a fraction of maximum (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.maximum as f32
    }

    /// Remove `amount` (negative amounts are ignored). Returns how much was
    /// actually removed.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = (self.current - amount.max(0)).max(0);
        before - self.current
    }

    /// Restore `amount`, clamped to maximum. Returns how much was restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = (self.current + amount.max(0)).min(self.maximum);
        self.current - before
    }

    /// Change the maximum and refill to it.
    pub fn set_maximum(&mut self, maximum: i32) {
        self.maximum = maximum.max(1);
        self.current = self.maximum;
    }
}

/// A speed-like stat: a base value and the value currently in effect.
///
/// The current value is always derived as `base * modifier`. It is never
/// cached across a base change, so a phase transition during a debuff still
/// restores to the new base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    base: f32,
    current: f32,
    modifier: f32,
}

impl StatValue {
    pub fn new(base: f32) -> Self {
        Self {
            base,
            current: base,
            modifier: 1.0,
        }
    }

    /// Phase-correct, debuff-free value.
    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Active multiplier (1.0 when no debuff is applied).
    pub fn modifier(&self) -> f32 {
        self.modifier
    }

    pub fn is_modified(&self) -> bool {
        self.modifier != 1.0
    }

    /// Replace the base (phase change). Any active modifier carries over.
    pub fn set_base(&mut self, base: f32) {
        self.base = base;
        self.current = self.expected();
    }

    /// Set the active multiplier. Replaces, never compounds with, a previous one.
    pub fn apply_modifier(&mut self, modifier: f32) {
        self.modifier = modifier;
        self.current = self.expected();
    }

    /// Drop the modifier; current becomes exactly the base.
    pub fn clear_modifier(&mut self) {
        self.modifier = 1.0;
        self.current = self.base;
    }

    /// Snap `current` back if it drifted more than `tolerance` (a fraction)
    /// above `base * modifier`. Returns the drifted value when a correction
    /// was made.
    pub fn reconcile(&mut self, tolerance: f32) -> Option<f32> {
        let expected = self.expected();
        if self.current > expected * (1.0 + tolerance) {
            let drifted = self.current;
            self.current = expected;
            Some(drifted)
        } else {
            None
        }
    }

    /// Overwrite the current value directly. Only used to model external
    /// writers in tests of the reconcile path.
    #[cfg(test)]
    pub(crate) fn force_current(&mut self, value: f32) {
        self.current = value;
    }

    fn expected(&self) -> f32 {
        if self.modifier == 1.0 {
            self.base
        } else {
            self.base * self.modifier
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(50);
        assert_eq!(health.apply_damage(30), 30);
        assert_eq!(health.apply_damage(30), 20, "Only the remaining 20 HP can be removed");
        assert_eq!(health.current(), 0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_health_ignores_negative_damage() {
        let mut health = Health::new(50);
        assert_eq!(health.apply_damage(-10), 0);
        assert_eq!(health.current(), 50, "Negative damage must not heal");
    }

    #[test]
    fn test_health_heal_clamps_at_maximum() {
        let mut health = Health::new(100);
        health.apply_damage(30);
        assert_eq!(health.heal(50), 30);
        assert_eq!(health.current(), 100);
    }

    #[test]
    fn test_health_set_maximum_refills() {
        let mut health = Health::new(100);
        health.apply_damage(60);
        health.set_maximum(150);
        assert_eq!(health.current(), 150);
        assert_eq!(health.maximum(), 150);
    }

    #[test]
    fn test_health_fraction() {
        let mut health = Health::new(100);
        health.apply_damage(60);
        assert!((health.fraction() - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stat_modifier_replaces_instead_of_compounding() {
        let mut speed = StatValue::new(6.0);
        speed.apply_modifier(0.5);
        speed.apply_modifier(0.5);
        assert_eq!(speed.current(), 3.0, "Re-applying the same multiplier must not stack");
    }

    #[test]
    fn test_stat_clear_restores_exact_base() {
        let mut speed = StatValue::new(5.0);
        speed.apply_modifier(2.0 / 3.0);
        speed.clear_modifier();
        assert_eq!(speed.current(), 5.0);
        assert!(!speed.is_modified());
    }

    #[test]
    fn test_stat_set_base_keeps_modifier() {
        let mut speed = StatValue::new(5.0);
        speed.apply_modifier(0.5);
        speed.set_base(7.0);
        assert_eq!(speed.current(), 3.5);
        speed.clear_modifier();
        assert_eq!(speed.current(), 7.0, "Restoration must use the new base");
    }

    #[test]
    fn test_stat_reconcile_snaps_drift() {
        let mut speed = StatValue::new(5.0);
        speed.force_current(6.0);
        assert_eq!(speed.reconcile(0.1), Some(6.0));
        assert_eq!(speed.current(), 5.0);
    }

    #[test]
    fn test_stat_reconcile_tolerates_small_drift() {
        let mut speed = StatValue::new(5.0);
        speed.force_current(5.4);
        assert_eq!(speed.reconcile(0.1), None, "Drift under 10% is left alone");
    }
}
