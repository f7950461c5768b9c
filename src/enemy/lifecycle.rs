//! Entity lifecycle: Spawned → Active → Dying → Destroyed
//!
//! Linear, no cycles, no skipping. Only `Active` enemies think, take damage
//! or carry status effects.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Created by the spawner, not yet ticked
    Spawned,
    /// Behavior and status effects run
    Active,
    /// Death sequence playing; destroyed once it elapses
    Dying { since: f32 },
    /// Ready to be despawned
    Destroyed,
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Spawned | Lifecycle::Active)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Lifecycle::Spawned => "Spawned",
            Lifecycle::Active => "Active",
            Lifecycle::Dying { .. } => "Dying",
            Lifecycle::Destroyed => "Destroyed",
        }
    }

    /// Spawned → Active. Returns false from any other state.
    pub fn activate(&mut self) -> bool {
        if *self == Lifecycle::Spawned {
            *self = Lifecycle::Active;
            true
        } else {
            false
        }
    }

    /// Active → Dying. Returns true only on the transition itself, so callers
    /// can fire their death notification exactly once.
    pub fn begin_dying(&mut self, now: f32) -> bool {
        if self.is_active() {
            *self = Lifecycle::Dying { since: now };
            true
        } else {
            false
        }
    }

    /// Dying → Destroyed once `death_duration` has elapsed. Returns true on
    /// the transition.
    pub fn advance_death(&mut self, now: f32, death_duration: f32) -> bool {
        match *self {
            Lifecycle::Dying { since } if now - since >= death_duration => {
                *self = Lifecycle::Destroyed;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_runs_in_order() {
        let mut lifecycle = Lifecycle::Spawned;
        assert!(lifecycle.activate());
        assert!(lifecycle.begin_dying(2.0));
        assert!(!lifecycle.advance_death(2.5, 1.5), "Death sequence still playing");
        assert!(lifecycle.advance_death(3.5, 1.5));
        assert_eq!(lifecycle, Lifecycle::Destroyed);
    }

    #[test]
    fn test_begin_dying_only_once() {
        let mut lifecycle = Lifecycle::Active;
        assert!(lifecycle.begin_dying(1.0));
        assert!(!lifecycle.begin_dying(1.1), "Second death must be a no-op");
        assert_eq!(lifecycle, Lifecycle::Dying { since: 1.0 });
    }

    #[test]
    fn test_cannot_skip_active() {
        let mut lifecycle = Lifecycle::Spawned;
        assert!(!lifecycle.begin_dying(0.0), "Spawned cannot jump straight to Dying");
        assert!(!lifecycle.advance_death(10.0, 0.1));
        assert_eq!(lifecycle, Lifecycle::Spawned);
    }

    #[test]
    fn test_destroyed_is_terminal() {
        let mut lifecycle = Lifecycle::Destroyed;
        assert!(!lifecycle.activate());
        assert!(!lifecycle.begin_dying(0.0));
        assert!(!lifecycle.is_alive());
    }
}
