//! Rageborn - enemy and boss combat simulation
//!
//! Enemies run a per-entity behavior state machine, take damage through a
//! single pipeline, carry burn and freeze status effects and, for bosses,
//! switch to a harder second phase at half health.
//!
//! This library exposes the simulation core, its Bevy plugins and the
//! headless runner for testing and reuse.

pub mod arena;
pub mod cli;
pub mod combat;
pub mod enemy;
pub mod headless;

// Re-export commonly used types
pub use arena::ArenaPlugin;
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::CombatPlugin;
pub use enemy::roster::EnemyRoster;
pub use enemy::{Enemy, EnemyKind};
pub use headless::{EncounterConfig, EncounterOutcome, EncounterResult};
