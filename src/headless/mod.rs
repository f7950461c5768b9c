//! Headless mode for automated encounters
//!
//! This module runs enemy encounters without any graphical output on a fixed
//! simulated clock, suitable for automated testing and balance runs.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless encounter
//! cargo run --release -- --encounter encounter.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "enemies": [
//!     { "variant": "Anukus", "position": [0.0, 6.0] },
//!     { "variant": "Goblin", "position": [4.0, -3.0] }
//!   ],
//!   "player": { "max_health": 150, "weapon_rotation": ["Fire", "Ice"] },
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::EncounterConfig;
pub use runner::{build_encounter_app, run_encounter, EncounterOutcome, EncounterResult};
