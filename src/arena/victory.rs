//! Boss arena victory.
//!
//! Counts registered bosses and declares victory a short moment after the
//! last one falls, so the final death sequence gets to play out.

use bevy::prelude::*;

use crate::combat::events::EnemyDeathEvent;
use crate::combat::log::{CombatLog, CombatLogEventType};

/// Delay between the last boss death and the victory declaration.
pub const VICTORY_DELAY_SECS: f32 = 1.5;

#[derive(Resource, Debug, Clone)]
pub struct BossArena {
    pub bosses_registered: u32,
    pub bosses_defeated: u32,
    pub victory_delay: f32,
    victory_at: Option<f32>,
    victory: bool,
}

impl Default for BossArena {
    fn default() -> Self {
        Self {
            bosses_registered: 0,
            bosses_defeated: 0,
            victory_delay: VICTORY_DELAY_SECS,
            victory_at: None,
            victory: false,
        }
    }
}

impl BossArena {
    pub fn register_boss(&mut self) {
        self.bosses_registered += 1;
    }

    pub fn is_victory(&self) -> bool {
        self.victory
    }

    pub fn victory_pending(&self) -> bool {
        self.victory_at.is_some() && !self.victory
    }

    /// Count one boss death at `now`. Arms the victory timer once every
    /// registered boss is down.
    pub fn boss_defeated(&mut self, now: f32) {
        self.bosses_defeated += 1;
        if self.bosses_registered > 0 && self.bosses_defeated >= self.bosses_registered && self.victory_at.is_none() {
            self.victory_at = Some(now + self.victory_delay);
        }
    }

    /// Returns true on the tick victory is declared.
    pub fn update(&mut self, now: f32) -> bool {
        match self.victory_at {
            Some(at) if !self.victory && now >= at => {
                self.victory = true;
                true
            }
            _ => false,
        }
    }
}

/// Death callback consumer: count boss deaths.
pub fn track_boss_deaths(time: Res<Time>, mut deaths: EventReader<EnemyDeathEvent>, mut arena: ResMut<BossArena>) {
    let now = time.elapsed_secs();
    for death in deaths.read() {
        if death.is_boss {
            arena.boss_defeated(now);
        }
    }
}

pub fn declare_victory(time: Res<Time>, mut arena: ResMut<BossArena>, mut combat_log: ResMut<CombatLog>) {
    if arena.update(time.elapsed_secs()) {
        info!("All bosses defeated - victory!");
        combat_log.log(
            CombatLogEventType::EncounterEvent,
            "All bosses defeated - victory!".to_string(),
        );
    }
}
