//! Combat logging
//!
//! Records all combat events for display and post-encounter analysis.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in encounter time (seconds since the encounter started)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Machine-readable payload for aggregation queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredEventData>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt to an enemy
    Damage,
    /// Burn or freeze applied, expired or cancelled
    StatusEffect,
    /// Behavior state entered
    StateChange,
    /// Boss phase transition
    PhaseChange,
    /// Enemy or player died
    Death,
    /// Enemy attack on the player
    Attack,
    /// Coins dropped
    Loot,
    /// Encounter event (start, victory, timeout, ...)
    EncounterEvent,
}

/// Structured payloads behind log lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructuredEventData {
    Damage {
        source: String,
        target: String,
        category: String,
        amount: i32,
        is_killing_blow: bool,
    },
    Death {
        target: String,
        killer: Option<String>,
    },
}

/// Per-enemy summary written alongside the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyMetadata {
    pub name: String,
    pub kind: String,
    pub max_health: i32,
    pub final_health: i32,
    pub survived: bool,
    pub damage_taken: i32,
    pub final_phase: u8,
}

/// Encounter-level summary written alongside the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterMetadata {
    pub outcome: String,
    pub duration_secs: f32,
    pub random_seed: Option<u64>,
    pub player_final_health: i32,
    pub coins_collected: u32,
    pub enemies: Vec<EnemyMetadata>,
}

#[derive(Serialize)]
struct SavedEncounterLog<'a> {
    metadata: &'a EncounterMetadata,
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current encounter time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new encounter
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    /// Log damage with its structured payload
    pub fn log_damage(
        &mut self,
        source: String,
        target: String,
        category: String,
        amount: i32,
        is_killing_blow: bool,
        message: String,
    ) {
        let data = StructuredEventData::Damage {
            source,
            target,
            category,
            amount,
            is_killing_blow,
        };
        self.push(CombatLogEventType::Damage, message, Some(data));
    }

    /// Log a death with its structured payload
    pub fn log_death(&mut self, target: String, killer: Option<String>, message: String) {
        let data = StructuredEventData::Death { target, killer };
        self.push(CombatLogEventType::Death, message, Some(data));
    }

    fn push(&mut self, event_type: CombatLogEventType, message: String, data: Option<StructuredEventData>) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            data,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    fn damage_entries(&self) -> impl Iterator<Item = (&str, &str, &str, i32, bool)> {
        self.entries.iter().filter_map(|e| match &e.data {
            Some(StructuredEventData::Damage {
                source,
                target,
                category,
                amount,
                is_killing_blow,
            }) => Some((
                source.as_str(),
                target.as_str(),
                category.as_str(),
                *amount,
                *is_killing_blow,
            )),
            _ => None,
        })
    }

    /// Total damage a target has taken
    pub fn damage_taken_by(&self, target: &str) -> i32 {
        self.damage_entries()
            .filter(|(_, t, _, _, _)| *t == target)
            .map(|(_, _, _, amount, _)| amount)
            .sum()
    }

    /// Damage a target has taken, grouped by damage category
    pub fn damage_by_category(&self, target: &str) -> HashMap<String, i32> {
        let mut totals = HashMap::new();
        for (_, t, category, amount, _) in self.damage_entries() {
            if t == target {
                *totals.entry(category.to_string()).or_insert(0) += amount;
            }
        }
        totals
    }

    /// Damage dealt by a source, grouped by target
    pub fn damage_by_source(&self, source: &str) -> HashMap<String, i32> {
        let mut totals = HashMap::new();
        for (s, target, _, amount, _) in self.damage_entries() {
            if s == source {
                *totals.entry(target.to_string()).or_insert(0) += amount;
            }
        }
        totals
    }

    /// Number of killing blows landed by a source
    pub fn killing_blows(&self, source: &str) -> usize {
        self.damage_entries()
            .filter(|(s, _, _, _, killing)| *s == source && *killing)
            .count()
    }

    /// Names of everything that died, in order
    pub fn deaths(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match &e.data {
                Some(StructuredEventData::Death { target, .. }) => Some(target.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Save the log and its summary as pretty JSON. Returns the path written.
    pub fn save_to_file(&self, metadata: &EncounterMetadata, output_path: Option<&str>) -> Result<String, String> {
        let filename = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("encounter_logs/encounter_{}.json", stamp)
            }
        };

        if let Some(parent) = Path::new(&filename).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create log directory {}: {}", parent.display(), e))?;
            }
        }

        let saved = SavedEncounterLog {
            metadata,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved).map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        std::fs::write(&filename, json).map_err(|e| format!("Failed to write {}: {}", filename, e))?;
        Ok(filename)
    }
}
