//! Coin drops rolled when an enemy dies.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::rng::GameRng;
use crate::combat::events::EnemyDeathEvent;
use crate::combat::log::{CombatLog, CombatLogEventType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoinType {
    Copper,
    Silver,
    Gold,
}

/// One weighted entry of a drop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDropChance {
    pub coin: CoinType,
    /// Relative weight against the other entries
    pub weight: f32,
    pub min_amount: u32,
    pub max_amount: u32,
}

/// What an enemy may drop on death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTable {
    pub entries: Vec<CoinDropChance>,
    /// Skip the drop-chance roll entirely
    pub guaranteed: bool,
    /// Percent chance (0-100) to drop anything when not guaranteed
    pub drop_chance: f32,
}

impl Default for DropTable {
    fn default() -> Self {
        Self {
            entries: vec![
                CoinDropChance { coin: CoinType::Copper, weight: 70.0, min_amount: 1, max_amount: 3 },
                CoinDropChance { coin: CoinType::Silver, weight: 25.0, min_amount: 1, max_amount: 2 },
                CoinDropChance { coin: CoinType::Gold, weight: 5.0, min_amount: 1, max_amount: 1 },
            ],
            guaranteed: true,
            drop_chance: 100.0,
        }
    }
}

impl DropTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            guaranteed: false,
            drop_chance: 0.0,
        }
    }

    /// Roll a drop. `None` when the chance roll fails or the table is empty.
    pub fn roll(&self, rng: &mut GameRng) -> Option<(CoinType, u32)> {
        if self.entries.is_empty() {
            return None;
        }
        if !self.guaranteed && rng.random_range(0.0, 100.0) > self.drop_chance {
            return None;
        }

        let total: f32 = self.entries.iter().map(|e| e.weight.max(0.0)).sum();
        let pick = rng.random_range(0.0, total);
        let mut accumulated = 0.0;
        let entry = self
            .entries
            .iter()
            .find(|e| {
                accumulated += e.weight.max(0.0);
                pick <= accumulated
            })
            .unwrap_or(&self.entries[0]);

        let amount = rng.random_inclusive(entry.min_amount, entry.max_amount);
        (amount > 0).then_some((entry.coin, amount))
    }
}

/// Drop table carried by an enemy entity.
#[derive(Component, Debug, Clone)]
pub struct CoinDropper(pub DropTable);

/// Coins dropped during the encounter.
#[derive(Resource, Debug, Default, Clone)]
pub struct LootLedger {
    pub coins: HashMap<CoinType, u32>,
}

impl LootLedger {
    pub fn total(&self) -> u32 {
        self.coins.values().sum()
    }

    pub fn add(&mut self, coin: CoinType, amount: u32) {
        *self.coins.entry(coin).or_insert(0) += amount;
    }
}

/// Roll loot for every enemy that died this frame.
pub fn drop_loot_on_death(
    mut deaths: EventReader<EnemyDeathEvent>,
    droppers: Query<&CoinDropper>,
    mut rng: ResMut<GameRng>,
    mut ledger: ResMut<LootLedger>,
    mut combat_log: ResMut<CombatLog>,
) {
    for death in deaths.read() {
        let Ok(dropper) = droppers.get(death.entity) else {
            continue;
        };
        if let Some((coin, amount)) = dropper.0.roll(&mut rng) {
            ledger.add(coin, amount);
            combat_log.log(
                CombatLogEventType::Loot,
                format!("{} dropped {}x {:?}", death.name, amount, coin),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guaranteed_drop_always_drops() {
        let table = DropTable::default();
        let mut rng = GameRng::from_seed(3);
        for _ in 0..50 {
            let (_, amount) = table.roll(&mut rng).expect("guaranteed table must drop");
            assert!((1..=3).contains(&amount));
        }
    }

    #[test]
    fn test_zero_chance_never_drops() {
        let table = DropTable {
            guaranteed: false,
            drop_chance: 0.0,
            ..DropTable::default()
        };
        let mut rng = GameRng::from_seed(3);
        for _ in 0..50 {
            assert!(table.roll(&mut rng).is_none());
        }
    }

    #[test]
    fn test_single_entry_table_picks_it() {
        let table = DropTable {
            entries: vec![CoinDropChance { coin: CoinType::Gold, weight: 1.0, min_amount: 2, max_amount: 2 }],
            guaranteed: true,
            drop_chance: 100.0,
        };
        let mut rng = GameRng::from_seed(9);
        assert_eq!(table.roll(&mut rng), Some((CoinType::Gold, 2)));
    }

    #[test]
    fn test_empty_table_drops_nothing() {
        let mut rng = GameRng::from_seed(9);
        assert!(DropTable::empty().roll(&mut rng).is_none());
    }
}
