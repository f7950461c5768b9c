//! The player as seen by enemies
//!
//! Enemies only need a position to chase and something to hit. In headless
//! encounters the player stands still and auto-fires a weapon that cycles
//! through damage categories, hitting the nearest active enemy in range.

use bevy::prelude::*;

use crate::combat::events::DamageEvent;
use crate::enemy::damage::DamageCategory;
use crate::enemy::stats::Health;
use crate::enemy::Enemy;

/// Name used for the player in logs and damage events.
pub const PLAYER_NAME: &str = "Player";

/// Something enemies target and damage.
#[derive(Component, Debug, Clone)]
pub struct CombatTarget {
    pub health: Health,
    /// Radius projectiles must reach to connect
    pub hit_radius: f32,
}

impl CombatTarget {
    pub fn new(max_health: i32) -> Self {
        Self {
            health: Health::new(max_health),
            hit_radius: 0.5,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }
}

/// Auto-firing weapon with a damage category rotation.
#[derive(Component, Debug, Clone)]
pub struct PlayerWeapon {
    pub rotation: Vec<DamageCategory>,
    pub damage: i32,
    pub fire_interval: f32,
    pub range: f32,
    next_shot: usize,
    cooldown: f32,
}

impl PlayerWeapon {
    pub fn new(rotation: Vec<DamageCategory>, damage: i32, fire_interval: f32, range: f32) -> Self {
        Self {
            rotation,
            damage,
            fire_interval,
            range,
            next_shot: 0,
            cooldown: 0.0,
        }
    }

    /// Category of the next shot, advancing the rotation.
    pub fn next_category(&mut self) -> DamageCategory {
        if self.rotation.is_empty() {
            return DamageCategory::Physical;
        }
        let category = self.rotation[self.next_shot % self.rotation.len()];
        self.next_shot = (self.next_shot + 1) % self.rotation.len();
        category
    }
}

/// The target provider: position of the first living target, if any.
/// A dead or missing player reads as an absent target.
pub fn current_target(targets: &Query<(&Transform, &CombatTarget), Without<Enemy>>) -> Option<Vec2> {
    targets
        .iter()
        .find(|(_, target)| target.is_alive())
        .map(|(transform, _)| transform.translation.truncate())
}

/// Fire at the nearest active enemy in range whenever the weapon is ready.
pub fn player_auto_attack(
    time: Res<Time>,
    mut players: Query<(&Transform, &CombatTarget, &mut PlayerWeapon), Without<Enemy>>,
    enemies: Query<(Entity, &Transform, &Enemy)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let dt = time.delta_secs();
    for (transform, target, mut weapon) in players.iter_mut() {
        if !target.is_alive() {
            continue;
        }
        weapon.cooldown = (weapon.cooldown - dt).max(0.0);
        if weapon.cooldown > 0.0 {
            continue;
        }

        let position = transform.translation.truncate();
        let nearest = enemies
            .iter()
            .filter(|(_, _, enemy)| enemy.lifecycle().is_active())
            .map(|(entity, enemy_transform, _)| {
                (entity, enemy_transform.translation.truncate().distance(position))
            })
            .filter(|(_, distance)| *distance <= weapon.range)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((entity, _)) = nearest else {
            continue;
        };
        let category = weapon.next_category();
        damage_events.send(DamageEvent {
            target: entity,
            amount: weapon.damage,
            category,
            source: PLAYER_NAME.to_string(),
        });
        weapon.cooldown = weapon.fire_interval;
    }
}
