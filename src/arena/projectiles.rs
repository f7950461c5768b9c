//! Projectile Systems
//!
//! Enemy projectiles travel in a straight line and damage the first target
//! they touch. Aim spread is rolled once, at launch.

use bevy::prelude::*;

use super::player::CombatTarget;
use super::rng::GameRng;
use crate::combat::events::PlayerDamagedEvent;
use crate::enemy::behavior::ProjectileLaunch;

#[derive(Component, Debug, Clone)]
pub struct EnemyProjectile {
    pub owner: Entity,
    pub owner_name: String,
    pub velocity: Vec2,
    pub damage: i32,
    pub radius: f32,
    /// Seconds until the projectile fizzles
    pub remaining_lifetime: f32,
}

/// Rotate `direction` by a random angle in `[-spread, spread]` degrees.
pub fn apply_spread(rng: &mut GameRng, direction: Vec2, spread_degrees: f32) -> Vec2 {
    if spread_degrees <= 0.0 {
        return direction;
    }
    let angle = rng.random_range(-spread_degrees, spread_degrees).to_radians();
    Vec2::from_angle(angle).rotate(direction)
}

pub fn spawn_projectile(
    commands: &mut Commands,
    rng: &mut GameRng,
    owner: Entity,
    owner_name: &str,
    launch: &ProjectileLaunch,
) -> Entity {
    let direction = apply_spread(rng, launch.direction, launch.spread_degrees);
    commands
        .spawn((
            EnemyProjectile {
                owner,
                owner_name: owner_name.to_string(),
                velocity: direction * launch.speed,
                damage: launch.damage,
                radius: launch.radius,
                remaining_lifetime: launch.lifetime,
            },
            Transform::from_translation(launch.origin.extend(0.0)),
        ))
        .id()
}

/// Move projectiles along their velocity and remove expired ones.
pub fn move_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut projectiles: Query<(Entity, &mut EnemyProjectile, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        projectile.remaining_lifetime -= dt;
        if projectile.remaining_lifetime <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation += (projectile.velocity * dt).extend(0.0);
    }
}

/// Damage the target on contact and consume the projectile.
pub fn process_projectile_hits(
    mut commands: Commands,
    projectiles: Query<(Entity, &EnemyProjectile, &Transform), Without<CombatTarget>>,
    targets: Query<(&Transform, &CombatTarget)>,
    mut player_hits: EventWriter<PlayerDamagedEvent>,
) {
    for (entity, projectile, transform) in projectiles.iter() {
        let position = transform.translation.truncate();
        let hit = targets.iter().any(|(target_transform, target)| {
            target.is_alive()
                && target_transform.translation.truncate().distance(position) <= projectile.radius + target.hit_radius
        });
        if hit {
            player_hits.send(PlayerDamagedEvent {
                source: projectile.owner,
                source_name: projectile.owner_name.clone(),
                amount: projectile.damage,
                verb: "shoots",
            });
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_spread_keeps_direction() {
        let mut rng = GameRng::from_seed(1);
        assert_eq!(apply_spread(&mut rng, Vec2::X, 0.0), Vec2::X);
    }

    #[test]
    fn test_spread_stays_within_cone() {
        let mut rng = GameRng::from_seed(7);
        for _ in 0..100 {
            let aimed = apply_spread(&mut rng, Vec2::X, 5.0);
            let degrees = aimed.y.atan2(aimed.x).to_degrees();
            assert!(degrees.abs() <= 5.0 + 1e-3, "Spread {} exceeds 5 degrees", degrees);
            assert!((aimed.length() - 1.0).abs() < 1e-4, "Spread must not change speed");
        }
    }
}
