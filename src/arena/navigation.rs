//! Path following
//!
//! The arena is open ground, so "pathing" is a straight walk to the
//! destination. Enemies hand the follower a destination and speed; kinematic
//! moves and scripted placement switch it off.

use bevy::prelude::*;

/// Distance at which a destination counts as reached.
pub const ARRIVAL_DISTANCE: f32 = 0.05;

#[derive(Component, Debug, Clone, Default)]
pub struct PathFollower {
    destination: Option<Vec2>,
    speed: f32,
}

impl PathFollower {
    pub fn set_destination(&mut self, destination: Vec2) {
        self.destination = Some(destination);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn stop(&mut self) {
        self.destination = None;
    }

    pub fn is_active(&self) -> bool {
        self.destination.is_some()
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Next position after `dt` seconds of walking from `position`.
    pub fn step(&mut self, position: Vec2, dt: f32) -> Vec2 {
        let Some(destination) = self.destination else {
            return position;
        };
        let to_go = destination - position;
        let distance = to_go.length();
        let travel = self.speed * dt;
        if distance <= ARRIVAL_DISTANCE || travel >= distance {
            self.destination = None;
            return destination;
        }
        position + to_go / distance * travel
    }
}

/// Move every active follower towards its destination.
pub fn follow_paths(time: Res<Time>, mut followers: Query<(&mut PathFollower, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut follower, mut transform) in followers.iter_mut() {
        if !follower.is_active() {
            continue;
        }
        let next = follower.step(transform.translation.truncate(), dt);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_at_speed() {
        let mut follower = PathFollower::default();
        follower.set_speed(2.0);
        follower.set_destination(Vec2::new(10.0, 0.0));
        let next = follower.step(Vec2::ZERO, 0.5);
        assert_eq!(next, Vec2::new(1.0, 0.0));
        assert!(follower.is_active());
    }

    #[test]
    fn test_step_arrives_without_overshoot() {
        let mut follower = PathFollower::default();
        follower.set_speed(100.0);
        follower.set_destination(Vec2::new(1.0, 1.0));
        let next = follower.step(Vec2::ZERO, 0.5);
        assert_eq!(next, Vec2::new(1.0, 1.0));
        assert!(!follower.is_active(), "Follower disables itself on arrival");
    }

    #[test]
    fn test_stopped_follower_does_not_move() {
        let mut follower = PathFollower::default();
        follower.set_speed(5.0);
        follower.set_destination(Vec2::X);
        follower.stop();
        assert_eq!(follower.step(Vec2::ZERO, 1.0), Vec2::ZERO);
    }
}
