//! Demo-mode driver
//!
//! Pure pursuit over the track waypoints: aim at the current target, move on
//! once close enough, lift off the throttle when the car points the wrong way.

use super::track::Track;
use super::vehicle::{Steer, Throttle, Vehicle};
use crate::{normalize_angle, yaw_towards};

/// Distance at which a waypoint counts as reached
pub const REACH_RADIUS: f32 = 10.0;
/// Heading error tolerated without steering (radians)
const STEER_DEADBAND: f32 = 0.05;
/// Heading error above which the autopilot coasts while turning (radians)
const LIFT_OFF_ERROR: f32 = 0.5;

/// Controls for one tick and the waypoint to aim at next time
pub fn autopilot_input(vehicle: &Vehicle, track: &Track, target: usize) -> (Throttle, Steer, usize) {
    if track.waypoints.is_empty() {
        return (Throttle::Coast, Steer::Straight, 0);
    }

    let mut target = target.min(track.waypoints.len() - 1);
    let flat = |v: glam::Vec3| glam::Vec2::new(v.x, v.z);
    if flat(vehicle.position).distance(flat(track.waypoints[target])) < REACH_RADIUS {
        target = track.next_waypoint_index(target);
    }

    let desired = yaw_towards(vehicle.position, track.waypoints[target]);
    let error = normalize_angle(desired - vehicle.heading);

    let steer = if error > STEER_DEADBAND {
        Steer::Left
    } else if error < -STEER_DEADBAND {
        Steer::Right
    } else {
        Steer::Straight
    };

    let throttle = if error.abs() > LIFT_OFF_ERROR {
        Throttle::Coast
    } else {
        Throttle::Accelerate
    };

    (throttle, steer, target)
}
