//! Kinematic vehicle
//!
//! Position and heading are integrated directly from speed and elapsed time;
//! there is no force or mass model.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_to_forward;
use crate::tuning::{SteeringModel, VehicleTuning};

/// Speeds below this magnitude snap to zero while coasting
pub const SPEED_EPSILON: f32 = 1.0e-3;

/// Longitudinal command for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Throttle {
    #[default]
    Coast,
    Accelerate,
    Brake,
}

/// Lateral command for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    #[default]
    Straight,
    Left,
    Right,
}

impl Steer {
    /// Heading direction of the command (+1 left, -1 right)
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Steer::Straight => 0.0,
            Steer::Left => 1.0,
            Steer::Right => -1.0,
        }
    }
}

/// Spawn pose the vehicle is created at and teleported back to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub position: Vec3,
    pub heading: f32,
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            position: Vec3::new(SPAWN_X, SPAWN_Y, SPAWN_Z),
            heading: 0.0,
        }
    }
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: Vec3,
    /// Yaw in radians (0 faces +z)
    pub heading: f32,
    /// Signed forward speed (units/s, negative when reversing)
    pub speed: f32,
    pub vertical_velocity: f32,
    /// Current turn rate for ramped steering (radians/s)
    #[serde(default)]
    pub turn: f32,
}

impl Vehicle {
    pub fn new(spawn: Spawn) -> Self {
        Self {
            position: spawn.position,
            heading: spawn.heading,
            speed: 0.0,
            vertical_velocity: 0.0,
            turn: 0.0,
        }
    }

    /// Teleport back to the spawn pose with all motion cleared
    pub fn reset_to(&mut self, spawn: Spawn) {
        *self = Self::new(spawn);
    }

    /// Unit forward direction on the ground plane
    #[inline]
    pub fn forward(&self) -> Vec3 {
        heading_to_forward(self.heading)
    }

    /// Displayed speed magnitude in km/h
    #[inline]
    pub fn speed_kmh(&self) -> f32 {
        self.speed.abs() * MS_TO_KMH
    }

    /// Advance one tick of `dt` seconds
    pub fn integrate(&mut self, throttle: Throttle, steer: Steer, tuning: &VehicleTuning, dt: f32) {
        self.update_speed(throttle, tuning);
        self.update_heading(steer, tuning, dt);

        self.vertical_velocity -= tuning.gravity;

        let step = self.forward() * self.speed * dt;
        self.position.x += step.x;
        self.position.z += step.z;
        self.position.y += self.vertical_velocity * dt;

        self.clamp_to_ground(tuning.ground_height);
    }

    fn update_speed(&mut self, throttle: Throttle, tuning: &VehicleTuning) {
        let reverse_max = tuning.reverse_max();
        self.speed = match throttle {
            Throttle::Accelerate => (self.speed + tuning.accel_step).min(tuning.max_speed),
            Throttle::Brake => (self.speed - tuning.brake_step).max(-reverse_max),
            Throttle::Coast => {
                let decayed = self.speed * tuning.friction;
                if decayed.abs() < SPEED_EPSILON { 0.0 } else { decayed }
            }
        };
        // Tuning may change between ticks (settings reload), keep the cap honest
        self.speed = self.speed.clamp(-reverse_max, tuning.max_speed);
    }

    fn update_heading(&mut self, steer: Steer, tuning: &VehicleTuning, dt: f32) {
        match tuning.steering {
            SteeringModel::Direct { rate } => {
                self.heading += steer.sign() * rate * dt;
            }
            SteeringModel::Smoothed { step, max, decay } => {
                self.turn = match steer {
                    Steer::Left => (self.turn + step).min(max),
                    Steer::Right => (self.turn - step).max(-max),
                    Steer::Straight => self.turn * decay,
                };
                self.heading += self.turn * dt;
            }
        }
        self.heading = crate::normalize_angle(self.heading);
    }

    /// Keep the car on the ground; landing kills vertical velocity
    pub fn clamp_to_ground(&mut self, ground_height: f32) {
        if self.position.y < ground_height {
            self.position.y = ground_height;
            self.vertical_velocity = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn settle(vehicle: &mut Vehicle, tuning: &VehicleTuning, ticks: usize) {
        for _ in 0..ticks {
            vehicle.integrate(Throttle::Coast, Steer::Straight, tuning, SIM_DT);
        }
    }

    #[test]
    fn test_settles_at_ground_height() {
        let tuning = VehicleTuning::default();
        let mut vehicle = Vehicle::new(Spawn::default());
        assert_eq!(vehicle.position, Vec3::new(0.0, 5.0, -150.0));

        settle(&mut vehicle, &tuning, 600);
        assert_eq!(vehicle.position.y, 0.75);
        assert_eq!(vehicle.vertical_velocity, 0.0);

        // Clamp is idempotent once grounded
        settle(&mut vehicle, &tuning, 10);
        assert_eq!(vehicle.position.y, 0.75);
        assert_eq!(vehicle.vertical_velocity, 0.0);
        assert_eq!(vehicle.position.x, 0.0);
        assert_eq!(vehicle.position.z, -150.0);
    }

    #[test]
    fn test_accelerates_forward_along_heading() {
        let tuning = VehicleTuning::default();
        let mut vehicle = Vehicle::new(Spawn::default());
        vehicle.integrate(Throttle::Accelerate, Steer::Straight, &tuning, SIM_DT);
        assert_eq!(vehicle.speed, 2.0);
        assert!(vehicle.position.z > -150.0);
        assert_eq!(vehicle.position.x, 0.0);
    }

    #[test]
    fn test_speed_caps() {
        let tuning = VehicleTuning::default();
        let mut vehicle = Vehicle::new(Spawn::default());
        for _ in 0..200 {
            vehicle.integrate(Throttle::Accelerate, Steer::Straight, &tuning, SIM_DT);
        }
        assert_eq!(vehicle.speed, 80.0);
        assert!((vehicle.speed_kmh() - 288.0).abs() < 0.01);

        for _ in 0..200 {
            vehicle.integrate(Throttle::Brake, Steer::Straight, &tuning, SIM_DT);
        }
        assert!((vehicle.speed + 24.0).abs() < 0.0001);
        // Reverse reads as a positive speed
        assert!((vehicle.speed_kmh() - 86.4).abs() < 0.01);
    }

    #[test]
    fn test_direct_steering_turns_left_toward_positive_x() {
        let tuning = VehicleTuning::default();
        let mut vehicle = Vehicle::new(Spawn::default());
        vehicle.integrate(Throttle::Coast, Steer::Left, &tuning, 0.5);
        assert!((vehicle.heading - 2.0).abs() < 0.0001);

        // Direct steering has no memory
        vehicle.integrate(Throttle::Coast, Steer::Straight, &tuning, 0.5);
        assert!((vehicle.heading - 2.0).abs() < 0.0001);

        vehicle.integrate(Throttle::Coast, Steer::Right, &tuning, 0.5);
        assert!(vehicle.heading.abs() < 0.0001);
    }

    #[test]
    fn test_smoothed_steering_ramps_and_decays() {
        let tuning = VehicleTuning::arcade();
        let mut vehicle = Vehicle::new(Spawn::default());
        for _ in 0..5 {
            vehicle.integrate(Throttle::Coast, Steer::Left, &tuning, SIM_DT);
        }
        assert!((vehicle.turn - 0.5).abs() < 0.0001);
        for _ in 0..20 {
            vehicle.integrate(Throttle::Coast, Steer::Left, &tuning, SIM_DT);
        }
        assert!((vehicle.turn - 1.0).abs() < 0.0001);

        let before = vehicle.turn;
        vehicle.integrate(Throttle::Coast, Steer::Straight, &tuning, SIM_DT);
        assert!(vehicle.turn < before);
        assert!(vehicle.heading > 0.0);
    }

    #[test]
    fn test_reset_clears_motion() {
        let tuning = VehicleTuning::arcade();
        let mut vehicle = Vehicle::new(Spawn::default());
        for _ in 0..30 {
            vehicle.integrate(Throttle::Accelerate, Steer::Left, &tuning, SIM_DT);
        }
        vehicle.reset_to(Spawn::default());
        assert_eq!(vehicle, Vehicle::new(Spawn::default()));
    }

    proptest! {
        #[test]
        fn prop_coasting_decays_toward_zero(
            speed in -24.0f32..80.0,
            dt in 0.0f32..0.1,
        ) {
            let tuning = VehicleTuning::default();
            let mut vehicle = Vehicle::new(Spawn::default());
            vehicle.speed = speed;
            vehicle.integrate(Throttle::Coast, Steer::Straight, &tuning, dt);

            if speed != 0.0 {
                prop_assert!(vehicle.speed.abs() < speed.abs());
            } else {
                prop_assert_eq!(vehicle.speed, 0.0);
            }
            prop_assert!(vehicle.speed * speed >= 0.0, "sign flipped: {} -> {}", speed, vehicle.speed);
        }

        #[test]
        fn prop_speed_stays_within_caps(
            commands in proptest::collection::vec(0u8..3, 1..400),
        ) {
            let tuning = VehicleTuning::default();
            let mut vehicle = Vehicle::new(Spawn::default());
            for command in commands {
                let throttle = match command {
                    0 => Throttle::Coast,
                    1 => Throttle::Accelerate,
                    _ => Throttle::Brake,
                };
                vehicle.integrate(throttle, Steer::Straight, &tuning, SIM_DT);
                prop_assert!(vehicle.speed <= tuning.max_speed);
                prop_assert!(vehicle.speed >= -tuning.reverse_max());
            }
        }
    }
}
