//! Data-driven vehicle handling and race rules
//!
//! All values are per simulation tick unless noted otherwise. The fixed
//! timestep makes per-tick steps equivalent to per-frame steps at 60 Hz.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How steering input turns into heading change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SteeringModel {
    /// Heading changes at a fixed angular rate (radians/s) while a turn key is held
    Direct { rate: f32 },
    /// Turn value ramps by `step` per tick up to `max` (radians/s) and decays
    /// by `decay` per tick when released
    Smoothed { step: f32, max: f32, decay: f32 },
}

impl Default for SteeringModel {
    fn default() -> Self {
        SteeringModel::Direct { rate: 4.0 }
    }
}

impl SteeringModel {
    /// Ramped steering with the feel of the physics-driven prototype
    pub fn smoothed() -> Self {
        SteeringModel::Smoothed {
            step: 0.1,
            max: 1.0,
            decay: 0.9,
        }
    }
}

/// Vehicle handling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Forward speed cap (units/s)
    pub max_speed: f32,
    /// Reverse cap as a fraction of `max_speed`
    pub reverse_ratio: f32,
    /// Speed gained per tick while throttle is held
    pub accel_step: f32,
    /// Speed lost per tick while brake is held
    pub brake_step: f32,
    /// Per-tick speed multiplier with no throttle or brake
    pub friction: f32,
    /// Vertical velocity lost per tick
    pub gravity: f32,
    /// Lowest allowed vehicle height
    pub ground_height: f32,
    pub steering: SteeringModel,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 80.0,
            reverse_ratio: 0.3,
            accel_step: 2.0,
            brake_step: 2.0,
            friction: 0.9,
            gravity: 0.3,
            ground_height: 0.75,
            steering: SteeringModel::default(),
        }
    }
}

impl VehicleTuning {
    /// Handling of the physics-driven prototype (faster, ramped steering)
    pub fn arcade() -> Self {
        Self {
            max_speed: 100.0,
            reverse_ratio: 0.5,
            accel_step: 3.0,
            brake_step: 5.0,
            friction: 0.95,
            steering: SteeringModel::smoothed(),
            ..Self::default()
        }
    }

    /// Largest reverse speed magnitude
    #[inline]
    pub fn reverse_max(&self) -> f32 {
        self.max_speed * self.reverse_ratio
    }

    /// Check that the numbers describe a drivable vehicle
    pub fn validate(&self) -> Result<(), String> {
        if !(self.max_speed > 0.0) {
            return Err(format!("max_speed must be positive, got {}", self.max_speed));
        }
        if !(0.0..=1.0).contains(&self.reverse_ratio) {
            return Err(format!(
                "reverse_ratio must be within [0, 1], got {}",
                self.reverse_ratio
            ));
        }
        if !(self.accel_step > 0.0 && self.brake_step > 0.0) {
            return Err("accel_step and brake_step must be positive".to_string());
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(format!("friction must be within (0, 1), got {}", self.friction));
        }
        if self.gravity < 0.0 {
            return Err(format!("gravity must not be negative, got {}", self.gravity));
        }
        match self.steering {
            SteeringModel::Direct { rate } if rate < 0.0 => {
                Err(format!("steering rate must not be negative, got {rate}"))
            }
            SteeringModel::Smoothed { step, max, decay }
                if step <= 0.0 || max <= 0.0 || !(0.0..1.0).contains(&decay) =>
            {
                Err("smoothed steering needs positive step/max and decay in [0, 1)".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Axis-aligned drivable rectangle on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -200.0,
            max_x: 200.0,
            min_z: -250.0,
            max_z: 250.0,
        }
    }
}

impl Bounds {
    /// Inclusive containment test (height is ignored)
    #[inline]
    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.z >= self.min_z && pos.z <= self.max_z
    }
}

/// Checkpoint, finish line and recovery rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceRules {
    /// Distance from a checkpoint waypoint that counts as passing it
    pub checkpoint_radius: f32,
    /// Distance along z from the finish line that counts as crossing it
    pub finish_threshold: f32,
    /// Only record a lap once every checkpoint has been passed
    pub require_all_checkpoints: bool,
    /// Leaving this rectangle teleports the vehicle back to spawn
    pub bounds: Bounds,
}

impl Default for RaceRules {
    fn default() -> Self {
        Self {
            checkpoint_radius: crate::consts::ROAD_WIDTH / 2.0,
            finish_threshold: 8.0,
            require_all_checkpoints: false,
            bounds: Bounds::default(),
        }
    }
}

impl RaceRules {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.checkpoint_radius > 0.0) {
            return Err("checkpoint_radius must be positive".to_string());
        }
        if !(self.finish_threshold > 0.0) {
            return Err("finish_threshold must be positive".to_string());
        }
        let b = &self.bounds;
        if b.min_x >= b.max_x || b.min_z >= b.max_z {
            return Err("bounds must have min < max on both axes".to_string());
        }
        Ok(())
    }
}
