//! Circuit Racer - An arcade lap-timing driving demo
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle kinematics, checkpoints, laps)
//! - `game_loop`: Fixed timestep driver fed by a frame source
//! - `platform`: Browser/native platform abstraction
//! - `hud`: On-screen display text
//! - `tuning`: Data-driven vehicle and race balance

pub mod game_loop;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game_loop::FrameLoop;
pub use hud::HudView;
pub use settings::{Settings, SettingsError, SpeedUnit};
pub use tuning::{Bounds, RaceRules, SteeringModel, VehicleTuning};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Simulation speed units to km/h
    pub const MS_TO_KMH: f32 = 3.6;
    /// Simulation speed units to mph
    pub const MS_TO_MPH: f32 = 2.237;

    /// Spawn pose on the stock circuit
    pub const SPAWN_X: f32 = 0.0;
    pub const SPAWN_Y: f32 = 5.0;
    pub const SPAWN_Z: f32 = -150.0;

    /// Road width of the stock circuit
    pub const ROAD_WIDTH: f32 = 35.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit forward vector on the ground plane for a yaw angle.
///
/// Yaw 0 faces +z; positive yaw turns toward +x.
#[inline]
pub fn heading_to_forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw that points from `from` toward `to` on the ground plane
#[inline]
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.x.atan2(d.z)
}
