//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Time measured in ticks, never read from a wall clock
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod race;
pub mod state;
pub mod tick;
pub mod track;
pub mod vehicle;

pub use autopilot::autopilot_input;
pub use race::{Checkpoint, FinishLine, LapRecord, RaceSession};
pub use state::{GameEvent, GamePhase, GameState, ResetReason};
pub use tick::{TickInput, tick};
pub use track::{Track, TrackSegment};
pub use vehicle::{Spawn, Steer, Throttle, Vehicle};
