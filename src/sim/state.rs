//! Game state and core simulation types
//!
//! Everything the update needs lives in one explicit struct, so several
//! sessions can run side by side and tests can build their own.

use serde::{Deserialize, Serialize};

use super::race::{LapRecord, RaceSession};
use super::track::Track;
use super::vehicle::Vehicle;
use crate::tuning::{RaceRules, VehicleTuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start a session
    Menu,
    /// Active driving
    Racing,
    /// Game is paused
    Paused,
}

/// Why the car was teleported back to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetReason {
    Manual,
    OutOfBounds,
}

/// Notable things that happened during a tick, drained by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    Paused,
    Resumed,
    CheckpointPassed {
        index: usize,
        passed: usize,
        total: usize,
    },
    LapCompleted(LapRecord),
    VehicleReset(ResetReason),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub track: Track,
    pub tuning: VehicleTuning,
    pub rules: RaceRules,
    pub vehicle: Vehicle,
    pub session: RaceSession,
    pub phase: GamePhase,
    /// Simulation tick counter (only advances while racing)
    pub time_ticks: u64,
    /// Waypoint the autopilot is steering for
    #[serde(default)]
    pub autopilot_target: usize,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game sitting at the menu with the car on the spawn pose.
    ///
    /// The finish line takes its threshold from `rules`.
    pub fn new(mut track: Track, tuning: VehicleTuning, rules: RaceRules) -> Self {
        track.finish_line.threshold = rules.finish_threshold;
        let vehicle = Vehicle::new(track.spawn);
        let session = RaceSession::new(&track, vehicle.position);
        Self {
            track,
            tuning,
            rules,
            vehicle,
            session,
            phase: GamePhase::Menu,
            time_ticks: 0,
            autopilot_target: 1,
            events: Vec::new(),
        }
    }

    /// Stock circuit with default handling and rules
    pub fn circuit() -> Self {
        Self::new(Track::circuit(), VehicleTuning::default(), RaceRules::default())
    }

    /// Begin (or restart) a session: car to spawn, checkpoints and timer reset
    pub fn start(&mut self) {
        self.vehicle.reset_to(self.track.spawn);
        self.session
            .restart(self.time_ticks, self.vehicle.position, &self.track.finish_line);
        self.autopilot_target = self.track.next_waypoint_index(0);
        self.phase = GamePhase::Racing;
        self.events.push(GameEvent::SessionStarted);
    }

    /// Toggle between racing and paused; no effect at the menu
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Racing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Racing;
                self.events.push(GameEvent::Resumed);
            }
            GamePhase::Menu => {}
        }
    }

    /// Teleport the car back to spawn. Progress within the lap is kept.
    pub fn reset_vehicle(&mut self, reason: ResetReason) {
        self.vehicle.reset_to(self.track.spawn);
        self.session
            .sync_finish(self.vehicle.position, &self.track.finish_line);
        self.autopilot_target = self.track.next_waypoint_index(0);
        self.events.push(GameEvent::VehicleReset(reason));
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Racing
    }

    /// Seconds into the current lap
    pub fn lap_elapsed(&self) -> f64 {
        self.session.elapsed_seconds(self.time_ticks)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
