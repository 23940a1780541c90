//! Checkpoint and lap detection
//!
//! Checkpoints are discrete waypoints passed by proximity. The finish line is
//! edge-triggered: a lap is recorded on the transition from "away from the
//! line" to "at the line", never while the car lingers on it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::track::Track;
use crate::consts::SIM_DT;
use crate::tuning::RaceRules;

/// A waypoint that must be driven past
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub index: usize,
    pub position: Vec3,
    pub passed: bool,
}

/// Finish line across the road at a fixed z
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishLine {
    pub z: f32,
    /// Maximum |z - line.z| that counts as being at the line
    pub threshold: f32,
    /// Lateral extent of the gate around x = 0; `None` spans the whole map
    #[serde(default)]
    pub half_width: Option<f32>,
}

impl FinishLine {
    #[inline]
    pub fn is_near(&self, pos: Vec3) -> bool {
        let along = (pos.z - self.z).abs() < self.threshold;
        let across = self.half_width.is_none_or(|w| pos.x.abs() < w);
        along && across
    }
}

/// One completed lap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// 1-based lap number
    pub lap: u32,
    pub seconds: f64,
}

/// Per-session progress: checkpoints, lap timer and recorded laps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSession {
    pub checkpoints: Vec<Checkpoint>,
    pub passed_count: usize,
    /// Tick at which the current lap started
    pub lap_start_tick: u64,
    /// Recorded laps in order (append-only)
    pub laps: Vec<LapRecord>,
    /// Whether the car was at the finish line on the previous check
    at_finish: bool,
}

impl RaceSession {
    /// Start a session with the car at `car_pos`
    pub fn new(track: &Track, car_pos: Vec3) -> Self {
        let checkpoints = track
            .checkpoint_positions()
            .into_iter()
            .enumerate()
            .map(|(index, position)| Checkpoint {
                index,
                position,
                passed: false,
            })
            .collect();

        Self {
            checkpoints,
            passed_count: 0,
            lap_start_tick: 0,
            laps: Vec::new(),
            // Spawning on the line must not count as a crossing
            at_finish: track.finish_line.is_near(car_pos),
        }
    }

    /// Reset progress and timer for a fresh attempt; recorded laps are kept
    pub fn restart(&mut self, tick: u64, car_pos: Vec3, finish: &FinishLine) {
        self.clear_checkpoints();
        self.lap_start_tick = tick;
        self.at_finish = finish.is_near(car_pos);
    }

    /// Re-read the finish latch after a teleport so landing on the line
    /// does not count as crossing it
    pub fn sync_finish(&mut self, car_pos: Vec3, finish: &FinishLine) {
        self.at_finish = finish.is_near(car_pos);
    }

    pub fn clear_laps(&mut self) {
        self.laps.clear();
    }

    fn clear_checkpoints(&mut self) {
        for cp in &mut self.checkpoints {
            cp.passed = false;
        }
        self.passed_count = 0;
    }

    #[inline]
    pub fn total_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    #[inline]
    pub fn all_checkpoints_passed(&self) -> bool {
        self.passed_count == self.checkpoints.len()
    }

    /// Whether the car was at the finish line on the last check
    #[inline]
    pub fn at_finish(&self) -> bool {
        self.at_finish
    }

    /// Seconds since the current lap started
    pub fn elapsed_seconds(&self, tick: u64) -> f64 {
        tick.saturating_sub(self.lap_start_tick) as f64 * SIM_DT as f64
    }

    /// Mark every unpassed checkpoint within `radius` of `pos`.
    ///
    /// Returns the indices passed by this call.
    pub fn check_checkpoints(&mut self, pos: Vec3, radius: f32) -> Vec<usize> {
        let mut newly_passed = Vec::new();
        for cp in self.checkpoints.iter_mut().filter(|cp| !cp.passed) {
            if pos.distance(cp.position) < radius {
                cp.passed = true;
                newly_passed.push(cp.index);
            }
        }
        self.passed_count += newly_passed.len();
        newly_passed
    }

    /// Edge-triggered finish line check.
    ///
    /// Records a lap when the car arrives at the line, then restarts the lap
    /// timer and clears checkpoints.
    pub fn check_finish(
        &mut self,
        pos: Vec3,
        tick: u64,
        finish: &FinishLine,
        rules: &RaceRules,
    ) -> Option<LapRecord> {
        let near = finish.is_near(pos);
        let rising = near && !self.at_finish;
        self.at_finish = near;

        if !rising {
            return None;
        }
        if rules.require_all_checkpoints && !self.all_checkpoints_passed() {
            return None;
        }

        let record = LapRecord {
            lap: self.laps.len() as u32 + 1,
            seconds: self.elapsed_seconds(tick),
        };
        self.laps.push(record);
        self.lap_start_tick = tick;
        self.clear_checkpoints();
        Some(record)
    }

    pub fn last_lap(&self) -> Option<LapRecord> {
        self.laps.last().copied()
    }

    /// Fastest recorded lap (earliest wins ties)
    pub fn best_lap(&self) -> Option<LapRecord> {
        self.laps.iter().copied().reduce(|best, lap| {
            if lap.seconds < best.seconds { lap } else { best }
        })
    }
}
