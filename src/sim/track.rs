//! Track geometry
//!
//! A track is a fixed polyline of waypoints. Segments are derived on demand and
//! feed both mesh placement on the frontend and checkpoint placement here.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::race::FinishLine;
use super::vehicle::Spawn;
use crate::consts::*;

/// A straight piece of road between two waypoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    pub start: Vec3,
    pub end: Vec3,
}

impl TrackSegment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end (zero for degenerate segments)
    #[inline]
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Yaw of the segment, same convention as vehicle heading
    #[inline]
    pub fn yaw(&self) -> f32 {
        crate::yaw_towards(self.start, self.end)
    }

    /// Climb angle relative to the ground plane
    pub fn pitch(&self) -> f32 {
        let d = self.end - self.start;
        let horizontal = (d.x * d.x + d.z * d.z).sqrt();
        d.y.atan2(horizontal)
    }
}

/// A fixed racing circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    /// Waypoints in driving order; the first one is the start/finish
    pub waypoints: Vec<Vec3>,
    /// Whether the last waypoint connects back to the first
    pub closed: bool,
    pub spawn: Spawn,
    pub finish_line: FinishLine,
}

impl Track {
    /// The stock circuit: a long loop around the start straight
    pub fn circuit() -> Self {
        let waypoints = [
            (0.0, -150.0),
            (0.0, 0.0),
            (0.0, 100.0),
            (80.0, 120.0),
            (120.0, 80.0),
            (120.0, -50.0),
            (100.0, -150.0),
            (40.0, -180.0),
            (-40.0, -180.0),
            (-100.0, -150.0),
            (-120.0, -50.0),
            (-120.0, 80.0),
            (-80.0, 120.0),
            (0.0, 150.0),
        ]
        .into_iter()
        .map(|(x, z)| Vec3::new(x, 0.0, z))
        .collect();

        Self {
            name: "Circuit".to_string(),
            waypoints,
            closed: true,
            spawn: Spawn::default(),
            finish_line: FinishLine {
                z: SPAWN_Z,
                threshold: 8.0,
                half_width: Some(ROAD_WIDTH / 2.0),
            },
        }
    }

    /// Consecutive waypoint pairs, including the closing segment on loops
    pub fn segments(&self) -> impl Iterator<Item = TrackSegment> + '_ {
        let n = self.waypoints.len();
        let count = match (self.closed, n) {
            (_, 0 | 1) => 0,
            (true, _) => n,
            (false, _) => n - 1,
        };
        (0..count).map(move |i| TrackSegment::new(self.waypoints[i], self.waypoints[(i + 1) % n]))
    }

    /// Total driving distance of one lap
    pub fn length(&self) -> f32 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Checkpoint waypoints in driving order (start/finish excluded)
    pub fn checkpoint_positions(&self) -> Vec<Vec3> {
        self.waypoints.iter().skip(1).copied().collect()
    }

    /// Waypoint after `index`, wrapping on closed tracks
    pub fn next_waypoint_index(&self, index: usize) -> usize {
        let n = self.waypoints.len().max(1);
        if self.closed {
            (index + 1) % n
        } else {
            (index + 1).min(n - 1)
        }
    }
}
