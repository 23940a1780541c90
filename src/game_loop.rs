//! Fixed timestep frame loop
//!
//! Frames arrive at whatever rate the host delivers them; the simulation only
//! ever advances in `SIM_DT` steps. Leftover time carries over in the
//! accumulator.

use crate::consts::*;
use crate::platform::FrameSource;
use crate::sim::{GameState, TickInput, tick};

/// Accumulator-based driver for `sim::tick`
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    accumulator: f32,
    last_time_ms: Option<f64>,
    /// Input carried across frames until a tick consumes its one-shots
    input: TickInput,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames processed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Forget timing history (after a pause in frame delivery, e.g. hidden tab)
    pub fn resync(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }

    /// Process one frame at `time_ms`. Returns the number of ticks run.
    pub fn frame(&mut self, time_ms: f64, state: &mut GameState, input: TickInput) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((time_ms - last) / 1000.0).max(0.0) as f32,
            None => SIM_DT,
        };
        self.last_time_ms = Some(time_ms);
        self.frames += 1;

        self.merge_input(input);
        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
        }
        // Drop time we refused to simulate so the next frame does not burst
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Drive frames from `source` until it stops.
    ///
    /// `poll_input` is asked for controls before each frame and `on_frame`
    /// sees the state after it (display update, event logging).
    pub fn run<S, I, F>(
        &mut self,
        source: &mut S,
        state: &mut GameState,
        mut poll_input: I,
        mut on_frame: F,
    ) -> u64
    where
        S: FrameSource,
        I: FnMut(&GameState) -> TickInput,
        F: FnMut(&mut GameState, u32),
    {
        let mut frames = 0;
        while let Some(time_ms) = source.next_frame() {
            let input = poll_input(state);
            let ticks = self.frame(time_ms, state, input);
            on_frame(state, ticks);
            frames += 1;
        }
        frames
    }

    fn merge_input(&mut self, input: TickInput) {
        self.input.throttle = input.throttle;
        self.input.steer = input.steer;
        self.input.autopilot = input.autopilot;
        self.input.reset |= input.reset;
        self.input.pause |= input.pause;
        self.input.start |= input.start;
    }
}
