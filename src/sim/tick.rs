//! Fixed timestep simulation tick
//!
//! Core game loop step: read controls, integrate motion, handle resets and
//! leaving the map, then test checkpoints and the finish line.

use serde::{Deserialize, Serialize};

use super::autopilot::autopilot_input;
use super::state::{GameEvent, GameState, ResetReason};
use super::vehicle::{Steer, Throttle};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub throttle: Throttle,
    pub steer: Steer,
    /// Teleport the car back to spawn (one-shot)
    pub reset: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Start or restart the session (one-shot)
    pub start: bool,
    /// Demo mode - the autopilot drives
    pub autopilot: bool,
}

impl TickInput {
    /// Drop the one-shot commands once a tick has consumed them
    pub fn clear_one_shots(&mut self) {
        self.reset = false;
        self.pause = false;
        self.start = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.start {
        state.start();
    }
    if input.pause {
        state.toggle_pause();
    }

    // Menu and pause freeze the simulation; the display keeps reading state
    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;

    let (throttle, steer) = if input.autopilot {
        let (throttle, steer, target) =
            autopilot_input(&state.vehicle, &state.track, state.autopilot_target);
        state.autopilot_target = target;
        (throttle, steer)
    } else {
        (input.throttle, input.steer)
    };

    state.vehicle.integrate(throttle, steer, &state.tuning, dt);

    // Teleports run after integration so the tick ends exactly on the spawn pose
    if input.reset {
        state.reset_vehicle(ResetReason::Manual);
    } else if !state.rules.bounds.contains(state.vehicle.position) {
        state.reset_vehicle(ResetReason::OutOfBounds);
    }

    let pos = state.vehicle.position;
    let total = state.session.total_checkpoints();
    for index in state.session.check_checkpoints(pos, state.rules.checkpoint_radius) {
        state.events.push(GameEvent::CheckpointPassed {
            index,
            passed: state.session.passed_count,
            total,
        });
    }

    if let Some(lap) =
        state
            .session
            .check_finish(pos, state.time_ticks, &state.track.finish_line, &state.rules)
    {
        state.events.push(GameEvent::LapCompleted(lap));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::GamePhase;
    use glam::Vec3;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn racing_state() -> GameState {
        let mut state = GameState::circuit();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        state.drain_events();
        state
    }

    #[test]
    fn test_menu_gates_update() {
        let mut state = GameState::circuit();
        let input = TickInput {
            throttle: Throttle::Accelerate,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.vehicle.speed, 0.0);
    }

    #[test]
    fn test_start_then_drive() {
        let mut state = racing_state();
        assert_eq!(state.phase, GamePhase::Racing);
        let input = TickInput {
            throttle: Throttle::Accelerate,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.vehicle.speed, 80.0);
        assert!(state.vehicle.position.z > -120.0);
        assert!((state.lap_elapsed() - 61.0 / 60.0).abs() < 0.001);
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut state = racing_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;

        let drive = TickInput {
            throttle: Throttle::Accelerate,
            ..Default::default()
        };
        tick(&mut state, &drive, SIM_DT);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Racing);
        assert_eq!(state.time_ticks, ticks + 1);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_out_of_bounds_returns_to_spawn() {
        let mut state = racing_state();
        state.vehicle.position = Vec3::new(0.0, 0.75, -5.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.session.checkpoints[0].passed);
        state.drain_events();

        state.vehicle.position = Vec3::new(199.5, 0.75, 0.0);
        state.vehicle.heading = FRAC_PI_2;
        state.vehicle.speed = 80.0;
        state.vehicle.vertical_velocity = -3.0;

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.vehicle.position, state.track.spawn.position);
        assert_eq!(state.vehicle.heading, state.track.spawn.heading);
        assert_eq!(state.vehicle.speed, 0.0);
        assert_eq!(state.vehicle.vertical_velocity, 0.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::VehicleReset(ResetReason::OutOfBounds)));
        // Landing on the start line by teleport is not a lap
        assert!(state.session.laps.is_empty());
        // Lap progress survives the teleport
        assert!(state.session.checkpoints[0].passed);
        assert_eq!(state.session.passed_count, 1);
    }

    #[test]
    fn test_manual_reset() {
        let mut state = racing_state();
        state.vehicle.position = Vec3::new(50.0, 0.75, 50.0);
        state.vehicle.speed = 40.0;
        tick(
            &mut state,
            &TickInput {
                reset: true,
                throttle: Throttle::Accelerate,
                steer: Steer::Left,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.vehicle.position, state.track.spawn.position);
        assert_eq!(state.vehicle.heading, state.track.spawn.heading);
        assert_eq!(state.vehicle.speed, 0.0);
        assert_eq!(state.vehicle.vertical_velocity, 0.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::VehicleReset(ResetReason::Manual)));
        assert!(!events.contains(&GameEvent::VehicleReset(ResetReason::OutOfBounds)));
        assert!(state.session.laps.is_empty());
    }

    #[test]
    fn test_checkpoint_and_lap_events() {
        let mut state = racing_state();
        state.vehicle.position = Vec3::new(0.0, 0.75, -5.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::CheckpointPassed {
                index: 0,
                passed: 1,
                total: 13
            }]
        );

        state.vehicle.position = Vec3::new(0.0, 0.75, -149.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let events = state.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::LapCompleted(lap)] if lap.lap == 1));
        assert_eq!(state.session.passed_count, 0);
    }

    #[test]
    fn test_finish_threshold_setting_widens_line() {
        use crate::sim::track::Track;
        use crate::tuning::{RaceRules, VehicleTuning};

        let run = |finish_threshold: f32| {
            let rules = RaceRules {
                finish_threshold,
                ..Default::default()
            };
            let mut state = GameState::new(Track::circuit(), VehicleTuning::default(), rules);
            state.start();
            state.vehicle.position = Vec3::new(0.0, 0.75, -60.0);
            tick(&mut state, &TickInput::default(), SIM_DT);
            // 15 units short of the line
            state.vehicle.position = Vec3::new(0.0, 0.75, -135.0);
            tick(&mut state, &TickInput::default(), SIM_DT);
            state.session.laps.len()
        };

        assert_eq!(run(8.0), 0);
        assert_eq!(run(20.0), 1);
    }

    #[test]
    fn test_autopilot_passes_first_checkpoint() {
        let mut state = racing_state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(4 * 60) {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.session.checkpoints[0].passed);
    }

    #[test]
    fn test_autopilot_completes_a_lap() {
        let mut state = racing_state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(120 * 60) {
            tick(&mut state, &input, SIM_DT);
            if !state.session.laps.is_empty() {
                break;
            }
        }
        assert_eq!(state.session.laps.len(), 1);
        assert!(state.session.laps[0].seconds > 10.0);
        assert!(!state
            .drain_events()
            .contains(&GameEvent::VehicleReset(ResetReason::OutOfBounds)));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = racing_state();
        let mut state2 = racing_state();

        let inputs = [
            TickInput {
                throttle: Throttle::Accelerate,
                ..Default::default()
            },
            TickInput {
                throttle: Throttle::Accelerate,
                steer: Steer::Left,
                ..Default::default()
            },
            TickInput {
                steer: Steer::Right,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in inputs.iter().cycle().take(400) {
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.vehicle, state2.vehicle);
        assert_eq!(state1.session, state2.session);
    }

    proptest! {
        #[test]
        fn prop_holding_at_line_records_one_lap(frames in 1usize..600) {
            let mut state = racing_state();
            state.vehicle.position = Vec3::new(0.0, 0.75, -60.0);
            tick(&mut state, &TickInput::default(), SIM_DT);

            for _ in 0..frames {
                state.vehicle.position = Vec3::new(0.0, 0.75, -150.0);
                state.vehicle.speed = 0.0;
                tick(&mut state, &TickInput::default(), SIM_DT);
            }
            prop_assert_eq!(state.session.laps.len(), 1);
        }

        #[test]
        fn prop_leaving_bounds_resets(
            x in -195.0f32..195.0,
            z in -245.0f32..245.0,
            heading in -3.1f32..3.1,
        ) {
            let mut state = racing_state();
            state.vehicle.position = Vec3::new(x, 0.75, z);
            state.vehicle.heading = heading;
            let input = TickInput {
                throttle: Throttle::Accelerate,
                ..Default::default()
            };
            // Far enough to cross any edge of the rectangle at full speed
            for _ in 0..(20 * 60) {
                let before = state.vehicle.position;
                tick(&mut state, &input, SIM_DT);
                if state
                    .drain_events()
                    .contains(&GameEvent::VehicleReset(ResetReason::OutOfBounds))
                {
                    prop_assert!(state.rules.bounds.contains(before));
                    prop_assert_eq!(state.vehicle.position, state.track.spawn.position);
                    prop_assert_eq!(state.vehicle.speed, 0.0);
                    prop_assert_eq!(state.vehicle.vertical_velocity, 0.0);
                    return Ok(());
                }
            }
            prop_assert!(false, "vehicle never left the bounds");
        }
    }
}
