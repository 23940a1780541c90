//! On-screen display text
//!
//! The HUD is a handful of text slots. Building the strings here keeps the
//! browser shell down to `set_text_content` calls and makes them testable.

use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, LapRecord};

/// Text for every HUD slot for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub speed: String,
    pub time: String,
    pub checkpoints: String,
    pub laps: Vec<String>,
    /// Menu/pause prompt, `None` while racing
    pub status: Option<String>,
}

impl HudView {
    pub fn from_state(state: &GameState, settings: &Settings) -> Self {
        let unit = settings.speed_unit;
        let speed = (state.vehicle.speed.abs() * unit.factor()).round() as i32;

        let laps = if settings.show_lap_list {
            let best = state.session.best_lap().map(|l| l.lap);
            state
                .session
                .laps
                .iter()
                .map(|lap| format_lap(lap, best == Some(lap.lap)))
                .collect()
        } else {
            Vec::new()
        };

        let status = match state.phase {
            GamePhase::Menu => Some("Press Enter to start".to_string()),
            GamePhase::Paused => Some("Paused - press Esc to resume".to_string()),
            GamePhase::Racing => None,
        };

        Self {
            speed: format!("{} {}", speed, unit.as_str()),
            time: format_race_time(state.lap_elapsed()),
            checkpoints: format!(
                "{}/{}",
                state.session.passed_count,
                state.session.total_checkpoints()
            ),
            laps,
            status,
        }
    }
}

/// Format seconds as `m:ss.cc`
pub fn format_race_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let minutes = centis / 6000;
    let secs = (centis % 6000) / 100;
    let hundredths = centis % 100;
    format!("{}:{:02}.{:02}", minutes, secs, hundredths)
}

/// One line of the lap list, e.g. `#2: 31.07s`
pub fn format_lap(lap: &LapRecord, best: bool) -> String {
    if best {
        format!("#{}: {:.2}s (best)", lap.lap, lap.seconds)
    } else {
        format!("#{}: {:.2}s", lap.lap, lap.seconds)
    }
}
