//! Game settings and preferences
//!
//! Read from LocalStorage on the web and from a JSON file natively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MS_TO_KMH, MS_TO_MPH};
use crate::tuning::{RaceRules, VehicleTuning};

/// Settings could not be loaded or describe an unplayable game
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Unit used for the speed readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Mph,
}

impl SpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedUnit::Kmh => "km/h",
            SpeedUnit::Mph => "mph",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kmh" | "km/h" | "kph" => Some(SpeedUnit::Kmh),
            "mph" => Some(SpeedUnit::Mph),
            _ => None,
        }
    }

    /// Multiplier from simulation units/s to this unit
    pub fn factor(&self) -> f32 {
        match self {
            SpeedUnit::Kmh => MS_TO_KMH,
            SpeedUnit::Mph => MS_TO_MPH,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Handling ===
    pub vehicle: VehicleTuning,

    // === Rules ===
    pub rules: RaceRules,

    // === HUD ===
    /// Unit for the speed readout
    pub speed_unit: SpeedUnit,
    /// Show the recorded lap list
    pub show_lap_list: bool,

    // === Session ===
    /// Start racing immediately instead of waiting at the menu
    pub skip_menu: bool,
    /// Pause when the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vehicle: VehicleTuning::default(),
            rules: RaceRules::default(),

            // HUD
            speed_unit: SpeedUnit::Kmh,
            show_lap_list: true,

            // Session
            skip_menu: false,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Pretty JSON, the format `from_json` accepts
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.vehicle.validate().map_err(SettingsError::Invalid)?;
        self.rules.validate().map_err(SettingsError::Invalid)?;
        Ok(())
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "circuit_racer_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let stored = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored {
            Some(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring stored settings: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                let settings = Self::default();
                // Seed storage so the defaults can be edited in place
                settings.save();
                settings
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {}", e),
            }
        }
    }
}
