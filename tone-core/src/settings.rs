//! # Settings Module
//!
//! Persists the user's selections (tuning system, display range, octave
//! columns and canvas size) as a JSON file so a session can start where
//! the last one ended.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::EngineState;
use crate::range::DisplayRange;
use crate::tuning::TuningSystemId;
use crate::visibility::OctaveVisibility;

/// Canvas the grid is drawn on when nothing else is configured.
pub const DEFAULT_CANVAS_WIDTH: f32 = 350.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub tuning: TuningSystemId,
    pub display_range: DisplayRange,
    pub visibility: OctaveVisibility,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tuning: TuningSystemId::default(),
            display_range: DisplayRange::default(),
            visibility: OctaveVisibility::default(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl EngineSettings {
    pub fn from_state(state: &EngineState, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            tuning: state.tuning,
            display_range: state.range,
            visibility: state.visibility,
            canvas_width,
            canvas_height,
        }
    }

    pub fn into_state(self) -> EngineState {
        EngineState {
            tuning: self.tuning,
            range: self.display_range,
            visibility: self.visibility,
        }
    }
}

/// Saves settings as pretty-printed JSON.
pub fn save_settings(settings: &EngineSettings, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(settings).context("serializing settings")?;
    let mut file = File::create(path)
        .with_context(|| format!("creating settings file {}", path.display()))?;
    file.write_all(json_string.as_bytes())
        .with_context(|| format!("writing settings file {}", path.display()))?;
    log::info!("[SETTINGS] Saved settings to {}", path.display());
    Ok(())
}

/// Loads settings from JSON. Missing fields take their defaults; an
/// invalid display range is rejected.
pub fn load_settings(path: impl AsRef<Path>) -> Result<EngineSettings> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .with_context(|| format!("opening settings file {}", path.display()))?;
    let mut data = String::new();
    file.read_to_string(&mut data)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let settings: EngineSettings = serde_json::from_str(&data)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    settings.display_range.validate()?;
    log::info!("[SETTINGS] Loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn defaults_match_startup_state() {
        let settings = EngineSettings::default();
        let state = settings.into_state();
        assert_eq!(state, EngineState::default());
        assert_eq!(state.tuning, TuningSystemId::Chakra);
        assert_eq!(settings.canvas_width, 350.0);
    }

    #[test]
    fn json_uses_readable_names() {
        let json = serde_json::to_value(EngineSettings::default()).unwrap();
        assert_eq!(json["tuning"], "chakra");
        assert_eq!(json["display_range"]["minDb"], -100.0);
        assert_eq!(json["display_range"]["maxDb"], -35.0);
        assert_eq!(json["visibility"]["all"], false);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{ "tuning": "equal-temperament" }"#).unwrap();
        assert_eq!(settings.tuning, TuningSystemId::EqualTemperament);
        assert_eq!(settings.display_range, DisplayRange::default());
    }

    #[test]
    fn round_trip_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = EngineSettings::default();
        settings.display_range = DisplayRange::PRESETS[2];
        settings.visibility = OctaveVisibility::everything();
        save_settings(&settings, &path).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);

        std::fs::write(&path, r#"{ "display_range": { "minDb": -20.0, "maxDb": -80.0 } }"#).unwrap();
        let err = load_settings(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::InvalidDisplayRange { .. })
        ));

        assert!(load_settings(dir.path().join("missing.json")).is_err());
    }
}
