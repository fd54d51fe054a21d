//! # Display Range Module
//!
//! The (minDb, maxDb) window that maps loudness onto a drawable [0, 1]
//! intensity, and the fixed presets the user picks from.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A decibel window with `min_db < max_db`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRange {
    pub min_db: f32,
    pub max_db: f32,
}

impl DisplayRange {
    /// Presets A through E, each shifting the window 10 dB lower and
    /// narrowing it by 5 dB.
    pub const PRESETS: [DisplayRange; 5] = [
        DisplayRange { min_db: -100.0, max_db: -35.0 },
        DisplayRange { min_db: -110.0, max_db: -40.0 },
        DisplayRange { min_db: -120.0, max_db: -45.0 },
        DisplayRange { min_db: -130.0, max_db: -50.0 },
        DisplayRange { min_db: -140.0, max_db: -55.0 },
    ];

    /// Builds a validated range.
    pub fn new(min_db: f32, max_db: f32) -> Result<Self, EngineError> {
        let range = Self::unchecked(min_db, max_db);
        range.validate()?;
        Ok(range)
    }

    /// Builds a range without validation. Normalizing with an inverted or
    /// empty window yields whatever the float division produces.
    pub const fn unchecked(min_db: f32, max_db: f32) -> Self {
        Self { min_db, max_db }
    }

    /// Preset by index, 0 = A.
    pub fn preset(index: usize) -> Result<Self, EngineError> {
        Self::PRESETS
            .get(index)
            .copied()
            .ok_or(EngineError::UnknownPreset(index))
    }

    /// Letter label of a preset index.
    pub fn preset_label(index: usize) -> Option<char> {
        (index < Self::PRESETS.len()).then(|| (b'A' + index as u8) as char)
    }

    /// Index of the preset equal to this range, if any.
    pub fn preset_index(&self) -> Option<usize> {
        Self::PRESETS.iter().position(|p| p == self)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        // Also rejects NaN bounds.
        if self.max_db > self.min_db {
            Ok(())
        } else {
            Err(EngineError::InvalidDisplayRange {
                min_db: self.min_db,
                max_db: self.max_db,
            })
        }
    }

    pub fn normalize(&self, decibels: f32) -> f32 {
        normalize(decibels, self.min_db, self.max_db)
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self::PRESETS[0]
    }
}

/// Maps `decibels` into [0, 1] over the window `min_db..max_db`.
///
/// `-inf` and anything at or below `min_db` give exactly 0; anything at or
/// above `max_db` gives exactly 1. The caller guarantees `max_db > min_db`.
pub fn normalize(decibels: f32, min_db: f32, max_db: f32) -> f32 {
    ((decibels - min_db) / (max_db - min_db)).clamp(0.0, 1.0)
}
