//! # Engine Module
//!
//! Ties the stages together. The user's selections live in an explicit
//! [`EngineState`] value and a render is a pure function of
//! `(EngineState, MagnitudeSpectrum)`.
//!
//! [`Engine`] adds incremental recomputation on top of [`render`]:
//! - a new spectrum or tuning system re-samples every note
//! - a new display range only re-normalizes
//! - a new octave selection only changes the layout

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::layout::{Layout, plan_layout};
use crate::notes::{ColumnKey, NoteClass, Octave};
use crate::range::DisplayRange;
use crate::spectrum::MagnitudeSpectrum;
use crate::strength::{NoteStrengths, compute_strengths};
use crate::tuning::{TuningSystemId, tuning_system};
use crate::visibility::OctaveVisibility;

/// The user-mutable selections. Always read as one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineState {
    pub tuning: TuningSystemId,
    pub range: DisplayRange,
    pub visibility: OctaveVisibility,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minDb: {}, maxDb: {} ({})",
            self.range.min_db,
            self.range.max_db,
            self.tuning.display_name()
        )
    }
}

/// A note-strength value together with its display intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedStrength {
    pub note: NoteClass,
    pub decibels: f32,
    pub intensity: f32,
    pub color: &'static str,
}

/// The renderable result of one analysis cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    state: EngineState,
    strengths: Arc<NoteStrengths>,
}

impl Frame {
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn strengths(&self) -> &NoteStrengths {
        &self.strengths
    }

    /// The same strengths under another display range.
    pub fn with_range(&self, range: DisplayRange) -> Frame {
        Frame {
            state: EngineState { range, ..self.state },
            strengths: Arc::clone(&self.strengths),
        }
    }

    pub fn intensity(&self, note: NoteClass, octave: Octave) -> f32 {
        self.state.range.normalize(self.strengths.strength(note, octave))
    }

    pub fn aggregate_intensity(&self, note: NoteClass) -> f32 {
        self.state.range.normalize(self.strengths.aggregate(note))
    }

    /// Decibels and intensity for one grid cell.
    pub fn cell(&self, note: NoteClass, key: ColumnKey) -> (f32, f32) {
        let decibels = match key {
            ColumnKey::All => self.strengths.aggregate(note),
            ColumnKey::Octave(octave) => self.strengths.strength(note, octave),
        };
        (decibels, self.state.range.normalize(decibels))
    }

    /// The 12 aggregates in canonical order, normalized.
    pub fn normalized_aggregates(&self) -> Vec<NormalizedStrength> {
        self.strengths
            .aggregates()
            .iter()
            .map(|a| NormalizedStrength {
                note: a.note,
                decibels: a.decibels,
                intensity: self.state.range.normalize(a.decibels),
                color: a.color,
            })
            .collect()
    }

    /// Grid geometry for this frame's octave selection.
    pub fn layout(&self, canvas_width: f32, canvas_height: f32) -> Layout {
        plan_layout(&self.state.visibility, canvas_width, canvas_height)
    }
}

/// Computes a frame from one state snapshot and one spectrum.
pub fn render(state: &EngineState, spectrum: &MagnitudeSpectrum) -> Frame {
    let strengths = compute_strengths(tuning_system(state.tuning), spectrum);
    Frame {
        state: *state,
        strengths: Arc::new(strengths),
    }
}

/// Holds the active selections and the latest results, recomputing only
/// the stages a change affects.
#[derive(Debug, Default)]
pub struct Engine {
    state: EngineState,
    /// Latest spectrum only, kept so a tuning change can re-sample it
    spectrum: Option<MagnitudeSpectrum>,
    frame: Option<Frame>,
}

impl Engine {
    pub fn new(state: EngineState) -> Self {
        Self {
            state,
            spectrum: None,
            frame: None,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The latest frame, if a spectrum has been analysed.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Analyses a new spectrum, replacing the previous one.
    pub fn analyze(&mut self, spectrum: MagnitudeSpectrum) -> &Frame {
        log::debug!(
            "[ENGINE] Analysing {} bins at {} Hz ({})",
            spectrum.len(),
            spectrum.sample_rate_hz(),
            self.state.tuning
        );
        let frame = render(&self.state, &spectrum);
        self.spectrum = Some(spectrum);
        self.frame.insert(frame)
    }

    /// Switches tuning system. Previous strengths are discarded and the
    /// latest spectrum, if any, is re-sampled.
    pub fn set_tuning(&mut self, tuning: TuningSystemId) -> Option<&Frame> {
        if tuning != self.state.tuning {
            log::info!("[ENGINE] Tuning system: {} -> {}", self.state.tuning, tuning);
            self.state.tuning = tuning;
            self.frame = self.spectrum.as_ref().map(|s| render(&self.state, s));
        }
        self.frame.as_ref()
    }

    pub fn toggle_tuning(&mut self) -> Option<&Frame> {
        self.set_tuning(self.state.tuning.toggled())
    }

    /// Changes the display range. Strengths are kept and only re-normalized.
    pub fn set_range(&mut self, range: DisplayRange) -> Result<Option<&Frame>, EngineError> {
        if let Err(e) = range.validate() {
            log::warn!("[ENGINE] Rejected display range: {}", e);
            return Err(e);
        }
        log::info!("[ENGINE] Display range: {}..{} dB", range.min_db, range.max_db);
        self.state.range = range;
        if let Some(frame) = self.frame.as_mut() {
            *frame = frame.with_range(range);
        }
        Ok(self.frame.as_ref())
    }

    /// Selects a display range preset, 0 = A.
    pub fn select_preset(&mut self, index: usize) -> Result<Option<&Frame>, EngineError> {
        let range = DisplayRange::preset(index)?;
        self.set_range(range)
    }

    /// Replaces the octave selection. Strengths and intensities are kept.
    pub fn set_visibility(&mut self, visibility: OctaveVisibility) {
        self.state.visibility = visibility;
        if let Some(frame) = self.frame.as_mut() {
            frame.state.visibility = visibility;
        }
    }

    /// Flips one column and returns its new visibility.
    pub fn toggle_column(&mut self, key: ColumnKey) -> bool {
        let mut visibility = self.state.visibility;
        let visible = visibility.toggle(key);
        log::debug!("[ENGINE] Column {} visible: {}", key, visible);
        self.set_visibility(visibility);
        visible
    }

    /// Grid geometry for the active octave selection.
    pub fn layout(&self, canvas_width: f32, canvas_height: f32) -> Layout {
        plan_layout(&self.state.visibility, canvas_width, canvas_height)
    }
}
