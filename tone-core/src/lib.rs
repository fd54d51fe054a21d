// tone-core/src/lib.rs

//! The core logic for the note-strength visualizer.
//! This crate maps musical notes to frequencies, reads their loudness from
//! a magnitude spectrum, combines octaves in the power domain and plans the
//! display grid. It is completely headless: spectra come from an external
//! analyser and the returned geometry goes to an external renderer.

pub mod engine;
pub mod error;
pub mod layout;
pub mod notes;
pub mod range;
pub mod settings;
pub mod spectrum;
pub mod strength;
pub mod tuning;
pub mod visibility;
pub mod worker;

pub use engine::{Engine, EngineState, Frame, NormalizedStrength, render};
pub use error::EngineError;
pub use layout::{Bar, Column, Label, Layout, Row, plan_layout};
pub use notes::{ColumnKey, NoteClass, Octave};
pub use range::{DisplayRange, normalize};
pub use spectrum::{MagnitudeSpectrum, sample_strength};
pub use strength::{AggregateNoteStrength, NoteStrength, NoteStrengths, compute_strengths, power_sum_db};
pub use tuning::{TunedNote, TuningSystem, TuningSystemId, build_tuning_system, tuning_system};
pub use visibility::OctaveVisibility;
