//! # Note Strength Module
//!
//! Samples the loudness of every tuned note and combines the octaves of
//! each note class into one aggregate loudness.
//!
//! Octaves are combined in the power domain: each decibel value becomes a
//! linear power `10^(db/10)`, the powers are summed, and the sum goes back
//! to decibels with `10 * log10(sum)`. Averaging decibel values directly is
//! wrong and must not be used. Two octaves at -40 dB combine to about
//! -37 dB, not -40 dB.

use crate::notes::{NOTE_COUNT, NoteClass, OCTAVE_COUNT, Octave};
use crate::spectrum::MagnitudeSpectrum;
use crate::tuning::{TunedNote, TuningSystem, TuningSystemId};

/// Decibel floor at or below which a sample counts as silence.
///
/// Analysers report silence either as `-inf` or as a very negative finite
/// value. Both are treated the same way when summing power.
pub const SILENCE_FLOOR_DB: f32 = -300.0;

/// The measured loudness of one tuned note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteStrength {
    pub tuned: TunedNote,
    /// Measured loudness in dB, possibly `-inf`
    pub decibels: f32,
}

impl NoteStrength {
    pub fn note(&self) -> NoteClass {
        self.tuned.note
    }

    pub fn octave(&self) -> Octave {
        self.tuned.octave
    }

    pub fn color(&self) -> &'static str {
        self.tuned.note.color()
    }
}

/// The power-summed loudness of one note class across all octaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateNoteStrength {
    pub note: NoteClass,
    pub decibels: f32,
    pub color: &'static str,
}

/// All strengths derived from one spectrum under one tuning system.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteStrengths {
    tuning: TuningSystemId,
    per_octave: Vec<NoteStrength>,
    aggregates: Vec<AggregateNoteStrength>,
}

impl NoteStrengths {
    pub fn tuning(&self) -> TuningSystemId {
        self.tuning
    }

    /// One entry per tuned note (120), in tuning table order.
    pub fn per_octave(&self) -> &[NoteStrength] {
        &self.per_octave
    }

    /// One entry per note class (12), in canonical order.
    pub fn aggregates(&self) -> &[AggregateNoteStrength] {
        &self.aggregates
    }

    /// Measured loudness of a note in one octave.
    pub fn strength(&self, note: NoteClass, octave: Octave) -> f32 {
        // Same note-major layout as the tuning table.
        self.per_octave[note.semitone_index() * OCTAVE_COUNT + octave.index() as usize].decibels
    }

    /// Aggregate loudness of a note class.
    pub fn aggregate(&self, note: NoteClass) -> f32 {
        self.aggregates[note.semitone_index()].decibels
    }
}

/// Combines decibel values by summing their linear powers.
///
/// Values at or below [`SILENCE_FLOOR_DB`], and NaN, contribute no power.
/// When nothing contributes the result is `-inf`; `log10(0)` is never
/// evaluated. The result does not depend on the order of the inputs.
pub fn power_sum_db<I>(decibels: I) -> f32
where
    I: IntoIterator<Item = f32>,
{
    let total: f64 = decibels
        .into_iter()
        .filter(|db| *db > SILENCE_FLOOR_DB)
        .map(|db| 10.0_f64.powf(db as f64 / 10.0))
        .sum();

    if total > 0.0 {
        (10.0 * total.log10()) as f32
    } else {
        f32::NEG_INFINITY
    }
}

/// Samples every tuned note and aggregates each note class.
///
/// # Arguments
/// * `tuning` - The active tuning table
/// * `spectrum` - Magnitude spectrum snapshot for this analysis cycle
pub fn compute_strengths(tuning: &TuningSystem, spectrum: &MagnitudeSpectrum) -> NoteStrengths {
    let per_octave: Vec<NoteStrength> = tuning
        .iter()
        .map(|&tuned| NoteStrength {
            tuned,
            decibels: spectrum.sample(tuned.frequency),
        })
        .collect();

    let aggregates: Vec<AggregateNoteStrength> = NoteClass::ALL
        .iter()
        .map(|&note| AggregateNoteStrength {
            note,
            decibels: power_sum_db(
                per_octave
                    .iter()
                    .filter(|s| s.note() == note)
                    .map(|s| s.decibels),
            ),
            color: note.color(),
        })
        .collect();
    debug_assert_eq!(aggregates.len(), NOTE_COUNT);

    NoteStrengths {
        tuning: tuning.id(),
        per_octave,
        aggregates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::tuning_system;

    #[test]
    fn single_term_is_unchanged() {
        assert!((power_sum_db([-40.0]) + 40.0).abs() < 1e-4);
        assert!((power_sum_db([-40.0, f32::NEG_INFINITY, f32::NEG_INFINITY]) + 40.0).abs() < 1e-4);
    }

    #[test]
    fn equal_terms_add_three_decibels() {
        // 10 * log10(2e-4) = -36.99
        let sum = power_sum_db([-40.0, -40.0]);
        assert!((sum - (-36.9897)).abs() < 1e-3, "got {sum}");
        let mean = (-40.0 + -40.0) / 2.0;
        assert!(sum > mean);
    }

    #[test]
    fn all_silent_is_negative_infinity() {
        let sum = power_sum_db([f32::NEG_INFINITY; OCTAVE_COUNT]);
        assert_eq!(sum, f32::NEG_INFINITY);
        assert!(!sum.is_nan());
        assert_eq!(power_sum_db(std::iter::empty()), f32::NEG_INFINITY);
    }

    #[test]
    fn floor_values_count_as_silence() {
        assert_eq!(power_sum_db([SILENCE_FLOOR_DB, -1000.0, f32::NAN]), f32::NEG_INFINITY);
        assert!((power_sum_db([-299.0]) + 299.0).abs() < 1e-2);
    }

    #[test]
    fn strengths_cover_every_note_and_octave() {
        let tuning = tuning_system(TuningSystemId::EqualTemperament);
        let spectrum = MagnitudeSpectrum::new(44100.0, vec![-60.0; 1024]);
        let strengths = compute_strengths(tuning, &spectrum);

        assert_eq!(strengths.per_octave().len(), 120);
        assert_eq!(strengths.aggregates().len(), 12);
        assert_eq!(strengths.tuning(), TuningSystemId::EqualTemperament);
        for (aggregate, note) in strengths.aggregates().iter().zip(NoteClass::ALL) {
            assert_eq!(aggregate.note, note);
            assert_eq!(aggregate.color, note.color());
            // Ten octaves at -60 dB: -60 + 10 dB.
            assert!((aggregate.decibels + 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn strength_lookup_by_note_and_octave() {
        let tuning = tuning_system(TuningSystemId::EqualTemperament);
        let mut data = vec![f32::NEG_INFINITY; 1024];
        data[20] = -40.0;
        let strengths = compute_strengths(tuning, &MagnitudeSpectrum::new(44100.0, data));

        let a4 = Octave::new(4).unwrap();
        assert_eq!(strengths.strength(NoteClass::A, a4), -40.0);
        assert_eq!(strengths.strength(NoteClass::A, Octave::new(5).unwrap()), f32::NEG_INFINITY);
        assert!((strengths.aggregate(NoteClass::A) + 40.0).abs() < 1e-4);
        assert_eq!(strengths.aggregate(NoteClass::C), f32::NEG_INFINITY);
    }
}
