//! # Tuning Module
//!
//! Maps every (note class, octave) pair to a target frequency under a
//! selectable tuning system.
//!
//! ## Tuning systems
//! - **Equal temperament**: 2^(1/12) per semitone from C0 = 16.35 Hz
//! - **Chakra**: a hand-specified table anchored on C4 = 198 Hz
//!
//! Tables are data, not code branches. Each system is built once on first
//! use and cached for the lifetime of the process.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::notes::{NOTE_COUNT, NoteClass, OCTAVE_COUNT, Octave};

/// Reference frequency of C0 for equal temperament, in Hz.
pub const C0_FREQUENCY_HZ: f32 = 16.35;

/// Identifier of a tuning system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TuningSystemId {
    EqualTemperament,
    #[default]
    Chakra,
}

impl TuningSystemId {
    pub const ALL: [TuningSystemId; 2] = [TuningSystemId::EqualTemperament, TuningSystemId::Chakra];

    /// Stable identifier used in settings files.
    pub fn id(self) -> &'static str {
        match self {
            TuningSystemId::EqualTemperament => "equal-temperament",
            TuningSystemId::Chakra => "chakra",
        }
    }

    /// Short name for status displays.
    pub fn display_name(self) -> &'static str {
        match self {
            TuningSystemId::EqualTemperament => "Equal",
            TuningSystemId::Chakra => "Chakra",
        }
    }

    /// The other tuning system. Two systems, one toggle.
    pub fn toggled(self) -> TuningSystemId {
        match self {
            TuningSystemId::EqualTemperament => TuningSystemId::Chakra,
            TuningSystemId::Chakra => TuningSystemId::EqualTemperament,
        }
    }
}

impl fmt::Display for TuningSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TuningSystemId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TuningSystemId::ALL
            .into_iter()
            .find(|id| id.id() == s)
            .ok_or_else(|| EngineError::UnknownTuningSystem(s.to_string()))
    }
}

/// A note class in one octave with its target frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunedNote {
    pub note: NoteClass,
    pub octave: Octave,
    /// Target frequency in Hz
    pub frequency: f32,
}

impl TunedNote {
    /// Name such as "A4" or "C#0".
    pub fn name(&self) -> String {
        format!("{}{}", self.note, self.octave)
    }

    pub fn color(&self) -> &'static str {
        self.note.color()
    }
}

/// A complete table of 120 tuned notes.
///
/// Entries are stored note-major: all octaves of C, then all octaves of C#,
/// and so on, each run ordered low to high.
#[derive(Debug, Clone)]
pub struct TuningSystem {
    id: TuningSystemId,
    notes: Vec<TunedNote>,
}

impl TuningSystem {
    /// Builds a table from a frequency lookup indexed `[note][octave]`.
    ///
    /// # Panics
    /// If the table breaks monotonicity. A malformed table is a programming
    /// error, not a runtime condition.
    fn from_table(id: TuningSystemId, table: &[[f32; OCTAVE_COUNT]; NOTE_COUNT]) -> Self {
        let notes: Vec<TunedNote> = NoteClass::ALL
            .iter()
            .flat_map(|&note| {
                Octave::ascending().map(move |octave| TunedNote {
                    note,
                    octave,
                    frequency: table[note.semitone_index()][octave.index() as usize],
                })
            })
            .collect();

        let system = TuningSystem { id, notes };
        system.assert_well_formed();
        system
    }

    fn assert_well_formed(&self) {
        assert_eq!(self.notes.len(), NOTE_COUNT * OCTAVE_COUNT, "{}: wrong entry count", self.id);
        for note in NoteClass::ALL {
            for octave in Octave::ascending().skip(1) {
                let below = Octave::new(octave.index() - 1).unwrap_or(Octave::MIN);
                assert!(
                    self.frequency(note, octave) > self.frequency(note, below),
                    "{}: {}{} is not above {}{}",
                    self.id, note, octave, note, below
                );
            }
        }
        for octave in Octave::ascending() {
            for pair in NoteClass::ALL.windows(2) {
                assert!(
                    self.frequency(pair[1], octave) > self.frequency(pair[0], octave),
                    "{}: {}{} is not above {}{}",
                    self.id, pair[1], octave, pair[0], octave
                );
            }
        }
    }

    pub fn id(&self) -> TuningSystemId {
        self.id
    }

    /// Target frequency of a note in an octave, in Hz.
    pub fn frequency(&self, note: NoteClass, octave: Octave) -> f32 {
        self.get(note, octave).frequency
    }

    pub fn get(&self, note: NoteClass, octave: Octave) -> &TunedNote {
        &self.notes[note.semitone_index() * OCTAVE_COUNT + octave.index() as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TunedNote> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Builds the table for a tuning system. Pure and deterministic.
pub fn build_tuning_system(id: TuningSystemId) -> TuningSystem {
    log::debug!("[TUNING] Building tuning table: {}", id);
    match id {
        TuningSystemId::EqualTemperament => {
            TuningSystem::from_table(id, &equal_temperament_table())
        }
        TuningSystemId::Chakra => TuningSystem::from_table(id, &CHAKRA_TABLE),
    }
}

/// Returns the cached table for a tuning system.
pub fn tuning_system(id: TuningSystemId) -> &'static TuningSystem {
    // Every id is inserted when the registry is built.
    &REGISTRY[&id]
}

static REGISTRY: Lazy<BTreeMap<TuningSystemId, TuningSystem>> = Lazy::new(|| {
    TuningSystemId::ALL
        .into_iter()
        .map(|id| (id, build_tuning_system(id)))
        .collect()
});

/// f = 16.35 * 2^(octave + semitone / 12)
fn equal_temperament_table() -> [[f32; OCTAVE_COUNT]; NOTE_COUNT] {
    let mut table = [[0.0; OCTAVE_COUNT]; NOTE_COUNT];
    for (semitone, row) in table.iter_mut().enumerate() {
        for (octave, cell) in row.iter_mut().enumerate() {
            *cell = C0_FREQUENCY_HZ * 2.0_f32.powf(octave as f32 + semitone as f32 / 12.0);
        }
    }
    table
}

#[rustfmt::skip]
const CHAKRA_TABLE: [[f32; OCTAVE_COUNT]; NOTE_COUNT] = [
    [12.375, 24.750, 49.500,  99.000, 198.000, 396.000,  792.000, 1584.000, 3168.000,  6336.000],
    [12.699, 25.398, 50.796, 101.591, 203.182, 406.364,  812.729, 1625.457, 3250.915,  6501.830],
    [13.031, 26.063, 52.125, 104.250, 208.500, 417.000,  834.000, 1668.000, 3336.000,  6672.000],
    [14.663, 29.327, 58.654, 117.307, 234.615, 469.229,  938.458, 1876.917, 3753.833,  7507.666],
    [16.500, 33.000, 66.000, 132.000, 264.000, 528.000, 1056.000, 2112.000, 4224.000,  8448.000],
    [19.969, 39.938, 79.875, 159.750, 319.500, 639.000, 1278.000, 2556.000, 5112.000, 10224.000],
    [21.504, 43.007, 86.014, 172.028, 344.056, 688.113, 1376.225, 2752.451, 5504.901, 11009.802],
    [23.156, 46.313, 92.625, 185.250, 370.500, 741.000, 1482.000, 2964.000, 5928.000, 11856.000],
    [24.830, 49.660, 99.321, 198.641, 397.282, 794.564, 1589.128, 3178.256, 6356.512, 12713.025],
    [26.625, 53.250, 106.500, 213.000, 426.000, 852.000, 1704.000, 3408.000, 6816.000, 13632.000],
    [28.306, 56.613, 113.225, 226.450, 452.901, 905.801, 1811.603, 3623.205, 7246.410, 14492.821],
    [30.094, 60.188, 120.375, 240.750, 481.500, 963.000, 1926.000, 3852.000, 7704.000, 15408.000],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn octave(i: u8) -> Octave {
        Octave::new(i).unwrap()
    }

    #[test]
    fn every_system_has_120_entries() {
        for id in TuningSystemId::ALL {
            let system = tuning_system(id);
            assert_eq!(system.len(), 120);
            assert_eq!(system.id(), id);
        }
    }

    #[test]
    fn equal_temperament_reference_points() {
        let et = tuning_system(TuningSystemId::EqualTemperament);
        assert!((et.frequency(NoteClass::C, octave(0)) - 16.35).abs() < 1e-4);
        assert!((et.frequency(NoteClass::A, octave(4)) - 440.0).abs() < 0.1);
        assert!((et.frequency(NoteClass::C, octave(5)) - 523.2).abs() < 0.1);
    }

    #[test]
    fn equal_temperament_semitone_ratio() {
        let et = tuning_system(TuningSystemId::EqualTemperament);
        let ratio = et.frequency(NoteClass::CSharp, octave(3)) / et.frequency(NoteClass::C, octave(3));
        assert!((ratio - 2.0_f32.powf(1.0 / 12.0)).abs() < 1e-5);
    }

    #[test]
    fn chakra_table_lookup() {
        let chakra = tuning_system(TuningSystemId::Chakra);
        assert_eq!(chakra.frequency(NoteClass::C, octave(4)), 198.0);
        assert_eq!(chakra.frequency(NoteClass::A, octave(4)), 426.0);
        assert_eq!(chakra.frequency(NoteClass::B, octave(9)), 15408.0);
    }

    #[test]
    fn get_returns_matching_entry() {
        let chakra = tuning_system(TuningSystemId::Chakra);
        let entry = chakra.get(NoteClass::FSharp, octave(2));
        assert_eq!(entry.note, NoteClass::FSharp);
        assert_eq!(entry.octave, octave(2));
        assert_eq!(entry.name(), "F#2");
        assert_eq!(entry.color(), "#81C784");
    }

    #[test]
    fn ids_round_trip_through_strings() {
        for id in TuningSystemId::ALL {
            assert_eq!(id.id().parse::<TuningSystemId>(), Ok(id));
        }
        assert!(matches!(
            "werckmeister".parse::<TuningSystemId>(),
            Err(EngineError::UnknownTuningSystem(_))
        ));
        assert_eq!(TuningSystemId::Chakra.toggled(), TuningSystemId::EqualTemperament);
        assert_eq!(TuningSystemId::Chakra.toggled().toggled(), TuningSystemId::Chakra);
    }

    #[test]
    fn build_is_deterministic() {
        let a = build_tuning_system(TuningSystemId::EqualTemperament);
        let b = build_tuning_system(TuningSystemId::EqualTemperament);
        assert!(a.iter().zip(b.iter()).all(|(x, y)| x == y));
    }
}
