//! # Notes Module
//!
//! The fixed vocabulary of the engine: the 12 note classes, the 10 octave
//! registers and the column keys used by the display grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Number of note classes in one octave.
pub const NOTE_COUNT: usize = 12;

/// Number of octave registers, 0 through 9.
pub const OCTAVE_COUNT: usize = 10;

/// One of the 12 pitch names repeating every octave.
///
/// The declaration order is the canonical order (C lowest, B highest) and
/// `as usize` yields the semitone index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoteClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl NoteClass {
    /// All note classes in canonical order.
    pub const ALL: [NoteClass; NOTE_COUNT] = [
        NoteClass::C,
        NoteClass::CSharp,
        NoteClass::D,
        NoteClass::DSharp,
        NoteClass::E,
        NoteClass::F,
        NoteClass::FSharp,
        NoteClass::G,
        NoteClass::GSharp,
        NoteClass::A,
        NoteClass::ASharp,
        NoteClass::B,
    ];

    /// Semitone offset from C, 0..11.
    pub fn semitone_index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<NoteClass> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            NoteClass::C => "C",
            NoteClass::CSharp => "C#",
            NoteClass::D => "D",
            NoteClass::DSharp => "D#",
            NoteClass::E => "E",
            NoteClass::F => "F",
            NoteClass::FSharp => "F#",
            NoteClass::G => "G",
            NoteClass::GSharp => "G#",
            NoteClass::A => "A",
            NoteClass::ASharp => "A#",
            NoteClass::B => "B",
        }
    }

    /// Display color as a `#RRGGBB` string.
    pub fn color(self) -> &'static str {
        match self {
            NoteClass::C => "#E57373",
            NoteClass::CSharp => "#FF8A65",
            NoteClass::D => "#FFB74D",
            NoteClass::DSharp => "#FFD54F",
            NoteClass::E => "#FFF176",
            NoteClass::F => "#AED581",
            NoteClass::FSharp => "#81C784",
            NoteClass::G => "#4DD0E1",
            NoteClass::GSharp => "#4FC3F7",
            NoteClass::A => "#7986CB",
            NoteClass::ASharp => "#BA68C8",
            NoteClass::B => "#F06292",
        }
    }

    /// Display color as RGB bytes, for renderers that take numeric colors.
    pub fn rgb(self) -> [u8; 3] {
        let hex = &self.color()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4)]
    }
}

impl fmt::Display for NoteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An octave register, 0 (lowest) through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Octave(u8);

impl Octave {
    pub const MIN: Octave = Octave(0);
    pub const MAX: Octave = Octave(OCTAVE_COUNT as u8 - 1);

    pub fn new(index: u8) -> Option<Octave> {
        ((index as usize) < OCTAVE_COUNT).then_some(Octave(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// All octaves, low to high.
    pub fn ascending() -> impl DoubleEndedIterator<Item = Octave> + Clone {
        (0..OCTAVE_COUNT as u8).map(Octave)
    }

    /// All octaves, high to low. This is the left-to-right column order.
    pub fn descending() -> impl Iterator<Item = Octave> + Clone {
        Self::ascending().rev()
    }
}

impl TryFrom<u8> for Octave {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Octave::new(value).ok_or_else(|| format!("octave {value} is outside 0..=9"))
    }
}

impl From<Octave> for u8 {
    fn from(octave: Octave) -> u8 {
        octave.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A column of the display grid: the all-octave aggregate or one octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    All,
    Octave(Octave),
}

impl ColumnKey {
    /// Axis label, "OALL" or "O0".."O9".
    pub fn label(self) -> String {
        match self {
            ColumnKey::All => "OALL".to_string(),
            ColumnKey::Octave(octave) => format!("O{octave}"),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for ColumnKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "OALL" {
            return Ok(ColumnKey::All);
        }
        s.strip_prefix('O')
            .and_then(|digits| digits.parse::<u8>().ok())
            .and_then(Octave::new)
            .map(ColumnKey::Octave)
            .ok_or_else(|| EngineError::UnknownColumn(s.to_string()))
    }
}
