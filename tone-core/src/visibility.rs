//! Which columns of the display grid are shown.

use serde::{Deserialize, Serialize};

use crate::notes::{ColumnKey, OCTAVE_COUNT, Octave};

/// Per-octave visibility flags plus the all-octave aggregate column.
///
/// Nothing forces a flag to be set; an empty selection plans an empty grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctaveVisibility {
    /// The "OALL" aggregate column
    pub all: bool,
    /// Indexed by octave number
    pub octaves: [bool; OCTAVE_COUNT],
}

impl OctaveVisibility {
    pub fn none() -> Self {
        Self {
            all: false,
            octaves: [false; OCTAVE_COUNT],
        }
    }

    pub fn everything() -> Self {
        Self {
            all: true,
            octaves: [true; OCTAVE_COUNT],
        }
    }

    pub fn is_visible(&self, key: ColumnKey) -> bool {
        match key {
            ColumnKey::All => self.all,
            ColumnKey::Octave(octave) => self.octaves[octave.index() as usize],
        }
    }

    pub fn set(&mut self, key: ColumnKey, visible: bool) {
        match key {
            ColumnKey::All => self.all = visible,
            ColumnKey::Octave(octave) => self.octaves[octave.index() as usize] = visible,
        }
    }

    /// Flips a column and returns its new visibility.
    pub fn toggle(&mut self, key: ColumnKey) -> bool {
        let visible = !self.is_visible(key);
        self.set(key, visible);
        visible
    }

    /// Visible columns, left to right: "OALL" first, then octave 9 down to 0.
    pub fn visible_columns(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        std::iter::once(ColumnKey::All)
            .chain(Octave::descending().map(ColumnKey::Octave))
            .filter(|&key| self.is_visible(key))
    }

    pub fn visible_count(&self) -> usize {
        self.visible_columns().count()
    }
}

impl Default for OctaveVisibility {
    /// Octaves 1, 2, 4, 5 and 6 shown; aggregate hidden.
    fn default() -> Self {
        let mut visibility = Self::none();
        for index in [1, 2, 4, 5, 6] {
            visibility.octaves[index] = true;
        }
        visibility
    }
}
