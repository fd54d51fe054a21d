//! # Layout Module
//!
//! Plans the note-strength grid: 12 note rows by one column per visible
//! octave, plus the bars and labels an external renderer draws into it.
//!
//! ## Geometry
//! - Rows run from B at the top to C at the bottom
//! - Columns run "OALL" first, then octave 9 down to 0
//! - The drawing area is the canvas minus fixed margins; rows and columns
//!   divide it evenly
//!
//! Everything here is plain numbers. Nothing draws.

use crate::engine::Frame;
use crate::notes::{ColumnKey, NOTE_COUNT, NoteClass};
use crate::visibility::OctaveVisibility;

/// Space reserved around the drawing area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 40.0,
            right: 20.0,
            top: 20.0,
            bottom: 20.0,
        }
    }
}

/// Gap between adjacent bars.
pub const BAR_GAP: f32 = 2.0;
/// Distance of a value label above the bottom of its cell.
pub const VALUE_LABEL_INSET: f32 = 5.0;
/// Horizontal position of the note labels.
pub const NOTE_LABEL_X: f32 = 10.0;
/// Distance of the column labels above the bottom of the canvas.
pub const COLUMN_LABEL_INSET: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub key: ColumnKey,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub note: NoteClass,
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// A text label anchored at its centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// One filled bar of the grid with its value label.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub note: NoteClass,
    pub key: ColumnKey,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Normalized intensity in [0, 1]
    pub intensity: f32,
    pub color: &'static str,
    pub label: Label,
}

/// Plans the grid with the default margins.
pub fn plan_layout(visibility: &OctaveVisibility, canvas_width: f32, canvas_height: f32) -> Layout {
    plan_layout_with_margins(visibility, canvas_width, canvas_height, Margins::default())
}

/// Plans rows and columns for the visible octaves.
///
/// With no visible column the column list is empty; no width is computed
/// from a zero count.
pub fn plan_layout_with_margins(
    visibility: &OctaveVisibility,
    canvas_width: f32,
    canvas_height: f32,
    margins: Margins,
) -> Layout {
    let area_width = (canvas_width - margins.left - margins.right).max(0.0);
    let area_height = (canvas_height - margins.top - margins.bottom).max(0.0);

    let keys: Vec<ColumnKey> = visibility.visible_columns().collect();
    let columns = if keys.is_empty() {
        Vec::new()
    } else {
        let width = area_width / keys.len() as f32;
        keys.into_iter()
            .enumerate()
            .map(|(i, key)| Column {
                key,
                x: margins.left + i as f32 * width,
                width,
            })
            .collect()
    };

    let height = area_height / NOTE_COUNT as f32;
    let rows = NoteClass::ALL
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &note)| Row {
            note,
            y: margins.top + i as f32 * height,
            height,
        })
        .collect();

    Layout {
        canvas_width,
        canvas_height,
        columns,
        rows,
    }
}

impl Layout {
    /// Note names down the left edge, one per row.
    pub fn row_labels(&self) -> Vec<Label> {
        self.rows
            .iter()
            .map(|row| Label {
                text: row.note.name().to_string(),
                x: NOTE_LABEL_X,
                y: row.y + row.height / 2.0,
            })
            .collect()
    }

    /// Column names along the bottom edge.
    pub fn column_labels(&self) -> Vec<Label> {
        self.columns
            .iter()
            .map(|column| Label {
                text: column.key.label(),
                x: column.x + column.width / 2.0,
                y: self.canvas_height - COLUMN_LABEL_INSET,
            })
            .collect()
    }

    /// One bar per cell, filled from the bottom of the cell up to the
    /// cell's normalized intensity.
    pub fn bars(&self, frame: &Frame) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(self.rows.len() * self.columns.len());
        for row in &self.rows {
            for column in &self.columns {
                let (decibels, intensity) = frame.cell(row.note, column.key);
                let bar_width = (column.width - BAR_GAP).max(0.0);
                let bar_height = intensity * row.height;
                bars.push(Bar {
                    note: row.note,
                    key: column.key,
                    x: column.x,
                    y: row.y + (row.height - bar_height),
                    width: bar_width,
                    height: bar_height,
                    intensity,
                    color: row.note.color(),
                    label: Label {
                        text: format_decibels(decibels),
                        x: column.x + bar_width / 2.0,
                        y: row.y + row.height - VALUE_LABEL_INSET,
                    },
                });
            }
        }
        bars
    }
}

/// Decibel value with one decimal, e.g. "-40.0" or "-inf".
pub fn format_decibels(decibels: f32) -> String {
    format!("{decibels:.1}")
}
