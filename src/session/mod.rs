//! The document automation boundary.
//!
//! Every operation in this crate writes through a [`DocumentSession`] handle
//! passed in by the caller. Nothing here opens a session implicitly; the
//! binary decides which implementation backs a run.

pub mod memory;
pub mod recorder;

pub use memory::MemorySession;
pub use recorder::{Call, RecordingSession};

use crate::error::SessionResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Length in HWPUNIT (1/7200 inch).
pub type HwpUnit = i32;

const HWPUNIT_PER_INCH: f64 = 7200.0;
const MM_PER_INCH: f64 = 25.4;

/// Convert millimetres to HWPUNIT, rounded to the nearest unit.
pub fn mm_to_hwpunit(mm: f64) -> HwpUnit {
    (mm * HWPUNIT_PER_INCH / MM_PER_INCH).round() as HwpUnit
}

/// Convert HWPUNIT back to millimetres.
pub fn hwpunit_to_mm(units: HwpUnit) -> f64 {
    units as f64 * MM_PER_INCH / HWPUNIT_PER_INCH
}

/// Character shape applied to text inserted after it is set.
///
/// `None` fields leave the current value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharStyle {
    pub font_name: Option<String>,
    /// Font height in points
    pub height: Option<f32>,
    pub bold: Option<bool>,
}

impl CharStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font_name: &str) -> Self {
        self.font_name = Some(font_name.to_string());
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Overlay the fields set in `other` onto this style.
    pub fn merged(&self, other: &CharStyle) -> CharStyle {
        CharStyle {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            height: other.height.or(self.height),
            bold: other.bold.or(self.bold),
        }
    }
}

/// Sizing for an inserted picture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PictureOptions {
    pub width: Option<HwpUnit>,
    pub height: Option<HwpUnit>,
    pub maintain_ratio: bool,
}

impl Default for PictureOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            maintain_ratio: true,
        }
    }
}

impl PictureOptions {
    /// Build options from millimetre sizes.
    pub fn from_mm(width_mm: Option<f64>, height_mm: Option<f64>, maintain_ratio: bool) -> Self {
        Self {
            width: width_mm.map(mm_to_hwpunit),
            height: height_mm.map(mm_to_hwpunit),
            maintain_ratio,
        }
    }

    /// True when neither dimension is given and the picture keeps its own size.
    pub fn is_natural_size(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// A live, mutable document held by a word-processor automation backend.
///
/// Calls are applied in order against a single document. Each may fail on
/// its own; callers decide whether a failure ends the operation.
pub trait DocumentSession {
    /// Replace the current document with the file at `path`.
    fn open(&mut self, path: &Path) -> SessionResult<()>;

    fn save_as(&mut self, path: &Path) -> SessionResult<()>;

    /// Insert text at the cursor. `\r\n` and `\n` start a new paragraph.
    fn insert_text(&mut self, text: &str) -> SessionResult<()>;

    fn set_char_style(&mut self, style: &CharStyle) -> SessionResult<()>;

    /// Insert an empty `rows` x `cols` table and put the cursor in its first cell.
    fn create_table(&mut self, rows: usize, cols: usize) -> SessionResult<()>;

    fn move_to_cell(&mut self, row: usize, col: usize) -> SessionResult<()>;

    /// Replace the text of the cell under the cursor.
    fn set_cell_text(&mut self, text: &str) -> SessionResult<()>;

    fn insert_picture(&mut self, path: &Path, options: &PictureOptions) -> SessionResult<()>;

    /// Replace every occurrence of `pattern` and report how many were replaced.
    ///
    /// Zero matches is a success.
    fn find_and_replace_all(&mut self, pattern: &str, replacement: &str) -> SessionResult<usize>;
}
