//! Writing a [`Grid`] into a table of fixed size.
//!
//! The destination shape always wins: grid content beyond it is dropped and
//! destination cells beyond the grid are left as they are.

use crate::error::{SessionResult, ShapeError};
use crate::session::DocumentSession;
use crate::table::{Grid, max_row_width};
use std::fmt;

/// Declared dimensions of the destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableShape {
    rows: usize,
    cols: usize,
}

impl TableShape {
    /// Validate caller-supplied dimensions. Zero or negative values are rejected.
    pub fn new(rows: i64, cols: i64) -> Result<Self, ShapeError> {
        if rows <= 0 || cols <= 0 {
            return Err(ShapeError { rows, cols });
        }
        Ok(Self {
            rows: rows as usize,
            cols: cols as usize,
        })
    }

    /// Shape that exactly covers the grid's row count and the given width.
    pub fn for_grid(grid: &Grid, cols: usize) -> Result<Self, ShapeError> {
        Self::new(grid.len() as i64, cols as i64)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Grid content that will not fit the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub shape: TableShape,
}

impl SizeMismatch {
    pub fn extra_rows(&self) -> bool {
        self.grid_rows > self.shape.rows
    }

    pub fn extra_cols(&self) -> bool {
        self.grid_cols > self.shape.cols
    }
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.extra_rows(), self.extra_cols()) {
            (true, false) => write!(
                f,
                "Data has {} rows but table has only {} rows",
                self.grid_rows, self.shape.rows
            ),
            (false, true) => write!(
                f,
                "Data has {} columns but table has only {} columns",
                self.grid_cols, self.shape.cols
            ),
            _ => write!(
                f,
                "Data is {}x{} but table is only {}",
                self.grid_rows, self.grid_cols, self.shape
            ),
        }
    }
}

/// Compare the grid to the destination before filling.
pub fn size_mismatch(grid: &Grid, shape: TableShape) -> Option<SizeMismatch> {
    let grid_rows = grid.len();
    let grid_cols = max_row_width(grid);
    if grid_rows > shape.rows || grid_cols > shape.cols {
        Some(SizeMismatch {
            grid_rows,
            grid_cols,
            shape,
        })
    } else {
        None
    }
}

/// Outcome of a fill pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    pub cells_written: usize,
}

/// Write `grid` into the table under the session cursor.
///
/// Only cells inside `shape` are touched. Any session failure ends the fill.
pub fn fill_table(
    session: &mut dyn DocumentSession,
    grid: &Grid,
    shape: TableShape,
) -> SessionResult<FillReport> {
    let mut report = FillReport::default();
    for (row, cells) in grid.iter().take(shape.rows).enumerate() {
        for (col, text) in cells.iter().take(shape.cols).enumerate() {
            session.move_to_cell(row, col)?;
            session.set_cell_text(text)?;
            log::debug!("Cell ({}, {}): {}", row, col, text);
            report.cells_written += 1;
        }
    }
    Ok(report)
}
