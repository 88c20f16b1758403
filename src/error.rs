//! Error types for the document session boundary

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`DocumentSession`](crate::session::DocumentSession) call
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("No table is active at the cursor")]
    NoActiveTable,

    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} table")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Rejected by document session: {0}")]
    Rejected(String),
}

/// Destination table dimensions that cannot describe a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Rows and columns must be positive numbers (got {rows}x{cols})")]
pub struct ShapeError {
    pub rows: i64,
    pub cols: i64,
}

/// Result type alias for session calls
pub type SessionResult<T> = std::result::Result<T, SessionError>;
