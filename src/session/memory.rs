//! In-memory document session.
//!
//! Opens markdown or plain text files and saves the document as markdown.
//! Loaded text is kept line for line, so a file that is opened and saved
//! only changes where replacements matched. Replacements run over loaded
//! text, paragraph runs and table cells.

use super::{CharStyle, DocumentSession, PictureOptions};
use crate::elements::{self, Element, TextRun};
use crate::table::Grid;
use crate::error::{SessionError, SessionResult};
use crate::markdown;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct MemorySession {
    elements: Vec<Element>,
    style: CharStyle,
    /// Index into `elements` of the table the cursor is in
    active_table: Option<usize>,
    cursor: Option<(usize, usize)>,
    /// Whether the next inserted text continues the last paragraph
    paragraph_open: bool,
    source: Option<PathBuf>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Path of the file last opened or saved
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn to_markdown(&self) -> String {
        markdown::render_markdown(&self.elements)
    }

    fn append_run(&mut self, text: &str) {
        if !self.paragraph_open || !matches!(self.elements.last(), Some(Element::Paragraph { .. })) {
            self.elements.push(Element::Paragraph { runs: Vec::new() });
            self.paragraph_open = true;
        }
        if text.is_empty() {
            return;
        }
        if let Some(Element::Paragraph { runs }) = self.elements.last_mut() {
            match runs.last_mut() {
                Some(last) if last.style == self.style => last.text.push_str(text),
                _ => runs.push(TextRun {
                    text: text.to_string(),
                    style: self.style.clone(),
                }),
            }
        }
    }

    fn active_cells(&mut self) -> SessionResult<&mut Grid> {
        let index = self.active_table.ok_or(SessionError::NoActiveTable)?;
        match self.elements.get_mut(index) {
            Some(Element::Table { cells }) => Ok(cells),
            _ => Err(SessionError::NoActiveTable),
        }
    }
}

/// Bounds error for `(row, col)`, sized by the row being addressed.
fn out_of_range(cells: &Grid, row: usize, col: usize) -> SessionError {
    SessionError::CellOutOfRange {
        row,
        col,
        rows: cells.len(),
        cols: cells.get(row).or(cells.first()).map(Vec::len).unwrap_or(0),
    }
}

/// Replace in place and return the number of matches.
fn replace_counted(text: &mut String, pattern: &str, replacement: &str) -> usize {
    let count = text.matches(pattern).count();
    if count > 0 {
        *text = text.replace(pattern, replacement);
    }
    count
}

impl DocumentSession for MemorySession {
    fn open(&mut self, path: &Path) -> SessionResult<()> {
        if !path.exists() {
            return Err(SessionError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        *self = MemorySession {
            elements: elements::parse_document_text(&content),
            source: Some(path.to_path_buf()),
            ..MemorySession::default()
        };
        log::debug!("Loaded {} elements from {}", self.elements.len(), path.display());
        Ok(())
    }

    fn save_as(&mut self, path: &Path) -> SessionResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_markdown())?;
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> SessionResult<()> {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, piece) in normalized.split('\n').enumerate() {
            if i > 0 {
                self.paragraph_open = false;
            }
            self.append_run(piece);
        }
        Ok(())
    }

    fn set_char_style(&mut self, style: &CharStyle) -> SessionResult<()> {
        self.style = self.style.merged(style);
        Ok(())
    }

    fn create_table(&mut self, rows: usize, cols: usize) -> SessionResult<()> {
        if rows == 0 || cols == 0 {
            return Err(SessionError::InvalidArgument(format!(
                "table must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        self.elements.push(Element::Table {
            cells: vec![vec![String::new(); cols]; rows],
        });
        self.active_table = Some(self.elements.len() - 1);
        self.cursor = Some((0, 0));
        self.paragraph_open = false;
        Ok(())
    }

    fn move_to_cell(&mut self, row: usize, col: usize) -> SessionResult<()> {
        let cells = self.active_cells()?;
        if cells.get(row).is_none_or(|r| col >= r.len()) {
            return Err(out_of_range(cells, row, col));
        }
        self.cursor = Some((row, col));
        Ok(())
    }

    fn set_cell_text(&mut self, text: &str) -> SessionResult<()> {
        let (row, col) = self.cursor.ok_or(SessionError::NoActiveTable)?;
        let cells = self.active_cells()?;
        if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = text.to_string();
            return Ok(());
        }
        Err(out_of_range(cells, row, col))
    }

    fn insert_picture(&mut self, path: &Path, options: &PictureOptions) -> SessionResult<()> {
        if !path.exists() {
            return Err(SessionError::NotFound(path.to_path_buf()));
        }
        self.elements.push(Element::Picture {
            path: path.to_path_buf(),
            options: *options,
        });
        self.paragraph_open = false;
        Ok(())
    }

    fn find_and_replace_all(&mut self, pattern: &str, replacement: &str) -> SessionResult<usize> {
        if pattern.is_empty() {
            return Err(SessionError::InvalidArgument("empty search pattern".into()));
        }
        let mut count = 0;
        for element in &mut self.elements {
            match element {
                Element::Paragraph { runs } => {
                    for run in runs.iter_mut() {
                        count += replace_counted(&mut run.text, pattern, replacement);
                    }
                }
                Element::Table { cells } => {
                    for cell in cells.iter_mut().flatten() {
                        count += replace_counted(cell, pattern, replacement);
                    }
                }
                Element::Verbatim { source, .. } => {
                    count += replace_counted(source, pattern, replacement);
                }
                Element::Picture { .. } => {}
            }
        }
        Ok(count)
    }
}
