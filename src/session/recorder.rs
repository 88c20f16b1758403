//! A session that records calls instead of editing a document.
//!
//! Used by `--dry-run` to show what a run would do, and by the tests to
//! observe the exact call sequence an operation produces.

use super::{CharStyle, DocumentSession, PictureOptions};
use crate::error::{SessionError, SessionResult};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(PathBuf),
    SaveAs(PathBuf),
    InsertText(String),
    SetCharStyle(CharStyle),
    CreateTable { rows: usize, cols: usize },
    MoveToCell { row: usize, col: usize },
    SetCellText(String),
    InsertPicture { path: PathBuf, options: PictureOptions },
    FindAndReplaceAll { pattern: String, replacement: String },
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Open(path) => write!(f, "open({})", path.display()),
            Call::SaveAs(path) => write!(f, "save_as({})", path.display()),
            Call::InsertText(text) => write!(f, "insert_text({:?})", text),
            Call::SetCharStyle(style) => write!(
                f,
                "set_char_style(font={:?}, height={:?}, bold={:?})",
                style.font_name, style.height, style.bold
            ),
            Call::CreateTable { rows, cols } => write!(f, "create_table({}, {})", rows, cols),
            Call::MoveToCell { row, col } => write!(f, "move_to_cell({}, {})", row, col),
            Call::SetCellText(text) => write!(f, "set_cell_text({:?})", text),
            Call::InsertPicture { path, options } => write!(
                f,
                "insert_picture({}, width={:?}, height={:?}, maintain_ratio={})",
                path.display(),
                options.width,
                options.height,
                options.maintain_ratio
            ),
            Call::FindAndReplaceAll { pattern, replacement } => {
                write!(f, "find_and_replace_all({:?}, {:?})", pattern, replacement)
            }
        }
    }
}

/// Records every call; optionally fails selected replacements.
#[derive(Debug, Default)]
pub struct RecordingSession {
    calls: Vec<Call>,
    failing_patterns: HashSet<String>,
    match_count: usize,
    echo: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print each call to stdout as it is recorded.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Make `find_and_replace_all` fail for this exact pattern.
    pub fn fail_replace(mut self, pattern: &str) -> Self {
        self.failing_patterns.insert(pattern.to_string());
        self
    }

    /// Occurrence count reported by successful replacements (default 0).
    pub fn with_match_count(mut self, count: usize) -> Self {
        self.match_count = count;
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<Call> {
        self.calls
    }

    /// Cells written, as `(row, col, text)` in call order.
    pub fn cell_writes(&self) -> Vec<(usize, usize, String)> {
        let mut cursor = None;
        let mut writes = Vec::new();
        for call in &self.calls {
            match call {
                Call::MoveToCell { row, col } => cursor = Some((*row, *col)),
                Call::SetCellText(text) => {
                    if let Some((row, col)) = cursor {
                        writes.push((row, col, text.clone()));
                    }
                }
                _ => {}
            }
        }
        writes
    }

    /// Replacement calls as `(pattern, replacement)` pairs.
    pub fn replacements(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::FindAndReplaceAll { pattern, replacement } => {
                    Some((pattern.clone(), replacement.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: Call) {
        if self.echo {
            println!("  {}", call);
        }
        self.calls.push(call);
    }
}

impl DocumentSession for RecordingSession {
    fn open(&mut self, path: &Path) -> SessionResult<()> {
        self.record(Call::Open(path.to_path_buf()));
        Ok(())
    }

    fn save_as(&mut self, path: &Path) -> SessionResult<()> {
        self.record(Call::SaveAs(path.to_path_buf()));
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> SessionResult<()> {
        self.record(Call::InsertText(text.to_string()));
        Ok(())
    }

    fn set_char_style(&mut self, style: &CharStyle) -> SessionResult<()> {
        self.record(Call::SetCharStyle(style.clone()));
        Ok(())
    }

    fn create_table(&mut self, rows: usize, cols: usize) -> SessionResult<()> {
        self.record(Call::CreateTable { rows, cols });
        Ok(())
    }

    fn move_to_cell(&mut self, row: usize, col: usize) -> SessionResult<()> {
        self.record(Call::MoveToCell { row, col });
        Ok(())
    }

    fn set_cell_text(&mut self, text: &str) -> SessionResult<()> {
        self.record(Call::SetCellText(text.to_string()));
        Ok(())
    }

    fn insert_picture(&mut self, path: &Path, options: &PictureOptions) -> SessionResult<()> {
        self.record(Call::InsertPicture {
            path: path.to_path_buf(),
            options: *options,
        });
        Ok(())
    }

    fn find_and_replace_all(&mut self, pattern: &str, replacement: &str) -> SessionResult<usize> {
        self.record(Call::FindAndReplaceAll {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        });
        if self.failing_patterns.contains(pattern) {
            return Err(SessionError::Rejected(format!("cannot replace {}", pattern)));
        }
        Ok(self.match_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut session = RecordingSession::new();
        session.create_table(2, 2).unwrap();
        session.move_to_cell(1, 0).unwrap();
        session.set_cell_text("x").unwrap();
        assert_eq!(
            session.calls(),
            &[
                Call::CreateTable { rows: 2, cols: 2 },
                Call::MoveToCell { row: 1, col: 0 },
                Call::SetCellText("x".into()),
            ]
        );
        assert_eq!(session.cell_writes(), vec![(1, 0, "x".to_string())]);
    }

    #[test]
    fn test_injected_replace_failure() {
        let mut session = RecordingSession::new().fail_replace("{{a}}").with_match_count(3);
        assert!(session.find_and_replace_all("{{a}}", "1").is_err());
        assert_eq!(session.find_and_replace_all("{{ a }}", "1").unwrap(), 3);
        assert_eq!(session.replacements().len(), 2);
    }

    #[test]
    fn test_call_display() {
        assert_eq!(Call::MoveToCell { row: 0, col: 1 }.to_string(), "move_to_cell(0, 1)");
        assert_eq!(
            Call::FindAndReplaceAll { pattern: "{{k}}".into(), replacement: "v".into() }.to_string(),
            "find_and_replace_all(\"{{k}}\", \"v\")"
        );
    }
}
