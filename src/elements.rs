//! Block-level content of an in-memory document.
//! Paragraphs keep their character styling per run so the markdown
//! writer can render titles and bold text. Content read from a file is
//! held as verbatim blocks and written back byte for byte.

use crate::session::{CharStyle, PictureOptions};
use crate::table::{self, Grid};
use std::path::PathBuf;

/// Paragraph text at or above this height (pt) is written as a heading.
pub const HEADING_MIN_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: CharStyle,
}

/// What a verbatim block was read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Paragraph { runs: Vec<TextRun> },
    Table { cells: Grid },
    Picture { path: PathBuf, options: PictureOptions },
    /// Lines loaded from a file, line endings included
    Verbatim { kind: BlockKind, source: String },
}

impl Element {
    pub fn paragraph(text: &str) -> Self {
        Element::Paragraph {
            runs: vec![TextRun {
                text: text.to_string(),
                style: CharStyle::default(),
            }],
        }
    }

    pub fn verbatim(kind: BlockKind, source: &str) -> Self {
        Element::Verbatim {
            kind,
            source: source.to_string(),
        }
    }

    /// Plain text of a paragraph, or `None` for other elements.
    pub fn paragraph_text(&self) -> Option<String> {
        match self {
            Element::Paragraph { runs } => Some(runs.iter().map(|r| r.text.as_str()).collect()),
            _ => None,
        }
    }

    /// Cells of a built table, or the parsed rows of a loaded one.
    pub fn table_grid(&self) -> Option<Grid> {
        match self {
            Element::Table { cells } => Some(cells.clone()),
            Element::Verbatim {
                kind: BlockKind::Table,
                source,
            } => Some(table::parse_markdown_table(source)),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        match self {
            Element::Paragraph { runs } => runs
                .first()
                .and_then(|r| r.style.height)
                .is_some_and(|h| h >= HEADING_MIN_HEIGHT),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Element::Paragraph { runs } => runs.iter().all(|r| r.text.is_empty()),
            Element::Table { cells } => cells.is_empty(),
            Element::Picture { .. } => false,
            Element::Verbatim { source, .. } => source.is_empty(),
        }
    }
}

/// Split document text into verbatim blocks.
///
/// Runs of lines starting with a pipe form table blocks; all other lines,
/// blank ones included, form text blocks. Concatenating the sources gives
/// back `text` exactly.
pub fn parse_document_text(text: &str) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();

    for line in text.split_inclusive('\n') {
        let kind = if line.starts_with('|') {
            BlockKind::Table
        } else {
            BlockKind::Text
        };
        if let Some(Element::Verbatim { kind: last, source }) = elements.last_mut() {
            if *last == kind {
                source.push_str(line);
                continue;
            }
        }
        elements.push(Element::verbatim(kind, line));
    }

    elements
}
