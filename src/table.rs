//! Markdown and CSV table text to cell grids.
//!
//! The parsers here are pure: malformed input degrades to an empty or ragged
//! [`Grid`] instead of an error. Deciding whether an empty grid is a failure
//! is left to the caller.

use regex::Regex;
use std::sync::LazyLock;

/// Rows of string cells. Rows may differ in length.
pub type Grid = Vec<Vec<String>>;

/// Alignment rows such as `|---|:--:|` or `--- | ---`. Inner pipes are allowed.
static SEPARATOR_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?[\s\-:|]+\|?$").expect("separator pattern is valid"));

/// A run of consecutive lines starting with a pipe. The final line may lack a newline.
static TABLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^\|[^\n]+(?:\n|\z))+").expect("table block pattern is valid")
});

/// Returns true for a markdown alignment/separator row.
pub fn is_separator_row(line: &str) -> bool {
    SEPARATOR_ROW.is_match(line.trim())
}

/// Split one table line into trimmed cells.
///
/// Exactly one leading and one trailing pipe are removed before splitting.
/// A line with nothing left after that yields no cells.
pub fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    if line.is_empty() {
        return Vec::new();
    }
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Parse a markdown table into a grid.
///
/// Blank lines and separator rows are dropped wherever they appear; every
/// other line becomes a row. Ragged rows are passed through unchanged.
///
/// ```
/// use hwp_automate::table::parse_markdown_table;
///
/// let grid = parse_markdown_table("| A | B |\n|---|---|\n| 1 | 2 |");
/// assert_eq!(grid, vec![vec!["A", "B"], vec!["1", "2"]]);
/// ```
pub fn parse_markdown_table(markdown: &str) -> Grid {
    markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_separator_row(line))
        .map(split_row)
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// Find the first block of pipe-prefixed lines in free text.
pub fn extract_first_markdown_table(text: &str) -> Option<String> {
    TABLE_BLOCK.find(text).map(|m| m.as_str().to_string())
}

/// Turn the two-character escape `\n` into a real newline.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Parse comma separated rows, e.g. `Name,Age\nJohn,25`.
///
/// Literal `\n` escapes count as row breaks. Cells are trimmed; rows are kept
/// even when empty so row indices line up with the source.
pub fn parse_csv_grid(data: &str) -> Grid {
    let unescaped = unescape_newlines(data);
    let trimmed = unescaped.trim();
    if trimmed.is_empty() {
        return Grid::new();
    }
    trimmed
        .split('\n')
        .map(|row| row.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// Serialize a grid back to pipe rows without a separator line.
pub fn grid_to_markdown(grid: &Grid) -> String {
    grid.iter()
        .map(|row| format!("| {} |", row.join(" | ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Width of the header (first) row.
pub fn grid_width(grid: &Grid) -> usize {
    grid.first().map(Vec::len).unwrap_or(0)
}

/// Width of the widest row.
pub fn max_row_width(grid: &Grid) -> usize {
    grid.iter().map(Vec::len).max().unwrap_or(0)
}
