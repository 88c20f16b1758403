use crate::elements::{Element, TextRun};
use crate::session::hwpunit_to_mm;

/// Render document elements as markdown.
///
/// Verbatim blocks are written exactly as loaded. Every other block is
/// set off from its neighbours by a blank line.
pub fn render_markdown(elements: &[Element]) -> String {
    let mut text = String::new();
    let mut after_generated = false;
    for element in elements.iter().filter(|e| !e.is_empty()) {
        if let Element::Verbatim { source, .. } = element {
            if after_generated {
                text.push('\n');
            }
            text.push_str(source);
            after_generated = false;
            continue;
        }
        if !text.is_empty() {
            if !text.ends_with('\n') {
                text.push('\n');
            }
            if !text.ends_with("\n\n") {
                text.push('\n');
            }
        }
        text.push_str(&render_element(element));
        text.push('\n');
        after_generated = true;
    }
    text
}

fn render_element(element: &Element) -> String {
    match element {
        Element::Paragraph { runs } => {
            if element.is_heading() {
                let plain: String = runs.iter().map(|r| r.text.as_str()).collect();
                format!("# {}", plain)
            } else {
                runs.iter().map(render_run).collect()
            }
        }
        Element::Table { cells } => {
            let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
            let mut lines = Vec::with_capacity(cells.len() + 1);
            for (i, row) in cells.iter().enumerate() {
                let mut padded: Vec<&str> = row.iter().map(String::as_str).collect();
                padded.resize(cols, "");
                lines.push(format!("| {} |", padded.join(" | ")));
                if i == 0 {
                    lines.push(format!("|{}", "---|".repeat(cols)));
                }
            }
            lines.join("\n")
        }
        Element::Picture { path, options } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut text = format!("![{}]({})", name, path.display());
            let mut attrs = Vec::new();
            if let Some(w) = options.width {
                attrs.push(format!("width={:.1}mm", hwpunit_to_mm(w)));
            }
            if let Some(h) = options.height {
                attrs.push(format!("height={:.1}mm", hwpunit_to_mm(h)));
            }
            if !attrs.is_empty() {
                text.push_str(&format!("{{{}}}", attrs.join(" ")));
            }
            text
        }
        Element::Verbatim { source, .. } => source.trim_end_matches('\n').to_string(),
    }
}

fn render_run(run: &TextRun) -> String {
    if run.text.trim().is_empty() || run.style.bold != Some(true) {
        run.text.clone()
    } else {
        format!("**{}**", run.text)
    }
}
