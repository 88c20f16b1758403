use crate::config::Config;
use crate::filler::{self, FillReport, TableShape};
use crate::image;
use crate::session::{DocumentSession, PictureOptions};
use crate::table::{self, Grid};
use crate::template::{self, DataMapping, ReplacementOutcome};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions the document backends are expected to write.
const DOCUMENT_EXTENSIONS: &[&str] = &["hwp", "md"];

/// Warn when an output path does not look like a document file.
pub fn check_output_extension(path: &Path) -> bool {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DOCUMENT_EXTENSIONS.iter().any(|d| e.eq_ignore_ascii_case(d)));
    if !ok {
        log::warn!(
            "Output file {} should have a .hwp or .md extension",
            path.display()
        );
    }
    ok
}

fn save_if_requested(session: &mut dyn DocumentSession, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        session
            .save_as(path)
            .with_context(|| format!("Failed to save document to {}", path.display()))?;
        log::info!("Document saved to: {}", path.display());
    }
    Ok(())
}

/// Start a document with an optional title and body text.
///
/// # Arguments
///
/// * `session` - Document to write into
/// * `title` - Written in the configured title style, followed by a paragraph break
/// * `content` - Written in the configured body style
/// * `output` - Where to save; the document is left unsaved when `None`
/// * `config` - Title and body character styles
///
/// # Example
///
/// ```rust
/// use hwp_automate::config::Config;
/// use hwp_automate::ops;
/// use hwp_automate::session::MemorySession;
///
/// let mut session = MemorySession::new();
/// ops::create_document(&mut session, Some("Monthly Report"), Some("All good."), None, &Config::default())
///     .expect("Failed to create document");
/// assert_eq!(session.to_markdown(), "# Monthly Report\n\nAll good.\n");
/// ```
pub fn create_document(
    session: &mut dyn DocumentSession,
    title: Option<&str>,
    content: Option<&str>,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    if let Some(title) = title {
        session.set_char_style(&config.title_style)?;
        session.insert_text(title)?;
        session.insert_text("\r\n")?;
    }
    if let Some(content) = content {
        session.set_char_style(&config.body_style)?;
        session.insert_text(content)?;
    }
    if let Some(path) = output {
        check_output_extension(path);
    }
    save_if_requested(session, output)
}

/// Create a `shape` table and optionally fill it from `data`.
///
/// Data larger than the table is truncated after a warning.
///
/// # Errors
///
/// Fails if the session cannot create or fill the table, or cannot save.
pub fn create_table(
    session: &mut dyn DocumentSession,
    shape: TableShape,
    data: Option<&Grid>,
    output: Option<&Path>,
) -> Result<FillReport> {
    log::info!(
        "Creating table with {} rows and {} columns...",
        shape.rows(),
        shape.cols()
    );
    let data = data.filter(|grid| !grid.is_empty());
    if let Some(mismatch) = data.and_then(|grid| filler::size_mismatch(grid, shape)) {
        log::warn!("{}", mismatch);
    }

    session
        .create_table(shape.rows(), shape.cols())
        .context("Failed to create table")?;

    let report = match data {
        Some(grid) => {
            log::info!("Filling table with data...");
            filler::fill_table(session, grid, shape).context("Failed to fill table")?
        }
        None => FillReport::default(),
    };

    save_if_requested(session, output)?;
    Ok(report)
}

/// Read markdown from a file, narrowed to its first table when one exists.
pub fn read_markdown_source(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("Input file not found: {}", path.display());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read input file {}", path.display()))?;
    Ok(table::extract_first_markdown_table(&content).unwrap_or(content))
}

/// Build a table from markdown text sized to its rows and header width.
///
/// # Errors
///
/// Returns an error when the text holds no table rows, or when the session
/// fails to create, fill or save.
pub fn markdown_table(
    session: &mut dyn DocumentSession,
    markdown: &str,
    output: Option<&Path>,
) -> Result<(TableShape, FillReport)> {
    let grid = table::parse_markdown_table(&table::unescape_newlines(markdown));
    if grid.is_empty() {
        bail!("No table data found in markdown");
    }

    let shape = TableShape::for_grid(&grid, table::grid_width(&grid))?;
    log::info!(
        "Parsed markdown table: {} rows x {} columns",
        shape.rows(),
        shape.cols()
    );
    let report = create_table(session, shape, Some(&grid), output)?;
    Ok((shape, report))
}

/// Parameters for [`insert_image`]
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub image: PathBuf,
    /// Existing document to add the image to; a fresh document otherwise
    pub document: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub maintain_ratio: bool,
}

impl ImageRequest {
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            document: None,
            output: None,
            width_mm: None,
            height_mm: None,
            maintain_ratio: true,
        }
    }
}

/// Insert an image at the cursor, optionally resized in millimetres.
///
/// When the aspect ratio is kept and only one side is given, the other is
/// derived from the image's pixel size. Returns the sizing that was applied.
///
/// # Errors
///
/// Fails before touching the session if the image or document is missing
/// or a size is not positive.
pub fn insert_image(
    session: &mut dyn DocumentSession,
    request: &ImageRequest,
) -> Result<PictureOptions> {
    if !request.image.exists() {
        bail!("Image file not found: {}", request.image.display());
    }
    if let Some(document) = &request.document {
        if !document.exists() {
            bail!("Document not found: {}", document.display());
        }
    }
    for (name, size) in [("width", request.width_mm), ("height", request.height_mm)] {
        if size.is_some_and(|mm| !(mm > 0.0)) {
            bail!("Image {} must be a positive number of millimetres", name);
        }
    }

    let mut options =
        PictureOptions::from_mm(request.width_mm, request.height_mm, request.maintain_ratio);
    match image::probe_image(&request.image) {
        Ok(info) => {
            log::info!(
                "Image {:?} {}x{} px",
                info.format,
                info.width,
                info.height
            );
            if !options.is_natural_size() {
                options = image::complete_picture_size(&options, &info);
            }
        }
        Err(e) => log::warn!("Could not read image size: {}", e),
    }

    if let Some(document) = &request.document {
        session
            .open(document)
            .with_context(|| format!("Failed to open document {}", document.display()))?;
        log::info!("Opened document: {}", document.display());
    }

    log::info!("Inserting image: {}", request.image.display());
    if let Some(w) = request.width_mm {
        log::info!("  Width: {}mm", w);
    }
    if let Some(h) = request.height_mm {
        log::info!("  Height: {}mm", h);
    }
    session
        .insert_picture(&request.image, &options)
        .with_context(|| format!("Failed to insert image {}", request.image.display()))?;

    save_if_requested(session, request.output.as_deref())?;
    Ok(options)
}

/// Fill a template's placeholders from `mapping` and save the result.
///
/// Opening and saving are fatal; individual replacements are best effort
/// and reported in the returned outcome.
///
/// # Example
///
/// ```rust,no_run
/// use hwp_automate::ops;
/// use hwp_automate::session::MemorySession;
/// use hwp_automate::template::DataMapping;
/// use std::path::Path;
///
/// let mut data = DataMapping::new();
/// data.insert("company".into(), "ABC Corp".into());
/// let mut session = MemorySession::new();
/// let outcome = ops::fill_template(&mut session, Path::new("proposal.md"), Path::new("filled.md"), &data)
///     .expect("Failed to fill template");
/// println!("Total replacements: {}", outcome.applied);
/// ```
pub fn fill_template(
    session: &mut dyn DocumentSession,
    template: &Path,
    output: &Path,
    mapping: &DataMapping,
) -> Result<ReplacementOutcome> {
    if mapping.is_empty() {
        bail!("No data provided. Use --data or --json");
    }
    if !template.exists() {
        bail!("Template file not found: {}", template.display());
    }

    session
        .open(template)
        .with_context(|| format!("Failed to open template {}", template.display()))?;
    log::info!("Opened template: {}", template.display());

    let outcome = template::apply_substitutions(session, mapping);
    log::info!("Total replacements: {}", outcome.applied);

    session
        .save_as(output)
        .with_context(|| format!("Failed to save filled document to {}", output.display()))?;
    log::info!("Saved filled document to: {}", output.display());
    Ok(outcome)
}
