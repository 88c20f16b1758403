use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use the library instead of declaring modules
use hwp_automate::{config, filler, ops, session, table, template};

#[derive(Parser)]
#[command(name = "hwpcli")]
#[command(version)]
#[command(about = "A CLI tool to create HWP documents, tables and images and fill templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Print the document calls instead of writing files")]
    dry_run: bool,

    #[arg(long, global = true, help = "Styling configuration JSON file")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Show progress (-v) or per-cell detail (-vv)")]
    verbose: u8,

    #[arg(short, long, global = true, help = "Only report errors")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create a new document with optional title and content")]
    CreateDocument {
        #[arg(short, long, help = "Output file path (e.g., report.hwp)")]
        output: Option<PathBuf>,
        #[arg(short, long, help = "Document title")]
        title: Option<String>,
        #[arg(short, long, help = "Initial content")]
        content: Option<String>,
    },
    #[command(about = "Create a table, optionally filled from CSV data")]
    CreateTable {
        #[arg(short, long, allow_negative_numbers = true, help = "Number of rows")]
        rows: i64,
        #[arg(short, long, allow_negative_numbers = true, help = "Number of columns")]
        cols: i64,
        #[arg(short, long, help = "Table data in CSV format (use \\n for newlines). Example: \"A,B\\nC,D\"")]
        data: Option<String>,
        #[arg(short, long, help = "Output file path (e.g., table.hwp)")]
        output: Option<PathBuf>,
    },
    #[command(about = "Convert a markdown table to a document table")]
    MarkdownTable {
        #[arg(short, long, help = "Markdown table as string (use \\n for newlines)")]
        markdown: Option<String>,
        #[arg(short, long, help = "Input markdown file path")]
        input: Option<PathBuf>,
        #[arg(short, long, help = "Output file path")]
        output: Option<PathBuf>,
    },
    #[command(about = "Insert an image into a document")]
    InsertImage {
        #[arg(short, long, help = "Path to the image file")]
        image: PathBuf,
        #[arg(short, long, help = "Path to an existing document")]
        document: Option<PathBuf>,
        #[arg(short, long, help = "Path to save the document")]
        output: Option<PathBuf>,
        #[arg(short, long, help = "Image width in millimeters")]
        width: Option<f64>,
        #[arg(short = 'H', long, help = "Image height in millimeters")]
        height: Option<f64>,
        #[arg(long, help = "Do not maintain aspect ratio when resizing")]
        no_maintain_ratio: bool,
    },
    #[command(about = "Fill placeholders in a template with data")]
    FillTemplate {
        #[arg(short, long, help = "Path to the template file")]
        template: PathBuf,
        #[arg(short, long, help = "Path to save the filled document")]
        output: PathBuf,
        #[arg(short, long, help = "Data in key:value format (can be used multiple times)")]
        data: Vec<String>,
        #[arg(short, long, help = "Path to JSON file containing data")]
        json: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load(cli.config.as_deref())?;

    let mut doc: Box<dyn session::DocumentSession> = if cli.dry_run {
        println!("Dry run, planned document calls:");
        Box::new(session::RecordingSession::echoing())
    } else {
        Box::new(session::MemorySession::new())
    };
    let doc = doc.as_mut();

    match cli.command {
        Commands::CreateDocument {
            output,
            title,
            content,
        } => {
            ops::create_document(doc, title.as_deref(), content.as_deref(), output.as_deref(), &config)?;
            match output {
                Some(path) => println!("Document saved to: {}", path.display()),
                None => println!("New document created (not saved)"),
            }
        }
        Commands::CreateTable {
            rows,
            cols,
            data,
            output,
        } => {
            let shape = filler::TableShape::new(rows, cols)?;
            let grid = data.as_deref().map(table::parse_csv_grid);
            let report = ops::create_table(doc, shape, grid.as_ref(), output.as_deref())?;
            println!("Created {} table ({} cells filled)", shape, report.cells_written);
            match output {
                Some(path) => println!("Document saved to: {}", path.display()),
                None => println!("Table created (document not saved)"),
            }
        }
        Commands::MarkdownTable {
            markdown,
            input,
            output,
        } => {
            let markdown = match (markdown, input) {
                (Some(markdown), _) => markdown,
                (None, Some(path)) => ops::read_markdown_source(&path)?,
                (None, None) => bail!("Must provide either --markdown or --input"),
            };
            let (shape, report) = ops::markdown_table(doc, &markdown, output.as_deref())?;
            println!("Created {} table from markdown ({} cells filled)", shape, report.cells_written);
            match output {
                Some(path) => println!("Document saved to: {}", path.display()),
                None => println!("Table created (document not saved)"),
            }
        }
        Commands::InsertImage {
            image,
            document,
            output,
            width,
            height,
            no_maintain_ratio,
        } => {
            let request = ops::ImageRequest {
                image,
                document,
                output,
                width_mm: width,
                height_mm: height,
                maintain_ratio: !no_maintain_ratio,
            };
            ops::insert_image(doc, &request)?;
            match &request.output {
                Some(path) => println!("Image inserted, document saved to: {}", path.display()),
                None => println!("Image inserted (document not saved)"),
            }
        }
        Commands::FillTemplate {
            template: template_path,
            output,
            data,
            json,
        } => {
            let mut sources = Vec::new();
            if let Some(path) = json {
                let from_file = template::load_json_mapping(&path)?;
                log::info!("Loaded {} items from {}", from_file.len(), path.display());
                sources.push(from_file);
            }
            if !data.is_empty() {
                let (from_args, _rejected) = template::parse_data_args(data.as_slice());
                log::info!("Added {} items from command line", from_args.len());
                sources.push(from_args);
            }
            let mapping = template::merge_mappings(sources);

            let outcome = ops::fill_template(doc, &template_path, &output, &mapping)?;
            println!(
                "Total replacements: {} of {} ({} failed, {} occurrences)",
                outcome.applied, outcome.attempted, outcome.failed, outcome.occurrences
            );
            println!("Saved filled document to: {}", output.display());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
