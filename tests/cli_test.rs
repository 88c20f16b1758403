use std::fs;
use std::path::Path;
use std::process::Command;

/// Helper to run hwpcli commands using the pre-built binary directly.
fn run_hwp_cli(args: &[&str]) -> (String, String, bool) {
    let bin = std::path::PathBuf::from(env!("CARGO_BIN_EXE_hwpcli"));

    let output = Command::new(&bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute hwpcli");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn test_create_document_with_title_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.md");

    let (stdout, stderr, success) = run_hwp_cli(&[
        "create-document",
        "--output",
        path_str(&out),
        "--title",
        "Monthly Report",
        "--content",
        "This is a report",
    ]);
    assert!(success, "create-document failed: {}", stderr);
    assert!(stdout.contains("Document saved to:"));
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "# Monthly Report\n\nThis is a report\n"
    );
}

#[test]
fn test_create_document_warns_on_extension() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.txt");

    let (_, stderr, success) = run_hwp_cli(&["create-document", "-o", path_str(&out), "-c", "x"]);
    assert!(success, "extension warning must not fail the run");
    assert!(stderr.contains("should have a .hwp or .md extension"));
    assert!(out.exists());
}

#[test]
fn test_create_table_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("table.md");

    let (stdout, stderr, success) = run_hwp_cli(&[
        "create-table",
        "--rows",
        "3",
        "--cols",
        "2",
        "--data",
        r"Name,Age\nJohn,25\nJane,30",
        "--output",
        path_str(&out),
    ]);
    assert!(success, "create-table failed: {}", stderr);
    assert!(stdout.contains("6 cells filled"));
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "| Name | Age |\n|---|---|\n| John | 25 |\n| Jane | 30 |\n"
    );
}

#[test]
fn test_create_table_truncates_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("small.md");

    let (_, stderr, success) = run_hwp_cli(&[
        "create-table",
        "-r",
        "2",
        "-c",
        "2",
        "-d",
        r"a,b,c\nd,e,f\ng,h,i",
        "-o",
        path_str(&out),
    ]);
    assert!(success, "truncation is not fatal");
    assert!(stderr.contains("Data is 3x3 but table is only 2x2"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "| a | b |\n|---|---|\n| d | e |\n");
}

#[test]
fn test_create_table_rejects_non_positive_dimensions() {
    let (_, stderr, success) = run_hwp_cli(&["create-table", "--rows", "0", "--cols", "2"]);
    assert!(!success);
    assert!(stderr.contains("Rows and columns must be positive numbers"));

    let (_, stderr, success) = run_hwp_cli(&["create-table", "--rows", "2", "--cols", "-1"]);
    assert!(!success);
    assert!(stderr.contains("Rows and columns must be positive numbers"));
}

#[test]
fn test_markdown_table_inline() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("md_table.md");

    let (stdout, stderr, success) = run_hwp_cli(&[
        "markdown-table",
        "--markdown",
        r"| A | B |\n|---|---|\n| 1 | 2 |",
        "--output",
        path_str(&out),
    ]);
    assert!(success, "markdown-table failed: {}", stderr);
    assert!(stdout.contains("2x2"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "| A | B |\n|---|---|\n| 1 | 2 |\n");
}

#[test]
fn test_markdown_table_from_file_extracts_first_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.md");
    let out = dir.path().join("out.md");
    fs::write(
        &input,
        "# Notes\n\nSee below.\n| Item | Qty |\n|:---|---:|\n| Pen | 2 |\n\n| Other | Table |\n",
    )
    .unwrap();

    let (_, stderr, success) =
        run_hwp_cli(&["markdown-table", "-i", path_str(&input), "-o", path_str(&out)]);
    assert!(success, "markdown-table --input failed: {}", stderr);
    assert_eq!(fs::read_to_string(&out).unwrap(), "| Item | Qty |\n|---|---|\n| Pen | 2 |\n");
}

#[test]
fn test_markdown_table_errors() {
    let (_, stderr, success) = run_hwp_cli(&["markdown-table"]);
    assert!(!success);
    assert!(stderr.contains("Must provide either --markdown or --input"));

    let (_, stderr, success) = run_hwp_cli(&["markdown-table", "-m", "|---|---|"]);
    assert!(!success);
    assert!(stderr.contains("No table data found in markdown"));

    let (_, stderr, success) = run_hwp_cli(&["markdown-table", "-i", "/nonexistent/table.md"]);
    assert!(!success);
    assert!(stderr.contains("Input file not found"));
}

#[test]
fn test_insert_image_sized() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("logo.png");
    let out = dir.path().join("doc.md");

    let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    png.extend_from_slice(b"IHDR");
    png.extend_from_slice(&200u32.to_be_bytes());
    png.extend_from_slice(&100u32.to_be_bytes());
    fs::write(&image, &png).unwrap();

    let (_, stderr, success) = run_hwp_cli(&[
        "insert-image",
        "--image",
        path_str(&image),
        "--width",
        "100",
        "--output",
        path_str(&out),
    ]);
    assert!(success, "insert-image failed: {}", stderr);
    let saved = fs::read_to_string(&out).unwrap();
    assert!(saved.starts_with("![logo.png]("), "unexpected output: {}", saved);
    assert!(saved.contains("{width=100.0mm height=50.0mm}"));
}

#[test]
fn test_insert_image_into_existing_document() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("photo.gif");
    let document = dir.path().join("existing.md");
    let out = dir.path().join("with_photo.md");
    let mut gif = b"GIF89a".to_vec();
    gif.extend_from_slice(&[10, 0, 10, 0]);
    fs::write(&image, &gif).unwrap();
    fs::write(&document, "Existing paragraph\n").unwrap();

    let (_, stderr, success) = run_hwp_cli(&[
        "insert-image",
        "-i",
        path_str(&image),
        "-d",
        path_str(&document),
        "-o",
        path_str(&out),
    ]);
    assert!(success, "insert-image failed: {}", stderr);
    let saved = fs::read_to_string(&out).unwrap();
    assert!(saved.starts_with("Existing paragraph\n\n![photo.gif]("));
}

#[test]
fn test_insert_image_missing_inputs() {
    let (_, stderr, success) = run_hwp_cli(&["insert-image", "-i", "/nonexistent/logo.png"]);
    assert!(!success);
    assert!(stderr.contains("Image file not found"));

    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("logo.bmp");
    fs::write(&image, b"BM").unwrap();
    let (_, stderr, success) = run_hwp_cli(&[
        "insert-image",
        "-i",
        path_str(&image),
        "-d",
        "/nonexistent/doc.md",
    ]);
    assert!(!success);
    assert!(stderr.contains("Document not found"));
}

#[test]
fn test_fill_template_from_json_and_args() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("proposal.md");
    let json = dir.path().join("data.json");
    let out = dir.path().join("filled.md");
    fs::write(
        &template,
        "Proposal for {{company}}\n\n| Field | Value |\n|---|---|\n| Contact | {{ contact }} |\n| Budget | {{budget}} |\n",
    )
    .unwrap();
    fs::write(&json, r#"{"company": "Old Name", "budget": 5000}"#).unwrap();

    let (stdout, stderr, success) = run_hwp_cli(&[
        "fill-template",
        "--template",
        path_str(&template),
        "--output",
        path_str(&out),
        "--json",
        path_str(&json),
        "--data",
        "company:ABC Corp",
        "--data",
        "contact: Kim",
    ]);
    assert!(success, "fill-template failed: {}", stderr);
    assert!(stdout.contains("Total replacements: 6 of 6"));
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Proposal for ABC Corp\n\n| Field | Value |\n|---|---|\n| Contact | Kim |\n| Budget | 5000 |\n"
    );
}

#[test]
fn test_fill_template_renders_json_scalars() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("flags.md");
    let json = dir.path().join("flags.json");
    let out = dir.path().join("flags_out.md");
    fs::write(&template, "Active: {{active}}\nNote: [{{ note }}]\nCount: {{count}}\n").unwrap();
    fs::write(&json, r#"{"active": true, "note": null, "count": 2.5}"#).unwrap();

    let (_, stderr, success) = run_hwp_cli(&[
        "fill-template",
        "-t",
        path_str(&template),
        "-o",
        path_str(&out),
        "-j",
        path_str(&json),
    ]);
    assert!(success, "fill-template failed: {}", stderr);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Active: true\nNote: []\nCount: 2.5\n"
    );
}

#[test]
fn test_fill_template_leaves_other_lines_alone() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("letter.md");
    let out = dir.path().join("letter_out.md");
    let text = "Dear {{name}},\nThanks for your order.\n\n| Item | Qty |\n|:---|---:|\n| - | - |\n| Pen | 2 |\n";
    fs::write(&template, text).unwrap();

    let (_, stderr, success) = run_hwp_cli(&[
        "fill-template",
        "-t",
        path_str(&template),
        "-o",
        path_str(&out),
        "-d",
        "name:Kim",
    ]);
    assert!(success, "fill-template failed: {}", stderr);
    assert_eq!(fs::read_to_string(&out).unwrap(), text.replace("{{name}}", "Kim"));
}

#[test]
fn test_fill_template_no_placeholders_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("plain.md");
    let out = dir.path().join("plain_out.md");
    fs::write(&template, "Nothing to replace\n").unwrap();

    let (_, stderr, success) = run_hwp_cli(&[
        "fill-template",
        "-t",
        path_str(&template),
        "-o",
        path_str(&out),
        "-d",
        "name:value",
    ]);
    assert!(success);
    assert!(stderr.contains("No placeholders were found"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "Nothing to replace\n");
}

#[test]
fn test_fill_template_errors() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("t.md");
    let out = dir.path().join("o.md");
    fs::write(&template, "{{x}}\n").unwrap();

    let (_, stderr, success) =
        run_hwp_cli(&["fill-template", "-t", path_str(&template), "-o", path_str(&out)]);
    assert!(!success);
    assert!(stderr.contains("No data provided"));

    let (_, stderr, success) = run_hwp_cli(&[
        "fill-template",
        "-t",
        "/nonexistent/t.md",
        "-o",
        path_str(&out),
        "-d",
        "x:1",
    ]);
    assert!(!success);
    assert!(stderr.contains("Template file not found"));

    let (_, stderr, success) = run_hwp_cli(&[
        "fill-template",
        "-t",
        path_str(&template),
        "-o",
        path_str(&out),
        "-j",
        "/nonexistent/data.json",
    ]);
    assert!(!success);
    assert!(stderr.contains("JSON file not found"));
    assert!(!out.exists());
}

#[test]
fn test_dry_run_prints_calls_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never.md");

    let (stdout, _, success) = run_hwp_cli(&[
        "--dry-run",
        "create-table",
        "-r",
        "1",
        "-c",
        "2",
        "-d",
        "x,y",
        "-o",
        path_str(&out),
    ]);
    assert!(success);
    assert!(stdout.contains("create_table(1, 2)"));
    assert!(stdout.contains("move_to_cell(0, 1)"));
    assert!(stdout.contains("set_cell_text(\"y\")"));
    assert!(!out.exists());
}

#[test]
fn test_config_overrides_title_style() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"title_style": {"height": 12.0}}"#).unwrap();

    let (stdout, _, success) = run_hwp_cli(&[
        "--dry-run",
        "--config",
        path_str(&config),
        "create-document",
        "-t",
        "Small title",
    ]);
    assert!(success);
    assert!(stdout.contains("height=Some(12.0)"));
}
