//! # hwp-automate
//!
//! Command-line helpers that drive a word-processor document session:
//!
//! - **Documents**: Start a document with a styled title and body text
//! - **Tables**: Create tables and fill them from CSV text or markdown tables
//! - **Images**: Insert pictures sized in millimetres, keeping the aspect ratio
//! - **Templates**: Replace `{{key}}` / `{{ key }}` placeholders from JSON or `key:value` data
//!
//! Every operation writes through a [`session::DocumentSession`] handle that the
//! caller passes in. The parsing and planning steps ([`table`], [`filler`],
//! [`template`]) are pure and never fail on malformed text; only calls into the
//! session can fail.
//!
//! ## Quick Start
//!
//! ```rust
//! use hwp_automate::filler::{fill_table, TableShape};
//! use hwp_automate::session::{DocumentSession, MemorySession};
//! use hwp_automate::table::parse_markdown_table;
//!
//! let grid = parse_markdown_table("| Name | Age |\n|---|---|\n| John | 25 |");
//! let shape = TableShape::new(2, 2).unwrap();
//!
//! let mut session = MemorySession::new();
//! session.create_table(shape.rows(), shape.cols()).unwrap();
//! fill_table(&mut session, &grid, shape).unwrap();
//! assert!(session.to_markdown().contains("| John | 25 |"));
//! ```
//!
//! ## Modules
//!
//! - [`table`]: Markdown/CSV table text to cell grids
//! - [`filler`]: Writing grids into fixed-size tables
//! - [`template`]: Placeholder substitution and data mappings
//! - [`session`]: The document session trait and its in-memory and recording backends
//! - [`ops`]: High-level operations used by the `hwpcli` binary
//! - [`elements`] / [`markdown`]: Document model and markdown output of the in-memory backend
//! - [`image`]: Image header probing
//! - [`config`]: Styling configuration

pub mod config;
pub mod elements;
pub mod error;
pub mod filler;
pub mod image;
pub mod markdown;
pub mod ops;
pub mod session;
pub mod table;
pub mod template;

pub use error::{SessionError, SessionResult, ShapeError};
