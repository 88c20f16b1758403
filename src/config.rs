//! Styling configuration loaded from an optional JSON file.
//!
//! ```json
//! { "title_style": { "font_name": "Batang", "height": 20.0 } }
//! ```
//!
//! Fields left out keep their defaults.

use crate::session::CharStyle;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TITLE_FONT: &str = "맑은 고딕";
pub const DEFAULT_TITLE_HEIGHT: f32 = 18.0;
pub const DEFAULT_BODY_HEIGHT: f32 = 11.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title_style: CharStyle,
    pub body_style: CharStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title_style: CharStyle::new()
                .with_font(DEFAULT_TITLE_FONT)
                .with_height(DEFAULT_TITLE_HEIGHT)
                .with_bold(true),
            body_style: CharStyle::new()
                .with_height(DEFAULT_BODY_HEIGHT)
                .with_bold(false),
        }
    }
}

impl Config {
    /// Read a config file, or fall back to defaults when no path is given.
    ///
    /// Style fields present in the file replace the default field by field.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let overrides: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        let defaults = Self::default();
        Ok(Self {
            title_style: defaults.title_style.merged(&overrides.title_style),
            body_style: defaults.body_style.merged(&overrides.body_style),
        })
    }
}
