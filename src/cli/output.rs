//! Handles all user-facing output for the CLI.
//!
//! Rendering of trees and settings lives here, along with the coloured status
//! lines, so every command formats its output the same way.

use std::io::Write;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

use crate::cli::args::TreeFormat;
use crate::syntax::Document;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serializes `value` in the requested format. `Debug` uses Rust's pretty
/// debug representation.
pub fn render<T>(value: &T, format: TreeFormat) -> Result<String, RenderError>
where
    T: Serialize + std::fmt::Debug,
{
    Ok(match format {
        TreeFormat::Debug => format!("{value:#?}"),
        TreeFormat::Json => serde_json::to_string_pretty(value)?,
        TreeFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// One-line summary of a parsed document.
pub fn summary(document: &Document) -> String {
    let statements = document.statements().count();
    let noun = if statements == 1 { "statement" } else { "statements" };
    format!("{statements} {noun}")
}

/// Prints a green success line to stdout.
pub fn print_ok(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "✓");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {message}");
}
