//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{
    path::{Path, PathBuf},
    process,
};

use clap::Parser;

use crate::{
    config::discover_config,
    errors::{print_error, LoadError},
    settings::Settings,
    syntax::{parse_file, Document},
};

pub mod args;
pub mod output;

use args::{Command, Yabai3Args};
use output::{print_ok, render, summary};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = Yabai3Args::parse();
    let path = resolve_config_or_exit(args.config);
    let document = load_or_exit(&path);

    match args.command {
        Command::Check => {
            print_ok(&format!("{}: {}", path.display(), summary(&document)));
        }

        Command::Ast { format } => {
            print_rendered(render(&document, format));
        }

        Command::Settings { format } => {
            let settings = Settings::from_document(&document);
            print_rendered(render(&settings, format.into()));
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn resolve_config_or_exit(explicit: Option<PathBuf>) -> PathBuf {
    match explicit {
        Some(path) => path,
        None => discover_config().unwrap_or_else(|e| exit_with(e)),
    }
}

fn load_or_exit(path: &Path) -> Document {
    parse_file(path).unwrap_or_else(|e| exit_with(e))
}

fn exit_with(error: LoadError) -> ! {
    print_error(error);
    process::exit(1);
}

fn print_rendered(rendered: Result<String, output::RenderError>) {
    match rendered {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
