//! Defines the command-line arguments and subcommands for the yabai3 CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "yabai3",
    version,
    about = "Parse and inspect i3-style window manager configuration."
)]
pub struct Yabai3Args {
    /// Configuration file to read. Defaults to $XDG_CONFIG_HOME/i3/config,
    /// then ~/.config/i3/config.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse the configuration and report whether it is valid.
    Check,
    /// Show the syntax tree of the configuration.
    Ast {
        #[arg(long, value_enum, default_value_t = TreeFormat::Debug)]
        format: TreeFormat,
    },
    /// Show the settings extracted from the configuration.
    Settings {
        #[arg(long, value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    Debug,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl From<DataFormat> for TreeFormat {
    fn from(format: DataFormat) -> Self {
        match format {
            DataFormat::Json => TreeFormat::Json,
            DataFormat::Yaml => TreeFormat::Yaml,
        }
    }
}
