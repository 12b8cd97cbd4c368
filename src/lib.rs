pub use crate::errors::{ErrorKind, LoadError, ParseError};
pub use crate::settings::Settings;
pub use crate::syntax::{parse_bytes, parse_file, parse_str, Document, Node, Positioned, Section};

pub mod cli;
pub mod config;
pub mod errors;
pub mod settings;
pub mod syntax;
