//! # Gridsmith CLI
//!
//! Command-line tools for Gridsmith project files.
//!
//! ## Usage
//!
//! ```bash
//! gridsmith validate page.json
//! gridsmith markup page.json --out page.html --title "Landing"
//! gridsmith stylesheet page.json --out page.css
//! gridsmith classes page.json
//! ```
//!
//! Every command that takes a project file falls back to the project saved
//! in `--data-dir` (or `GRIDSMITH_DATA_DIR`) when the file is omitted.
//! `gridsmith import page.json` stores a file there.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod commands;

pub use commands::run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gridsmith_core::PROJECT_KEY;

/// Command-line arguments for gridsmith.
#[derive(Debug, Clone, Parser)]
#[command(name = "gridsmith")]
#[command(about = "Validate and export Gridsmith page projects")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding the saved project
    #[arg(long, global = true, env = "GRIDSMITH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Key the saved project is stored under
    #[arg(long, global = true, env = "GRIDSMITH_STORAGE_KEY", default_value = PROJECT_KEY)]
    pub storage_key: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a project file and print a summary
    Validate {
        /// Project file (defaults to the saved project)
        file: Option<PathBuf>,
    },
    /// Export HTML markup
    Markup {
        /// Project file (defaults to the saved project)
        file: Option<PathBuf>,
        /// Write to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Emit only the page grid, without the document shell
        #[arg(long)]
        fragment: bool,
        /// Document title
        #[arg(long)]
        title: Option<String>,
        /// Stylesheet linked from the document head
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Export a plain CSS stylesheet
    Stylesheet {
        /// Project file (defaults to the saved project)
        file: Option<PathBuf>,
        /// Write to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print each element's compiled class tokens
    Classes {
        /// Project file (defaults to the saved project)
        file: Option<PathBuf>,
    },
    /// Store a project file as the saved project
    Import {
        /// Project file to store
        file: PathBuf,
    },
}

/// Storage settings resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding the saved project.
    pub data_dir: Option<PathBuf>,
    /// Key the saved project is stored under.
    pub storage_key: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: PROJECT_KEY.to_string(),
        }
    }
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            storage_key: args.storage_key.clone(),
        }
    }
}
