//! CLI argument definitions using clap

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::{DomainError, NodePath};

/// Drill-down tri-state checkbox tree: load a JSON forest, toggle nodes, inspect the cascade
#[derive(Parser, Debug)]
#[command(name = "tricheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Extra settings file, applied after the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the forest with a state marker per node
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List checked nodes in pre-order
    Selected {
        #[command(flatten)]
        input: InputArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the drill-down columns after activating rows
    Columns {
        #[command(flatten)]
        input: InputArgs,
        /// Row path to activate, e.g. 0-2 (repeatable, applied in order)
        #[arg(short, long = "open")]
        open: Vec<NodePath>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Input file plus the selection steps applied before the command runs.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON file holding an array of root records
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Pre-check nodes with this value (repeatable)
    #[arg(short, long = "select")]
    pub select: Vec<String>,

    /// Toggle a node: PATH=true|false, e.g. 0-1=true (repeatable, applied in order)
    #[arg(short, long = "toggle")]
    pub toggle: Vec<ToggleArg>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented settings template
    Template,
    /// Print the global config file location
    Path,
}

/// `PATH=BOOL` as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleArg {
    pub path: NodePath,
    pub checked: bool,
}

impl FromStr for ToggleArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, checked) = s
            .split_once('=')
            .ok_or_else(|| format!("expected PATH=true|false, got {:?}", s))?;
        let path = path.parse().map_err(|e: DomainError| e.to_string())?;
        let checked = match checked.trim() {
            "true" | "1" | "on" => true,
            "false" | "0" | "off" => false,
            other => return Err(format!("expected true or false, got {:?}", other)),
        };
        Ok(Self { path, checked })
    }
}
