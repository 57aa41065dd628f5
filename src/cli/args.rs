//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Orientation;

/// Compute box positions and connector lines for n-ary trees
#[derive(Parser, Debug)]
#[command(name = "treelayout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.treelayout.toml if present)
    #[arg(short, long, global = true, env = "TREELAYOUT_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the full layout: boxes, connectors and canvas
    Layout {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Append a node before layout: PARENT_ID=NAME (repeatable)
        #[arg(short, long, value_name = "PARENT_ID=NAME")]
        insert: Vec<String>,
    },

    /// Show measured subtree extents
    Measure {
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show the canvas bound of the layout
    Bound {
        #[command(flatten)]
        layout: LayoutArgs,
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

/// Tree file plus per-invocation layout overrides.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Tree file (.json or .toml)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Layout orientation
    #[arg(short, long)]
    pub orientation: Option<Orientation>,

    /// Width of every node box
    #[arg(long, allow_negative_numbers = true)]
    pub node_width: Option<f64>,

    /// Height of every node box
    #[arg(long, allow_negative_numbers = true)]
    pub node_height: Option<f64>,

    /// Horizontal spacing
    #[arg(long, allow_negative_numbers = true)]
    pub space_x: Option<f64>,

    /// Vertical spacing
    #[arg(long, allow_negative_numbers = true)]
    pub space_y: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable tree
    Tree,
    /// JSON document
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Show config file locations
    Path,

    /// Create a template config file
    Init {
        /// Create in the global config directory instead of the current directory
        #[arg(short, long)]
        global: bool,
    },
}
