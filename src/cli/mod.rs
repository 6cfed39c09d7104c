//! Command-line interface for jobcore.
//!
//! Defined with clap's derive macros. The binary in `main.rs` dispatches on
//! [`Command`].

use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand};

/// Inspect and maintain a job orchestrator home directory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Home directory (overrides config)
    #[arg(long, global = true)]
    pub home: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List item types that can be created
    Types,

    /// Load every item and report what failed
    Load,

    /// Print an item's stored configuration
    Show {
        /// Full name of the item
        job: String,
    },

    /// Create a new item and write its configuration
    Create {
        /// Type key or tag, e.g. `project`
        item_type: String,
        name: String,
    },

    /// Load and save items again, rewriting tags to their current form
    Resave {
        /// Items to resave (default: all)
        jobs: Vec<String>,
    },

    /// Expand `$VAR` and `${VAR}` references as a build would see them
    Expand(ExpandArgs),
}

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Job the build belongs to
    #[arg(long, default_value = "adhoc")]
    pub job: String,

    /// Build number
    #[arg(long, default_value_t = 1)]
    pub number: u32,

    /// Build parameter as NAME=VALUE; may be repeated
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Print the build environment instead of expanding text
    #[arg(long)]
    pub env: bool,

    /// Text to expand
    #[arg(required_unless_present = "env")]
    pub text: Option<String>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}
