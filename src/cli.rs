//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - top-level arguments
//! - [`Command`] - the `stats`, `export`, `find` and `reveal` subcommands
//! - [`FormatArg`] - export format as a clap value
//! - [`resolve_format`] - the format an export actually uses
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use smsslicer::cli::{Args, Command};
//!
//! let args = Args::parse_from(["smsslicer", "stats", "backup.xml", "--top", "5"]);
//! match args.command {
//!     Command::Stats { top, .. } => assert_eq!(top, 5),
//!     _ => unreachable!(),
//! }
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::format::ExportFormat;

/// Per-contact statistics and transcript export for SMS backups.
#[derive(Parser, Debug, Clone)]
#[command(name = "smsslicer")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    smsslicer find
    smsslicer stats sms-20240101.xml --top 10
    smsslicer stats sms-20240101.xml --json > stats.json
    smsslicer export sms-20240101.xml --address +15551234567
    smsslicer export sms-20240101.xml -a +15551234567 --from 2024-01-01 --to 2024-03-31 -f csv")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Count messages per contact
    Stats {
        /// Path to the backup file
        file: PathBuf,

        /// Number of conversations to list
        #[arg(short = 'n', long, default_value_t = 20)]
        top: usize,

        /// Print the full table as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Messages folded per batch
        #[arg(long, value_name = "N")]
        batch_size: Option<usize>,
    },

    /// Export one conversation
    Export {
        /// Path to the backup file
        file: PathBuf,

        /// Contact address, exactly as stored in the backup
        #[arg(short, long)]
        address: String,

        /// First day to include (YYYY-MM-DD, default: first message)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD, default: last message)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,

        /// Output format (default: from the output extension, else txt)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output path (default: conversation_<address>_<from>_<to>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List backup files, newest first
    Find {
        /// Directory to search (default: Downloads)
        dir: Option<PathBuf>,
    },

    /// Show a file in the system file manager
    Reveal {
        path: PathBuf,
    },
}

/// Export format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// `[timestamp] direction: body` lines
    #[default]
    #[value(alias = "text")]
    Txt,

    /// Timestamp,Type,Message
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Txt => ExportFormat::Txt,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

/// Picks the export format: an explicit `--format` wins, then the
/// extension of `--output`, then [`ExportFormat::default`].
pub fn resolve_format(format: Option<FormatArg>, output: Option<&Path>) -> ExportFormat {
    match (format, output) {
        (Some(arg), _) => arg.into(),
        (None, Some(path)) => ExportFormat::from_path(path).unwrap_or_default(),
        (None, None) => ExportFormat::default(),
    }
}
