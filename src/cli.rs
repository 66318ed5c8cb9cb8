//! CLI definition and parsing.
//! Defines Args with two subcommands and provides parse().
//!
//! Notes:
//! - Global flags (logging, output format) sit before the subcommand.
//! - --debug is a shorthand for --log-level debug.
//! - CLI flags override config values (which are loaded from XML if present).

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use trashcan::config::{Config, LogLevel};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Move files to a trash can, and empty it")]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, verbose, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, verbose, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file (created 0600 if missing).
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where trashcan will look for the config file (or TRASHCAN_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by trashcan and exit")]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Move files into a trash directory instead of deleting them.
    Put(PutArgs),
    /// Delete trashed entries, optionally only those older than a threshold.
    Empty(EmptyArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct PutArgs {
    /// Files or directories to trash.
    #[arg(required = true, value_name = "PATH", value_hint = ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Ignore paths that do not exist or cannot be accessed.
    #[arg(short = 'f', long, help = "Silently skip nonexistent or inaccessible paths")]
    pub force: bool,

    /// Ask before trashing each path.
    #[arg(short = 'i', long, help = "Prompt before trashing each path")]
    pub interactive: bool,

    /// Use this trash directory instead of the candidate search.
    #[arg(long, value_hint = ValueHint::DirPath, help = "Trash into this directory only")]
    pub trash_dir: Option<PathBuf>,

    /// Treat this path as the top directory of the files' volume.
    #[arg(long, value_hint = ValueHint::DirPath, help = "Override volume top directory detection")]
    pub volume: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EmptyArgs {
    /// Only delete entries trashed at least this many days ago.
    #[arg(long, value_name = "N", help = "Only delete entries at least N days old")]
    pub days: Option<i64>,

    /// Empty every user's trash directories found on mounted volumes.
    #[arg(long, help = "Empty all users' volume trash directories")]
    pub all_users: bool,

    /// Ask for confirmation before deleting anything.
    #[arg(short = 'i', long, help = "Prompt before the deletion pass")]
    pub interactive: bool,

    /// Report what would be deleted without touching anything.
    #[arg(long, help = "Show what would be deleted, but do not modify anything")]
    pub dry_run: bool,

    /// Operate on these trash directories only (repeatable).
    #[arg(long, value_name = "PATH", value_hint = ValueHint::DirPath, help = "Empty this trash directory only (repeatable)")]
    pub trash_dir: Vec<PathBuf>,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
