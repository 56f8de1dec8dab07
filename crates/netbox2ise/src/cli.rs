//! Clap derive structures for the `netbox2ise` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netbox2ise -- keep Cisco ISE network devices in line with NetBox
#[derive(Debug, Parser)]
#[command(
    name = "netbox2ise",
    version,
    about = "Reconcile Cisco ISE network devices and groups with NetBox",
    long_about = "Derives the desired ISE network devices and network device groups\n\
        from a NetBox inventory export, compares them with an ISE snapshot,\n\
        and writes the missing and drifted entries back into the snapshot.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Data file (defaults to the platform config directory)
    #[arg(long, short = 'f', env = "NETBOX2ISE_DATA_FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETBOX2ISE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Debug logging (same as -vv)
    #[arg(long, global = true, hide = true)]
    pub debug: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    /// Effective verbosity, with `--debug` counting as `-vv`.
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(2)
        } else {
            self.verbose
        }
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare NetBox with ISE and report drift
    Verify(VerifyArgs),

    /// Create and update ISE groups and devices to match NetBox
    Sync(SyncArgs),

    /// Validate a data file and check both collaborators
    CheckDatafile(CheckDatafileArgs),

    /// Print or write the example data file
    ExampleDatafile(ExampleDatafileArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Also print the network device group table
    #[arg(long)]
    pub display_group_diff: bool,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Report devices present only in ISE as deletion candidates
    #[arg(long)]
    pub remove_extra: bool,
}

#[derive(Debug, Args)]
pub struct CheckDatafileArgs {
    /// Data file to check (overrides --data-file)
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExampleDatafileArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
