//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::StereoChannel;
use std::path::PathBuf;

/// Stereo Combiner - pairs left/right camera frames into side-by-side stereo frames
#[derive(Parser, Debug)]
#[command(
    name = "stereo-combiner",
    author,
    version,
    about = "Stereo frame combiner",
    long_about = "Pairs frames from two independently clocked cameras by timestamp and \n\
                  concatenates each pair side by side into one stereo frame.\n\n\
                  The `run` command drives the combiner from a synthetic stereo rig."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "STEREO_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "STEREO_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the combiner against a synthetic stereo rig
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "stereo.toml", env = "STEREO_CONFIG")]
    pub config: PathBuf,

    /// Stop after this many combined frames (0 = unlimited)
    #[arg(long, default_value = "0", env = "STEREO_MAX_PAIRS")]
    pub max_pairs: u64,

    /// Frames each synthetic camera produces (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub frames: u64,

    /// Pipeline timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "STEREO_TIMEOUT")]
    pub timeout: u64,

    /// Override the pairing tolerance (nanoseconds)
    #[arg(long)]
    pub tolerance_ns: Option<u64>,

    /// Run a single camera; its frames reach the sinks as eye frames
    #[arg(long, value_enum)]
    pub eye: Option<Eye>,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "STEREO_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "stereo.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "stereo.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show sink configuration
    #[arg(long)]
    pub sinks: bool,
}

/// Camera selector for single-eye runs
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn channel(self) -> StereoChannel {
        match self {
            Eye::Left => StereoChannel::Left,
            Eye::Right => StereoChannel::Right,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
