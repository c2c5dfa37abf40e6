//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "catch", version, about = "Two-board catch game simulator")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/catch.toml")]
    pub config: PathBuf,

    /// Log and report as JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run boards `a` and `b` in-process over a simulated serial link
    Simulate {
        /// Base ticks to run at most
        #[arg(long, value_name = "N", default_value_t = 3000)]
        ticks: u64,
        /// Input script CSV (`tick,board,event`); a built-in single round when omitted
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
        /// Pace ticks to the configured base rate; Ctrl-C stops the run
        #[arg(long, action = ArgAction::SetTrue)]
        realtime: bool,
        /// Print both matrices when the run ends
        #[arg(long, action = ArgAction::SetTrue)]
        show: bool,
    },
    /// Validate the config and exercise the simulated peripherals
    SelfCheck,
}
