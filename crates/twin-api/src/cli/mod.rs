//! CLI command definitions for the `twin` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod persona;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AI digital twin chat backend.
#[derive(Parser)]
#[command(name = "twin", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the config file (default: ./twin.toml if present).
    #[arg(long, global = true, env = "TWIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (overrides TWIN_PORT / config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides TWIN_HOST / config).
        #[arg(long)]
        host: Option<String>,
    },

    /// List stored conversations.
    #[command(alias = "ls")]
    Sessions,

    /// Print the assembled persona prompt.
    Persona,
}
