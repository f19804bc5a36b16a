//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Reportflow using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Reportflow - event-driven report conversion and dashboard provisioning
#[derive(Parser, Debug)]
#[command(name = "reportflow")]
#[command(version, about, long_about = None)]
#[command(author = "Reportflow Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "reportflow.toml", env = "REPORTFLOW_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REPORTFLOW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline for one or more storage events
    Run(commands::run::RunArgs),

    /// Convert a local JSON export to CSV
    Convert(commands::convert::ConvertArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
