//! CLI interface and argument parsing
//!
//! Each serverless function maps to one subcommand; the delivery
//! mechanism (or an operator) invokes the binary once per event.

pub mod commands;

use clap::{Parser, Subcommand};

/// sluice - cloud table export pipeline
#[derive(Parser, Debug)]
#[command(name = "sluice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sluice.toml", env = "SLUICE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SLUICE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the source database and publish the table list seed message
    ListTables(commands::list_tables::ListTablesArgs),

    /// Handle one batch export message
    Export(commands::export::ExportArgs),

    /// Clean one raw export object (NULL markers, schema inference)
    Clean(commands::clean::CleanArgs),

    /// Load one cleaned CSV into the warehouse
    Load(commands::load::LoadArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
