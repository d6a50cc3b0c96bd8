//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gsuite-mcp - Google Calendar and Gmail tools over MCP
#[derive(Debug, Parser)]
#[command(name = "gsuite-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "GSUITE_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve MCP on stdio (the default when no command is given)
    Serve,

    /// Run the interactive Google OAuth flow
    Auth {
        /// Force re-authentication even if already authenticated
        #[arg(long, short)]
        force: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration as TOML
    Dump,

    /// Show configuration file path
    Path,
}
