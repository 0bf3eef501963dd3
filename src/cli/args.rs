//! CLI argument definitions using clap
//!
//! Commands:
//! - valve-catalog init --config <path>
//! - valve-catalog serve --config <path> --bind <host:port>

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Valve catalog - CRUD service for industrial valve records
#[derive(Parser, Debug)]
#[command(name = "valve-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Path to JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Database URL, overriding the configuration file
    #[arg(long, env = "VALVE_DATABASE_URL")]
    pub database_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and the valve table
    Init {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Address to listen on, as host:port
        #[arg(short, long)]
        bind: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
