//! CLI module for the valve catalog
//!
//! Provides command-line interface for:
//! - init: create the database and the valve table
//! - serve: run the HTTP server

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, CommonArgs};
pub use commands::{init, init_logging, resolve_config, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
