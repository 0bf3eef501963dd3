//! valve-catalog CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`; errors are printed to
//! stderr with a non-zero exit.

use valve_catalog::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
