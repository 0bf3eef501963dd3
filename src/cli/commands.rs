//! CLI command implementations

use tracing_subscriber::EnvFilter;

use super::args::{Cli, Command, CommonArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::http_server::{HttpServer, ValveState};
use crate::storage::ValveStore;

/// Parse arguments, set up logging and run the selected command.
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    run_command(cli.command).await
}

/// `RUST_LOG` wins; otherwise verbosity picks the filter.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "info,tower_http=debug",
        1 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .try_init();
}

pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { common } => init(&common).await,
        Command::Serve { common, bind } => serve(&common, bind.as_deref()).await,
    }
}

/// Resolve configuration from the file plus command line overrides.
pub fn resolve_config(common: &CommonArgs, bind: Option<&str>) -> CliResult<Config> {
    let mut config = Config::load_or_default(common.config.as_deref())?;

    if let Some(url) = &common.database_url {
        config.database_url = url.clone();
    }
    if let Some(bind) = bind {
        config.http = config.http.with_bind(bind).map_err(CliError::config_error)?;
    }

    config.validate()?;
    Ok(config)
}

/// Create the database file and the valve table.
pub async fn init(common: &CommonArgs) -> CliResult<()> {
    let config = resolve_config(common, None)?;

    let store = ValveStore::connect(&config.database_url, config.store_options()).await?;
    store.close().await;

    tracing::info!(database_url = %config.database_url, "valve table ready");
    Ok(())
}

/// Open the store and serve HTTP until shutdown.
pub async fn serve(common: &CommonArgs, bind: Option<&str>) -> CliResult<()> {
    let config = resolve_config(common, bind)?;
    tracing::info!(
        database_url = %config.database_url,
        decode_names_twice = config.decode_names_twice,
        "starting valve catalog v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = ValveStore::connect(&config.database_url, config.store_options()).await?;
    let state = ValveState::new(store.clone()).with_double_decoding(config.decode_names_twice);

    let server = HttpServer::new(config.http.clone(), state);
    let result = server
        .start()
        .await
        .map_err(|e| CliError::serve_failed(e.to_string()));

    store.close().await;
    result
}
