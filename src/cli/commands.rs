//! CLI command implementations

use std::path::Path;

use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::http_server::HttpServer;
use crate::query::{build_statement, validate_payload, GeneratedStatement};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_json};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "querydeck=info,tower_http=info";

/// Parse CLI arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Explain => {
            let statement = explain(read_request()?)?;
            write_json(&statement)
        }
    }
}

/// Load the configuration file, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    match path {
        Some(path) => Config::load(path).map_err(CliError::config_error),
        None => Ok(Config::default()),
    }
}

fn init_tracing() {
    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    init_tracing();

    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    tracing::info!(
        addr = %config.server.socket_addr(),
        validate_identifiers = config.database.validate_identifiers,
        "starting querydeck"
    );

    let server = HttpServer::new(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Build the statement for a request without touching a database
pub fn explain(request: Value) -> CliResult<GeneratedStatement> {
    let spec = validate_payload(request)?;
    Ok(build_statement(&spec))
}
